use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::models::{
    Flavor, FlavorPatch, Hotkey, HotkeyPatch, MenuItem, MenuItemPatch, NewFlavor, NewHotkey,
    NewMenuItem, NewPromo, NewReview, NewSpiciness, NewTheme, Promo, PromoPatch, Review,
    ReviewPatch, SocialShare, Spiciness, SpicinessPatch, Theme, ThemePatch, User,
};

pub mod memory;
pub mod postgres;
pub mod seed;

pub use memory::MemStore;
pub use postgres::PgStore;

/// Uniform CRUD surface over every collection, independent of backend.
///
/// List methods return active records only; `get_*` by id returns the record
/// even when soft-deleted. Catalog entities soft-delete (`active = false`),
/// reviews are removed for real.
#[async_trait]
pub trait Store: Send + Sync {
    // users
    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User>;

    // flavors
    async fn list_flavors(&self) -> Result<Vec<Flavor>>;
    async fn get_flavor(&self, id: Uuid) -> Result<Option<Flavor>>;
    async fn create_flavor(&self, data: NewFlavor) -> Result<Flavor>;
    async fn update_flavor(&self, id: Uuid, patch: FlavorPatch) -> Result<Option<Flavor>>;
    async fn delete_flavor(&self, id: Uuid) -> Result<bool>;

    // spiciness, ordered by level
    async fn list_spiciness(&self) -> Result<Vec<Spiciness>>;
    async fn get_spiciness(&self, id: Uuid) -> Result<Option<Spiciness>>;
    async fn create_spiciness(&self, data: NewSpiciness) -> Result<Spiciness>;
    async fn update_spiciness(&self, id: Uuid, patch: SpicinessPatch) -> Result<Option<Spiciness>>;
    async fn delete_spiciness(&self, id: Uuid) -> Result<bool>;

    // promos, ordered by display order
    async fn list_promos(&self) -> Result<Vec<Promo>>;
    async fn get_promo(&self, id: Uuid) -> Result<Option<Promo>>;
    async fn create_promo(&self, data: NewPromo) -> Result<Promo>;
    async fn update_promo(&self, id: Uuid, patch: PromoPatch) -> Result<Option<Promo>>;
    async fn delete_promo(&self, id: Uuid) -> Result<bool>;

    // menu items
    async fn list_menu_items(&self) -> Result<Vec<MenuItem>>;
    async fn get_menu_item(&self, id: Uuid) -> Result<Option<MenuItem>>;
    async fn create_menu_item(&self, data: NewMenuItem) -> Result<MenuItem>;
    async fn update_menu_item(&self, id: Uuid, patch: MenuItemPatch) -> Result<Option<MenuItem>>;
    async fn delete_menu_item(&self, id: Uuid) -> Result<bool>;

    // themes
    async fn list_themes(&self) -> Result<Vec<Theme>>;
    async fn get_theme(&self, id: Uuid) -> Result<Option<Theme>>;
    async fn create_theme(&self, data: NewTheme) -> Result<Theme>;
    async fn update_theme(&self, id: Uuid, patch: ThemePatch) -> Result<Option<Theme>>;
    async fn delete_theme(&self, id: Uuid) -> Result<bool>;

    // hotkeys
    async fn list_hotkeys(&self) -> Result<Vec<Hotkey>>;
    async fn get_hotkey(&self, id: Uuid) -> Result<Option<Hotkey>>;
    async fn create_hotkey(&self, data: NewHotkey) -> Result<Hotkey>;
    async fn update_hotkey(&self, id: Uuid, patch: HotkeyPatch) -> Result<Option<Hotkey>>;
    async fn delete_hotkey(&self, id: Uuid) -> Result<bool>;

    // reviews
    async fn list_reviews(&self, approved_only: bool) -> Result<Vec<Review>>;
    async fn list_reviews_for_item(
        &self,
        menu_item_id: Uuid,
        approved_only: bool,
    ) -> Result<Vec<Review>>;
    async fn get_review(&self, id: Uuid) -> Result<Option<Review>>;
    async fn create_review(&self, data: NewReview) -> Result<Review>;
    async fn update_review(&self, id: Uuid, patch: ReviewPatch) -> Result<Option<Review>>;
    async fn delete_review(&self, id: Uuid) -> Result<bool>;

    // social shares
    async fn list_shares(&self) -> Result<Vec<SocialShare>>;
    async fn list_shares_for_item(&self, menu_item_id: Uuid) -> Result<Vec<SocialShare>>;
    async fn increment_share(&self, menu_item_id: Uuid, platform: &str) -> Result<SocialShare>;
}

/// Catalog document stored as JSON: one implementation of create/list/
/// update/soft-delete per backend instead of one per entity.
pub(crate) trait Doc: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const TABLE: &'static str;
    fn id(&self) -> Uuid;
    fn is_active(&self) -> bool;
    fn set_active(&mut self, active: bool);
}

macro_rules! impl_doc {
    ($ty:ty, $table:literal) => {
        impl Doc for $ty {
            const TABLE: &'static str = $table;
            fn id(&self) -> Uuid {
                self.id
            }
            fn is_active(&self) -> bool {
                self.active
            }
            fn set_active(&mut self, active: bool) {
                self.active = active;
            }
        }
    };
}

impl_doc!(Flavor, "flavors");
impl_doc!(Spiciness, "spiciness");
impl_doc!(Promo, "promos");
impl_doc!(MenuItem, "menu_items");
impl_doc!(Theme, "themes");
impl_doc!(Hotkey, "hotkeys");

/// Picks the backing store once at startup. A missing `DATABASE_URL` or any
/// connection/migration/seed failure selects the in-memory demo store for
/// the rest of the process lifetime; the decision is never revisited.
pub async fn init(config: &AppConfig) -> Arc<dyn Store> {
    match &config.database_url {
        Some(url) => match PgStore::connect(url).await {
            Ok(store) => {
                info!("connected to postgres");
                Arc::new(store)
            }
            Err(e) => {
                warn!(error = %e, "database unavailable, falling back to in-memory store");
                Arc::new(MemStore::seeded())
            }
        },
        None => {
            warn!("DATABASE_URL not set, using in-memory store with demo data");
            Arc::new(MemStore::seeded())
        }
    }
}
