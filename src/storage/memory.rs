use anyhow::Result;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    Flavor, FlavorPatch, Hotkey, HotkeyPatch, MenuItem, MenuItemPatch, NewFlavor, NewHotkey,
    NewMenuItem, NewPromo, NewReview, NewSpiciness, NewTheme, Promo, PromoPatch, Review,
    ReviewPatch, Role, SocialShare, Spiciness, SpicinessPatch, Theme, ThemePatch, User,
};

use super::{seed, Doc, Store};

/// Everything the fallback store holds. Also the unit the demo seed produces.
#[derive(Debug, Default)]
pub struct Dataset {
    pub users: Vec<User>,
    pub flavors: Vec<Flavor>,
    pub spiciness: Vec<Spiciness>,
    pub promos: Vec<Promo>,
    pub menu_items: Vec<MenuItem>,
    pub themes: Vec<Theme>,
    pub hotkeys: Vec<Hotkey>,
    pub reviews: Vec<Review>,
    pub shares: Vec<SocialShare>,
}

pub(crate) trait HasCollection<T> {
    fn collection(&self) -> &Vec<T>;
    fn collection_mut(&mut self) -> &mut Vec<T>;
}

macro_rules! impl_has_collection {
    ($ty:ty, $field:ident) => {
        impl HasCollection<$ty> for Dataset {
            fn collection(&self) -> &Vec<$ty> {
                &self.$field
            }
            fn collection_mut(&mut self) -> &mut Vec<$ty> {
                &mut self.$field
            }
        }
    };
}

impl_has_collection!(Flavor, flavors);
impl_has_collection!(Spiciness, spiciness);
impl_has_collection!(Promo, promos);
impl_has_collection!(MenuItem, menu_items);
impl_has_collection!(Theme, themes);
impl_has_collection!(Hotkey, hotkeys);

/// In-memory substitute used when the persistent store is unreachable at
/// startup, and by tests.
pub struct MemStore {
    data: RwLock<Dataset>,
}

impl MemStore {
    pub fn empty() -> Self {
        Self {
            data: RwLock::new(Dataset::default()),
        }
    }

    pub fn seeded() -> Self {
        Self {
            data: RwLock::new(seed::demo_dataset()),
        }
    }

    async fn list_active<T: Doc>(&self) -> Vec<T>
    where
        Dataset: HasCollection<T>,
    {
        let data = self.data.read().await;
        data.collection()
            .iter()
            .filter(|e| e.is_active())
            .cloned()
            .collect()
    }

    async fn find<T: Doc>(&self, id: Uuid) -> Option<T>
    where
        Dataset: HasCollection<T>,
    {
        let data = self.data.read().await;
        data.collection().iter().find(|e| e.id() == id).cloned()
    }

    async fn insert<T: Doc>(&self, entity: T) -> T
    where
        Dataset: HasCollection<T>,
    {
        let mut data = self.data.write().await;
        data.collection_mut().push(entity.clone());
        entity
    }

    async fn update<T: Doc, P: Serialize>(&self, id: Uuid, patch: &P) -> Result<Option<T>>
    where
        Dataset: HasCollection<T>,
    {
        let mut data = self.data.write().await;
        let items = data.collection_mut();
        let Some(pos) = items.iter().position(|e| e.id() == id) else {
            return Ok(None);
        };
        let merged: T = merge(&items[pos], patch)?;
        items[pos] = merged.clone();
        Ok(Some(merged))
    }

    async fn soft_delete<T: Doc>(&self, id: Uuid) -> bool
    where
        Dataset: HasCollection<T>,
    {
        let mut data = self.data.write().await;
        match data.collection_mut().iter_mut().find(|e| e.id() == id) {
            Some(entity) => {
                entity.set_active(false);
                true
            }
            None => false,
        }
    }
}

/// Field-level merge through JSON, matching the persistent path's
/// `data || patch` semantics. Absent patch fields leave the entity alone.
fn merge<T, P>(entity: &T, patch: &P) -> Result<T>
where
    T: Serialize + DeserializeOwned,
    P: Serialize,
{
    let mut base = serde_json::to_value(entity)?;
    let patch = serde_json::to_value(patch)?;
    if let (Some(base_obj), Some(patch_obj)) = (base.as_object_mut(), patch.as_object()) {
        for (key, value) in patch_obj {
            base_obj.insert(key.clone(), value.clone());
        }
    }
    Ok(serde_json::from_value(base)?)
}

#[async_trait]
impl Store for MemStore {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let data = self.data.read().await;
        Ok(data.users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let data = self.data.read().await;
        Ok(data.users.iter().find(|u| u.username == username).cloned())
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User> {
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            role: Role::Admin,
            created_at: OffsetDateTime::now_utc(),
        };
        let mut data = self.data.write().await;
        data.users.push(user.clone());
        Ok(user)
    }

    async fn list_flavors(&self) -> Result<Vec<Flavor>> {
        Ok(self.list_active().await)
    }
    async fn get_flavor(&self, id: Uuid) -> Result<Option<Flavor>> {
        Ok(self.find(id).await)
    }
    async fn create_flavor(&self, data: NewFlavor) -> Result<Flavor> {
        Ok(self.insert(Flavor::create(data)).await)
    }
    async fn update_flavor(&self, id: Uuid, patch: FlavorPatch) -> Result<Option<Flavor>> {
        self.update(id, &patch).await
    }
    async fn delete_flavor(&self, id: Uuid) -> Result<bool> {
        Ok(self.soft_delete::<Flavor>(id).await)
    }

    async fn list_spiciness(&self) -> Result<Vec<Spiciness>> {
        let mut levels: Vec<Spiciness> = self.list_active().await;
        levels.sort_by_key(|s| s.level);
        Ok(levels)
    }
    async fn get_spiciness(&self, id: Uuid) -> Result<Option<Spiciness>> {
        Ok(self.find(id).await)
    }
    async fn create_spiciness(&self, data: NewSpiciness) -> Result<Spiciness> {
        Ok(self.insert(Spiciness::create(data)).await)
    }
    async fn update_spiciness(&self, id: Uuid, patch: SpicinessPatch) -> Result<Option<Spiciness>> {
        self.update(id, &patch).await
    }
    async fn delete_spiciness(&self, id: Uuid) -> Result<bool> {
        Ok(self.soft_delete::<Spiciness>(id).await)
    }

    async fn list_promos(&self) -> Result<Vec<Promo>> {
        let mut promos: Vec<Promo> = self.list_active().await;
        promos.sort_by_key(|p| p.order);
        Ok(promos)
    }
    async fn get_promo(&self, id: Uuid) -> Result<Option<Promo>> {
        Ok(self.find(id).await)
    }
    async fn create_promo(&self, data: NewPromo) -> Result<Promo> {
        Ok(self.insert(Promo::create(data)).await)
    }
    async fn update_promo(&self, id: Uuid, patch: PromoPatch) -> Result<Option<Promo>> {
        self.update(id, &patch).await
    }
    async fn delete_promo(&self, id: Uuid) -> Result<bool> {
        Ok(self.soft_delete::<Promo>(id).await)
    }

    async fn list_menu_items(&self) -> Result<Vec<MenuItem>> {
        Ok(self.list_active().await)
    }
    async fn get_menu_item(&self, id: Uuid) -> Result<Option<MenuItem>> {
        Ok(self.find(id).await)
    }
    async fn create_menu_item(&self, data: NewMenuItem) -> Result<MenuItem> {
        Ok(self.insert(MenuItem::create(data)).await)
    }
    async fn update_menu_item(&self, id: Uuid, patch: MenuItemPatch) -> Result<Option<MenuItem>> {
        self.update(id, &patch).await
    }
    async fn delete_menu_item(&self, id: Uuid) -> Result<bool> {
        Ok(self.soft_delete::<MenuItem>(id).await)
    }

    async fn list_themes(&self) -> Result<Vec<Theme>> {
        Ok(self.list_active().await)
    }
    async fn get_theme(&self, id: Uuid) -> Result<Option<Theme>> {
        Ok(self.find(id).await)
    }
    async fn create_theme(&self, data: NewTheme) -> Result<Theme> {
        Ok(self.insert(Theme::create(data)).await)
    }
    async fn update_theme(&self, id: Uuid, patch: ThemePatch) -> Result<Option<Theme>> {
        self.update(id, &patch).await
    }
    async fn delete_theme(&self, id: Uuid) -> Result<bool> {
        Ok(self.soft_delete::<Theme>(id).await)
    }

    async fn list_hotkeys(&self) -> Result<Vec<Hotkey>> {
        Ok(self.list_active().await)
    }
    async fn get_hotkey(&self, id: Uuid) -> Result<Option<Hotkey>> {
        Ok(self.find(id).await)
    }
    async fn create_hotkey(&self, data: NewHotkey) -> Result<Hotkey> {
        Ok(self.insert(Hotkey::create(data)).await)
    }
    async fn update_hotkey(&self, id: Uuid, patch: HotkeyPatch) -> Result<Option<Hotkey>> {
        self.update(id, &patch).await
    }
    async fn delete_hotkey(&self, id: Uuid) -> Result<bool> {
        Ok(self.soft_delete::<Hotkey>(id).await)
    }

    async fn list_reviews(&self, approved_only: bool) -> Result<Vec<Review>> {
        let data = self.data.read().await;
        let mut reviews: Vec<Review> = data
            .reviews
            .iter()
            .filter(|r| !approved_only || r.is_approved)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews)
    }

    async fn list_reviews_for_item(
        &self,
        menu_item_id: Uuid,
        approved_only: bool,
    ) -> Result<Vec<Review>> {
        let reviews = self.list_reviews(approved_only).await?;
        Ok(reviews
            .into_iter()
            .filter(|r| r.menu_item_id == menu_item_id)
            .collect())
    }

    async fn get_review(&self, id: Uuid) -> Result<Option<Review>> {
        let data = self.data.read().await;
        Ok(data.reviews.iter().find(|r| r.id == id).cloned())
    }

    async fn create_review(&self, data: NewReview) -> Result<Review> {
        let review = Review::create(data);
        let mut guard = self.data.write().await;
        guard.reviews.push(review.clone());
        Ok(review)
    }

    async fn update_review(&self, id: Uuid, patch: ReviewPatch) -> Result<Option<Review>> {
        let mut data = self.data.write().await;
        let Some(pos) = data.reviews.iter().position(|r| r.id == id) else {
            return Ok(None);
        };
        let merged: Review = merge(&data.reviews[pos], &patch)?;
        data.reviews[pos] = merged.clone();
        Ok(Some(merged))
    }

    async fn delete_review(&self, id: Uuid) -> Result<bool> {
        let mut data = self.data.write().await;
        let before = data.reviews.len();
        data.reviews.retain(|r| r.id != id);
        Ok(data.reviews.len() != before)
    }

    async fn list_shares(&self) -> Result<Vec<SocialShare>> {
        let data = self.data.read().await;
        Ok(data.shares.clone())
    }

    async fn list_shares_for_item(&self, menu_item_id: Uuid) -> Result<Vec<SocialShare>> {
        let data = self.data.read().await;
        Ok(data
            .shares
            .iter()
            .filter(|s| s.menu_item_id == menu_item_id)
            .cloned()
            .collect())
    }

    async fn increment_share(&self, menu_item_id: Uuid, platform: &str) -> Result<SocialShare> {
        let mut data = self.data.write().await;
        if let Some(share) = data
            .shares
            .iter_mut()
            .find(|s| s.menu_item_id == menu_item_id && s.platform == platform)
        {
            share.share_count += 1;
            share.last_shared_at = OffsetDateTime::now_utc();
            return Ok(share.clone());
        }
        let share = SocialShare::first(menu_item_id, platform);
        data.shares.push(share.clone());
        Ok(share)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Localized, NewMenuItem, NewPromo, NewReview};

    fn new_item(name: &str, spice: i64) -> NewMenuItem {
        NewMenuItem {
            name: Localized {
                en: name.into(),
                es: name.into(),
            },
            description: Localized {
                en: "desc".into(),
                es: "desc".into(),
            },
            price: 10.0,
            image_url: "https://example.com/item.jpg".into(),
            spice_level: spice,
            flavors: vec![],
            category: "Main Course".into(),
            ingredients: vec!["thing".into()],
            rating: 4.0,
            active: true,
        }
    }

    #[tokio::test]
    async fn create_list_soft_delete_menu_item() {
        let store = MemStore::empty();
        let created = store.create_menu_item(new_item("Tacos", 3)).await.unwrap();

        let listed = store.list_menu_items().await.unwrap();
        assert!(listed.iter().any(|m| m.id == created.id));

        assert!(store.delete_menu_item(created.id).await.unwrap());
        let listed = store.list_menu_items().await.unwrap();
        assert!(listed.iter().all(|m| m.id != created.id));

        // Direct fetch still returns the soft-deleted record.
        let fetched = store.get_menu_item(created.id).await.unwrap().unwrap();
        assert!(!fetched.active);

        // Deleting an unknown id reports not found.
        assert!(!store.delete_menu_item(Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn partial_update_merges_and_is_idempotent() {
        let store = MemStore::empty();
        let created = store.create_menu_item(new_item("Tacos", 3)).await.unwrap();

        let patch = MenuItemPatch {
            price: Some(12.5),
            ..MenuItemPatch::default()
        };
        let first = store
            .update_menu_item(created.id, patch.clone())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.price, 12.5);
        assert_eq!(first.name.en, "Tacos");
        assert_eq!(first.spice_level, 3);

        let second = store
            .update_menu_item(created.id, patch)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(second.price, first.price);
        assert_eq!(second.created_at, first.created_at);

        assert!(store
            .update_menu_item(Uuid::new_v4(), MenuItemPatch::default())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn promos_ordered_and_spiciness_sorted_by_level() {
        let store = MemStore::seeded();
        let promos = store.list_promos().await.unwrap();
        assert!(promos.windows(2).all(|w| w[0].order <= w[1].order));

        let levels = store.list_spiciness().await.unwrap();
        assert_eq!(levels.len(), 6);
        assert!(levels.windows(2).all(|w| w[0].level < w[1].level));
    }

    #[tokio::test]
    async fn share_increment_is_upsert_not_insert() {
        let store = MemStore::empty();
        let item = Uuid::new_v4();

        let first = store.increment_share(item, "twitter").await.unwrap();
        assert_eq!(first.share_count, 1);
        let second = store.increment_share(item, "twitter").await.unwrap();
        assert_eq!(second.share_count, 2);
        assert_eq!(second.id, first.id);

        // A different platform gets its own counter.
        store.increment_share(item, "facebook").await.unwrap();
        assert_eq!(store.list_shares_for_item(item).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn reviews_hidden_until_approved() {
        let store = MemStore::empty();
        let item = Uuid::new_v4();
        let review = store
            .create_review(NewReview {
                menu_item_id: item,
                user_name: "Ana".into(),
                rating: 5,
                comment: "Excelente".into(),
            })
            .await
            .unwrap();

        assert!(store.list_reviews(true).await.unwrap().is_empty());
        assert_eq!(store.list_reviews(false).await.unwrap().len(), 1);

        store
            .update_review(review.id, ReviewPatch::approved())
            .await
            .unwrap()
            .unwrap();
        let approved = store.list_reviews_for_item(item, true).await.unwrap();
        assert_eq!(approved.len(), 1);
        assert!(approved[0].is_approved);

        // Reviews hard-delete.
        assert!(store.delete_review(review.id).await.unwrap());
        assert!(store.get_review(review.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn seeded_catalog_matches_demo_contents() {
        let store = MemStore::seeded();
        assert_eq!(store.list_flavors().await.unwrap().len(), 8);
        assert_eq!(store.list_menu_items().await.unwrap().len(), 4);
        assert_eq!(store.list_themes().await.unwrap().len(), 4);
        assert_eq!(store.list_promos().await.unwrap().len(), 3);
        assert_eq!(store.list_hotkeys().await.unwrap().len(), 2);
        let admin = store.get_user_by_username("admin").await.unwrap().unwrap();
        assert_eq!(admin.role, Role::Admin);
    }

    #[tokio::test]
    async fn seeded_menu_references_seeded_flavors() {
        let store = MemStore::seeded();
        let flavor_ids: Vec<Uuid> = store
            .list_flavors()
            .await
            .unwrap()
            .iter()
            .map(|f| f.id)
            .collect();
        for item in store.list_menu_items().await.unwrap() {
            assert!(item.flavors.iter().all(|f| flavor_ids.contains(f)));
        }
    }
}
