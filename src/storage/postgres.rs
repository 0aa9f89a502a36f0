use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use time::OffsetDateTime;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{
    Flavor, FlavorPatch, Hotkey, HotkeyPatch, MenuItem, MenuItemPatch, NewFlavor, NewHotkey,
    NewMenuItem, NewPromo, NewReview, NewSpiciness, NewTheme, Promo, PromoPatch, Review,
    ReviewPatch, Role, SocialShare, Spiciness, SpicinessPatch, Theme, ThemePatch, User,
};

use super::{seed, Doc, Store};

/// Postgres-backed store. Catalog entities live as JSONB documents, one
/// table per collection, so the CRUD plumbing is written once and shared.
pub struct PgStore {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    password_hash: String,
    role: String,
    created_at: OffsetDateTime,
}

impl UserRow {
    fn into_user(self) -> Result<User> {
        let role = match self.role.as_str() {
            "admin" => Role::Admin,
            other => anyhow::bail!("unknown role {other:?}"),
        };
        Ok(User {
            id: self.id,
            username: self.username,
            password_hash: self.password_hash,
            role,
            created_at: self.created_at,
        })
    }
}

impl PgStore {
    /// Establishes the pool, runs migrations and seeds an empty database.
    /// Any failure here sends the process to the in-memory fallback.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to database")?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("run migrations")?;
        let store = Self { pool };
        store.seed_if_empty().await.context("seed database")?;
        Ok(store)
    }

    async fn seed_if_empty(&self) -> Result<()> {
        let users: i64 = sqlx::query_scalar("SELECT count(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        if users > 0 {
            debug!("database already seeded, skipping");
            return Ok(());
        }
        info!("seeding database with demo catalog");

        let data = seed::demo_dataset();
        for user in &data.users {
            self.insert_user(user).await?;
        }
        for flavor in &data.flavors {
            self.insert_doc(flavor).await?;
        }
        for spice in &data.spiciness {
            self.insert_doc(spice).await?;
        }
        for theme in &data.themes {
            self.insert_doc(theme).await?;
        }
        for promo in &data.promos {
            self.insert_doc(promo).await?;
        }
        for item in &data.menu_items {
            self.insert_doc(item).await?;
        }
        for hotkey in &data.hotkeys {
            self.insert_doc(hotkey).await?;
        }
        Ok(())
    }

    async fn insert_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash, role, created_at)
            VALUES ($1, $2, $3, 'admin', $4)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    // --- generic document CRUD ---

    async fn list_active<T: Doc>(&self, order_by: Option<&str>) -> Result<Vec<T>> {
        let mut sql = format!(
            "SELECT data FROM {} WHERE (data->>'active')::boolean = true",
            T::TABLE
        );
        if let Some(expr) = order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(expr);
        }
        let rows: Vec<(serde_json::Value,)> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        rows.into_iter()
            .map(|(value,)| serde_json::from_value(value).map_err(Into::into))
            .collect()
    }

    async fn get_doc<T: Doc>(&self, id: Uuid) -> Result<Option<T>> {
        let sql = format!("SELECT data FROM {} WHERE id = $1", T::TABLE);
        let row: Option<(serde_json::Value,)> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|(value,)| serde_json::from_value(value))
            .transpose()
            .map_err(Into::into)
    }

    async fn insert_doc<T: Doc>(&self, entity: &T) -> Result<()> {
        let sql = format!("INSERT INTO {} (id, data) VALUES ($1, $2)", T::TABLE);
        sqlx::query(&sql)
            .bind(entity.id())
            .bind(serde_json::to_value(entity)?)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_doc<T: Doc, P: Serialize + Sync>(
        &self,
        id: Uuid,
        patch: &P,
    ) -> Result<Option<T>> {
        let sql = format!(
            "UPDATE {} SET data = data || $2 WHERE id = $1 RETURNING data",
            T::TABLE
        );
        let row: Option<(serde_json::Value,)> = sqlx::query_as(&sql)
            .bind(id)
            .bind(serde_json::to_value(patch)?)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|(value,)| serde_json::from_value(value))
            .transpose()
            .map_err(Into::into)
    }

    async fn soft_delete_doc<T: Doc>(&self, id: Uuid) -> Result<bool> {
        let sql = format!(
            "UPDATE {} SET data = jsonb_set(data, '{{active}}', 'false'::jsonb) WHERE id = $1",
            T::TABLE
        );
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_docs<T: Doc>(&self, where_clause: &str, order_by: &str) -> Result<Vec<T>> {
        let sql = format!(
            "SELECT data FROM {} WHERE {where_clause} ORDER BY {order_by}",
            T::TABLE
        );
        let rows: Vec<(serde_json::Value,)> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        rows.into_iter()
            .map(|(value,)| serde_json::from_value(value).map_err(Into::into))
            .collect()
    }
}

// Reviews have no soft-delete flag; they use their own filters and a real
// DELETE, so they do not go through the Doc plumbing.
impl Doc for Review {
    const TABLE: &'static str = "reviews";
    fn id(&self) -> Uuid {
        self.id
    }
    fn is_active(&self) -> bool {
        true
    }
    fn set_active(&mut self, _active: bool) {}
}

impl Doc for SocialShare {
    const TABLE: &'static str = "social_shares";
    fn id(&self) -> Uuid {
        self.id
    }
    fn is_active(&self) -> bool {
        true
    }
    fn set_active(&mut self, _active: bool) {}
}

#[async_trait]
impl Store for PgStore {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, username, password_hash, role, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(UserRow::into_user).transpose()
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, username, password_hash, role, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        row.map(UserRow::into_user).transpose()
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User> {
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            role: Role::Admin,
            created_at: OffsetDateTime::now_utc(),
        };
        self.insert_user(&user).await?;
        Ok(user)
    }

    async fn list_flavors(&self) -> Result<Vec<Flavor>> {
        self.list_active(None).await
    }
    async fn get_flavor(&self, id: Uuid) -> Result<Option<Flavor>> {
        self.get_doc(id).await
    }
    async fn create_flavor(&self, data: NewFlavor) -> Result<Flavor> {
        let flavor = Flavor::create(data);
        self.insert_doc(&flavor).await?;
        Ok(flavor)
    }
    async fn update_flavor(&self, id: Uuid, patch: FlavorPatch) -> Result<Option<Flavor>> {
        self.update_doc(id, &patch).await
    }
    async fn delete_flavor(&self, id: Uuid) -> Result<bool> {
        self.soft_delete_doc::<Flavor>(id).await
    }

    async fn list_spiciness(&self) -> Result<Vec<Spiciness>> {
        self.list_active(Some("(data->>'level')::int")).await
    }
    async fn get_spiciness(&self, id: Uuid) -> Result<Option<Spiciness>> {
        self.get_doc(id).await
    }
    async fn create_spiciness(&self, data: NewSpiciness) -> Result<Spiciness> {
        let spice = Spiciness::create(data);
        self.insert_doc(&spice).await?;
        Ok(spice)
    }
    async fn update_spiciness(&self, id: Uuid, patch: SpicinessPatch) -> Result<Option<Spiciness>> {
        self.update_doc(id, &patch).await
    }
    async fn delete_spiciness(&self, id: Uuid) -> Result<bool> {
        self.soft_delete_doc::<Spiciness>(id).await
    }

    async fn list_promos(&self) -> Result<Vec<Promo>> {
        self.list_active(Some("(data->>'order')::int")).await
    }
    async fn get_promo(&self, id: Uuid) -> Result<Option<Promo>> {
        self.get_doc(id).await
    }
    async fn create_promo(&self, data: NewPromo) -> Result<Promo> {
        let promo = Promo::create(data);
        self.insert_doc(&promo).await?;
        Ok(promo)
    }
    async fn update_promo(&self, id: Uuid, patch: PromoPatch) -> Result<Option<Promo>> {
        self.update_doc(id, &patch).await
    }
    async fn delete_promo(&self, id: Uuid) -> Result<bool> {
        self.soft_delete_doc::<Promo>(id).await
    }

    async fn list_menu_items(&self) -> Result<Vec<MenuItem>> {
        self.list_active(None).await
    }
    async fn get_menu_item(&self, id: Uuid) -> Result<Option<MenuItem>> {
        self.get_doc(id).await
    }
    async fn create_menu_item(&self, data: NewMenuItem) -> Result<MenuItem> {
        let item = MenuItem::create(data);
        self.insert_doc(&item).await?;
        Ok(item)
    }
    async fn update_menu_item(&self, id: Uuid, patch: MenuItemPatch) -> Result<Option<MenuItem>> {
        self.update_doc(id, &patch).await
    }
    async fn delete_menu_item(&self, id: Uuid) -> Result<bool> {
        self.soft_delete_doc::<MenuItem>(id).await
    }

    async fn list_themes(&self) -> Result<Vec<Theme>> {
        self.list_active(None).await
    }
    async fn get_theme(&self, id: Uuid) -> Result<Option<Theme>> {
        self.get_doc(id).await
    }
    async fn create_theme(&self, data: NewTheme) -> Result<Theme> {
        let theme = Theme::create(data);
        self.insert_doc(&theme).await?;
        Ok(theme)
    }
    async fn update_theme(&self, id: Uuid, patch: ThemePatch) -> Result<Option<Theme>> {
        self.update_doc(id, &patch).await
    }
    async fn delete_theme(&self, id: Uuid) -> Result<bool> {
        self.soft_delete_doc::<Theme>(id).await
    }

    async fn list_hotkeys(&self) -> Result<Vec<Hotkey>> {
        self.list_active(None).await
    }
    async fn get_hotkey(&self, id: Uuid) -> Result<Option<Hotkey>> {
        self.get_doc(id).await
    }
    async fn create_hotkey(&self, data: NewHotkey) -> Result<Hotkey> {
        let hotkey = Hotkey::create(data);
        self.insert_doc(&hotkey).await?;
        Ok(hotkey)
    }
    async fn update_hotkey(&self, id: Uuid, patch: HotkeyPatch) -> Result<Option<Hotkey>> {
        self.update_doc(id, &patch).await
    }
    async fn delete_hotkey(&self, id: Uuid) -> Result<bool> {
        self.soft_delete_doc::<Hotkey>(id).await
    }

    async fn list_reviews(&self, approved_only: bool) -> Result<Vec<Review>> {
        let where_clause = if approved_only {
            "(data->>'isApproved')::boolean = true"
        } else {
            "true"
        };
        self.list_docs(where_clause, "data->>'createdAt' DESC").await
    }

    async fn list_reviews_for_item(
        &self,
        menu_item_id: Uuid,
        approved_only: bool,
    ) -> Result<Vec<Review>> {
        let mut sql = String::from("SELECT data FROM reviews WHERE data->>'menuItemId' = $1");
        if approved_only {
            sql.push_str(" AND (data->>'isApproved')::boolean = true");
        }
        sql.push_str(" ORDER BY data->>'createdAt' DESC");
        let rows: Vec<(serde_json::Value,)> = sqlx::query_as(&sql)
            .bind(menu_item_id.to_string())
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter()
            .map(|(value,)| serde_json::from_value(value).map_err(Into::into))
            .collect()
    }

    async fn get_review(&self, id: Uuid) -> Result<Option<Review>> {
        self.get_doc(id).await
    }

    async fn create_review(&self, data: NewReview) -> Result<Review> {
        let review = Review::create(data);
        self.insert_doc(&review).await?;
        Ok(review)
    }

    async fn update_review(&self, id: Uuid, patch: ReviewPatch) -> Result<Option<Review>> {
        self.update_doc(id, &patch).await
    }

    async fn delete_review(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_shares(&self) -> Result<Vec<SocialShare>> {
        self.list_docs("true", "data->>'lastSharedAt' DESC").await
    }

    async fn list_shares_for_item(&self, menu_item_id: Uuid) -> Result<Vec<SocialShare>> {
        let rows: Vec<(serde_json::Value,)> = sqlx::query_as(
            "SELECT data FROM social_shares WHERE data->>'menuItemId' = $1",
        )
        .bind(menu_item_id.to_string())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(|(value,)| serde_json::from_value(value).map_err(Into::into))
            .collect()
    }

    /// Increment-or-create in one statement; concurrent shares of the same
    /// item/platform serialize in the database.
    async fn increment_share(&self, menu_item_id: Uuid, platform: &str) -> Result<SocialShare> {
        let fresh = SocialShare::first(menu_item_id, platform);
        let now = serde_json::to_value(
            fresh
                .last_shared_at
                .format(&time::format_description::well_known::Rfc3339)?,
        )?;
        let (value,): (serde_json::Value,) = sqlx::query_as(
            r#"
            INSERT INTO social_shares (id, data) VALUES ($1, $2)
            ON CONFLICT ((data->>'menuItemId'), (data->>'platform')) DO UPDATE
            SET data = jsonb_set(
                jsonb_set(
                    social_shares.data,
                    '{shareCount}',
                    to_jsonb((social_shares.data->>'shareCount')::bigint + 1)
                ),
                '{lastSharedAt}',
                $3
            )
            RETURNING data
            "#,
        )
        .bind(fresh.id)
        .bind(serde_json::to_value(&fresh)?)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(serde_json::from_value(value)?)
    }
}
