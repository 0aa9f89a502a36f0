use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Bilingual text. Both locales are required, so a write with a missing
/// translation fails at deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Localized {
    pub en: String,
    pub es: String,
}

impl Localized {
    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::En => &self.en,
            Language::Es => &self.es,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
}

// --- persisted entities ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flavor {
    pub id: Uuid,
    pub name: String,
    pub emoji: String,
    #[serde(default)]
    pub hotkey: Option<String>,
    pub translations: Localized,
    pub active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spiciness {
    pub id: Uuid,
    pub level: u8,
    pub name: String,
    pub emoji: String,
    pub translations: Localized,
    pub active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promo {
    pub id: Uuid,
    pub title: Localized,
    pub description: Localized,
    pub image_url: String,
    pub order: i32,
    pub active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: Uuid,
    pub name: Localized,
    pub description: Localized,
    pub price: f64,
    pub image_url: String,
    pub spice_level: u8,
    pub flavors: Vec<Uuid>,
    pub category: String,
    pub ingredients: Vec<String>,
    pub rating: f64,
    pub active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThemeColors {
    pub primary: String,
    #[serde(rename = "primary-dark")]
    pub primary_dark: String,
    pub secondary: String,
    pub accent: String,
    #[serde(rename = "accent-dark")]
    pub accent_dark: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub id: Uuid,
    pub name: String,
    pub display_name: Localized,
    pub colors: ThemeColors,
    pub active: bool,
    pub is_default: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotkey {
    pub id: Uuid,
    pub key: String,
    pub action: String,
    pub description: Localized,
    pub active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub menu_item_id: Uuid,
    pub user_name: String,
    pub rating: u8,
    pub comment: String,
    pub is_approved: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialShare {
    pub id: Uuid,
    pub menu_item_id: Uuid,
    pub platform: String,
    pub share_count: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub last_shared_at: OffsetDateTime,
}

// --- create payloads ---
//
// Numeric fields come in as wide integers so out-of-range values reach
// `validate()` and map to 400 instead of a body-rejection status.

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFlavor {
    pub name: String,
    pub emoji: String,
    #[serde(default)]
    pub hotkey: Option<String>,
    pub translations: Localized,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSpiciness {
    pub level: i64,
    pub name: String,
    pub emoji: String,
    pub translations: Localized,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl NewSpiciness {
    pub fn validate(&self) -> Result<(), String> {
        check_spice_level(self.level)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPromo {
    pub title: Localized,
    pub description: Localized,
    pub image_url: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMenuItem {
    pub name: Localized,
    pub description: Localized,
    pub price: f64,
    pub image_url: String,
    pub spice_level: i64,
    pub flavors: Vec<Uuid>,
    pub category: String,
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl NewMenuItem {
    pub fn validate(&self) -> Result<(), String> {
        if self.price <= 0.0 {
            return Err("price must be positive".into());
        }
        check_spice_level(self.spice_level)?;
        check_rating(self.rating, 0.0)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTheme {
    pub name: String,
    pub display_name: Localized,
    pub colors: ThemeColors,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHotkey {
    pub key: String,
    pub action: String,
    pub description: Localized,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub menu_item_id: Uuid,
    pub user_name: String,
    pub rating: i64,
    pub comment: String,
}

impl NewReview {
    pub fn validate(&self) -> Result<(), String> {
        if self.user_name.trim().is_empty() {
            return Err("userName must not be empty".into());
        }
        if !(1..=5).contains(&self.rating) {
            return Err("rating must be between 1 and 5".into());
        }
        Ok(())
    }
}

// --- partial update payloads ---
//
// `None` fields are skipped during serialization so the stored document is
// merged rather than overwritten.

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlavorPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotkey: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translations: Option<Localized>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpicinessPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translations: Option<Localized>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl SpicinessPatch {
    pub fn validate(&self) -> Result<(), String> {
        match self.level {
            Some(level) => check_spice_level(level),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Localized>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Localized>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Localized>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Localized>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spice_level: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flavors: Option<Vec<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl MenuItemPatch {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(price) = self.price {
            if price <= 0.0 {
                return Err("price must be positive".into());
            }
        }
        if let Some(level) = self.spice_level {
            check_spice_level(level)?;
        }
        if let Some(rating) = self.rating {
            check_rating(rating, 0.0)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<Localized>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<ThemeColors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotkeyPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Localized>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_approved: Option<bool>,
}

impl ReviewPatch {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(rating) = self.rating {
            if !(1..=5).contains(&rating) {
                return Err("rating must be between 1 and 5".into());
            }
        }
        Ok(())
    }

    /// Patch used by the approve endpoint.
    pub fn approved() -> Self {
        Self {
            is_approved: Some(true),
            ..Self::default()
        }
    }
}

// --- transient chat shapes ---

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    pub spice_level: i64,
    #[serde(default)]
    pub flavors: Vec<Uuid>,
    #[serde(default)]
    pub language: Language,
}

impl ChatRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.message.trim().is_empty() {
            return Err("message must not be empty".into());
        }
        check_spice_level(self.spice_level)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurpriseRequest {
    pub spice_level: i64,
    #[serde(default)]
    pub flavors: Vec<Uuid>,
    #[serde(default)]
    pub language: Language,
}

impl SurpriseRequest {
    pub fn validate(&self) -> Result<(), String> {
        check_spice_level(self.spice_level)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub message: String,
    pub recommendations: Vec<Uuid>,
    pub confidence: f32,
}

// --- entity constructors (id and timestamp assigned at creation) ---

fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

impl Flavor {
    pub fn create(p: NewFlavor) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: p.name,
            emoji: p.emoji,
            hotkey: p.hotkey,
            translations: p.translations,
            active: p.active,
            created_at: now(),
        }
    }
}

impl Spiciness {
    pub fn create(p: NewSpiciness) -> Self {
        Self {
            id: Uuid::new_v4(),
            level: p.level as u8,
            name: p.name,
            emoji: p.emoji,
            translations: p.translations,
            active: p.active,
            created_at: now(),
        }
    }
}

impl Promo {
    pub fn create(p: NewPromo) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: p.title,
            description: p.description,
            image_url: p.image_url,
            order: p.order,
            active: p.active,
            created_at: now(),
        }
    }
}

impl MenuItem {
    pub fn create(p: NewMenuItem) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: p.name,
            description: p.description,
            price: p.price,
            image_url: p.image_url,
            spice_level: p.spice_level as u8,
            flavors: p.flavors,
            category: p.category,
            ingredients: p.ingredients,
            rating: p.rating,
            active: p.active,
            created_at: now(),
        }
    }
}

impl Theme {
    pub fn create(p: NewTheme) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: p.name,
            display_name: p.display_name,
            colors: p.colors,
            active: p.active,
            is_default: p.is_default,
            created_at: now(),
        }
    }
}

impl Hotkey {
    pub fn create(p: NewHotkey) -> Self {
        Self {
            id: Uuid::new_v4(),
            key: p.key,
            action: p.action,
            description: p.description,
            active: p.active,
            created_at: now(),
        }
    }
}

impl Review {
    /// Reviews always start unapproved regardless of the payload.
    pub fn create(p: NewReview) -> Self {
        Self {
            id: Uuid::new_v4(),
            menu_item_id: p.menu_item_id,
            user_name: p.user_name,
            rating: p.rating as u8,
            comment: p.comment,
            is_approved: false,
            created_at: now(),
        }
    }
}

impl SocialShare {
    pub fn first(menu_item_id: Uuid, platform: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            menu_item_id,
            platform: platform.to_string(),
            share_count: 1,
            last_shared_at: now(),
        }
    }
}

fn check_spice_level(level: i64) -> Result<(), String> {
    if (0..=5).contains(&level) {
        Ok(())
    } else {
        Err("spiceLevel must be between 0 and 5".into())
    }
}

fn check_rating(rating: f64, min: f64) -> Result<(), String> {
    if rating >= min && rating <= 5.0 {
        Ok(())
    } else {
        Err(format!("rating must be between {min} and 5"))
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn localized_requires_both_languages() {
        let err = serde_json::from_str::<Localized>(r#"{"en":"Sweet"}"#);
        assert!(err.is_err());
        let ok: Localized = serde_json::from_str(r#"{"en":"Sweet","es":"Dulce"}"#).unwrap();
        assert_eq!(ok.get(Language::Es), "Dulce");
    }

    #[test]
    fn menu_item_payload_rejects_out_of_range_spice() {
        let mut p: NewMenuItem = serde_json::from_value(serde_json::json!({
            "name": {"en": "Tacos", "es": "Tacos"},
            "description": {"en": "Three al pastor tacos", "es": "Tres tacos al pastor"},
            "price": 9.5,
            "imageUrl": "https://example.com/tacos.jpg",
            "spiceLevel": 3,
            "flavors": [],
            "category": "Main Course",
            "ingredients": ["pork", "pineapple"]
        }))
        .unwrap();
        assert!(p.validate().is_ok());

        p.spice_level = 6;
        assert!(p.validate().is_err());
        p.spice_level = -1;
        assert!(p.validate().is_err());

        p.spice_level = 2;
        p.price = 0.0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn review_payload_rating_bounds() {
        let mut p = NewReview {
            menu_item_id: Uuid::new_v4(),
            user_name: "Ana".into(),
            rating: 5,
            comment: "Great".into(),
        };
        assert!(p.validate().is_ok());
        p.rating = 0;
        assert!(p.validate().is_err());
        p.rating = 6;
        assert!(p.validate().is_err());
    }

    #[test]
    fn new_review_is_never_approved() {
        let review = Review::create(NewReview {
            menu_item_id: Uuid::new_v4(),
            user_name: "Ana".into(),
            rating: 4,
            comment: "Solid".into(),
        });
        assert!(!review.is_approved);
    }

    #[test]
    fn user_password_hash_is_not_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            username: "admin".into(),
            password_hash: "secret-hash".into(),
            role: Role::Admin,
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("admin"));
    }

    #[test]
    fn patch_skips_absent_fields() {
        let patch = MenuItemPatch {
            price: Some(12.0),
            ..MenuItemPatch::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert!(obj.contains_key("price"));
    }

    #[test]
    fn chat_request_defaults_language_to_english() {
        let req: ChatRequest = serde_json::from_value(serde_json::json!({
            "message": "something spicy",
            "spiceLevel": 4,
            "flavors": []
        }))
        .unwrap();
        assert_eq!(req.language, Language::En);
        assert!(req.validate().is_ok());

        let empty: ChatRequest = serde_json::from_value(serde_json::json!({
            "message": "   ",
            "spiceLevel": 2
        }))
        .unwrap();
        assert!(empty.validate().is_err());
    }
}
