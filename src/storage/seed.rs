use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::password::hash_password;
use crate::models::{
    Flavor, Localized, MenuItem, NewFlavor, NewHotkey, NewMenuItem, NewPromo, NewSpiciness,
    NewTheme, Role, ThemeColors, User,
};

use super::memory::Dataset;

fn both(en: &str, es: &str) -> Localized {
    Localized {
        en: en.into(),
        es: es.into(),
    }
}

/// Fixed demo catalog used to seed an empty persistent store and to populate
/// the in-memory fallback. Ids are generated per process; contents are fixed.
pub fn demo_dataset() -> Dataset {
    let mut data = Dataset::default();

    // login: admin / admin123
    data.users.push(User {
        id: Uuid::new_v4(),
        username: "admin".into(),
        password_hash: hash_password("admin123").expect("hash demo admin password"),
        role: Role::Admin,
        created_at: OffsetDateTime::now_utc(),
    });

    let spice_levels = [
        (0, "mild", "😊", "Mild", "Suave"),
        (1, "medium", "🌶️", "Medium", "Medio"),
        (2, "hot", "🔥", "Hot", "Picante"),
        (3, "spicy", "🌋", "Spicy", "Muy Picante"),
        (4, "extreme", "💀", "Extreme", "Extremo"),
        (5, "insane", "☠️", "Insane", "Loco"),
    ];
    for (level, name, emoji, en, es) in spice_levels {
        data.spiciness
            .push(crate::models::Spiciness::create(NewSpiciness {
                level,
                name: name.into(),
                emoji: emoji.into(),
                translations: both(en, es),
                active: true,
            }));
    }

    let flavor_rows = [
        ("sweet", "🍯", "s", "Sweet", "Dulce"),
        ("salty", "🧂", "a", "Salty", "Salado"),
        ("sour", "🍋", "r", "Sour", "Agrio"),
        ("bitter", "☕", "b", "Bitter", "Amargo"),
        ("umami", "🍄", "u", "Umami", "Umami"),
        ("creamy", "🥛", "c", "Creamy", "Cremoso"),
        ("crunchy", "🥨", "x", "Crunchy", "Crujiente"),
        ("fresh", "🌿", "f", "Fresh", "Fresco"),
    ];
    for (name, emoji, hotkey, en, es) in flavor_rows {
        data.flavors.push(Flavor::create(NewFlavor {
            name: name.into(),
            emoji: emoji.into(),
            hotkey: Some(hotkey.into()),
            translations: both(en, es),
            active: true,
        }));
    }
    let flavor_id = |name: &str| -> Uuid {
        data.flavors
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.id)
            .expect("seed flavor present")
    };

    let themes = [
        (
            "default",
            ("Default", "Predeterminado"),
            ("#FF6B35", "#E63946", "#2D5A27", "#FFD23F", "#FB8500"),
            true,
        ),
        (
            "minty",
            ("Minty", "Menta"),
            ("#00C9A7", "#00B894", "#2D5A27", "#A8E6CF", "#00B894"),
            false,
        ),
        (
            "sunset",
            ("Sunset", "Atardecer"),
            ("#FF8A65", "#FF7043", "#2D5A27", "#FFD54F", "#FF7043"),
            false,
        ),
        (
            "inferno",
            ("Inferno", "Infierno"),
            ("#D32F2F", "#C62828", "#2D5A27", "#FF5722", "#C62828"),
            false,
        ),
    ];
    for (name, (en, es), (primary, primary_dark, secondary, accent, accent_dark), is_default) in
        themes
    {
        data.themes.push(crate::models::Theme::create(NewTheme {
            name: name.into(),
            display_name: both(en, es),
            colors: ThemeColors {
                primary: primary.into(),
                primary_dark: primary_dark.into(),
                secondary: secondary.into(),
                accent: accent.into(),
                accent_dark: accent_dark.into(),
            },
            active: true,
            is_default,
        }));
    }

    let promos = [
        (
            ("🍔 Burger Bliss", "🍔 Delicia de Hamburguesa"),
            (
                "Discover your perfect burger match with AI precision",
                "Descubre tu hamburguesa perfecta con precisión de IA",
            ),
            "https://images.unsplash.com/photo-1586190848861-99aa4a171e90?auto=format&fit=crop&w=800&h=600",
            1,
        ),
        (
            ("🍣 Sushi Sensations", "🍣 Sensaciones de Sushi"),
            (
                "Experience authentic flavors tailored to your taste",
                "Experimenta sabores auténticos adaptados a tu gusto",
            ),
            "https://images.unsplash.com/photo-1579584425555-c3ce17fd4351?auto=format&fit=crop&w=800&h=600",
            2,
        ),
        (
            ("🍜 Ramen Revolution", "🍜 Revolución del Ramen"),
            (
                "Warm your soul with personalized ramen recommendations",
                "Calienta tu alma con recomendaciones personalizadas de ramen",
            ),
            "https://images.unsplash.com/photo-1569718212165-3a8278d5f624?auto=format&fit=crop&w=800&h=600",
            3,
        ),
    ];
    for ((title_en, title_es), (desc_en, desc_es), image_url, order) in promos {
        data.promos.push(crate::models::Promo::create(NewPromo {
            title: both(title_en, title_es),
            description: both(desc_en, desc_es),
            image_url: image_url.into(),
            order,
            active: true,
        }));
    }

    let menu_items = [
        (
            ("Herb-Crusted Steak", "Filete con Costra de Hierbas"),
            (
                "Perfectly grilled with rosemary and garlic butter",
                "Perfectamente asado con romero y mantequilla de ajo",
            ),
            24.99,
            "https://images.unsplash.com/photo-1546833999-b9f581a1996d?auto=format&fit=crop&w=400&h=300",
            1,
            vec!["salty", "umami"],
            vec!["beef", "rosemary", "garlic", "butter"],
            4.8,
        ),
        (
            ("Spicy Thai Curry Bowl", "Tazón de Curry Tailandés Picante"),
            (
                "Aromatic curry with vegetables and jasmine rice",
                "Curry aromático con verduras y arroz jazmín",
            ),
            18.99,
            "https://images.unsplash.com/photo-1455619452474-d2be8b1e70cd?auto=format&fit=crop&w=400&h=300",
            4,
            vec!["creamy", "fresh"],
            vec!["coconut milk", "curry paste", "vegetables", "rice"],
            4.6,
        ),
        (
            ("Miso Glazed Salmon", "Salmón Glaseado con Miso"),
            (
                "Fresh salmon with miso glaze and pickled vegetables",
                "Salmón fresco con glaseado de miso y verduras encurtidas",
            ),
            22.99,
            "https://images.unsplash.com/photo-1467003909585-2f8a72700288?auto=format&fit=crop&w=400&h=300",
            2,
            vec!["umami", "salty", "fresh"],
            vec!["salmon", "miso", "vegetables", "rice vinegar"],
            4.7,
        ),
        (
            ("Chocolate Lava Cake", "Pastel de Lava de Chocolate"),
            (
                "Rich chocolate cake with molten center",
                "Pastel de chocolate rico con centro fundido",
            ),
            8.99,
            "https://images.unsplash.com/photo-1606313564200-e75d5e30476c?auto=format&fit=crop&w=400&h=300",
            0,
            vec!["sweet", "creamy"],
            vec!["chocolate", "butter", "eggs", "sugar"],
            4.9,
        ),
    ];
    let mut items = Vec::new();
    for ((name_en, name_es), (desc_en, desc_es), price, image_url, spice, flavors, ingredients, rating) in
        menu_items
    {
        let category = if price < 10.0 { "Dessert" } else { "Main Course" };
        items.push(MenuItem::create(NewMenuItem {
            name: both(name_en, name_es),
            description: both(desc_en, desc_es),
            price,
            image_url: image_url.into(),
            spice_level: spice,
            flavors: flavors.iter().map(|n| flavor_id(n)).collect(),
            category: category.into(),
            ingredients: ingredients.into_iter().map(String::from).collect(),
            rating,
            active: true,
        }));
    }
    data.menu_items = items;

    let hotkeys = [
        ("ctrl+/", "open_help", "Open help menu", "Abrir menú de ayuda"),
        (
            "ctrl+shift+s",
            "surprise_me",
            "Surprise me with a recommendation",
            "Sorpréndeme con una recomendación",
        ),
    ];
    for (key, action, en, es) in hotkeys {
        data.hotkeys.push(crate::models::Hotkey::create(NewHotkey {
            key: key.into(),
            action: action.into(),
            description: both(en, es),
            active: true,
        }));
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::verify_password;

    #[test]
    fn demo_admin_password_verifies() {
        let data = demo_dataset();
        let admin = &data.users[0];
        assert_eq!(admin.username, "admin");
        assert!(verify_password("admin123", &admin.password_hash).unwrap());
    }

    #[test]
    fn demo_catalog_is_fully_active_and_bilingual() {
        let data = demo_dataset();
        assert!(data.flavors.iter().all(|f| f.active));
        assert!(data.menu_items.iter().all(|m| m.active));
        assert!(data
            .menu_items
            .iter()
            .all(|m| !m.name.en.is_empty() && !m.name.es.is_empty()));
        assert_eq!(data.themes.iter().filter(|t| t.is_default).count(), 1);
    }
}
