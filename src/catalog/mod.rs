//! Catalog content served to the storefront and managed by admins.

pub mod handlers;

pub use handlers::{admin_router, public_router};

#[cfg(test)]
mod tests {
    use crate::models::{Localized, MenuItemPatch, NewMenuItem, NewSpiciness};
    use crate::state::AppState;

    fn localized(en: &str, es: &str) -> Localized {
        Localized {
            en: en.to_string(),
            es: es.to_string(),
        }
    }

    #[tokio::test]
    async fn menu_item_crud_flow() {
        let state = AppState::demo();
        let item = state
            .store
            .create_menu_item(NewMenuItem {
                name: localized("Tacos al Pastor", "Tacos al Pastor"),
                description: localized("Marinated pork tacos", "Tacos de cerdo adobado"),
                price: 12.5,
                image_url: "/images/tacos.jpg".to_string(),
                spice_level: 2,
                flavors: vec![],
                category: "Main Course".to_string(),
                ingredients: vec!["pork".to_string(), "pineapple".to_string()],
                rating: 0.0,
                active: true,
            })
            .await
            .unwrap();

        let patched = state
            .store
            .update_menu_item(
                item.id,
                MenuItemPatch {
                    price: Some(13.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(patched.price, 13.0);
        assert_eq!(patched.name.en, "Tacos al Pastor");

        assert!(state.store.delete_menu_item(item.id).await.unwrap());
        let listed = state.store.list_menu_items().await.unwrap();
        assert!(listed.iter().all(|m| m.id != item.id));
    }

    #[tokio::test]
    async fn spiciness_payload_rejects_out_of_range_level() {
        let payload = NewSpiciness {
            level: 9,
            name: "Nuclear".to_string(),
            emoji: "🔥".to_string(),
            translations: localized("Nuclear", "Nuclear"),
            active: true,
        };
        assert!(payload.validate().is_err());
    }

    #[tokio::test]
    async fn public_lists_expose_only_active_rows() {
        let state = AppState::demo();
        let flavors = state.store.list_flavors().await.unwrap();
        let target = flavors[0].id;
        assert!(state.store.delete_flavor(target).await.unwrap());
        let after = state.store.list_flavors().await.unwrap();
        assert_eq!(after.len(), flavors.len() - 1);
        assert!(after.iter().all(|f| f.id != target));
    }
}
