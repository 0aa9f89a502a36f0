//! Customer reviews with an admin moderation queue.

pub mod handlers;

pub use handlers::{admin_router, public_router};

#[cfg(test)]
mod tests {
    use crate::models::{NewReview, ReviewPatch};
    use crate::state::AppState;

    #[tokio::test]
    async fn review_is_hidden_until_approved() {
        let state = AppState::demo();
        let item = state.store.list_menu_items().await.unwrap().remove(0);
        let review = state
            .store
            .create_review(NewReview {
                menu_item_id: item.id,
                user_name: "Dana".to_string(),
                rating: 5,
                comment: "Incredible".to_string(),
            })
            .await
            .unwrap();
        assert!(!review.is_approved);

        let public = state.store.list_reviews_for_item(item.id, true).await.unwrap();
        assert!(public.is_empty());

        state
            .store
            .update_review(review.id, ReviewPatch::approved())
            .await
            .unwrap()
            .unwrap();
        let public = state.store.list_reviews_for_item(item.id, true).await.unwrap();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].id, review.id);
    }

    #[tokio::test]
    async fn delete_removes_review_for_admins_too() {
        let state = AppState::demo();
        let item = state.store.list_menu_items().await.unwrap().remove(0);
        let review = state
            .store
            .create_review(NewReview {
                menu_item_id: item.id,
                user_name: "Eli".to_string(),
                rating: 2,
                comment: "Too salty".to_string(),
            })
            .await
            .unwrap();

        assert!(state.store.delete_review(review.id).await.unwrap());
        let all = state.store.list_reviews(false).await.unwrap();
        assert!(all.iter().all(|r| r.id != review.id));
    }

    #[test]
    fn payload_rejects_blank_name_and_bad_rating() {
        let base = NewReview {
            menu_item_id: uuid::Uuid::new_v4(),
            user_name: "   ".to_string(),
            rating: 4,
            comment: "ok".to_string(),
        };
        assert!(base.validate().is_err());

        let bad_rating = NewReview {
            user_name: "Ana".to_string(),
            rating: 6,
            ..base
        };
        assert!(bad_rating.validate().is_err());
    }
}
