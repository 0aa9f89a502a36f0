//! Per-platform share counters for menu items.

pub mod handlers;

pub use handlers::router;

#[cfg(test)]
mod tests {
    use crate::state::AppState;

    #[tokio::test]
    async fn repeated_shares_bump_one_counter() {
        let state = AppState::demo();
        let item = state.store.list_menu_items().await.unwrap().remove(0);

        let first = state.store.increment_share(item.id, "twitter").await.unwrap();
        assert_eq!(first.share_count, 1);

        let second = state.store.increment_share(item.id, "twitter").await.unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.share_count, 2);
        assert!(second.last_shared_at >= first.last_shared_at);

        let shares = state.store.list_shares_for_item(item.id).await.unwrap();
        assert_eq!(shares.len(), 1);
    }

    #[tokio::test]
    async fn platforms_are_tracked_independently() {
        let state = AppState::demo();
        let item = state.store.list_menu_items().await.unwrap().remove(0);

        state.store.increment_share(item.id, "twitter").await.unwrap();
        state.store.increment_share(item.id, "facebook").await.unwrap();

        let shares = state.store.list_shares_for_item(item.id).await.unwrap();
        assert_eq!(shares.len(), 2);
        assert!(shares.iter().all(|s| s.share_count == 1));
    }
}
