pub mod config;
pub mod error;
pub mod hydrate;
pub mod identity;
pub mod model;
pub mod mutate;
pub mod normalize;
pub mod services;
pub mod store;
pub mod view;

pub use config::ClientConfig;
pub use error::ClientError;
pub use hydrate::Hydrator;
pub use identity::{resolve_id, Id};
pub use model::{Cart, Comment, Ingredient, RecipeRecord, User};
pub use mutate::{toggle_relation, FollowOps, LikeOps, SaveOps, ToggleOps, ToggleOutcome};
pub use normalize::Normalizer;
pub use services::Services;
pub use store::RecordStore;
pub use view::{FeedView, FollowState, LoadToken, RecordView};

/// Fetch and fully hydrate the personalized feed.
pub async fn load_feed(services: &Services) -> Result<Vec<RecipeRecord>, ClientError> {
    let raw = services.search.feed().await?;
    Ok(Hydrator::new(services.clone()).run(&raw).await)
}

/// Fetch and fully hydrate the public explore list.
pub async fn load_explore(services: &Services) -> Result<Vec<RecipeRecord>, ClientError> {
    let raw = services.search.explore().await?;
    Ok(Hydrator::new(services.clone()).run(&raw).await)
}

/// Fetch and hydrate one user's recipes.
pub async fn load_user_recipes(
    services: &Services,
    user_id: &Id,
) -> Result<Vec<RecipeRecord>, ClientError> {
    let raw = services.recipes.recipes_by_user(user_id).await?;
    Ok(Hydrator::new(services.clone()).run(&raw).await)
}

/// Detail lookup backed by the shared record store: a fresh cached record is
/// returned without any network traffic, a miss fetches and hydrates the
/// detail and caches it.
pub async fn cached_detail(
    services: &Services,
    store: &mut RecordStore,
    id: &Id,
) -> Result<Option<RecipeRecord>, ClientError> {
    if let Some(record) = store.get(id) {
        return Ok(Some(record.clone()));
    }
    let raw = services.recipes.recipe_detail(id).await?;
    let record = Hydrator::new(services.clone()).run_one(&raw).await;
    if let Some(record) = &record {
        store.put(record.clone());
    }
    Ok(record)
}
