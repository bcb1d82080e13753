use log::{error, warn};
use tokio::task::JoinSet;

use crate::error::ClientError;
use crate::identity::Id;
use crate::model::RecipeRecord;
use crate::services::SocialService;

/// Fill `is_liked_by_viewer` and `like_record_id` via one "my like" lookup
/// per record. Absence of a like record (404) is a normal "not liked"
/// outcome; a failed lookup leaves the record unchanged.
pub async fn hydrate_likes(
    social: &SocialService,
    mut records: Vec<RecipeRecord>,
) -> Vec<RecipeRecord> {
    let results = fan_out(social, &records, |social, id| async move {
        social.my_like(&id).await
    })
    .await;

    for (record, result) in records.iter_mut().zip(results) {
        match result {
            Some(Ok(handle)) => {
                record.is_liked_by_viewer = handle.is_some();
                record.like_record_id = handle;
            }
            Some(Err(err)) => warn!("like lookup failed for recipe {}: {err}", record.id),
            None => {}
        }
    }
    records
}

/// Same pattern for saves: `is_saved_by_viewer` and `saved_record_id`.
pub async fn hydrate_saved(
    social: &SocialService,
    mut records: Vec<RecipeRecord>,
) -> Vec<RecipeRecord> {
    let results = fan_out(social, &records, |social, id| async move {
        social.my_save(&id).await
    })
    .await;

    for (record, result) in records.iter_mut().zip(results) {
        match result {
            Some(Ok(handle)) => {
                record.is_saved_by_viewer = handle.is_some();
                record.saved_record_id = handle;
            }
            Some(Err(err)) => warn!("save lookup failed for recipe {}: {err}", record.id),
            None => {}
        }
    }
    records
}

/// Fill the aggregate `like_count` per record. Independent of the viewer;
/// on failure the previous count is kept.
pub async fn hydrate_like_counts(
    social: &SocialService,
    mut records: Vec<RecipeRecord>,
) -> Vec<RecipeRecord> {
    let results = fan_out(social, &records, |social, id| async move {
        social.like_count(&id).await
    })
    .await;

    for (record, result) in records.iter_mut().zip(results) {
        match result {
            Some(Ok(count)) => record.like_count = count,
            Some(Err(err)) => warn!("like count failed for recipe {}: {err}", record.id),
            None => {}
        }
    }
    records
}

/// One call per record, issued concurrently, results reassembled in record
/// order. No cross-record dedup: each recipe's social state is unique to it.
async fn fan_out<T, F, Fut>(
    social: &SocialService,
    records: &[RecipeRecord],
    call: F,
) -> Vec<Option<Result<T, ClientError>>>
where
    T: Send + 'static,
    F: Fn(SocialService, Id) -> Fut,
    Fut: std::future::Future<Output = Result<T, ClientError>> + Send + 'static,
{
    let mut tasks = JoinSet::new();
    for (index, record) in records.iter().enumerate() {
        let future = call(social.clone(), record.id.clone());
        tasks.spawn(async move { (index, future.await) });
    }

    let mut results: Vec<Option<Result<T, ClientError>>> =
        (0..records.len()).map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => results[index] = Some(result),
            Err(err) => error!("social hydration task failed: {err}"),
        }
    }
    results
}
