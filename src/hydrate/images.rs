use async_trait::async_trait;
use log::{error, warn};
use serde_json::Value;
use tokio::task::JoinSet;

use crate::error::ClientError;
use crate::identity::Id;
use crate::model::RecipeRecord;
use crate::normalize::Normalizer;
use crate::services::RecipeService;

/// Collaborator that fetches the full recipe detail for one id. Injected so
/// views (and tests) control where detail payloads come from.
#[async_trait]
pub trait DetailFetcher: Send + Sync {
    async fn fetch_detail(&self, id: &Id) -> Result<Value, ClientError>;
}

#[async_trait]
impl DetailFetcher for RecipeService {
    async fn fetch_detail(&self, id: &Id) -> Result<Value, ClientError> {
        self.recipe_detail(id).await
    }
}

/// Fetch detail for records missing an image and merge the image data in.
///
/// Records already carrying an image pass through with no network call.
/// The detail payload is merged over the record's own fields and the result
/// re-normalized; fields the detail payload does not carry (hydrated author
/// and social state) survive the merge. A failed fetch leaves the record as
/// it was.
pub async fn hydrate_missing_images<F>(
    fetcher: &F,
    normalizer: &Normalizer,
    mut records: Vec<RecipeRecord>,
) -> Vec<RecipeRecord>
where
    F: DetailFetcher + Clone + 'static,
{
    let mut tasks = JoinSet::new();
    for (index, record) in records.iter().enumerate() {
        if record.has_image() {
            continue;
        }
        let fetcher = fetcher.clone();
        let id = record.id.clone();
        tasks.spawn(async move {
            let result = fetcher.fetch_detail(&id).await;
            (index, result)
        });
    }

    let mut details: Vec<Option<Value>> = (0..records.len()).map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, Ok(detail))) => details[index] = Some(detail),
            Ok((index, Err(err))) => {
                warn!("detail fetch failed for recipe {}: {err}", records[index].id)
            }
            Err(err) => error!("image hydration task failed: {err}"),
        }
    }

    for (record, detail) in records.iter_mut().zip(details) {
        let Some(Value::Object(detail)) = detail else {
            continue;
        };
        let Ok(Value::Object(mut merged)) = serde_json::to_value(&*record) else {
            continue;
        };
        for (key, value) in detail {
            merged.insert(key, value);
        }
        if let Some(renormalized) = normalizer.normalize(&Value::Object(merged)) {
            *record = renormalized;
        }
    }

    records
}
