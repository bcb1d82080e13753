mod authors;
mod images;
mod social;

pub use authors::hydrate_authors;
pub use images::{hydrate_missing_images, DetailFetcher};
pub use social::{hydrate_like_counts, hydrate_likes, hydrate_saved};

use serde_json::Value;

use crate::model::RecipeRecord;
use crate::normalize::Normalizer;
use crate::services::Services;

/// The full list pipeline: normalize, then hydrate authors, per-viewer
/// like/save state, like counts and missing images, in that order. Stages
/// are strictly sequential; within a stage the per-record (or per-author)
/// calls fan out concurrently.
#[derive(Debug, Clone)]
pub struct Hydrator {
    normalizer: Normalizer,
    services: Services,
}

impl Hydrator {
    pub fn new(services: Services) -> Self {
        let normalizer = Normalizer::new(services.recipes.base_url());
        Self {
            normalizer,
            services,
        }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Run the whole pipeline over raw list payloads. The liked/saved stages
    /// are skipped for anonymous viewers; their flags stay false.
    pub async fn run(&self, raw: &[Value]) -> Vec<RecipeRecord> {
        let records = self.normalizer.normalize_all(raw);
        let records = hydrate_authors(&self.services.users, records).await;
        let records = if self.services.has_viewer() {
            let records = hydrate_likes(&self.services.social, records).await;
            hydrate_saved(&self.services.social, records).await
        } else {
            records
        };
        let records = hydrate_like_counts(&self.services.social, records).await;
        hydrate_missing_images(&self.services.recipes, &self.normalizer, records).await
    }

    /// Normalize and hydrate a single detail payload.
    pub async fn run_one(&self, raw: &Value) -> Option<RecipeRecord> {
        let mut records = self.run(std::slice::from_ref(raw)).await;
        records.pop()
    }
}
