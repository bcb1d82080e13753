use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use tablefeed::hydrate::{hydrate_missing_images, DetailFetcher};
use tablefeed::{ClientError, Id, Normalizer};

#[derive(Clone)]
struct CountingFetcher {
    calls: Arc<AtomicUsize>,
    detail: Value,
    fail: bool,
}

impl CountingFetcher {
    fn new(detail: Value) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            detail,
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            detail: Value::Null,
            fail: true,
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DetailFetcher for CountingFetcher {
    async fn fetch_detail(&self, id: &Id) -> Result<Value, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ClientError::Status {
                status: 500,
                endpoint: format!("/recipes/{id}"),
            });
        }
        Ok(self.detail.clone())
    }
}

#[tokio::test]
async fn test_records_with_images_never_fetch_detail() {
    let normalizer = Normalizer::new("http://api:8001");
    let record = normalizer
        .normalize(&json!({"id": 1, "img": "/a.jpg"}))
        .unwrap();
    let fetcher = CountingFetcher::new(json!({}));

    let hydrated = hydrate_missing_images(&fetcher, &normalizer, vec![record]).await;

    assert_eq!(fetcher.calls(), 0);
    assert_eq!(
        hydrated[0].image_url.as_deref(),
        Some("http://api:8001/a.jpg")
    );
}

#[tokio::test]
async fn test_detail_fills_missing_image_and_keeps_hydrated_fields() {
    let normalizer = Normalizer::new("http://api:8001");
    let mut record = normalizer.normalize(&json!({"id": 1})).unwrap();
    // fields filled by earlier hydration stages must survive the merge
    record.author_name = "Tomaž Dolenc".to_string();
    record.is_liked_by_viewer = true;
    record.like_record_id = Some(Id::Int(42));

    let fetcher = CountingFetcher::new(json!({
        "id": 1,
        "img": "/detail.jpg",
        "description": "from detail"
    }));
    let hydrated = hydrate_missing_images(&fetcher, &normalizer, vec![record]).await;

    assert_eq!(fetcher.calls(), 1);
    assert_eq!(
        hydrated[0].image_url.as_deref(),
        Some("http://api:8001/detail.jpg")
    );
    assert_eq!(hydrated[0].description.as_deref(), Some("from detail"));
    assert_eq!(hydrated[0].author_name, "Tomaž Dolenc");
    assert!(hydrated[0].is_liked_by_viewer);
    assert_eq!(hydrated[0].like_record_id, Some(Id::Int(42)));
}

#[tokio::test]
async fn test_failed_detail_fetch_leaves_record_unchanged() {
    let normalizer = Normalizer::new("http://api:8001");
    let record = normalizer
        .normalize(&json!({"id": 1, "name": "soup"}))
        .unwrap();
    let fetcher = CountingFetcher::failing();

    let hydrated = hydrate_missing_images(&fetcher, &normalizer, vec![record.clone()]).await;

    assert_eq!(fetcher.calls(), 1);
    assert_eq!(hydrated[0], record);
}

#[tokio::test]
async fn test_only_imageless_records_fetch() {
    let normalizer = Normalizer::new("http://api:8001");
    let with_image = normalizer
        .normalize(&json!({"id": 1, "img": "/a.jpg"}))
        .unwrap();
    let without_image = normalizer.normalize(&json!({"id": 2})).unwrap();
    let fetcher = CountingFetcher::new(json!({"img": "/b.jpg"}));

    let hydrated =
        hydrate_missing_images(&fetcher, &normalizer, vec![with_image, without_image]).await;

    assert_eq!(fetcher.calls(), 1);
    assert_eq!(
        hydrated[1].image_url.as_deref(),
        Some("http://api:8001/b.jpg")
    );
}
