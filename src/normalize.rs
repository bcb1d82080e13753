use serde_json::{Map, Value};

use crate::identity::{resolve_id, Id};
use crate::model::{Category, Comment, Ingredient, RecipeRecord, Visibility};

/// Ordered alias table for the image field. Consulted at the top level first,
/// then under the nested `recipe` object; first match wins.
const IMAGE_ALIASES: [&str; 10] = [
    "img",
    "image_url",
    "image",
    "imageUrl",
    "thumbnail",
    "thumbnail_url",
    "image_path",
    "imagePath",
    "photo",
    "photo_url",
];

const NAME_ALIASES: [&str; 3] = ["name", "recipe_name", "title"];
const LIKED_ALIASES: [&str; 3] = ["isLiked", "is_liked", "is_liked_by_viewer"];
const SAVED_ALIASES: [&str; 3] = ["isSaved", "is_saved", "is_saved_by_viewer"];
const LIKE_COUNT_ALIASES: [&str; 3] = ["likes", "like_count", "likeCount"];
const LIKE_HANDLE_ALIASES: [&str; 3] = ["like_id", "likeId", "like_record_id"];
const SAVED_HANDLE_ALIASES: [&str; 3] = ["saved_id", "savedId", "saved_record_id"];
const AUTHOR_ID_ALIASES: [&str; 3] = ["user_id", "author_id", "userId"];

/// Maps heterogeneous recipe payloads into the canonical [`RecipeRecord`].
///
/// The services disagree on field names and nesting; the normalizer absorbs
/// all of that in one place so downstream code never touches raw JSON.
#[derive(Debug, Clone)]
pub struct Normalizer {
    recipe_host: String,
}

impl Normalizer {
    /// `recipe_host` is the recipe service base URL relative image paths are
    /// rewritten against. A trailing slash is tolerated.
    pub fn new(recipe_host: impl Into<String>) -> Self {
        let recipe_host = recipe_host.into().trim_end_matches('/').to_string();
        Self { recipe_host }
    }

    /// Normalize one raw payload. Returns `None` for null input and for
    /// records that cannot yield an id; callers skip those, never coerce.
    pub fn normalize(&self, raw: &Value) -> Option<RecipeRecord> {
        let top = raw.as_object()?;
        let id = resolve_id(raw)?;

        // Flatten a nested `recipe` object into the top level: top-level
        // fields win on conflict, nested fields fill gaps.
        let nested: Map<String, Value> = top
            .get("recipe")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        let mut base = nested.clone();
        for (key, value) in top {
            base.insert(key.clone(), value.clone());
        }

        let author_username = first_string(&base, &["author_username", "authorUsername", "username"])
            .or_else(|| first_string(&nested, &["username"]))
            .unwrap_or_default();
        let author_name = first_string(&base, &["author_name", "authorName", "public_name"])
            .or_else(|| first_string(&nested, &["public_name"]))
            .unwrap_or_else(|| author_username.clone());

        let image_url = first_string(&base, &IMAGE_ALIASES)
            .or_else(|| first_string(&nested, &IMAGE_ALIASES))
            .map(|img| self.absolute_image_url(&img));

        Some(RecipeRecord {
            id,
            name: first_string(&base, &NAME_ALIASES),
            description: first_string(&base, &["description"]),
            instructions: first_string(&base, &["instructions"]),
            keywords: first_string(&base, &["keywords"]),
            cooking_time: first_string(&base, &["cooking_time", "cookingTime", "cook_time"]),
            total_time: first_string(&base, &["total_time", "totalTime"]),
            servings: first_u64(&base, &["servings"])
                .filter(|&n| n > 0)
                .map(|n| n as u32),
            ingredients: tolerant_seq(base.get("ingredients")),
            category: base
                .get("category")
                .and_then(|v| serde_json::from_value::<Category>(v.clone()).ok()),
            visibility: base
                .get("visibility")
                .and_then(|v| serde_json::from_value::<Visibility>(v.clone()).ok()),
            created_at: first_string(&base, &["created_at", "createdAt"]),
            author_id: first_id(&base, &AUTHOR_ID_ALIASES),
            author_name,
            author_username,
            author_avatar: first_string(&base, &["author_avatar", "avatar"]),
            image_url,
            is_liked_by_viewer: first_bool(&base, &LIKED_ALIASES).unwrap_or(false),
            is_saved_by_viewer: first_bool(&base, &SAVED_ALIASES).unwrap_or(false),
            like_record_id: first_id(&base, &LIKE_HANDLE_ALIASES),
            saved_record_id: first_id(&base, &SAVED_HANDLE_ALIASES),
            like_count: first_u64(&base, &LIKE_COUNT_ALIASES).unwrap_or(0),
            comments: tolerant_seq(base.get("comments")),
        })
    }

    /// Normalize a whole list, dropping elements that yield no record.
    /// A malformed single element never aborts the batch.
    pub fn normalize_all(&self, list: &[Value]) -> Vec<RecipeRecord> {
        list.iter().filter_map(|raw| self.normalize(raw)).collect()
    }

    /// Rewrite a relative image path against the recipe service host.
    /// Scheme-prefixed URLs pass through unchanged.
    pub fn absolute_image_url(&self, raw: &str) -> String {
        if raw.starts_with("http") {
            raw.to_string()
        } else if raw.starts_with('/') {
            format!("{}{}", self.recipe_host, raw)
        } else {
            format!("{}/{}", self.recipe_host, raw)
        }
    }
}

fn first_string(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        map.get(*key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

fn first_bool(map: &Map<String, Value>, keys: &[&str]) -> Option<bool> {
    keys.iter().find_map(|key| map.get(*key).and_then(Value::as_bool))
}

fn first_u64(map: &Map<String, Value>, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|key| map.get(*key).and_then(Value::as_u64))
}

fn first_id(map: &Map<String, Value>, keys: &[&str]) -> Option<Id> {
    keys.iter().find_map(|key| map.get(*key).and_then(Id::from_value))
}

/// Deserialize an array element by element, skipping the ones that do not
/// match instead of failing the whole sequence.
fn tolerant_seq<T: serde::de::DeserializeOwned>(value: Option<&Value>) -> Vec<T> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| serde_json::from_value(item.clone()).ok())
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Unit;
    use serde_json::json;

    fn normalizer() -> Normalizer {
        Normalizer::new("http://api:8001")
    }

    #[test]
    fn test_null_input_propagates() {
        assert!(normalizer().normalize(&Value::Null).is_none());
    }

    #[test]
    fn test_missing_id_drops_record() {
        assert!(normalizer().normalize(&json!({"name": "soup"})).is_none());
    }

    #[test]
    fn test_normalize_all_drops_invalid_elements() {
        let list = vec![
            Value::Null,
            json!({"id": 1, "name": "valid"}),
            json!({"no_id": true}),
        ];
        let records = normalizer().normalize_all(&list);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, Id::Int(1));
    }

    #[test]
    fn test_nested_recipe_flattened_top_level_wins() {
        let raw = json!({
            "id": 5,
            "name": "outer name",
            "recipe": {"name": "inner name", "description": "inner desc"}
        });
        let record = normalizer().normalize(&raw).unwrap();
        assert_eq!(record.name.as_deref(), Some("outer name"));
        assert_eq!(record.description.as_deref(), Some("inner desc"));
    }

    #[test]
    fn test_image_alias_order_first_match_wins() {
        let raw = json!({"id": 1, "image_url": "/b.jpg", "img": "/a.jpg"});
        let record = normalizer().normalize(&raw).unwrap();
        assert_eq!(record.image_url.as_deref(), Some("http://api:8001/a.jpg"));
    }

    #[test]
    fn test_relative_image_resolved_against_base() {
        let raw = json!({"id": 1, "img": "/static/x.jpg"});
        let record = normalizer().normalize(&raw).unwrap();
        assert_eq!(
            record.image_url.as_deref(),
            Some("http://api:8001/static/x.jpg")
        );
    }

    #[test]
    fn test_relative_image_without_leading_slash() {
        let raw = json!({"id": 1, "img": "static/x.jpg"});
        let record = normalizer().normalize(&raw).unwrap();
        assert_eq!(
            record.image_url.as_deref(),
            Some("http://api:8001/static/x.jpg")
        );
    }

    #[test]
    fn test_absolute_image_passes_through() {
        let raw = json!({"id": 1, "img": "http://cdn.example.com/x.jpg"});
        let record = normalizer().normalize(&raw).unwrap();
        assert_eq!(
            record.image_url.as_deref(),
            Some("http://cdn.example.com/x.jpg")
        );
    }

    #[test]
    fn test_nested_image_used_when_top_level_missing() {
        let raw = json!({"recipe_id": 7, "recipe": {"img": "/a.jpg"}});
        let record = normalizer().normalize(&raw).unwrap();
        assert_eq!(record.image_url.as_deref(), Some("http://api:8001/a.jpg"));
    }

    #[test]
    fn test_camel_case_flags_preferred_over_snake_case() {
        let raw = json!({"id": 1, "isLiked": true, "is_liked": false});
        let record = normalizer().normalize(&raw).unwrap();
        assert!(record.is_liked_by_viewer);
    }

    #[test]
    fn test_flag_and_count_defaults() {
        let record = normalizer().normalize(&json!({"id": 1})).unwrap();
        assert!(!record.is_liked_by_viewer);
        assert!(!record.is_saved_by_viewer);
        assert_eq!(record.like_count, 0);
        assert!(record.comments.is_empty());
        assert!(record.like_record_id.is_none());
        assert!(record.saved_record_id.is_none());
    }

    #[test]
    fn test_author_fields_from_aliases() {
        let raw = json!({
            "id": 2,
            "user_id": 3,
            "username": "tomaz",
            "public_name": "Tomaž Dolenc"
        });
        let record = normalizer().normalize(&raw).unwrap();
        assert_eq!(record.author_id, Some(Id::Int(3)));
        assert_eq!(record.author_username, "tomaz");
        assert_eq!(record.author_name, "Tomaž Dolenc");
    }

    #[test]
    fn test_author_name_falls_back_to_username() {
        let raw = json!({"id": 2, "username": "ana"});
        let record = normalizer().normalize(&raw).unwrap();
        assert_eq!(record.author_name, "ana");
    }

    #[test]
    fn test_malformed_ingredient_skipped_not_fatal() {
        let raw = json!({
            "id": 1,
            "ingredients": [
                {"name": "flour", "amount": 500, "unit": "g"},
                42,
                {"name": "milk", "amount": 2, "unit": "cup"}
            ]
        });
        let record = normalizer().normalize(&raw).unwrap();
        assert_eq!(record.ingredients.len(), 2);
        assert_eq!(record.ingredients[0].unit, Unit::G);
    }

    #[test]
    fn test_normalize_is_idempotent_on_canonical_records() {
        let raw = json!({
            "recipe_id": 7,
            "recipe": {"img": "/a.jpg", "user_id": 3},
            "servings": 4,
            "category": "dinner",
            "cooking_time": "00:45:00",
            "likes": 12
        });
        let normalizer = normalizer();
        let once = normalizer.normalize(&raw).unwrap();
        let reserialized = serde_json::to_value(&once).unwrap();
        let twice = normalizer.normalize(&reserialized).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_handles_parsed_from_aliases() {
        let raw = json!({"id": 1, "like_id": 99, "saved_id": "s-4"});
        let record = normalizer().normalize(&raw).unwrap();
        assert_eq!(record.like_record_id, Some(Id::Int(99)));
        assert_eq!(record.saved_record_id, Some(Id::from("s-4")));
    }
}
