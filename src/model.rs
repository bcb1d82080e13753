use serde::{Deserialize, Serialize};

use crate::identity::Id;

/// Ingredient measurement unit. Unknown units coming from older recipe
/// payloads collapse into `Pcs` instead of failing the whole ingredient list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    G,
    Kg,
    Ml,
    L,
    Tsp,
    Tbsp,
    Cup,
    #[serde(other)]
    Pcs,
}

fn default_unit() -> Unit {
    Unit::Pcs
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default = "default_unit")]
    pub unit: Unit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[serde(alias = "Breakfast")]
    Breakfast,
    #[serde(alias = "Lunch")]
    Lunch,
    #[serde(alias = "Dinner")]
    Dinner,
    #[serde(alias = "Snack")]
    Snack,
    #[serde(alias = "Dessert")]
    Dessert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[serde(alias = "Public")]
    Public,
    #[serde(alias = "Private")]
    Private,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default, alias = "comment_id")]
    pub id: Option<Id>,
    #[serde(default, alias = "user_id")]
    pub author_id: Option<Id>,
    #[serde(default, alias = "username")]
    pub author_name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
}

/// The canonical recipe shape every downstream consumer depends on,
/// regardless of which endpoint produced the raw payload.
///
/// `author_name`/`author_username` use the empty string as a "not yet
/// resolved" sentinel, not an error. `like_record_id`/`saved_record_id` are
/// the opaque social-service handles needed to reverse a like/save; they may
/// be `None` until independently confirmed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeRecord {
    pub id: Id,
    pub name: Option<String>,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub keywords: Option<String>,
    /// Durations kept in the source `HH:MM:SS` string form.
    pub cooking_time: Option<String>,
    pub total_time: Option<String>,
    pub servings: Option<u32>,
    pub ingredients: Vec<Ingredient>,
    pub category: Option<Category>,
    pub visibility: Option<Visibility>,
    pub created_at: Option<String>,
    pub author_id: Option<Id>,
    pub author_name: String,
    pub author_username: String,
    pub author_avatar: Option<String>,
    pub image_url: Option<String>,
    pub is_liked_by_viewer: bool,
    pub is_saved_by_viewer: bool,
    pub like_record_id: Option<Id>,
    pub saved_record_id: Option<Id>,
    pub like_count: u64,
    pub comments: Vec<Comment>,
}

impl RecipeRecord {
    pub fn has_image(&self) -> bool {
        self.image_url.as_deref().is_some_and(|url| !url.is_empty())
    }
}

/// User-service profile, read-mostly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub public_name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub name: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default = "default_unit")]
    pub unit: Unit,
}

/// Shopping cart. `shopping_list` is derived server-side from `recipe_ids`
/// (the aggregated ingredient list) and is never edited independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(alias = "cart_id")]
    pub id: Id,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub recipe_ids: Vec<Id>,
    #[serde(default)]
    pub shopping_list: Vec<ShoppingItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_tolerates_unknown_values() {
        let unit: Unit = serde_json::from_str("\"g\"").unwrap();
        assert_eq!(unit, Unit::G);

        let unit: Unit = serde_json::from_str("\"handful\"").unwrap();
        assert_eq!(unit, Unit::Pcs);
    }

    #[test]
    fn test_category_accepts_capitalized_alias() {
        let cat: Category = serde_json::from_str("\"Dinner\"").unwrap();
        assert_eq!(cat, Category::Dinner);
        let cat: Category = serde_json::from_str("\"dinner\"").unwrap();
        assert_eq!(cat, Category::Dinner);
    }

    #[test]
    fn test_comment_aliases() {
        let comment: Comment = serde_json::from_str(
            r#"{"comment_id": 5, "user_id": 3, "username": "ana", "content": "yum"}"#,
        )
        .unwrap();
        assert_eq!(comment.id, Some(Id::Int(5)));
        assert_eq!(comment.author_id, Some(Id::Int(3)));
        assert_eq!(comment.author_name, "ana");
    }

    #[test]
    fn test_cart_defaults() {
        let cart: Cart = serde_json::from_str(r#"{"cart_id": 1, "name": "weekly"}"#).unwrap();
        assert_eq!(cart.id, Id::Int(1));
        assert!(cart.recipe_ids.is_empty());
        assert!(cart.shopping_list.is_empty());
    }
}
