use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Canonical identifier used across all services.
///
/// The backends are inconsistent: the recipe service hands out integer ids
/// while the social service sometimes returns string handles. Both compare
/// and hash by value so they can key maps and sets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Int(i64),
    Str(String),
}

impl Id {
    /// Extract an `Id` from a bare JSON scalar. Empty strings and
    /// non-integer numbers are not usable as identifiers.
    pub fn from_value(value: &Value) -> Option<Id> {
        match value {
            Value::Number(n) => n.as_i64().map(Id::Int),
            Value::String(s) if !s.is_empty() => Some(Id::Str(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Int(n) => write!(f, "{n}"),
            Id::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Id::Int(n)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::Str(s.to_string())
    }
}

/// Resolve the canonical recipe id from a payload of uncertain shape.
///
/// Precedence is fixed: top-level `id`, then top-level `recipe_id`, then the
/// same pair under a nested `recipe` object. A bare scalar is returned as-is.
/// Returns `None` when no id-bearing field exists; callers must skip such
/// records rather than substitute a fallback value.
pub fn resolve_id(candidate: &Value) -> Option<Id> {
    match candidate {
        Value::Number(_) | Value::String(_) => Id::from_value(candidate),
        Value::Object(map) => {
            for key in ["id", "recipe_id"] {
                if let Some(id) = map.get(key).and_then(Id::from_value) {
                    return Some(id);
                }
            }
            let nested = map.get("recipe")?;
            for key in ["id", "recipe_id"] {
                if let Some(id) = nested.get(key).and_then(Id::from_value) {
                    return Some(id);
                }
            }
            None
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_top_level_id_wins_over_recipe_id() {
        let value = json!({"id": 1, "recipe_id": 2});
        assert_eq!(resolve_id(&value), Some(Id::Int(1)));
    }

    #[test]
    fn test_recipe_id_wins_over_nested() {
        let value = json!({"recipe_id": 2, "recipe": {"id": 3}});
        assert_eq!(resolve_id(&value), Some(Id::Int(2)));
    }

    #[test]
    fn test_nested_id_used_as_last_resort() {
        let value = json!({"recipe": {"id": 3}});
        assert_eq!(resolve_id(&value), Some(Id::Int(3)));

        let value = json!({"recipe": {"recipe_id": 4}});
        assert_eq!(resolve_id(&value), Some(Id::Int(4)));
    }

    #[test]
    fn test_bare_scalar_passes_through() {
        assert_eq!(resolve_id(&json!(7)), Some(Id::Int(7)));
        assert_eq!(resolve_id(&json!("abc")), Some(Id::Str("abc".to_string())));
    }

    #[test]
    fn test_unresolvable_inputs() {
        assert_eq!(resolve_id(&json!(null)), None);
        assert_eq!(resolve_id(&json!({})), None);
        assert_eq!(resolve_id(&json!({"name": "soup"})), None);
        assert_eq!(resolve_id(&json!({"id": ""})), None);
        assert_eq!(resolve_id(&json!([1, 2])), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Id::Int(42).to_string(), "42");
        assert_eq!(Id::from("u-9").to_string(), "u-9");
    }
}
