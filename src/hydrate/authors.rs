use std::collections::{HashMap, HashSet};

use log::error;
use tokio::task::JoinSet;

use crate::identity::Id;
use crate::model::{RecipeRecord, User};
use crate::services::UserService;

/// Fill `author_name`/`author_username` for records that only carry an
/// author id.
///
/// N records referencing K distinct authors issue exactly K user-service
/// lookups, fanned out concurrently. A failed lookup degrades that author to
/// a synthesized `User <id>` label and never aborts the batch. Records whose
/// author fields are already populated are left untouched, so re-running
/// hydration is a no-op for them.
pub async fn hydrate_authors(
    users: &UserService,
    mut records: Vec<RecipeRecord>,
) -> Vec<RecipeRecord> {
    let mut seen = HashSet::new();
    let ids: Vec<Id> = records
        .iter()
        .filter_map(|record| record.author_id.clone())
        .filter(|id| seen.insert(id.clone()))
        .collect();
    if ids.is_empty() {
        return records;
    }

    let mut lookups = JoinSet::new();
    for id in ids {
        let users = users.clone();
        lookups.spawn(async move {
            let result = users.get_user(&id).await;
            (id, result)
        });
    }

    let mut authors: HashMap<Id, User> = HashMap::new();
    while let Some(joined) = lookups.join_next().await {
        match joined {
            Ok((id, Ok(user))) => {
                authors.insert(id, user);
            }
            Ok((id, Err(err))) => error!("author lookup failed for user {id}: {err}"),
            Err(err) => error!("author lookup task failed: {err}"),
        }
    }

    for record in &mut records {
        let Some(author_id) = record.author_id.clone() else {
            continue;
        };
        let info = authors.get(&author_id);
        if record.author_name.is_empty() {
            record.author_name = info
                .map(|u| {
                    if !u.public_name.is_empty() {
                        u.public_name.clone()
                    } else {
                        u.username.clone()
                    }
                })
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| format!("User {author_id}"));
        }
        if record.author_username.is_empty() {
            record.author_username = info
                .map(|u| u.username.clone())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| author_id.to_string());
        }
        if record.author_avatar.is_none() {
            record.author_avatar = info.and_then(|u| u.avatar.clone());
        }
    }

    records
}
