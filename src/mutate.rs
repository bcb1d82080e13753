use async_trait::async_trait;
use log::{debug, error, warn};
use serde_json::Value;

use crate::error::ClientError;
use crate::identity::{resolve_id, Id};
use crate::model::{Comment, RecipeRecord};
use crate::services::SocialService;
use crate::view::{FollowState, RecordView};

/// Lifecycle of one (target, viewer) relation during a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationState {
    Unset,
    PendingCreate,
    Set,
    PendingDelete,
}

impl RelationState {
    pub fn of(set: bool) -> Self {
        if set {
            RelationState::Set
        } else {
            RelationState::Unset
        }
    }

    /// The in-flight state entered when the viewer toggles.
    pub fn pending(self) -> Self {
        match self {
            RelationState::Unset => RelationState::PendingCreate,
            RelationState::Set => RelationState::PendingDelete,
            other => other,
        }
    }

    /// The state after the request settles. A failure returns to the state
    /// the toggle started from.
    pub fn settled(self, ok: bool) -> Self {
        match (self, ok) {
            (RelationState::PendingCreate, true) => RelationState::Set,
            (RelationState::PendingCreate, false) => RelationState::Unset,
            (RelationState::PendingDelete, true) => RelationState::Unset,
            (RelationState::PendingDelete, false) => RelationState::Set,
            (other, _) => other,
        }
    }
}

/// Per-resource-kind collaborators for the shared toggle protocol. One
/// implementation per relation (like, save, follow) instead of re-writing
/// the snapshot/flip/request/reconcile sequence at every call site.
#[async_trait]
pub trait ToggleOps: Send + Sync {
    type Record;

    fn kind(&self) -> &'static str;

    fn is_set(&self, record: &Self::Record) -> bool;

    fn handle(&self, record: &Self::Record) -> Option<Id>;

    /// Write the boolean and handle onto one local copy.
    fn apply(&self, record: &mut Self::Record, set: bool, handle: Option<Id>);

    fn apply_count(&self, _record: &mut Self::Record, _count: u64) {}

    /// Lazily fetch the server-side handle when none is cached; needed
    /// before a delete (a set relation must always yield a handle somehow).
    async fn fetch_handle(&self, target: &Id) -> Result<Option<Id>, ClientError>;

    async fn create(&self, target: &Id) -> Result<Id, ClientError>;

    async fn delete(&self, handle: &Id) -> Result<(), ClientError>;

    /// Post-settle aggregate refresh; only likes carry a count.
    async fn count(&self, _target: &Id) -> Option<u64> {
        None
    }
}

/// Outcome of a settled toggle, with the authoritative handle and count.
#[derive(Debug, Clone, PartialEq)]
pub struct ToggleOutcome {
    pub state: RelationState,
    pub handle: Option<Id>,
    pub count: Option<u64>,
}

/// The optimistic toggle protocol shared by every like/save/follow call site:
///
/// 1. resolve the canonical id; abort silently if unresolved or the view
///    holds no copy of the target;
/// 2. snapshot the current boolean and handle;
/// 3. flip optimistically in every local copy the view holds;
/// 4. issue the create, or the delete using the snapshotted (or lazily
///    fetched) handle;
/// 5. on a successful create, merge the server-returned handle everywhere;
/// 6. on failure, revert the flip, restore the handle and surface the error;
/// 7. re-fetch the aggregate count after settling (never adjusted
///    optimistically).
pub async fn toggle_relation<O, V>(
    ops: &O,
    view: &mut V,
    candidate: &Value,
) -> Result<Option<ToggleOutcome>, ClientError>
where
    O: ToggleOps,
    V: RecordView<Record = O::Record>,
{
    let Some(id) = resolve_id(candidate) else {
        debug!("{} toggle ignored: no resolvable id", ops.kind());
        return Ok(None);
    };
    let Some((was_set, prev_handle)) = view.with_record(&id, |r| (ops.is_set(r), ops.handle(r)))
    else {
        debug!("{} toggle ignored: {} not in view", ops.kind(), id);
        return Ok(None);
    };
    let state = RelationState::of(was_set).pending();

    // Optimistic flip in every copy. Turning off clears the handle; turning
    // on keeps whatever handle a copy already carries until the server
    // returns the authoritative one.
    view.apply_all(&id, &mut |r| {
        let kept = if was_set { None } else { ops.handle(r) };
        ops.apply(r, !was_set, kept);
    });

    let result = if was_set {
        delete_flow(ops, &id, prev_handle.clone()).await
    } else {
        ops.create(&id).await.map(Some)
    };

    match result {
        Ok(new_handle) => {
            if let Some(handle) = &new_handle {
                view.apply_all(&id, &mut |r| ops.apply(r, true, Some(handle.clone())));
            }
            let count = ops.count(&id).await;
            if let Some(count) = count {
                view.apply_all(&id, &mut |r| ops.apply_count(r, count));
            }
            Ok(Some(ToggleOutcome {
                state: state.settled(true),
                handle: new_handle,
                count,
            }))
        }
        Err(err) => {
            error!("{} toggle failed for {}: {}", ops.kind(), id, err);
            view.apply_all(&id, &mut |r| ops.apply(r, was_set, prev_handle.clone()));
            Err(err)
        }
    }
}

/// Delete path: a set relation without a cached handle fetches it first.
/// If the server reports no relation either, there is nothing to delete and
/// the optimistic "unset" already matches reality.
async fn delete_flow<O: ToggleOps>(
    ops: &O,
    target: &Id,
    prev_handle: Option<Id>,
) -> Result<Option<Id>, ClientError> {
    let handle = match prev_handle {
        Some(handle) => Some(handle),
        None => ops.fetch_handle(target).await?,
    };
    if let Some(handle) = handle {
        ops.delete(&handle).await?;
    }
    Ok(None)
}

pub struct LikeOps {
    social: SocialService,
}

impl LikeOps {
    pub fn new(social: SocialService) -> Self {
        Self { social }
    }
}

#[async_trait]
impl ToggleOps for LikeOps {
    type Record = RecipeRecord;

    fn kind(&self) -> &'static str {
        "like"
    }

    fn is_set(&self, record: &RecipeRecord) -> bool {
        record.is_liked_by_viewer
    }

    fn handle(&self, record: &RecipeRecord) -> Option<Id> {
        record.like_record_id.clone()
    }

    fn apply(&self, record: &mut RecipeRecord, set: bool, handle: Option<Id>) {
        record.is_liked_by_viewer = set;
        record.like_record_id = handle;
    }

    fn apply_count(&self, record: &mut RecipeRecord, count: u64) {
        record.like_count = count;
    }

    async fn fetch_handle(&self, target: &Id) -> Result<Option<Id>, ClientError> {
        self.social.my_like(target).await
    }

    async fn create(&self, target: &Id) -> Result<Id, ClientError> {
        self.social.create_like(target).await
    }

    async fn delete(&self, handle: &Id) -> Result<(), ClientError> {
        self.social.delete_like(handle).await
    }

    async fn count(&self, target: &Id) -> Option<u64> {
        match self.social.like_count(target).await {
            Ok(count) => Some(count),
            Err(err) => {
                warn!("like count refresh failed for {target}: {err}");
                None
            }
        }
    }
}

pub struct SaveOps {
    social: SocialService,
}

impl SaveOps {
    pub fn new(social: SocialService) -> Self {
        Self { social }
    }
}

#[async_trait]
impl ToggleOps for SaveOps {
    type Record = RecipeRecord;

    fn kind(&self) -> &'static str {
        "save"
    }

    fn is_set(&self, record: &RecipeRecord) -> bool {
        record.is_saved_by_viewer
    }

    fn handle(&self, record: &RecipeRecord) -> Option<Id> {
        record.saved_record_id.clone()
    }

    fn apply(&self, record: &mut RecipeRecord, set: bool, handle: Option<Id>) {
        record.is_saved_by_viewer = set;
        record.saved_record_id = handle;
    }

    async fn fetch_handle(&self, target: &Id) -> Result<Option<Id>, ClientError> {
        self.social.my_save(target).await
    }

    async fn create(&self, target: &Id) -> Result<Id, ClientError> {
        self.social.create_save(target).await
    }

    async fn delete(&self, handle: &Id) -> Result<(), ClientError> {
        self.social.delete_save(handle).await
    }
}

pub struct FollowOps {
    social: SocialService,
}

impl FollowOps {
    pub fn new(social: SocialService) -> Self {
        Self { social }
    }
}

#[async_trait]
impl ToggleOps for FollowOps {
    type Record = FollowState;

    fn kind(&self) -> &'static str {
        "follow"
    }

    fn is_set(&self, record: &FollowState) -> bool {
        record.is_following
    }

    fn handle(&self, record: &FollowState) -> Option<Id> {
        record.follow_record_id.clone()
    }

    fn apply(&self, record: &mut FollowState, set: bool, handle: Option<Id>) {
        record.is_following = set;
        record.follow_record_id = handle;
    }

    async fn fetch_handle(&self, target: &Id) -> Result<Option<Id>, ClientError> {
        self.social.my_follow(target).await
    }

    async fn create(&self, target: &Id) -> Result<Id, ClientError> {
        self.social.create_follow(target).await
    }

    async fn delete(&self, handle: &Id) -> Result<(), ClientError> {
        self.social.delete_follow(handle).await
    }
}

/// Optimistically append a comment, then reconcile with the stored comment
/// returned by the server. On failure the pending comment is removed again.
pub async fn post_comment<V>(
    social: &SocialService,
    view: &mut V,
    candidate: &Value,
    content: &str,
) -> Result<Option<Comment>, ClientError>
where
    V: RecordView<Record = RecipeRecord>,
{
    let Some(id) = resolve_id(candidate) else {
        debug!("comment ignored: no resolvable id");
        return Ok(None);
    };
    if view.with_record(&id, |_| ()).is_none() {
        return Ok(None);
    }

    let pending = Comment {
        id: None,
        author_id: None,
        author_name: String::new(),
        content: content.to_string(),
        created_at: None,
    };
    view.apply_all(&id, &mut |r| r.comments.push(pending.clone()));

    match social.post_comment(&id, content).await {
        Ok(stored) => {
            view.apply_all(&id, &mut |r| {
                if let Some(index) = r.comments.iter().position(|c| *c == pending) {
                    r.comments[index] = stored.clone();
                }
            });
            Ok(Some(stored))
        }
        Err(err) => {
            error!("comment post failed for recipe {id}: {err}");
            view.apply_all(&id, &mut |r| {
                if let Some(index) = r.comments.iter().position(|c| *c == pending) {
                    r.comments.remove(index);
                }
            });
            Err(err)
        }
    }
}

/// Optimistically remove a comment; re-inserted at its old position if the
/// delete fails.
pub async fn delete_comment<V>(
    social: &SocialService,
    view: &mut V,
    candidate: &Value,
    comment_id: &Id,
) -> Result<bool, ClientError>
where
    V: RecordView<Record = RecipeRecord>,
{
    let Some(id) = resolve_id(candidate) else {
        return Ok(false);
    };
    let snapshot = view.with_record(&id, |r| {
        r.comments
            .iter()
            .position(|c| c.id.as_ref() == Some(comment_id))
            .map(|index| (index, r.comments[index].clone()))
    });
    let Some(Some((index, removed))) = snapshot else {
        return Ok(false);
    };

    view.apply_all(&id, &mut |r| {
        r.comments.retain(|c| c.id.as_ref() != Some(comment_id));
    });

    match social.delete_comment(comment_id).await {
        Ok(()) => Ok(true),
        Err(err) => {
            error!("comment delete failed for recipe {id}: {err}");
            view.apply_all(&id, &mut |r| {
                let at = index.min(r.comments.len());
                r.comments.insert(at, removed.clone());
            });
            Err(err)
        }
    }
}
