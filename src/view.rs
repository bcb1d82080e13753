use log::debug;

use crate::identity::Id;
use crate::model::RecipeRecord;

/// A view's local copies of mutable records. Mutations must reach every copy
/// of a record the view holds (list row and open detail together), otherwise
/// a card and its open modal drift apart.
pub trait RecordView {
    type Record;

    /// Read from the first copy matching `id`.
    fn with_record<T>(&self, id: &Id, f: impl FnOnce(&Self::Record) -> T) -> Option<T>;

    /// Apply `f` to every copy matching `id`.
    fn apply_all(&mut self, id: &Id, f: &mut dyn FnMut(&mut Self::Record));
}

/// Token tying hydration results to the load that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadToken(u64);

/// Page-level list state: the record list plus the optional open detail copy.
///
/// Reloads are guarded by a generation counter: `begin_load` supersedes any
/// in-flight load, and `commit` discards results whose token is stale. That
/// keeps a late response for old search input from overwriting newer results.
#[derive(Debug, Default)]
pub struct FeedView {
    records: Vec<RecipeRecord>,
    detail: Option<RecipeRecord>,
    generation: u64,
}

impl FeedView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a (re)load, superseding any load still in flight.
    pub fn begin_load(&mut self) -> LoadToken {
        self.generation += 1;
        LoadToken(self.generation)
    }

    /// Commit hydrated records if the owning load is still the latest.
    /// Returns false (and drops the records) when it has been superseded.
    pub fn commit(&mut self, token: LoadToken, records: Vec<RecipeRecord>) -> bool {
        if token.0 != self.generation {
            debug!("discarding stale load (token {} < {})", token.0, self.generation);
            return false;
        }
        self.records = records;
        self.detail = None;
        true
    }

    pub fn records(&self) -> &[RecipeRecord] {
        &self.records
    }

    /// Open the detail view for one record, cloning it from the list.
    pub fn open_detail(&mut self, id: &Id) -> bool {
        match self.records.iter().find(|r| r.id == *id) {
            Some(record) => {
                self.detail = Some(record.clone());
                true
            }
            None => false,
        }
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    pub fn detail(&self) -> Option<&RecipeRecord> {
        self.detail.as_ref()
    }
}

impl RecordView for FeedView {
    type Record = RecipeRecord;

    fn with_record<T>(&self, id: &Id, f: impl FnOnce(&RecipeRecord) -> T) -> Option<T> {
        self.records
            .iter()
            .find(|r| r.id == *id)
            .or(self.detail.as_ref().filter(|r| r.id == *id))
            .map(f)
    }

    fn apply_all(&mut self, id: &Id, f: &mut dyn FnMut(&mut RecipeRecord)) {
        for record in self.records.iter_mut().filter(|r| r.id == *id) {
            f(record);
        }
        if let Some(detail) = self.detail.as_mut().filter(|r| r.id == *id) {
            f(detail);
        }
    }
}

/// Follow relation between the viewer and one other user, as held by a
/// profile view.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowState {
    pub user_id: Id,
    pub is_following: bool,
    pub follow_record_id: Option<Id>,
}

impl FollowState {
    pub fn new(user_id: Id) -> Self {
        Self {
            user_id,
            is_following: false,
            follow_record_id: None,
        }
    }
}

impl RecordView for FollowState {
    type Record = FollowState;

    fn with_record<T>(&self, id: &Id, f: impl FnOnce(&FollowState) -> T) -> Option<T> {
        (self.user_id == *id).then(|| f(self))
    }

    fn apply_all(&mut self, id: &Id, f: &mut dyn FnMut(&mut FollowState)) {
        if self.user_id == *id {
            f(self);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::Normalizer;
    use serde_json::json;

    fn record(id: i64) -> RecipeRecord {
        Normalizer::new("http://api:8001")
            .normalize(&json!({"id": id, "name": format!("r{id}")}))
            .unwrap()
    }

    #[test]
    fn test_commit_accepts_current_token() {
        let mut view = FeedView::new();
        let token = view.begin_load();
        assert!(view.commit(token, vec![record(1)]));
        assert_eq!(view.records().len(), 1);
    }

    #[test]
    fn test_commit_discards_superseded_load() {
        let mut view = FeedView::new();
        let stale = view.begin_load();
        let fresh = view.begin_load();
        assert!(!view.commit(stale, vec![record(1)]));
        assert!(view.records().is_empty());
        assert!(view.commit(fresh, vec![record(2)]));
        assert_eq!(view.records()[0].id, Id::Int(2));
    }

    #[test]
    fn test_apply_all_updates_list_and_detail_together() {
        let mut view = FeedView::new();
        let token = view.begin_load();
        view.commit(token, vec![record(1), record(2)]);
        assert!(view.open_detail(&Id::Int(1)));

        view.apply_all(&Id::Int(1), &mut |r| r.is_liked_by_viewer = true);

        assert!(view.records()[0].is_liked_by_viewer);
        assert!(!view.records()[1].is_liked_by_viewer);
        assert!(view.detail().unwrap().is_liked_by_viewer);
    }

    #[test]
    fn test_open_detail_unknown_id() {
        let mut view = FeedView::new();
        assert!(!view.open_detail(&Id::Int(9)));
        assert!(view.detail().is_none());
    }
}
