//! Generic per-collection reconciliation
//!
//! Registry exports are full snapshots, not deltas. For every satellite
//! collection the same state machine runs: match each incoming row against
//! the persisted rows by an identity key, stage changed-field saves for
//! matches, stage inserts for the rest, and retire every persisted row the
//! snapshot no longer mentions. This module implements that machine once;
//! each entity type supplies its key extractor and field comparator.

/// Staged outcome of reconciling one collection
#[derive(Debug, Clone)]
pub struct ReconcilePlan<T> {
    /// Incoming rows with no persisted match
    pub to_create: Vec<T>,
    /// Matched rows whose fields changed, with the changed field names
    pub to_save: Vec<(T, Vec<&'static str>)>,
    /// Persisted rows absent from the snapshot, to be soft-deleted
    pub to_retire: Vec<T>,
}

impl<T> Default for ReconcilePlan<T> {
    fn default() -> Self {
        Self {
            to_create: Vec::new(),
            to_save: Vec::new(),
            to_retire: Vec::new(),
        }
    }
}

impl<T> ReconcilePlan<T> {
    /// True when the snapshot matches persisted state exactly
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_save.is_empty() && self.to_retire.is_empty()
    }
}

/// Diff `incoming` against `existing`.
///
/// `key` is the identity of a row within its company — matching is by
/// identity key, never full-field equality, so a changed row is still
/// recognized as the same logical entity. `merge` copies changed fields
/// from the incoming row onto the stored one and returns their names;
/// an empty list means the row is untouched and no write is staged.
pub fn diff_collection<T, K, FK, FM>(
    incoming: Vec<T>,
    mut existing: Vec<T>,
    key: FK,
    merge: FM,
) -> ReconcilePlan<T>
where
    K: PartialEq,
    FK: Fn(&T) -> K,
    FM: Fn(&mut T, &T) -> Vec<&'static str>,
{
    let mut plan = ReconcilePlan::default();
    for item in incoming {
        let item_key = key(&item);
        match existing.iter().position(|stored| key(stored) == item_key) {
            Some(idx) => {
                let mut stored = existing.remove(idx);
                let changed = merge(&mut stored, &item);
                if !changed.is_empty() {
                    plan.to_save.push((stored, changed));
                }
            }
            None => plan.to_create.push(item),
        }
    }
    plan.to_retire = existing;
    plan
}
