//! Instance store
//!
//! Arena of binding objects created through exposed constructors. Keys are
//! assigned by the scripting side (which also owns the release notices),
//! never generated natively — that asymmetry is a design invariant.

use gangway_core::BindingObject;
use rustc_hash::FxHashMap;

/// One stored binding object with its addressing metadata
pub struct InstanceRecord {
    id: u32,
    constructor: String,
    object: Box<dyn BindingObject>,
}

impl InstanceRecord {
    /// Wrap a freshly constructed object under a caller-assigned id
    pub fn new(id: u32, constructor: &str, object: Box<dyn BindingObject>) -> Self {
        Self {
            id,
            constructor: constructor.to_string(),
            object,
        }
    }

    /// The caller-assigned id
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Wire name of the constructor that produced this instance
    pub fn constructor(&self) -> &str {
        &self.constructor
    }

    /// Borrow the stored object
    pub fn object(&self) -> &dyn BindingObject {
        self.object.as_ref()
    }

    /// Mutably borrow the stored object
    pub fn object_mut(&mut self) -> &mut dyn BindingObject {
        self.object.as_mut()
    }
}

impl std::fmt::Debug for InstanceRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstanceRecord")
            .field("id", &self.id)
            .field("constructor", &self.constructor)
            .finish()
    }
}

/// Map of live instances, keyed by caller-assigned id
#[derive(Default)]
pub struct InstanceStore {
    records: FxHashMap<u32, InstanceRecord>,
}

impl InstanceStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record.
    ///
    /// Returns `false` without mutating anything when the id is already
    /// taken — the existing instance is never clobbered.
    pub fn add(&mut self, record: InstanceRecord) -> bool {
        match self.records.entry(record.id) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(record);
                true
            }
        }
    }

    /// Look up a record by id
    pub fn find(&self, id: u32) -> Option<&InstanceRecord> {
        self.records.get(&id)
    }

    /// Mutably look up a record by id
    pub fn find_mut(&mut self, id: u32) -> Option<&mut InstanceRecord> {
        self.records.get_mut(&id)
    }

    /// Remove a record, firing its destruction hook before returning it
    pub fn remove(&mut self, id: u32) -> Option<InstanceRecord> {
        let mut record = self.records.remove(&id)?;
        record.object_mut().on_destroyed();
        Some(record)
    }

    /// Drop every record, firing destruction hooks
    pub fn clear(&mut self) {
        for (_, mut record) in self.records.drain() {
            record.object_mut().on_destroyed();
        }
    }

    /// Number of live instances
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Widget {
        destroyed: Arc<AtomicUsize>,
    }

    impl BindingObject for Widget {
        fn on_destroyed(&mut self) {
            self.destroyed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn widget(counter: &Arc<AtomicUsize>) -> Box<dyn BindingObject> {
        Box::new(Widget {
            destroyed: counter.clone(),
        })
    }

    #[test]
    fn test_add_and_find() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut store = InstanceStore::new();
        assert!(store.add(InstanceRecord::new(7, "Widget", widget(&counter))));
        assert_eq!(store.find(7).unwrap().constructor(), "Widget");
        assert!(store.find(8).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_duplicate_id_rejected_without_clobbering() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut store = InstanceStore::new();
        assert!(store.add(InstanceRecord::new(7, "Widget", widget(&counter))));
        assert!(!store.add(InstanceRecord::new(7, "Gadget", widget(&counter))));
        // The first record survives untouched.
        assert_eq!(store.find(7).unwrap().constructor(), "Widget");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_fires_hook_once() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut store = InstanceStore::new();
        store.add(InstanceRecord::new(3, "Widget", widget(&counter)));

        let record = store.remove(3).unwrap();
        assert_eq!(record.id(), 3);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(store.remove(3).is_none());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_clear_fires_all_hooks() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut store = InstanceStore::new();
        store.add(InstanceRecord::new(1, "Widget", widget(&counter)));
        store.add(InstanceRecord::new(2, "Widget", widget(&counter)));

        store.clear();
        assert!(store.is_empty());
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }
}
