//! crates/mindinote_core/src/store.rs
//!
//! The note store: owns the note collection, loads it from and saves it to a
//! `NoteStorage` slot, and exposes the create/update/delete/pin operations.
//!
//! Every mutation installs a fresh snapshot of the collection. Readers holding a
//! snapshot from `notes()` never observe a partially applied change.

use crate::domain::{title_or_placeholder, Category, Note, NoteUpdate};
use crate::ports::NoteStorage;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, warn};
use uuid::Uuid;

/// The storage slot holding the serialized note collection.
pub const NOTES_KEY: &str = "mindinote-notes";

/// Source of "now" for timestamps.
pub type Clock = fn() -> DateTime<Utc>;

pub struct NoteStore {
    storage: Arc<dyn NoteStorage>,
    notes: Arc<Vec<Note>>,
    loaded: bool,
    clock: Clock,
}

impl NoteStore {
    /// Creates an empty, not yet loaded store on top of `storage`.
    pub fn new(storage: Arc<dyn NoteStorage>) -> Self {
        Self {
            storage,
            notes: Arc::new(Vec::new()),
            loaded: false,
            clock: Utc::now,
        }
    }

    /// Replaces the clock used for `created_at`/`updated_at`.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    //=====================================================================================
    // Persistence
    //=====================================================================================

    /// Reads the persisted collection.
    ///
    /// Unreadable or corrupt data is logged and the store starts empty. Only the
    /// first call has any effect.
    pub fn load(&mut self) {
        if self.loaded {
            return;
        }

        match self.storage.read(NOTES_KEY) {
            Ok(Some(raw)) if !raw.trim().is_empty() => {
                match serde_json::from_str::<Vec<Note>>(&raw) {
                    Ok(notes) => {
                        let notes = sanitize(notes);
                        debug!(count = notes.len(), "Loaded notes from storage");
                        self.notes = Arc::new(notes);
                    }
                    Err(e) => warn!("Error parsing stored notes, starting empty: {}", e),
                }
            }
            Ok(_) => debug!("No stored notes found"),
            Err(e) => error!("Failed to read notes from storage: {}", e),
        }

        self.loaded = true;
    }

    /// Writes the whole collection to storage. Does nothing until `load()` has run,
    /// so an empty startup state can never overwrite what is stored.
    pub fn save(&self) {
        if !self.loaded {
            return;
        }

        let raw = match serde_json::to_string(self.notes.as_slice()) {
            Ok(raw) => raw,
            Err(e) => {
                error!("Failed to serialize notes: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.write(NOTES_KEY, &raw) {
            error!("Failed to write notes to storage: {}", e);
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    //=====================================================================================
    // Reads
    //=====================================================================================

    /// The current snapshot of the collection, in insertion order (newest first).
    pub fn notes(&self) -> Arc<Vec<Note>> {
        Arc::clone(&self.notes)
    }

    pub fn get(&self, id: &str) -> Option<Note> {
        self.notes.iter().find(|n| n.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    //=====================================================================================
    // Mutations
    //=====================================================================================

    /// Creates a note at the front of the collection and saves.
    pub fn add_note(&mut self, title: &str, content: &str, category: Category) -> Note {
        let now = (self.clock)();
        let note = Note {
            id: self.fresh_id(),
            title: title_or_placeholder(title.to_string()),
            content: content.to_string(),
            category,
            created_at: now,
            updated_at: now,
            is_pinned: false,
        };

        Arc::make_mut(&mut self.notes).insert(0, note.clone());
        self.save();
        note
    }

    /// Merges `update` into the note with `id` and refreshes its `updated_at`.
    /// Returns the updated note, or `None` when no note has that id.
    pub fn update_note(&mut self, id: &str, update: NoteUpdate) -> Option<Note> {
        let updated = self.modify(id, |note| update.apply_to(note));
        self.save();
        updated
    }

    /// Removes the note with `id`. Returns whether a note was removed.
    pub fn delete_note(&mut self, id: &str) -> bool {
        let removed = match self.notes.iter().position(|n| n.id == id) {
            Some(index) => {
                Arc::make_mut(&mut self.notes).remove(index);
                true
            }
            None => false,
        };
        self.save();
        removed
    }

    /// Flips the pin flag of the note with `id` and refreshes its `updated_at`.
    pub fn toggle_pin(&mut self, id: &str) -> Option<Note> {
        let toggled = self.modify(id, |note| note.is_pinned = !note.is_pinned);
        self.save();
        toggled
    }

    fn modify(&mut self, id: &str, change: impl FnOnce(&mut Note)) -> Option<Note> {
        let index = self.notes.iter().position(|n| n.id == id)?;
        let now = (self.clock)();
        let note = &mut Arc::make_mut(&mut self.notes)[index];
        change(note);
        note.touch(now);
        Some(note.clone())
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if !self.notes.iter().any(|n| n.id == id) {
                return id;
            }
        }
    }
}

/// Drops notes whose id was already seen and repairs `updated_at < created_at`.
fn sanitize(notes: Vec<Note>) -> Vec<Note> {
    let mut seen = HashSet::new();
    notes
        .into_iter()
        .filter_map(|mut note| {
            if !seen.insert(note.id.clone()) {
                warn!(id = %note.id, "Dropping stored note with duplicate id");
                return None;
            }
            if note.updated_at < note.created_at {
                note.updated_at = note.created_at;
            }
            Some(note)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UNTITLED;
    use crate::ports::{PortError, PortResult};
    use chrono::TimeZone;
    use proptest::prelude::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStorage {
        slots: Mutex<HashMap<String, String>>,
        writes: Mutex<usize>,
    }

    impl MemoryStorage {
        fn with(key: &str, value: &str) -> Self {
            let storage = Self::default();
            storage
                .slots
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            storage
        }

        fn slot(&self, key: &str) -> Option<String> {
            self.slots.lock().unwrap().get(key).cloned()
        }

        fn writes(&self) -> usize {
            *self.writes.lock().unwrap()
        }
    }

    impl NoteStorage for MemoryStorage {
        fn read(&self, key: &str) -> PortResult<Option<String>> {
            Ok(self.slot(key))
        }

        fn write(&self, key: &str, value: &str) -> PortResult<()> {
            *self.writes.lock().unwrap() += 1;
            self.slots
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    struct BrokenStorage;

    impl NoteStorage for BrokenStorage {
        fn read(&self, _key: &str) -> PortResult<Option<String>> {
            Err(PortError::Storage("storage disabled".to_string()))
        }

        fn write(&self, _key: &str, _value: &str) -> PortResult<()> {
            Err(PortError::Storage("quota exceeded".to_string()))
        }
    }

    fn loaded_store() -> (Arc<MemoryStorage>, NoteStore) {
        let storage = Arc::new(MemoryStorage::default());
        let mut store = NoteStore::new(storage.clone());
        store.load();
        (storage, store)
    }

    #[test]
    fn add_note_prepends_and_persists() {
        let (storage, mut store) = loaded_store();
        let first = store.add_note("First", "one", Category::Tasks);
        let second = store.add_note("Second", "two", Category::default());

        assert_eq!(store.len(), 2);
        assert_eq!(store.notes()[0].id, second.id);
        assert_eq!(store.notes()[1].id, first.id);
        assert_eq!(second.category, Category::Ideas);
        assert!(!second.is_pinned);
        assert_eq!(second.created_at, second.updated_at);

        let stored: Vec<Note> = serde_json::from_str(&storage.slot(NOTES_KEY).unwrap()).unwrap();
        assert_eq!(stored, *store.notes());
    }

    #[test]
    fn empty_title_gets_placeholder() {
        let (_, mut store) = loaded_store();
        let note = store.add_note("", "body", Category::Personal);
        assert_eq!(note.title, UNTITLED);
    }

    #[test]
    fn save_is_a_no_op_before_load() {
        let storage = Arc::new(MemoryStorage::with(NOTES_KEY, "[]"));
        let mut store = NoteStore::new(storage.clone());
        store.add_note("Early", "", Category::Ideas);
        assert_eq!(storage.writes(), 0);
        assert_eq!(storage.slot(NOTES_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn load_only_happens_once() {
        let (storage, mut store) = loaded_store();
        store.add_note("Kept", "", Category::Ideas);
        storage
            .slots
            .lock()
            .unwrap()
            .insert(NOTES_KEY.to_string(), "[]".to_string());
        store.load();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn corrupt_data_starts_empty() {
        let storage = Arc::new(MemoryStorage::with(NOTES_KEY, "{not json"));
        let mut store = NoteStore::new(storage);
        store.load();
        assert!(store.is_loaded());
        assert!(store.is_empty());
    }

    #[test]
    fn unknown_category_in_storage_is_treated_as_corrupt() {
        let raw = r#"[{"id":"1","title":"t","content":"c","category":"all",
            "createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z","isPinned":false}]"#;
        let mut store = NoteStore::new(Arc::new(MemoryStorage::with(NOTES_KEY, raw)));
        store.load();
        assert!(store.is_empty());
    }

    #[test]
    fn duplicate_ids_in_storage_are_dropped() {
        let raw = r#"[
            {"id":"1","title":"a","content":"","category":"work","createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"},
            {"id":"1","title":"b","content":"","category":"work","createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"}
        ]"#;
        let mut store = NoteStore::new(Arc::new(MemoryStorage::with(NOTES_KEY, raw)));
        store.load();
        assert_eq!(store.len(), 1);
        assert_eq!(store.notes()[0].title, "a");
    }

    #[test]
    fn storage_failures_leave_store_usable() {
        let mut store = NoteStore::new(Arc::new(BrokenStorage));
        store.load();
        assert!(store.is_loaded());
        let note = store.add_note("Still works", "", Category::Work);
        assert!(store.toggle_pin(&note.id).unwrap().is_pinned);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn round_trip_reproduces_notes() {
        let (storage, mut store) = loaded_store();
        let a = store.add_note("A", "alpha", Category::Meetings);
        store.add_note("B", "beta", Category::Work);
        store.toggle_pin(&a.id);

        let mut reloaded = NoteStore::new(storage);
        reloaded.load();
        assert_eq!(*reloaded.notes(), *store.notes());
    }

    #[test]
    fn update_merges_fields_and_refreshes_timestamp() {
        let (_, mut store) = loaded_store();
        let note = store.add_note("Draft", "text", Category::Ideas);
        let updated = store
            .update_note(
                &note.id,
                NoteUpdate {
                    content: Some("final text".to_string()),
                    category: Some(Category::Work),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.id, note.id);
        assert_eq!(updated.title, "Draft");
        assert_eq!(updated.content, "final text");
        assert_eq!(updated.category, Category::Work);
        assert_eq!(updated.created_at, note.created_at);
        assert!(updated.updated_at >= note.updated_at);
        assert_eq!(store.get(&note.id), Some(updated));
    }

    #[test]
    fn missing_ids_are_no_ops() {
        let (_, mut store) = loaded_store();
        store.add_note("Only", "", Category::Ideas);
        let before = store.notes();

        assert!(store.update_note("nope", NoteUpdate::default()).is_none());
        assert!(store.toggle_pin("nope").is_none());
        assert!(!store.delete_note("nope"));
        assert_eq!(*store.notes(), *before);
    }

    #[test]
    fn delete_removes_note_from_storage() {
        let (storage, mut store) = loaded_store();
        let gone = store.add_note("Gone", "", Category::Ideas);
        store.add_note("Stays", "", Category::Ideas);
        assert!(store.delete_note(&gone.id));

        let stored: Vec<Note> = serde_json::from_str(&storage.slot(NOTES_KEY).unwrap()).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].title, "Stays");
    }

    #[test]
    fn old_snapshots_are_not_affected_by_mutations() {
        let (_, mut store) = loaded_store();
        let note = store.add_note("Snapshot", "", Category::Ideas);
        let snapshot = store.notes();

        store.toggle_pin(&note.id);
        store.add_note("Later", "", Category::Ideas);

        assert_eq!(snapshot.len(), 1);
        assert!(!snapshot[0].is_pinned);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn updated_at_never_precedes_created_at_when_clock_goes_back() {
        fn forward() -> DateTime<Utc> {
            Utc.timestamp_opt(2_000_000_000, 0).unwrap()
        }
        fn backward() -> DateTime<Utc> {
            Utc.timestamp_opt(1_000_000_000, 0).unwrap()
        }

        let (storage, mut store) = loaded_store();
        let note = store.add_note("Time", "", Category::Ideas);
        let mut store = NoteStore::new(storage).with_clock(forward);
        store.load();
        let note = store.update_note(&note.id, NoteUpdate::default()).unwrap();
        assert_eq!(note.updated_at, forward());

        let mut store = store.with_clock(backward);
        let pinned = store.toggle_pin(&note.id).unwrap();
        assert!(pinned.updated_at >= pinned.created_at);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(Category),
        Update(usize, String),
        Delete(usize),
        TogglePin(usize),
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            prop::sample::select(Category::ALL.to_vec()).prop_map(Op::Add),
            (0usize..8, "[a-z]{0,6}").prop_map(|(i, t)| Op::Update(i, t)),
            (0usize..8).prop_map(Op::Delete),
            (0usize..8).prop_map(Op::TogglePin),
        ]
    }

    proptest! {
        #[test]
        fn ids_stay_unique_and_timestamps_ordered(ops in prop::collection::vec(arb_op(), 0..40)) {
            let (_, mut store) = loaded_store();
            let id_at = |store: &NoteStore, i: usize| {
                store.notes().get(i).map(|n| n.id.clone()).unwrap_or_else(|| "missing".to_string())
            };

            for op in ops {
                match op {
                    Op::Add(category) => {
                        store.add_note("title", "content", category);
                    }
                    Op::Update(i, title) => {
                        let id = id_at(&store, i);
                        store.update_note(&id, NoteUpdate { title: Some(title), ..Default::default() });
                    }
                    Op::Delete(i) => {
                        let id = id_at(&store, i);
                        store.delete_note(&id);
                    }
                    Op::TogglePin(i) => {
                        let id = id_at(&store, i);
                        store.toggle_pin(&id);
                    }
                }

                let notes = store.notes();
                let unique: HashSet<&str> = notes.iter().map(|n| n.id.as_str()).collect();
                prop_assert_eq!(unique.len(), notes.len());
                for note in notes.iter() {
                    prop_assert!(note.updated_at >= note.created_at);
                }
            }
        }
    }
}
