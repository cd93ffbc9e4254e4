//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::adapters::BackendClient;
use mindinote_core::ports::{AccountService, NoteStorage, SummarizationService};
use mindinote_core::NoteStore;
use std::sync::Arc;
use tokio::sync::Mutex;

/// The shared application state, created once at startup and passed to all handlers.
pub struct AppState {
    /// Raw relay to the backend, used by the forwarding proxy.
    pub backend: Arc<BackendClient>,
    pub storage: Arc<dyn NoteStorage>,
    /// The session's single note store. All access goes through this lock, and
    /// mutations write the slot synchronously while holding it.
    pub notes: Mutex<NoteStore>,
    pub summarizer: Arc<dyn SummarizationService>,
    pub accounts: Arc<dyn AccountService>,
}

impl AppState {
    /// Builds the state and loads the persisted notes.
    pub fn new(storage: Arc<dyn NoteStorage>, backend: Arc<BackendClient>) -> Self {
        let mut store = NoteStore::new(storage.clone());
        store.load();

        Self {
            summarizer: backend.clone(),
            accounts: backend.clone(),
            backend,
            storage,
            notes: Mutex::new(store),
        }
    }
}
