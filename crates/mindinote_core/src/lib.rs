pub mod domain;
pub mod ports;
pub mod query;
pub mod store;

pub use domain::{Category, CategoryFilter, Note, NoteUpdate, UnknownCategory, UNTITLED};
pub use ports::{
    AccountService, NoteStorage, PortError, PortResult, SignupOutcome, SummarizationService,
};
pub use query::{category_counts, filter_and_sort, CategoryCounts};
pub use store::{NoteStore, NOTES_KEY};
