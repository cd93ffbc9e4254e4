pub mod backend;
pub mod storage;

pub use backend::BackendClient;
pub use storage::JsonFileStorage;
