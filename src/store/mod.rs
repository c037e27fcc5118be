pub mod chapter_store;
pub mod storage;

pub use chapter_store::{CHAPTERS_KEY, ChapterStore, PROGRESS_KEY, StoreEvent};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
