mod library;
mod storage;
mod users;

pub use library::{FileLibraryStore, LibraryStore};
pub use storage::validate_key;
pub use users::{FileUserStore, UserStore};
