//! Client-side persisted state: the session credential, the theme
//! preference, and the storage backends they sit on.

mod storage;
mod store;
mod theme;

pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use store::{SessionStore, TOKEN_KEY};
pub use theme::{Theme, ThemePreference};
