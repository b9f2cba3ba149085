//! String key-value backends, the same shape as a browser's local storage.

pub mod file;
pub mod memory;
pub mod sqlite;

pub use file::FileKv;
pub use memory::MemoryKv;
pub use sqlite::KvRepo;

use crate::error::Result;

pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }
}
