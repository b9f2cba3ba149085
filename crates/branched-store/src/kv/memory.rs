use crate::error::Result;
use crate::kv::KeyValueStore;
use std::cell::RefCell;
use std::collections::HashMap;

/// Process-local store; contents vanish with the value.
#[derive(Debug, Default)]
pub struct MemoryKv {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKv {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
