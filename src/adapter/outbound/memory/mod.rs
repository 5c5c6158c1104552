//! In-process cache medium.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::error::Result;
use crate::port::outbound::cache::CacheMedium;

/// Cache medium backed by a map. Contents live as long as the process.
#[derive(Debug, Default)]
pub struct MemoryMedium {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryMedium {
    /// Create a new empty medium.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl CacheMedium for MemoryMedium {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn write(&self, key: &str, payload: &str) -> Result<()> {
        self.entries
            .write()
            .insert(key.to_string(), payload.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.entries.write().remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.read().keys().cloned().collect())
    }

    fn clear(&self) -> Result<usize> {
        let mut entries = self.entries.write();
        let removed = entries.len();
        entries.clear();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_read_remove() {
        let medium = MemoryMedium::new();
        assert!(medium.is_empty());

        medium.write("a", "1").unwrap();
        assert_eq!(medium.read("a").unwrap().as_deref(), Some("1"));

        medium.write("a", "2").unwrap();
        assert_eq!(medium.read("a").unwrap().as_deref(), Some("2"));
        assert_eq!(medium.len(), 1);

        assert!(medium.remove("a").unwrap());
        assert!(!medium.remove("a").unwrap());
        assert_eq!(medium.read("a").unwrap(), None);
    }

    #[test]
    fn keys_are_sorted() {
        let medium = MemoryMedium::new();
        for key in ["history_b_1", "coins_list", "history_a_1"] {
            medium.write(key, "{}").unwrap();
        }
        assert_eq!(
            medium.keys().unwrap(),
            vec!["coins_list", "history_a_1", "history_b_1"]
        );
        assert_eq!(medium.clear().unwrap(), 3);
        assert!(medium.is_empty());
    }
}
