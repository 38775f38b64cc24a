// src/store/memory.rs

use std::collections::HashMap;
use std::sync::Mutex;

use crate::common::error::AppError;
use crate::store::RecordStore;

// Repositório em memória: sessões efêmeras e testes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, String>>,
}

impl RecordStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.records.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.records
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        self.records.lock().unwrap().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, AppError> {
        let mut keys: Vec<String> = self.records.lock().unwrap().keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guarda_e_remove_registros() {
        let store = MemoryStore::default();
        assert_eq!(store.get("x").unwrap(), None);

        store.set("x", "1").unwrap();
        store.set("y", "2").unwrap();
        assert_eq!(store.get("x").unwrap(), Some("1".to_string()));
        assert_eq!(store.keys().unwrap(), vec!["x".to_string(), "y".to_string()]);

        store.remove("x").unwrap();
        assert_eq!(store.get("x").unwrap(), None);
    }
}
