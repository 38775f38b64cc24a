// src/store/file.rs

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::common::error::AppError;
use crate::store::RecordStore;

// Repositório persistido num único arquivo JSON (objeto chave → valor),
// o equivalente nativo do localStorage. Cada escrita regrava o arquivo
// inteiro; o volume de dados de uma sessão não justifica nada mais fino.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    records: Mutex<HashMap<String, String>>,
}

impl FileStore {
    // Abre (ou cria) o repositório no caminho dado. Arquivo malformado é
    // tratado como vazio, com aviso no log, seguindo a regra de que dado
    // persistido ilegível degrada em vez de derrubar a página.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        let records = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(
                        "Repositório '{}' ilegível, começando vazio: {}",
                        path.display(),
                        e
                    );
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    fn persist(&self, records: &HashMap<String, String>) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(records)?)?;
        Ok(())
    }
}

impl RecordStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.records.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut records = self.records.lock().unwrap();
        records.insert(key.to_string(), value.to_string());
        self.persist(&records)
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        let mut records = self.records.lock().unwrap();
        records.remove(key);
        self.persist(&records)
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
    fn registros_sobrevivem_a_reabertura() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agroconnect.json");

        {
            let store = FileStore::open(&path).unwrap();
            store.set("currentUser", "{\"id\":1}").unwrap();
            store.set("descartavel", "x").unwrap();
            store.remove("descartavel").unwrap();
        }

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("currentUser").unwrap(),
            Some("{\"id\":1}".to_string())
        );
        assert_eq!(reopened.get("descartavel").unwrap(), None);
    }

    #[test]
    fn arquivo_corrompido_comeca_vazio() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quebrado.json");
        fs::write(&path, "###").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert!(store.keys().unwrap().is_empty());
    }
}
