// src/store/mod.rs

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::{de::DeserializeOwned, Serialize};

use crate::common::error::AppError;

// O repositório de registros local: chave texto, valor JSON serializado.
// É o análogo do localStorage do navegador, injetado explicitamente em cada
// serviço para que a persistência seja um colaborador substituível em teste,
// e não uma chamada ambiente.
pub trait RecordStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
    fn remove(&self, key: &str) -> Result<(), AppError>;
    fn keys(&self) -> Result<Vec<String>, AppError>;
}

// Lê e desserializa um registro. Valor malformado é tratado como ausente,
// nunca propagado: o dado degradou, a página continua.
pub fn read_json<T: DeserializeOwned>(
    store: &dyn RecordStore,
    key: &str,
) -> Result<Option<T>, AppError> {
    let Some(text) = store.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&text) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!("Registro '{}' malformado, tratando como ausente: {}", key, e);
            Ok(None)
        }
    }
}

// Grava um registro por inteiro (sobrescrita do valor todo, nunca parcial).
pub fn write_json<T: Serialize>(
    store: &dyn RecordStore,
    key: &str,
    value: &T,
) -> Result<(), AppError> {
    store.set(key, &serde_json::to_string(value)?)
}

// As chaves conhecidas do repositório.
pub mod keys {
    use crate::models::product::RecordId;

    pub const CURRENT_USER: &str = "currentUser";
    pub const USERS: &str = "users";
    pub const USER_DATA: &str = "userData";
    pub const PRODUCTS_CACHE: &str = "consumer_products_cache_v1";

    pub const FARMER_PRODUCTS_PREFIX: &str = "farmer_products_";

    pub fn farmer_products(farmer_id: &RecordId) -> String {
        format!("{FARMER_PRODUCTS_PREFIX}{farmer_id}")
    }

    pub fn cart(user_id: &RecordId) -> String {
        format!("cart_{user_id}")
    }

    // O id do agricultor embutido numa chave `farmer_products_<id>`.
    pub fn farmer_id_from_key(key: &str) -> Option<RecordId> {
        key.strip_prefix(FARMER_PRODUCTS_PREFIX)
            .map(RecordId::from)
    }
}
