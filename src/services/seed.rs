// src/services/seed.rs

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::common::error::AppError;
use crate::models::product::{RawProduct, RecordId};
use crate::models::user::UserDataset;
use crate::services::remote::RemoteApi;
use crate::store::{keys, write_json, RecordStore};

// Primeira carga de uma página: busca /dataa.json, guarda o diretório em
// `userData` e distribui os produtos iniciais nas listas por agricultor.
pub struct SeedService {
    store: Arc<dyn RecordStore>,
    api: Arc<dyn RemoteApi>,
}

impl SeedService {
    pub fn new(store: Arc<dyn RecordStore>, api: Arc<dyn RemoteApi>) -> Self {
        Self { store, api }
    }

    // Falha de rede não é fatal: a página segue com o que já está no
    // repositório, e o agregador cuida do resto.
    pub async fn load(&self) -> Result<Option<UserDataset>, AppError> {
        let dataset = match self.api.fetch_dataset().await {
            Ok(dataset) => dataset,
            Err(e) => {
                tracing::warn!("Seed indisponível, seguindo com dados locais: {}", e);
                return Ok(None);
            }
        };

        write_json(self.store.as_ref(), keys::USER_DATA, &dataset)?;

        // Agrupa os registros por agricultor; registro sem id de agricultor
        // é descartado.
        let mut grouped: HashMap<RecordId, Vec<Value>> = HashMap::new();
        for record in &dataset.farmer_products {
            let farmer_id = RecordId::from_value(&RawProduct::from_value(record.clone()).farmer_id);
            if farmer_id.is_empty() {
                continue;
            }
            grouped.entry(farmer_id).or_default().push(record.clone());
        }
        for (farmer_id, records) in &grouped {
            write_json(
                self.store.as_ref(),
                &keys::farmer_products(farmer_id),
                records,
            )?;
        }

        tracing::info!(
            "Seed aplicado: {} usuários, {} listas de agricultor",
            dataset.users.len(),
            grouped.len()
        );
        Ok(Some(dataset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    use crate::store::{read_json, MemoryStore};

    struct DatasetApi(UserDataset);

    #[async_trait]
    impl RemoteApi for DatasetApi {
        async fn fetch_products(&self) -> Result<Vec<RawProduct>, AppError> {
            Ok(Vec::new())
        }

        async fn fetch_dataset(&self) -> Result<UserDataset, AppError> {
            Ok(self.0.clone())
        }
    }

    struct OfflineApi;

    #[async_trait]
    impl RemoteApi for OfflineApi {
        async fn fetch_products(&self) -> Result<Vec<RawProduct>, AppError> {
            Err(anyhow::anyhow!("offline").into())
        }

        async fn fetch_dataset(&self) -> Result<UserDataset, AppError> {
            Err(anyhow::anyhow!("offline").into())
        }
    }

    #[tokio::test]
    async fn distribui_os_produtos_por_agricultor() {
        let dataset: UserDataset = serde_json::from_value(json!({
            "users": [{ "id": 10, "username": "ana", "email": "ana@x.com",
                        "password": "123456", "role": "farmer" }],
            "farmers": [{ "user_id": 10, "full_name": "Ana", "location": "Vinhedo" }],
            "farmer_products": [
                { "id": 1, "farmer_id": 10, "name": "Tomate", "status": "available" },
                { "id": 2, "farmer_id": 10, "name": "Alface", "status": "available" },
                { "id": 3, "farmer_id": 77, "name": "Mel", "status": "available" },
                { "id": 4, "name": "Sem dono" },
            ],
        }))
        .unwrap();

        let store = Arc::new(MemoryStore::default());
        let seeded = SeedService::new(store.clone(), Arc::new(DatasetApi(dataset)))
            .load()
            .await
            .unwrap();
        assert!(seeded.is_some());

        let directory: Option<UserDataset> =
            read_json(store.as_ref(), keys::USER_DATA).unwrap();
        assert_eq!(directory.unwrap().users.len(), 1);

        let ana: Vec<Value> = read_json(store.as_ref(), "farmer_products_10")
            .unwrap()
            .unwrap();
        assert_eq!(ana.len(), 2);

        let outro: Vec<Value> = read_json(store.as_ref(), "farmer_products_77")
            .unwrap()
            .unwrap();
        assert_eq!(outro.len(), 1);

        // Registro sem farmer_id não vira lista nenhuma.
        assert!(store
            .keys()
            .unwrap()
            .iter()
            .filter(|k| k.starts_with(keys::FARMER_PRODUCTS_PREFIX))
            .count()
            == 2);
    }

    #[tokio::test]
    async fn seed_offline_degrada_sem_tocar_no_repositorio() {
        let store = Arc::new(MemoryStore::default());
        let seeded = SeedService::new(store.clone(), Arc::new(OfflineApi))
            .load()
            .await
            .unwrap();

        assert!(seeded.is_none());
        assert!(store.keys().unwrap().is_empty());
    }
}
