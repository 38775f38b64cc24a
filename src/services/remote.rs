// src/services/remote.rs

use async_trait::async_trait;

use crate::common::error::AppError;
use crate::models::{product::RawProduct, user::UserDataset};

// A visão que o cliente tem do backend: a listagem de produtos e o conjunto
// de dados estático de seed. Trait para que o agregador e o seeding possam
// ser exercitados sem rede.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    async fn fetch_products(&self) -> Result<Vec<RawProduct>, AppError>;
    async fn fetch_dataset(&self) -> Result<UserDataset, AppError>;
}

// Implementação real sobre reqwest. Sem timeout e sem retry, de propósito:
// uma busca pendurada só atrasa o caminho de fetch, e falha definitiva cai
// uma única vez para os dados locais.
pub struct HttpRemoteApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRemoteApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl RemoteApi for HttpRemoteApi {
    async fn fetch_products(&self) -> Result<Vec<RawProduct>, AppError> {
        let response = self
            .client
            .get(format!("{}/api/products", self.base_url))
            .send()
            .await?
            .error_for_status()?;
        // Corpo que não for uma lista bem-formada conta como falha de
        // transporte e dispara o fallback.
        Ok(response.json().await?)
    }

    async fn fetch_dataset(&self) -> Result<UserDataset, AppError> {
        let response = self
            .client
            .get(format!("{}/dataa.json", self.base_url))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}
