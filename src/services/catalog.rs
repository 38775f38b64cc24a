// src/services/catalog.rs

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;

use crate::common::error::AppError;
use crate::models::product::{Product, ProductKey, RawProduct, RecordId, STATUS_AVAILABLE};
use crate::models::user::{Role, UserDataset};
use crate::services::remote::RemoteApi;
use crate::store::{keys, read_json, write_json, RecordStore};

// Sentinela do filtro de categoria: devolve o catálogo inteiro.
pub const CATEGORY_ALL: &str = "all";

// O instantâneo de catálogo de uma página: a sequência de produtos
// normalizados que exibição, filtro, busca e carrinho consomem. Substitui o
// cache global mutável do cliente original por um objeto de estado explícito
// que o agregador devolve por inteiro — nunca mutado incrementalmente.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn find(&self, key: &ProductKey) -> Option<&Product> {
        self.products
            .iter()
            .find(|p| p.id == key.product_id && p.farmer_id == key.farmer_id)
    }

    // Projeção pura: subsequência cuja categoria bate sem diferenciar
    // maiúsculas, na ordem original. "all" devolve tudo.
    pub fn filter_by_category(&self, category: &str) -> Vec<Product> {
        if category == CATEGORY_ALL {
            return self.products.clone();
        }
        self.products
            .iter()
            .filter(|p| p.category.eq_ignore_ascii_case(category))
            .cloned()
            .collect()
    }

    // Busca por substring, sem diferenciar maiúsculas, em nome, descrição,
    // categoria e nome do agricultor.
    pub fn search(&self, term: &str) -> Vec<Product> {
        let term = term.to_lowercase();
        self.products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&term)
                    || p.description.to_lowercase().contains(&term)
                    || p.category.to_lowercase().contains(&term)
                    || p.farmer_name.to_lowercase().contains(&term)
            })
            .cloned()
            .collect()
    }

    // A ordenação é responsabilidade da camada de exibição: mais recentes
    // primeiro. O servidor não garante ordem nenhuma.
    pub fn sorted_for_display(&self) -> Vec<Product> {
        let mut products = self.products.clone();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        products
    }
}

// O Agregador de Catálogo: funde a listagem remota com os produtos autorais
// dos agricultores guardados localmente.
pub struct CatalogService {
    store: Arc<dyn RecordStore>,
    api: Arc<dyn RemoteApi>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn RecordStore>, api: Arc<dyn RemoteApi>) -> Self {
        Self { store, api }
    }

    // Cadeia de fallback, cada degrau trocando o catálogo por inteiro:
    //   1. listagem remota → normaliza, persiste o snapshot e devolve;
    //   2. falha de transporte → snapshot persistido, se não vazio;
    //   3. senão → união das listas locais dos agricultores.
    pub async fn load(&self) -> Result<Catalog, AppError> {
        match self.api.fetch_products().await {
            Ok(raw) => {
                let products: Vec<Product> =
                    raw.into_iter().map(RawProduct::normalize).collect();
                write_json(self.store.as_ref(), keys::PRODUCTS_CACHE, &products)?;
                tracing::info!("Catálogo carregado da API: {} produtos", products.len());
                Ok(Catalog::new(products))
            }
            Err(e) => {
                // Falha de transporte é diagnóstico, não erro de página.
                tracing::warn!("Listagem remota indisponível, usando fallback: {}", e);

                let cached: Vec<Product> =
                    read_json(self.store.as_ref(), keys::PRODUCTS_CACHE)?.unwrap_or_default();
                if !cached.is_empty() {
                    return Ok(Catalog::new(cached));
                }

                Ok(Catalog::new(self.local_products()?))
            }
        }
    }

    // A lista pronta para renderizar: o instantâneo ordenado (mais recentes
    // primeiro). Catálogo vazio é a exceção do invariante de cache: só aí o
    // caminho local é consultado de novo.
    pub fn display_products(&self, catalog: &Catalog) -> Result<Vec<Product>, AppError> {
        if !catalog.is_empty() {
            return Ok(catalog.sorted_for_display());
        }
        let mut products = self.local_products()?;
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(products)
    }

    // Sintetiza o catálogo varrendo as listas `farmer_products_<id>` do
    // repositório local. Agricultores presentes no diretório `userData`
    // ganham nome/local resolvidos; os demais, o rótulo "Farmer {id}".
    // Só produtos com status "available" entram.
    pub fn local_products(&self) -> Result<Vec<Product>, AppError> {
        let dataset: Option<UserDataset> = read_json(self.store.as_ref(), keys::USER_DATA)?;
        let mut raw_products: Vec<RawProduct> = Vec::new();
        let mut directory_ids: HashSet<RecordId> = HashSet::new();

        if let Some(dataset) = &dataset {
            for user in &dataset.users {
                directory_ids.insert(user.id.clone());
            }
            for farmer in dataset.users.iter().filter(|u| u.role == Role::Farmer) {
                let records: Vec<Value> =
                    read_json(self.store.as_ref(), &keys::farmer_products(&farmer.id))?
                        .unwrap_or_default();
                if records.is_empty() {
                    continue;
                }
                let (name, location) = dataset
                    .farmer_display(&farmer.id)
                    .unwrap_or_else(|| (farmer.username.clone(), "Unknown".to_string()));
                for record in records {
                    let mut raw = RawProduct::from_value(record);
                    // Registro sem farmer_id herda o dono da lista, senão a
                    // chave (produto, agricultor) do catálogo sai vazia.
                    if RecordId::from_value(&raw.farmer_id).is_empty() {
                        raw.farmer_id = Value::String(farmer.id.to_string());
                    }
                    raw.farmer_name = Value::String(name.clone());
                    raw.farmer_location = Value::String(location.clone());
                    raw_products.push(raw);
                }
            }
        }

        // Listas gravadas por agricultores fora do diretório: rótulo
        // sintetizado a partir do próprio id.
        for key in self.store.keys()? {
            let Some(farmer_id) = keys::farmer_id_from_key(&key) else {
                continue;
            };
            if directory_ids.contains(&farmer_id) {
                continue;
            }
            let records: Vec<Value> =
                read_json(self.store.as_ref(), &key)?.unwrap_or_default();
            for record in records {
                let mut raw = RawProduct::from_value(record);
                if RecordId::from_value(&raw.farmer_id).is_empty() {
                    raw.farmer_id = Value::String(farmer_id.to_string());
                }
                raw.farmer_name = Value::String(format!("Farmer {farmer_id}"));
                raw.farmer_location = Value::String("Unknown".to_string());
                raw_products.push(raw);
            }
        }

        Ok(raw_products
            .into_iter()
            .filter(|raw| raw.status.as_str() == Some(STATUS_AVAILABLE))
            .map(RawProduct::normalize)
            .collect())
    }
}
