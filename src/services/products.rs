// src/services/products.rs

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use validator::Validate;

use crate::common::error::AppError;
use crate::models::product::{
    FarmerProduct, ProductDraft, ProductPatch, RecordId, STATUS_AVAILABLE,
};
use crate::models::user::{Role, User};
use crate::store::{keys, read_json, write_json, RecordStore};

// Indicadores do painel do agricultor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_listings: usize,
    pub available_products: usize,
    pub total_value: f64,
}

// CRUD da lista autoral do agricultor autenticado. Toda operação é
// bloqueada por papel: sem sessão de agricultor o resultado é o "falso"
// (None/false/lista vazia), nunca um erro levantado.
pub struct FarmerProductService {
    store: Arc<dyn RecordStore>,
}

impl FarmerProductService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    fn current_farmer(&self) -> Result<Option<User>, AppError> {
        let user: Option<User> = read_json(self.store.as_ref(), keys::CURRENT_USER)?;
        Ok(user.filter(|u| u.role == Role::Farmer))
    }

    // A lista do agricultor da sessão; vazia para qualquer outro papel.
    pub fn products(&self) -> Result<Vec<FarmerProduct>, AppError> {
        let Some(farmer) = self.current_farmer()? else {
            return Ok(Vec::new());
        };
        Ok(
            read_json(self.store.as_ref(), &keys::farmer_products(&farmer.id))?
                .unwrap_or_default(),
        )
    }

    pub fn product_by_id(&self, id: &RecordId) -> Result<Option<FarmerProduct>, AppError> {
        Ok(self.products()?.into_iter().find(|p| &p.id == id))
    }

    // Cria um produto com id derivado do relógio e status inicial fixo
    // "available".
    pub fn add_product(&self, draft: ProductDraft) -> Result<Option<FarmerProduct>, AppError> {
        let Some(farmer) = self.current_farmer()? else {
            return Ok(None);
        };
        draft.validate()?;

        let now = Utc::now();
        let product = FarmerProduct {
            id: RecordId::from(now.timestamp_millis()),
            farmer_id: farmer.id.clone(),
            name: draft.name,
            category: draft.category,
            description: draft.description,
            price: draft.price,
            quantity: draft.quantity,
            unit: draft.unit,
            harvest_date: draft.harvest_date,
            expiry_date: draft.expiry_date,
            location: draft.location,
            organic: draft.organic,
            image_url: draft.image_url,
            status: STATUS_AVAILABLE.to_string(),
            created_at: now,
        };

        let mut products = self.products()?;
        products.push(product.clone());
        self.save(&farmer, &products)?;
        Ok(Some(product))
    }

    // Atualização por fusão: campos não informados são preservados.
    // Id desconhecido é o resultado "falso".
    pub fn update_product(
        &self,
        id: &RecordId,
        patch: &ProductPatch,
    ) -> Result<Option<FarmerProduct>, AppError> {
        let Some(farmer) = self.current_farmer()? else {
            return Ok(None);
        };

        let mut products = self.products()?;
        let Some(product) = products.iter_mut().find(|p| &p.id == id) else {
            return Ok(None);
        };

        patch.apply(product);
        let updated = product.clone();
        self.save(&farmer, &products)?;
        Ok(Some(updated))
    }

    pub fn delete_product(&self, id: &RecordId) -> Result<bool, AppError> {
        let Some(farmer) = self.current_farmer()? else {
            return Ok(false);
        };

        let mut products = self.products()?;
        let before = products.len();
        products.retain(|p| &p.id != id);
        if products.len() == before {
            return Ok(false);
        }

        self.save(&farmer, &products)?;
        Ok(true)
    }

    pub fn dashboard_stats(&self) -> Result<DashboardStats, AppError> {
        let products = self.products()?;
        Ok(DashboardStats {
            total_listings: products.len(),
            available_products: products
                .iter()
                .filter(|p| p.status == STATUS_AVAILABLE)
                .count(),
            total_value: products.iter().map(|p| p.price * p.quantity).sum(),
        })
    }

    fn save(&self, farmer: &User, products: &[FarmerProduct]) -> Result<(), AppError> {
        write_json(
            self.store.as_ref(),
            &keys::farmer_products(&farmer.id),
            &products,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn login(store: &MemoryStore, role: Role) {
        let user = User {
            id: RecordId::from(42i64),
            username: "ze".into(),
            email: "ze@x.com".into(),
            password: "123456".into(),
            role,
            details: None,
            created_at: None,
        };
        write_json(store, keys::CURRENT_USER, &user).unwrap();
    }

    fn draft(name: &str, price: f64, quantity: f64) -> ProductDraft {
        ProductDraft {
            name: name.into(),
            category: "Fruits".into(),
            description: String::new(),
            price,
            quantity,
            unit: "kg".into(),
            harvest_date: None,
            expiry_date: None,
            location: None,
            organic: false,
            image_url: String::new(),
        }
    }

    #[test]
    fn papel_errado_e_no_op_falso() {
        let store = Arc::new(MemoryStore::default());
        login(&store, Role::Consumer);

        let service = FarmerProductService::new(store.clone());
        assert!(service.add_product(draft("Manga", 50.0, 10.0)).unwrap().is_none());
        assert!(service.products().unwrap().is_empty());
        assert!(!service.delete_product(&RecordId::from(1i64)).unwrap());
        assert!(store.keys().unwrap().iter().all(|k| !k.starts_with("farmer_products_")));
    }

    #[test]
    fn adiciona_com_id_do_relogio_e_status_inicial() {
        let store = Arc::new(MemoryStore::default());
        login(&store, Role::Farmer);

        let service = FarmerProductService::new(store.clone());
        let product = service
            .add_product(draft("Manga", 50.0, 10.0))
            .unwrap()
            .unwrap();

        assert!(!product.id.is_empty());
        assert_eq!(product.farmer_id, RecordId::from(42i64));
        assert_eq!(product.status, STATUS_AVAILABLE);
        assert_eq!(service.products().unwrap().len(), 1);
    }

    #[test]
    fn atualiza_por_fusao_e_id_desconhecido_falha() {
        let store = Arc::new(MemoryStore::default());
        login(&store, Role::Farmer);

        let service = FarmerProductService::new(store.clone());
        let product = service
            .add_product(draft("Manga", 50.0, 10.0))
            .unwrap()
            .unwrap();

        let patch = ProductPatch {
            price: Some(60.0),
            status: Some("unavailable".into()),
            ..Default::default()
        };
        let updated = service.update_product(&product.id, &patch).unwrap().unwrap();
        assert_eq!(updated.price, 60.0);
        assert_eq!(updated.status, "unavailable");
        // Campos não informados ficam como estavam.
        assert_eq!(updated.name, "Manga");
        assert_eq!(updated.quantity, 10.0);

        assert!(service
            .update_product(&RecordId::from("nao-existe"), &patch)
            .unwrap()
            .is_none());
    }

    #[test]
    fn remove_por_id_e_persiste_o_restante() {
        let store = Arc::new(MemoryStore::default());
        login(&store, Role::Farmer);

        let service = FarmerProductService::new(store.clone());
        let product = service
            .add_product(draft("Manga", 50.0, 10.0))
            .unwrap()
            .unwrap();

        assert!(!service.delete_product(&RecordId::from("outro")).unwrap());
        assert!(service.delete_product(&product.id).unwrap());
        assert!(service.products().unwrap().is_empty());
        assert!(service.product_by_id(&product.id).unwrap().is_none());
    }

    #[test]
    fn indicadores_do_painel() {
        let store = Arc::new(MemoryStore::default());
        login(&store, Role::Farmer);

        let service = FarmerProductService::new(store.clone());
        let manga = service
            .add_product(draft("Manga", 50.0, 10.0))
            .unwrap()
            .unwrap();
        service.add_product(draft("Tomate", 8.0, 5.0)).unwrap().unwrap();
        service
            .update_product(
                &manga.id,
                &ProductPatch {
                    status: Some("unavailable".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        let stats = service.dashboard_stats().unwrap();
        assert_eq!(stats.total_listings, 2);
        assert_eq!(stats.available_products, 1);
        assert_eq!(stats.total_value, 50.0 * 10.0 + 8.0 * 5.0);
    }
}
