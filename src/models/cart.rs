// src/models/cart.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::product::{Product, ProductKey, RecordId};

// Uma linha do carrinho, identificada pelo par (produto, agricultor).
// Persistida em camelCase, como o cliente original gravava; carrinhos
// antigos com ids numéricos continuam legíveis graças ao RecordId.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: RecordId,
    pub farmer_id: RecordId,
    pub product_name: String,
    pub price: f64,
    pub unit: String,
    pub quantity: u32,
    pub farmer_name: String,
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    // Primeira adição de um produto: quantidade 1, instantâneo dos dados de
    // exibição capturado no momento da inclusão. Os ids vêm da chave pedida,
    // não do produto resolvido: um registro gravado sem farmer_id ainda
    // precisa cair na mesma linha nas adições seguintes.
    pub fn first_of(key: &ProductKey, product: &Product) -> Self {
        Self {
            product_id: key.product_id.clone(),
            farmer_id: key.farmer_id.clone(),
            product_name: product.name.clone(),
            price: product.price,
            unit: product.unit.clone(),
            quantity: 1,
            farmer_name: product.farmer_name.clone(),
            added_at: Utc::now(),
        }
    }

    pub fn key(&self) -> ProductKey {
        ProductKey {
            product_id: self.product_id.clone(),
            farmer_id: self.farmer_id.clone(),
        }
    }
}
