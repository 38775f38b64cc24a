// src/models/product.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use validator::Validate;

// ---
// Identificador canônico
// ---

// Os registros chegam com identificadores ora numéricos (Date.now()), ora
// textuais ("7"). Convertemos uma única vez, na borda, para uma forma
// canônica de texto, para que `7` e `"7"` sejam sempre a mesma chave.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    // Forma canônica de qualquer valor JSON: número inteiro sem casas
    // decimais, texto como veio, ausente/nulo vira vazio.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self(i.to_string()),
                None => Self(n.to_string()),
            },
            Value::String(s) => Self(s.clone()),
            _ => Self(String::new()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(RecordId::from_value(&value))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// A chave de um item de carrinho e de toda busca de produto:
// o par (produto, agricultor).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductKey {
    pub product_id: RecordId,
    pub farmer_id: RecordId,
}

impl ProductKey {
    pub fn new(product_id: impl Into<RecordId>, farmer_id: impl Into<RecordId>) -> Self {
        Self {
            product_id: product_id.into(),
            farmer_id: farmer_id.into(),
        }
    }
}

// ---
// Registro bruto (API remota ou lista local do agricultor)
// ---

// Carregador único das duas formas de registro que circulam pelo sistema:
// a da API (`_id`, `farmerId`, `imageUrl`, `createdAt`...) e a local
// (snake_case). Todo campo é um `Value` cru; a conversão para a forma
// canônica acontece exclusivamente em `normalize`.
#[derive(Debug, Clone, Default)]
pub struct RawProduct {
    pub id: Value,
    pub farmer_id: Value,
    pub name: Value,
    pub category: Value,
    pub price: Value,
    pub unit: Value,
    pub quantity: Value,
    pub image_url: Value,
    pub description: Value,
    pub status: Value,
    pub organic: Value,
    pub created_at: Value,
    pub farmer_name: Value,
    pub farmer_location: Value,
}

impl RawProduct {
    // Constrói a partir de qualquer valor JSON, com a mesma precedência de
    // nomes alternativos do sistema original. Total: entrada que não for um
    // objeto vira um registro vazio, nunca um erro.
    pub fn from_value(value: Value) -> Self {
        let map = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let pick = |names: &[&str]| -> Value {
            names
                .iter()
                .find_map(|name| map.get(*name))
                .cloned()
                .unwrap_or(Value::Null)
        };

        Self {
            id: pick(&["id", "_id", "productId"]),
            farmer_id: pick(&["farmer_id", "farmerId"]),
            name: pick(&["name"]),
            category: pick(&["category"]),
            price: pick(&["price"]),
            unit: pick(&["unit"]),
            quantity: pick(&["quantity"]),
            image_url: pick(&["image_url", "image", "imageUrl"]),
            description: pick(&["description"]),
            status: pick(&["status"]),
            organic: pick(&["organic"]),
            created_at: pick(&["created_at", "createdAt"]),
            farmer_name: pick(&["farmer_name", "farmerName"]),
            farmer_location: pick(&["farmer_location", "farmerLocation"]),
        }
    }

    // Normalização: função total. Todo campo de saída tem valor mesmo quando
    // a entrada o omite; números em forma de texto são coagidos e entrada
    // não-numérica vira 0. Nada aqui valida faixa: preço negativo passa.
    pub fn normalize(self) -> Product {
        Product {
            id: RecordId::from_value(&self.id),
            farmer_id: RecordId::from_value(&self.farmer_id),
            name: coerce_string(&self.name, "Unnamed"),
            category: coerce_string(&self.category, "General"),
            price: coerce_number(&self.price),
            unit: coerce_string(&self.unit, "kg"),
            quantity: coerce_number(&self.quantity),
            image_url: coerce_string(&self.image_url, DEFAULT_PRODUCT_IMAGE),
            description: coerce_string(&self.description, ""),
            status: coerce_string(&self.status, STATUS_AVAILABLE),
            organic: truthy(&self.organic),
            created_at: coerce_timestamp(&self.created_at),
            farmer_name: coerce_string(&self.farmer_name, "Unknown Farmer"),
            farmer_location: coerce_string(&self.farmer_location, "Unknown"),
        }
    }
}

impl<'de> Deserialize<'de> for RawProduct {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(RawProduct::from_value(value))
    }
}

impl From<Value> for RawProduct {
    fn from(value: Value) -> Self {
        RawProduct::from_value(value)
    }
}

pub const STATUS_AVAILABLE: &str = "available";
pub const DEFAULT_PRODUCT_IMAGE: &str = "/assets/icons/fruits/apple.svg";

fn coerce_string(value: &Value, default: &str) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => default.to_string(),
    }
}

fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

// Veracidade no estilo do cliente original (`!!p.organic`).
fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Null => false,
        _ => true,
    }
}

fn coerce_timestamp(value: &Value) -> DateTime<Utc> {
    if let Value::String(s) = value {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(s) {
            return parsed.with_timezone(&Utc);
        }
    }
    Utc::now()
}

// ---
// Produto canônico
// ---

// A forma única consumida por exibição, filtro, busca e carrinho.
// Produzida apenas pelo Normalizador.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: RecordId,
    pub farmer_id: RecordId,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub unit: String,
    pub quantity: f64,
    pub image_url: String,
    pub description: String,
    pub status: String,
    pub organic: bool,
    pub created_at: DateTime<Utc>,
    pub farmer_name: String,
    pub farmer_location: String,
}

impl Product {
    pub fn key(&self) -> ProductKey {
        ProductKey {
            product_id: self.id.clone(),
            farmer_id: self.farmer_id.clone(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == STATUS_AVAILABLE
    }
}

// ---
// Registro autoral do agricultor
// ---

fn default_now() -> DateTime<Utc> {
    Utc::now()
}

// O registro como o agricultor o grava na própria lista. Carrega campos que
// não existem na forma canônica (colheita, validade, localização do lote).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmerProduct {
    pub id: RecordId,
    pub farmer_id: RecordId,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub harvest_date: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub organic: bool,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub status: String,
    #[serde(default = "default_now")]
    pub created_at: DateTime<Utc>,
}

// Dados do formulário "novo produto" do painel do agricultor.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductDraft {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[validate(length(min = 1, message = "A categoria é obrigatória."))]
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub quantity: f64,
    #[validate(length(min = 1, message = "A unidade é obrigatória."))]
    pub unit: String,
    #[serde(default)]
    pub harvest_date: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub organic: bool,
    #[serde(default)]
    pub image_url: String,
}

// Atualização parcial: campos ausentes preservam o valor existente.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub harvest_date: Option<String>,
    pub expiry_date: Option<String>,
    pub location: Option<String>,
    pub organic: Option<bool>,
    pub image_url: Option<String>,
    pub status: Option<String>,
}

impl ProductPatch {
    pub fn apply(&self, product: &mut FarmerProduct) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(category) = &self.category {
            product.category = category.clone();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(quantity) = self.quantity {
            product.quantity = quantity;
        }
        if let Some(unit) = &self.unit {
            product.unit = unit.clone();
        }
        if let Some(harvest_date) = &self.harvest_date {
            product.harvest_date = Some(harvest_date.clone());
        }
        if let Some(expiry_date) = &self.expiry_date {
            product.expiry_date = Some(expiry_date.clone());
        }
        if let Some(location) = &self.location {
            product.location = Some(location.clone());
        }
        if let Some(organic) = self.organic {
            product.organic = organic;
        }
        if let Some(image_url) = &self.image_url {
            product.image_url = image_url.clone();
        }
        if let Some(status) = &self.status {
            product.status = status.clone();
        }
    }
}

// ---
// Linha da tabela `products` servida em GET /api/products
// ---

// Só o id é garantido no lado servidor; os defaults do Normalizador no
// cliente cobrem o resto.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<f64>,
}
