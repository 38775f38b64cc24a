// src/handlers/products.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{common::error::AppError, config::AppState};

// Quantos registros a listagem pública devolve no máximo.
const LIST_LIMIT: i64 = 50;

// GET /api/products — a única rota de dados do backend. Campos além do id
// podem vir nulos; quem preenche defaults é o Normalizador no cliente.
pub async fn list_products(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state.product_repo.list_products(LIST_LIMIT).await?;
    Ok((StatusCode::OK, Json(products)))
}
