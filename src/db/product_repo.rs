// src/db/product_repo.rs

use sqlx::PgPool;

use crate::{common::error::AppError, models::product::ProductRow};

// O repositório da listagem pública de produtos, a única superfície de
// leitura do banco que o backend expõe.
#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_products(&self, limit: i64) -> Result<Vec<ProductRow>, AppError> {
        let products = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, category, price, quantity
            FROM products
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }
}
