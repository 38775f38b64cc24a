// src/config.rs

use crate::db::ProductRepository;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub product_repo: ProductRepository,
    pub static_dir: String,
    pub port: u16,
}

impl AppState {
    // Carrega as configurações do ambiente e monta o estado da aplicação.
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);
        let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string());

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let product_repo = ProductRepository::new(db_pool.clone());

        Ok(Self {
            db_pool,
            product_repo,
            static_dir,
            port,
        })
    }
}
