// src/main.rs

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use agroconnect::{config::AppState, handlers};

#[tokio::main]
async fn main() {
    // Inicializa o logger.
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let static_dir = app_state.static_dir.clone();
    let port = app_state.port;

    // A API pública é mínima: saúde e a listagem de produtos. Todo o resto
    // (painéis, dataa.json, imagens) sai do diretório estático.
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/products", get(handlers::products::list_products))
        .fallback_service(ServeDir::new(&static_dir))
        .with_state(app_state);

    // Inicia o servidor
    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🌱 AgroConnect escutando em {}", listener.local_addr().unwrap());
    tracing::info!("📂 Servindo arquivos de: {}", static_dir);
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
