use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// As variantes "visíveis ao usuário" (produto não encontrado, login exigido)
// viram notificações no cliente; o resto degrada para fallback ou 500.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Já existe uma conta com este e-mail")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Produto não encontrado")]
    ProductNotFound,

    #[error("Faça login para adicionar itens ao carrinho")]
    LoginRequired,

    // Falha de transporte na listagem remota. Nunca é fatal: o agregador
    // recai para o snapshot persistido ou para os dados locais.
    #[error("Falha ao buscar dados remotos")]
    UpstreamError(#[from] reqwest::Error),

    // Falha de leitura/escrita do repositório de registros (FileStore).
    #[error("Falha de acesso ao repositório local: {0}")]
    StorageError(#[from] std::io::Error),

    #[error("Falha de serialização")]
    SerializationError(#[from] serde_json::Error),

    // Variante para erros de banco de dados no lado servidor
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    // Mensagem curta para a camada de notificação do cliente.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::ProductNotFound => "Produto não encontrado!",
            AppError::LoginRequired => "Faça login para adicionar itens ao carrinho",
            AppError::InvalidCredentials => "E-mail ou senha inválidos.",
            AppError::EmailAlreadyExists => "Já existe uma conta com este e-mail!",
            AppError::ValidationError(_) => "Um ou mais campos são inválidos.",
            _ => "Ocorreu um erro inesperado.",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "Este e-mail já está em uso."),
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos.")
            }
            AppError::LoginRequired => (StatusCode::UNAUTHORIZED, "Autenticação necessária."),
            AppError::ProductNotFound => (StatusCode::NOT_FOUND, "Produto não encontrado."),

            // Todos os outros erros (DatabaseError, UpstreamError...) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
