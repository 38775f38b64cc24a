// src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::product::RecordId;

// Os quatro papéis da plataforma. Cada um tem o próprio painel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Farmer,
    Consumer,
    Supplier,
    Expert,
}

// Convenção única de rotas absolutas (o cliente original tinha três cópias
// divergentes; aqui vale só esta).
pub const LOGIN_PAGE: &str = "/html_files/auth/login.html";
pub const HOME_PAGE: &str = "/html_files/index.html";

impl Role {
    pub fn dashboard_page(&self) -> &'static str {
        match self {
            Role::Farmer => "/html_files/farmer/farmer-dashboard.html",
            Role::Consumer => "/html_files/consumer/consumer-dashboard.html",
            Role::Supplier => "/html_files/supplier/supplier-dashboard.html",
            Role::Expert => "/html_files/expert/expert-dashboard.html",
        }
    }
}

// Perfil específico do papel, anexado ao usuário na criação da conta.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserDetails {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

// Conta de usuário. Imutável depois de criada: não há caminho de
// atualização nem de remoção. A senha fica em texto plano, fielmente ao
// sistema documentado (lacuna conhecida de modelo de ameaça).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub details: Option<UserDetails>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    // Nome de exibição nos painéis: nome completo, razão social ou login.
    pub fn display_name(&self) -> &str {
        if let Some(details) = &self.details {
            if let Some(full_name) = &details.full_name {
                return full_name;
            }
            if let Some(company_name) = &details.company_name {
                return company_name;
            }
        }
        &self.username
    }
}

// Entrada de um agricultor no diretório `userData` (dataa.json).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FarmerProfile {
    pub user_id: RecordId,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

// O conjunto de dados estático servido em /dataa.json: diretório de
// usuários mais as listas iniciais de produtos por agricultor.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UserDataset {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub farmers: Vec<FarmerProfile>,
    #[serde(default)]
    pub farmer_products: Vec<serde_json::Value>,
}

impl UserDataset {
    // Resolve o nome/local de exibição de um agricultor pelo id. Retorna
    // None quando o id não consta no diretório.
    pub fn farmer_display(&self, farmer_id: &RecordId) -> Option<(String, String)> {
        let user = self.users.iter().find(|u| &u.id == farmer_id)?;
        let profile = self.farmers.iter().find(|f| &f.user_id == farmer_id);
        let name = profile
            .and_then(|p| p.full_name.clone())
            .unwrap_or_else(|| user.username.clone());
        let location = profile
            .and_then(|p| p.location.clone())
            .unwrap_or_else(|| "Unknown".to_string());
        Some((name, location))
    }
}

// Dados do formulário de criação de conta.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterPayload {
    #[validate(length(min = 1, message = "O nome de usuário é obrigatório."))]
    pub username: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub details: Option<UserDetails>,
}
