// src/services/auth.rs

use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::common::error::AppError;
use crate::models::product::RecordId;
use crate::models::user::{RegisterPayload, Role, User, UserDataset, LOGIN_PAGE};
use crate::store::{keys, read_json, write_json, RecordStore};

// Resultado do gate de página: entra, ou é redirecionado para o destino
// adequado (login, ou o painel do papel real do usuário).
#[derive(Debug, Clone, PartialEq)]
pub enum PageAccess {
    Granted(User),
    Redirect(&'static str),
}

// Autenticação e sessão sobre o repositório local: a sessão é o registro
// `currentUser`, e a verificação de credenciais é uma varredura linear em
// texto plano — fiel ao sistema documentado, registrado como lacuna de
// segurança conhecida.
pub struct AuthService {
    store: Arc<dyn RecordStore>,
}

impl AuthService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub fn current_user(&self) -> Result<Option<User>, AppError> {
        read_json(self.store.as_ref(), keys::CURRENT_USER)
    }

    pub fn is_logged_in(&self) -> Result<bool, AppError> {
        Ok(self.current_user()?.is_some())
    }

    pub fn has_role(&self, role: Role) -> Result<bool, AppError> {
        Ok(self
            .current_user()?
            .map(|user| user.role == role)
            .unwrap_or(false))
    }

    // Criação de conta: unicidade só de e-mail, conferida por varredura
    // linear no momento da criação. O id vem do relógio, como no resto do
    // sistema. A conta criada é imutável.
    pub fn create_account(&self, payload: RegisterPayload) -> Result<User, AppError> {
        payload.validate()?;

        let mut users: Vec<User> =
            read_json(self.store.as_ref(), keys::USERS)?.unwrap_or_default();
        if users.iter().any(|u| u.email == payload.email) {
            return Err(AppError::EmailAlreadyExists);
        }

        let now = Utc::now();
        let user = User {
            id: RecordId::from(now.timestamp_millis()),
            username: payload.username,
            email: payload.email,
            password: payload.password,
            role: payload.role,
            details: payload.details,
            created_at: Some(now),
        };

        users.push(user.clone());
        write_json(self.store.as_ref(), keys::USERS, &users)?;
        tracing::info!("Conta criada: {} ({:?})", user.email, user.role);
        Ok(user)
    }

    // Login: procura nas contas criadas localmente e no diretório seedado.
    // Sucesso grava a sessão em `currentUser`.
    pub fn login(&self, email: &str, password: &str) -> Result<User, AppError> {
        let users: Vec<User> =
            read_json(self.store.as_ref(), keys::USERS)?.unwrap_or_default();
        let dataset: Option<UserDataset> = read_json(self.store.as_ref(), keys::USER_DATA)?;

        let seeded = dataset.as_ref().map(|d| d.users.as_slice()).unwrap_or(&[]);
        let found = users
            .iter()
            .chain(seeded.iter())
            .find(|u| u.email == email && u.password == password)
            .cloned()
            .ok_or(AppError::InvalidCredentials)?;

        write_json(self.store.as_ref(), keys::CURRENT_USER, &found)?;
        Ok(found)
    }

    pub fn logout(&self) -> Result<(), AppError> {
        self.store.remove(keys::CURRENT_USER)
    }

    // Gate das páginas de painel: sem sessão vai para o login; papel errado
    // vai para o painel do papel verdadeiro.
    pub fn protect_page(&self, required_role: Option<Role>) -> Result<PageAccess, AppError> {
        let Some(user) = self.current_user()? else {
            return Ok(PageAccess::Redirect(LOGIN_PAGE));
        };

        if let Some(required) = required_role {
            if user.role != required {
                return Ok(PageAccess::Redirect(user.role.dashboard_page()));
            }
        }

        Ok(PageAccess::Granted(user))
    }
}
