// src/state.rs
use crate::services::auth_service::PasswordHasher;
use sqlx::SqlitePool;

// Estado partilhado por todos os handlers (clonado por pedido)
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub hasher: PasswordHasher,
}

// Permite extrair o pool da DB diretamente
impl axum::extract::FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> SqlitePool {
        state.db_pool.clone()
    }
}

impl axum::extract::FromRef<AppState> for PasswordHasher {
    fn from_ref(state: &AppState) -> PasswordHasher {
        state.hasher
    }
}
