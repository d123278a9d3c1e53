// src/services/auth_service.rs
use crate::error::{AppError, AppResult};

/// Gera os hashes bcrypt das senhas dos alunos.
/// O custo vem da configuração (`BCRYPT_COST`); os testes usam o mínimo.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Gera um hash bcrypt para uma senha.
    pub async fn hash_password(&self, password: &str) -> AppResult<String> {
        let password = password.to_string();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || {
            tracing::debug!("Gerando hash bcrypt...");
            bcrypt::hash(&password, cost)
        })
        .await
        .map_err(|e| {
            tracing::error!("Erro na task spawn_blocking (hash_password): {:?}", e);
            AppError::InternalServerError
        })?
        .map_err(|e| {
            tracing::error!("Erro bcrypt ao gerar hash: {:?}", e);
            AppError::PasswordHashingError
        })
    }
}
