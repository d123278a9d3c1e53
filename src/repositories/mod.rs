// src/repositories/mod.rs
// Acesso à base de dados: uma função por operação, como nos serviços.
pub mod aluno_repo;
pub mod logradouro_repo;
pub mod matricula_repo;

use crate::error::AppError;

/// Converte violações de UNIQUE / FOREIGN KEY num `AppError::Conflict`.
/// Outros erros seguem como erro de base de dados.
pub(crate) fn conflito_ou_erro(err: sqlx::Error, mensagem: impl FnOnce() -> String) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() || db_err.is_foreign_key_violation() {
            let mensagem = mensagem();
            tracing::warn!("Restrição violada: {} ({})", mensagem, db_err);
            return AppError::Conflict(mensagem);
        }
    }
    AppError::from(err)
}
