// src/error.rs
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Violações de invariantes detetadas pelas fábricas do domínio.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("O campo '{0}' é obrigatório")]
    CampoObrigatorio(&'static str),

    #[error("CPF inválido: deve conter exatamente 11 dígitos")]
    CpfInvalido,

    #[error("CEP inválido: deve conter exatamente 8 dígitos")]
    CepInvalido,

    #[error("E-mail inválido")]
    EmailInvalido,

    #[error("A data final deve ser maior que a data de início")]
    PeriodoInvalido,

    #[error("Arquivo vazio não é permitido")]
    ArquivoVazio,

    #[error("Plano desconhecido: {0}")]
    PlanoDesconhecido(String),

    #[error("Restrições médicas desconhecidas na máscara {0}")]
    RestricaoDesconhecida(i64),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Erro na base de dados: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Erro de migração da base de dados: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Erro de variável de ambiente: {0}")]
    EnvVarError(#[from] std::env::VarError),

    #[error("Configuração inválida: {0}")]
    ConfigError(String),

    #[error("Dados inválidos: {0}")]
    Domain(#[from] DomainError),

    #[error("{0} não encontrado")]
    NotFound(String),

    #[error("Conflito: {0}")]
    Conflict(String),

    #[error("Erro ao processar senha")]
    PasswordHashingError,

    #[error("Erro interno inesperado")]
    InternalServerError,
}

// Como converter AppError numa resposta HTTP
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // Loga o erro detalhado no servidor
        tracing::error!("Erro processado: {:?}", self);

        let (status, user_message) = match &self {
            AppError::SqlxError(_) | AppError::SqlxMigrateError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Erro ao aceder aos dados.".to_string(),
            ),
            AppError::EnvVarError(_) | AppError::ConfigError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Erro de configuração.".to_string(),
            ),
            // Erros de domínio são seguros para mostrar ao utilizador
            AppError::Domain(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::NotFound(_) | AppError::Conflict(_) => {
                let status = if matches!(self, AppError::NotFound(_)) {
                    StatusCode::NOT_FOUND
                } else {
                    StatusCode::CONFLICT
                };
                (status, self.to_string())
            }
            AppError::PasswordHashingError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Erro ao processar credenciais.".to_string(),
            ),
            AppError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Ocorreu um erro inesperado.".to_string(),
            ),
        };

        (status, Json(json!({ "erro": user_message }))).into_response()
    }
}

// Tipo Result padrão para a aplicação
pub type AppResult<T = ()> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_bad_request() {
        let response = AppError::from(DomainError::CpfInvalido).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn infrastructure_errors_hide_details() {
        let response = AppError::from(sqlx::Error::RowNotFound).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn not_found_and_conflict_have_their_own_status() {
        assert_eq!(
            AppError::NotFound("Aluno 7".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("CPF já cadastrado".into()).into_response().status(),
            StatusCode::CONFLICT
        );
    }
}
