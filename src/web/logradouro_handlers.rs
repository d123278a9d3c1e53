// src/web/logradouro_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::logradouro::Logradouro,
    services::logradouro_service,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::SqlitePool;

// GET /logradouros
pub async fn listar(State(db_pool): State<SqlitePool>) -> AppResult<Json<Vec<Logradouro>>> {
    Ok(Json(logradouro_service::obter_todos(&db_pool).await?))
}

// GET /logradouros/{id}
pub async fn obter(
    State(db_pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> AppResult<Json<Logradouro>> {
    logradouro_service::obter_por_id(&db_pool, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Logradouro {}", id)))
}

// POST /logradouros
pub async fn criar(
    State(db_pool): State<SqlitePool>,
    Json(payload): Json<Logradouro>,
) -> AppResult<(StatusCode, Json<Logradouro>)> {
    let criado = logradouro_service::adicionar(&db_pool, &payload).await?;
    tracing::info!("✅ Logradouro {} criado.", criado.id);
    Ok((StatusCode::CREATED, Json(criado)))
}

// PUT /logradouros/{id}
pub async fn atualizar(
    State(db_pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(mut payload): Json<Logradouro>,
) -> AppResult<Json<Logradouro>> {
    payload.id = id; // O ID do caminho prevalece
    logradouro_service::atualizar(&db_pool, &payload)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Logradouro {}", id)))
}

// DELETE /logradouros/{id}
pub async fn remover(
    State(db_pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    if logradouro_service::remover(&db_pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Logradouro {}", id)))
    }
}
