// src/services/logradouro_service.rs
use crate::{error::AppResult, models::logradouro::Logradouro, repositories::logradouro_repo};
use sqlx::SqlitePool;

/// Revalida o DTO através da fábrica (normaliza o CEP, corta espaços).
pub(crate) fn validar(dto: &Logradouro, id: i64) -> AppResult<Logradouro> {
    Ok(Logradouro::criar(
        id,
        &dto.cep,
        &dto.nome,
        &dto.bairro,
        &dto.cidade,
        &dto.estado,
        &dto.pais,
    )?)
}

pub async fn adicionar(db_pool: &SqlitePool, dto: &Logradouro) -> AppResult<Logradouro> {
    let logradouro = validar(dto, 0)?;
    logradouro_repo::add(db_pool, &logradouro).await
}

pub async fn obter_por_id(db_pool: &SqlitePool, id: i64) -> AppResult<Option<Logradouro>> {
    logradouro_repo::find_by_id(db_pool, id).await
}

pub async fn obter_todos(db_pool: &SqlitePool) -> AppResult<Vec<Logradouro>> {
    logradouro_repo::find_all(db_pool).await
}

pub async fn atualizar(db_pool: &SqlitePool, dto: &Logradouro) -> AppResult<Option<Logradouro>> {
    let logradouro = validar(dto, dto.id)?;
    logradouro_repo::update(db_pool, &logradouro).await
}

pub async fn remover(db_pool: &SqlitePool, id: i64) -> AppResult<bool> {
    logradouro_repo::delete(db_pool, id).await
}
