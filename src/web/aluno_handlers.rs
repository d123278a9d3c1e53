// src/web/aluno_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::dto::{AlunoDto, MatriculaDto},
    services::{
        aluno_service::{self, FiltroAluno},
        auth_service::PasswordHasher,
        matricula_service,
    },
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use sqlx::SqlitePool;

#[derive(Deserialize, Debug, Default)]
pub struct PesquisaAlunos {
    #[serde(default)]
    filtro: FiltroAluno,
    #[serde(default)]
    busca: String,
}

// GET /alunos?filtro=id|cpf&busca=...
pub async fn listar(
    State(db_pool): State<SqlitePool>,
    Query(pesquisa): Query<PesquisaAlunos>,
) -> AppResult<Json<Vec<AlunoDto>>> {
    tracing::debug!("Pesquisa de alunos: {:?}", pesquisa);
    Ok(Json(
        aluno_service::buscar(&db_pool, pesquisa.filtro, &pesquisa.busca).await?,
    ))
}

// GET /alunos/{id}
pub async fn obter(
    State(db_pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> AppResult<Json<AlunoDto>> {
    aluno_service::obter_por_id(&db_pool, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Aluno {}", id)))
}

// GET /alunos/cpf/{cpf}
pub async fn obter_por_cpf(
    State(db_pool): State<SqlitePool>,
    Path(cpf): Path<String>,
) -> AppResult<Json<AlunoDto>> {
    aluno_service::obter_por_cpf(&db_pool, &cpf)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Aluno com CPF {}", cpf)))
}

// POST /alunos
pub async fn criar(
    State(db_pool): State<SqlitePool>,
    State(hasher): State<PasswordHasher>,
    Json(payload): Json<AlunoDto>,
) -> AppResult<(StatusCode, Json<AlunoDto>)> {
    let criado = aluno_service::adicionar(&db_pool, &hasher, &payload).await?;
    tracing::info!("✅ Aluno {} criado (ID {}).", criado.nome, criado.id);
    Ok((StatusCode::CREATED, Json(criado)))
}

// PUT /alunos/{id}
pub async fn atualizar(
    State(db_pool): State<SqlitePool>,
    State(hasher): State<PasswordHasher>,
    Path(id): Path<i64>,
    Json(mut payload): Json<AlunoDto>,
) -> AppResult<Json<AlunoDto>> {
    payload.id = id;
    aluno_service::atualizar(&db_pool, &hasher, &payload)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Aluno {}", id)))
}

// DELETE /alunos/{id}
pub async fn remover(
    State(db_pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    if aluno_service::remover(&db_pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Aluno {}", id)))
    }
}

// GET /alunos/{id}/matriculas
pub async fn listar_matriculas(
    State(db_pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<MatriculaDto>>> {
    Ok(Json(matricula_service::obter_por_aluno(&db_pool, id).await?))
}

// GET /alunos/{id}/matriculas/ativas
pub async fn listar_matriculas_ativas(
    State(db_pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<MatriculaDto>>> {
    let hoje = chrono::Local::now().date_naive();
    Ok(Json(matricula_service::obter_ativas(&db_pool, id, hoje).await?))
}
