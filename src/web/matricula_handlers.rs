// src/web/matricula_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::dto::{MatriculaDto, SubmissaoMatricula},
    services::{
        matricula_service::{self, FiltroMatricula, ResultadoSubmissao},
        validacao_matricula::ModoMatricula,
    },
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;

#[derive(Deserialize, Debug, Default)]
pub struct PesquisaMatriculas {
    #[serde(default)]
    filtro: FiltroMatricula,
    #[serde(default)]
    busca: String,
}

// Gravada -> `sucesso`; recusada -> 422 com o código e a mensagem da regra
fn responder(resultado: ResultadoSubmissao, sucesso: StatusCode) -> Response {
    match resultado {
        ResultadoSubmissao::Salva(dto) => (sucesso, Json(dto)).into_response(),
        ResultadoSubmissao::Rejeitada(rejeicao) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "codigo": rejeicao.codigo(),
                "mensagem": rejeicao.to_string(),
            })),
        )
            .into_response(),
    }
}

// GET /matriculas?filtro=nome|cpf&busca=...
pub async fn listar(
    State(db_pool): State<SqlitePool>,
    Query(pesquisa): Query<PesquisaMatriculas>,
) -> AppResult<Json<Vec<MatriculaDto>>> {
    Ok(Json(
        matricula_service::buscar(&db_pool, pesquisa.filtro, &pesquisa.busca).await?,
    ))
}

// GET /matriculas/{id}
pub async fn obter(
    State(db_pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> AppResult<Json<MatriculaDto>> {
    matricula_service::obter_por_id(&db_pool, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Matrícula {}", id)))
}

// POST /matriculas (criação: recusa se já houver matrícula ativa)
pub async fn criar(
    State(db_pool): State<SqlitePool>,
    Json(payload): Json<SubmissaoMatricula>,
) -> AppResult<Response> {
    let hoje = chrono::Local::now().date_naive();
    let resultado =
        matricula_service::submeter(&db_pool, &payload, ModoMatricula::Criacao, hoje).await?;
    Ok(responder(resultado, StatusCode::CREATED))
}

// PUT /matriculas/{id} (edição)
pub async fn atualizar(
    State(db_pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<SubmissaoMatricula>,
) -> AppResult<Response> {
    let hoje = chrono::Local::now().date_naive();
    let resultado =
        matricula_service::submeter(&db_pool, &payload, ModoMatricula::Edicao { id }, hoje)
            .await?;
    Ok(responder(resultado, StatusCode::OK))
}

// DELETE /matriculas/{id}
pub async fn remover(
    State(db_pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    if matricula_service::remover(&db_pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Matrícula {}", id)))
    }
}
