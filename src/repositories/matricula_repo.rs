// src/repositories/matricula_repo.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        aluno::Aluno,
        arquivo::Arquivo,
        matricula::{DadosMatricula, Matricula, MatriculaPlano, MatriculaRow},
        restricoes::RestricoesMedicas,
    },
    repositories::{aluno_repo, conflito_ou_erro},
};
use chrono::NaiveDate;
use sqlx::SqlitePool;
use std::collections::HashMap;

const SELECT_MATRICULA: &str = r#"
    SELECT id, aluno_id, plano, data_inicio, data_fim, objetivo,
           restricoes_medicas, laudo_medico, observacoes
    FROM matriculas
"#;

pub async fn add(db_pool: &SqlitePool, matricula: &Matricula) -> AppResult<Matricula> {
    tracing::info!("Inserindo matrícula para aluno {}", matricula.aluno().id());
    let id = sqlx::query(
        r#"
        INSERT INTO matriculas (aluno_id, plano, data_inicio, data_fim, objetivo,
                                restricoes_medicas, laudo_medico, observacoes)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(matricula.aluno().id())
    .bind(matricula.plano().as_str())
    .bind(matricula.data_inicio())
    .bind(matricula.data_fim())
    .bind(matricula.objetivo())
    .bind(matricula.restricoes().to_db())
    .bind(matricula.laudo_medico().map(Arquivo::conteudo))
    .bind(matricula.observacoes())
    .execute(db_pool)
    .await
    .map_err(|e| conflito_ou_erro(e, || format!("aluno {} inexistente", matricula.aluno().id())))?
    .last_insert_rowid();

    tracing::info!("✅ Matrícula {} inserida.", id);
    Ok(matricula.clone().com_id(id))
}

pub async fn find_by_id(db_pool: &SqlitePool, id: i64) -> AppResult<Option<Matricula>> {
    tracing::debug!("Buscando matrícula por ID: {}", id);
    let row = sqlx::query_as::<_, MatriculaRow>(&format!("{} WHERE id = ?1", SELECT_MATRICULA))
        .bind(id)
        .fetch_optional(db_pool)
        .await?;

    match row {
        Some(row) => Ok(Some(hidratar(db_pool, row, &mut HashMap::new()).await?)),
        None => Ok(None),
    }
}

pub async fn find_all(db_pool: &SqlitePool) -> AppResult<Vec<Matricula>> {
    let rows = sqlx::query_as::<_, MatriculaRow>(&format!(
        "{} ORDER BY data_inicio DESC, id DESC",
        SELECT_MATRICULA
    ))
    .fetch_all(db_pool)
    .await?;
    hidratar_todas(db_pool, rows).await
}

pub async fn find_by_aluno(db_pool: &SqlitePool, aluno_id: i64) -> AppResult<Vec<Matricula>> {
    tracing::debug!("Buscando matrículas do aluno {}", aluno_id);
    let rows = sqlx::query_as::<_, MatriculaRow>(&format!(
        "{} WHERE aluno_id = ?1 ORDER BY data_inicio DESC, id DESC",
        SELECT_MATRICULA
    ))
    .bind(aluno_id)
    .fetch_all(db_pool)
    .await?;
    hidratar_todas(db_pool, rows).await
}

/// Matrículas cujo período [início, fim] contém `hoje`.
pub async fn find_active_by_aluno(
    db_pool: &SqlitePool,
    aluno_id: i64,
    hoje: NaiveDate,
) -> AppResult<Vec<Matricula>> {
    tracing::debug!("Buscando matrículas ativas do aluno {} em {}", aluno_id, hoje);
    let rows = sqlx::query_as::<_, MatriculaRow>(&format!(
        "{} WHERE aluno_id = ?1 AND data_inicio <= ?2 AND data_fim >= ?2 ORDER BY id ASC",
        SELECT_MATRICULA
    ))
    .bind(aluno_id)
    .bind(hoje)
    .fetch_all(db_pool)
    .await?;
    hidratar_todas(db_pool, rows).await
}

/// Substituição completa pelo ID. `None` se a matrícula não existir.
pub async fn update(db_pool: &SqlitePool, matricula: &Matricula) -> AppResult<Option<Matricula>> {
    tracing::info!("Atualizando matrícula {}", matricula.id());
    let rows_affected = sqlx::query(
        r#"
        UPDATE matriculas
        SET aluno_id = ?1, plano = ?2, data_inicio = ?3, data_fim = ?4, objetivo = ?5,
            restricoes_medicas = ?6, laudo_medico = ?7, observacoes = ?8
        WHERE id = ?9
        "#,
    )
    .bind(matricula.aluno().id())
    .bind(matricula.plano().as_str())
    .bind(matricula.data_inicio())
    .bind(matricula.data_fim())
    .bind(matricula.objetivo())
    .bind(matricula.restricoes().to_db())
    .bind(matricula.laudo_medico().map(Arquivo::conteudo))
    .bind(matricula.observacoes())
    .bind(matricula.id())
    .execute(db_pool)
    .await
    .map_err(|e| conflito_ou_erro(e, || format!("aluno {} inexistente", matricula.aluno().id())))?
    .rows_affected();

    if rows_affected == 0 {
        tracing::warn!("Falha ao atualizar: matrícula {} não encontrada.", matricula.id());
        return Ok(None);
    }
    Ok(Some(matricula.clone()))
}

pub async fn delete(db_pool: &SqlitePool, id: i64) -> AppResult<bool> {
    let rows_affected = sqlx::query("DELETE FROM matriculas WHERE id = ?1")
        .bind(id)
        .execute(db_pool)
        .await?
        .rows_affected();

    tracing::info!("Remoção da matrícula {}: {} linha(s).", id, rows_affected);
    Ok(rows_affected > 0)
}

async fn hidratar_todas(db_pool: &SqlitePool, rows: Vec<MatriculaRow>) -> AppResult<Vec<Matricula>> {
    let mut alunos = HashMap::new();
    let mut matriculas = Vec::with_capacity(rows.len());
    for row in rows {
        matriculas.push(hidratar(db_pool, row, &mut alunos).await?);
    }
    Ok(matriculas)
}

async fn hidratar(
    db_pool: &SqlitePool,
    row: MatriculaRow,
    alunos: &mut HashMap<i64, Aluno>,
) -> AppResult<Matricula> {
    let aluno = match alunos.get(&row.aluno_id) {
        Some(aluno) => aluno.clone(),
        None => {
            let aluno = aluno_repo::find_by_id(db_pool, row.aluno_id)
                .await?
                .ok_or_else(|| {
                    tracing::error!(
                        "CRÍTICO: matrícula {} aponta para aluno inexistente {}",
                        row.id,
                        row.aluno_id
                    );
                    AppError::InternalServerError
                })?;
            alunos.insert(row.aluno_id, aluno.clone());
            aluno
        }
    };

    let matricula = Matricula::criar(DadosMatricula {
        id: row.id,
        aluno,
        plano: row.plano.parse::<MatriculaPlano>()?,
        data_inicio: row.data_inicio,
        data_fim: row.data_fim,
        objetivo: row.objetivo,
        restricoes: RestricoesMedicas::from_db(row.restricoes_medicas)?,
        laudo_medico: Arquivo::from_optional(row.laudo_medico),
        observacoes: row.observacoes,
    })?;
    Ok(matricula)
}
