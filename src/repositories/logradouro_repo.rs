// src/repositories/logradouro_repo.rs
use crate::{error::AppResult, models::logradouro::Logradouro, repositories::conflito_ou_erro};
use sqlx::{SqliteExecutor, SqlitePool};

const SELECT_LOGRADOURO: &str =
    "SELECT id, cep, nome, bairro, cidade, estado, pais FROM logradouros";

/// Aceita o pool ou uma transação aberta.
pub async fn add<'c, E>(executor: E, logradouro: &Logradouro) -> AppResult<Logradouro>
where
    E: SqliteExecutor<'c>,
{
    let id = sqlx::query(
        r#"
        INSERT INTO logradouros (cep, nome, bairro, cidade, estado, pais)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(&logradouro.cep)
    .bind(&logradouro.nome)
    .bind(&logradouro.bairro)
    .bind(&logradouro.cidade)
    .bind(&logradouro.estado)
    .bind(&logradouro.pais)
    .execute(executor)
    .await?
    .last_insert_rowid();

    tracing::info!("✅ Logradouro {} inserido (CEP {}).", id, logradouro.cep);
    Ok(Logradouro {
        id,
        ..logradouro.clone()
    })
}

pub async fn find_by_id(db_pool: &SqlitePool, id: i64) -> AppResult<Option<Logradouro>> {
    tracing::debug!("Buscando logradouro por ID: {}", id);
    let logradouro = sqlx::query_as::<_, Logradouro>(&format!("{} WHERE id = ?1", SELECT_LOGRADOURO))
        .bind(id)
        .fetch_optional(db_pool)
        .await?;
    Ok(logradouro)
}

pub async fn find_all(db_pool: &SqlitePool) -> AppResult<Vec<Logradouro>> {
    let logradouros =
        sqlx::query_as::<_, Logradouro>(&format!("{} ORDER BY id ASC", SELECT_LOGRADOURO))
            .fetch_all(db_pool)
            .await?;
    tracing::debug!("Encontrados {} logradouros.", logradouros.len());
    Ok(logradouros)
}

/// Substitui todos os campos. `None` se o ID não existir.
pub async fn update(db_pool: &SqlitePool, logradouro: &Logradouro) -> AppResult<Option<Logradouro>> {
    let rows_affected = sqlx::query(
        r#"
        UPDATE logradouros
        SET cep = ?1, nome = ?2, bairro = ?3, cidade = ?4, estado = ?5, pais = ?6
        WHERE id = ?7
        "#,
    )
    .bind(&logradouro.cep)
    .bind(&logradouro.nome)
    .bind(&logradouro.bairro)
    .bind(&logradouro.cidade)
    .bind(&logradouro.estado)
    .bind(&logradouro.pais)
    .bind(logradouro.id)
    .execute(db_pool)
    .await?
    .rows_affected();

    if rows_affected == 0 {
        tracing::warn!("Falha ao atualizar: logradouro {} não encontrado.", logradouro.id);
        return Ok(None);
    }
    tracing::info!("✅ Logradouro {} atualizado.", logradouro.id);
    Ok(Some(logradouro.clone()))
}

/// Recusa (Conflict) se algum aluno ainda usar este endereço.
pub async fn delete<'c, E>(executor: E, id: i64) -> AppResult<bool>
where
    E: SqliteExecutor<'c>,
{
    let rows_affected = sqlx::query("DELETE FROM logradouros WHERE id = ?1")
        .bind(id)
        .execute(executor)
        .await
        .map_err(|e| conflito_ou_erro(e, || format!("logradouro {} está em uso por alunos", id)))?
        .rows_affected();

    tracing::info!("Remoção do logradouro {}: {} linha(s).", id, rows_affected);
    Ok(rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;

    fn centro() -> Logradouro {
        Logradouro::criar(0, "89500000", "Rua XV", "Centro", "Caçador", "SC", "Brasil")
            .expect("valid address")
    }

    #[tokio::test]
    async fn add_assigns_identity_and_reads_back() {
        let pool = create_memory_pool().await.expect("pool");
        let inserido = add(&pool, &centro()).await.expect("insert");
        assert!(inserido.id > 0);

        let lido = find_by_id(&pool, inserido.id).await.expect("query");
        assert_eq!(lido, Some(inserido));
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_rows() {
        let pool = create_memory_pool().await.expect("pool");
        let fantasma = Logradouro { id: 99, ..centro() };
        assert_eq!(update(&pool, &fantasma).await.expect("update"), None);
        assert!(!delete(&pool, 99).await.expect("delete"));

        let inserido = add(&pool, &centro()).await.expect("insert");
        let alterado = Logradouro {
            bairro: "Martello".to_string(),
            ..inserido.clone()
        };
        assert_eq!(
            update(&pool, &alterado).await.expect("update"),
            Some(alterado.clone())
        );
        assert!(delete(&pool, inserido.id).await.expect("delete"));
        assert!(find_all(&pool).await.expect("list").is_empty());
    }
}
