// src/repositories/aluno_repo.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        aluno::{Aluno, AlunoRow, DadosAluno},
        arquivo::Arquivo,
        logradouro::Logradouro,
    },
    repositories::{conflito_ou_erro, logradouro_repo},
};
use sqlx::{SqliteExecutor, SqlitePool};
use std::collections::HashMap;

const SELECT_ALUNO: &str = r#"
    SELECT id, nome, cpf, data_nascimento, telefone, email, logradouro_id,
           numero, complemento, senha_hash, foto
    FROM alunos
"#;

pub async fn add<'c, E>(executor: E, aluno: &Aluno) -> AppResult<Aluno>
where
    E: SqliteExecutor<'c>,
{
    tracing::info!("Tentando inserir aluno com CPF {}", aluno.cpf());
    let id = sqlx::query(
        r#"
        INSERT INTO alunos (nome, cpf, data_nascimento, telefone, email, logradouro_id,
                            numero, complemento, senha_hash, foto)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        "#,
    )
    .bind(aluno.nome())
    .bind(aluno.cpf())
    .bind(aluno.data_nascimento())
    .bind(aluno.telefone())
    .bind(aluno.email())
    .bind(aluno.endereco().id)
    .bind(aluno.numero())
    .bind(aluno.complemento())
    .bind(aluno.senha_hash())
    .bind(aluno.foto().conteudo())
    .execute(executor)
    .await
    .map_err(|e| {
        conflito_ou_erro(e, || {
            format!("CPF {} já cadastrado ou endereço inexistente", aluno.cpf())
        })
    })?
    .last_insert_rowid();

    tracing::info!("✅ Aluno {} inserido.", id);
    Ok(aluno.clone().com_id(id))
}

pub async fn find_by_id(db_pool: &SqlitePool, id: i64) -> AppResult<Option<Aluno>> {
    tracing::debug!("Buscando aluno por ID: {}", id);
    let row = sqlx::query_as::<_, AlunoRow>(&format!("{} WHERE id = ?1", SELECT_ALUNO))
        .bind(id)
        .fetch_optional(db_pool)
        .await?;

    match row {
        Some(row) => Ok(Some(hidratar(db_pool, row, &mut HashMap::new()).await?)),
        None => {
            tracing::debug!("Aluno '{}' não encontrado.", id);
            Ok(None)
        }
    }
}

/// `cpf` já normalizado (só dígitos).
pub async fn find_by_cpf(db_pool: &SqlitePool, cpf: &str) -> AppResult<Option<Aluno>> {
    tracing::debug!("Buscando aluno por CPF: {}", cpf);
    let row = sqlx::query_as::<_, AlunoRow>(&format!("{} WHERE cpf = ?1", SELECT_ALUNO))
        .bind(cpf)
        .fetch_optional(db_pool)
        .await?;

    match row {
        Some(row) => Ok(Some(hidratar(db_pool, row, &mut HashMap::new()).await?)),
        None => Ok(None),
    }
}

pub async fn cpf_exists(db_pool: &SqlitePool, cpf: &str) -> AppResult<bool> {
    let existe: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM alunos WHERE cpf = ?1)")
        .bind(cpf)
        .fetch_one(db_pool)
        .await?;
    Ok(existe)
}

/// Há algum aluno a morar neste logradouro?
pub async fn logradouro_em_uso<'c, E>(executor: E, logradouro_id: i64) -> AppResult<bool>
where
    E: SqliteExecutor<'c>,
{
    let em_uso: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM alunos WHERE logradouro_id = ?1)")
            .bind(logradouro_id)
            .fetch_one(executor)
            .await?;
    Ok(em_uso)
}

pub async fn find_all(db_pool: &SqlitePool) -> AppResult<Vec<Aluno>> {
    tracing::debug!("Buscando todos os alunos...");
    let rows = sqlx::query_as::<_, AlunoRow>(&format!("{} ORDER BY nome ASC, id ASC", SELECT_ALUNO))
        .fetch_all(db_pool)
        .await?;

    // Vários alunos partilham o mesmo endereço: cada logradouro é lido uma vez
    let mut enderecos = HashMap::new();
    let mut alunos = Vec::with_capacity(rows.len());
    for row in rows {
        alunos.push(hidratar(db_pool, row, &mut enderecos).await?);
    }
    tracing::debug!("Encontrados {} alunos.", alunos.len());
    Ok(alunos)
}

/// Substituição completa pelo ID. `None` se o aluno não existir.
pub async fn update<'c, E>(executor: E, aluno: &Aluno) -> AppResult<Option<Aluno>>
where
    E: SqliteExecutor<'c>,
{
    tracing::info!("Atualizando dados do aluno {}", aluno.id());
    let rows_affected = sqlx::query(
        r#"
        UPDATE alunos
        SET nome = ?1, cpf = ?2, data_nascimento = ?3, telefone = ?4, email = ?5,
            logradouro_id = ?6, numero = ?7, complemento = ?8, senha_hash = ?9, foto = ?10
        WHERE id = ?11
        "#,
    )
    .bind(aluno.nome())
    .bind(aluno.cpf())
    .bind(aluno.data_nascimento())
    .bind(aluno.telefone())
    .bind(aluno.email())
    .bind(aluno.endereco().id)
    .bind(aluno.numero())
    .bind(aluno.complemento())
    .bind(aluno.senha_hash())
    .bind(aluno.foto().conteudo())
    .bind(aluno.id())
    .execute(executor)
    .await
    .map_err(|e| {
        conflito_ou_erro(e, || {
            format!("CPF {} já cadastrado ou endereço inexistente", aluno.cpf())
        })
    })?
    .rows_affected();

    if rows_affected == 0 {
        tracing::warn!("Falha ao atualizar: aluno '{}' não encontrado.", aluno.id());
        return Ok(None);
    }
    Ok(Some(aluno.clone()))
}

/// Recusa (Conflict) se o aluno ainda tiver matrículas.
pub async fn delete(db_pool: &SqlitePool, id: i64) -> AppResult<bool> {
    let rows_affected = sqlx::query("DELETE FROM alunos WHERE id = ?1")
        .bind(id)
        .execute(db_pool)
        .await
        .map_err(|e| conflito_ou_erro(e, || format!("aluno {} possui matrículas", id)))?
        .rows_affected();

    tracing::info!("Remoção do aluno {}: {} linha(s).", id, rows_affected);
    Ok(rows_affected > 0)
}

async fn hidratar(
    db_pool: &SqlitePool,
    row: AlunoRow,
    enderecos: &mut HashMap<i64, Logradouro>,
) -> AppResult<Aluno> {
    let endereco = match enderecos.get(&row.logradouro_id) {
        Some(endereco) => endereco.clone(),
        None => {
            let endereco = logradouro_repo::find_by_id(db_pool, row.logradouro_id)
                .await?
                .ok_or_else(|| {
                    // A chave estrangeira deveria impedir isto
                    tracing::error!(
                        "CRÍTICO: aluno {} aponta para logradouro inexistente {}",
                        row.id,
                        row.logradouro_id
                    );
                    AppError::InternalServerError
                })?;
            enderecos.insert(row.logradouro_id, endereco.clone());
            endereco
        }
    };

    let aluno = Aluno::criar(DadosAluno {
        id: row.id,
        nome: row.nome,
        cpf: row.cpf,
        data_nascimento: row.data_nascimento,
        telefone: row.telefone,
        email: row.email,
        endereco,
        numero: row.numero,
        complemento: row.complemento,
        senha_hash: row.senha_hash,
        foto: Arquivo::from_optional(Some(row.foto)),
    })?;
    Ok(aluno)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use chrono::NaiveDate;

    async fn endereco(pool: &SqlitePool) -> Logradouro {
        let logradouro =
            Logradouro::criar(0, "89500000", "Rua XV", "Centro", "Caçador", "SC", "Brasil")
                .expect("valid address");
        logradouro_repo::add(pool, &logradouro).await.expect("insert address")
    }

    fn aluno(endereco: Logradouro, cpf: &str) -> Aluno {
        Aluno::criar(DadosAluno {
            id: 0,
            nome: "Aluno Teste".to_string(),
            cpf: cpf.to_string(),
            data_nascimento: NaiveDate::from_ymd_opt(2010, 10, 9).expect("valid date"),
            telefone: "49999999999".to_string(),
            email: "aluno@teste.com".to_string(),
            endereco,
            numero: "123".to_string(),
            complemento: "Complemento casa".to_string(),
            senha_hash: "hash".to_string(),
            foto: Some(Arquivo::new(vec![1, 2, 3]).expect("non-empty")),
        })
        .expect("valid student")
    }

    #[tokio::test]
    async fn add_then_lookup_by_id_and_cpf() {
        let pool = create_memory_pool().await.expect("pool");
        let endereco = endereco(&pool).await;
        let inserido = add(&pool, &aluno(endereco, "11140608981")).await.expect("insert");
        assert!(inserido.id() > 0);

        let por_id = find_by_id(&pool, inserido.id()).await.expect("query");
        assert_eq!(por_id.as_ref(), Some(&inserido));

        let por_cpf = find_by_cpf(&pool, "11140608981").await.expect("query");
        assert_eq!(por_cpf, Some(inserido));
        assert!(cpf_exists(&pool, "11140608981").await.expect("query"));
        assert!(!cpf_exists(&pool, "00000000000").await.expect("query"));
    }

    #[tokio::test]
    async fn duplicate_cpf_is_a_conflict() {
        let pool = create_memory_pool().await.expect("pool");
        let endereco = endereco(&pool).await;
        add(&pool, &aluno(endereco.clone(), "11140608981")).await.expect("insert");

        let err = add(&pool, &aluno(endereco, "11140608981")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn address_in_use_cannot_be_deleted() {
        let pool = create_memory_pool().await.expect("pool");
        let endereco = endereco(&pool).await;
        let inserido = add(&pool, &aluno(endereco.clone(), "11140608981")).await.expect("insert");

        let err = logradouro_repo::delete(&pool, endereco.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)), "got {:?}", err);

        assert!(delete(&pool, inserido.id()).await.expect("delete"));
        assert!(logradouro_repo::delete(&pool, endereco.id).await.expect("delete"));
    }
}
