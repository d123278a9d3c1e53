// src/services/aluno_service.rs
use crate::{
    error::{AppError, AppResult, DomainError},
    models::{
        aluno::{normalizar_cpf, Aluno, DadosAluno},
        arquivo::Arquivo,
        dto::AlunoDto,
        logradouro::Logradouro,
    },
    repositories::{aluno_repo, logradouro_repo},
    services::{auth_service::PasswordHasher, logradouro_service},
};
use serde::Deserialize;
use sqlx::SqlitePool;

/// Critério da pesquisa na lista de alunos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FiltroAluno {
    Id,
    #[default]
    Cpf,
}

pub async fn adicionar(
    db_pool: &SqlitePool,
    hasher: &PasswordHasher,
    dto: &AlunoDto,
) -> AppResult<AlunoDto> {
    tracing::info!("Tentando cadastrar aluno: {}", dto.nome);
    let cpf = normalizar_cpf(&dto.cpf)?;
    if aluno_repo::cpf_exists(db_pool, &cpf).await? {
        tracing::warn!("Cadastro recusado: CPF {} já existe.", cpf);
        return Err(AppError::Conflict(format!("CPF {} já cadastrado", cpf)));
    }
    if dto.senha.trim().is_empty() {
        return Err(DomainError::CampoObrigatorio("senha").into());
    }

    let senha_hash = hasher.hash_password(&dto.senha).await?;
    let mut endereco = resolver_endereco(db_pool, &dto.endereco).await?;
    montar(dto, 0, endereco.clone(), senha_hash.clone())?;

    // Endereço novo e aluno entram juntos ou nenhum entra
    let mut tx = db_pool.begin().await?;
    if endereco.id == 0 {
        endereco = logradouro_repo::add(&mut *tx, &endereco).await?;
    }
    let aluno = montar(dto, 0, endereco, senha_hash)?;
    let inserido = aluno_repo::add(&mut *tx, &aluno).await?;
    tx.commit().await?;

    Ok(AlunoDto::from(&inserido))
}

pub async fn obter_por_id(db_pool: &SqlitePool, id: i64) -> AppResult<Option<AlunoDto>> {
    Ok(aluno_repo::find_by_id(db_pool, id).await?.as_ref().map(AlunoDto::from))
}

/// CPF com ou sem pontuação. Texto que não forma um CPF devolve `None`.
pub async fn obter_por_cpf(db_pool: &SqlitePool, cpf: &str) -> AppResult<Option<AlunoDto>> {
    let Ok(cpf) = normalizar_cpf(cpf) else {
        tracing::debug!("Pesquisa por CPF ignorada: '{}' não é um CPF.", cpf);
        return Ok(None);
    };
    Ok(aluno_repo::find_by_cpf(db_pool, &cpf).await?.as_ref().map(AlunoDto::from))
}

pub async fn obter_todos(db_pool: &SqlitePool) -> AppResult<Vec<AlunoDto>> {
    let alunos = aluno_repo::find_all(db_pool).await?;
    Ok(alunos.iter().map(AlunoDto::from).collect())
}

/// Texto vazio lista todos; filtro Id com texto não numérico não encontra nada.
pub async fn buscar(
    db_pool: &SqlitePool,
    filtro: FiltroAluno,
    texto: &str,
) -> AppResult<Vec<AlunoDto>> {
    let texto = texto.trim();
    if texto.is_empty() {
        return obter_todos(db_pool).await;
    }

    let encontrado = match filtro {
        FiltroAluno::Id => match texto.parse::<i64>() {
            Ok(id) => obter_por_id(db_pool, id).await?,
            Err(_) => None,
        },
        FiltroAluno::Cpf => obter_por_cpf(db_pool, texto).await?,
    };
    Ok(encontrado.into_iter().collect())
}

/// Substituição completa. Senha em branco mantém o hash atual.
pub async fn atualizar(
    db_pool: &SqlitePool,
    hasher: &PasswordHasher,
    dto: &AlunoDto,
) -> AppResult<Option<AlunoDto>> {
    let Some(atual) = aluno_repo::find_by_id(db_pool, dto.id).await? else {
        tracing::warn!("Atualização ignorada: aluno {} não encontrado.", dto.id);
        return Ok(None);
    };

    let cpf = normalizar_cpf(&dto.cpf)?;
    if cpf != atual.cpf() && aluno_repo::cpf_exists(db_pool, &cpf).await? {
        return Err(AppError::Conflict(format!("CPF {} já cadastrado", cpf)));
    }

    let senha_hash = if dto.senha.trim().is_empty() {
        atual.senha_hash().to_string()
    } else {
        hasher.hash_password(&dto.senha).await?
    };
    let mut endereco = resolver_endereco(db_pool, &dto.endereco).await?;
    montar(dto, atual.id(), endereco.clone(), senha_hash.clone())?;
    let endereco_anterior = atual.endereco().id;

    let mut tx = db_pool.begin().await?;
    if endereco.id == 0 {
        endereco = logradouro_repo::add(&mut *tx, &endereco).await?;
    }
    let aluno = montar(dto, atual.id(), endereco, senha_hash)?;
    let Some(atualizado) = aluno_repo::update(&mut *tx, &aluno).await? else {
        return Ok(None);
    };

    // O endereço antigo sai se ninguém mais o usar
    if atualizado.endereco().id != endereco_anterior
        && !aluno_repo::logradouro_em_uso(&mut *tx, endereco_anterior).await?
    {
        logradouro_repo::delete(&mut *tx, endereco_anterior).await?;
        tracing::info!("Logradouro {} sem moradores removido.", endereco_anterior);
    }
    tx.commit().await?;

    Ok(Some(AlunoDto::from(&atualizado)))
}

pub async fn remover(db_pool: &SqlitePool, id: i64) -> AppResult<bool> {
    aluno_repo::delete(db_pool, id).await
}

/// Endereço com ID tem de existir. Sem ID volta validado e ainda por gravar (ID 0).
async fn resolver_endereco(db_pool: &SqlitePool, endereco: &Logradouro) -> AppResult<Logradouro> {
    if endereco.id > 0 {
        return logradouro_repo::find_by_id(db_pool, endereco.id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Logradouro {}", endereco.id)));
    }
    logradouro_service::validar(endereco, 0)
}

fn montar(dto: &AlunoDto, id: i64, endereco: Logradouro, senha_hash: String) -> AppResult<Aluno> {
    Ok(Aluno::criar(DadosAluno {
        id,
        nome: dto.nome.clone(),
        cpf: dto.cpf.clone(),
        data_nascimento: dto.data_nascimento,
        telefone: dto.telefone.clone(),
        email: dto.email.clone(),
        endereco,
        numero: dto.numero.clone(),
        complemento: dto.complemento.clone(),
        senha_hash,
        foto: Arquivo::from_optional(dto.foto.clone()),
    })?)
}
