// src/services/matricula_service.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        aluno::Aluno,
        dto::{MatriculaDto, SubmissaoMatricula},
        matricula::{DadosMatricula, Matricula},
    },
    repositories::{aluno_repo, matricula_repo},
    services::validacao_matricula::{
        validar_matricula, AlunoReferencia, ModoMatricula, Rejeicao, Veredito,
    },
};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::SqlitePool;

/// Critério do filtro local da lista de matrículas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FiltroMatricula {
    #[default]
    Nome,
    Cpf,
}

/// Resultado de `submeter`: gravada, ou recusada por uma regra de negócio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultadoSubmissao {
    Salva(MatriculaDto),
    Rejeitada(Rejeicao),
}

/// Fluxo completo de matrícula: resolve o aluno, valida e só então grava.
/// Em `Edicao`, uma matrícula inexistente devolve `AppError::NotFound`.
pub async fn submeter(
    db_pool: &SqlitePool,
    submissao: &SubmissaoMatricula,
    modo: ModoMatricula,
    hoje: NaiveDate,
) -> AppResult<ResultadoSubmissao> {
    tracing::info!("Submissão de matrícula ({:?}) para aluno {:?}", modo, submissao.aluno_id);
    submissao.restricoes()?;

    if let ModoMatricula::Edicao { id } = modo {
        if matricula_repo::find_by_id(db_pool, id).await?.is_none() {
            tracing::warn!("Edição recusada: matrícula {} não existe.", id);
            return Err(AppError::NotFound(format!("Matrícula {}", id)));
        }
    }

    let aluno = match submissao.aluno_id.filter(|id| *id > 0) {
        Some(id) => aluno_repo::find_by_id(db_pool, id).await?,
        None => None,
    };

    let veredito = validar_matricula(
        submissao,
        aluno.as_ref().map(AlunoReferencia::from),
        modo,
        hoje,
        db_pool,
    )
    .await?;

    let aluno = match (veredito, aluno) {
        (Veredito::Rejeitada(rejeicao), _) => {
            tracing::warn!("Matrícula recusada: {} ({})", rejeicao, rejeicao.codigo());
            return Ok(ResultadoSubmissao::Rejeitada(rejeicao));
        }
        (Veredito::Aceita, Some(aluno)) => aluno,
        // Aceita implica aluno resolvido
        (Veredito::Aceita, None) => return Err(AppError::InternalServerError),
    };

    let id = match modo {
        ModoMatricula::Criacao => 0,
        ModoMatricula::Edicao { id } => id,
    };
    let matricula = montar(submissao, id, aluno)?;

    let gravada = match modo {
        ModoMatricula::Criacao => matricula_repo::add(db_pool, &matricula).await?,
        ModoMatricula::Edicao { id } => matricula_repo::update(db_pool, &matricula)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Matrícula {}", id)))?,
    };

    tracing::info!("✅ Matrícula {} gravada.", gravada.id());
    Ok(ResultadoSubmissao::Salva(MatriculaDto::from(&gravada)))
}

/// Grava sem passar pelas regras de negócio (só as invariantes da fábrica).
pub async fn adicionar(db_pool: &SqlitePool, submissao: &SubmissaoMatricula) -> AppResult<MatriculaDto> {
    let aluno = carregar_aluno(db_pool, submissao).await?;
    let matricula = montar(submissao, 0, aluno)?;
    let inserida = matricula_repo::add(db_pool, &matricula).await?;
    Ok(MatriculaDto::from(&inserida))
}

pub async fn atualizar(
    db_pool: &SqlitePool,
    id: i64,
    submissao: &SubmissaoMatricula,
) -> AppResult<Option<MatriculaDto>> {
    let aluno = carregar_aluno(db_pool, submissao).await?;
    let matricula = montar(submissao, id, aluno)?;
    Ok(matricula_repo::update(db_pool, &matricula)
        .await?
        .as_ref()
        .map(MatriculaDto::from))
}

pub async fn obter_por_id(db_pool: &SqlitePool, id: i64) -> AppResult<Option<MatriculaDto>> {
    Ok(matricula_repo::find_by_id(db_pool, id)
        .await?
        .as_ref()
        .map(MatriculaDto::from))
}

pub async fn obter_todas(db_pool: &SqlitePool) -> AppResult<Vec<MatriculaDto>> {
    let matriculas = matricula_repo::find_all(db_pool).await?;
    tracing::debug!("Encontradas {} matrículas.", matriculas.len());
    Ok(matriculas.iter().map(MatriculaDto::from).collect())
}

pub async fn obter_por_aluno(db_pool: &SqlitePool, aluno_id: i64) -> AppResult<Vec<MatriculaDto>> {
    let matriculas = matricula_repo::find_by_aluno(db_pool, aluno_id).await?;
    Ok(matriculas.iter().map(MatriculaDto::from).collect())
}

pub async fn obter_ativas(
    db_pool: &SqlitePool,
    aluno_id: i64,
    hoje: NaiveDate,
) -> AppResult<Vec<MatriculaDto>> {
    let matriculas = matricula_repo::find_active_by_aluno(db_pool, aluno_id, hoje).await?;
    Ok(matriculas.iter().map(MatriculaDto::from).collect())
}

pub async fn remover(db_pool: &SqlitePool, id: i64) -> AppResult<bool> {
    matricula_repo::delete(db_pool, id).await
}

/// Filtra em memória: nome sem distinção de maiúsculas, CPF por substring.
/// Texto em branco devolve tudo.
pub fn filtrar(matriculas: &[MatriculaDto], filtro: FiltroMatricula, texto: &str) -> Vec<MatriculaDto> {
    if texto.trim().is_empty() {
        return matriculas.to_vec();
    }
    let texto_minusculo = texto.to_lowercase();
    matriculas
        .iter()
        .filter(|m| match filtro {
            FiltroMatricula::Nome => m.aluno.nome.to_lowercase().contains(&texto_minusculo),
            FiltroMatricula::Cpf => m.aluno.cpf.contains(texto),
        })
        .cloned()
        .collect()
}

pub async fn buscar(
    db_pool: &SqlitePool,
    filtro: FiltroMatricula,
    texto: &str,
) -> AppResult<Vec<MatriculaDto>> {
    let todas = obter_todas(db_pool).await?;
    Ok(filtrar(&todas, filtro, texto))
}

async fn carregar_aluno(
    db_pool: &SqlitePool,
    submissao: &SubmissaoMatricula,
) -> AppResult<Aluno> {
    let id = submissao.aluno_id.unwrap_or_default();
    aluno_repo::find_by_id(db_pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Aluno {}", id)))
}

fn montar(
    submissao: &SubmissaoMatricula,
    id: i64,
    aluno: Aluno,
) -> AppResult<Matricula> {
    Ok(Matricula::criar(DadosMatricula {
        id,
        aluno,
        plano: submissao.plano,
        data_inicio: submissao.data_inicio,
        data_fim: submissao.data_fim,
        objetivo: submissao.objetivo.clone(),
        restricoes: submissao.restricoes()?,
        laudo_medico: submissao.laudo(),
        observacoes: submissao.observacoes.clone(),
    })?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use crate::error::DomainError;
    use crate::models::{dto::AlunoDto, logradouro::Logradouro, matricula::MatriculaPlano};
    use crate::models::restricoes::RestricoesMedicas;
    use crate::services::{aluno_service, auth_service::PasswordHasher, validacao_matricula::MotivoLaudo};
    use chrono::Months;

    fn data(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn hoje() -> NaiveDate {
        data(2025, 3, 15)
    }

    async fn aluno(pool: &SqlitePool, cpf: &str, nascimento: NaiveDate) -> AlunoDto {
        let dto = AlunoDto {
            id: 0,
            nome: "Aluno Teste".to_string(),
            cpf: cpf.to_string(),
            data_nascimento: nascimento,
            telefone: "49999999999".to_string(),
            email: "aluno@teste.com".to_string(),
            endereco: Logradouro {
                id: 0,
                cep: "89500000".to_string(),
                nome: "Rua XV".to_string(),
                bairro: "Centro".to_string(),
                cidade: "Caçador".to_string(),
                estado: "SC".to_string(),
                pais: "Brasil".to_string(),
            },
            numero: "123".to_string(),
            complemento: String::new(),
            senha: "Senha@123".to_string(),
            foto: Some(vec![1, 2, 3]),
        };
        aluno_service::adicionar(pool, &PasswordHasher::new(4), &dto)
            .await
            .expect("add student")
    }

    fn submissao(aluno_id: i64) -> SubmissaoMatricula {
        SubmissaoMatricula {
            aluno_id: Some(aluno_id),
            plano: MatriculaPlano::Semestral,
            data_inicio: hoje(),
            data_fim: hoje() + Months::new(6),
            objetivo: "Emagrecer".to_string(),
            restricoes_medicas: 0,
            laudo_medico: None,
            observacoes: String::new(),
        }
    }

    #[tokio::test]
    async fn teenager_without_report_is_rejected_and_nothing_is_written() {
        let pool = create_memory_pool().await.expect("pool");
        let aluno = aluno(&pool, "11140608981", data(2010, 10, 9)).await; // 14 anos

        let resultado = submeter(&pool, &submissao(aluno.id), ModoMatricula::Criacao, hoje())
            .await
            .expect("submit");
        assert_eq!(
            resultado,
            ResultadoSubmissao::Rejeitada(Rejeicao::LaudoObrigatorio(MotivoLaudo::FaixaEtaria))
        );
        assert!(obter_todas(&pool).await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn second_active_enrollment_is_rejected_in_create_mode_only() {
        let pool = create_memory_pool().await.expect("pool");
        let aluno = aluno(&pool, "11140608981", data(1995, 1, 10)).await;

        let primeira = match submeter(&pool, &submissao(aluno.id), ModoMatricula::Criacao, hoje())
            .await
            .expect("submit")
        {
            ResultadoSubmissao::Salva(dto) => dto,
            outro => panic!("esperava gravação, veio {:?}", outro),
        };

        let segunda = submeter(&pool, &submissao(aluno.id), ModoMatricula::Criacao, hoje())
            .await
            .expect("submit");
        assert_eq!(
            segunda,
            ResultadoSubmissao::Rejeitada(Rejeicao::MatriculaAtivaExistente)
        );

        let mut edicao = submissao(aluno.id);
        edicao.objetivo = "Hipertrofia".to_string();
        let editada = submeter(
            &pool,
            &edicao,
            ModoMatricula::Edicao { id: primeira.id },
            hoje(),
        )
        .await
        .expect("submit");
        match editada {
            ResultadoSubmissao::Salva(dto) => {
                assert_eq!(dto.id, primeira.id);
                assert_eq!(dto.objetivo, "Hipertrofia");
            }
            outro => panic!("esperava gravação, veio {:?}", outro),
        }
        assert_eq!(obter_por_aluno(&pool, aluno.id).await.expect("list").len(), 1);
        assert_eq!(obter_ativas(&pool, aluno.id, hoje()).await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn unknown_student_is_reported_as_not_selected() {
        let pool = create_memory_pool().await.expect("pool");
        let resultado = submeter(&pool, &submissao(404), ModoMatricula::Criacao, hoje())
            .await
            .expect("submit");
        assert_eq!(resultado, ResultadoSubmissao::Rejeitada(Rejeicao::AlunoNaoSelecionado));
    }

    #[tokio::test]
    async fn editing_a_missing_enrollment_is_not_found() {
        let pool = create_memory_pool().await.expect("pool");
        let aluno = aluno(&pool, "11140608981", data(1995, 1, 10)).await;
        let err = submeter(&pool, &submissao(aluno.id), ModoMatricula::Edicao { id: 77 }, hoje())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn unknown_restriction_bits_are_refused_and_nothing_is_written() {
        let pool = create_memory_pool().await.expect("pool");
        let aluno = aluno(&pool, "11140608981", data(1990, 1, 10)).await; // 35 anos
        let mut sub = submissao(aluno.id);
        sub.restricoes_medicas = 64;

        let err = submeter(&pool, &sub, ModoMatricula::Criacao, hoje()).await.unwrap_err();
        assert!(
            matches!(err, AppError::Domain(DomainError::RestricaoDesconhecida(64))),
            "got {:?}",
            err
        );
        let err = adicionar(&pool, &sub).await.unwrap_err();
        assert!(matches!(err, AppError::Domain(DomainError::RestricaoDesconhecida(64))));
        assert!(obter_todas(&pool).await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn editing_a_missing_enrollment_is_not_found_even_with_a_broken_payload() {
        let pool = create_memory_pool().await.expect("pool");
        let aluno = aluno(&pool, "11140608981", data(1995, 1, 10)).await;
        let mut sub = submissao(aluno.id);
        sub.objetivo = "   ".to_string();
        sub.data_fim = sub.data_inicio;

        let err = submeter(&pool, &sub, ModoMatricula::Edicao { id: 404 }, hoje())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn restricted_adult_with_report_is_saved_with_flags() {
        let pool = create_memory_pool().await.expect("pool");
        let aluno = aluno(&pool, "11140608981", data(1995, 1, 10)).await;
        let mut sub = submissao(aluno.id);
        sub.restricoes_medicas = (RestricoesMedicas::ALERGIAS | RestricoesMedicas::DIABETES).bits();
        sub.laudo_medico = Some(vec![7, 7, 7]);

        let salva = match submeter(&pool, &sub, ModoMatricula::Criacao, hoje()).await.expect("submit") {
            ResultadoSubmissao::Salva(dto) => dto,
            outro => panic!("esperava gravação, veio {:?}", outro),
        };
        let lida = obter_por_id(&pool, salva.id).await.expect("query").expect("present");
        assert_eq!(
            lida.restricoes(),
            Ok(RestricoesMedicas::ALERGIAS | RestricoesMedicas::DIABETES)
        );
        assert_eq!(lida.laudo_medico, Some(vec![7, 7, 7]));
        assert!(remover(&pool, salva.id).await.expect("delete"));
    }

    #[tokio::test]
    async fn filter_by_name_ignores_case_and_by_cpf_matches_substrings() {
        let pool = create_memory_pool().await.expect("pool");
        let aluno = aluno(&pool, "11140608981", data(1995, 1, 10)).await;
        adicionar(&pool, &submissao(aluno.id)).await.expect("add");

        assert_eq!(buscar(&pool, FiltroMatricula::Nome, "aluno TES").await.expect("search").len(), 1);
        assert_eq!(buscar(&pool, FiltroMatricula::Cpf, "406089").await.expect("search").len(), 1);
        assert!(buscar(&pool, FiltroMatricula::Nome, "Maria").await.expect("search").is_empty());
        assert!(buscar(&pool, FiltroMatricula::Cpf, "999").await.expect("search").is_empty());
        assert_eq!(buscar(&pool, FiltroMatricula::Cpf, "  ").await.expect("search").len(), 1);
    }

    #[tokio::test]
    async fn plain_add_and_update_bypass_business_rules() {
        let pool = create_memory_pool().await.expect("pool");
        let aluno = aluno(&pool, "11140608981", data(2010, 10, 9)).await;
        let criada = adicionar(&pool, &submissao(aluno.id)).await.expect("add");
        assert!(criada.id > 0);

        let mut alterada = submissao(aluno.id);
        alterada.plano = MatriculaPlano::Anual;
        let atualizada = atualizar(&pool, criada.id, &alterada)
            .await
            .expect("update")
            .expect("present");
        assert_eq!(atualizada.plano, MatriculaPlano::Anual);
        assert!(atualizar(&pool, 999, &alterada).await.expect("update").is_none());
    }
}
