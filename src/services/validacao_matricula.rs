// src/services/validacao_matricula.rs
// Regras de negócio para aceitar (ou não) uma matrícula antes de gravar.
//
// Uma recusa é um resultado normal (`Veredito::Rejeitada`), não um erro.
// Só falhas de I/O na consulta chegam como `Err`.
use crate::{
    error::AppResult,
    models::{aluno::Aluno, dto::SubmissaoMatricula, matricula::Matricula},
    repositories::matricula_repo,
};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use sqlx::SqlitePool;
use std::fmt;

/// Faixa etária (inclusiva) em que o laudo médico é obrigatório.
pub const IDADE_LAUDO_MIN: i32 = 12;
pub const IDADE_LAUDO_MAX: i32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModoMatricula {
    Criacao,
    /// A matrícula em edição é assumida como a ativa: não há verificação de exclusividade.
    Edicao { id: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotivoLaudo {
    FaixaEtaria,
    RestricaoMedica,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejeicao {
    AlunoNaoSelecionado,
    ObjetivoObrigatorio,
    PeriodoInvalido,
    MatriculaAtivaExistente,
    LaudoObrigatorio(MotivoLaudo),
}

impl Rejeicao {
    /// Identificador estável, para clientes da API.
    pub fn codigo(&self) -> &'static str {
        match self {
            Rejeicao::AlunoNaoSelecionado => "aluno_nao_selecionado",
            Rejeicao::ObjetivoObrigatorio => "objetivo_obrigatorio",
            Rejeicao::PeriodoInvalido => "periodo_invalido",
            Rejeicao::MatriculaAtivaExistente => "matricula_ativa_existente",
            Rejeicao::LaudoObrigatorio(MotivoLaudo::FaixaEtaria) => "laudo_obrigatorio_idade",
            Rejeicao::LaudoObrigatorio(MotivoLaudo::RestricaoMedica) => {
                "laudo_obrigatorio_restricao"
            }
        }
    }
}

impl fmt::Display for Rejeicao {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejeicao::AlunoNaoSelecionado => {
                write!(f, "Você precisa buscar e selecionar um aluno.")
            }
            Rejeicao::ObjetivoObrigatorio => write!(f, "O campo Objetivo é obrigatório."),
            Rejeicao::PeriodoInvalido => {
                write!(f, "A Data Final deve ser maior que a Data de Início.")
            }
            Rejeicao::MatriculaAtivaExistente => {
                write!(f, "Este aluno já possui uma matrícula ativa.")
            }
            Rejeicao::LaudoObrigatorio(MotivoLaudo::FaixaEtaria) => write!(
                f,
                "O Laudo Médico é obrigatório. Motivo: por ter entre {} e {} anos.",
                IDADE_LAUDO_MIN, IDADE_LAUDO_MAX
            ),
            Rejeicao::LaudoObrigatorio(MotivoLaudo::RestricaoMedica) => write!(
                f,
                "O Laudo Médico é obrigatório. Motivo: pois foram informadas restrições de saúde."
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Veredito {
    Aceita,
    Rejeitada(Rejeicao),
}

/// O que a validação precisa saber do aluno já persistido.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlunoReferencia {
    pub id: i64,
    pub data_nascimento: NaiveDate,
}

impl From<&Aluno> for AlunoReferencia {
    fn from(aluno: &Aluno) -> Self {
        Self {
            id: aluno.id(),
            data_nascimento: aluno.data_nascimento(),
        }
    }
}

/// Leitura das matrículas ativas de um aluno.
#[async_trait]
pub trait ConsultaMatriculas: Send + Sync {
    async fn matriculas_ativas(&self, aluno_id: i64, hoje: NaiveDate) -> AppResult<Vec<Matricula>>;
}

#[async_trait]
impl ConsultaMatriculas for SqlitePool {
    async fn matriculas_ativas(&self, aluno_id: i64, hoje: NaiveDate) -> AppResult<Vec<Matricula>> {
        matricula_repo::find_active_by_aluno(self, aluno_id, hoje).await
    }
}

/// Idade em anos completos: desconta um se o aniversário deste ano ainda não chegou.
pub fn idade_em(nascimento: NaiveDate, hoje: NaiveDate) -> i32 {
    let mut idade = hoje.year() - nascimento.year();
    if (hoje.month(), hoje.day()) < (nascimento.month(), nascimento.day()) {
        idade -= 1;
    }
    idade
}

/// Decide se a submissão pode ser gravada. A primeira regra que falha determina a recusa.
pub async fn validar_matricula<C>(
    submissao: &SubmissaoMatricula,
    aluno: Option<AlunoReferencia>,
    modo: ModoMatricula,
    hoje: NaiveDate,
    consulta: &C,
) -> AppResult<Veredito>
where
    C: ConsultaMatriculas + ?Sized,
{
    let Some(aluno) = aluno.filter(|a| a.id > 0) else {
        return Ok(Veredito::Rejeitada(Rejeicao::AlunoNaoSelecionado));
    };

    if submissao.objetivo.trim().is_empty() {
        return Ok(Veredito::Rejeitada(Rejeicao::ObjetivoObrigatorio));
    }

    if submissao.data_fim <= submissao.data_inicio {
        return Ok(Veredito::Rejeitada(Rejeicao::PeriodoInvalido));
    }

    if modo == ModoMatricula::Criacao {
        let ativas = consulta.matriculas_ativas(aluno.id, hoje).await?;
        if ativas.iter().any(|m| m.ativa_em(hoje)) {
            tracing::debug!("Aluno {} já tem {} matrícula(s) ativa(s).", aluno.id, ativas.len());
            return Ok(Veredito::Rejeitada(Rejeicao::MatriculaAtivaExistente));
        }
    }

    let idade = idade_em(aluno.data_nascimento, hoje);
    let por_idade = (IDADE_LAUDO_MIN..=IDADE_LAUDO_MAX).contains(&idade);
    // Qualquer bit ligado conta como restrição declarada
    let por_restricao = submissao.restricoes_medicas != 0;

    if (por_idade || por_restricao) && submissao.laudo().is_none() {
        let motivo = if por_idade {
            MotivoLaudo::FaixaEtaria
        } else {
            MotivoLaudo::RestricaoMedica
        };
        return Ok(Veredito::Rejeitada(Rejeicao::LaudoObrigatorio(motivo)));
    }

    Ok(Veredito::Aceita)
}
