// src/models/matricula.rs
use crate::error::DomainError;
use crate::models::{aluno::Aluno, arquivo::Arquivo, restricoes::RestricoesMedicas};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MatriculaPlano {
    #[default]
    Mensal,
    Semestral,
    Anual,
}

impl MatriculaPlano {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatriculaPlano::Mensal => "Mensal",
            MatriculaPlano::Semestral => "Semestral",
            MatriculaPlano::Anual => "Anual",
        }
    }
}

impl FromStr for MatriculaPlano {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Mensal" => Ok(MatriculaPlano::Mensal),
            "Semestral" => Ok(MatriculaPlano::Semestral),
            "Anual" => Ok(MatriculaPlano::Anual),
            outro => Err(DomainError::PlanoDesconhecido(outro.to_string())),
        }
    }
}

/// Dados de entrada da fábrica `Matricula::criar`.
#[derive(Debug, Clone)]
pub struct DadosMatricula {
    pub id: i64,
    pub aluno: Aluno,
    pub plano: MatriculaPlano,
    pub data_inicio: NaiveDate,
    pub data_fim: NaiveDate,
    pub objetivo: String,
    pub restricoes: RestricoesMedicas,
    pub laudo_medico: Option<Arquivo>,
    pub observacoes: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matricula {
    id: i64,
    aluno: Aluno,
    plano: MatriculaPlano,
    data_inicio: NaiveDate,
    data_fim: NaiveDate,
    objetivo: String,
    restricoes: RestricoesMedicas,
    laudo_medico: Option<Arquivo>,
    observacoes: String,
}

impl Matricula {
    pub fn criar(dados: DadosMatricula) -> Result<Self, DomainError> {
        let objetivo = dados.objetivo.trim();
        if objetivo.is_empty() {
            return Err(DomainError::CampoObrigatorio("objetivo"));
        }
        if dados.data_fim <= dados.data_inicio {
            return Err(DomainError::PeriodoInvalido);
        }

        Ok(Self {
            id: dados.id,
            aluno: dados.aluno,
            plano: dados.plano,
            data_inicio: dados.data_inicio,
            data_fim: dados.data_fim,
            objetivo: objetivo.to_string(),
            restricoes: dados.restricoes,
            laudo_medico: dados.laudo_medico,
            observacoes: dados.observacoes.trim().to_string(),
        })
    }

    pub(crate) fn com_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    /// Ativa = o período [início, fim] contém o dia indicado.
    pub fn ativa_em(&self, dia: NaiveDate) -> bool {
        self.data_inicio <= dia && dia <= self.data_fim
    }

    pub fn id(&self) -> i64 {
        self.id
    }
    pub fn aluno(&self) -> &Aluno {
        &self.aluno
    }
    pub fn plano(&self) -> MatriculaPlano {
        self.plano
    }
    pub fn data_inicio(&self) -> NaiveDate {
        self.data_inicio
    }
    pub fn data_fim(&self) -> NaiveDate {
        self.data_fim
    }
    pub fn objetivo(&self) -> &str {
        &self.objetivo
    }
    pub fn restricoes(&self) -> RestricoesMedicas {
        self.restricoes
    }
    pub fn laudo_medico(&self) -> Option<&Arquivo> {
        self.laudo_medico.as_ref()
    }
    pub fn observacoes(&self) -> &str {
        &self.observacoes
    }
}

/// Linha da tabela `matriculas`; o aluno é carregado à parte.
#[derive(Debug, FromRow)]
pub struct MatriculaRow {
    pub id: i64,
    pub aluno_id: i64,
    pub plano: String,
    pub data_inicio: NaiveDate,
    pub data_fim: NaiveDate,
    pub objetivo: String,
    pub restricoes_medicas: i64,
    pub laudo_medico: Option<Vec<u8>>,
    pub observacoes: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{aluno::DadosAluno, logradouro::Logradouro};

    fn data(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn aluno() -> Aluno {
        Aluno::criar(DadosAluno {
            id: 1,
            nome: "Aluno Teste".to_string(),
            cpf: "11140608981".to_string(),
            data_nascimento: data(2010, 10, 9),
            telefone: "49999999999".to_string(),
            email: "aluno@teste.com".to_string(),
            endereco: Logradouro::criar(4, "89500000", "Rua", "Centro", "Caçador", "SC", "Brasil")
                .expect("valid address"),
            numero: "123".to_string(),
            complemento: String::new(),
            senha_hash: "hash".to_string(),
            foto: Some(Arquivo::new(vec![1]).expect("non-empty")),
        })
        .expect("valid student")
    }

    fn dados() -> DadosMatricula {
        DadosMatricula {
            id: 0,
            aluno: aluno(),
            plano: MatriculaPlano::Semestral,
            data_inicio: data(2024, 1, 1),
            data_fim: data(2024, 7, 1),
            objetivo: " Emagrecer ".to_string(),
            restricoes: RestricoesMedicas::ALERGIAS,
            laudo_medico: Arquivo::from_optional(Some(vec![1, 2, 3])),
            observacoes: "Sem observações".to_string(),
        }
    }

    #[test]
    fn factory_trims_objective() {
        let matricula = Matricula::criar(dados()).expect("valid enrollment");
        assert_eq!(matricula.objetivo(), "Emagrecer");
        assert_eq!(matricula.plano(), MatriculaPlano::Semestral);
    }

    #[test]
    fn end_date_must_follow_start_date() {
        let mut mesmo_dia = dados();
        mesmo_dia.data_fim = mesmo_dia.data_inicio;
        assert_eq!(
            Matricula::criar(mesmo_dia).unwrap_err(),
            DomainError::PeriodoInvalido
        );
    }

    #[test]
    fn active_range_is_inclusive() {
        let matricula = Matricula::criar(dados()).expect("valid enrollment");
        assert!(matricula.ativa_em(data(2024, 1, 1)));
        assert!(matricula.ativa_em(data(2024, 7, 1)));
        assert!(!matricula.ativa_em(data(2024, 7, 2)));
        assert!(!matricula.ativa_em(data(2023, 12, 31)));
    }

    #[test]
    fn plan_names_parse_back() {
        for plano in [MatriculaPlano::Mensal, MatriculaPlano::Semestral, MatriculaPlano::Anual] {
            assert_eq!(plano.as_str().parse::<MatriculaPlano>(), Ok(plano));
        }
        assert!("Diario".parse::<MatriculaPlano>().is_err());
    }
}
