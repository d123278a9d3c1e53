// src/models/dto.rs
// Objetos de transferência usados pela apresentação (ecrãs e API JSON).
use crate::error::DomainError;
use crate::models::{
    aluno::Aluno,
    arquivo::Arquivo,
    logradouro::Logradouro,
    matricula::{Matricula, MatriculaPlano},
    restricoes::RestricoesMedicas,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlunoDto {
    #[serde(default)]
    pub id: i64,
    pub nome: String,
    pub cpf: String,
    pub data_nascimento: NaiveDate,
    pub telefone: String,
    pub email: String,
    pub endereco: Logradouro,
    pub numero: String,
    #[serde(default)]
    pub complemento: String,
    /// Só de entrada: nunca é devolvida.
    #[serde(default, skip_serializing)]
    pub senha: String,
    pub foto: Option<Vec<u8>>,
}

impl From<&Aluno> for AlunoDto {
    fn from(aluno: &Aluno) -> Self {
        Self {
            id: aluno.id(),
            nome: aluno.nome().to_string(),
            cpf: aluno.cpf().to_string(),
            data_nascimento: aluno.data_nascimento(),
            telefone: aluno.telefone().to_string(),
            email: aluno.email().to_string(),
            endereco: aluno.endereco().clone(),
            numero: aluno.numero().to_string(),
            complemento: aluno.complemento().to_string(),
            senha: String::new(),
            foto: Some(aluno.foto().conteudo().to_vec()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatriculaDto {
    #[serde(default)]
    pub id: i64,
    pub aluno: AlunoDto,
    pub plano: MatriculaPlano,
    pub data_inicio: NaiveDate,
    pub data_fim: NaiveDate,
    pub objetivo: String,
    /// Máscara de bits de `RestricoesMedicas`.
    #[serde(default)]
    pub restricoes_medicas: u32,
    pub laudo_medico: Option<Vec<u8>>,
    #[serde(default)]
    pub observacoes: String,
}

impl MatriculaDto {
    pub fn restricoes(&self) -> Result<RestricoesMedicas, DomainError> {
        RestricoesMedicas::from_mascara(self.restricoes_medicas)
    }

    pub fn submissao(&self) -> SubmissaoMatricula {
        SubmissaoMatricula {
            aluno_id: Some(self.aluno.id).filter(|id| *id > 0),
            plano: self.plano,
            data_inicio: self.data_inicio,
            data_fim: self.data_fim,
            objetivo: self.objetivo.clone(),
            restricoes_medicas: self.restricoes_medicas,
            laudo_medico: self.laudo_medico.clone(),
            observacoes: self.observacoes.clone(),
        }
    }
}

impl From<&Matricula> for MatriculaDto {
    fn from(matricula: &Matricula) -> Self {
        Self {
            id: matricula.id(),
            aluno: AlunoDto::from(matricula.aluno()),
            plano: matricula.plano(),
            data_inicio: matricula.data_inicio(),
            data_fim: matricula.data_fim(),
            objetivo: matricula.objetivo().to_string(),
            restricoes_medicas: matricula.restricoes().bits(),
            laudo_medico: matricula.laudo_medico().map(|l| l.conteudo().to_vec()),
            observacoes: matricula.observacoes().to_string(),
        }
    }
}

/// Pedido de matrícula candidato, tal como chega da apresentação.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissaoMatricula {
    pub aluno_id: Option<i64>,
    #[serde(default)]
    pub plano: MatriculaPlano,
    pub data_inicio: NaiveDate,
    pub data_fim: NaiveDate,
    #[serde(default)]
    pub objetivo: String,
    #[serde(default)]
    pub restricoes_medicas: u32,
    pub laudo_medico: Option<Vec<u8>>,
    #[serde(default)]
    pub observacoes: String,
}

impl SubmissaoMatricula {
    pub fn restricoes(&self) -> Result<RestricoesMedicas, DomainError> {
        RestricoesMedicas::from_mascara(self.restricoes_medicas)
    }

    pub fn laudo(&self) -> Option<Arquivo> {
        Arquivo::from_optional(self.laudo_medico.clone())
    }
}
