// src/models/logradouro.rs
use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Endereço (tabela `logradouros`).
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Logradouro {
    pub id: i64,
    pub cep: String, // só dígitos, 8 posições
    pub nome: String,
    pub bairro: String,
    pub cidade: String,
    pub estado: String,
    pub pais: String,
}

impl Logradouro {
    /// Valida e normaliza os campos. O CEP aceita pontuação ("89500-000").
    pub fn criar(
        id: i64,
        cep: &str,
        nome: &str,
        bairro: &str,
        cidade: &str,
        estado: &str,
        pais: &str,
    ) -> Result<Self, DomainError> {
        let cep: String = cep.chars().filter(|c| c.is_ascii_digit()).collect();
        if cep.len() != 8 {
            return Err(DomainError::CepInvalido);
        }

        Ok(Self {
            id,
            cep,
            nome: obrigatorio("nome", nome)?,
            bairro: obrigatorio("bairro", bairro)?,
            cidade: obrigatorio("cidade", cidade)?,
            estado: obrigatorio("estado", estado)?,
            pais: obrigatorio("pais", pais)?,
        })
    }
}

/// Texto obrigatório, devolvido sem espaços nas pontas.
pub(crate) fn obrigatorio(campo: &'static str, valor: &str) -> Result<String, DomainError> {
    let valor = valor.trim();
    if valor.is_empty() {
        return Err(DomainError::CampoObrigatorio(campo));
    }
    Ok(valor.to_string())
}
