// src/models/arquivo.rs
use crate::error::DomainError;

/// Conteúdo binário opaco (foto do aluno, laudo médico). Nunca vazio.
#[derive(Clone, PartialEq, Eq)]
pub struct Arquivo(Vec<u8>);

impl Arquivo {
    pub fn new(conteudo: Vec<u8>) -> Result<Self, DomainError> {
        if conteudo.is_empty() {
            return Err(DomainError::ArquivoVazio);
        }
        Ok(Self(conteudo))
    }

    /// Ausente e vazio são equivalentes: ambos resultam em `None`.
    pub fn from_optional(conteudo: Option<Vec<u8>>) -> Option<Self> {
        conteudo.filter(|c| !c.is_empty()).map(Self)
    }

    pub fn conteudo(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

// Não despeja os bytes no log
impl std::fmt::Debug for Arquivo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Arquivo({} bytes)", self.0.len())
    }
}
