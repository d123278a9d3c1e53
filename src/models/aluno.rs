// src/models/aluno.rs
use crate::error::DomainError;
use crate::models::{arquivo::Arquivo, logradouro::obrigatorio, logradouro::Logradouro};
use chrono::NaiveDate;
use sqlx::FromRow;

/// Dados de entrada da fábrica `Aluno::criar`.
/// `senha_hash` já chega processada (ver `auth_service`).
#[derive(Debug, Clone)]
pub struct DadosAluno {
    pub id: i64,
    pub nome: String,
    pub cpf: String,
    pub data_nascimento: NaiveDate,
    pub telefone: String,
    pub email: String,
    pub endereco: Logradouro,
    pub numero: String,
    pub complemento: String,
    pub senha_hash: String,
    pub foto: Option<Arquivo>,
}

/// Aluno já validado. Só se altera criando outro através da fábrica.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aluno {
    id: i64,
    nome: String,
    cpf: String,
    data_nascimento: NaiveDate,
    telefone: String,
    email: String,
    endereco: Logradouro,
    numero: String,
    complemento: String,
    senha_hash: String,
    foto: Arquivo,
}

impl Aluno {
    pub fn criar(dados: DadosAluno) -> Result<Self, DomainError> {
        let nome = obrigatorio("nome", &dados.nome)?;
        let cpf = normalizar_cpf(&dados.cpf)?;
        let telefone = obrigatorio("telefone", &dados.telefone)?;

        let email = dados.email.trim().to_string();
        if !email_valido(&email) {
            return Err(DomainError::EmailInvalido);
        }

        let numero = obrigatorio("numero", &dados.numero)?;
        let senha_hash = obrigatorio("senha", &dados.senha_hash)?;
        let foto = dados.foto.ok_or(DomainError::CampoObrigatorio("foto"))?;

        Ok(Self {
            id: dados.id,
            nome,
            cpf,
            data_nascimento: dados.data_nascimento,
            telefone,
            email,
            endereco: dados.endereco,
            numero,
            complemento: dados.complemento.trim().to_string(),
            senha_hash,
            foto,
        })
    }

    pub(crate) fn com_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    pub fn id(&self) -> i64 {
        self.id
    }
    pub fn nome(&self) -> &str {
        &self.nome
    }
    pub fn cpf(&self) -> &str {
        &self.cpf
    }
    pub fn data_nascimento(&self) -> NaiveDate {
        self.data_nascimento
    }
    pub fn telefone(&self) -> &str {
        &self.telefone
    }
    pub fn email(&self) -> &str {
        &self.email
    }
    pub fn endereco(&self) -> &Logradouro {
        &self.endereco
    }
    pub fn numero(&self) -> &str {
        &self.numero
    }
    pub fn complemento(&self) -> &str {
        &self.complemento
    }
    pub fn senha_hash(&self) -> &str {
        &self.senha_hash
    }
    pub fn foto(&self) -> &Arquivo {
        &self.foto
    }
}

/// Linha da tabela `alunos`; o endereço é carregado à parte.
#[derive(Debug, FromRow)]
pub struct AlunoRow {
    pub id: i64,
    pub nome: String,
    pub cpf: String,
    pub data_nascimento: NaiveDate,
    pub telefone: String,
    pub email: String,
    pub logradouro_id: i64,
    pub numero: String,
    pub complemento: String,
    pub senha_hash: String,
    pub foto: Vec<u8>,
}

/// Remove pontuação e exige 11 dígitos.
pub fn normalizar_cpf(cpf: &str) -> Result<String, DomainError> {
    let cpf = cpf.trim();
    if cpf.is_empty() {
        return Err(DomainError::CampoObrigatorio("cpf"));
    }
    if cpf.chars().any(|c| !c.is_ascii_digit() && c != '.' && c != '-') {
        return Err(DomainError::CpfInvalido);
    }
    let digitos: String = cpf.chars().filter(|c| c.is_ascii_digit()).collect();
    if digitos.len() != 11 {
        return Err(DomainError::CpfInvalido);
    }
    Ok(digitos)
}

/// Forma `algo@dominio.tld`, sem espaços.
fn email_valido(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, dominio)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || dominio.contains('@') {
        return false;
    }
    match dominio.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
