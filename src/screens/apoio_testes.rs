// src/screens/apoio_testes.rs
use crate::{
    models::{dto::AlunoDto, logradouro::Logradouro},
    services::{aluno_service, auth_service::PasswordHasher},
};
use chrono::NaiveDate;
use sqlx::SqlitePool;

pub(crate) async fn cadastrar_aluno(
    pool: &SqlitePool,
    nome: &str,
    cpf: &str,
    nascimento: NaiveDate,
) -> AlunoDto {
    let dto = AlunoDto {
        id: 0,
        nome: nome.to_string(),
        cpf: cpf.to_string(),
        data_nascimento: nascimento,
        telefone: "49999999999".to_string(),
        email: "aluno@academia.com".to_string(),
        endereco: Logradouro {
            id: 0,
            cep: "89500000".to_string(),
            nome: "Rua XV".to_string(),
            bairro: "Centro".to_string(),
            cidade: "Caçador".to_string(),
            estado: "SC".to_string(),
            pais: "Brasil".to_string(),
        },
        numero: "1".to_string(),
        complemento: String::new(),
        senha: "Senha@123".to_string(),
        foto: Some(vec![9]),
    };
    aluno_service::adicionar(pool, &PasswordHasher::new(4), &dto)
        .await
        .expect("add student")
}
