// src/services/mod.rs
pub mod aluno_service;
pub mod auth_service;
pub mod logradouro_service;
pub mod matricula_service;
pub mod validacao_matricula;
