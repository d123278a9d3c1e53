// src/models/mod.rs
pub mod aluno;
pub mod arquivo;
pub mod dto;
pub mod logradouro;
pub mod matricula;
pub mod restricoes;
