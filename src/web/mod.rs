// src/web/mod.rs
pub mod aluno_handlers;
pub mod logradouro_handlers;
pub mod matricula_handlers;
pub mod routes;
