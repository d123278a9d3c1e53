// src/web/routes.rs
use crate::{
    state::AppState,
    web::{aluno_handlers, logradouro_handlers, matricula_handlers},
};
use axum::{routing::get, Router};

pub fn create_router(app_state: AppState) -> Router {
    let logradouro_routes = Router::new()
        .route(
            "/",
            get(logradouro_handlers::listar).post(logradouro_handlers::criar),
        )
        .route(
            "/{id}",
            get(logradouro_handlers::obter)
                .put(logradouro_handlers::atualizar)
                .delete(logradouro_handlers::remover),
        );

    let aluno_routes = Router::new()
        .route("/", get(aluno_handlers::listar).post(aluno_handlers::criar))
        .route("/cpf/{cpf}", get(aluno_handlers::obter_por_cpf))
        .route(
            "/{id}",
            get(aluno_handlers::obter)
                .put(aluno_handlers::atualizar)
                .delete(aluno_handlers::remover),
        )
        .route("/{id}/matriculas", get(aluno_handlers::listar_matriculas))
        .route(
            "/{id}/matriculas/ativas",
            get(aluno_handlers::listar_matriculas_ativas),
        );

    let matricula_routes = Router::new()
        .route(
            "/",
            get(matricula_handlers::listar).post(matricula_handlers::criar),
        )
        .route(
            "/{id}",
            get(matricula_handlers::obter)
                .put(matricula_handlers::atualizar)
                .delete(matricula_handlers::remover),
        );

    Router::new()
        .nest("/logradouros", logradouro_routes)
        .nest("/alunos", aluno_routes)
        .nest("/matriculas", matricula_routes)
        .with_state(app_state)
}
