// src/screens/matricula_lista.rs
use crate::{
    error::AppResult,
    models::dto::MatriculaDto,
    screens::{ocupado::Ocupado, Execucao},
    services::matricula_service::{self, FiltroMatricula},
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Default)]
pub struct EstadoMatriculaLista {
    /// Cópia completa da última carga; o filtro trabalha sobre ela.
    pub todas: Vec<MatriculaDto>,
    pub matriculas: Vec<MatriculaDto>,
    pub filtro: FiltroMatricula,
    pub texto_busca: String,
    pub mensagem: Option<String>,
}

impl EstadoMatriculaLista {
    fn aplicar_filtro(&mut self) {
        self.matriculas = matricula_service::filtrar(&self.todas, self.filtro, &self.texto_busca);
    }
}

#[derive(Debug, Clone)]
pub struct MatriculaListaTela {
    db_pool: SqlitePool,
    ocupado: Ocupado,
    estado: Arc<Mutex<EstadoMatriculaLista>>,
}

impl MatriculaListaTela {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self {
            db_pool,
            ocupado: Ocupado::default(),
            estado: Arc::new(Mutex::new(EstadoMatriculaLista::default())),
        }
    }

    pub fn ocupado(&self) -> &Ocupado {
        &self.ocupado
    }

    pub async fn estado(&self) -> EstadoMatriculaLista {
        self.estado.lock().await.clone()
    }

    pub async fn definir_busca(&self, filtro: FiltroMatricula, texto: impl Into<String>) {
        let mut estado = self.estado.lock().await;
        estado.filtro = filtro;
        estado.texto_busca = texto.into();
    }

    /// Recarrega tudo e reaplica a pesquisa em curso, se houver.
    pub async fn carregar(&self) -> AppResult<Execucao> {
        let Some(_guarda) = self.ocupado.tentar() else {
            return Ok(Execucao::Ignorado);
        };
        let todas = matricula_service::obter_todas(&self.db_pool).await?;

        let mut estado = self.estado.lock().await;
        estado.todas = todas;
        estado.aplicar_filtro();
        Ok(Execucao::Executado)
    }

    /// Filtro local, sem ir à base de dados.
    pub async fn pesquisar(&self) -> Execucao {
        let Some(_guarda) = self.ocupado.tentar() else {
            return Execucao::Ignorado;
        };
        self.estado.lock().await.aplicar_filtro();
        Execucao::Executado
    }

    pub async fn atualizar(&self) -> AppResult<Execucao> {
        if self.ocupado.ativo() {
            return Ok(Execucao::Ignorado);
        }
        self.estado.lock().await.texto_busca.clear();
        self.carregar().await
    }

    pub async fn remover(&self, id: i64) -> AppResult<Execucao> {
        let Some(_guarda) = self.ocupado.tentar() else {
            return Ok(Execucao::Ignorado);
        };
        let removida = matricula_service::remover(&self.db_pool, id).await?;

        let mut estado = self.estado.lock().await;
        if removida {
            estado.todas.retain(|m| m.id != id);
            estado.matriculas.retain(|m| m.id != id);
            estado.mensagem = Some("Matrícula excluída.".to_string());
        } else {
            estado.mensagem = Some(format!("Matrícula {} não encontrada.", id));
        }
        Ok(Execucao::Executado)
    }
}
