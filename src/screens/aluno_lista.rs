// src/screens/aluno_lista.rs
use crate::{
    error::AppResult,
    models::dto::AlunoDto,
    screens::{debounce::Debounce, ocupado::Ocupado, Execucao},
    services::aluno_service::{self, FiltroAluno},
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::{sync::Mutex, task::JoinHandle};

#[derive(Debug, Clone, Default)]
pub struct EstadoAlunoLista {
    pub alunos: Vec<AlunoDto>,
    pub filtro: FiltroAluno,
    pub texto_busca: String,
    pub mensagem: Option<String>,
}

/// Lista de alunos: carregar, pesquisar (Id ou CPF) e excluir.
#[derive(Debug, Clone)]
pub struct AlunoListaTela {
    db_pool: SqlitePool,
    ocupado: Ocupado,
    debounce: Debounce,
    estado: Arc<Mutex<EstadoAlunoLista>>,
}

impl AlunoListaTela {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self::com_debounce(db_pool, Debounce::default())
    }

    pub fn com_debounce(db_pool: SqlitePool, debounce: Debounce) -> Self {
        Self {
            db_pool,
            ocupado: Ocupado::default(),
            debounce,
            estado: Arc::new(Mutex::new(EstadoAlunoLista::default())),
        }
    }

    pub fn ocupado(&self) -> &Ocupado {
        &self.ocupado
    }

    pub async fn estado(&self) -> EstadoAlunoLista {
        self.estado.lock().await.clone()
    }

    pub async fn definir_filtro(&self, filtro: FiltroAluno) {
        self.estado.lock().await.filtro = filtro;
    }

    /// Recarrega tudo; uma pesquisa ainda por disparar é descartada.
    pub async fn carregar(&self) -> AppResult<Execucao> {
        let Some(_guarda) = self.ocupado.tentar() else {
            return Ok(Execucao::Ignorado);
        };
        self.debounce.cancelar();
        let alunos = aluno_service::obter_todos(&self.db_pool).await?;
        self.estado.lock().await.alunos = alunos;
        Ok(Execucao::Executado)
    }

    /// Pesquisa com o filtro e o texto atuais do ecrã.
    pub async fn pesquisar(&self) -> AppResult<Execucao> {
        let Some(_guarda) = self.ocupado.tentar() else {
            return Ok(Execucao::Ignorado);
        };
        let (filtro, texto) = {
            let estado = self.estado.lock().await;
            (estado.filtro, estado.texto_busca.clone())
        };
        let alunos = aluno_service::buscar(&self.db_pool, filtro, &texto).await?;
        tracing::debug!("Pesquisa de alunos ({:?} '{}'): {} resultado(s).", filtro, texto, alunos.len());
        self.estado.lock().await.alunos = alunos;
        Ok(Execucao::Executado)
    }

    /// Guarda o texto e agenda a pesquisa; uma nova alteração descarta a anterior.
    pub async fn texto_alterado(
        &self,
        texto: impl Into<String>,
    ) -> JoinHandle<Option<AppResult<Execucao>>> {
        self.estado.lock().await.texto_busca = texto.into();
        let tela = self.clone();
        self.debounce.agendar(move || async move { tela.pesquisar().await })
    }

    /// Exclui e, em caso de sucesso, retira o aluno da lista sem recarregar.
    pub async fn remover(&self, id: i64) -> AppResult<Execucao> {
        let Some(_guarda) = self.ocupado.tentar() else {
            return Ok(Execucao::Ignorado);
        };
        let removido = aluno_service::remover(&self.db_pool, id).await?;

        let mut estado = self.estado.lock().await;
        if removido {
            estado.alunos.retain(|a| a.id != id);
            estado.mensagem = Some("Aluno excluído com sucesso!".to_string());
        } else {
            estado.mensagem = Some("Não foi possível excluir o aluno.".to_string());
        }
        Ok(Execucao::Executado)
    }
}
