// src/screens/matricula_form.rs
use crate::{
    error::{AppResult, DomainError},
    models::{
        arquivo::Arquivo,
        dto::{AlunoDto, MatriculaDto, SubmissaoMatricula},
        matricula::MatriculaPlano,
    },
    screens::{ocupado::Ocupado, restricoes_toggles::RestricoesToggles, Execucao},
    services::{
        aluno_service,
        matricula_service::{self, ResultadoSubmissao},
        validacao_matricula::ModoMatricula,
    },
};
use chrono::{Months, NaiveDate};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstadoFormMatricula {
    pub modo: ModoMatricula,
    pub aluno: Option<AlunoDto>,
    pub cpf_busca: String,
    pub plano: MatriculaPlano,
    pub data_inicio: NaiveDate,
    pub data_fim: NaiveDate,
    pub objetivo: String,
    pub restricoes: RestricoesToggles,
    pub laudo_medico: Option<Vec<u8>>,
    pub observacoes: String,
    pub mensagem: Option<String>,
}

impl EstadoFormMatricula {
    /// Matrícula nova: plano mensal de hoje a hoje + 1 mês, sem restrições.
    pub fn nova(hoje: NaiveDate) -> Self {
        Self {
            modo: ModoMatricula::Criacao,
            aluno: None,
            cpf_busca: String::new(),
            plano: MatriculaPlano::Mensal,
            data_inicio: hoje,
            data_fim: hoje.checked_add_months(Months::new(1)).unwrap_or(hoje),
            objetivo: String::new(),
            restricoes: RestricoesToggles::default(),
            laudo_medico: None,
            observacoes: String::new(),
            mensagem: None,
        }
    }

    pub fn de_matricula(matricula: &MatriculaDto) -> Result<Self, DomainError> {
        Ok(Self {
            modo: ModoMatricula::Edicao { id: matricula.id },
            aluno: Some(matricula.aluno.clone()),
            cpf_busca: matricula.aluno.cpf.clone(),
            plano: matricula.plano,
            data_inicio: matricula.data_inicio,
            data_fim: matricula.data_fim,
            objetivo: matricula.objetivo.clone(),
            restricoes: RestricoesToggles::from_mask(matricula.restricoes()?),
            laudo_medico: matricula.laudo_medico.clone(),
            observacoes: matricula.observacoes.clone(),
            mensagem: None,
        })
    }

    pub fn titulo(&self) -> &'static str {
        match self.modo {
            ModoMatricula::Criacao => "Nova Matrícula",
            ModoMatricula::Edicao { .. } => "Editar Matrícula",
        }
    }

    pub fn texto_botao_laudo(&self) -> &'static str {
        if self.laudo_medico.is_some() {
            "Laudo Anexado"
        } else {
            "Anexar Laudo"
        }
    }

    pub fn submissao(&self) -> SubmissaoMatricula {
        SubmissaoMatricula {
            aluno_id: self.aluno.as_ref().map(|a| a.id),
            plano: self.plano,
            data_inicio: self.data_inicio,
            data_fim: self.data_fim,
            objetivo: self.objetivo.clone(),
            restricoes_medicas: self.restricoes.to_mask().bits(),
            laudo_medico: self.laudo_medico.clone(),
            observacoes: self.observacoes.clone(),
        }
    }
}

/// Formulário de matrícula (criação ou edição).
#[derive(Debug, Clone)]
pub struct MatriculaFormTela {
    db_pool: SqlitePool,
    ocupado: Ocupado,
    estado: Arc<Mutex<EstadoFormMatricula>>,
}

impl MatriculaFormTela {
    pub fn nova(db_pool: SqlitePool, hoje: NaiveDate) -> Self {
        Self::com_estado(db_pool, EstadoFormMatricula::nova(hoje))
    }

    /// `None` se a matrícula não existe.
    pub async fn editar(db_pool: SqlitePool, id: i64) -> AppResult<Option<Self>> {
        let Some(matricula) = matricula_service::obter_por_id(&db_pool, id).await? else {
            tracing::warn!("Matrícula {} não encontrada para edição.", id);
            return Ok(None);
        };
        Ok(Some(Self::com_estado(
            db_pool,
            EstadoFormMatricula::de_matricula(&matricula)?,
        )))
    }

    fn com_estado(db_pool: SqlitePool, estado: EstadoFormMatricula) -> Self {
        Self {
            db_pool,
            ocupado: Ocupado::default(),
            estado: Arc::new(Mutex::new(estado)),
        }
    }

    pub fn ocupado(&self) -> &Ocupado {
        &self.ocupado
    }

    pub async fn estado(&self) -> EstadoFormMatricula {
        self.estado.lock().await.clone()
    }

    /// Edição direta dos campos, como faria o binding de um ecrã.
    pub async fn alterar<R>(&self, f: impl FnOnce(&mut EstadoFormMatricula) -> R) -> R {
        let mut estado = self.estado.lock().await;
        f(&mut estado)
    }

    pub async fn buscar_aluno(&self) -> AppResult<Execucao> {
        let cpf = self.estado.lock().await.cpf_busca.clone();
        if cpf.trim().is_empty() {
            self.estado.lock().await.mensagem = Some("Digite um CPF para buscar.".to_string());
            return Ok(Execucao::Executado);
        }
        let Some(_guarda) = self.ocupado.tentar() else {
            return Ok(Execucao::Ignorado);
        };

        let aluno = aluno_service::obter_por_cpf(&self.db_pool, &cpf).await?;
        let mut estado = self.estado.lock().await;
        match aluno {
            Some(aluno) => {
                estado.aluno = Some(aluno);
                estado.mensagem = None;
            }
            // O aluno anterior fica selecionado
            None => {
                estado.mensagem = Some("Nenhum aluno encontrado com este CPF.".to_string());
            }
        }
        Ok(Execucao::Executado)
    }

    /// Um ficheiro vazio é recusado e o laudo anterior mantém-se.
    pub async fn anexar_laudo(&self, conteudo: Vec<u8>) -> Result<(), DomainError> {
        let laudo = Arquivo::new(conteudo)?;
        self.estado.lock().await.laudo_medico = Some(laudo.into_bytes());
        Ok(())
    }

    pub async fn remover_laudo(&self) {
        self.estado.lock().await.laudo_medico = None;
    }

    /// Submete no modo do formulário. `None` quando ignorado por estar ocupado.
    pub async fn salvar(&self, hoje: NaiveDate) -> AppResult<Option<ResultadoSubmissao>> {
        let Some(_guarda) = self.ocupado.tentar() else {
            return Ok(None);
        };
        let (submissao, modo) = {
            let estado = self.estado.lock().await;
            (estado.submissao(), estado.modo)
        };

        let resultado = matricula_service::submeter(&self.db_pool, &submissao, modo, hoje).await?;

        let mut estado = self.estado.lock().await;
        match &resultado {
            ResultadoSubmissao::Salva(dto) => {
                estado.mensagem = Some(match modo {
                    ModoMatricula::Criacao => "Matrícula criada com sucesso!".to_string(),
                    ModoMatricula::Edicao { .. } => "Matrícula atualizada com sucesso!".to_string(),
                });
                estado.modo = ModoMatricula::Edicao { id: dto.id };
            }
            ResultadoSubmissao::Rejeitada(rejeicao) => {
                estado.mensagem = Some(rejeicao.to_string());
            }
        }
        Ok(Some(resultado))
    }
}
