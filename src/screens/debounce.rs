// src/screens/debounce.rs
use std::{
    future::Future,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::task::JoinHandle;

/// Atraso entre a última tecla e a pesquisa.
pub const ATRASO_PESQUISA: Duration = Duration::from_millis(300);

/// Adia uma ação até o texto parar de mudar.
///
/// Cada `agendar` invalida o agendamento anterior. O cancelamento só afeta a
/// espera: uma ação que já começou corre até ao fim.
#[derive(Debug, Clone)]
pub struct Debounce {
    atraso: Duration,
    geracao: Arc<AtomicU64>,
}

impl Default for Debounce {
    fn default() -> Self {
        Self::new(ATRASO_PESQUISA)
    }
}

impl Debounce {
    pub fn new(atraso: Duration) -> Self {
        Self {
            atraso,
            geracao: Arc::new(AtomicU64::new(0)),
        }
    }

    /// A task devolve `None` quando foi ultrapassada por outro agendamento.
    pub fn agendar<F, Fut, T>(&self, acao: F) -> JoinHandle<Option<T>>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let minha = self.geracao.fetch_add(1, Ordering::AcqRel) + 1;
        let geracao = self.geracao.clone();
        let atraso = self.atraso;

        tokio::spawn(async move {
            tokio::time::sleep(atraso).await;
            if geracao.load(Ordering::Acquire) != minha {
                tracing::trace!("Pesquisa adiada descartada (geração {}).", minha);
                return None;
            }
            Some(acao().await)
        })
    }

    pub fn cancelar(&self) {
        self.geracao.fetch_add(1, Ordering::AcqRel);
    }
}
