// src/screens/ocupado.rs
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Indicador "ocupado" partilhado por todos os comandos de um ecrã.
/// Um comando que encontra o ecrã ocupado é ignorado, não fica à espera.
#[derive(Debug, Clone, Default)]
pub struct Ocupado(Arc<AtomicBool>);

impl Ocupado {
    /// Marca o ecrã como ocupado. `None` se já estava.
    pub fn tentar(&self) -> Option<GuardaOcupado> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| GuardaOcupado(self.0.clone()))
    }

    pub fn ativo(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Liberta o indicador ao sair de escopo, mesmo quando o comando falha com `?`.
#[derive(Debug)]
pub struct GuardaOcupado(Arc<AtomicBool>);

impl Drop for GuardaOcupado {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
