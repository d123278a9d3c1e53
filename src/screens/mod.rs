// src/screens/mod.rs
// Comportamento dos ecrãs (listas e formulário) sem qualquer toolkit gráfico.
// Cada ecrã é um handle clonável; o estado vive atrás de um Mutex tokio.
pub mod aluno_lista;
pub mod debounce;
pub mod matricula_form;
pub mod matricula_lista;
pub mod ocupado;
pub mod restricoes_toggles;

#[cfg(test)]
pub(crate) mod apoio_testes;

/// Desfecho de um comando de ecrã.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Execucao {
    Executado,
    /// O ecrã estava ocupado com outro comando.
    Ignorado,
}
