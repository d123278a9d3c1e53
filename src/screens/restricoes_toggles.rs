// src/screens/restricoes_toggles.rs
use crate::models::restricoes::{RestricoesMedicas, OPCOES_RESTRICAO};

/// Uma caixa de seleção do formulário de matrícula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleRestricao {
    pub flag: RestricoesMedicas,
    pub rotulo: &'static str,
    pub marcado: bool,
}

/// As seis caixas de restrição, na ordem de apresentação.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestricoesToggles([ToggleRestricao; 6]);

impl Default for RestricoesToggles {
    fn default() -> Self {
        Self::from_mask(RestricoesMedicas::empty())
    }
}

impl RestricoesToggles {
    pub fn from_mask(mascara: RestricoesMedicas) -> Self {
        Self(OPCOES_RESTRICAO.map(|(flag, rotulo)| ToggleRestricao {
            flag,
            rotulo,
            marcado: mascara.contains(flag),
        }))
    }

    /// Parte do vazio e junta a flag de cada caixa marcada.
    pub fn to_mask(&self) -> RestricoesMedicas {
        self.0
            .iter()
            .filter(|t| t.marcado)
            .fold(RestricoesMedicas::empty(), |acc, t| acc | t.flag)
    }

    pub fn itens(&self) -> &[ToggleRestricao] {
        &self.0
    }

    pub fn definir(&mut self, flag: RestricoesMedicas, marcado: bool) {
        for toggle in self.0.iter_mut().filter(|t| t.flag == flag) {
            toggle.marcado = marcado;
        }
    }

    pub fn alternar(&mut self, flag: RestricoesMedicas) {
        for toggle in self.0.iter_mut().filter(|t| t.flag == flag) {
            toggle.marcado = !toggle.marcado;
        }
    }
}
