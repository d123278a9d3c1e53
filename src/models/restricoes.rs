// src/models/restricoes.rs
use crate::error::DomainError;
use bitflags::bitflags;

bitflags! {
    /// Condições de saúde declaradas na matrícula. Zero ou mais em simultâneo.
    /// Guardado como INTEGER na coluna `restricoes_medicas`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RestricoesMedicas: u32 {
        const DIABETES = 1;
        const PRESSAO_ALTA = 1 << 1;
        const LABIRINTITE = 1 << 2;
        const ALERGIAS = 1 << 3;
        const PROBLEMAS_RESPIRATORIOS = 1 << 4;
        const REMEDIO_CONTINUO = 1 << 5;
    }
}

/// Ordem de apresentação e rótulos mostrados ao utilizador.
pub const OPCOES_RESTRICAO: [(RestricoesMedicas, &str); 6] = [
    (RestricoesMedicas::DIABETES, "Diabetes"),
    (RestricoesMedicas::PRESSAO_ALTA, "Pressão Alta"),
    (RestricoesMedicas::LABIRINTITE, "Labirintite"),
    (RestricoesMedicas::ALERGIAS, "Alergias"),
    (RestricoesMedicas::PROBLEMAS_RESPIRATORIOS, "Problemas Respiratórios"),
    (RestricoesMedicas::REMEDIO_CONTINUO, "Remédio Contínuo"),
];

impl RestricoesMedicas {
    /// Máscara vinda da apresentação. Bits fora das seis flags são recusados.
    pub fn from_mascara(mascara: u32) -> Result<Self, DomainError> {
        Self::from_bits(mascara).ok_or(DomainError::RestricaoDesconhecida(i64::from(mascara)))
    }

    pub fn from_db(valor: i64) -> Result<Self, DomainError> {
        u32::try_from(valor)
            .ok()
            .and_then(Self::from_bits)
            .ok_or(DomainError::RestricaoDesconhecida(valor))
    }

    pub fn to_db(self) -> i64 {
        i64::from(self.bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_cover_every_flag_once() {
        let combinado = OPCOES_RESTRICAO
            .iter()
            .fold(RestricoesMedicas::empty(), |acc, (flag, _)| acc | *flag);
        assert_eq!(combinado, RestricoesMedicas::all());
        assert_eq!(combinado.bits().count_ones(), 6);
    }

    #[test]
    fn db_value_round_trips() {
        let restricoes = RestricoesMedicas::ALERGIAS | RestricoesMedicas::DIABETES;
        assert_eq!(RestricoesMedicas::from_db(restricoes.to_db()), Ok(restricoes));
        assert_eq!(
            RestricoesMedicas::from_db(-1),
            Err(DomainError::RestricaoDesconhecida(-1))
        );
        assert_eq!(
            RestricoesMedicas::from_db(1 << 10),
            Err(DomainError::RestricaoDesconhecida(1 << 10))
        );
    }

    #[test]
    fn unknown_bits_are_refused_not_dropped() {
        assert_eq!(
            RestricoesMedicas::from_mascara(64),
            Err(DomainError::RestricaoDesconhecida(64))
        );
        assert_eq!(
            RestricoesMedicas::from_mascara(64 | RestricoesMedicas::ALERGIAS.bits()),
            Err(DomainError::RestricaoDesconhecida(72))
        );
        assert_eq!(
            RestricoesMedicas::from_mascara(RestricoesMedicas::all().bits()),
            Ok(RestricoesMedicas::all())
        );
    }
}
