//! src/reglages.rs
//!
//! Réglages d’une session (précision, racines, format de sortie).
//!
//! Contrats :
//! - Aucune évaluation ici.
//! - Défense en profondeur : bornes sur les précisions (anti-gel).

use clap::ValueEnum;
use serde::Serialize;

/// Décimales de la lecture tronquée par défaut.
pub const CHIFFRES_DEFAUT: usize = 10;

/// Garde-fou : on borne la précision (anti-abus / anti-gel).
pub const CHIFFRES_MAX: usize = 200;

/// Arrondi des coefficients d’une droite.
pub const DECIMALES_DROITE_DEFAUT: usize = 4;
const DECIMALES_DROITE_MAX: usize = 12;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatSortie {
    #[default]
    #[value(name = "text")]
    #[serde(rename = "text")]
    Texte,
    Html,
    Json,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reglages {
    pub chiffres: usize,
    pub decimales_droite: usize,
    /// false : première racine seulement (les autres sont signalées).
    pub toutes_racines: bool,
    pub format: FormatSortie,
}

impl Default for Reglages {
    fn default() -> Self {
        Self {
            chiffres: CHIFFRES_DEFAUT,
            decimales_droite: DECIMALES_DROITE_DEFAUT,
            toutes_racines: false,
            format: FormatSortie::Texte,
        }
    }
}

impl Reglages {
    pub fn set_chiffres(&mut self, chiffres: usize) {
        self.chiffres = chiffres.min(CHIFFRES_MAX);
    }

    pub fn set_decimales_droite(&mut self, decimales: usize) {
        self.decimales_droite = decimales.min(DECIMALES_DROITE_MAX);
    }

    pub fn avec_toutes_racines(mut self, oui: bool) -> Self {
        self.toutes_racines = oui;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bornes() {
        let mut r = Reglages::default();
        r.set_chiffres(10_000);
        assert_eq!(r.chiffres, CHIFFRES_MAX);
        r.set_decimales_droite(99);
        assert_eq!(r.decimales_droite, DECIMALES_DROITE_MAX);
        assert!(!r.toutes_racines);
        assert!(r.avec_toutes_racines(true).toutes_racines);
    }
}
