//! Erreurs du noyau.
//!
//! Toutes ces erreurs restent LOCALES : le solveur les convertit en
//! `Resultat::Echec` (confiance 0). Aucune ne remonte jusqu’à l’appelant.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErreurNoyau {
    /// Un membre d’équation (ou une expression) n’a pas pu être lu.
    #[error("could not parse the input: {0}")]
    Analyse(String),

    /// Division par zéro, jeton non numérique, exposant hors bornes...
    #[error("{0}")]
    Arithmetique(String),

    /// Paramètre absent du texte (pente, point...).
    #[error("{0}")]
    ParametreManquant(String),

    /// Forme reconnue mais hors du domaine du moteur exact.
    #[error("{0}")]
    NonSupporte(String),
}

impl ErreurNoyau {
    pub fn analyse(msg: impl Into<String>) -> Self {
        ErreurNoyau::Analyse(msg.into())
    }

    pub fn arithmetique(msg: impl Into<String>) -> Self {
        ErreurNoyau::Arithmetique(msg.into())
    }

    pub fn division_par_zero() -> Self {
        ErreurNoyau::Arithmetique("cannot divide by zero".into())
    }

    pub fn parametre_manquant(msg: impl Into<String>) -> Self {
        ErreurNoyau::ParametreManquant(msg.into())
    }

    pub fn non_supporte(msg: impl Into<String>) -> Self {
        ErreurNoyau::NonSupporte(msg.into())
    }
}
