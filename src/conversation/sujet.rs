// src/conversation/sujet.rs
//
// Sujet mathématique d’un problème extrait (sert à choisir les notes).
//
// Table ordonnée : les sujets à mots-clés passent avant l’algèbre,
// sinon "area of x" serait toujours de l’algèbre.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

use crate::noyau::extraction::motif;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Sujet {
    #[serde(rename = "calculus")]
    Analyse,
    #[serde(rename = "trigonometry")]
    Trigonometrie,
    #[serde(rename = "geometry")]
    Geometrie,
    #[serde(rename = "statistics")]
    Statistiques,
    #[serde(rename = "algebra")]
    Algebre,
    #[serde(rename = "basic_math")]
    Base,
}

impl Sujet {
    /// Clé stable (nom du fichier de notes, champ JSON "topic").
    pub fn cle(self) -> &'static str {
        match self {
            Sujet::Analyse => "calculus",
            Sujet::Trigonometrie => "trigonometry",
            Sujet::Geometrie => "geometry",
            Sujet::Statistiques => "statistics",
            Sujet::Algebre => "algebra",
            Sujet::Base => "basic_math",
        }
    }
}

impl fmt::Display for Sujet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cle())
    }
}

fn table() -> [(&'static Regex, Sujet); 5] {
    static ANALYSE: OnceLock<Regex> = OnceLock::new();
    static TRIGO: OnceLock<Regex> = OnceLock::new();
    static GEOMETRIE: OnceLock<Regex> = OnceLock::new();
    static STATS: OnceLock<Regex> = OnceLock::new();
    static ALGEBRE: OnceLock<Regex> = OnceLock::new();
    [
        (motif(&ANALYSE, r"(?i)derivative|integral|\blim"), Sujet::Analyse),
        (motif(&TRIGO, r"(?i)\b(?:sin|cos|tan)\b"), Sujet::Trigonometrie),
        (motif(&GEOMETRIE, r"(?i)area|volume|perimeter"), Sujet::Geometrie),
        (motif(&STATS, r"(?i)\b(?:mean|median|mode|variance)\b"), Sujet::Statistiques),
        (motif(&ALGEBRE, r"(?i)[xyz]|=|slope"), Sujet::Algebre),
    ]
}

/// Premier sujet dont le motif apparaît ; `Base` sinon.
pub fn identifier(probleme: &str) -> Sujet {
    table()
        .into_iter()
        .find(|(re, _)| re.is_match(probleme))
        .map(|(_, s)| s)
        .unwrap_or(Sujet::Base)
}
