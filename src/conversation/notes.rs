// src/conversation/notes.rs
//
// Notes de cours locales : un fichier `<sujet>.json` par sujet
//   {"formulas": {"algebra": "..."}, "examples": {"algebra": "..."}}
//
// Le carnet garde ce qu’il a lu (y compris l’absence de fichier) :
// un sujet n’est lu qu’une fois par session.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use super::sujet::Sujet;

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct NotesSujet {
    #[serde(default)]
    pub formulas: BTreeMap<String, String>,
    #[serde(default)]
    pub examples: BTreeMap<String, String>,
}

#[derive(Debug)]
pub struct CarnetNotes {
    dossier: PathBuf,
    cache: HashMap<Sujet, Option<NotesSujet>>,
}

impl CarnetNotes {
    pub fn nouveau(dossier: impl Into<PathBuf>) -> Self {
        Self {
            dossier: dossier.into(),
            cache: HashMap::new(),
        }
    }

    /// Notes du sujet (None : fichier absent ou illisible).
    pub fn notes(&mut self, sujet: Sujet) -> Option<&NotesSujet> {
        let dossier = &self.dossier;
        self.cache
            .entry(sujet)
            .or_insert_with(|| lire_notes(dossier, sujet))
            .as_ref()
    }

    /// Lignes à afficher après les étapes ; vide si rien d’utile.
    pub fn lignes(&mut self, sujet: Sujet) -> Vec<String> {
        let Some(notes) = self.notes(sujet) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        if let Some(f) = notes.formulas.get(sujet.cle()).filter(|f| !f.is_empty()) {
            out.push(format!("Using {sujet} formula: {f}"));
        }
        if let Some(e) = notes.examples.get(sujet.cle()).filter(|e| !e.is_empty()) {
            out.push(format!("Related example: {e}"));
        }
        out
    }
}

fn lire_notes(dossier: &Path, sujet: Sujet) -> Option<NotesSujet> {
    let chemin = dossier.join(format!("{}.json", sujet.cle()));
    let brut = match std::fs::read_to_string(&chemin) {
        Ok(b) => b,
        Err(e) => {
            tracing::debug!(chemin = %chemin.display(), erreur = %e, "pas de notes");
            return None;
        }
    };
    match serde_json::from_str(&brut) {
        Ok(n) => Some(n),
        Err(e) => {
            tracing::warn!(chemin = %chemin.display(), erreur = %e, "notes illisibles, ignorées");
            None
        }
    }
}
