//! Mémoire d’apprentissage (document JSON sur disque).
//!
//! - concepts appris : terme -> occurrences + au plus 5 contextes
//! - définitions : terme (minuscules) -> définition + date d’ajout
//! - historique des échanges
//!
//! Lecture tolérante : fichier absent => document vide, fichier corrompu =>
//! avertissement + document vide. Un fichier illisible n’est jamais écrasé :
//! il est renommé en `<nom>.bak` avant la première écriture. L’écriture est
//! "au mieux" : l’appelant journalise l’erreur et continue.
//!
//! Dates : RFC 3339 en écriture ; en lecture, les dates ISO sans fuseau
//! ("2024-05-01T12:34:56.789012") sont aussi acceptées, lues en UTC.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

use crate::noyau::extraction::motif;

/// Contextes gardés par concept.
const MAX_CONTEXTES: usize = 5;

const VERSION_DOCUMENT: &str = "1.0";

#[derive(Error, Debug)]
pub enum ErreurMemoire {
    #[error("memory file I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("memory file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Dates du document : RFC 3339, ou ISO local sans fuseau (lu en UTC).
mod horodatage {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(t: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        t.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let brut = String::deserialize(d)?;
        lire(&brut).ok_or_else(|| de::Error::custom(format!("invalid timestamp '{brut}'")))
    }

    pub(super) fn lire(brut: &str) -> Option<DateTime<Utc>> {
        if let Ok(t) = DateTime::parse_from_rfc3339(brut) {
            return Some(t.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(brut, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|t| t.and_utc())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Echange {
    pub user_msg: String,
    pub ai_response: String,
    #[serde(with = "horodatage")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub occurrences: u64,
    pub context_examples: Vec<Echange>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    pub definition: String,
    #[serde(with = "horodatage")]
    pub added: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadonnees {
    #[serde(with = "horodatage")]
    pub last_updated: DateTime<Utc>,
    pub version: String,
    pub total_conversations: u64,
    pub learning_sessions: u64,
}

impl Default for Metadonnees {
    fn default() -> Self {
        Self {
            last_updated: Utc::now(),
            version: VERSION_DOCUMENT.to_string(),
            total_conversations: 0,
            learning_sessions: 0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentMemoire {
    pub learned_concepts: BTreeMap<String, Concept>,
    pub definitions: BTreeMap<String, Definition>,
    /// Réservé (motifs appris) : conservé tel quel à la réécriture.
    pub patterns: BTreeMap<String, serde_json::Value>,
    pub conversation_history: Vec<Echange>,
    pub metadata: Metadonnees,
}

#[derive(Debug)]
pub struct Memoire {
    chemin: PathBuf,
    doc: DocumentMemoire,
    /// Le fichier existait mais n’a pas pu être lu : à mettre de côté avant d’écrire.
    source_illisible: bool,
}

fn re_termes() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    motif(
        &R,
        r"(?i)\b(?:sum|difference|product|quotient|equation|variable|coefficient|term|expression|formula)\b",
    )
}

fn mots(s: &str) -> BTreeSet<String> {
    s.split_whitespace().map(str::to_lowercase).collect()
}

/// `memoire.json` -> `memoire.json.bak`
fn chemin_sauvegarde(chemin: &Path) -> PathBuf {
    let mut nom = chemin.as_os_str().to_owned();
    nom.push(".bak");
    PathBuf::from(nom)
}

/// Lecture stricte (utilisée par `charger`, qui tolère les erreurs).
pub fn lire_document(chemin: &Path) -> Result<DocumentMemoire, ErreurMemoire> {
    let brut = std::fs::read_to_string(chemin)?;
    Ok(serde_json::from_str(&brut)?)
}

impl Memoire {
    /// Ouvre une nouvelle session d’apprentissage sur `chemin`.
    pub fn charger(chemin: impl Into<PathBuf>) -> Self {
        let chemin = chemin.into();
        let mut source_illisible = false;
        let mut doc = if chemin.exists() {
            lire_document(&chemin).unwrap_or_else(|e| {
                tracing::warn!(chemin = %chemin.display(), erreur = %e, "mémoire illisible, on repart de zéro");
                source_illisible = true;
                DocumentMemoire::default()
            })
        } else {
            tracing::debug!(chemin = %chemin.display(), "pas de mémoire existante");
            DocumentMemoire::default()
        };
        doc.metadata.learning_sessions += 1;
        Self {
            chemin,
            doc,
            source_illisible,
        }
    }

    pub fn chemin(&self) -> &Path {
        &self.chemin
    }

    pub fn document(&self) -> &DocumentMemoire {
        &self.doc
    }

    /// Retient un échange et les termes mathématiques qu’il contient.
    pub fn apprendre(&mut self, message: &str, reponse: &str) {
        let maintenant = Utc::now();
        let echange = Echange {
            user_msg: message.to_string(),
            ai_response: reponse.to_string(),
            timestamp: maintenant,
        };

        let texte = format!("{message} {reponse}");
        for m in re_termes().find_iter(&texte) {
            let concept = self
                .doc
                .learned_concepts
                .entry(m.as_str().to_lowercase())
                .or_default();
            concept.occurrences += 1;
            if concept.context_examples.len() < MAX_CONTEXTES {
                concept.context_examples.push(echange.clone());
            }
        }

        self.doc.conversation_history.push(echange);
        self.doc.metadata.total_conversations += 1;
    }

    pub fn ajouter_definition(&mut self, terme: &str, definition: &str) {
        self.doc.definitions.insert(
            terme.trim().to_lowercase(),
            Definition {
                definition: definition.trim().to_string(),
                added: Utc::now(),
            },
        );
    }

    pub fn definition(&self, terme: &str) -> Option<&str> {
        self.doc
            .definitions
            .get(&terme.trim().to_lowercase())
            .map(|d| d.definition.as_str())
    }

    pub fn concepts(&self) -> &BTreeMap<String, Concept> {
        &self.doc.learned_concepts
    }

    /// Échanges passés partageant des mots avec `requete`, les plus proches d’abord.
    pub fn conversations_similaires(&self, requete: &str, limite: usize) -> Vec<&Echange> {
        let cible = mots(requete);
        let mut proches: Vec<(usize, &Echange)> = self
            .doc
            .conversation_history
            .iter()
            .map(|e| (mots(&e.user_msg).intersection(&cible).count(), e))
            .filter(|(n, _)| *n > 0)
            .collect();
        // tri stable : à égalité, l’ordre chronologique reste
        proches.sort_by(|a, b| b.0.cmp(&a.0));
        proches.into_iter().take(limite).map(|(_, e)| e).collect()
    }

    /// JSON indenté ; crée le dossier parent au besoin. Un fichier illisible
    /// au chargement est d’abord renommé en `.bak`.
    pub fn sauvegarder(&mut self) -> Result<(), ErreurMemoire> {
        self.doc.metadata.last_updated = Utc::now();
        if let Some(parent) = self.chemin.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        if self.source_illisible && self.chemin.exists() {
            let sauvegarde = chemin_sauvegarde(&self.chemin);
            std::fs::rename(&self.chemin, &sauvegarde)?;
            tracing::warn!(
                chemin = %self.chemin.display(),
                sauvegarde = %sauvegarde.display(),
                "ancienne mémoire illisible mise de côté"
            );
        }
        self.source_illisible = false;
        let json = serde_json::to_string_pretty(&self.doc)?;
        std::fs::write(&self.chemin, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_puis_aller_retour() {
        let dir = tempfile::tempdir().unwrap();
        let chemin = dir.path().join("sous").join("memoire.json");

        let mut m = Memoire::charger(&chemin);
        assert!(m.concepts().is_empty());
        assert_eq!(m.document().metadata.learning_sessions, 1);

        m.apprendre("what is the sum of 2 and 3", "The sum is 5");
        m.ajouter_definition("Slope", "rise over run");
        m.sauvegarder().unwrap();

        let m2 = Memoire::charger(&chemin);
        let somme = &m2.concepts()["sum"];
        assert_eq!(somme.occurrences, 2);
        assert_eq!(somme.context_examples.len(), 2);
        assert_eq!(m2.definition("slope"), Some("rise over run"));
        assert_eq!(m2.definition("SLOPE "), Some("rise over run"));
        assert_eq!(m2.document().metadata.total_conversations, 1);
        assert_eq!(m2.document().metadata.learning_sessions, 2);
        assert_eq!(m2.document().metadata.version, "1.0");
    }

    #[test]
    fn contextes_bornes() {
        let dir = tempfile::tempdir().unwrap();
        let mut m = Memoire::charger(dir.path().join("m.json"));
        for i in 0..8 {
            m.apprendre(&format!("solve equation {i}"), "ok");
        }
        let c = &m.concepts()["equation"];
        assert_eq!(c.occurrences, 8);
        assert_eq!(c.context_examples.len(), MAX_CONTEXTES);
    }

    #[test]
    fn fichier_corrompu_mis_de_cote() {
        let dir = tempfile::tempdir().unwrap();
        let chemin = dir.path().join("m.json");
        std::fs::write(&chemin, "[1, 2").unwrap();

        assert!(matches!(lire_document(&chemin), Err(ErreurMemoire::Json(_))));
        let mut m = Memoire::charger(&chemin);
        assert!(m.document().conversation_history.is_empty());

        m.apprendre("what is the sum of 2 + 3", "5");
        m.sauvegarder().unwrap();

        // l’ancien contenu survit à côté, le nouveau document se relit
        let bak = dir.path().join("m.json.bak");
        assert_eq!(std::fs::read_to_string(&bak).unwrap(), "[1, 2");
        assert_eq!(Memoire::charger(&chemin).document().conversation_history.len(), 1);

        // deuxième écriture : plus rien à mettre de côté
        m.sauvegarder().unwrap();
        assert_eq!(std::fs::read_to_string(&bak).unwrap(), "[1, 2");
    }

    #[test]
    fn dates_sans_fuseau_acceptees() {
        let dir = tempfile::tempdir().unwrap();
        let chemin = dir.path().join("self_training.json");
        std::fs::write(
            &chemin,
            r#"{
    "learned_concepts": {
        "sum": {
            "occurrences": 1,
            "context_examples": [
                {"user_msg": "what is the sum of 2 and 3", "ai_response": "5",
                 "timestamp": "2024-05-01T12:34:56.789012"}
            ]
        }
    },
    "definitions": {
        "slope": {"definition": "rise over run", "added": "2024-05-01T12:35:00"}
    },
    "patterns": {},
    "conversation_history": [
        {"user_msg": "what is the sum of 2 and 3", "ai_response": "5",
         "timestamp": "2024-05-01T12:34:56.789012"}
    ],
    "metadata": {
        "last_updated": "2024-05-01T12:35:00.000001",
        "version": "1.0",
        "total_conversations": 1,
        "learning_sessions": 3
    }
}"#,
        )
        .unwrap();

        let mut m = Memoire::charger(&chemin);
        assert_eq!(m.definition("slope"), Some("rise over run"));
        assert_eq!(m.document().conversation_history.len(), 1);
        assert_eq!(m.document().metadata.learning_sessions, 4);
        assert_eq!(
            m.document().conversation_history[0].timestamp.to_rfc3339(),
            "2024-05-01T12:34:56.789012+00:00"
        );

        m.sauvegarder().unwrap();
        assert!(!dir.path().join("self_training.json.bak").exists());
        let relue = Memoire::charger(&chemin);
        assert_eq!(relue.definition("slope"), Some("rise over run"));
        assert_eq!(relue.document().conversation_history.len(), 1);
        assert_eq!(relue.concepts()["sum"].occurrences, 1);
    }

    #[test]
    fn lecture_des_dates() {
        assert!(horodatage::lire("2024-05-01T12:34:56Z").is_some());
        assert!(horodatage::lire("2024-05-01T12:34:56+02:00").is_some());
        assert!(horodatage::lire("2024-05-01T12:34:56").is_some());
        assert!(horodatage::lire("yesterday").is_none());
    }

    #[test]
    fn similaires() {
        let dir = tempfile::tempdir().unwrap();
        let mut m = Memoire::charger(dir.path().join("m.json"));
        m.apprendre("solve 2x + 3 = 7", "x = 2");
        m.apprendre("hello there", "hi");
        m.apprendre("solve 2x + 3 = 9 please", "x = 3");

        let proches = m.conversations_similaires("please solve 2x + 3 = 11", 2);
        assert_eq!(proches.len(), 2);
        assert_eq!(proches[0].user_msg, "solve 2x + 3 = 9 please");
        assert_eq!(proches[1].user_msg, "solve 2x + 3 = 7");
        assert!(m.conversations_similaires("nothing shared", 3).is_empty());
    }
}
