//! Couche de conversation autour du noyau.
//!
//! - intention.rs : routage d’un message (maths, salutation, définition...)
//! - sujet.rs     : sujet d’un problème (choix des notes)
//! - notes.rs     : notes de cours locales (CarnetNotes)
//! - memoire.rs   : mémoire d’apprentissage JSON
//!
//! Le noyau ne connaît rien de tout ça : la session lui passe le message
//! et décore la réponse.

pub mod intention;
pub mod memoire;
pub mod notes;
pub mod sujet;

use serde::Serialize;

use crate::noyau::Traitement;
use crate::reglages::Reglages;
use intention::{detecter, personnalite, salutation, Humeur, Intention};
use memoire::Memoire;
use notes::CarnetNotes;
use sujet::{identifier, Sujet};

/// Réponse à un message.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Reponse {
    /// Problème résolu (ou échec motivé), notes éventuelles à afficher après les étapes.
    Maths {
        traitement: Box<Traitement>,
        sujet: Sujet,
        notes: Vec<String>,
    },
    /// Tout le reste : une phrase.
    Bavardage { texte: String },
}

impl Reponse {
    fn bavardage(texte: impl Into<String>) -> Self {
        Reponse::Bavardage { texte: texte.into() }
    }

    /// Résumé d’une ligne (mémoire, journal).
    pub fn resume(&self) -> String {
        match self {
            Reponse::Maths { traitement, .. } => traitement.resultat.reponse().to_string(),
            Reponse::Bavardage { texte } => texte.clone(),
        }
    }
}

#[derive(Debug)]
pub struct Session {
    pub reglages: Reglages,
    notes: Option<CarnetNotes>,
    memoire: Option<Memoire>,
}

impl Session {
    pub fn nouvelle(reglages: Reglages) -> Self {
        Self {
            reglages,
            notes: None,
            memoire: None,
        }
    }

    pub fn avec_notes(mut self, carnet: CarnetNotes) -> Self {
        self.notes = Some(carnet);
        self
    }

    pub fn avec_memoire(mut self, memoire: Memoire) -> Self {
        self.memoire = Some(memoire);
        self
    }

    /// `heure` : heure locale (0..=23), pour la salutation.
    pub fn repondre(&mut self, message: &str, heure: u32) -> Reponse {
        let intention = detecter(message, &self.reglages);
        tracing::debug!(?intention, "intention");

        let reponse = match intention {
            Intention::Maths(traitement) => {
                let sujet = identifier(&traitement.probleme.texte());
                let notes = match (&mut self.notes, traitement.resultat.est_succes()) {
                    (Some(carnet), true) => carnet.lignes(sujet),
                    _ => Vec::new(),
                };
                Reponse::Maths {
                    traitement,
                    sujet,
                    notes,
                }
            }
            Intention::Salutation => Reponse::bavardage(personnalite(
                salutation(heure),
                Humeur::Joyeux,
                &[Humeur::Heure, Humeur::Maths],
            )),
            Intention::Aide => Reponse::bavardage(personnalite(
                intention::AIDE,
                Humeur::Aide,
                &[Humeur::Maths],
            )),
            Intention::AuRevoir => Reponse::bavardage(intention::AU_REVOIR),
            Intention::Definition(terme) => Reponse::bavardage(self.definir(&terme)),
            Intention::Apprentissage { terme, definition } => {
                Reponse::bavardage(self.apprendre_definition(&terme, &definition))
            }
            Intention::Inconnue => Reponse::bavardage(self.sans_reponse(message)),
        };

        if let Some(m) = self.memoire.as_mut() {
            m.apprendre(message, &reponse.resume());
        }
        reponse
    }

    /// Rappelle l’échange passé le plus proche, s’il y en a un.
    fn sans_reponse(&self, message: &str) -> String {
        let base = personnalite(intention::INCONNUE, Humeur::Reflexion, &[Humeur::Maths]);
        let proche = self
            .memoire
            .as_ref()
            .and_then(|m| m.conversations_similaires(message, 1).into_iter().next());
        match proche {
            Some(e) => format!("{base} Earlier you asked '{}' and I said '{}'.", e.user_msg, e.ai_response),
            None => base,
        }
    }

    fn definir(&self, terme: &str) -> String {
        match self.memoire.as_ref().and_then(|m| m.definition(terme)) {
            Some(def) => personnalite(&format!("{terme}: {def}"), Humeur::Reussite, &[]),
            None => personnalite(
                &format!("I don't know what '{terme}' means yet. Teach me with '{terme} means ...'."),
                Humeur::Reflexion,
                &[],
            ),
        }
    }

    fn apprendre_definition(&mut self, terme: &str, definition: &str) -> String {
        match self.memoire.as_mut() {
            Some(m) => {
                m.ajouter_definition(terme, definition);
                personnalite(&format!("Got it! {terme} means {definition}."), Humeur::Reussite, &[])
            }
            None => personnalite(
                "I can only remember definitions when a memory file is set (--memory).",
                Humeur::Erreur,
                &[],
            ),
        }
    }

    /// Écrit la mémoire (au mieux : erreur journalisée, jamais fatale).
    pub fn terminer(&mut self) {
        if let Some(m) = self.memoire.as_mut() {
            if let Err(e) = m.sauvegarder() {
                tracing::warn!(chemin = %m.chemin().display(), erreur = %e, "mémoire non sauvegardée");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maths_avec_sujet_et_notes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("algebra.json"),
            r#"{"formulas": {"algebra": "ax + b = c"}, "examples": {}}"#,
        )
        .unwrap();

        let mut s = Session::nouvelle(Reglages::default()).avec_notes(CarnetNotes::nouveau(dir.path()));
        match s.repondre("solve 2x+3=7", 10) {
            Reponse::Maths {
                traitement,
                sujet,
                notes,
            } => {
                assert_eq!(traitement.resultat.reponse(), "x = 2");
                assert_eq!(sujet, Sujet::Algebre);
                assert_eq!(notes, vec!["Using algebra formula: ax + b = c".to_string()]);
            }
            autre => panic!("attendu Maths, obtenu {autre:?}"),
        }

        // pas de notes pour les échecs
        match s.repondre("5/0", 10) {
            Reponse::Maths { notes, sujet, .. } => {
                assert!(notes.is_empty());
                assert_eq!(sujet, Sujet::Base);
            }
            autre => panic!("attendu Maths, obtenu {autre:?}"),
        }
    }

    #[test]
    fn bavardage() {
        let mut s = Session::nouvelle(Reglages::default());
        assert_eq!(
            s.repondre("hi", 9).resume(),
            "😊 🕐 Good morning! Ready for some math?"
        );
        assert_eq!(s.repondre("goodbye", 9).resume(), intention::AU_REVOIR);
        assert!(s.repondre("gradient means slope", 9).resume().contains("--memory"));
    }

    #[test]
    fn definitions_en_memoire() {
        let dir = tempfile::tempdir().unwrap();
        let chemin = dir.path().join("memoire.json");

        let mut s = Session::nouvelle(Reglages::default()).avec_memoire(Memoire::charger(&chemin));
        assert!(s.repondre("define gradient", 9).resume().contains("don't know"));
        assert!(s.repondre("gradient means the slope of a line", 9).resume().contains("Got it"));
        assert_eq!(
            s.repondre("define gradient", 9).resume(),
            "✅ gradient: the slope of a line"
        );
        s.repondre("what is the sum of 2 + 3", 9);
        assert!(s
            .repondre("tell me the sum again", 9)
            .resume()
            .ends_with("Earlier you asked 'what is the sum of 2 + 3' and I said '5'."));
        s.terminer();

        let relue = Memoire::charger(&chemin);
        assert_eq!(relue.document().conversation_history.len(), 5);
        assert!(relue.concepts().contains_key("sum"));
    }
}
