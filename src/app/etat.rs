//! src/app/etat.rs
//!
//! État de la fenêtre de chat (sans vue).
//!
//! Rôle : contenir l’entrée, l’historique des bulles et la session, et offrir
//! des opérations simples (C/CLR/AC, envoyer) sans logique d’affichage.
//!
//! Contrats :
//! - Aucun widget ici.
//! - Actions déterministes (l’heure est passée en paramètre).
//! - Défense en profondeur : bornes sur les chiffres (via Reglages).

use crate::conversation::Session;
use crate::reglages::Reglages;
use crate::rendu;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Bulle {
    Utilisateur(String),
    Assistant(String),
}

#[derive(Debug)]
pub struct AppChat {
    // --- entrée utilisateur ---
    pub entree: String,

    // --- sorties ---
    pub historique: Vec<Bulle>,

    // --- session (réglages + notes + mémoire) ---
    pub session: Session,

    // --- UX ---
    // Permet à vue.rs de redonner le focus à l’entrée après un clic sur un bouton.
    pub focus_entree: bool,
    // Défilement vers la dernière bulle à la prochaine frame.
    pub defiler: bool,
}

impl AppChat {
    pub fn nouvelle(session: Session) -> Self {
        Self {
            entree: String::new(),
            historique: Vec::new(),
            session,
            focus_entree: true, // au lancement, on veut pouvoir taper tout de suite
            defiler: false,
        }
    }

    /* ------------------------ Actions “boutons” (état seulement) ------------------------ */

    /// AC : remise à zéro totale (entrée + historique + réglages par défaut).
    pub fn reset_total(&mut self) {
        self.entree.clear();
        self.clear_historique();
        let format = self.session.reglages.format;
        self.session.reglages = Reglages {
            format,
            ..Reglages::default()
        };
    }

    /// C : effacer seulement l’entrée.
    pub fn clear_entree(&mut self) {
        self.entree.clear();
        self.focus_entree = true;
    }

    /// CLR : effacer l’historique (sans toucher à l’entrée).
    pub fn clear_historique(&mut self) {
        self.historique.clear();
        self.focus_entree = true;
    }

    /// Envoie l’entrée à la session ; une entrée vide ne fait rien.
    pub fn envoyer(&mut self, heure: u32) {
        let message = self.entree.trim().to_string();
        if message.is_empty() {
            self.focus_entree = true;
            return;
        }

        let reponse = self.session.repondre(&message, heure);
        self.historique.push(Bulle::Utilisateur(message));
        self.historique.push(Bulle::Assistant(rendu::texte(&reponse)));

        self.entree.clear();
        self.defiler = true;
        self.focus_entree = true;
    }

    /// Garde-fou : les bornes vivent dans Reglages.
    pub fn set_digits(&mut self, digits: usize) {
        self.session.reglages.set_chiffres(digits);
        self.focus_entree = true;
    }

    pub fn set_toutes_racines(&mut self, oui: bool) {
        self.session.reglages.toutes_racines = oui;
        self.focus_entree = true;
    }
}
