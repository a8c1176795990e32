// src/conversation/intention.rs
//
// Routage d’un message : que veut l’utilisateur ?
//
// Ordre (la première règle gagne) :
//   1. "define X" / "what does X mean"       -> Definition
//   2. "X means Y"                           -> Apprentissage
//   3. le noyau trouve un problème de maths  -> Maths
//   4. au revoir / aide / salutation         -> phrases fixes
//   5. sinon                                 -> Inconnue
//
// Les définitions passent avant les maths : "define slope" serait sinon lu
// comme un problème de droite.

use regex::Regex;
use std::sync::OnceLock;

use crate::noyau::extraction::motif;
use crate::noyau::{traiter, Traitement};
use crate::reglages::Reglages;

#[derive(Clone, Debug, PartialEq)]
pub enum Intention {
    Salutation,
    Aide,
    AuRevoir,
    Definition(String),
    Apprentissage { terme: String, definition: String },
    Maths(Box<Traitement>),
    Inconnue,
}

fn re_definition() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    motif(
        &R,
        r"(?i)^\s*(?:define\s+(?P<a>.+?)|what\s+does\s+(?P<b>.+?)\s+mean)\s*[?.!]*\s*$",
    )
}

fn re_apprentissage() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    motif(&R, r"(?i)^\s*(?P<terme>[a-z][a-z \-]{0,40}?)\s+means\s+(?P<def>.+?)\s*[.!]*\s*$")
}

fn re_au_revoir() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    motif(&R, r"(?i)\b(?:bye|goodbye|see you)\b")
}

fn re_aide() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    motif(&R, r"(?i)\b(?:help|what can you do|how do you work)\b")
}

fn re_salutation() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    motif(
        &R,
        r"(?i)\b(?:hi|hello|hey|howdy|hola|yo|sup|good (?:morning|afternoon|evening)|what'?s up|how are you)\b",
    )
}

pub fn detecter(message: &str, reglages: &Reglages) -> Intention {
    if let Some(c) = re_definition().captures(message) {
        if let Some(t) = c.name("a").or_else(|| c.name("b")) {
            return Intention::Definition(t.as_str().trim().to_lowercase());
        }
    }

    if let Some(c) = re_apprentissage().captures(message) {
        return Intention::Apprentissage {
            terme: c["terme"].trim().to_lowercase(),
            definition: c["def"].trim().to_string(),
        };
    }

    if let Some(t) = traiter(message, reglages) {
        return Intention::Maths(Box::new(t));
    }

    if re_au_revoir().is_match(message) {
        Intention::AuRevoir
    } else if re_aide().is_match(message) {
        Intention::Aide
    } else if re_salutation().is_match(message) {
        Intention::Salutation
    } else {
        Intention::Inconnue
    }
}

/* ------------------------ Personnalité ------------------------ */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Humeur {
    Joyeux,
    Maths,
    Reflexion,
    Reussite,
    Aide,
    Erreur,
    Heure,
}

impl Humeur {
    /// Premier emoji de chaque jeu : choix déterministe.
    fn emoji(self) -> &'static str {
        match self {
            Humeur::Joyeux => "😊",
            Humeur::Maths => "🔢",
            Humeur::Reflexion => "🤔",
            Humeur::Reussite => "✅",
            Humeur::Aide => "💡",
            Humeur::Erreur => "😅",
            Humeur::Heure => "🕐",
        }
    }
}

/// Préfixe d’au plus deux emojis (humeur puis contextes, sans doublon).
pub fn personnalite(message: &str, humeur: Humeur, contextes: &[Humeur]) -> String {
    let mut emojis: Vec<&str> = Vec::with_capacity(2);
    for h in std::iter::once(humeur).chain(contextes.iter().copied()) {
        if emojis.len() == 2 {
            break;
        }
        if !emojis.contains(&h.emoji()) {
            emojis.push(h.emoji());
        }
    }
    format!("{} {message}", emojis.join(" "))
}

/// Salutation selon l’heure locale (0..=23).
pub fn salutation(heure: u32) -> &'static str {
    match heure {
        0..=11 => "Good morning! Ready for some math?",
        12..=16 => "Good afternoon! Let's solve some problems!",
        _ => "Good evening! Time for some math fun!",
    }
}

pub const AIDE: &str = "I can solve math problems and provide step-by-step solutions. \
Try asking something like '2 + 2', 'solve 2x+3=7', 'x+y=3, x-y=1' or \
'line with slope 2 passing through (1,3)'.";

pub const AU_REVOIR: &str = "Goodbye! Have a great day!";

pub const INCONNUE: &str =
    "I'm not sure how to respond to that. Would you like to try a math problem?";
