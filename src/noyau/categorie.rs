// src/noyau/categorie.rs
//
// Classement grossier d’un texte normalisé.
//
// Règles ordonnées (la première qui s’applique gagne), sur le texte en minuscules :
//   1. phrase de droite ("equation of a line", "slope", "passing through")
//   2. (',' ou '\n') ET '=' ET ("system" ou plusieurs '=')  -> système
//   3. 'x' ou 'y' ou '='                                    -> algébrique
//   4. '+', '-', '*', '/', '^' (dans cet ordre)             -> arithmétique
//   5. sinon                                                -> inconnue
//
// L’ordre est un contrat : "2+3*4" est une Addition, pas une Multiplication.

use serde::Serialize;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Categorie {
    Addition,
    Soustraction,
    Multiplication,
    Division,
    Exposant,
    Algebrique,
    Systeme,
    DroitePentePoint,
    Inconnue,
}

impl Categorie {
    /// Catégorie arithmétique d’un opérateur ASCII.
    pub fn depuis_operateur(op: char) -> Option<Categorie> {
        match op {
            '+' => Some(Categorie::Addition),
            '-' => Some(Categorie::Soustraction),
            '*' => Some(Categorie::Multiplication),
            '/' => Some(Categorie::Division),
            '^' => Some(Categorie::Exposant),
            _ => None,
        }
    }

    /// Nom affiché (sortie texte / JSON).
    pub fn nom(self) -> &'static str {
        match self {
            Categorie::Addition => "Addition",
            Categorie::Soustraction => "Subtraction",
            Categorie::Multiplication => "Multiplication",
            Categorie::Division => "Division",
            Categorie::Exposant => "Exponent",
            Categorie::Algebrique => "Algebraic",
            Categorie::Systeme => "System of Equations",
            Categorie::DroitePentePoint => "Linear Equation",
            Categorie::Inconnue => "Unknown",
        }
    }
}

impl fmt::Display for Categorie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.nom())
    }
}

/* ------------------------ Règles (priorité visible) ------------------------ */

type Regle = fn(&str) -> bool;

const PHRASES_DROITE: &[&str] = &["equation of a line", "slope", "passing through"];

fn mentionne_droite(t: &str) -> bool {
    PHRASES_DROITE.iter().any(|p| t.contains(p))
}

fn ressemble_systeme(t: &str) -> bool {
    let separe = t.contains(',') || t.contains('\n');
    let egalites = t.matches('=').count();
    separe && egalites > 0 && (t.contains("system") || egalites > 1)
}

fn ressemble_algebre(t: &str) -> bool {
    t.contains('x') || t.contains('y') || t.contains('=')
}

fn contient_plus(t: &str) -> bool {
    t.contains('+')
}
fn contient_moins(t: &str) -> bool {
    t.contains('-')
}
fn contient_fois(t: &str) -> bool {
    t.contains('*')
}
fn contient_slash(t: &str) -> bool {
    t.contains('/')
}
fn contient_chapeau(t: &str) -> bool {
    t.contains('^')
}

/// Table de priorité. Ne PAS réordonner.
const REGLES: &[(Regle, Categorie)] = &[
    (mentionne_droite, Categorie::DroitePentePoint),
    (ressemble_systeme, Categorie::Systeme),
    (ressemble_algebre, Categorie::Algebrique),
    (contient_plus, Categorie::Addition),
    (contient_moins, Categorie::Soustraction),
    (contient_fois, Categorie::Multiplication),
    (contient_slash, Categorie::Division),
    (contient_chapeau, Categorie::Exposant),
];

/// Classe un texte (déjà normalisé). Fonction pure du contenu.
pub fn classer(texte: &str) -> Categorie {
    let t = texte.to_lowercase();
    REGLES
        .iter()
        .find(|(regle, _)| regle(&t))
        .map(|(_, c)| *c)
        .unwrap_or(Categorie::Inconnue)
}
