// src/noyau/extraction.rs
//
// Extraction d’un problème dans une phrase libre.
//
// Ordre (contrat) :
// - droite pente/point : tout le texte (le solveur y lit pente + point)
// - système : mots de remplissage retirés, découpe sur ',' / '\n',
//   motif "variable avant '='" par segment ; au moins 2 équations sinon on retombe
//   sur le cas "une seule équation"
// - une équation / expression : opérateurs en toutes lettres -> symboles,
//   remplissage retiré, ponctuation finale retirée, puis
//   motif algébrique AVANT motif arithmétique
//
// Rien de reconnaissable => None (pas une erreur : l’appelant bascule hors maths).

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use super::categorie::Categorie;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum ProblemeExtrait {
    /// "a op b"
    Expression(String),
    /// une équation à une inconnue (ou une expression à annuler)
    Equation(String),
    /// plusieurs équations (ordre gardé pour la narration seulement)
    Systeme(Vec<String>),
    /// texte complet d’un problème de droite
    Droite(String),
}

impl ProblemeExtrait {
    /// Forme affichable ("Problem: ...").
    pub fn texte(&self) -> String {
        match self {
            ProblemeExtrait::Expression(s)
            | ProblemeExtrait::Equation(s)
            | ProblemeExtrait::Droite(s) => s.clone(),
            ProblemeExtrait::Systeme(eqs) => eqs.join(", "),
        }
    }
}

/* ------------------------ Motifs (compilés une fois) ------------------------ */

/// Motif compilé une seule fois (partagé avec le solveur).
pub(crate) fn motif(cell: &'static OnceLock<Regex>, source: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(source).expect("motif invalide"))
}

fn re_remplissage_systeme() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    motif(&R, r"\b(?:solve|the|system|of|equations)\b")
}

fn re_equation_systeme() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    motif(&R, r"[+\-]?[0-9.]*\s*\(?\s*[xyz][^=]*=[^,\n]+")
}

fn re_remplissage() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    motif(&R, r"\b(?:solve|calculate|what is|evaluate|compute)\b")
}

fn re_caracteres_parasites() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    motif(&R, r"[^\w\s+\-*/^()=.,]")
}

fn re_algebrique() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    // termes (chiffres / variables / parenthèses) reliés par des opérateurs, '=' , idem
    motif(
        &R,
        r"[+\-]?\s*[0-9xyz.()]+(?:\s*[+\-*/^]?\s*[0-9xyz.()]+)*\s*=\s*[+\-]?\s*[0-9xyz.()]+(?:\s*[+\-*/^]?\s*[0-9xyz.()]+)*",
    )
}

fn re_arithmetique() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    // signe de tête seulement en début de texte / après un blanc ou '('
    motif(
        &R,
        r"(?:^|[\s(])(-?\d+(?:\.\d+)?\s*[+\-*/^]\s*-?\d+(?:\.\d+)?)",
    )
}

/// Opérateurs en toutes lettres (ordre : formes longues d’abord).
const MOTS_OPERATEURS: &[(&str, &str)] = &[
    ("to the power of", "^"),
    ("multiplied by", "*"),
    ("divided by", "/"),
    ("plus", "+"),
    ("minus", "-"),
    ("times", "*"),
    ("over", "/"),
];

fn re_mots_operateurs() -> &'static [(Regex, &'static str)] {
    static R: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    R.get_or_init(|| {
        MOTS_OPERATEURS
            .iter()
            .map(|(mot, sym)| {
                let re = Regex::new(&format!(r"\b{}\b", regex::escape(mot)))
                    .expect("motif d’opérateur invalide");
                (re, *sym)
            })
            .collect()
    })
}

/* ------------------------ Étapes de nettoyage ------------------------ */

/// "seven plus" n’est pas géré : seulement les opérateurs.
pub fn traduire_mots_operateurs(texte: &str) -> String {
    let mut out = texte.to_string();
    for (re, sym) in re_mots_operateurs() {
        out = re.replace_all(&out, format!(" {sym} ")).into_owned();
    }
    out
}

fn retirer_ponctuation_finale(s: &str) -> &str {
    s.trim_end_matches(|c: char| c.is_whitespace() || matches!(c, '.' | ',' | '!' | '?' | ';' | ':'))
}

fn nettoyer_simple(texte: &str) -> String {
    let t = traduire_mots_operateurs(texte);
    let t = re_remplissage().replace_all(&t, " ");
    let t = re_caracteres_parasites().replace_all(&t, "");
    let t = t.split_whitespace().collect::<Vec<_>>().join(" ");
    retirer_ponctuation_finale(&t).to_string()
}

/* ------------------------ Recherches ------------------------ */

fn chercher_systeme(texte: &str) -> Vec<String> {
    let sans_remplissage = re_remplissage_systeme().replace_all(texte, " ");

    sans_remplissage
        .split([',', '\n'])
        .map(str::trim)
        .filter(|seg| seg.contains('='))
        .filter_map(|seg| re_equation_systeme().find(seg))
        .map(|m| retirer_ponctuation_finale(m.as_str().trim()).to_string())
        .filter(|eq| !eq.is_empty())
        .collect()
}

fn chercher_simple(texte: &str) -> Option<ProblemeExtrait> {
    let propre = nettoyer_simple(texte);

    if let Some(m) = re_algebrique().find(&propre) {
        let eq = m.as_str().trim().to_string();
        return Some(ProblemeExtrait::Equation(eq));
    }

    let caps = re_arithmetique().captures(&propre)?;
    let expr = caps.get(1)?.as_str().trim().to_string();
    Some(ProblemeExtrait::Expression(expr))
}

/// Isole le problème contenu dans `texte` (déjà normalisé).
pub fn extraire(texte: &str, categorie: Categorie) -> Option<ProblemeExtrait> {
    let bas = texte.to_lowercase();
    let bas = bas.trim();
    if bas.is_empty() {
        return None;
    }

    if categorie == Categorie::DroitePentePoint {
        return Some(ProblemeExtrait::Droite(bas.to_string()));
    }

    if categorie == Categorie::Systeme {
        let equations = chercher_systeme(bas);
        if equations.len() >= 2 {
            return Some(ProblemeExtrait::Systeme(equations));
        }
        tracing::debug!(
            trouvees = equations.len(),
            "système incomplet : on retombe sur une équation seule"
        );
    }

    chercher_simple(bas)
}
