//! Résultat d’une résolution : succès (réponse + étapes) ou échec (motif).
//!
//! Sérialisé en JSON sous la forme historique
//! `{"answer", "type", "confidence", "steps"}`.

use num_rational::BigRational;
use serde::{Serialize, Serializer};

use super::categorie::Categorie;
use super::erreur::ErreurNoyau;

#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    pub reponse: String,
    pub categorie: Categorie,
    /// Numérotées "1. ...", jamais vides.
    pub etapes: Vec<String>,
    /// Valeur exacte (chemin arithmétique seulement).
    pub valeur: Option<BigRational>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Echec {
    pub categorie: Categorie,
    pub motif: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Resultat {
    Succes(Solution),
    Echec(Echec),
}

/// "texte" -> "1. texte", "2. ..." ; les lignes déjà indentées (suite d’une étape)
/// ne prennent pas de numéro.
fn numeroter(brutes: Vec<String>) -> Vec<String> {
    let mut n = 0;
    brutes
        .into_iter()
        .map(|e| {
            if e.starts_with("   ") {
                e
            } else {
                n += 1;
                format!("{n}. {e}")
            }
        })
        .collect()
}

impl Resultat {
    pub fn succes(categorie: Categorie, reponse: impl Into<String>, etapes: Vec<String>) -> Self {
        let reponse = reponse.into();
        let etapes = if etapes.is_empty() {
            vec![format!("Result: {reponse}")]
        } else {
            etapes
        };
        Resultat::Succes(Solution {
            reponse,
            categorie,
            etapes: numeroter(etapes),
            valeur: None,
        })
    }

    pub fn avec_valeur(self, valeur: BigRational) -> Self {
        match self {
            Resultat::Succes(s) => Resultat::Succes(Solution {
                valeur: Some(valeur),
                ..s
            }),
            echec => echec,
        }
    }

    pub fn echec(categorie: Categorie, motif: impl Into<String>) -> Self {
        Resultat::Echec(Echec {
            categorie,
            motif: motif.into(),
        })
    }

    pub fn depuis_erreur(categorie: Categorie, e: &ErreurNoyau) -> Self {
        Resultat::echec(categorie, e.to_string())
    }

    pub fn est_succes(&self) -> bool {
        matches!(self, Resultat::Succes(_))
    }

    /// 100 : résolu ; 0 : échec.
    pub fn confiance(&self) -> u8 {
        match self {
            Resultat::Succes(_) => 100,
            Resultat::Echec(_) => 0,
        }
    }

    pub fn categorie(&self) -> Categorie {
        match self {
            Resultat::Succes(s) => s.categorie,
            Resultat::Echec(e) => e.categorie,
        }
    }

    /// Réponse, ou motif de l’échec.
    pub fn reponse(&self) -> &str {
        match self {
            Resultat::Succes(s) => &s.reponse,
            Resultat::Echec(e) => &e.motif,
        }
    }

    pub fn etapes(&self) -> &[String] {
        match self {
            Resultat::Succes(s) => &s.etapes,
            Resultat::Echec(_) => &[],
        }
    }

    pub fn valeur(&self) -> Option<&BigRational> {
        match self {
            Resultat::Succes(s) => s.valeur.as_ref(),
            Resultat::Echec(_) => None,
        }
    }
}

#[derive(Serialize)]
struct VueJson<'a> {
    answer: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    confidence: u8,
    steps: &'a [String],
}

impl Serialize for Resultat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        VueJson {
            answer: self.reponse(),
            kind: self.categorie().nom(),
            confidence: self.confiance(),
            steps: self.etapes(),
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn etapes_numerotees() {
        let r = Resultat::succes(
            Categorie::Algebrique,
            "x = 2",
            vec![
                "Original equation: 2x + 3 = 7".into(),
                "   2x + 3 - 7 = 0".into(),
                "Solved for x".into(),
            ],
        );
        assert_eq!(
            r.etapes(),
            [
                "1. Original equation: 2x + 3 = 7",
                "   2x + 3 - 7 = 0",
                "2. Solved for x"
            ]
        );
        assert_eq!(r.confiance(), 100);
    }

    #[test]
    fn succes_sans_etape() {
        let r = Resultat::succes(Categorie::Addition, "5", Vec::new());
        assert_eq!(r.etapes(), ["1. Result: 5"]);
    }

    #[test]
    fn echec_confiance_nulle() {
        let r = Resultat::depuis_erreur(Categorie::Division, &ErreurNoyau::division_par_zero());
        assert_eq!(r.confiance(), 0);
        assert_eq!(r.reponse(), "cannot divide by zero");
        assert!(r.etapes().is_empty());
    }

    #[test]
    fn forme_json() {
        let r = Resultat::succes(Categorie::Addition, "5", vec!["Calculated".into()]);
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["answer"], "5");
        assert_eq!(v["type"], "Addition");
        assert_eq!(v["confidence"], 100);
        assert_eq!(v["steps"][0], "1. Calculated");
    }
}
