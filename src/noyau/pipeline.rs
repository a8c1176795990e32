//! Noyau : pipeline complet
//!
//! texte brut -> normaliser -> classer -> extraire -> (re)classer -> résoudre
//!
//! Remarque : la catégorie annoncée sur la phrase entière est grossière
//! ("what is 7 times 4" ne contient aucun opérateur). Une fois le problème
//! isolé, une expression ou une équation est reclassée sur son propre texte.

use serde::Serialize;

use super::categorie::{classer, Categorie};
use super::extraction::{extraire, ProblemeExtrait};
use super::moteur::{MoteurExact, MoteurSymbolique};
use super::resultat::Resultat;
use super::solveur::resoudre_avec;
use super::symboles::normaliser;
use crate::reglages::Reglages;

/// Trace d’un passage dans le pipeline (démarche + résultat).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Traitement {
    pub normalise: String,
    pub categorie: Categorie,
    pub probleme: ProblemeExtrait,
    pub resultat: Resultat,
}

/// None : aucun problème de maths reconnaissable (pas une erreur).
pub fn traiter(texte: &str, reglages: &Reglages) -> Option<Traitement> {
    traiter_avec(&MoteurExact, texte, reglages)
}

pub fn traiter_avec<M: MoteurSymbolique>(
    moteur: &M,
    texte: &str,
    reglages: &Reglages,
) -> Option<Traitement> {
    let normalise = normaliser(texte);
    let annoncee = classer(&normalise);
    tracing::debug!(texte = %normalise, categorie = %annoncee, "classement");

    let Some(probleme) = extraire(&normalise, annoncee) else {
        tracing::debug!("aucun problème extrait");
        return None;
    };

    let categorie = match &probleme {
        ProblemeExtrait::Expression(e) | ProblemeExtrait::Equation(e) => classer(e),
        ProblemeExtrait::Systeme(_) | ProblemeExtrait::Droite(_) => annoncee,
    };
    tracing::debug!(probleme = %probleme.texte(), categorie = %categorie, "extraction");

    let resultat = resoudre_avec(moteur, &probleme, categorie, reglages);
    tracing::debug!(
        confiance = resultat.confiance(),
        reponse = %resultat.reponse(),
        "résolution"
    );

    Some(Traitement {
        normalise,
        categorie: resultat.categorie(),
        probleme,
        resultat,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> Traitement {
        traiter(s, &Reglages::default()).unwrap_or_else(|| panic!("rien extrait de {s:?}"))
    }

    #[test]
    fn phrase_libre_arithmetique() {
        let r = t("What is 7 times 4?");
        assert_eq!(r.categorie, Categorie::Multiplication);
        assert_eq!(r.resultat.reponse(), "28");
    }

    #[test]
    fn symboles_unicode() {
        let r = t("12 ÷ 4");
        assert_eq!(r.normalise, "12 / 4");
        assert_eq!(r.categorie, Categorie::Division);
        assert_eq!(r.resultat.reponse(), "3");

        let r = t("solve 𝑥² − 9 = 0");
        assert_eq!(r.probleme, ProblemeExtrait::Equation("x^2 - 9 = 0".into()));
        assert_eq!(r.resultat.reponse(), "x = -3");
    }

    #[test]
    fn chemins_complets() {
        assert_eq!(t("2x+3=7").resultat.reponse(), "x = 2");
        assert_eq!(t("x+y=3, x-y=1").resultat.reponse(), "x = 2, y = 1");
        assert_eq!(
            t("line with slope 2 passing through (1,3)").resultat.reponse(),
            "y = 2x + 1"
        );
    }

    #[test]
    fn hors_maths() {
        assert!(traiter("hello there", &Reglages::default()).is_none());
        assert!(traiter("", &Reglages::default()).is_none());
    }

    #[test]
    fn moteur_injecte() {
        use crate::noyau::erreur::ErreurNoyau;
        use crate::noyau::moteur::{Affectation, Racine};
        use crate::noyau::poly::Poly;

        struct SansRacine;
        impl MoteurSymbolique for SansRacine {
            fn resoudre(&self, _: &Poly, _: &str) -> Result<Vec<Racine>, ErreurNoyau> {
                Ok(Vec::new())
            }
            fn resoudre_systeme(
                &self,
                _: &[Poly],
                _: &[String],
            ) -> Result<Vec<Affectation>, ErreurNoyau> {
                Ok(Vec::new())
            }
        }

        let r = traiter_avec(&SansRacine, "2x+3=7", &Reglages::default()).unwrap();
        assert_eq!(r.resultat.confiance(), 0);
        let r = traiter_avec(&SansRacine, "x+y=3, x-y=1", &Reglages::default()).unwrap();
        assert_eq!(r.resultat.reponse(), "No solution");
    }
}
