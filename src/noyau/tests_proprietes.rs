//! Tests de propriétés (campagne) : le contrat observable du pipeline.
//!
//! - normalisation idempotente
//! - "a op b" : confiance 100 et valeur exacte == a op b
//! - division par zéro : confiance 0
//! - exemples de référence (équation, système, droite, hors maths)
//! - tout succès porte des étapes numérotées 1., 2., ...

use num_bigint::BigInt;
use num_rational::BigRational;

use super::categorie::{classer, Categorie};
use super::expr::rational_pow_int;
use super::extraction::{extraire, ProblemeExtrait};
use super::pipeline::{traiter, Traitement};
use super::symboles::normaliser;
use crate::reglages::Reglages;

fn t(s: &str) -> Traitement {
    traiter(s, &Reglages::default()).unwrap_or_else(|| panic!("rien extrait de {s:?}"))
}

fn r(n: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(n))
}

/// Numéros consécutifs à partir de 1 (lignes indentées = suite d’une étape).
fn assert_etapes_numerotees(tr: &Traitement) {
    let etapes = tr.resultat.etapes();
    assert!(!etapes.is_empty(), "succès sans étape : {tr:?}");
    let mut attendu = 1;
    for e in etapes {
        if e.starts_with("   ") {
            continue;
        }
        assert!(
            e.starts_with(&format!("{attendu}. ")),
            "étape {e:?} (attendu {attendu}.) dans {tr:?}"
        );
        attendu += 1;
    }
}

#[test]
fn prop_normalisation_idempotente() {
    let cas = [
        "",
        "2 × 3 ÷ 4",
        "𝑥² + 𝑦³ = 10",
        "x − y ≈ 3",
        "5 ➕ 7 ➖ 1",
        "plain words only",
        "χ⋅γ ＝ ζ",
        "10¹² ∗ 3",
    ];
    for s in cas {
        let une = normaliser(s);
        assert_eq!(normaliser(&une), une, "s={s:?}");
    }
}

#[test]
fn prop_arithmetique_exacte() {
    let paires = [(7, 4), (12, 3), (-5, 2), (0, 9), (123456, 789), (2, 10)];
    for (a, b) in paires {
        for op in ['+', '-', '*', '/', '^'] {
            let texte = format!("{a} {op} {b}");
            let tr = t(&texte);
            assert_eq!(tr.resultat.confiance(), 100, "{texte}");
            let attendu = match op {
                '+' => r(a) + r(b),
                '-' => r(a) - r(b),
                '*' => r(a) * r(b),
                '/' => r(a) / r(b),
                _ => rational_pow_int(r(a), b),
            };
            assert_eq!(tr.resultat.valeur(), Some(&attendu), "{texte}");
            assert_etapes_numerotees(&tr);
        }
    }
}

#[test]
fn prop_division_par_zero() {
    for texte in ["5/0", "what is 5 divided by 0", "0 / 0"] {
        let tr = t(texte);
        assert_eq!(tr.resultat.confiance(), 0, "{texte}");
        assert!(tr.resultat.etapes().is_empty());
    }
}

#[test]
fn ref_equation() {
    assert_eq!(classer("2x+3=7"), Categorie::Algebrique);
    assert_eq!(
        extraire("2x+3=7", Categorie::Algebrique),
        Some(ProblemeExtrait::Equation("2x+3=7".into()))
    );
    let tr = t("2x+3=7");
    assert_eq!(tr.resultat.reponse(), "x = 2");
    assert_etapes_numerotees(&tr);
}

#[test]
fn ref_systeme() {
    assert_eq!(classer("x+y=3, x-y=1"), Categorie::Systeme);
    let tr = t("x+y=3, x-y=1");
    assert_eq!(tr.categorie, Categorie::Systeme);
    assert_eq!(tr.resultat.reponse(), "x = 2, y = 1");
    assert_etapes_numerotees(&tr);
}

#[test]
fn ref_droite() {
    let texte = "line with slope 2 passing through (1,3)";
    assert_eq!(classer(texte), Categorie::DroitePentePoint);
    let tr = t(texte);
    assert_eq!(tr.resultat.reponse(), "y = 2x + 1");
    assert_etapes_numerotees(&tr);
}

#[test]
fn ref_hors_maths() {
    assert_eq!(extraire("hello there", classer("hello there")), None);
    assert!(traiter("hello there", &Reglages::default()).is_none());
}

#[test]
fn prop_succes_toujours_numerotes() {
    let cas = [
        "what is 7 times 4?",
        "1/3",
        "2^0.5",
        "solve x^2 - 5x + 6 = 0",
        "x^2 = 2",
        "Solve the system of equations: 2x + y = 5\nx - y = 1.",
        "x+y=1, x+y=2",
        "x^2 + y^2 = 25, x + y = 7",
        "slope is -0.5 through the point (4, 1)",
    ];
    for texte in cas {
        let tr = t(texte);
        assert_eq!(tr.resultat.confiance(), 100, "{texte} -> {tr:?}");
        assert_etapes_numerotees(&tr);
    }
}

#[test]
fn prop_echecs_sans_etape() {
    let cas = [
        "x^2 + 1 = 0",
        "x = x",
        "(2x = 7",
        "line with slope 2",
        "2^100000",
        // puissances imbriquées : degré borné sur le résultat
        "(((x^64)^64)^64)^64 = 1",
        "((((((x^64)^64)^64)^64)^64)^64) = 1",
        "(x^40)(x^40) = 2",
    ];
    for texte in cas {
        let tr = t(texte);
        assert_eq!(tr.resultat.confiance(), 0, "{texte} -> {tr:?}");
        assert!(tr.resultat.etapes().is_empty());
        assert!(!tr.resultat.reponse().is_empty());
    }
}
