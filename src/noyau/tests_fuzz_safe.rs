//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - tailles bornées
//! - budget temps global
//! - invariants clés : jamais de panique, confiance 100 <=> étapes présentes,
//!   valeurs exactes égales à l’arithmétique de référence

use std::time::{Duration, Instant};

use num_bigint::BigInt;
use num_rational::BigRational;

use super::jetons::lire_decimal;
use super::pipeline::traiter;
use super::symboles::normaliser;
use crate::reglages::Reglages;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
    /// entier dans [-m, m]
    fn entier(&mut self, m: i64) -> i64 {
        self.pick((2 * m + 1) as u32) as i64 - m
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération (bornée) ------------------------ */

fn gen_nombre(rng: &mut Rng) -> String {
    let n = rng.entier(999);
    if rng.coin() {
        format!("{n}.{}", rng.pick(100))
    } else {
        format!("{n}")
    }
}

/// Alphabet mêlant variantes Unicode, opérateurs, lettres et bruit.
const ALPHABET: &[&str] = &[
    "x", "y", "z", "𝑥", "𝓎", "ζ", "χ", "+", "＋", "−", "—", "×", "⋅", "÷", "⁄", "=", "≈",
    "^", "²", "³", "⁰", "1", "2", "7", ".", ",", " ", "(", ")", "\n", "a", "slope", "through",
    "system", "plus", "times", "?", "!", "é", "→",
];

fn gen_bruit(rng: &mut Rng, longueur: usize) -> String {
    (0..longueur)
        .map(|_| ALPHABET[rng.pick(ALPHABET.len() as u32) as usize])
        .collect()
}

/// Monôme `a·var` écrit avec son signe ("x", "-3y", " + 2x", " - x").
/// Un coefficient nul donne une chaîne vide (sauf en tête).
fn terme(a: i64, var: &str, tete: bool) -> String {
    let corps = match a.abs() {
        1 if !var.is_empty() => var.to_string(),
        m => format!("{m}{var}"),
    };
    match (tete, a) {
        (false, 0) => String::new(),
        (true, _) if a < 0 => format!("-{corps}"),
        (true, _) => corps,
        (false, _) if a < 0 => format!(" - {corps}"),
        (false, _) => format!(" + {corps}"),
    }
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_normalisation_idempotente() {
    let t0 = Instant::now();
    let max = Duration::from_millis(250);
    let mut rng = Rng::new(0xC0FFEE_u64);

    for _ in 0..300 {
        budget(t0, max);
        let n = rng.pick(40) as usize;
        let s = gen_bruit(&mut rng, n);
        let une = normaliser(&s);
        assert_eq!(normaliser(&une), une, "s={s:?}");
    }
}

#[test]
fn fuzz_safe_arithmetique_exacte() {
    let t0 = Instant::now();
    let max = Duration::from_millis(400);
    let mut rng = Rng::new(0xBADC0DE_u64);
    let reglages = Reglages::default();

    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;

    for _ in 0..200 {
        budget(t0, max);

        let ta = gen_nombre(&mut rng);
        let op = ['+', '-', '*', '/'][rng.pick(4) as usize];
        // zéro fréquent à droite : la division par zéro doit être vue
        let tb = if rng.pick(8) == 0 { "0".to_string() } else { gen_nombre(&mut rng) };
        let texte = format!("{ta} {op} {tb}");

        let tr = traiter(&texte, &reglages).unwrap_or_else(|| panic!("rien extrait: {texte:?}"));
        let a = lire_decimal(&ta).unwrap();
        let b = lire_decimal(&tb).unwrap();

        let attendu = match op {
            '+' => Some(&a + &b),
            '-' => Some(&a - &b),
            '*' => Some(&a * &b),
            _ if b == BigRational::from_integer(BigInt::from(0)) => None,
            _ => Some(&a / &b),
        };

        match attendu {
            Some(v) => {
                assert_eq!(tr.resultat.confiance(), 100, "{texte}");
                assert_eq!(tr.resultat.valeur(), Some(&v), "{texte}");
                assert!(tr.resultat.etapes()[0].starts_with("1. "));
                seen_ok += 1;
            }
            None => {
                assert_eq!(tr.resultat.confiance(), 0, "{texte}");
                seen_err += 1;
            }
        }
    }

    assert!(seen_ok > 100, "trop peu de succès: {seen_ok}");
    assert!(seen_err > 0, "aucune division par zéro vue");
}

#[test]
fn fuzz_safe_second_degre_racines_entieres() {
    let t0 = Instant::now();
    let max = Duration::from_millis(400);
    let mut rng = Rng::new(0x5EED_u64);
    let reglages = Reglages::default().avec_toutes_racines(true);

    for _ in 0..60 {
        budget(t0, max);

        let r1 = rng.entier(12);
        let r2 = rng.entier(12);
        // (x - r1)(x - r2) = x² - (r1 + r2)x + r1·r2
        let texte = format!(
            "x^2{}{} = 0",
            terme(-(r1 + r2), "x", false),
            terme(r1 * r2, "", false)
        );
        let tr = traiter(&texte, &reglages).unwrap_or_else(|| panic!("rien extrait: {texte:?}"));

        let (lo, hi) = (r1.min(r2), r1.max(r2));
        let attendu = if lo == hi {
            format!("x = {lo}")
        } else {
            format!("x = {lo} or x = {hi}")
        };
        assert_eq!(tr.resultat.reponse(), attendu, "{texte}");
    }
}

#[test]
fn fuzz_safe_systemes_lineaires() {
    let t0 = Instant::now();
    let max = Duration::from_millis(400);
    let mut rng = Rng::new(0xD1CE_u64);
    let reglages = Reglages::default();

    let mut vus = 0;
    for _ in 0..80 {
        budget(t0, max);

        let (x0, y0) = (rng.entier(9), rng.entier(9));
        let (a1, b1, a2, b2) = (rng.entier(5), rng.entier(5), rng.entier(5), rng.entier(5));
        if a1 * b2 - a2 * b1 == 0 || a1 == 0 || a2 == 0 || b1 == 0 || b2 == 0 {
            continue;
        }
        let (c1, c2) = (a1 * x0 + b1 * y0, a2 * x0 + b2 * y0);
        let texte = format!(
            "{}{} = {c1}, {}{} = {c2}",
            terme(a1, "x", true),
            terme(b1, "y", false),
            terme(a2, "x", true),
            terme(b2, "y", false)
        );

        let tr = traiter(&texte, &reglages).unwrap_or_else(|| panic!("rien extrait: {texte:?}"));
        assert_eq!(tr.resultat.reponse(), format!("x = {x0}, y = {y0}"), "{texte}");
        vus += 1;
    }
    assert!(vus > 20, "trop peu de systèmes générés: {vus}");
}

#[test]
fn fuzz_safe_bruit_sans_panique() {
    let t0 = Instant::now();
    let max = Duration::from_millis(600);
    let mut rng = Rng::new(0xFEED_u64);
    let reglages = Reglages::default();

    for _ in 0..250 {
        budget(t0, max);

        let n = rng.pick(30) as usize;
        let s = gen_bruit(&mut rng, n);
        if let Some(tr) = traiter(&s, &reglages) {
            // contrat : succès <=> étapes, échec <=> motif
            match tr.resultat.confiance() {
                100 => assert!(!tr.resultat.etapes().is_empty(), "s={s:?}"),
                0 => {
                    assert!(tr.resultat.etapes().is_empty(), "s={s:?}");
                    assert!(!tr.resultat.reponse().is_empty(), "s={s:?}");
                }
                autre => panic!("confiance inattendue {autre} pour s={s:?}"),
            }
        }
    }
}
