// src/noyau/format.rs

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use super::lecture::{rational_scaled, scaled_to_decimal, signed_scaled_to_decimal};

/* ------------------------ Helpers rationnels ------------------------ */

pub fn format_rat_pretty(r: &BigRational) -> String {
    let n = r.numer();
    let d = r.denom();
    if d.is_one() {
        format!("{n}")
    } else {
        format!("{n}/{d}")
    }
}

fn format_sqrt_of_int(n: &BigInt) -> String {
    format!("√{n}")
}

/// (p/q)*√n -> p√n/q ; √n/q si p=1 ; -√n/q si p=-1
fn format_mul_rat_sqrt(r: &BigRational, n: &BigInt) -> String {
    let p = r.numer();
    let q = r.denom();

    if p.is_zero() {
        return "0".to_string();
    }

    // p == 1
    if p == &BigInt::one() {
        if q.is_one() {
            return format_sqrt_of_int(n);
        }
        return format!("{}/{}", format_sqrt_of_int(n), q);
    }

    // p == -1
    if p == &BigInt::from(-1) {
        if q.is_one() {
            return format!("-{}", format_sqrt_of_int(n));
        }
        return format!("-{}/{}", format_sqrt_of_int(n), q);
    }

    // p entier quelconque
    if q.is_one() {
        return format!("{p}{}", format_sqrt_of_int(n));
    }
    format!("{p}{}/{}", format_sqrt_of_int(n), q)
}

/// a + b√n : "1/2 + √5/2", "-√2", "3 - 2√2"
pub fn format_radical(a: &BigRational, b: &BigRational, n: &BigInt) -> String {
    if b.is_zero() || n.is_one() {
        return format_rat_pretty(&(a + b * BigRational::from_integer(n.clone())));
    }
    if a.is_zero() {
        return format_mul_rat_sqrt(b, n);
    }
    let signe = if b.is_negative() { '-' } else { '+' };
    format!(
        "{} {signe} {}",
        format_rat_pretty(a),
        format_mul_rat_sqrt(&b.abs(), n)
    )
}

/* ------------------------ Décimal ------------------------ */

/// Arrondi à `decimales` chiffres (demi loin de zéro), zéros finaux retirés.
/// 2 -> "2" ; 1/3 -> "0.3333" ; -2.5 -> "-2.5"
pub fn format_arrondi(r: &BigRational, decimales: usize) -> String {
    let echelle = BigRational::from_integer(BigInt::from(10).pow(decimales as u32));
    let scaled = (r * &echelle).round().to_integer();
    let txt = scaled_to_decimal(scaled, decimales);
    nettoyer_zeros(txt)
}

fn nettoyer_zeros(txt: String) -> String {
    if !txt.contains('.') {
        return txt;
    }
    let t = txt.trim_end_matches('0').trim_end_matches('.');
    if t == "-0" {
        "0".to_string()
    } else {
        t.to_string()
    }
}

/// Lecture décimale tronquée : (texte, exacte ?)
/// exacte = le développement s’arrête avant `chiffres` décimales.
pub fn lecture_decimale(r: &BigRational, chiffres: usize) -> (String, bool) {
    let scaled = rational_scaled(r, chiffres);
    let echelle = BigRational::from_integer(BigInt::from(10).pow(chiffres as u32));
    let exacte = BigRational::new(scaled.clone(), BigInt::one()) == r * &echelle;
    // signe lu sur r : -1/3·10^-11 se tronque en 0
    let txt = signed_scaled_to_decimal(r.is_negative(), scaled, chiffres);
    if exacte {
        (nettoyer_zeros(txt), true)
    } else {
        (txt, false)
    }
}

/// Valeur exacte + lecture décimale : "12", "1/4 = 0.25", "1/3 ≈ 0.3333333333"
pub fn format_exact_et_decimal(r: &BigRational, chiffres: usize) -> String {
    let exact = format_rat_pretty(r);
    if r.denom().is_one() {
        return exact;
    }
    let (dec, exacte) = lecture_decimale(r, chiffres);
    let lien = if exacte { "=" } else { "≈" };
    format!("{exact} {lien} {dec}")
}

/// Entier tel quel, décimal fini en clair, sinon fraction + lecture :
/// "28", "0.75", "1/3 ≈ 0.3333333333"
pub fn format_valeur(r: &BigRational, chiffres: usize) -> String {
    if r.denom().is_one() {
        return format_rat_pretty(r);
    }
    match lecture_decimale(r, chiffres) {
        (dec, true) => dec,
        (dec, false) => format!("{} ≈ {dec}", format_rat_pretty(r)),
    }
}
