// src/noyau/lecture.rs
//
// Lecture décimale (tronquée) des valeurs exactes.
// Rien ici ne sert au calcul : uniquement à l’affichage "≈".

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use super::radical::Radical;

/* ------------------------ Décimal (scaled -> texte) ------------------------ */

fn pow10(n: usize) -> BigInt {
    BigInt::from(10).pow(n as u32)
}

/// Convertit un entier “scalé” (×10^digits) en texte décimal tronqué.
pub fn scaled_to_decimal(scaled: BigInt, digits: usize) -> String {
    signed_scaled_to_decimal(scaled.is_negative(), scaled, digits)
}

/// Comme `scaled_to_decimal`, signe donné à part : -1/3·10^-10 tronqué
/// vaut 0 mais s’écrit "-0.0000000000".
pub fn signed_scaled_to_decimal(neg: bool, scaled: BigInt, digits: usize) -> String {
    let scaled = scaled.abs();

    let scale = pow10(digits);
    let int_part = &scaled / &scale;
    let frac_part = &scaled % &scale;

    if digits == 0 {
        return if neg {
            format!("-{int_part}")
        } else {
            format!("{int_part}")
        };
    }

    let mut frac = frac_part.to_str_radix(10);
    while frac.len() < digits {
        frac.insert(0, '0');
    }

    if neg {
        format!("-{int_part}.{frac}")
    } else {
        format!("{int_part}.{frac}")
    }
}

/// r -> entier “scalé” = r * 10^digits tronqué vers zéro
pub fn rational_scaled(r: &BigRational, digits: usize) -> BigInt {
    let scale = pow10(digits);
    (r.numer() * scale) / r.denom()
}

/* ------------------------ √ en lecture (approx scalée) ------------------------ */

/// sqrt(r) en entier scalé : floor( sqrt(r) * 10^digits )
/// r = n/d
fn rational_sqrt_scaled(r: &BigRational, digits: usize) -> BigInt {
    let n = r.numer().clone();
    let d = r.denom().clone();

    if n.is_zero() || n.is_negative() {
        return BigInt::zero();
    }

    // On veut y ≈ sqrt(n/d) * 10^digits
    // => y^2 ≈ (n * 10^(2*digits)) / d
    let target = n * pow10(2 * digits);

    let mut y = pow10(digits);
    if y.is_zero() {
        y = BigInt::one();
    }

    // Newton sur y pour sqrt(target/d)
    loop {
        let denom = &d * &y;
        if denom.is_zero() {
            break;
        }

        let q = &target / denom;
        let y_next = (&y + q) >> 1;

        if y_next == y || y_next == (&y - 1u32) || y_next == (&y + 1u32) {
            // ajustement final (floor)
            let mut y_adj = y_next;

            while (&y_adj + 1u32) * (&y_adj + 1u32) * &d <= target {
                y_adj += 1u32;
            }
            while &y_adj * &y_adj * &d > target {
                y_adj -= 1u32;
            }
            return y_adj;
        }

        y = y_next;
    }

    y
}

/// a + b√n en entier scalé (erreur ≤ 1 sur le dernier chiffre).
pub fn radical_scaled(x: &Radical, digits: usize) -> BigInt {
    let a = rational_scaled(&x.a, digits);
    if x.b.is_zero() {
        return a;
    }
    // |b|√n = √(b²n)
    let b2n = &x.b * &x.b * BigRational::from_integer(x.n.clone());
    let s = rational_sqrt_scaled(&b2n, digits);
    if x.b.is_negative() {
        a - s
    } else {
        a + s
    }
}

/// Lecture décimale d’un radical : "1.4142135623".
pub fn lecture_radical(x: &Radical, digits: usize) -> String {
    let neg = x.signe() == std::cmp::Ordering::Less;
    signed_scaled_to_decimal(neg, radical_scaled(x, digits), digits)
}
