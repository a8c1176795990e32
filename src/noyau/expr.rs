// src/noyau/expr.rs
//
// AST exact (sans flottants), tel que lu par rpn.rs.
// - Rat : rationnel exact
// - Var : variable symbolique (x, y, z...)
// - Neg : moins unaire
//
// L’algèbre (développement, résolution) ne vit PAS ici : voir poly.rs.
// L’AST sert à la lecture et à l’affichage de l’équation interprétée.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use std::collections::BTreeSet;
use std::fmt;

/// Au-delà, une puissance constante n’est pas calculée (|n| borné).
pub const MAX_EXPOSANT: i64 = 10_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Rat(BigRational),
    Var(String),

    Neg(Box<Expr>),
    Sqrt(Box<Expr>),        // √(x)
    PowInt(Box<Expr>, i64), // x^n (n entier)

    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Valeur exacte si l’expression ne contient aucune variable.
    /// None : variable présente, division par zéro, √ non rationnelle, exposant hors bornes.
    pub fn constante(&self) -> Option<BigRational> {
        use Expr::*;
        match self {
            Rat(r) => Some(r.clone()),
            Var(_) => None,
            Neg(x) => x.constante().map(|r| -r),
            Sqrt(x) => rational_sqrt_exact(&x.constante()?),
            PowInt(x, n) => {
                let b = x.constante()?;
                if n.unsigned_abs() > MAX_EXPOSANT as u64 || (b.is_zero() && *n < 0) {
                    return None;
                }
                Some(rational_pow_int(b, *n))
            }
            Add(a, b) => Some(a.constante()? + b.constante()?),
            Sub(a, b) => Some(a.constante()? - b.constante()?),
            Mul(a, b) => Some(a.constante()? * b.constante()?),
            Div(a, b) => {
                let d = b.constante()?;
                if d.is_zero() {
                    return None;
                }
                Some(a.constante()? / d)
            }
        }
    }

    /// Noms des variables présentes (ordre alphabétique).
    pub fn variables(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        let mut pile: Vec<&Expr> = vec![self];
        while let Some(e) = pile.pop() {
            match e {
                Expr::Var(v) => {
                    out.insert(v.clone());
                }
                Expr::Rat(_) => {}
                Expr::Neg(x) | Expr::Sqrt(x) | Expr::PowInt(x, _) => pile.push(x),
                Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) | Expr::Div(a, b) => {
                    pile.push(a);
                    pile.push(b);
                }
            }
        }
        out
    }

    /// Niveau de priorité pour l’affichage (plus grand = lie plus fort).
    fn niveau(&self) -> u8 {
        use Expr::*;
        match self {
            Add(_, _) | Sub(_, _) => 1,
            Mul(_, _) | Div(_, _) => 2,
            Neg(_) => 3,
            PowInt(_, _) => 4,
            Rat(r) if r.is_negative() || !r.denom().is_one() => 2,
            Rat(_) | Var(_) | Sqrt(_) => 5,
        }
    }

    /// "2x", "3x^2" : coefficient rationnel positif collé à une variable (ou sa puissance).
    fn produit_colle(a: &Expr, b: &Expr) -> bool {
        let coeff_simple = matches!(a, Expr::Rat(r) if r.is_positive() && r.denom().is_one());
        let variable = match b {
            Expr::Var(_) => true,
            Expr::PowInt(x, _) => matches!(x.as_ref(), Expr::Var(_)),
            _ => false,
        };
        coeff_simple && variable
    }
}

/* ------------------------ Affichage (priorités, parenthèses minimales) ------------------------ */

struct Entre<'a>(&'a Expr, bool);

impl fmt::Display for Entre<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.1 {
            write!(f, "({})", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Expr::*;
        match self {
            Rat(r) => {
                let n = r.numer();
                let d = r.denom();
                if d.is_one() {
                    write!(f, "{n}")
                } else {
                    write!(f, "{n}/{d}")
                }
            }
            Var(s) => write!(f, "{s}"),
            Neg(x) => write!(f, "-{}", Entre(x, x.niveau() < 3)),
            Sqrt(x) => write!(f, "√({x})"),
            PowInt(x, n) => write!(f, "{}^{n}", Entre(x, x.niveau() < 5)),
            Add(a, b) => write!(f, "{a} + {}", Entre(b, matches!(b.as_ref(), Neg(_)))),
            Sub(a, b) => write!(f, "{a} - {}", Entre(b, b.niveau() <= 1 || matches!(b.as_ref(), Neg(_)))),
            Mul(a, b) => {
                if Expr::produit_colle(a, b) {
                    return write!(f, "{a}{b}");
                }
                write!(f, "{}*{}", Entre(a, a.niveau() < 2), Entre(b, b.niveau() <= 3))
            }
            Div(a, b) => write!(f, "{}/{}", Entre(a, a.niveau() < 2), Entre(b, b.niveau() <= 3)),
        }
    }
}

/* ------------------------ Outils rationnels (partagés avec poly.rs / radical.rs) ------------------------ */

pub(crate) fn rational_pow_int(base: BigRational, exp: i64) -> BigRational {
    if exp == 0 {
        return BigRational::one();
    }
    if exp < 0 {
        let pos = rational_pow_int(base, exp.saturating_neg());
        return BigRational::one() / pos;
    }

    let mut e = exp as u64;
    let mut acc = BigRational::one();
    let mut b = base;

    while e > 0 {
        if (e & 1) == 1 {
            acc *= b.clone();
        }
        e >>= 1;
        if e > 0 {
            b *= b.clone();
        }
    }
    acc
}

pub(crate) fn rational_sqrt_exact(r: &BigRational) -> Option<BigRational> {
    if r.is_negative() {
        return None;
    }
    let n = r.numer();
    let d = r.denom();
    let sn = int_sqrt_exact(n)?;
    let sd = int_sqrt_exact(d)?;
    Some(BigRational::new(sn, sd))
}

fn int_sqrt_exact(x: &BigInt) -> Option<BigInt> {
    if x.is_negative() {
        return None;
    }
    let s = int_sqrt_floor(x);
    if &s * &s == *x {
        Some(s)
    } else {
        None
    }
}

pub(crate) fn int_sqrt_floor(x: &BigInt) -> BigInt {
    if x.is_zero() || x.is_negative() {
        return BigInt::zero();
    }

    let mut y = approx_sqrt_start(x);
    loop {
        let y_next = (&y + (x / &y)) >> 1;
        if y_next >= y {
            let mut z = y_next;
            while (&z + 1u32) * (&z + 1u32) <= *x {
                z += 1u32;
            }
            while &z * &z > *x {
                z -= 1u32;
            }
            return z;
        }
        y = y_next;
    }
}

fn approx_sqrt_start(x: &BigInt) -> BigInt {
    let bits = x.bits();
    let half = bits.div_ceil(2);
    BigInt::one() << half
}
