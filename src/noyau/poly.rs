// src/noyau/poly.rs
//
// Polynômes à plusieurs variables, coefficients rationnels exacts.
//
// - construits depuis l’AST (Poly::depuis_expr) : + - *, division par une
//   constante non nulle, puissances entières >= 0, √ d’un carré parfait
// - forme normale : aucun coefficient nul stocké (Poly::zero() == termes vides)
// - affichage "2x^2 + 3xy - 4" (degré total décroissant, x avant y)

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use super::erreur::ErreurNoyau;
use super::expr::{rational_pow_int, rational_sqrt_exact, Expr, MAX_EXPOSANT};
use super::format::format_rat_pretty;
use super::radical::Radical;

/// Degré total maximal d’un polynôme construit depuis le texte.
pub const MAX_DEGRE: u32 = 64;

fn degre_trop_haut(degre: impl fmt::Display) -> ErreurNoyau {
    ErreurNoyau::non_supporte(format!("degree {degre} is too high (limit {MAX_DEGRE})"))
}

/// variable -> exposant (> 0)
pub type Monome = BTreeMap<String, u32>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Poly {
    termes: BTreeMap<Monome, BigRational>,
}

impl Poly {
    pub fn zero() -> Self {
        Poly::default()
    }

    pub fn constante(c: BigRational) -> Self {
        let mut p = Poly::zero();
        p.ajouter_terme(Monome::new(), c);
        p
    }

    pub fn variable(nom: &str) -> Self {
        let mut m = Monome::new();
        m.insert(nom.to_string(), 1);
        let mut p = Poly::zero();
        p.ajouter_terme(m, BigRational::one());
        p
    }

    fn ajouter_terme(&mut self, m: Monome, c: BigRational) {
        if c.is_zero() {
            return;
        }
        let somme = match self.termes.remove(&m) {
            Some(ancien) => ancien + c,
            None => c,
        };
        if !somme.is_zero() {
            self.termes.insert(m, somme);
        }
    }

    pub fn est_zero(&self) -> bool {
        self.termes.is_empty()
    }

    /// Valeur si le polynôme ne dépend d’aucune variable (0 compris).
    pub fn en_constante(&self) -> Option<BigRational> {
        match self.termes.len() {
            0 => Some(BigRational::zero()),
            1 => self.termes.get(&Monome::new()).cloned(),
            _ => None,
        }
    }

    pub fn variables(&self) -> BTreeSet<String> {
        self.termes
            .keys()
            .flat_map(|m| m.keys().cloned())
            .collect()
    }

    pub fn degre_en(&self, v: &str) -> u32 {
        self.termes
            .keys()
            .filter_map(|m| m.get(v).copied())
            .max()
            .unwrap_or(0)
    }

    pub fn degre_total(&self) -> u32 {
        self.termes
            .keys()
            .map(|m| m.values().fold(0u32, |acc, k| acc.saturating_add(*k)))
            .max()
            .unwrap_or(0)
    }

    pub fn est_lineaire(&self) -> bool {
        self.degre_total() <= 1
    }

    /// Coefficient de la variable `v` dans un polynôme linéaire (constante sinon 0).
    pub fn coefficient_lineaire(&self, v: &str) -> BigRational {
        let mut m = Monome::new();
        m.insert(v.to_string(), 1);
        self.termes.get(&m).cloned().unwrap_or_else(BigRational::zero)
    }

    /// Terme constant.
    pub fn terme_constant(&self) -> BigRational {
        self.termes
            .get(&Monome::new())
            .cloned()
            .unwrap_or_else(BigRational::zero)
    }

    /// p = Σ c_k(autres variables) · v^k ; renvoie [c_0, c_1, ...].
    pub fn coefficients_en(&self, v: &str) -> Vec<Poly> {
        let d = self.degre_en(v) as usize;
        let mut out = vec![Poly::zero(); d + 1];
        for (m, c) in &self.termes {
            let mut reste = m.clone();
            let k = reste.remove(v).unwrap_or(0) as usize;
            out[k].ajouter_terme(reste, c.clone());
        }
        out
    }

    /// Coefficients rationnels si `v` est la seule variable (ou aucune).
    pub fn univarie(&self, v: &str) -> Option<Vec<BigRational>> {
        self.coefficients_en(v)
            .iter()
            .map(Poly::en_constante)
            .collect()
    }

    pub fn mul_scalaire(&self, k: &BigRational) -> Poly {
        let mut out = Poly::zero();
        for (m, c) in &self.termes {
            out.ajouter_terme(m.clone(), c * k);
        }
        out
    }

    pub fn puissance(&self, n: u32) -> Poly {
        let mut acc = Poly::constante(BigRational::one());
        for _ in 0..n {
            acc = &acc * self;
        }
        acc
    }

    /// Remplace `v` par le polynôme `par`.
    pub fn substituer(&self, v: &str, par: &Poly) -> Poly {
        let mut out = Poly::zero();
        for (m, c) in &self.termes {
            let mut reste = m.clone();
            let k = reste.remove(v).unwrap_or(0);
            let mut base = Poly::zero();
            base.ajouter_terme(reste, c.clone());
            out = &out + &(&base * &par.puissance(k));
        }
        out
    }

    /// Valeur exacte dans Q(√n). None : variable sans valeur, radicandes incompatibles.
    pub fn evaluer(&self, valeurs: &BTreeMap<String, Radical>) -> Option<Radical> {
        let mut somme = Radical::rationnel(BigRational::zero());
        for (m, c) in &self.termes {
            let mut terme = Radical::rationnel(c.clone());
            for (v, k) in m {
                let x = valeurs.get(v)?;
                for _ in 0..*k {
                    terme = terme.multiplier(x)?;
                }
            }
            somme = somme.ajouter(&terme)?;
        }
        Some(somme)
    }

    /// AST -> polynôme.
    pub fn depuis_expr(e: &Expr) -> Result<Poly, ErreurNoyau> {
        match e {
            Expr::Rat(r) => Ok(Poly::constante(r.clone())),
            Expr::Var(v) => Ok(Poly::variable(v)),
            Expr::Neg(x) => Ok(-&Poly::depuis_expr(x)?),
            Expr::Add(a, b) => Ok(&Poly::depuis_expr(a)? + &Poly::depuis_expr(b)?),
            Expr::Sub(a, b) => Ok(&Poly::depuis_expr(a)? - &Poly::depuis_expr(b)?),
            Expr::Mul(a, b) => {
                let (pa, pb) = (Poly::depuis_expr(a)?, Poly::depuis_expr(b)?);
                // deg(a·b) = deg(a) + deg(b) : borné avant de développer
                let degre = pa.degre_total() + pb.degre_total();
                if degre > MAX_DEGRE {
                    return Err(degre_trop_haut(degre));
                }
                Ok(&pa * &pb)
            }
            Expr::Div(a, b) => {
                let d = Poly::depuis_expr(b)?;
                let c = d.en_constante().ok_or_else(|| {
                    ErreurNoyau::non_supporte("division by an expression containing a variable")
                })?;
                if c.is_zero() {
                    return Err(ErreurNoyau::division_par_zero());
                }
                Ok(Poly::depuis_expr(a)?.mul_scalaire(&c.recip()))
            }
            Expr::Sqrt(x) => {
                let p = Poly::depuis_expr(x)?;
                let c = p
                    .en_constante()
                    .ok_or_else(|| ErreurNoyau::non_supporte("square root of a variable"))?;
                rational_sqrt_exact(&c).map(Poly::constante).ok_or_else(|| {
                    ErreurNoyau::non_supporte(format!(
                        "√{} is not a rational number",
                        format_rat_pretty(&c)
                    ))
                })
            }
            Expr::PowInt(x, n) => {
                let p = Poly::depuis_expr(x)?;
                if let Some(c) = p.en_constante() {
                    if c.is_zero() && *n < 0 {
                        return Err(ErreurNoyau::division_par_zero());
                    }
                    if n.unsigned_abs() > MAX_EXPOSANT as u64 {
                        return Err(ErreurNoyau::arithmetique("exponent too large"));
                    }
                    return Ok(Poly::constante(rational_pow_int(c, *n)));
                }
                if *n < 0 {
                    return Err(ErreurNoyau::non_supporte("negative power of a variable"));
                }
                // deg(p^n) = n·deg(p) : (x^64)^64 est refusé ici, pas après
                let degre = i64::from(p.degre_total()).saturating_mul(*n);
                if degre > i64::from(MAX_DEGRE) {
                    return Err(degre_trop_haut(degre));
                }
                Ok(p.puissance(*n as u32))
            }
        }
    }
}

/* ------------------------ Opérateurs ------------------------ */

impl Add for &Poly {
    type Output = Poly;
    fn add(self, autre: &Poly) -> Poly {
        let mut out = self.clone();
        for (m, c) in &autre.termes {
            out.ajouter_terme(m.clone(), c.clone());
        }
        out
    }
}

impl Sub for &Poly {
    type Output = Poly;
    fn sub(self, autre: &Poly) -> Poly {
        self + &(-autre)
    }
}

impl Neg for &Poly {
    type Output = Poly;
    fn neg(self) -> Poly {
        self.mul_scalaire(&-BigRational::one())
    }
}

impl Mul for &Poly {
    type Output = Poly;
    fn mul(self, autre: &Poly) -> Poly {
        let mut out = Poly::zero();
        for (m1, c1) in &self.termes {
            for (m2, c2) in &autre.termes {
                let mut m = m1.clone();
                for (v, k) in m2 {
                    let e = m.entry(v.clone()).or_insert(0);
                    *e = e.saturating_add(*k);
                }
                out.ajouter_terme(m, c1 * c2);
            }
        }
        out
    }
}

/* ------------------------ Affichage ------------------------ */

fn format_monome(m: &Monome) -> String {
    m.iter()
        .map(|(v, k)| if *k == 1 { v.clone() } else { format!("{v}^{k}") })
        .collect()
}

/// |c|·m : "x", "3x", "x/2", "3xy/2", "7"
fn format_terme(c: &BigRational, m: &Monome) -> String {
    let c = c.abs();
    if m.is_empty() {
        return format_rat_pretty(&c);
    }
    let mon = format_monome(m);
    let p = c.numer();
    let q = c.denom();
    match (p.is_one(), q.is_one()) {
        (true, true) => mon,
        (false, true) => format!("{p}{mon}"),
        (true, false) => format!("{mon}/{q}"),
        (false, false) => format!("{p}{mon}/{q}"),
    }
}

impl Poly {
    /// Termes dans l’ordre d’affichage.
    fn termes_ordonnes(&self) -> Vec<(&Monome, &BigRational)> {
        let vars: Vec<String> = self.variables().into_iter().collect();
        let cle = |m: &Monome| -> (u32, Vec<u32>) {
            let degre = m.values().fold(0u32, |acc, k| acc.saturating_add(*k));
            let exps = vars.iter().map(|v| m.get(v).copied().unwrap_or(0)).collect();
            (degre, exps)
        };
        let mut t: Vec<_> = self.termes.iter().collect();
        t.sort_by(|(a, _), (b, _)| {
            let (da, ea) = cle(a);
            let (db, eb) = cle(b);
            db.cmp(&da).then_with(|| eb.cmp(&ea))
        });
        t
    }
}

impl fmt::Display for Poly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.est_zero() {
            return f.write_str("0");
        }
        for (i, (m, c)) in self.termes_ordonnes().into_iter().enumerate() {
            let neg = c.is_negative();
            match (i, neg) {
                (0, true) => f.write_str("-")?,
                (0, false) => {}
                (_, true) => f.write_str(" - ")?,
                (_, false) => f.write_str(" + ")?,
            }
            f.write_str(&format_terme(c, m))?;
        }
        Ok(())
    }
}

/* ------------------------ Arithmétique entière (racines rationnelles) ------------------------ */

pub(crate) fn pgcd(a: &BigInt, b: &BigInt) -> BigInt {
    let mut a = a.abs();
    let mut b = b.abs();
    while !b.is_zero() {
        let r = &a % &b;
        a = b;
        b = r;
    }
    a
}

pub(crate) fn ppcm(a: &BigInt, b: &BigInt) -> BigInt {
    if a.is_zero() || b.is_zero() {
        return BigInt::zero();
    }
    (a * b).abs() / pgcd(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::rpn::analyser;

    fn p(s: &str) -> Poly {
        Poly::depuis_expr(&analyser(s).unwrap()).unwrap()
    }

    fn r(n: i64, d: i64) -> BigRational {
        BigRational::new(n.into(), d.into())
    }

    #[test]
    fn developpement() {
        assert_eq!(p("(x+1)(x-1)").to_string(), "x^2 - 1");
        assert_eq!(p("(x+y)^2").to_string(), "x^2 + 2xy + y^2");
        assert_eq!(p("2x + 3 - 7").to_string(), "2x - 4");
        assert_eq!(p("x/2 - 3x/2").to_string(), "-x");
        assert_eq!(p("x - x").to_string(), "0");
    }

    #[test]
    fn divisions_et_racines() {
        assert_eq!(p("(4x+2)/2").to_string(), "2x + 1");
        assert_eq!(p("sqrt(9)x").to_string(), "3x");
        assert_eq!(p("x/3").to_string(), "x/3");

        let e = analyser("1/(x+1)").unwrap();
        assert!(matches!(Poly::depuis_expr(&e), Err(ErreurNoyau::NonSupporte(_))));
        let e = analyser("x/0").unwrap();
        assert_eq!(Poly::depuis_expr(&e), Err(ErreurNoyau::division_par_zero()));
        let e = analyser("sqrt(2)x").unwrap();
        assert!(Poly::depuis_expr(&e).is_err());
        let e = analyser("x^-2").unwrap();
        assert!(Poly::depuis_expr(&e).is_err());
    }

    #[test]
    fn coefficients_et_degres() {
        let q = p("3x^2 - 2x*y + 5");
        assert_eq!(q.degre_en("x"), 2);
        assert_eq!(q.degre_en("y"), 1);
        assert_eq!(q.degre_total(), 2);
        let c = q.coefficients_en("x");
        assert_eq!(c[0].to_string(), "5");
        assert_eq!(c[1].to_string(), "-2y");
        assert_eq!(c[2].to_string(), "3");
        assert_eq!(q.univarie("x"), None);
        assert_eq!(p("x^2 - 4").univarie("x"), Some(vec![r(-4, 1), r(0, 1), r(1, 1)]));
    }

    #[test]
    fn substitution_et_evaluation() {
        // x = 3 - y dans x*y
        let q = p("x*y").substituer("x", &p("3 - y"));
        assert_eq!(q.to_string(), "-y^2 + 3y");

        let mut valeurs = BTreeMap::new();
        valeurs.insert("x".to_string(), Radical::racine(&r(2, 1)).unwrap());
        assert_eq!(p("x^2 - 2").evaluer(&valeurs), Some(Radical::rationnel(r(0, 1))));
        assert_eq!(p("y").evaluer(&valeurs), None);
    }

    #[test]
    fn degre_borne_sur_le_resultat() {
        assert_eq!(p("(x^8)^8").degre_total(), 64);
        assert_eq!(p("(x^32)(y^32)").degre_total(), 64);
        for s in [
            "(x^8)^9",
            "x^64 * x",
            "(x^2 + 1)^40",
            "(((x^64)^64)^64)^64",
            "((((((x^64)^64)^64)^64)^64)^64)",
        ] {
            let e = analyser(s).unwrap();
            assert!(
                matches!(Poly::depuis_expr(&e), Err(ErreurNoyau::NonSupporte(_))),
                "s={s}"
            );
        }
    }

    #[test]
    fn pgcd_ppcm() {
        assert_eq!(pgcd(&BigInt::from(12), &BigInt::from(-18)), BigInt::from(6));
        assert_eq!(ppcm(&BigInt::from(4), &BigInt::from(6)), BigInt::from(12));
    }
}
