//! Nombres de Q(√n) : a + b·√n, a et b rationnels, n entier sans facteur carré.
//!
//! Sert aux racines des équations du second degré et à la substitution
//! arrière dans les systèmes non linéaires (évaluer un polynôme en une racine).

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use std::cmp::Ordering;
use std::fmt;

use super::format::format_radical;

/// Borne de l’essai par diviseurs (au-delà, √ reste partiellement simplifiée).
const MAX_DIVISEUR_ESSAI: u64 = 100_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Radical {
    pub a: BigRational,
    pub b: BigRational,
    /// 1 si le nombre est rationnel (alors b == 0).
    pub n: BigInt,
}

impl Radical {
    pub fn rationnel(a: BigRational) -> Self {
        Radical {
            a,
            b: BigRational::zero(),
            n: BigInt::one(),
        }
    }

    /// a + b√n, normalisé (carrés extraits de n, n == 1 replié dans a).
    pub fn nouveau(a: BigRational, b: BigRational, n: BigInt) -> Self {
        if b.is_zero() || n.is_zero() {
            return Radical::rationnel(a);
        }
        let (s, t) = extrait_carre_parfait(&n);
        let b = b * BigRational::from_integer(s);
        if t.is_one() {
            return Radical::rationnel(a + b);
        }
        Radical { a, b, n: t }
    }

    /// √r (r ≥ 0) sous forme c·√n.
    pub fn racine(r: &BigRational) -> Option<Self> {
        if r.is_negative() {
            return None;
        }
        // √(p/q) = √(p·q)/q
        let q = r.denom().clone();
        let pq = r.numer() * &q;
        Some(Radical::nouveau(
            BigRational::zero(),
            BigRational::new(BigInt::one(), q),
            pq,
        ))
    }

    pub fn est_rationnel(&self) -> bool {
        self.b.is_zero()
    }

    pub fn en_rationnel(&self) -> Option<&BigRational> {
        self.est_rationnel().then_some(&self.a)
    }

    pub fn est_zero(&self) -> bool {
        self.a.is_zero() && self.b.is_zero()
    }

    /// Radicande commun de deux opérandes (None si incompatibles : √2 et √3).
    fn radicande_commun(&self, autre: &Radical) -> Option<BigInt> {
        match (self.est_rationnel(), autre.est_rationnel()) {
            (true, true) => Some(BigInt::one()),
            (true, false) => Some(autre.n.clone()),
            (false, true) => Some(self.n.clone()),
            (false, false) => (self.n == autre.n).then(|| self.n.clone()),
        }
    }

    pub fn ajouter(&self, autre: &Radical) -> Option<Radical> {
        let n = self.radicande_commun(autre)?;
        Some(Radical::nouveau(
            &self.a + &autre.a,
            &self.b + &autre.b,
            n,
        ))
    }

    pub fn multiplier(&self, autre: &Radical) -> Option<Radical> {
        let n = self.radicande_commun(autre)?;
        let nr = BigRational::from_integer(n.clone());
        // (a + b√n)(c + d√n) = ac + bd·n + (ad + bc)√n
        let a = &self.a * &autre.a + &self.b * &autre.b * nr;
        let b = &self.a * &autre.b + &self.b * &autre.a;
        Some(Radical::nouveau(a, b, n))
    }

    pub fn oppose(&self) -> Radical {
        Radical {
            a: -self.a.clone(),
            b: -self.b.clone(),
            n: self.n.clone(),
        }
    }

    /// Signe exact de a + b√n.
    pub fn signe(&self) -> Ordering {
        let sa = self.a.cmp(&BigRational::zero());
        let sb = self.b.cmp(&BigRational::zero());
        if sb == Ordering::Equal {
            return sa;
        }
        if sa == Ordering::Equal || sa == sb {
            return sb;
        }
        // signes opposés : comparer a² et b²·n
        let a2 = &self.a * &self.a;
        let b2n = &self.b * &self.b * BigRational::from_integer(self.n.clone());
        match a2.cmp(&b2n) {
            Ordering::Greater => sa,
            Ordering::Less => sb,
            Ordering::Equal => Ordering::Equal,
        }
    }

    /// Comparaison exacte (radicandes différents : via f64, suffisant pour trier).
    pub fn comparer(&self, autre: &Radical) -> Ordering {
        match self.ajouter(&autre.oppose()) {
            Some(diff) => diff.signe(),
            None => self
                .approx()
                .partial_cmp(&autre.approx())
                .unwrap_or(Ordering::Equal),
        }
    }

    /// Lecture flottante (affichage "≈" seulement).
    pub fn approx(&self) -> f64 {
        let a = ratio_f64(&self.a);
        let b = ratio_f64(&self.b);
        let n = self.n.to_string().parse::<f64>().unwrap_or(f64::NAN);
        a + b * n.sqrt()
    }
}

fn ratio_f64(r: &BigRational) -> f64 {
    let n = r.numer().to_string().parse::<f64>().unwrap_or(f64::NAN);
    let d = r.denom().to_string().parse::<f64>().unwrap_or(f64::NAN);
    n / d
}

impl fmt::Display for Radical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_radical(&self.a, &self.b, &self.n))
    }
}

/// Décompose n en n = s^2 * t (signe porté par t), essais bornés.
pub(crate) fn extrait_carre_parfait(n: &BigInt) -> (BigInt, BigInt) {
    if n.is_zero() {
        return (BigInt::zero(), BigInt::zero());
    }
    let neg = n.is_negative();
    let mut reste = n.abs();
    let mut s = BigInt::one();

    // Essai par p = 2 puis impairs.
    let mut p: u64 = 2;
    while p <= MAX_DIVISEUR_ESSAI {
        let pb = BigInt::from(p);
        let p2 = &pb * &pb;
        if p2 > reste {
            break;
        }
        while (&reste % &p2).is_zero() {
            reste /= &p2;
            s *= &pb;
        }
        p = if p == 2 { 3 } else { p + 2 };
    }

    if neg {
        reste = -reste;
    }
    (s, reste)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(n: i64, d: i64) -> BigRational {
        BigRational::new(n.into(), d.into())
    }

    #[test]
    fn racines_simplifiees() {
        let huit = Radical::racine(&r(8, 1)).unwrap();
        assert_eq!(huit.to_string(), "2√2");
        let demi = Radical::racine(&r(1, 2)).unwrap();
        assert_eq!(demi.to_string(), "√2/2");
        let neuf = Radical::racine(&r(9, 4)).unwrap();
        assert!(neuf.est_rationnel());
        assert_eq!(neuf.to_string(), "3/2");
        assert!(Radical::racine(&r(-1, 1)).is_none());
    }

    #[test]
    fn arithmetique_dans_q_racine_n() {
        // (1 + √2)(1 - √2) = -1
        let p = Radical::nouveau(r(1, 1), r(1, 1), 2.into());
        let m = Radical::nouveau(r(1, 1), r(-1, 1), 2.into());
        let prod = p.multiplier(&m).unwrap();
        assert_eq!(prod, Radical::rationnel(r(-1, 1)));
        // √2 + √3 : hors de Q(√n)
        let s3 = Radical::racine(&r(3, 1)).unwrap();
        assert!(p.ajouter(&s3).is_none());
    }

    #[test]
    fn signe_exact() {
        // 1 - √2 < 0 ; 2 - √2 > 0
        assert_eq!(Radical::nouveau(r(1, 1), r(-1, 1), 2.into()).signe(), Ordering::Less);
        assert_eq!(Radical::nouveau(r(2, 1), r(-1, 1), 2.into()).signe(), Ordering::Greater);
        let a = Radical::nouveau(r(1, 1), r(-1, 1), 2.into());
        let b = Radical::nouveau(r(1, 1), r(1, 1), 2.into());
        assert_eq!(a.comparer(&b), Ordering::Less);
    }

    #[test]
    fn carres_extraits() {
        assert_eq!(extrait_carre_parfait(&BigInt::from(72)), (6.into(), 2.into()));
        assert_eq!(extrait_carre_parfait(&BigInt::from(-12)), (2.into(), (-3).into()));
    }
}
