//! Moteur de résolution exact (polynômes sur Q).
//!
//! Le solveur ne voit que le trait [`MoteurSymbolique`] : « résoudre une
//! équation pour une variable » et « résoudre un système ». [`MoteurExact`]
//! en est l’implémentation livrée :
//!
//! - une variable : degré 1, degré 2 (formule avec radicaux), degré ≥ 3 par
//!   racines rationnelles puis déflation jusqu’au second degré ;
//! - système linéaire : Gauss–Jordan sur les rationnels ;
//! - système non linéaire à deux inconnues : substitution depuis une équation
//!   linéaire en l’une d’elles, puis retour dans Q(√n).

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use super::erreur::ErreurNoyau;
use super::poly::{ppcm, Poly};
use super::radical::Radical;

/// Borne de recherche des diviseurs (racines rationnelles).
const MAX_DIVISEUR: u64 = 100_000;

/// Valeur d’une inconnue : nombre exact, ou expression des variables libres.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Racine {
    Exacte(Radical),
    Expression(Poly),
}

impl Racine {
    pub fn rationnelle(r: BigRational) -> Self {
        Racine::Exacte(Radical::rationnel(r))
    }

    pub fn en_radical(&self) -> Option<&Radical> {
        match self {
            Racine::Exacte(r) => Some(r),
            Racine::Expression(_) => None,
        }
    }
}

impl fmt::Display for Racine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Racine::Exacte(r) => write!(f, "{r}"),
            Racine::Expression(p) => write!(f, "{p}"),
        }
    }
}

/// Une solution de système : variable -> valeur (variables libres absentes).
pub type Affectation = BTreeMap<String, Racine>;

pub trait MoteurSymbolique {
    /// Racines (distinctes, croissantes) de `equation = 0` pour `variable`.
    fn resoudre(&self, equation: &Poly, variable: &str) -> Result<Vec<Racine>, ErreurNoyau>;

    /// Solutions de `equations[i] = 0` pour toutes les `variables`.
    /// Vide : système incompatible.
    fn resoudre_systeme(
        &self,
        equations: &[Poly],
        variables: &[String],
    ) -> Result<Vec<Affectation>, ErreurNoyau>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MoteurExact;

fn infinite() -> ErreurNoyau {
    ErreurNoyau::non_supporte("infinitely many solutions")
}

impl MoteurSymbolique for MoteurExact {
    fn resoudre(&self, equation: &Poly, variable: &str) -> Result<Vec<Racine>, ErreurNoyau> {
        if equation.est_zero() {
            return Err(infinite());
        }

        if let Some(coefs) = equation.univarie(variable) {
            let racines = resoudre_univarie(&coefs)?;
            return Ok(racines.into_iter().map(Racine::Exacte).collect());
        }

        // autres variables présentes : seulement le premier degré à coefficient constant
        let coefs = equation.coefficients_en(variable);
        match coefs.as_slice() {
            [_] => Err(ErreurNoyau::non_supporte(format!(
                "{variable} does not appear in the equation"
            ))),
            [c0, c1] => {
                let a = c1.en_constante().ok_or_else(|| {
                    ErreurNoyau::non_supporte(format!(
                        "the coefficient of {variable} depends on other variables"
                    ))
                })?;
                Ok(vec![Racine::Expression((-c0).mul_scalaire(&a.recip()))])
            }
            _ => Err(ErreurNoyau::non_supporte(
                "nonlinear equation in several variables",
            )),
        }
    }

    fn resoudre_systeme(
        &self,
        equations: &[Poly],
        variables: &[String],
    ) -> Result<Vec<Affectation>, ErreurNoyau> {
        // 0 = 0 : sans information ; c = 0 (c ≠ 0) : incompatible
        let mut utiles: Vec<&Poly> = Vec::new();
        for eq in equations {
            match eq.en_constante() {
                Some(c) if c.is_zero() => {}
                Some(_) => return Ok(Vec::new()),
                None => utiles.push(eq),
            }
        }
        if utiles.is_empty() {
            return Err(infinite());
        }

        if utiles.iter().all(|eq| eq.est_lineaire()) {
            return Ok(gauss_jordan(&utiles, variables));
        }

        match variables {
            [v] => racines_communes(&utiles, v),
            [_, _] => substitution(&utiles, variables),
            _ => Err(ErreurNoyau::non_supporte(
                "nonlinear systems with more than two unknowns",
            )),
        }
    }
}

/* ------------------------ Une variable ------------------------ */

/// Racines réelles exactes de Σ coefs[k]·x^k (distinctes, croissantes).
pub fn resoudre_univarie(coefs: &[BigRational]) -> Result<Vec<Radical>, ErreurNoyau> {
    let mut c: Vec<BigRational> = coefs.to_vec();
    while c.last().is_some_and(Zero::is_zero) {
        c.pop();
    }
    if c.is_empty() {
        return Err(infinite());
    }
    let degre_initial = c.len() - 1;

    let mut racines: Vec<Radical> = Vec::new();

    // facteur x^k
    if c.len() > 1 && c[0].is_zero() {
        racines.push(Radical::rationnel(BigRational::zero()));
        while c.len() > 1 && c[0].is_zero() {
            c.remove(0);
        }
    }

    while c.len() > 3 {
        let r = racine_rationnelle(&c)?.ok_or_else(|| {
            ErreurNoyau::non_supporte(format!(
                "no exact method for this degree {degre_initial} polynomial"
            ))
        })?;
        c = deflation(&c, &r);
        racines.push(Radical::rationnel(r));
    }

    // degré <= 2 ici
    match c.as_slice() {
        [c0, c1] => racines.push(Radical::rationnel(-c0 / c1)),
        [c0, c1, c2] => racines.extend(second_degre(c2, c1, c0)),
        _ => {}
    }

    racines.sort_by(|a, b| a.comparer(b));
    racines.dedup();
    Ok(racines)
}

/// ax² + bx + c = 0 (a ≠ 0)
fn second_degre(a: &BigRational, b: &BigRational, c: &BigRational) -> Vec<Radical> {
    let quatre = BigRational::from_integer(BigInt::from(4));
    let disc = b * b - quatre * a * c;
    let Some(s) = Radical::racine(&disc) else {
        return Vec::new();
    };

    let deux_a = a + a;
    let centre = -b / &deux_a;
    if disc.is_zero() {
        return vec![Radical::rationnel(centre)];
    }

    // (-b ± √disc) / 2a, avec √disc = s.a + s.b√n
    let branche = |signe: BigRational| {
        Radical::nouveau(
            &centre + &signe * &s.a / &deux_a,
            &signe * &s.b / &deux_a,
            s.n.clone(),
        )
    };
    vec![branche(-BigRational::one()), branche(BigRational::one())]
}

/// Première racine rationnelle p/q (p | a0, q | an), None s’il n’y en a pas.
fn racine_rationnelle(c: &[BigRational]) -> Result<Option<BigRational>, ErreurNoyau> {
    let denominateurs = c
        .iter()
        .fold(BigInt::one(), |acc, x| ppcm(&acc, x.denom()));
    let entiers: Vec<BigInt> = c
        .iter()
        .map(|x| (x * BigRational::from_integer(denominateurs.clone())).to_integer())
        .collect();

    let (Some(a0), Some(an)) = (entiers.first(), entiers.last()) else {
        return Ok(None);
    };
    let trop_grand = || ErreurNoyau::non_supporte("coefficients too large for an exact search");
    let ps = diviseurs(&a0.abs()).ok_or_else(trop_grand)?;
    let qs = diviseurs(&an.abs()).ok_or_else(trop_grand)?;

    for q in &qs {
        for p in &ps {
            for candidat in [
                BigRational::new(p.clone(), q.clone()),
                BigRational::new(-p.clone(), q.clone()),
            ] {
                if horner(c, &candidat).is_zero() {
                    return Ok(Some(candidat));
                }
            }
        }
    }
    Ok(None)
}

fn horner(c: &[BigRational], x: &BigRational) -> BigRational {
    c.iter()
        .rev()
        .fold(BigRational::zero(), |acc, k| acc * x + k)
}

/// c(x) / (x - r), c(r) == 0
fn deflation(c: &[BigRational], r: &BigRational) -> Vec<BigRational> {
    let d = c.len() - 1;
    let mut q = vec![BigRational::zero(); d];
    let mut acc = BigRational::zero();
    for k in (1..=d).rev() {
        acc = &c[k] + &acc * r;
        q[k - 1] = acc.clone();
    }
    q
}

/// Diviseurs positifs de n > 0 (None si la recherche dépasse la borne).
fn diviseurs(n: &BigInt) -> Option<Vec<BigInt>> {
    let mut petits = Vec::new();
    let mut grands = Vec::new();
    let mut i: u64 = 1;
    loop {
        let bi = BigInt::from(i);
        if &bi * &bi > *n {
            break;
        }
        if i > MAX_DIVISEUR {
            return None;
        }
        if (n % &bi).is_zero() {
            let autre = n / &bi;
            if autre != bi {
                grands.push(autre);
            }
            petits.push(bi);
        }
        i += 1;
    }
    petits.extend(grands.into_iter().rev());
    Some(petits)
}

/* ------------------------ Systèmes ------------------------ */

fn gauss_jordan(equations: &[&Poly], variables: &[String]) -> Vec<Affectation> {
    let nv = variables.len();

    // ligne : coefficients | second membre
    let mut m: Vec<Vec<BigRational>> = equations
        .iter()
        .map(|eq| {
            let mut ligne: Vec<BigRational> = variables
                .iter()
                .map(|v| eq.coefficient_lineaire(v))
                .collect();
            ligne.push(-eq.terme_constant());
            ligne
        })
        .collect();

    let mut pivots: Vec<(usize, usize)> = Vec::new();
    let mut ligne = 0;
    for col in 0..nv {
        let Some(p) = (ligne..m.len()).find(|&i| !m[i][col].is_zero()) else {
            continue;
        };
        m.swap(ligne, p);

        let piv = m[ligne][col].clone();
        for x in m[ligne].iter_mut() {
            *x /= &piv;
        }
        for i in 0..m.len() {
            if i == ligne || m[i][col].is_zero() {
                continue;
            }
            let f = m[i][col].clone();
            for j in 0..=nv {
                let delta = &f * &m[ligne][j];
                m[i][j] -= delta;
            }
        }
        pivots.push((ligne, col));
        ligne += 1;
        if ligne == m.len() {
            break;
        }
    }

    // 0 = c (c ≠ 0)
    if m[ligne..].iter().any(|l| !l[nv].is_zero()) {
        return Vec::new();
    }

    let colonnes_pivot: Vec<usize> = pivots.iter().map(|&(_, c)| c).collect();
    let mut aff = Affectation::new();
    for &(i, col) in &pivots {
        let mut valeur = Poly::constante(m[i][nv].clone());
        for j in (0..nv).filter(|j| !colonnes_pivot.contains(j)) {
            if !m[i][j].is_zero() {
                valeur = &valeur - &Poly::variable(&variables[j]).mul_scalaire(&m[i][j]);
            }
        }
        let racine = match valeur.en_constante() {
            Some(c) => Racine::rationnelle(c),
            None => Racine::Expression(valeur),
        };
        aff.insert(variables[col].clone(), racine);
    }
    vec![aff]
}

/// Une seule inconnue, équations non linéaires : racines de la première,
/// gardées si elles annulent toutes les autres.
fn racines_communes(equations: &[&Poly], v: &str) -> Result<Vec<Affectation>, ErreurNoyau> {
    let coefs = equations[0]
        .univarie(v)
        .ok_or_else(|| ErreurNoyau::non_supporte("unexpected variable in the system"))?;
    let mut out = Vec::new();
    for r in resoudre_univarie(&coefs)? {
        let mut valeurs = BTreeMap::new();
        valeurs.insert(v.to_string(), r);
        if verifie_tout(equations, &valeurs) {
            out.push(en_affectation(valeurs));
        }
    }
    Ok(out)
}

fn substitution(equations: &[&Poly], variables: &[String]) -> Result<Vec<Affectation>, ErreurNoyau> {
    // cherche une équation linéaire en une inconnue, à coefficient constant
    let mut choix = None;
    'recherche: for (i, eq) in equations.iter().enumerate() {
        for (k, v) in variables.iter().enumerate() {
            if eq.degre_en(v) != 1 {
                continue;
            }
            let c = eq.coefficients_en(v);
            if let Some(a) = c[1].en_constante() {
                let expr = (-&c[0]).mul_scalaire(&a.recip());
                choix = Some((i, k, expr));
                break 'recherche;
            }
        }
    }
    let (i, k, expr_v) = choix.ok_or_else(|| {
        ErreurNoyau::non_supporte("no equation is linear in one of the unknowns")
    })?;
    let v = &variables[k];
    let u = &variables[1 - k];
    tracing::debug!(variable = %v, valeur = %expr_v, "substitution");

    // première équation restante non triviale, en u seul
    let mut reduite = None;
    for (j, eq) in equations.iter().enumerate() {
        if j == i {
            continue;
        }
        let q = eq.substituer(v, &expr_v);
        match q.en_constante() {
            Some(c) if c.is_zero() => continue,
            Some(_) => return Ok(Vec::new()),
            None => {
                reduite = Some(q);
                break;
            }
        }
    }
    let reduite = reduite.ok_or_else(infinite)?;
    let coefs = reduite
        .univarie(u)
        .ok_or_else(|| ErreurNoyau::non_supporte("unexpected variable in the system"))?;

    let mut out = Vec::new();
    for ru in resoudre_univarie(&coefs)? {
        let mut valeurs = BTreeMap::new();
        valeurs.insert(u.clone(), ru);
        let Some(rv) = expr_v.evaluer(&valeurs) else {
            continue;
        };
        valeurs.insert(v.clone(), rv);
        if verifie_tout(equations, &valeurs) {
            out.push(en_affectation(valeurs));
        }
    }

    out.sort_by(|a, b| comparer_affectations(a, b, variables));
    Ok(out)
}

fn verifie_tout(equations: &[&Poly], valeurs: &BTreeMap<String, Radical>) -> bool {
    equations
        .iter()
        .all(|eq| eq.evaluer(valeurs).is_some_and(|r| r.est_zero()))
}

fn en_affectation(valeurs: BTreeMap<String, Radical>) -> Affectation {
    valeurs
        .into_iter()
        .map(|(v, r)| (v, Racine::Exacte(r)))
        .collect()
}

fn comparer_affectations(a: &Affectation, b: &Affectation, variables: &[String]) -> Ordering {
    for v in variables {
        let (Some(x), Some(y)) = (
            a.get(v).and_then(Racine::en_radical),
            b.get(v).and_then(Racine::en_radical),
        ) else {
            continue;
        };
        match x.comparer(y) {
            Ordering::Equal => continue,
            autre => return autre,
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::rpn::analyser;

    fn p(s: &str) -> Poly {
        Poly::depuis_expr(&analyser(s).unwrap()).unwrap()
    }

    fn racines(s: &str) -> Vec<String> {
        MoteurExact
            .resoudre(&p(s), "x")
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    fn systeme(eqs: &[&str]) -> Vec<String> {
        let polys: Vec<Poly> = eqs.iter().map(|s| p(s)).collect();
        let vars = vec!["x".to_string(), "y".to_string()];
        MoteurExact
            .resoudre_systeme(&polys, &vars)
            .unwrap()
            .iter()
            .map(|a| {
                a.iter()
                    .map(|(v, r)| format!("{v} = {r}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .collect()
    }

    #[test]
    fn premier_et_second_degre() {
        assert_eq!(racines("2x + 3 - 7"), ["2"]);
        assert_eq!(racines("x^2 - 4"), ["-2", "2"]);
        assert_eq!(racines("x^2 - 2"), ["-√2", "√2"]);
        assert_eq!(racines("x^2 + x - 1"), ["-1/2 - √5/2", "-1/2 + √5/2"]);
        assert_eq!(racines("x^2 - 2x + 1"), ["1"]);
        assert!(racines("x^2 + 1").is_empty());
    }

    #[test]
    fn degre_superieur() {
        assert_eq!(racines("x^3 - 6x^2 + 11x - 6"), ["1", "2", "3"]);
        assert_eq!(racines("x^3 - x"), ["-1", "0", "1"]);
        // (x - 1)(x² - 2)
        assert_eq!(racines("x^3 - x^2 - 2x + 2"), ["-√2", "1", "√2"]);
        let e = MoteurExact.resoudre(&p("x^3 - 2"), "x").unwrap_err();
        assert!(matches!(e, ErreurNoyau::NonSupporte(_)));
    }

    #[test]
    fn cas_limites() {
        assert_eq!(MoteurExact.resoudre(&p("x - x"), "x"), Err(infinite()));
        assert!(MoteurExact.resoudre(&p("5"), "x").unwrap().is_empty());
        // autre variable : expression
        let r = MoteurExact.resoudre(&p("2x + 3y - 7"), "x").unwrap();
        assert_eq!(r[0].to_string(), "-3y/2 + 7/2");
    }

    #[test]
    fn systemes_lineaires() {
        assert_eq!(systeme(&["x + y - 3", "x - y - 1"]), ["x = 2, y = 1"]);
        assert_eq!(systeme(&["2x + y - 5", "x - y - 1"]), ["x = 2, y = 1"]);
        assert!(systeme(&["x + y - 1", "x + y - 2"]).is_empty());
        assert_eq!(systeme(&["x + y - 3", "2x + 2y - 6"]), ["x = -y + 3"]);
    }

    #[test]
    fn systemes_non_lineaires() {
        assert_eq!(
            systeme(&["x + y - 3", "x*y - 2"]),
            ["x = 1, y = 2", "x = 2, y = 1"]
        );
        assert_eq!(
            systeme(&["x^2 + y^2 - 25", "x + y - 7"]),
            ["x = 3, y = 4", "x = 4, y = 3"]
        );
        assert!(systeme(&["x^2 + y^2 + 1", "x - y"]).is_empty());
    }

    #[test]
    fn diviseurs_bornes() {
        let d = diviseurs(&BigInt::from(12)).unwrap();
        let d: Vec<String> = d.iter().map(ToString::to_string).collect();
        assert_eq!(d, ["1", "2", "3", "4", "6", "12"]);
        assert!(diviseurs(&BigInt::from(10u64.pow(12)).pow(2)).is_none());
    }
}
