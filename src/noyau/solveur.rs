// src/noyau/solveur.rs
//
// Adaptateur de résolution : un ProblemeExtrait -> un Resultat (avec étapes).
//
// Quatre chemins :
// - arithmétique  : "a op b", rationnels exacts (exposant non entier : f64 "≈")
// - algébrique    : une équation, une inconnue (x de préférence)
// - système       : toutes les équations ensemble
// - droite        : pente + point lus dans le texte, y = mx + b
//
// Toute ErreurNoyau est convertie ici en Resultat::Echec (confiance 0).

use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use regex::Regex;

use std::collections::BTreeSet;
use std::sync::OnceLock;

use super::categorie::Categorie;
use super::erreur::ErreurNoyau;
use super::expr::{rational_pow_int, MAX_EXPOSANT};
use super::extraction::{motif, ProblemeExtrait};
use super::format::{format_arrondi, format_exact_et_decimal, format_valeur};
use super::jetons::lire_decimal;
use super::lecture::lecture_radical;
use super::moteur::{Affectation, MoteurExact, MoteurSymbolique, Racine};
use super::poly::Poly;
use super::resultat::Resultat;
use super::rpn::analyser;
use crate::reglages::Reglages;

/// Résout avec le moteur exact livré.
pub fn resoudre(probleme: &ProblemeExtrait, categorie: Categorie, reglages: &Reglages) -> Resultat {
    resoudre_avec(&MoteurExact, probleme, categorie, reglages)
}

pub fn resoudre_avec<M: MoteurSymbolique>(
    moteur: &M,
    probleme: &ProblemeExtrait,
    categorie: Categorie,
    reglages: &Reglages,
) -> Resultat {
    let issue = match probleme {
        ProblemeExtrait::Expression(e) => arithmetique(e, categorie, reglages),
        ProblemeExtrait::Equation(e) => algebre(moteur, e, reglages),
        ProblemeExtrait::Systeme(eqs) => systeme(moteur, eqs, reglages),
        ProblemeExtrait::Droite(t) => droite(t, reglages),
    };

    issue.unwrap_or_else(|(cat, e)| {
        tracing::debug!(categorie = %cat, erreur = %e, "échec de résolution");
        Resultat::depuis_erreur(cat, &e)
    })
}

type Issue = Result<Resultat, (Categorie, ErreurNoyau)>;

fn en(cat: Categorie) -> impl Fn(ErreurNoyau) -> (Categorie, ErreurNoyau) {
    move |e| (cat, e)
}

/* ------------------------ Arithmétique ------------------------ */

fn re_operation() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    motif(
        &R,
        r"^\s*(-?\d+(?:\.\d+)?)\s*([+\-*/^])\s*(-?\d+(?:\.\d+)?)\s*$",
    )
}

fn arithmetique(texte: &str, categorie: Categorie, reglages: &Reglages) -> Issue {
    let caps = re_operation().captures(texte).ok_or_else(|| {
        (
            categorie,
            ErreurNoyau::analyse(format!("'{}' is not of the form 'a op b'", texte.trim())),
        )
    })?;
    let (ta, top, tb) = (&caps[1], &caps[2], &caps[3]);
    let op = top.chars().next().unwrap_or('+');

    // l’opérateur lu dans la structure l’emporte sur l’étiquette ("-5 + 3")
    let cat = Categorie::depuis_operateur(op).unwrap_or(categorie);
    if cat != categorie {
        tracing::debug!(annoncee = %categorie, lue = %cat, "catégorie corrigée par l’opérateur");
    }

    let a = lire_decimal(ta).map_err(en(cat))?;
    let b = lire_decimal(tb).map_err(en(cat))?;
    let interpretee = format!("Interpreted the expression: {ta} {op} {tb}");

    let valeur = match op {
        '+' => &a + &b,
        '-' => &a - &b,
        '*' => &a * &b,
        '/' => {
            if b.is_zero() {
                return Err((cat, ErreurNoyau::division_par_zero()));
            }
            let q = &a / &b;
            let mut etapes = vec![
                interpretee,
                format!(
                    "Divided exactly: {}",
                    format_exact_et_decimal(&q, reglages.chiffres)
                ),
            ];
            if !q.denom().is_one() {
                etapes.push(format!(
                    "Decimal reading is truncated to {} digits",
                    reglages.chiffres
                ));
            }
            return Ok(Resultat::succes(cat, format_valeur(&q, reglages.chiffres), etapes)
                .avec_valeur(q));
        }
        _ => return puissance(&a, &b, ta, tb, interpretee, reglages).map_err(en(cat)),
    };

    let reponse = format_valeur(&valeur, reglages.chiffres);
    let etapes = vec![interpretee, format!("Calculated the result: {reponse}")];
    Ok(Resultat::succes(cat, reponse, etapes).avec_valeur(valeur))
}

fn puissance(
    a: &BigRational,
    b: &BigRational,
    ta: &str,
    tb: &str,
    interpretee: String,
    reglages: &Reglages,
) -> Result<Resultat, ErreurNoyau> {
    let cat = Categorie::Exposant;

    if b.denom().is_one() {
        let n = b
            .numer()
            .to_i64()
            .filter(|n| n.unsigned_abs() <= MAX_EXPOSANT as u64)
            .ok_or_else(|| {
                ErreurNoyau::arithmetique(format!("exponent {tb} is too large (limit {MAX_EXPOSANT})"))
            })?;
        if a.is_zero() && n < 0 {
            return Err(ErreurNoyau::division_par_zero());
        }
        let v = rational_pow_int(a.clone(), n);
        let reponse = format_valeur(&v, reglages.chiffres);
        let etapes = vec![
            interpretee,
            format!("Raised {ta} to the integer power {n}: {reponse}"),
        ];
        return Ok(Resultat::succes(cat, reponse, etapes).avec_valeur(v));
    }

    // exposant non entier : lecture flottante seulement
    let (Some(fa), Some(fb)) = (a.to_f64(), b.to_f64()) else {
        return Err(ErreurNoyau::arithmetique("operands out of floating-point range"));
    };
    let v = fa.powf(fb);
    if !v.is_finite() {
        let motif = if a.is_negative() {
            format!("{ta}^{tb} has no real value")
        } else {
            format!("{ta}^{tb} is out of range")
        };
        return Err(ErreurNoyau::arithmetique(motif));
    }
    let reponse = format!("≈ {}", lecture_flottante(v, reglages.chiffres));
    let etapes = vec![
        interpretee,
        format!("The exponent {tb} is not an integer: approximate value {reponse}"),
    ];
    Ok(Resultat::succes(cat, reponse, etapes))
}

/// f64 -> texte, au plus 15 décimales (au-delà, du bruit), zéros finaux retirés.
fn lecture_flottante(v: f64, chiffres: usize) -> String {
    let prec = chiffres.min(15);
    let txt = format!("{v:.prec$}");
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

/* ------------------------ Algèbre (une équation) ------------------------ */

/// "g = d" -> (g, d, g - d) ; sans '=' : "g = 0"
fn lire_equation(texte: &str) -> Result<(String, String, Poly), ErreurNoyau> {
    let (g, d) = texte.split_once('=').unwrap_or((texte, "0"));
    if d.contains('=') {
        return Err(ErreurNoyau::analyse(format!("'{}' has more than one '='", texte.trim())));
    }
    let eg = analyser(g)?;
    let ed = analyser(d)?;
    let p = &Poly::depuis_expr(&eg)? - &Poly::depuis_expr(&ed)?;
    Ok((eg.to_string(), ed.to_string(), p))
}

fn variables_de(texte: &str) -> BTreeSet<String> {
    texte
        .split('=')
        .filter_map(|membre| analyser(membre).ok())
        .flat_map(|e| e.variables())
        .collect()
}

/// x s’il est présent, sinon la première inconnue (ordre alphabétique).
fn inconnue_principale(vars: &BTreeSet<String>) -> Option<String> {
    if vars.contains("x") {
        return Some("x".to_string());
    }
    vars.iter().next().cloned()
}

/// "x = √2 ≈ 1.4142135623" (lecture ajoutée si la racine n’est pas entière)
fn decrire_racine(v: &str, r: &Racine, chiffres: usize) -> String {
    match r {
        Racine::Exacte(x) => match x.en_rationnel() {
            Some(q) => format!("{v} = {}", format_exact_et_decimal(q, chiffres)),
            None => format!("{v} = {x} ≈ {}", lecture_radical(x, chiffres)),
        },
        Racine::Expression(p) => format!("{v} = {p}"),
    }
}

fn algebre<M: MoteurSymbolique>(moteur: &M, texte: &str, reglages: &Reglages) -> Issue {
    let cat = Categorie::Algebrique;
    let (g, d, p) = lire_equation(texte).map_err(en(cat))?;

    let vars = variables_de(texte);
    let v = inconnue_principale(&vars)
        .ok_or_else(|| (cat, ErreurNoyau::non_supporte("there is no unknown to solve for")))?;
    tracing::debug!(equation = %p, inconnue = %v, "équation à une inconnue");

    let racines = moteur.resoudre(&p, &v).map_err(en(cat))?;
    if racines.is_empty() {
        return Err((cat, ErreurNoyau::non_supporte("No real solution")));
    }

    let mut etapes = vec![
        format!("Original equation: {g} = {d}"),
        format!("Moved every term to one side: {p} = 0"),
        format!("Solving for {v}..."),
    ];
    etapes.extend(
        racines
            .iter()
            .map(|r| format!("   {}", decrire_racine(&v, r, reglages.chiffres))),
    );

    let affichees: Vec<String> = racines.iter().map(|r| format!("{v} = {r}")).collect();
    let reponse = if reglages.toutes_racines || affichees.len() == 1 {
        if affichees.len() > 1 {
            etapes.push(format!("Found {} solutions", affichees.len()));
        }
        affichees.join(" or ")
    } else {
        tracing::warn!(
            gardee = %affichees[0],
            ecartees = affichees.len() - 1,
            "seule la première racine est rapportée"
        );
        etapes.push(format!(
            "Kept the first of {} solutions: {}",
            affichees.len(),
            affichees[0]
        ));
        affichees[0].clone()
    };

    Ok(Resultat::succes(cat, reponse, etapes))
}

/* ------------------------ Systèmes ------------------------ */

fn format_affectation(a: &Affectation) -> String {
    a.iter()
        .map(|(v, r)| format!("{v} = {r}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn systeme<M: MoteurSymbolique>(moteur: &M, equations: &[String], reglages: &Reglages) -> Issue {
    let cat = Categorie::Systeme;

    let mut polys = Vec::with_capacity(equations.len());
    let mut vars: BTreeSet<String> = BTreeSet::new();
    for eq in equations {
        let (_, _, p) = lire_equation(eq).map_err(en(cat))?;
        vars.extend(variables_de(eq));
        polys.push(p);
    }
    if vars.is_empty() {
        return Err((cat, ErreurNoyau::non_supporte("there is no unknown to solve for")));
    }
    let vars: Vec<String> = vars.into_iter().collect();

    let mut etapes = vec!["Rewrote each equation as expression = 0:".to_string()];
    etapes.extend(polys.iter().map(|p| format!("   {p} = 0")));
    let methode = if polys.iter().all(Poly::est_lineaire) {
        "elimination"
    } else {
        "substitution"
    };
    etapes.push(format!("Solved for {} by {methode}", vars.join(", ")));

    let solutions = moteur.resoudre_systeme(&polys, &vars).map_err(en(cat))?;

    if solutions.is_empty() {
        etapes.push("The equations are inconsistent".to_string());
        return Ok(Resultat::succes(cat, "No solution", etapes));
    }

    for s in &solutions {
        let libres: Vec<&str> = vars
            .iter()
            .filter(|v| !s.contains_key(*v))
            .map(String::as_str)
            .collect();
        if !libres.is_empty() {
            etapes.push(format!("{} can take any value", libres.join(", ")));
        }
        etapes.extend(s.iter().map(|(v, r)| {
            format!("   {}", decrire_racine(v, r, reglages.chiffres))
        }));
    }

    let reponse = solutions
        .iter()
        .map(format_affectation)
        .collect::<Vec<_>>()
        .join(" or ");
    etapes.push(format!("Solution: {reponse}"));
    Ok(Resultat::succes(cat, reponse, etapes))
}

/* ------------------------ Droite (pente + point) ------------------------ */

const NOMBRE: &str = r"[-+]?\d*\.?\d+";

fn re_pente() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| {
        Regex::new(&format!(r"slope\s*(?:of)?\s*(?:=|is)?\s*({NOMBRE})"))
            .expect("motif invalide")
    })
}

fn re_point() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| {
        Regex::new(&format!(
            r"(?:passing\s+)?through\s*(?:the\s+point\s*)?\(?\s*({NOMBRE})\s*,\s*({NOMBRE})\s*\)?"
        ))
        .expect("motif invalide")
    })
}

/// " - 3" / " + 3" / "" (terme additif signé)
fn terme_signe(r: &BigRational, decimales: usize) -> String {
    let txt = format_arrondi(&r.abs(), decimales);
    if txt == "0" {
        String::new()
    } else if r.is_negative() {
        format!(" - {txt}")
    } else {
        format!(" + {txt}")
    }
}

/// "2x", "x", "-x", "0.5x", "" (pente nulle)
fn terme_en_x(m: &BigRational, decimales: usize) -> String {
    match format_arrondi(m, decimales).as_str() {
        "0" => String::new(),
        "1" => "x".to_string(),
        "-1" => "-x".to_string(),
        autre => format!("{autre}x"),
    }
}

/// "y = 2x + 1", "y = -x", "y = 3"
fn equation_droite(m: &BigRational, b: &BigRational, decimales: usize) -> String {
    let mx = terme_en_x(m, decimales);
    if mx.is_empty() {
        return format!("y = {}", format_arrondi(b, decimales));
    }
    format!("y = {mx}{}", terme_signe(b, decimales))
}

fn droite(texte: &str, reglages: &Reglages) -> Issue {
    let cat = Categorie::DroitePentePoint;
    let dec = reglages.decimales_droite;

    let pente = re_pente()
        .captures(texte)
        .ok_or_else(|| (cat, ErreurNoyau::parametre_manquant("Could not find the slope in the problem.")))?;
    let point = re_point()
        .captures(texte)
        .ok_or_else(|| (cat, ErreurNoyau::parametre_manquant("Could not find the point in the problem.")))?;

    let m = lire_decimal(&pente[1]).map_err(en(cat))?;
    let x0 = lire_decimal(&point[1]).map_err(en(cat))?;
    let y0 = lire_decimal(&point[2]).map_err(en(cat))?;

    let b = &y0 - &m * &x0;
    let equation = equation_droite(&m, &b, dec);
    tracing::debug!(pente = %m, ordonnee = %b, "droite");

    let (tm, tx0, ty0) = (
        format_arrondi(&m, dec),
        format_arrondi(&x0, dec),
        format_arrondi(&y0, dec),
    );
    let moins_y0 = terme_signe(&-&y0, dec);
    let etapes = vec![
        "Start with the point-slope form y - y₀ = m(x - x₀)".to_string(),
        format!("Plug in the slope (m = {tm}) and the point (x₀ = {tx0}, y₀ = {ty0}):"),
        format!("   y{moins_y0} = {tm}(x{})", terme_signe(&-&x0, dec)),
        "Expand the right-hand side:".to_string(),
        format!(
            "   y{moins_y0} = {}{}",
            vide_en_zero(terme_en_x(&m, dec)),
            terme_signe(&-(&m * &x0), dec)
        ),
        "Solve for y and simplify constants:".to_string(),
        format!("   {equation}"),
    ];

    Ok(Resultat::succes(cat, equation, etapes))
}

fn vide_en_zero(s: String) -> String {
    if s.is_empty() {
        "0".to_string()
    } else {
        s
    }
}
