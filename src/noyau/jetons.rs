// src/noyau/jetons.rs

use num_bigint::BigInt;
use num_rational::BigRational;

use super::erreur::ErreurNoyau;

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Num(BigRational),

    // Fonction (sqrt) ou variable d’une lettre.
    // NOTE: le parse (RPN->Expr) décide selon le nom.
    Ident(String),

    Plus,
    Minus,
    Star,
    Slash,
    Caret, // ^

    LPar,
    RPar,
}

/// Identificateurs reconnus comme fonctions (unaire).
pub fn est_fonction(nom: &str) -> bool {
    matches!(nom, "sqrt")
}

/// Lit un décimal "12" ou "12.375" en rationnel EXACT (12375/1000 -> 99/8).
pub fn lire_decimal(s: &str) -> Result<BigRational, ErreurNoyau> {
    let (entier, frac) = match s.split_once('.') {
        Some((e, f)) => (e, f),
        None => (s, ""),
    };
    let invalide = || ErreurNoyau::analyse(format!("number '{s}'"));

    let entier = if entier.is_empty() { "0" } else { entier };
    let neg = entier.starts_with('-');
    let chiffres_entiers = entier.trim_start_matches(['-', '+']);

    let mut chiffres = String::with_capacity(chiffres_entiers.len() + frac.len());
    chiffres.push_str(chiffres_entiers);
    chiffres.push_str(frac);
    if chiffres.is_empty() || !chiffres.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalide());
    }

    let n = BigInt::parse_bytes(chiffres.as_bytes(), 10).ok_or_else(invalide)?;
    let d = BigInt::from(10).pow(frac.len() as u32);
    let r = BigRational::new(n, d);
    Ok(if neg { -r } else { r })
}

/// Tokenize une chaîne en jetons.
/// Supporte:
/// - entiers et décimaux (ex: 12, 0.25) -> rationnels exacts
/// - opérateurs + - * / ^
/// - parenthèses ( )
/// - √ (équivaut à ident("sqrt"))
/// - mots : "sqrt" => fonction ; sinon découpés en variables d’une lettre ("xy" => x, y)
/// - produits implicites : "2x", "3(x+1)", "(x+1)(x-1)", "x y"
pub fn tokenize(s: &str) -> Result<Vec<Tok>, ErreurNoyau> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let simple = match c {
            '(' => Some(Tok::LPar),
            ')' => Some(Tok::RPar),
            '+' => Some(Tok::Plus),
            '-' => Some(Tok::Minus),
            '*' => Some(Tok::Star),
            '/' => Some(Tok::Slash),
            '^' => Some(Tok::Caret),
            '√' => Some(Tok::Ident("sqrt".to_string())),
            _ => None,
        };
        if let Some(t) = simple {
            out.push(t);
            i += 1;
            continue;
        }

        // Mots ASCII
        if c.is_ascii_alphabetic() {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_alphabetic() {
                i += 1;
            }
            let mot: String = chars[start..i].iter().collect::<String>().to_lowercase();

            if est_fonction(&mot) {
                out.push(Tok::Ident(mot));
            } else {
                // "xy" => x * y (symboles séparés)
                out.extend(mot.chars().map(|l| Tok::Ident(l.to_string())));
            }
            continue;
        }

        // Nombre (décimal éventuel)
        if c.is_ascii_digit() || (c == '.' && i + 1 < chars.len() && chars[i + 1].is_ascii_digit()) {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            if i < chars.len() && chars[i] == '.' {
                i += 1;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
            }
            let brut: String = chars[start..i].iter().collect();
            out.push(Tok::Num(lire_decimal(brut.trim_end_matches('.'))?));
            continue;
        }

        return Err(ErreurNoyau::analyse(format!("unexpected character '{c}'")));
    }

    Ok(inserer_produits_implicites(out))
}

/// Ajoute les '*' sous-entendus entre une valeur et ce qui la suit.
fn inserer_produits_implicites(jetons: Vec<Tok>) -> Vec<Tok> {
    fn termine_valeur(t: &Tok) -> bool {
        match t {
            Tok::Num(_) | Tok::RPar => true,
            Tok::Ident(nom) => !est_fonction(nom),
            _ => false,
        }
    }
    fn commence_valeur(t: &Tok) -> bool {
        matches!(t, Tok::Num(_) | Tok::Ident(_) | Tok::LPar)
    }

    let mut out: Vec<Tok> = Vec::with_capacity(jetons.len() * 2);
    for t in jetons {
        if let Some(prec) = out.last() {
            if termine_valeur(prec) && commence_valeur(&t) {
                out.push(Tok::Star);
            }
        }
        out.push(t);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{lire_decimal, tokenize, Tok};
    use num_bigint::BigInt;
    use num_rational::BigRational;
    use num_traits::{One, Zero};

    /// Jetons en texte, séparés par des blancs.
    fn format_tokens(tokens: &[Tok]) -> String {
        fn format_rat(r: &BigRational) -> String {
            let n = r.numer();
            let d = r.denom();
            if d.is_one() {
                format!("{n}")
            } else if n.is_zero() {
                "0".to_string()
            } else {
                format!("{n}/{d}")
            }
        }

        let mut out = Vec::new();
        for t in tokens {
            let s = match t {
                Tok::Num(r) => format_rat(r),
                Tok::Ident(name) => name.clone(),

                Tok::Plus => "+".to_string(),
                Tok::Minus => "-".to_string(),
                Tok::Star => "*".to_string(),
                Tok::Slash => "/".to_string(),
                Tok::Caret => "^".to_string(),

                Tok::LPar => "(".to_string(),
                Tok::RPar => ")".to_string(),
            };
            out.push(s);
        }
        out.join(" ")
    }

    fn txt(s: &str) -> String {
        format_tokens(&tokenize(s).unwrap())
    }

    #[test]
    fn produits_implicites() {
        assert_eq!(txt("2x+3"), "2 * x + 3");
        assert_eq!(txt("3(x+1)"), "3 * ( x + 1 )");
        assert_eq!(txt("(x+1)(x-1)"), "( x + 1 ) * ( x - 1 )");
        assert_eq!(txt("2xy"), "2 * x * y");
        assert_eq!(txt("x y"), "x * y");
    }

    #[test]
    fn fonction_sans_produit() {
        assert_eq!(txt("sqrt(4)x"), "sqrt ( 4 ) * x");
        assert_eq!(txt("√9"), "sqrt 9");
    }

    #[test]
    fn decimaux_exacts() {
        assert_eq!(
            lire_decimal("12.375").unwrap(),
            BigRational::new(BigInt::from(99), BigInt::from(8))
        );
        assert_eq!(lire_decimal("-0.5").unwrap(), BigRational::new((-1).into(), 2.into()));
        assert_eq!(txt("0.25x"), "1/4 * x");
        assert_eq!(txt(".5"), "1/2");
    }

    #[test]
    fn caractere_inattendu() {
        let e = tokenize("2 # 3").unwrap_err();
        assert!(e.to_string().contains("unexpected character"));
    }

    #[test]
    fn majuscules() {
        assert_eq!(txt("2X"), "2 * x");
    }
}
