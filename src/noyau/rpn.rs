// src/noyau/rpn.rs
//
// Shunting-yard -> RPN -> AST
// Objectif:
// - Convertir une suite de Tok en RPN (postfix)
// - Puis reconstruire Expr
//
// Règles:
// - Ident(name):
//    - si name == sqrt => fonction unaire (postfixée en RPN)
//    - sinon => variable (Expr::Var)
// - Moins unaire:
//    - si '-' arrive quand on n’attend PAS une valeur => opérateur préfixe `Neg`
//    - précédence : entre '*' et '^'  (-x^2 = -(x^2), 2^-1 = 2^(-1))
// - '+' unaire : ignoré
//
// NOTE:
// - Les fonctions sont traitées comme des opérateurs “collés” à leur argument
//   et sont sorties après la parenthèse fermante.

use num_rational::BigRational;
use num_traits::{One, ToPrimitive};

use super::erreur::ErreurNoyau;
use super::expr::Expr;
use super::jetons::{est_fonction, Tok};

/// Jeton RPN : les jetons d’entrée + le moins unaire.
#[derive(Clone, Debug, PartialEq)]
pub enum Rpn {
    Tok(Tok),
    Neg,
}

fn precedence(t: &Rpn) -> i32 {
    match t {
        Rpn::Tok(Tok::Plus | Tok::Minus) => 1,
        Rpn::Tok(Tok::Star | Tok::Slash) => 2,
        Rpn::Neg => 3,
        Rpn::Tok(Tok::Caret) => 4,
        _ => 0,
    }
}

fn is_right_associative(t: &Rpn) -> bool {
    matches!(t, Rpn::Tok(Tok::Caret) | Rpn::Neg)
}

fn est_fonction_sur_pile(t: &Rpn) -> bool {
    matches!(t, Rpn::Tok(Tok::Ident(name)) if est_fonction(name))
}

/// "√9" sans parenthèses : la fonction ne porte que sur l’atome qui la suit.
fn sortir_fonction_nue(ops: &mut Vec<Rpn>, out: &mut Vec<Rpn>) {
    if ops.last().is_some_and(est_fonction_sur_pile) {
        if let Some(f) = ops.pop() {
            out.push(f);
        }
    }
}

/// Convertit une suite de jetons en RPN (notation polonaise inversée).
///
/// Exemple:
///   tokens: [Num(2), Star, Ident("x"), Plus, Num(3)]
///   rpn:    [Num(2), Ident("x"), Star, Num(3), Plus]
pub fn to_rpn(tokens: &[Tok]) -> Result<Vec<Rpn>, ErreurNoyau> {
    let mut out: Vec<Rpn> = Vec::new();
    let mut ops: Vec<Rpn> = Vec::new();

    // “valeur” = un atome ou une expression fermée.
    // Sert à détecter le moins unaire.
    let mut prev_was_value = false;

    for tok in tokens.iter().cloned() {
        match tok {
            Tok::Num(_) => {
                out.push(Rpn::Tok(tok));
                sortir_fonction_nue(&mut ops, &mut out);
                prev_was_value = true;
            }

            Tok::Ident(_) => {
                if matches!(&tok, Tok::Ident(name) if est_fonction(name)) {
                    // fonction : on la garde sur la pile (elle sortira après son argument)
                    ops.push(Rpn::Tok(tok));
                    prev_was_value = false;
                } else {
                    out.push(Rpn::Tok(tok));
                    sortir_fonction_nue(&mut ops, &mut out);
                    prev_was_value = true;
                }
            }

            Tok::LPar => {
                ops.push(Rpn::Tok(tok));
                prev_was_value = false;
            }

            Tok::RPar => {
                // dépile jusqu’à '('
                let mut ouverte = false;
                while let Some(top) = ops.pop() {
                    if matches!(top, Rpn::Tok(Tok::LPar)) {
                        ouverte = true;
                        break;
                    }
                    out.push(top);
                }
                if !ouverte {
                    return Err(ErreurNoyau::analyse("unbalanced parentheses"));
                }

                // si une fonction attend au sommet, on la sort aussi
                sortir_fonction_nue(&mut ops, &mut out);

                prev_was_value = true;
            }

            Tok::Minus | Tok::Plus if !prev_was_value => {
                // opérateur préfixe : rien à dépiler
                if tok == Tok::Minus {
                    ops.push(Rpn::Neg);
                }
            }

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Caret => {
                let courant = Rpn::Tok(tok);

                // dépile tant que:
                // - on n'est pas bloqué par '('
                // - et on ne traverse pas une fonction (fonction reste collée à son argument)
                // - et la précédence/associativité exige de sortir l'opérateur du haut
                while let Some(top) = ops.last() {
                    if matches!(top, Rpn::Tok(Tok::LPar)) || est_fonction_sur_pile(top) {
                        break;
                    }

                    let p_top = precedence(top);
                    let p_tok = precedence(&courant);

                    let doit_pop = if is_right_associative(&courant) {
                        p_top > p_tok
                    } else {
                        p_top >= p_tok
                    };

                    match (doit_pop, ops.pop()) {
                        (true, Some(op)) => out.push(op),
                        (false, Some(op)) => {
                            ops.push(op);
                            break;
                        }
                        (_, None) => break,
                    }
                }

                ops.push(courant);
                prev_was_value = false;
            }
        }
    }

    // vide la pile ops
    while let Some(op) = ops.pop() {
        if matches!(op, Rpn::Tok(Tok::LPar)) {
            return Err(ErreurNoyau::analyse("unbalanced parentheses"));
        }
        out.push(op);
    }

    Ok(out)
}

/// Exposant : entier constant (éventuellement négatif, ex: 2^-1, 2^3^2).
fn exposant_entier(e: &Expr) -> Result<i64, ErreurNoyau> {
    let r: BigRational = e
        .constante()
        .ok_or_else(|| ErreurNoyau::non_supporte("exponent must be an integer"))?;
    if !r.denom().is_one() {
        return Err(ErreurNoyau::non_supporte("exponent must be an integer"));
    }
    r.numer()
        .to_i64()
        .ok_or_else(|| ErreurNoyau::arithmetique("exponent too large"))
}

/// Construit une Expr à partir d’une RPN.
pub fn from_rpn(rpn: &[Rpn]) -> Result<Expr, ErreurNoyau> {
    let invalide = || ErreurNoyau::analyse("malformed expression");
    let mut st: Vec<Expr> = Vec::new();

    for jeton in rpn.iter().cloned() {
        match jeton {
            Rpn::Neg => {
                let a = st.pop().ok_or_else(invalide)?;
                st.push(Expr::Neg(Box::new(a)));
            }

            Rpn::Tok(Tok::Num(r)) => st.push(Expr::Rat(r)),

            Rpn::Tok(tok @ (Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Caret)) => {
                let b = st.pop().ok_or_else(invalide)?;
                let a = st.pop().ok_or_else(invalide)?;

                let e = match tok {
                    Tok::Plus => Expr::Add(Box::new(a), Box::new(b)),
                    Tok::Minus => Expr::Sub(Box::new(a), Box::new(b)),
                    Tok::Star => Expr::Mul(Box::new(a), Box::new(b)),
                    Tok::Slash => Expr::Div(Box::new(a), Box::new(b)),
                    _ => Expr::PowInt(Box::new(a), exposant_entier(&b)?),
                };

                st.push(e);
            }

            Rpn::Tok(Tok::Ident(name)) => {
                if est_fonction(&name) {
                    let x = st
                        .pop()
                        .ok_or_else(|| ErreurNoyau::analyse("function without argument"))?;
                    st.push(Expr::Sqrt(Box::new(x)));
                } else {
                    st.push(Expr::Var(name));
                }
            }

            Rpn::Tok(Tok::LPar | Tok::RPar) => return Err(invalide()),
        }
    }

    if st.len() != 1 {
        return Err(invalide());
    }
    st.pop().ok_or_else(invalide)
}

/// Raccourci : texte -> Expr.
pub fn analyser(texte: &str) -> Result<Expr, ErreurNoyau> {
    let s = texte.trim();
    if s.is_empty() {
        return Err(ErreurNoyau::analyse("an empty expression"));
    }
    let jetons = super::jetons::tokenize(s)?;
    let rpn = to_rpn(&jetons)?;
    from_rpn(&rpn).map_err(|e| match e {
        ErreurNoyau::Analyse(_) => ErreurNoyau::analyse(format!("'{s}'")),
        autre => autre,
    })
}
