//! Noyau exact de l’assistant maths
//!
//! Organisation interne :
//! - symboles.rs   : normalisation Unicode -> ASCII canonique
//! - categorie.rs  : classement grossier (table de règles ordonnées)
//! - extraction.rs : isoler équation / expression / système / droite
//! - jetons.rs     : tokenisation (produits implicites)
//! - rpn.rs        : shunting-yard + construction Expr
//! - expr.rs       : AST exact + affichage
//! - poly.rs       : polynômes sur Q
//! - radical.rs    : nombres a + b√n
//! - moteur.rs     : résolution exacte (trait MoteurSymbolique)
//! - format.rs     : affichage EXACT “joli” (√5/2, 1/3 ≈ 0.333…)
//! - lecture.rs    : lecture décimale tronquée
//! - solveur.rs    : les quatre chemins + étapes
//! - resultat.rs   : Succes / Echec, confiance
//! - pipeline.rs   : pipeline complet

pub mod categorie;
pub mod erreur;
pub mod expr;
pub mod extraction;
pub mod format;
pub mod jetons;
pub mod lecture;
pub mod moteur;
pub mod pipeline;
pub mod poly;
pub mod radical;
pub mod resultat;
pub mod rpn;
pub mod solveur;
pub mod symboles;

#[cfg(test)]
mod tests_proprietes;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use pipeline::{traiter, Traitement};
pub use resultat::Resultat;
