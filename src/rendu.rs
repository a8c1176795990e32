// src/rendu.rs
//
// Mise en forme d’une Reponse pour la sortie standard.
//
// - texte : Problem / Answer / Steps (+ Topic, notes)
// - html  : un bloc <div class="math-solution">, tout texte utilisateur échappé,
//           aucun script
// - json  : {problem, type, confidence, answer, steps, topic}

use num_traits::One;
use serde::Serialize;
use std::fmt::Write as _;

use crate::conversation::intention::{personnalite, Humeur};
use crate::conversation::Reponse;
use crate::noyau::{Resultat, Traitement};
use crate::reglages::FormatSortie;

pub fn rendre(reponse: &Reponse, format: FormatSortie) -> Result<String, serde_json::Error> {
    Ok(match format {
        FormatSortie::Texte => texte(reponse),
        FormatSortie::Html => html(reponse),
        FormatSortie::Json => json(reponse)?,
    })
}

fn message_echec(motif: &str) -> String {
    personnalite(
        &format!("Sorry, I couldn't solve that: {motif}"),
        Humeur::Erreur,
        &[Humeur::Reflexion],
    )
}

/// "2/3" quand la valeur exacte n’est pas entière.
fn ligne_fraction(t: &Traitement) -> Option<String> {
    t.resultat
        .valeur()
        .filter(|v| !v.denom().is_one())
        .map(|v| v.to_string())
}

/* ------------------------ Texte ------------------------ */

pub fn texte(reponse: &Reponse) -> String {
    let (t, sujet, notes) = match reponse {
        Reponse::Bavardage { texte } => return texte.clone(),
        Reponse::Maths {
            traitement,
            sujet,
            notes,
        } => (traitement, sujet, notes),
    };

    let Resultat::Succes(s) = &t.resultat else {
        return message_echec(t.resultat.reponse());
    };

    let mut out = String::new();
    let _ = writeln!(out, "Problem: {}", t.probleme.texte());
    let _ = writeln!(out, "Type: {}", s.categorie);
    let _ = writeln!(out, "Answer: {}", s.reponse);
    if let Some(f) = ligne_fraction(t) {
        let _ = writeln!(out, "Fraction: {f}");
    }
    out.push_str("Steps:\n");
    for e in &s.etapes {
        let _ = writeln!(out, "  {e}");
    }
    let _ = writeln!(out, "Topic: {sujet}");
    for n in notes {
        let _ = writeln!(out, "{n}");
    }
    out.truncate(out.trim_end().len());
    out
}

/* ------------------------ HTML ------------------------ */

pub fn echapper_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// "3. texte" -> "texte" (l’<ol> numérote déjà).
fn sans_numero(etape: &str) -> &str {
    match etape.split_once(". ") {
        Some((n, reste)) if !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()) => reste,
        _ => etape,
    }
}

/// Une étape par <li> ; les lignes de suite rejoignent l’étape précédente.
fn items_etapes(etapes: &[String]) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    for e in etapes {
        match items.last_mut() {
            Some(dernier) if e.starts_with("   ") => {
                dernier.push_str("<br>");
                dernier.push_str(&echapper_html(e.trim()));
            }
            _ => items.push(echapper_html(sans_numero(e))),
        }
    }
    items
}

pub fn html(reponse: &Reponse) -> String {
    let (t, sujet, notes) = match reponse {
        Reponse::Bavardage { texte } => {
            return format!("<p class=\"chat\">{}</p>", echapper_html(texte));
        }
        Reponse::Maths {
            traitement,
            sujet,
            notes,
        } => (traitement, sujet, notes),
    };

    let Resultat::Succes(s) = &t.resultat else {
        return format!(
            "<div class=\"math-error\">{}</div>",
            echapper_html(&message_echec(t.resultat.reponse()))
        );
    };

    let mut out = String::from("<div class=\"math-solution\">\n");
    let _ = writeln!(
        out,
        "  <div class=\"problem\">Problem: {}</div>",
        echapper_html(&t.probleme.texte())
    );
    let _ = writeln!(
        out,
        "  <div class=\"answer\">Answer: {}</div>",
        echapper_html(&s.reponse)
    );
    if let Some(f) = ligne_fraction(t) {
        let _ = writeln!(out, "  <div class=\"fraction\">Fraction: {}</div>", echapper_html(&f));
    }
    out.push_str("  <ol class=\"steps\">\n");
    for item in items_etapes(&s.etapes) {
        let _ = writeln!(out, "    <li>{item}</li>");
    }
    out.push_str("  </ol>\n");
    let _ = writeln!(out, "  <div class=\"topic\">Topic: {sujet}</div>");
    for n in notes {
        let _ = writeln!(out, "  <div class=\"note\">{}</div>", echapper_html(n));
    }
    out.push_str("</div>");
    out
}

/* ------------------------ JSON ------------------------ */

fn vide(notes: &&[String]) -> bool {
    notes.is_empty()
}

#[derive(Serialize)]
struct VueMaths<'a> {
    problem: String,
    #[serde(rename = "type")]
    kind: &'static str,
    confidence: u8,
    answer: &'a str,
    steps: &'a [String],
    topic: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    fraction: Option<String>,
    #[serde(skip_serializing_if = "vide")]
    notes: &'a [String],
}

#[derive(Serialize)]
struct VueChat<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    confidence: u8,
    response: &'a str,
}

pub fn json(reponse: &Reponse) -> Result<String, serde_json::Error> {
    match reponse {
        Reponse::Bavardage { texte } => serde_json::to_string_pretty(&VueChat {
            kind: "chat",
            confidence: 100,
            response: texte,
        }),
        Reponse::Maths {
            traitement: t,
            sujet,
            notes,
        } => serde_json::to_string_pretty(&VueMaths {
            problem: t.probleme.texte(),
            kind: t.resultat.categorie().nom(),
            confidence: t.resultat.confiance(),
            answer: t.resultat.reponse(),
            steps: t.resultat.etapes(),
            topic: sujet.cle(),
            fraction: ligne_fraction(t),
            notes,
        }),
    }
}
