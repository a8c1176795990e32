// src/noyau/symboles.rs
//
// Normalisation des symboles mathématiques (Unicode -> ASCII canonique).
//
// Contrat :
// - balayage gauche -> droite, variante la plus longue d’abord
// - caractère inconnu : recopié tel quel
// - idempotent : normaliser(normaliser(s)) == normaliser(s)
//   (chaque forme canonique est sa propre variante)
//
// Exposants : une suite de chiffres en exposant devient "^" + chiffres ASCII
// ("x²" -> "x^2"), sinon l’exposant serait perdu.

/// Table (canonique, variantes). La canonique figure aussi dans ses variantes.
const VARIANTES: &[(&str, &[&str])] = &[
    ("x", &["x", "𝑥", "𝓍", "𝔵", "χ"]),
    ("y", &["y", "𝑦", "𝓎", "𝔶", "γ"]),
    ("z", &["z", "𝑧", "𝓏", "𝔷", "ζ"]),
    ("+", &["+", "＋", "➕", "∑", "⁺"]),
    ("-", &["-", "−", "－", "➖", "–", "—", "‐", "⁻"]),
    ("*", &["*", "×", "⋅", "∗", "⨯", "·", "∙"]),
    ("/", &["/", "÷", "∕", "⁄"]),
    ("=", &["=", "＝", "≡", "≈", "≋"]),
    ("^", &["^"]),
];

/// Chiffre en exposant -> chiffre ASCII.
fn chiffre_exposant(c: char) -> Option<char> {
    let ascii = match c {
        '⁰' => '0',
        '¹' => '1',
        '²' => '2',
        '³' => '3',
        '⁴' => '4',
        '⁵' => '5',
        '⁶' => '6',
        '⁷' => '7',
        '⁸' => '8',
        '⁹' => '9',
        _ => return None,
    };
    Some(ascii)
}

/// Variante la plus longue qui commence `reste`.
fn plus_longue_variante(reste: &str) -> Option<(&'static str, usize)> {
    let mut meilleure: Option<(&'static str, usize)> = None;
    for (canon, variantes) in VARIANTES {
        for v in variantes.iter() {
            if reste.starts_with(v) && meilleure.map_or(true, |(_, l)| v.len() > l) {
                meilleure = Some((*canon, v.len()));
            }
        }
    }
    meilleure
}

/// Remplace chaque variante Unicode connue par sa forme ASCII canonique.
pub fn normaliser(texte: &str) -> String {
    let mut out = String::with_capacity(texte.len());
    let mut i = 0usize;

    while i < texte.len() {
        let reste = &texte[i..];

        // Suite d’exposants : "²³" -> "^23"
        let mut exposant = String::new();
        for c in reste.chars() {
            match chiffre_exposant(c) {
                Some(d) => exposant.push(d),
                None => break,
            }
        }
        if !exposant.is_empty() {
            // chaque chiffre exposant occupe 2 ou 3 octets : on avance caractère par caractère
            let avance: usize = reste
                .chars()
                .take(exposant.chars().count())
                .map(char::len_utf8)
                .sum();
            out.push('^');
            out.push_str(&exposant);
            i += avance;
            continue;
        }

        if let Some((canon, longueur)) = plus_longue_variante(reste) {
            out.push_str(canon);
            i += longueur;
            continue;
        }

        // caractère hors table : recopié
        let c = reste.chars().next().unwrap_or_default();
        out.push(c);
        i += c.len_utf8().max(1);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::normaliser;

    #[test]
    fn variantes_operateurs() {
        assert_eq!(normaliser("6 × 7"), "6 * 7");
        assert_eq!(normaliser("8 ÷ 2"), "8 / 2");
        assert_eq!(normaliser("9 − 4"), "9 - 4");
        assert_eq!(normaliser("2𝑥 ＋ 3 ≈ 7"), "2x + 3 = 7");
    }

    #[test]
    fn variables_grecques_et_fantaisie() {
        assert_eq!(normaliser("χ + γ"), "x + y");
        assert_eq!(normaliser("𝓏"), "z");
    }

    #[test]
    fn exposants_conserves() {
        assert_eq!(normaliser("x²"), "x^2");
        assert_eq!(normaliser("10¹²"), "10^12");
        assert_eq!(normaliser("x³ + x² = 0"), "x^3 + x^2 = 0");
    }

    #[test]
    fn texte_ordinaire_inchange() {
        assert_eq!(normaliser("hello there"), "hello there");
        assert_eq!(normaliser(""), "");
        assert_eq!(normaliser("café ∞"), "café ∞");
    }

    #[test]
    fn idempotence_cas_limites() {
        for s in ["x²³", "➕➖", "a—b", "((2⋅3))", "γ≡ζ", "²", "é²"] {
            let une = normaliser(s);
            assert_eq!(normaliser(&une), une, "s={s:?}");
        }
    }
}
