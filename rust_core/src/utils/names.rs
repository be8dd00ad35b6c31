//! Name normalization and Cyrillic→Latin transliteration.
//!
//! Player and opponent names arrive in mixed alphabets, with punctuation
//! noise and inconsistent casing. Normalization reduces a free-text name to
//! comparable forms: a lowercase letters-only base, and a transliterated
//! Latin variant when the text carries Cyrillic. The transliteration table is
//! fixed and deterministic, so the derived key is stable across calls.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Global transliteration table, initialized once on first access.
static TRANSLIT_TABLE: OnceLock<HashMap<char, &'static str>> = OnceLock::new();

/// ISO-9-style single/multi-letter substitutions for lowercase Cyrillic.
fn translit_table() -> &'static HashMap<char, &'static str> {
    TRANSLIT_TABLE.get_or_init(|| {
        let mut map = HashMap::new();
        map.insert('а', "a");
        map.insert('б', "b");
        map.insert('в', "v");
        map.insert('г', "g");
        map.insert('д', "d");
        map.insert('е', "e");
        map.insert('ё', "e");
        map.insert('ж', "zh");
        map.insert('з', "z");
        map.insert('и', "i");
        map.insert('й', "i");
        map.insert('к', "k");
        map.insert('л', "l");
        map.insert('м', "m");
        map.insert('н', "n");
        map.insert('о', "o");
        map.insert('п', "p");
        map.insert('р', "r");
        map.insert('с', "s");
        map.insert('т', "t");
        map.insert('у', "u");
        map.insert('ф', "f");
        map.insert('х', "kh");
        map.insert('ц', "ts");
        map.insert('ч', "ch");
        map.insert('ш', "sh");
        map.insert('щ', "shch");
        map.insert('ъ', ""); // hard sign drops
        map.insert('ы', "y");
        map.insert('ь', ""); // soft sign drops
        map.insert('э', "e");
        map.insert('ю', "yu");
        map.insert('я', "ya");
        map
    })
}

/// Letters of the two alphabets the domain's names use.
fn is_name_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || ('а'..='я').contains(&c) || c == 'ё'
}

/// Replace every Cyrillic letter with its Latin substitution.
///
/// Characters without a table entry pass through unchanged, so the function
/// never fails; Latin input is returned as-is.
pub fn transliterate(text: &str) -> String {
    let table = translit_table();
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match table.get(&ch) {
            Some(replacement) => out.push_str(replacement),
            None => out.push(ch),
        }
    }
    out
}

/// Lowercase, trim, and strip everything outside the two expected alphabets.
pub fn base_form(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .filter(|c| is_name_letter(*c))
        .collect()
}

/// The deterministic comparison key for an opponent name.
///
/// Always Latin: Cyrillic and Latin spellings of the same name collide on
/// one key. Idempotent: applying it to its own output is a no-op.
pub fn opponent_key(name: &str) -> String {
    transliterate(&base_form(name))
}

/// Normalized comparison variants for a free-text name.
///
/// Contains the base form and, when the base carries Cyrillic letters, the
/// transliterated Latin form. Membership matters downstream, not order. The
/// set is never empty; for input with no letters at all it degenerates to a
/// single empty string, which the caller treats as unmatchable.
pub fn name_variants(name: &str) -> Vec<String> {
    let base = base_form(name);
    let transliterated = transliterate(&base);

    let mut variants = vec![base];
    if transliterated != variants[0] {
        variants.push(transliterated);
    }
    variants
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transliterate_single_letters() {
        assert_eq!(transliterate("иванов"), "ivanov");
        assert_eq!(transliterate("смирнов"), "smirnov");
    }

    #[test]
    fn test_transliterate_multi_letter_substitutions() {
        assert_eq!(transliterate("шишкин"), "shishkin");
        assert_eq!(transliterate("щукин"), "shchukin");
        assert_eq!(transliterate("жуков"), "zhukov");
    }

    #[test]
    fn test_signs_drop_to_empty() {
        assert_eq!(transliterate("гоголь"), "gogol");
        assert_eq!(transliterate("объедков"), "obedkov");
    }

    #[test]
    fn test_transliterate_is_identity_on_latin() {
        assert_eq!(transliterate("petrov"), "petrov");
    }

    #[test]
    fn test_base_form_strips_noise() {
        assert_eq!(base_form("  Иванов И.П. "), "ивановип");
        assert_eq!(base_form("O'Neill-Smith 2nd"), "oneillsmithnd");
    }

    #[test]
    fn test_opponent_key_collides_across_alphabets() {
        assert_eq!(opponent_key("Смирнов"), opponent_key("Smirnov"));
        assert_eq!(opponent_key("Смирнов"), "smirnov");
    }

    #[test]
    fn test_opponent_key_idempotent() {
        for name in ["Иванов", "Ivanov", "Щукин А.", "  mixedИмя  "] {
            let key = opponent_key(name);
            assert_eq!(opponent_key(&key), key);
        }
    }

    #[test]
    fn test_variants_never_empty() {
        assert!(!name_variants("Иванов").is_empty());
        assert!(!name_variants("...").is_empty());
    }

    #[test]
    fn test_variants_include_transliteration_for_cyrillic() {
        let variants = name_variants("Иванов");
        assert!(variants.contains(&"иванов".to_string()));
        assert!(variants.contains(&"ivanov".to_string()));

        // Pure Latin input has nothing to transliterate.
        assert_eq!(name_variants("Ivanov"), vec!["ivanov".to_string()]);
    }

    #[test]
    fn test_variants_idempotent() {
        let first = name_variants("Иванов");
        let again: Vec<String> = first
            .iter()
            .flat_map(|v| name_variants(v))
            .collect();
        // Renormalizing any variant only reproduces members of the set.
        for v in &again {
            assert!(first.contains(v), "unexpected variant {v}");
        }
    }
}
