//! Search-name normalization: display names to PokeAPI slugs.

use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Spoken prefix word whose suffix goes between species and a trailing `x`/`y`.
const MEGA: &str = "mega";

const DEFAULT_PREFIXES: [(&str, &str); 8] = [
    ("alolan", "alola"),
    ("galarian", "galar"),
    ("hisuian", "hisui"),
    ("paldean", "paldea"),
    ("mega", "mega"),
    ("gigantamax", "gmax"),
    ("gmax", "gmax"),
    ("primal", "primal"),
];

/// Maps a spoken prefix word ("alolan") to the suffix token the API uses ("alola").
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrefixTable {
    entries: BTreeMap<String, String>,
}

impl Default for PrefixTable {
    fn default() -> Self {
        Self {
            entries: DEFAULT_PREFIXES
                .iter()
                .map(|(prefix, suffix)| (prefix.to_string(), suffix.to_string()))
                .collect(),
        }
    }
}

impl PrefixTable {
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Adds or replaces entries. Keys and values are normalized the same way
    /// search tokens are, so config files may use any casing.
    pub fn extend<I, K, V>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (prefix, suffix) in entries {
            let prefix = fold_token(prefix.as_ref());
            let suffix = fold_token(suffix.as_ref());
            if prefix.is_empty() || suffix.is_empty() {
                continue;
            }
            self.entries.insert(prefix, suffix);
        }
    }

    pub fn suffix_for(&self, prefix: &str) -> Option<&str> {
        self.entries.get(prefix).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(prefix, suffix)| (prefix.as_str(), suffix.as_str()))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameResolver {
    prefixes: PrefixTable,
}

impl NameResolver {
    pub fn new(prefixes: PrefixTable) -> Self {
        Self { prefixes }
    }

    pub fn prefixes(&self) -> &PrefixTable {
        &self.prefixes
    }

    /// Converts free-form input into the slug the API expects.
    ///
    /// Never fails: input that matches nothing still comes back lowercased
    /// and dash-joined.
    pub fn resolve(&self, input: &str) -> String {
        let lowered = input.trim().to_lowercase();
        let gendered = lowered.replace('♀', "-f").replace('♂', "-m");
        let mut tokens = tokenize(&gendered);

        if tokens.len() >= 2 {
            if let Some(suffix) = self.prefixes.suffix_for(&tokens[0]) {
                let suffix = suffix.to_string();
                let prefix = tokens.remove(0);
                let form_letter = tokens.len() == 2 && matches!(tokens[1].as_str(), "x" | "y");
                if prefix == MEGA && form_letter {
                    tokens.insert(1, suffix);
                } else {
                    tokens.push(suffix);
                }
            }
        }

        tokens.join("-")
    }
}

/// Installs the process-wide resolver. Only the first call wins; later calls
/// return `false` and leave the installed table untouched.
pub fn install(resolver: NameResolver) -> bool {
    RESOLVER.set(resolver).is_ok()
}

pub fn resolver() -> &'static NameResolver {
    RESOLVER.get_or_init(NameResolver::default)
}

/// Resolves with the process-wide resolver.
pub fn resolve(input: &str) -> String {
    resolver().resolve(input)
}

static RESOLVER: OnceLock<NameResolver> = OnceLock::new();

fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        if is_stripped(ch) {
            continue;
        }
        if ch.is_ascii_alphanumeric() {
            current.push(ch);
        } else if let Some(folded) = fold_diacritic(ch) {
            current.push_str(folded);
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn fold_token(text: &str) -> String {
    tokenize(&text.trim().to_lowercase()).join("-")
}

fn is_stripped(ch: char) -> bool {
    matches!(ch, '.' | '\'' | '`' | '’')
}

/// ASCII form of a lowercase Latin letter with a diacritic.
fn fold_diacritic(ch: char) -> Option<&'static str> {
    let folded = match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'æ' => "ae",
        'ç' => "c",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'ñ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'ý' | 'ÿ' => "y",
        'ß' => "ss",
        _ => return None,
    };
    Some(folded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slug(input: &str) -> String {
        NameResolver::default().resolve(input)
    }

    #[test]
    fn test_plain_names() {
        assert_eq!(slug("Pikachu"), "pikachu");
        assert_eq!(slug("  BULBASAUR "), "bulbasaur");
        assert_eq!(slug("pikachu"), "pikachu");
    }

    #[test]
    fn test_punctuation_is_stripped() {
        assert_eq!(slug("Mr. Mime"), "mr-mime");
        assert_eq!(slug("Farfetch'd"), "farfetchd");
        assert_eq!(slug("Farfetch’d"), "farfetchd");
        assert_eq!(slug("Mime Jr."), "mime-jr");
        assert_eq!(slug("Sirfetch`d"), "sirfetchd");
    }

    #[test]
    fn test_gender_symbols() {
        assert_eq!(slug("Nidoran♀"), "nidoran-f");
        assert_eq!(slug("Nidoran♂"), "nidoran-m");
        assert_eq!(slug("nidoran ♀"), "nidoran-f");
    }

    #[test]
    fn test_regional_prefixes_move_to_suffix() {
        assert_eq!(slug("Alolan Raichu"), "raichu-alola");
        assert_eq!(slug("Galarian Mr. Mime"), "mr-mime-galar");
        assert_eq!(slug("Hisuian Zorua"), "zorua-hisui");
        assert_eq!(slug("Paldean Wooper"), "wooper-paldea");
        assert_eq!(slug("Primal Kyogre"), "kyogre-primal");
    }

    #[test]
    fn test_mega_forms() {
        assert_eq!(slug("Mega Charizard X"), "charizard-mega-x");
        assert_eq!(slug("Mega Charizard Y"), "charizard-mega-y");
        assert_eq!(slug("Mega Mewtwo X"), "mewtwo-mega-x");
        assert_eq!(slug("Mega Venusaur"), "venusaur-mega");
    }

    #[test]
    fn test_mega_letter_rule_only_applies_to_mega() {
        // Two remaining tokens ending in x, but the prefix is not mega.
        assert_eq!(slug("Alolan Foo X"), "foo-x-alola");
        // Three remaining tokens: the letter rule needs exactly two.
        assert_eq!(slug("Mega Foo Bar X"), "foo-bar-x-mega");
    }

    #[test]
    fn test_gigantamax() {
        assert_eq!(slug("Gigantamax Pikachu"), "pikachu-gmax");
        assert_eq!(slug("Gmax Pikachu"), "pikachu-gmax");
    }

    #[test]
    fn test_prefix_alone_is_not_a_prefix() {
        assert_eq!(slug("Mega"), "mega");
        assert_eq!(slug("alolan"), "alolan");
    }

    #[test]
    fn test_separators_collapse() {
        assert_eq!(slug("mr -  mime"), "mr-mime");
        assert_eq!(slug("--ho-oh--"), "ho-oh");
        assert_eq!(slug("Type: Null"), "type-null");
        assert_eq!(slug("Porygon_Z"), "porygon-z");
    }

    #[test]
    fn test_diacritics_fold_to_ascii() {
        assert_eq!(slug("Flabébé"), "flabebe");
        assert_eq!(slug("Pokémon"), "pokemon");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(slug(""), "");
        assert_eq!(slug("   "), "");
        assert_eq!(slug("..."), "");
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let species = ["raichu", "charizard", "mr mime", "pikachu", "kyogre", "zorua"];
        let resolver = NameResolver::default();
        for (prefix, _) in resolver.prefixes().iter() {
            for name in species {
                for tail in ["", " x", " y"] {
                    let input = format!("{prefix} {name}{tail}");
                    let once = resolver.resolve(&input);
                    assert_eq!(resolver.resolve(&once), once, "input: {input}");
                }
            }
        }
        for input in ["Nidoran♀", "Farfetch'd", "Type: Null", "Flabébé", "Mega"] {
            let once = resolver.resolve(input);
            assert_eq!(resolver.resolve(&once), once, "input: {input}");
        }
    }

    #[test]
    fn test_slug_invariant() {
        let inputs = ["Mr. Mime", "Nidoran♂", "Mega Charizard X", "Type: Null", "Flabébé!"];
        for input in inputs {
            let out = slug(input);
            assert!(
                out.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
                "{input} -> {out}"
            );
            assert!(!out.starts_with('-') && !out.ends_with('-'));
            assert!(!out.contains("--"));
        }
    }

    #[test]
    fn test_custom_prefix_table() {
        let mut table = PrefixTable::empty();
        table.extend([("Origin", "Origin"), ("Mega", "mega")]);
        let resolver = NameResolver::new(table);
        assert_eq!(resolver.resolve("Origin Giratina"), "giratina-origin");
        assert_eq!(resolver.resolve("Alolan Raichu"), "alolan-raichu");
        assert_eq!(resolver.resolve("Mega Charizard X"), "charizard-mega-x");
    }

    #[test]
    fn test_extend_skips_blank_entries() {
        let mut table = PrefixTable::default();
        let before = table.len();
        table.extend([("", "x"), ("foo", "...")]);
        assert_eq!(table.len(), before);
    }
}
