//! Company name normalization and candidate domain generation.
//!
//! Pure functions: the same name always produces the same canonical form and
//! the same candidate set, in the same order.

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

const TLD: &str = ".com";

/// Legal-form tokens dropped from the end of a name to find the brand.
const LEGAL_SUFFIXES: &[&str] = &[
    "inc",
    "incorporated",
    "corp",
    "corporation",
    "llc",
    "ltd",
    "limited",
    "plc",
    "sa",
    "ag",
    "gmbh",
    "co",
    "company",
    "lp",
    "llp",
    "nv",
    "bv",
    "sarl",
    "sas",
    "se",
    "kg",
    "pty",
    "pte",
];

fn is_legal_suffix(token: &str) -> bool {
    LEGAL_SUFFIXES.contains(&token)
}

/// Tokens with trailing legal suffixes removed.
///
/// "Acme Robotics Pty Ltd" gives `["acme", "robotics"]`. A name made only of
/// suffixes keeps its tokens.
pub fn brand_tokens(tokens: &[String]) -> Vec<String> {
    let end = tokens
        .iter()
        .rposition(|t| !is_legal_suffix(t))
        .map_or(tokens.len(), |i| i + 1);
    tokens[..end].to_vec()
}

/// Lowercase, decompose and drop combining marks.
pub(crate) fn fold(name: &str) -> String {
    name.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Canonical slug of a company name.
///
/// - lowercase + NFD with diacritics stripped
/// - anything outside `[a-z0-9]`, whitespace and `-` removed
/// - whitespace runs become a single hyphen, hyphen runs collapse
pub fn canonicalize(name: &str) -> String {
    let kept: String = fold(name)
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect();

    let mut canonical = String::with_capacity(kept.len());
    for c in kept.chars() {
        if c == '-' && canonical.ends_with('-') {
            continue;
        }
        canonical.push(c);
    }
    canonical.trim_matches('-').to_string()
}

/// Split a name into lowercase ASCII alphanumeric tokens.
pub fn tokenize(name: &str) -> Vec<String> {
    fold(name)
        .split(|c: char| !(c.is_ascii_lowercase() || c.is_ascii_digit()))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Candidate `.com` domains derived from a name, deduplicated in generation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateDomainSet {
    domains: Vec<String>,
}

impl CandidateDomainSet {
    fn push(&mut self, label: &str) {
        let label = label.trim_matches('-');
        if label.is_empty() {
            return;
        }
        let domain = format!("{}{}", label, TLD);
        if !self.domains.contains(&domain) {
            self.domains.push(domain);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.domains.iter().map(String::as_str)
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.domains.iter().any(|d| d == domain)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

/// A company name in canonical form with everything derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedName {
    pub original: String,
    pub canonical: String,
    pub tokens: Vec<String>,
    /// Tokens without trailing legal suffixes
    pub brand: Vec<String>,
    pub candidates: CandidateDomainSet,
}

impl NormalizedName {
    /// The `.com` domain checked against the registrar: brand tokens joined,
    /// so "Acme Robotics Ltd" asks about `acmerobotics.com`.
    pub fn registrable_domain(&self) -> Option<String> {
        (!self.brand.is_empty()).then(|| format!("{}{}", self.brand.concat(), TLD))
    }
}

/// Normalize a company name.
///
/// Candidates, in order:
/// 1. `{canonical}.com`
/// 2. the name with whitespace removed + `.com`
/// 3. with two or more tokens, the first two tokens joined and all tokens joined
pub fn normalize(name: &str) -> NormalizedName {
    let canonical = canonicalize(name);
    let tokens = tokenize(name);

    let mut candidates = CandidateDomainSet::default();
    candidates.push(&canonical);

    let compact: String = fold(name)
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect();
    candidates.push(&compact);

    if tokens.len() >= 2 {
        candidates.push(&format!("{}{}", tokens[0], tokens[1]));
        candidates.push(&tokens.concat());
    }

    NormalizedName {
        original: name.to_string(),
        canonical,
        brand: brand_tokens(&tokens),
        tokens,
        candidates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_canonical_form() {
        assert_eq!(canonicalize("Acme Robotics Ltd"), "acme-robotics-ltd");
        assert_eq!(canonicalize("  Société   Générale  "), "societe-generale");
        assert_eq!(canonicalize("AT&T Inc."), "att-inc");
        assert_eq!(canonicalize("Foo - Bar"), "foo-bar");
        assert_eq!(canonicalize("!!!"), "");
    }

    #[test]
    fn test_candidates_for_multi_token_name() {
        let name = normalize("Acme Robotics Ltd");
        let domains: Vec<&str> = name.candidates.iter().collect();
        assert_eq!(
            domains,
            vec!["acme-robotics-ltd.com", "acmeroboticsltd.com", "acmerobotics.com"]
        );
        assert_eq!(name.tokens, vec!["acme", "robotics", "ltd"]);
        assert_eq!(name.brand, vec!["acme", "robotics"]);
        assert_eq!(name.registrable_domain().as_deref(), Some("acmerobotics.com"));
    }

    #[test]
    fn test_only_trailing_legal_suffixes_are_stripped() {
        let tokens = |name: &str| tokenize(name);
        assert_eq!(brand_tokens(&tokens("Acme Pty Ltd")), vec!["acme"]);
        assert_eq!(brand_tokens(&tokens("Co-operative Bank plc")), vec!["co", "operative", "bank"]);
        assert_eq!(brand_tokens(&tokens("Limited Ltd")), vec!["limited", "ltd"]);
        assert_eq!(
            normalize("Globex Corporation").registrable_domain().as_deref(),
            Some("globex.com")
        );
    }

    #[test]
    fn test_candidates_for_single_token_name() {
        let name = normalize("Zeta");
        let domains: Vec<&str> = name.candidates.iter().collect();
        assert_eq!(domains, vec!["zeta.com"]);
    }

    #[test]
    fn test_punctuation_only_name_has_no_candidates() {
        let name = normalize("???");
        assert!(name.candidates.is_empty());
        assert_eq!(name.registrable_domain(), None);
    }

    #[test]
    fn test_accented_tokens_fold_to_ascii() {
        let name = normalize("Café Nöel");
        assert_eq!(name.tokens, vec!["cafe", "noel"]);
        assert!(name.candidates.contains("cafenoel.com"));
    }

    proptest! {
        #[test]
        fn normalize_is_deterministic(name in "\\PC{0,40}") {
            prop_assert_eq!(normalize(&name), normalize(&name));
        }

        #[test]
        fn candidates_are_lowercase_ascii(name in "\\PC{0,40}") {
            for domain in normalize(&name).candidates.iter() {
                prop_assert!(domain.ends_with(".com"));
                prop_assert!(domain.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.'));
            }
        }
    }
}
