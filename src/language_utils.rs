use isolang::Language;
use once_cell::sync::Lazy;
use regex::Regex;

/// Locale key utilities
///
/// Locale keys are opaque to the merge, but they normally are language
/// tags like "ja", "zh", or "pt-BR". These helpers let the caller warn
/// about suspicious keys and print readable names in summaries.

// @const: Loose BCP 47 shape: primary subtag plus optional subtags
static LOCALE_KEY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z]{2,3}(?:[-_][A-Za-z0-9]{2,8})*$").expect("valid locale key regex")
});

/// Check whether a key looks like a language tag
pub fn is_well_formed_locale(key: &str) -> bool {
    LOCALE_KEY_REGEX.is_match(key)
}

/// Primary language subtag of a key, lowercased ("pt-BR" -> "pt")
pub fn primary_subtag(key: &str) -> String {
    key.split(['-', '_'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

/// Resolve the primary subtag to an ISO 639 language
fn language_for(key: &str) -> Option<Language> {
    let primary = primary_subtag(key);
    match primary.len() {
        2 => Language::from_639_1(&primary),
        3 => Language::from_639_3(&primary),
        _ => None,
    }
}

/// Check whether the primary subtag is a known ISO 639-1 or 639-3 code
pub fn is_known_language(key: &str) -> bool {
    language_for(key).is_some()
}

/// English name of the language behind a key
pub fn get_language_name(key: &str) -> Option<String> {
    language_for(key).map(|lang| lang.to_name().to_string())
}

/// "ja (Japanese)", or the bare key when the language is unknown
pub fn display_locale(key: &str) -> String {
    match get_language_name(key) {
        Some(name) => format!("{} ({})", key, name),
        None => key.to_string(),
    }
}
