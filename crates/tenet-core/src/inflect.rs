//! English inflections for model and association names.
//!
//! Covers the regular rules plus a short irregular table; enough to infer
//! target types and key columns from conventional declarations.

use heck::{ToSnakeCase, ToUpperCamelCase};

const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("mouse", "mice"),
    ("ox", "oxen"),
];

const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "news",
    "metadata",
];

/// Singular words ending in `s` that take `es` in the plural.
const SIBILANT_SINGULARS: &[&str] = &["alias", "status", "bus"];

/// Stems of Greek `-sis` nouns, plural `-ses`.
const SIS_STEMS: &[&str] = &[
    "analy", "ba", "diagno", "hypothe", "parenthe", "progno", "synop", "the",
];

/// `comment` -> `comments`, `category` -> `categories`.
pub fn pluralize(word: &str) -> String {
    let (head, last) = split_last_segment(word);
    if UNCOUNTABLE.contains(&last) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(s, _)| *s == last) {
        return format!("{}{}", head, plural);
    }
    if IRREGULAR.iter().any(|(_, p)| *p == last) {
        return word.to_string();
    }

    let plural = if let Some(stem) = last.strip_suffix("sis") {
        format!("{}ses", stem)
    } else if let Some(stem) = last.strip_suffix('y') {
        if stem.ends_with(|c: char| "aeiou".contains(c)) {
            format!("{}s", last)
        } else {
            format!("{}ies", stem)
        }
    } else if ["s", "x", "z", "ch", "sh"].iter().any(|s| last.ends_with(s)) {
        format!("{}es", last)
    } else {
        format!("{}s", last)
    };
    format!("{}{}", head, plural)
}

/// `comments` -> `comment`, `categories` -> `category`.
pub fn singularize(word: &str) -> String {
    let (head, last) = split_last_segment(word);
    if UNCOUNTABLE.contains(&last) {
        return word.to_string();
    }
    if let Some((singular, _)) = IRREGULAR.iter().find(|(_, p)| *p == last) {
        return format!("{}{}", head, singular);
    }

    let singular = if let Some(stem) = last
        .strip_suffix("es")
        .filter(|stem| SIBILANT_SINGULARS.iter().any(|s| stem.ends_with(s)))
    {
        stem.to_string()
    } else if let Some(stem) = last
        .strip_suffix("ses")
        .filter(|stem| SIS_STEMS.contains(stem))
    {
        format!("{}sis", stem)
    } else if let Some(stem) = last.strip_suffix("ies") {
        format!("{}y", stem)
    } else if let Some(stem) = ["sses", "xes", "zes", "ches", "shes"]
        .iter()
        .find_map(|s| last.strip_suffix(s).map(|stem| (stem, &s[..s.len() - 2])))
    {
        format!("{}{}", stem.0, stem.1)
    } else if last.ends_with("ss") || last.ends_with("us") || last.ends_with("is") {
        last.to_string()
    } else if let Some(stem) = last.strip_suffix('s') {
        stem.to_string()
    } else {
        last.to_string()
    };
    format!("{}{}", head, singular)
}

/// `line_item` -> `LineItem`.
pub fn camelize(word: &str) -> String {
    word.to_upper_camel_case()
}

/// `LineItem` -> `line_item`. Namespaces are dropped first.
pub fn underscore(type_name: &str) -> String {
    demodulize(type_name).to_snake_case()
}

/// `Admin::User` -> `User`.
pub fn demodulize(type_name: &str) -> &str {
    type_name.rsplit("::").next().unwrap_or(type_name)
}

/// `Admin::User` -> `user_id`.
pub fn foreign_key(type_name: &str) -> String {
    format!("{}_id", underscore(type_name))
}

// Inflect only the last `_`-separated word so `line_item` -> `line_items`.
fn split_last_segment(word: &str) -> (&str, &str) {
    match word.rfind('_') {
        Some(pos) => (&word[..=pos], &word[pos + 1..]),
        None => ("", word),
    }
}
