//! File names for the generated documents

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

static UNSAFE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9_-]+").expect("unsafe-run pattern is valid"));

static UNDERSCORES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_+").expect("underscore pattern is valid"));

/// Reduce free text to `[A-Za-z0-9_-]`, dropping diacritics (`Čížek` -> `Cizek`).
pub fn safe_file_part(input: &str) -> String {
    let stripped: String = input.nfd().filter(|c| !is_combining_mark(*c)).collect();
    let replaced = UNSAFE_RUN.replace_all(&stripped, "_");
    let collapsed = UNDERSCORES.replace_all(&replaced, "_");
    collapsed.trim_matches('_').to_string()
}

/// `<prefix>_<surname>_<first name>_<plate or VIN>`, empty parts skipped.
pub fn document_file_stem(prefix: &str, surname: &str, first_name: &str, identifier: &str) -> String {
    let mut parts = vec![prefix.to_string()];
    parts.extend(
        [surname, first_name, identifier]
            .into_iter()
            .map(safe_file_part)
            .filter(|part| !part.is_empty()),
    );
    parts.join("_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{PROTOCOL_FILE_PREFIX, SUMMARY_FILE_PREFIX};

    #[test]
    fn test_diacritics_stripped() {
        assert_eq!(safe_file_part("Čížek"), "Cizek");
        assert_eq!(safe_file_part("Řehoř Šťastný"), "Rehor_Stastny");
        assert_eq!(safe_file_part("Ůžasná Ďáblice"), "Uzasna_Dablice");
    }

    #[test]
    fn test_unsafe_runs_collapsed_and_trimmed() {
        assert_eq!(safe_file_part("  O'Brien / Smith  "), "O_Brien_Smith");
        assert_eq!(safe_file_part("__a___b__"), "a_b");
        assert_eq!(safe_file_part("1AB-2345"), "1AB-2345");
        assert_eq!(safe_file_part("***"), "");
    }

    #[test]
    fn test_document_stems() {
        assert_eq!(
            document_file_stem(PROTOCOL_FILE_PREFIX, "Novák", "Jan", "1AB2345"),
            "predavaci_protokol_Novak_Jan_1AB2345"
        );
        assert_eq!(
            document_file_stem(SUMMARY_FILE_PREFIX, "Dvořáková", "", "TMBEFF613W0123456"),
            "souhrn_predani_Dvorakova_TMBEFF613W0123456"
        );
    }
}
