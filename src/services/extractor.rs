// src/services/extractor.rs

//! Keyword extraction against the term dictionary.

use regex::Regex;

use crate::error::{AppError, Result};
use crate::models::TermDictionary;

/// A dictionary term compiled into a whole-word matcher.
#[derive(Debug)]
struct CompiledTerm {
    canonical_form: String,
    pattern: Regex,
}

/// Matches text against a [`TermDictionary`] on word boundaries.
///
/// A term matches only when the characters on both sides of it are
/// non-word characters or string edges, so `AI` never matches inside
/// `said`. Word characters are Unicode alphanumerics and `_`, which keeps
/// terms that end in punctuation (`GPT-4`, `C++`) matchable.
#[derive(Debug)]
pub struct KeywordExtractor {
    terms: Vec<CompiledTerm>,
}

impl KeywordExtractor {
    pub fn new(dictionary: &TermDictionary) -> Result<Self> {
        let terms = dictionary
            .lookup_terms()
            .iter()
            .map(|entry| {
                let needle = regex::escape(&entry.canonical_form.to_lowercase());
                let pattern = Regex::new(&format!(r"(?:^|[^\w]){needle}(?:[^\w]|$)"))
                    .map_err(|e| {
                        AppError::config(format!(
                            "Term '{}' cannot be compiled: {}",
                            entry.canonical_form, e
                        ))
                    })?;
                Ok(CompiledTerm {
                    canonical_form: entry.canonical_form.clone(),
                    pattern,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { terms })
    }

    /// Canonical forms found in `raw_text`.
    ///
    /// The result has no duplicates and is ordered by dictionary declaration
    /// order, so taking its first N items is reproducible.
    pub fn extract(&self, raw_text: &str) -> Vec<String> {
        if raw_text.trim().is_empty() {
            return Vec::new();
        }
        let haystack = raw_text.to_lowercase();

        self.terms
            .iter()
            .filter(|term| term.pattern.is_match(&haystack))
            .map(|term| term.canonical_form.clone())
            .collect()
    }
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        let dictionary = TermDictionary::default();
        Self::new(&dictionary).unwrap_or_else(|e| {
            log::error!("Default term dictionary failed to compile: {}", e);
            Self { terms: Vec::new() }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_TERMS;

    fn extractor(terms: &[&str]) -> KeywordExtractor {
        KeywordExtractor::new(&TermDictionary::new(terms.iter().copied())).unwrap()
    }

    #[test]
    fn test_extracts_canonical_forms() {
        let ex = KeywordExtractor::default();
        let found = ex.extract("OpenAI releases GPT-4 update");
        assert_eq!(found, vec!["GPT-4".to_string(), "OpenAI".to_string()]);
    }

    #[test]
    fn test_canonical_casing_not_source_casing() {
        let ex = KeywordExtractor::default();
        assert_eq!(ex.extract("new llama weights"), vec!["LLaMA".to_string()]);
    }

    #[test]
    fn test_word_boundary() {
        let ex = extractor(&["AI"]);
        assert!(ex.extract("saidAI").is_empty());
        assert!(ex.extract("he said so").is_empty());
        assert_eq!(ex.extract("AI, said the report"), vec!["AI".to_string()]);
    }

    #[test]
    fn test_more_specific_version_does_not_leak() {
        let ex = KeywordExtractor::default();
        let found = ex.extract("Hands-on with GPT-4o");
        assert!(found.contains(&"GPT-4o".to_string()));
        assert!(!found.contains(&"GPT-4".to_string()));
    }

    #[test]
    fn test_multi_word_terms_need_full_phrase() {
        let ex = KeywordExtractor::default();
        assert!(ex.extract("Deep fakes and learning rates").is_empty());
        assert_eq!(
            ex.extract("A survey of deep learning"),
            vec!["Deep Learning".to_string()]
        );
    }

    #[test]
    fn test_terms_ending_in_punctuation() {
        let ex = extractor(&["C++"]);
        assert_eq!(ex.extract("Fast C++ kernels"), vec!["C++".to_string()]);
        assert!(ex.extract("C++x").is_empty());
    }

    #[test]
    fn test_empty_and_unmatched() {
        let ex = KeywordExtractor::default();
        assert!(ex.extract("").is_empty());
        assert!(ex.extract("   ").is_empty());
        assert!(ex.extract("Weather report for Tuesday").is_empty());
    }

    #[test]
    fn test_results_come_from_dictionary_only() {
        let ex = KeywordExtractor::default();
        let text = "Meta and Microsoft ship RLHF, LoRA and RAG tooling for LLM apps";
        for term in ex.extract(text) {
            assert!(DEFAULT_TERMS.contains(&term.as_str()));
        }
    }

    #[test]
    fn test_order_is_declaration_order() {
        let ex = KeywordExtractor::default();
        let text = "RAG with LoRA on LLaMA by Meta";
        let first = ex.extract(text);
        assert_eq!(first, vec!["LLaMA", "Meta", "RAG", "LoRA"]);
        assert_eq!(first, ex.extract(text));
    }
}
