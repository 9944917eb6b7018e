// src/models/terms.rs

//! Static dictionary of canonical AI terms.

use std::collections::HashSet;

/// Canonical terms in declaration order.
///
/// Longer variants come before their prefixes ("GPT-4o" before "GPT-4") so
/// that truncated extraction results prefer the more specific term.
pub const DEFAULT_TERMS: &[&str] = &[
    "GPT-4o",
    "GPT-4",
    "Claude 3.5",
    "Claude 3",
    "Gemini 1.5",
    "Gemini",
    "LLaMA",
    "Mixtral",
    "Phi-3",
    "DeepSeek",
    "Qwen",
    "Nous Hermes",
    "OpenAI",
    "Anthropic",
    "Google DeepMind",
    "Meta",
    "Microsoft",
    "BERT",
    "T5",
    "PaLM",
    "Bard",
    "ChatGPT",
    "LLaVA",
    "Transformer",
    "CLIP",
    "DALL-E",
    "Midjourney",
    "Stable Diffusion",
    "RAG",
    "LoRA",
    "PEFT",
    "Fine-tuning",
    "Prompt Engineering",
    "AGI",
    "LLM",
    "Neural Network",
    "Deep Learning",
    "Machine Learning",
    "Computer Vision",
    "Natural Language Processing",
    "NLP",
    "Reinforcement Learning",
    "RLHF",
    "Constitutional AI",
];

/// One canonical term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermEntry {
    pub canonical_form: String,
}

/// Ordered, immutable term table.
#[derive(Debug, Clone)]
pub struct TermDictionary {
    entries: Vec<TermEntry>,
}

impl TermDictionary {
    /// Build a dictionary, dropping blank and repeated canonical forms.
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let entries = terms
            .into_iter()
            .map(Into::into)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty() && seen.insert(t.clone()))
            .map(|canonical_form| TermEntry { canonical_form })
            .collect();
        Self { entries }
    }

    /// Entries in declaration order.
    pub fn lookup_terms(&self) -> &[TermEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TermDictionary {
    fn default() -> Self {
        Self::new(DEFAULT_TERMS.iter().copied())
    }
}
