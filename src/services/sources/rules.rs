// src/services/sources/rules.rs

//! Element selection rules for HTML sources.
//!
//! Each rule is a pure predicate over an [`ElementView`], testable without
//! fetching a page.

use std::collections::HashMap;

use crate::models::SourceId;

/// The parts of an HTML element a selection rule may inspect.
#[derive(Debug, Clone, Copy)]
pub struct ElementView<'a> {
    /// Lower-case tag name
    pub tag: &'a str,
    pub classes: &'a [&'a str],
    /// Element text with whitespace collapsed
    pub text: &'a str,
    pub href: Option<&'a str>,
}

/// Predicate deciding whether an element is a title candidate.
pub type SelectionRule = fn(&ElementView<'_>) -> bool;

fn any_class_contains(classes: &[&str], needles: &[&str]) -> bool {
    classes.iter().any(|class| {
        let class = class.to_lowercase();
        needles.iter().any(|needle| class.contains(needle))
    })
}

/// Paper cards on the Hugging Face daily papers page.
pub fn huggingface(el: &ElementView<'_>) -> bool {
    matches!(el.tag, "h3" | "h4" | "a")
        && any_class_contains(el.classes, &["title", "paper", "link"])
        && !el.text.to_lowercase().contains("paper")
}

/// Links to paper pages on Papers with Code.
pub fn paperswithcode(el: &ElementView<'_>) -> bool {
    el.tag == "a" && el.href.is_some_and(|href| href.contains("/paper/"))
}

/// Article headings on AI News.
pub fn ainews(el: &ElementView<'_>) -> bool {
    matches!(el.tag, "h1" | "h2" | "h3") && any_class_contains(el.classes, &["title"])
}

/// Selection rule for an HTML source, `None` for feed sources.
pub fn rule_for(source: SourceId) -> Option<SelectionRule> {
    match source {
        SourceId::Huggingface => Some(huggingface as SelectionRule),
        SourceId::Paperswithcode => Some(paperswithcode as SelectionRule),
        SourceId::Ainews => Some(ainews as SelectionRule),
        SourceId::Techcrunch | SourceId::Reddit | SourceId::Hackernews => None,
    }
}

/// All HTML selection rules keyed by source.
pub fn selection_rules() -> HashMap<SourceId, SelectionRule> {
    SourceId::ALL
        .into_iter()
        .filter_map(|id| rule_for(id).map(|rule| (id, rule)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceKind;

    fn view<'a>(tag: &'a str, classes: &'a [&'a str], text: &'a str) -> ElementView<'a> {
        ElementView {
            tag,
            classes,
            text,
            href: None,
        }
    }

    #[test]
    fn test_huggingface_rule() {
        assert!(huggingface(&view("h3", &["mb-1", "text-lg", "Title"], "Scaling LLaMA")));
        assert!(huggingface(&view("a", &["line-clamp-3", "link"], "Scaling LLaMA")));
        assert!(!huggingface(&view("div", &["title"], "Scaling LLaMA")));
        assert!(!huggingface(&view("h3", &["text-lg"], "Scaling LLaMA")));
        assert!(!huggingface(&view("h3", &["title"], "Daily Papers")));
    }

    #[test]
    fn test_paperswithcode_rule() {
        let mut el = view("a", &[], "Mixture of Depths");
        assert!(!paperswithcode(&el));
        el.href = Some("/paper/mixture-of-depths");
        assert!(paperswithcode(&el));
        el.tag = "span";
        assert!(!paperswithcode(&el));
    }

    #[test]
    fn test_ainews_rule() {
        assert!(ainews(&view("h2", &["entry-title"], "OpenAI news")));
        assert!(!ainews(&view("h4", &["entry-title"], "OpenAI news")));
        assert!(!ainews(&view("h2", &["entry-meta"], "OpenAI news")));
    }

    #[test]
    fn test_rules_exist_exactly_for_html_sources() {
        let rules = selection_rules();
        for id in SourceId::ALL {
            assert_eq!(rules.contains_key(&id), id.kind() == SourceKind::Html);
        }
    }
}
