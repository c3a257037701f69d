//! # Rule Scanning
//!
//! Finds top-level `selector { declarations }` blocks with a single regex.
//! There is no nesting, no at-rule handling and no comment stripping: an
//! `@media` wrapper or a comment before a rule simply becomes part of the
//! next selector's text and will not match anything.

use crate::declarations::parse_declarations;
use atelier_protocol::PropertyMap;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// One `selector { … }` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedCssRule {
    pub selector: String,
    pub declarations: PropertyMap,
}

/// Rules in source order, one per distinct selector text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StyleSheet {
    rules: Vec<ParsedCssRule>,
}

fn rule_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"([^{]+)\s*\{\s*([^}]+)\s*\}").expect("rule pattern is a valid regex")
    })
}

impl StyleSheet {
    /// Scan CSS text
    ///
    /// A selector seen again replaces the earlier declaration block in full
    /// (not per property) and keeps the earlier block's position.
    pub fn parse(css: &str) -> Self {
        let mut rules: Vec<ParsedCssRule> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for captures in rule_pattern().captures_iter(css) {
            let selector = captures[1].trim().to_string();
            let declarations = parse_declarations(captures[2].trim());

            match positions.get(&selector) {
                Some(&index) => rules[index].declarations = declarations,
                None => {
                    positions.insert(selector.clone(), rules.len());
                    rules.push(ParsedCssRule {
                        selector,
                        declarations,
                    });
                }
            }
        }

        tracing::trace!(rules = rules.len(), "scanned stylesheet");
        Self { rules }
    }

    pub fn rules(&self) -> &[ParsedCssRule] {
        &self.rules
    }

    pub fn get(&self, selector: &str) -> Option<&ParsedCssRule> {
        self.rules.iter().find(|rule| rule.selector == selector)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
