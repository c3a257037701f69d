use crate::declarations::parse_declarations;
use crate::selector::Selector;
use crate::stylesheet::{ParsedCssRule, StyleSheet};
use atelier_protocol::{PropertyMap, SelectedElement};
use serde::Serialize;

/// Styles reported for the inspector
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppliedStyles {
    /// From the element's own `style` attribute
    pub inline: PropertyMap,
    /// From project CSS rules whose selector matched
    pub external: PropertyMap,
}

/// Reports which project declarations apply to an element
pub trait StyleMatcher {
    /// Rules that match, in source order
    fn matching_rules<'s>(
        &self,
        sheet: &'s StyleSheet,
        element: &SelectedElement,
    ) -> Vec<&'s ParsedCssRule>;

    /// Matching declarations merged in source order, later rules winning
    fn matched_styles(&self, css: &str, element: &SelectedElement) -> PropertyMap {
        let sheet = StyleSheet::parse(css);
        let mut styles = PropertyMap::new();

        for rule in self.matching_rules(&sheet, element) {
            styles.extend(
                rule.declarations
                    .iter()
                    .map(|(property, value)| (property.clone(), value.clone())),
            );
        }

        styles
    }

    fn applied_styles(&self, css: &str, element: &SelectedElement) -> AppliedStyles {
        AppliedStyles {
            inline: inline_styles(element),
            external: self.matched_styles(css, element),
        }
    }
}

/// Regex-scanned rules, one simple selector per rule
#[derive(Debug, Clone, Copy, Default)]
pub struct TextualMatcher;

impl StyleMatcher for TextualMatcher {
    fn matching_rules<'s>(
        &self,
        sheet: &'s StyleSheet,
        element: &SelectedElement,
    ) -> Vec<&'s ParsedCssRule> {
        sheet
            .rules()
            .iter()
            .filter(|rule| Selector::parse(&rule.selector).matches(element))
            .collect()
    }
}

/// The element's `style` attribute as a map
pub fn inline_styles(element: &SelectedElement) -> PropertyMap {
    element
        .properties
        .get("style")
        .map(|style| parse_declarations(style))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(tag: &str, attrs: &[(&str, &str)]) -> SelectedElement {
        SelectedElement {
            tag: tag.to_string(),
            properties: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            content: String::new(),
        }
    }

    #[test]
    fn test_class_rule_applies() {
        let el = element("button", &[("class", "btn primary")]);
        let styles = TextualMatcher.matched_styles(".btn { color: red; }", &el);

        assert_eq!(styles.len(), 1);
        assert_eq!(styles["color"], "red");
    }

    #[test]
    fn test_compound_selector_yields_nothing() {
        let el = element("button", &[("class", "btn primary")]);
        let styles = TextualMatcher.matched_styles(".btn.primary { color: blue; }", &el);

        assert!(styles.is_empty());
    }

    #[test]
    fn test_later_rules_override_earlier_properties() {
        let css = r#"
button { color: black; padding: 4px; }
.btn { color: red; }
#go { border: none; }
"#;
        let el = element("button", &[("class", "btn"), ("id", "go")]);
        let styles = TextualMatcher.matched_styles(css, &el);

        assert_eq!(styles["color"], "red");
        assert_eq!(styles["padding"], "4px");
        assert_eq!(styles["border"], "none");
    }

    #[test]
    fn test_no_specificity_weighting() {
        // An id rule earlier in the file loses to a tag rule later on
        let css = "#go { color: red; } button { color: blue; }";
        let el = element("button", &[("id", "go")]);

        assert_eq!(TextualMatcher.matched_styles(css, &el)["color"], "blue");
    }

    #[test]
    fn test_matching_rules_reports_selectors() {
        let sheet = StyleSheet::parse("p { margin: 0; } .lead { font-size: 2em; } h1 { color: navy; }");
        let el = element("p", &[("class", "lead")]);

        let selectors: Vec<&str> = TextualMatcher
            .matching_rules(&sheet, &el)
            .iter()
            .map(|rule| rule.selector.as_str())
            .collect();

        assert_eq!(selectors, vec!["p", ".lead"]);
    }

    #[test]
    fn test_applied_styles_splits_inline_and_external() {
        let el = element("p", &[("style", "color: blue; margin-top: 4px")]);
        let applied = TextualMatcher.applied_styles("p { color: green; }", &el);

        assert_eq!(applied.inline["color"], "blue");
        assert_eq!(applied.inline["margin-top"], "4px");
        assert_eq!(applied.external["color"], "green");
    }

    #[test]
    fn test_inline_styles_without_attribute() {
        assert!(inline_styles(&element("p", &[])).is_empty());
    }
}
