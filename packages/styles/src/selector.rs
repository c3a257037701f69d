use atelier_protocol::SelectedElement;

/// The three selector shapes the matcher recognises
///
/// Anything else (combinators, attribute selectors, pseudo-classes, comma
/// lists) falls into `Tag` and can only match an element whose tag name is
/// that exact text, which in practice means never.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector<'a> {
    /// `.name`; `.a.b` keeps `a.b` as the name and never matches
    Class(&'a str),
    /// `#id`
    Id(&'a str),
    /// Bare text compared against the tag name
    Tag(&'a str),
}

impl<'a> Selector<'a> {
    pub fn parse(text: &'a str) -> Self {
        if let Some(name) = text.strip_prefix('.') {
            Selector::Class(name)
        } else if let Some(id) = text.strip_prefix('#') {
            Selector::Id(id)
        } else {
            Selector::Tag(text)
        }
    }

    pub fn matches(&self, element: &SelectedElement) -> bool {
        match self {
            Selector::Class(name) => element
                .properties
                .get("class")
                .map(|classes| classes.split_whitespace().any(|class| class == *name))
                .unwrap_or(false),
            Selector::Id(id) => element
                .properties
                .get("id")
                .map(|value| value == id)
                .unwrap_or(false),
            Selector::Tag(tag) => tag.eq_ignore_ascii_case(&element.tag),
        }
    }
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
    fn test_class_selector() {
        let el = element("a", &[("class", "btn  primary")]);
        assert!(Selector::parse(".btn").matches(&el));
        assert!(Selector::parse(".primary").matches(&el));
        assert!(!Selector::parse(".bt").matches(&el));
    }

    #[test]
    fn test_compound_class_never_matches() {
        let el = element("a", &[("class", "btn primary")]);
        assert_eq!(Selector::parse(".btn.primary"), Selector::Class("btn.primary"));
        assert!(!Selector::parse(".btn.primary").matches(&el));
    }

    #[test]
    fn test_id_selector() {
        let el = element("div", &[("id", "hero")]);
        assert!(Selector::parse("#hero").matches(&el));
        assert!(!Selector::parse("#Hero").matches(&el));
        assert!(!Selector::parse("#hero").matches(&element("div", &[])));
    }

    #[test]
    fn test_tag_selector_is_case_insensitive() {
        let el = element("section", &[]);
        assert!(Selector::parse("SECTION").matches(&el));
        assert!(!Selector::parse("section p").matches(&el));
        assert!(!Selector::parse("section:hover").matches(&el));
    }
}
