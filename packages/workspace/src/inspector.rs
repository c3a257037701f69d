//! # Element Inspector
//!
//! Read-only view of the selected element: its attributes, the styles
//! that apply to it, and the places in the project script that refer to it.
//!
//! The inspector never writes back. `update-element` exists in the protocol
//! (see [`crate::HostHandle::send_element_update`]) but no inspector path
//! emits it.

use atelier_protocol::{PropertyMap, SelectedElement};
use atelier_styles::{AppliedStyles, StyleMatcher};
use regex::Regex;
use serde::Serialize;

/// `on*` attribute and its handler code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventAttribute {
    pub event: String,
    pub handler: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassReference {
    pub class: String,
    pub count: usize,
}

/// Script lines that may touch the element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScriptReferences {
    pub event_attributes: Vec<EventAttribute>,
    /// `getElementById('<id>')` and `querySelector('#<id>')` occurrences
    pub id_references: usize,
    pub class_references: Vec<ClassReference>,
}

impl ScriptReferences {
    pub fn is_empty(&self) -> bool {
        self.event_attributes.is_empty()
            && self.id_references == 0
            && self.class_references.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Inspection {
    pub element: SelectedElement,
    pub styles: AppliedStyles,
    pub scripts: ScriptReferences,
}

pub fn inspect(
    element: &SelectedElement,
    css: &str,
    javascript: &str,
    matcher: &dyn StyleMatcher,
) -> Inspection {
    Inspection {
        element: element.clone(),
        styles: matcher.applied_styles(css, element),
        scripts: script_references(&element.properties, javascript),
    }
}

pub fn script_references(properties: &PropertyMap, javascript: &str) -> ScriptReferences {
    let event_attributes = properties
        .iter()
        .filter(|(name, _)| name.starts_with("on"))
        .map(|(name, value)| EventAttribute {
            event: name.clone(),
            handler: value.clone(),
        })
        .collect();

    let id_references = properties
        .get("id")
        .filter(|id| !id.is_empty())
        .map(|id| {
            count_lookups(
                javascript,
                &format!(
                    r#"getElementById\(['"]{0}['"]\)|querySelector\(['"]#{0}['"]\)"#,
                    regex::escape(id)
                ),
            )
        })
        .unwrap_or(0);

    let class_references = properties
        .get("class")
        .map(|list| {
            list.split_whitespace()
                .filter_map(|class| {
                    let count = count_lookups(
                        javascript,
                        &format!(
                            r#"getElementsByClassName\(['"]{0}['"]\)|querySelector\(['"]\.{0}['"]\)"#,
                            regex::escape(class)
                        ),
                    );
                    (count > 0).then(|| ClassReference {
                        class: class.to_string(),
                        count,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    ScriptReferences {
        event_attributes,
        id_references,
        class_references,
    }
}

fn count_lookups(javascript: &str, pattern: &str) -> usize {
    match Regex::new(pattern) {
        Ok(re) => re.find_iter(javascript).count(),
        Err(e) => {
            tracing::warn!("Skipping script lookup scan: {}", e);
            0
        }
    }
}
