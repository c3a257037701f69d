//! HTML parsing using html5ever.
//!
//! The forgiving HTML5 algorithm stands in for the browser: malformed
//! markup is repaired the same way a preview frame would repair it.

use crate::dom::{Dom, ElementData, NodeId};
use crate::SandboxError;
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, parse_fragment, LocalName, Namespace, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Parse a complete document into a fresh [`Dom`]
pub fn parse_html(html: &str) -> Result<Dom, SandboxError> {
    let rc: RcDom = parse_document(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())?;

    let mut dom = Dom::new();
    let root = dom.root();
    let mut builder = DomBuilder { dom: &mut dom };
    for child in rc.document.children.borrow().iter() {
        builder.convert_node(child, root);
    }
    Ok(dom)
}

/// Replace the children of `parent` with `html`, like `innerHTML = html`
pub fn set_inner_html(dom: &mut Dom, parent: NodeId, html: &str) -> Result<(), SandboxError> {
    let context = dom
        .element(parent)
        .map(|el| el.tag.clone())
        .ok_or(SandboxError::NotAnElement(parent.index()))?;

    let context_name = QualName::new(
        None,
        Namespace::from(HTML_NAMESPACE),
        LocalName::from(context.as_str()),
    );
    let rc: RcDom = parse_fragment(RcDom::default(), ParseOpts::default(), context_name, Vec::new())
        .from_utf8()
        .read_from(&mut html.as_bytes())?;

    dom.clear_children(parent);

    // Fragment results hang off a synthetic <html> element
    let document_children = rc.document.children.borrow();
    let mut builder = DomBuilder { dom };
    for child in document_children.iter() {
        match &child.data {
            RcNodeData::Element { name, .. } if &*name.local == "html" => {
                for nested in child.children.borrow().iter() {
                    builder.convert_node(nested, parent);
                }
            }
            _ => builder.convert_node(child, parent),
        }
    }
    Ok(())
}

struct DomBuilder<'a> {
    dom: &'a mut Dom,
}

impl DomBuilder<'_> {
    /// Convert an html5ever node into the arena under `parent`.
    fn convert_node(&mut self, rc_node: &Handle, parent: NodeId) {
        match &rc_node.data {
            RcNodeData::Document => {
                for child in rc_node.children.borrow().iter() {
                    self.convert_node(child, parent);
                }
            }

            RcNodeData::Doctype { .. } | RcNodeData::ProcessingInstruction { .. } => {}

            RcNodeData::Text { contents } => {
                // Whitespace is kept so innerHTML reads back faithfully
                let node = self.dom.create_text(contents.borrow().to_string());
                self.dom.append_child(parent, node);
            }

            RcNodeData::Comment { contents } => {
                let node = self.dom.create_comment(contents.to_string());
                self.dom.append_child(parent, node);
            }

            RcNodeData::Element { name, attrs, .. } => {
                let mut element = ElementData::new(name.local.to_string());
                for attr in attrs.borrow().iter() {
                    element.set_attribute(&attr.name.local, &attr.value);
                }

                let node = self.dom.create_element(element);
                self.dom.append_child(parent, node);

                for child in rc_node.children.borrow().iter() {
                    self.convert_node(child, node);
                }
            }
        }
    }
}
