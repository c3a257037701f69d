//! Arena DOM for the sandbox.

use std::fmt::Write;

/// Index of a node in its [`Dom`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Document,
    Element(ElementData),
    Text(String),
    Comment(String),
}

/// Element node: lower-case tag and attributes in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
}

impl ElementData {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.attributes.push((name.to_string(), value.to_string())),
        }
    }

    pub fn remove_attribute(&mut self, name: &str) {
        self.attributes.retain(|(n, _)| n != name);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .map(|list| list.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Mirrors `classList.add`
    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let mut classes: Vec<&str> = self
            .attribute("class")
            .map(|list| list.split_whitespace().collect())
            .unwrap_or_default();
        classes.push(class);
        let joined = classes.join(" ");
        self.set_attribute("class", &joined);
    }

    /// Mirrors `classList.remove`: the attribute stays, possibly empty
    pub fn remove_class(&mut self, class: &str) {
        let Some(list) = self.attribute("class") else {
            return;
        };
        if !list.split_whitespace().any(|c| c == class) {
            return;
        }
        let joined = list
            .split_whitespace()
            .filter(|c| *c != class)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attribute("class", &joined);
    }

    /// Mirrors `element.style[property] = value`
    ///
    /// Accepts camelCase or kebab-case names. An empty value removes the
    /// property; an emptied style attribute is removed.
    pub fn set_style_property(&mut self, property: &str, value: &str) {
        let property = kebab_case(property);
        let mut declarations: Vec<(String, String)> = self
            .attribute("style")
            .map(parse_style)
            .unwrap_or_default();

        let value = value.trim();
        match declarations.iter_mut().find(|(name, _)| *name == property) {
            Some(existing) if !value.is_empty() => existing.1 = value.to_string(),
            Some(_) => declarations.retain(|(name, _)| *name != property),
            None if !value.is_empty() => declarations.push((property, value.to_string())),
            None => {}
        }

        if declarations.is_empty() {
            self.remove_attribute("style");
        } else {
            let serialized = declarations
                .iter()
                .map(|(name, value)| format!("{name}: {value};"))
                .collect::<Vec<_>>()
                .join(" ");
            self.set_attribute("style", &serialized);
        }
    }

    pub fn style_property(&self, property: &str) -> Option<String> {
        let property = kebab_case(property);
        self.attribute("style")
            .map(parse_style)
            .unwrap_or_default()
            .into_iter()
            .find(|(name, _)| *name == property)
            .map(|(_, value)| value)
    }
}

fn parse_style(text: &str) -> Vec<(String, String)> {
    text.split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let (name, value) = (name.trim(), value.trim());
            (!name.is_empty() && !value.is_empty())
                .then(|| (name.to_ascii_lowercase(), value.to_string()))
        })
        .collect()
}

fn kebab_case(property: &str) -> String {
    let property = property.trim();
    if property.starts_with("--") {
        return property.to_string();
    }
    let mut out = String::with_capacity(property.len() + 4);
    for ch in property.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-allocated tree; detached nodes stay allocated
#[derive(Debug, Clone)]
pub struct Dom {
    nodes: Vec<Node>,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                data: NodeData::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn create(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    pub fn create_element(&mut self, element: ElementData) -> NodeId {
        self.create(NodeData::Element(element))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.create(NodeData::Text(text.into()))
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.create(NodeData::Comment(text.into()))
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Detach every child of `parent`
    pub fn clear_children(&mut self, parent: NodeId) {
        let children = std::mem::take(&mut self.nodes[parent.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0].data
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.nodes.get(id.0)?.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes.get_mut(id.0)?.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// `id` followed by its ancestors, innermost first
    pub fn ancestors_inclusive(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |node| self.parent(*node))
    }

    /// Descendants of `id` in document order, excluding `id`
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// Element descendants of `id`, like `querySelectorAll('*')` on it
    pub fn element_descendants(&self, id: NodeId) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|node| self.element(*node).is_some())
            .collect()
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        self.ancestors_inclusive(id).last() == Some(self.root())
    }

    /// Attached elements, in document order
    pub fn elements(&self) -> Vec<NodeId> {
        self.element_descendants(self.root())
    }

    pub fn find_tag(&self, tag: &str) -> Vec<NodeId> {
        self.elements()
            .into_iter()
            .filter(|node| {
                self.element(*node)
                    .map(|el| el.tag.eq_ignore_ascii_case(tag))
                    .unwrap_or(false)
            })
            .collect()
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.elements()
            .into_iter()
            .find(|node| self.element(*node).and_then(|el| el.attribute("id")) == Some(id))
    }

    pub fn with_class(&self, class: &str) -> Vec<NodeId> {
        self.elements()
            .into_iter()
            .filter(|node| self.element(*node).map(|el| el.has_class(class)).unwrap_or(false))
            .collect()
    }

    pub fn body(&self) -> Option<NodeId> {
        self.find_tag("body").into_iter().next()
    }

    /// Serialized children, like `element.innerHTML`
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        let raw = self
            .element(id)
            .map(|el| is_raw_text(&el.tag))
            .unwrap_or(false);
        for child in self.children(id) {
            self.serialize(*child, raw, &mut out);
        }
        out
    }

    /// Serialized node including its own tags
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.serialize(id, false, &mut out);
        out
    }

    fn serialize(&self, id: NodeId, raw_text_parent: bool, out: &mut String) {
        match self.data(id) {
            NodeData::Document => {
                for child in self.children(id) {
                    self.serialize(*child, false, out);
                }
            }
            NodeData::Text(text) if raw_text_parent => out.push_str(text),
            NodeData::Text(text) => out.push_str(&escape_text(text)),
            NodeData::Comment(text) => {
                let _ = write!(out, "<!--{text}-->");
            }
            NodeData::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                for (name, value) in &el.attributes {
                    let _ = write!(out, " {name}=\"{}\"", escape_attribute(value));
                }
                out.push('>');
                if is_void(&el.tag) {
                    return;
                }
                let raw = is_raw_text(&el.tag);
                for child in self.children(id) {
                    self.serialize(*child, raw, out);
                }
                let _ = write!(out, "</{}>", el.tag);
            }
        }
    }
}

fn is_void(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

fn is_raw_text(tag: &str) -> bool {
    matches!(
        tag,
        "style" | "script" | "xmp" | "iframe" | "noembed" | "noframes" | "plaintext"
    )
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('\u{a0}', "&nbsp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('\u{a0}', "&nbsp;")
        .replace('"', "&quot;")
}
