//! Script injected into every composed document
//!
//! It owns hover and selection inside the sandbox and applies
//! `update-element` commands to the live DOM. The interaction mode is
//! inlined as a literal, so switching modes means recomposing.

use atelier_protocol::InteractionMode;

pub const HIGHLIGHT_CLASS: &str = "element-highlight";
pub const SELECTED_CLASS: &str = "element-selected";

const MODE_PLACEHOLDER: &str = "__INTERACTION_MODE__";

const TEMPLATE: &str = r#"(function() {
  const interactionMode = "__INTERACTION_MODE__";

  const sendMessageToHost = (type, data) => {
    window.parent.postMessage({ type, data }, '*');
  };

  let selectedElement = null;

  const setupElementSelection = () => {
    if (interactionMode !== 'selection') {
      return;
    }

    document.querySelectorAll('body *').forEach(el => {
      el.addEventListener('mouseover', (e) => {
        e.stopPropagation();
        document.querySelectorAll('.element-highlight').forEach(other =>
          other.classList.remove('element-highlight'));
        el.classList.add('element-highlight');
      });

      el.addEventListener('mouseout', () => {
        el.classList.remove('element-highlight');
      });

      el.addEventListener('click', (e) => {
        e.stopPropagation();
        e.preventDefault();

        document.querySelectorAll('.element-selected').forEach(other =>
          other.classList.remove('element-selected'));
        el.classList.add('element-selected');
        selectedElement = el;

        const properties = {};
        Array.from(el.attributes).forEach(attr => {
          properties[attr.name] = attr.value;
        });

        sendMessageToHost('element-selected', {
          type: el.tagName.toLowerCase(),
          properties,
          content: el.innerHTML
        });
      });
    });

    document.body.addEventListener('click', (e) => {
      if (e.target === document.body) {
        document.querySelectorAll('.element-selected').forEach(other =>
          other.classList.remove('element-selected'));
        selectedElement = null;
        sendMessageToHost('element-deselected', {});
      }
    });
  };

  window.addEventListener('message', (event) => {
    if (!event.data || event.data.type !== 'update-element' || !selectedElement) {
      return;
    }

    const { attributes, styles, content } = event.data.data || {};

    if (attributes) {
      Array.from(selectedElement.attributes).forEach(attr => {
        if (!['id', 'class'].includes(attr.name)) {
          selectedElement.removeAttribute(attr.name);
        }
      });
      Object.entries(attributes).forEach(([name, value]) => {
        selectedElement.setAttribute(name, value);
      });
    }

    if (styles) {
      Object.entries(styles).forEach(([property, value]) => {
        selectedElement.style[property] = value;
      });
    }

    if (content !== undefined) {
      selectedElement.innerHTML = content;
    }

    sendMessageToHost('update-element-result', { success: true });
  });

  if (document.readyState === 'complete') {
    setupElementSelection();
  } else {
    window.addEventListener('load', setupElementSelection);
  }
})();"#;

/// Runtime script text with the mode baked in
pub fn runtime_script(mode: InteractionMode) -> String {
    TEMPLATE.replace(MODE_PLACEHOLDER, mode.as_str())
}

/// Fixed rules for the hover and selection outlines
pub fn marker_styles() -> String {
    format!(
        "body {{\n  padding: 15px;\n  font-family: sans-serif;\n  line-height: 1.5;\n}}\n\
         .{HIGHLIGHT_CLASS} {{\n  outline: 2px dashed #f06292 !important;\n  outline-offset: 2px !important;\n  position: relative;\n}}\n\
         .{SELECTED_CLASS} {{\n  outline: 2px solid #dc143c !important;\n  outline-offset: 2px !important;\n  position: relative;\n}}"
    )
}
