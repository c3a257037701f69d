//! # Element Library
//!
//! Built-in catalog of HTML elements a user can drop into the page.

use atelier_protocol::{PropertyMap, SelectedElement};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementCategory {
    Structure,
    Text,
    Form,
    Media,
}

impl ElementCategory {
    pub const ALL: [ElementCategory; 4] = [
        ElementCategory::Structure,
        ElementCategory::Text,
        ElementCategory::Form,
        ElementCategory::Media,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ElementCategory::Structure => "Structure",
            ElementCategory::Text => "Text",
            ElementCategory::Form => "Forms",
            ElementCategory::Media => "Media & Interactive",
        }
    }
}

impl fmt::Display for ElementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Library entry
#[derive(Debug, Clone, Serialize)]
pub struct ElementDefinition {
    pub tag: &'static str,
    pub category: ElementCategory,
    pub description: &'static str,
    pub self_closing: bool,
    pub attributes: &'static [&'static str],
    pub example: &'static str,
    pub default_content: Option<&'static str>,
}

impl ElementDefinition {
    /// Markup spliced into the HTML buffer
    ///
    /// This is the default content when there is one, otherwise an empty
    /// `<tag></tag>` pair. Self-closing tags get no special treatment.
    pub fn markup(&self) -> String {
        match self.default_content {
            Some(content) if !content.is_empty() => content.to_string(),
            _ => format!("<{0}></{0}>", self.tag),
        }
    }

    /// Selection the host shows right after inserting this element
    pub fn preselection(&self) -> SelectedElement {
        let properties: PropertyMap = self
            .attributes
            .iter()
            .map(|name| (name.to_string(), String::new()))
            .collect();

        SelectedElement {
            tag: self.tag.to_string(),
            properties,
            content: self.default_content.unwrap_or_default().to_string(),
        }
    }

    fn matches_query(&self, query: &str) -> bool {
        self.tag.to_lowercase().contains(query) || self.description.to_lowercase().contains(query)
    }
}

const GLOBAL: &[&str] = &["id", "class", "style"];

macro_rules! element {
    ($tag:literal, $category:ident, $description:literal, $attributes:expr, $example:literal, $content:expr) => {
        ElementDefinition {
            tag: $tag,
            category: ElementCategory::$category,
            description: $description,
            self_closing: false,
            attributes: $attributes,
            example: $example,
            default_content: $content,
        }
    };
}

static CATALOG: &[ElementDefinition] = &[
    // Structure
    element!(
        "div",
        Structure,
        "Generic container for grouping and styling elements",
        GLOBAL,
        "<div class=\"container\">\n  Content here\n</div>",
        Some("Div content")
    ),
    element!(
        "section",
        Structure,
        "Thematic section of content",
        GLOBAL,
        "<section>\n  <h2>Section title</h2>\n  <p>Content...</p>\n</section>",
        Some("<h2>Section title</h2>\n<p>Section content...</p>")
    ),
    element!(
        "article",
        Structure,
        "Independent, self-contained content",
        GLOBAL,
        "<article>\n  <h2>Article title</h2>\n  <p>Content...</p>\n</article>",
        Some("<h2>Article title</h2>\n<p>Article content...</p>")
    ),
    element!(
        "header",
        Structure,
        "Header of a page or section",
        GLOBAL,
        "<header>\n  <h1>Main title</h1>\n  <nav>Navigation...</nav>\n</header>",
        Some("<h1>Main title</h1>")
    ),
    element!(
        "footer",
        Structure,
        "Footer of a page or section",
        GLOBAL,
        "<footer>\n  <p>Copyright 2023</p>\n</footer>",
        Some("<p>Copyright 2023</p>")
    ),
    element!(
        "nav",
        Structure,
        "Navigation section (menu)",
        GLOBAL,
        "<nav>\n  <ul>\n    <li><a href=\"#\">Home</a></li>\n    <li><a href=\"#\">About</a></li>\n  </ul>\n</nav>",
        Some("<ul>\n  <li><a href=\"#\">Home</a></li>\n  <li><a href=\"#\">About</a></li>\n</ul>")
    ),
    element!(
        "aside",
        Structure,
        "Secondary or side content",
        GLOBAL,
        "<aside>\n  <h3>Note</h3>\n  <p>Additional information...</p>\n</aside>",
        Some("<h3>Note</h3>\n<p>Additional information...</p>")
    ),
    element!(
        "main",
        Structure,
        "Main content of the page",
        GLOBAL,
        "<main>\n  <h1>Main title</h1>\n  <p>Main content...</p>\n</main>",
        Some("<h1>Main title</h1>\n<p>Main content...</p>")
    ),
    // Text
    element!(
        "h1",
        Text,
        "Top-level heading (most important)",
        GLOBAL,
        "<h1>Main title</h1>",
        Some("Main title")
    ),
    element!(
        "h2",
        Text,
        "Second-level heading",
        GLOBAL,
        "<h2>Subtitle</h2>",
        Some("Subtitle")
    ),
    element!(
        "h3",
        Text,
        "Third-level heading",
        GLOBAL,
        "<h3>Section title</h3>",
        Some("Section title")
    ),
    element!(
        "p",
        Text,
        "Paragraph of text",
        GLOBAL,
        "<p>This is a paragraph of text.</p>",
        Some("This is a paragraph of text.")
    ),
    element!(
        "span",
        Text,
        "Inline container for text or elements",
        GLOBAL,
        "<p>Here is <span style=\"color: red;\">red text</span> in a paragraph.</p>",
        Some("inline text")
    ),
    element!(
        "strong",
        Text,
        "Important text (usually bold)",
        GLOBAL,
        "<p>This is <strong>very important</strong>.</p>",
        Some("important text")
    ),
    element!(
        "em",
        Text,
        "Emphasized text (usually italic)",
        GLOBAL,
        "<p>This is <em>emphasized</em>.</p>",
        Some("emphasized text")
    ),
    element!(
        "ul",
        Text,
        "Unordered (bulleted) list",
        GLOBAL,
        "<ul>\n  <li>First item</li>\n  <li>Second item</li>\n</ul>",
        Some("<li>First item</li>\n<li>Second item</li>")
    ),
    element!(
        "ol",
        Text,
        "Ordered (numbered) list",
        &["id", "class", "style", "start", "type"],
        "<ol>\n  <li>First item</li>\n  <li>Second item</li>\n</ol>",
        Some("<li>First item</li>\n<li>Second item</li>")
    ),
    element!(
        "li",
        Text,
        "List item",
        &["id", "class", "style", "value"],
        "<li>List item</li>",
        Some("List item")
    ),
    element!(
        "a",
        Text,
        "Hyperlink",
        &["href", "target", "rel", "id", "class", "style"],
        "<a href=\"https://example.com\">Visit the site</a>",
        Some("Hyperlink")
    ),
    // Forms
    element!(
        "form",
        Form,
        "Form for collecting user input",
        &["action", "method", "id", "class", "style"],
        "<form action=\"/submit\" method=\"post\">\n  <!-- Form fields -->\n</form>",
        Some("<!-- Form fields -->")
    ),
    ElementDefinition {
        tag: "input",
        category: ElementCategory::Form,
        description: "Form input field",
        self_closing: true,
        attributes: &["type", "name", "value", "placeholder", "required", "id", "class", "style"],
        example: "<input type=\"text\" name=\"username\" placeholder=\"Username\">",
        default_content: None,
    },
    element!(
        "textarea",
        Form,
        "Multi-line text area",
        &["name", "rows", "cols", "placeholder", "required", "id", "class", "style"],
        "<textarea name=\"message\" rows=\"4\" cols=\"50\">Write your message here</textarea>",
        Some("Write your message here")
    ),
    element!(
        "button",
        Form,
        "Clickable button",
        &["type", "id", "class", "style"],
        "<button type=\"submit\">Send</button>",
        Some("Button")
    ),
    element!(
        "select",
        Form,
        "Drop-down selection list",
        &["name", "id", "class", "style", "multiple", "required"],
        "<select name=\"country\">\n  <option value=\"fr\">France</option>\n  <option value=\"ca\">Canada</option>\n</select>",
        Some("<option value=\"option1\">Option 1</option>\n<option value=\"option2\">Option 2</option>")
    ),
    element!(
        "option",
        Form,
        "Option in a drop-down list",
        &["value", "selected", "id", "class", "style"],
        "<option value=\"fr\">France</option>",
        Some("Option")
    ),
    element!(
        "label",
        Form,
        "Label for a form control",
        &["for", "id", "class", "style"],
        "<label for=\"username\">Username:</label>",
        Some("Label")
    ),
    element!(
        "fieldset",
        Form,
        "Group of form controls",
        GLOBAL,
        "<fieldset>\n  <legend>Personal information</legend>\n  <!-- Form fields -->\n</fieldset>",
        Some("<legend>Field group</legend>\n<!-- Form fields -->")
    ),
    // Media & interactive
    ElementDefinition {
        tag: "img",
        category: ElementCategory::Media,
        description: "Image",
        self_closing: true,
        attributes: &["src", "alt", "width", "height", "id", "class", "style"],
        example: "<img src=\"image.jpg\" alt=\"Image description\">",
        default_content: None,
    },
    element!(
        "video",
        Media,
        "Video",
        &["src", "controls", "autoplay", "loop", "muted", "width", "height", "id", "class", "style"],
        "<video src=\"video.mp4\" controls></video>",
        Some("Your browser does not support HTML5 video.")
    ),
    element!(
        "audio",
        Media,
        "Audio",
        &["src", "controls", "autoplay", "loop", "muted", "id", "class", "style"],
        "<audio src=\"audio.mp3\" controls></audio>",
        Some("Your browser does not support HTML5 audio.")
    ),
    element!(
        "iframe",
        Media,
        "Inline frame (a web page inside the page)",
        &["src", "width", "height", "frameborder", "allowfullscreen", "id", "class", "style"],
        "<iframe src=\"https://www.example.com\" width=\"500\" height=\"300\"></iframe>",
        Some("")
    ),
    element!(
        "canvas",
        Media,
        "Drawing surface for JavaScript",
        &["width", "height", "id", "class", "style"],
        "<canvas id=\"myCanvas\" width=\"200\" height=\"200\"></canvas>",
        Some("")
    ),
    element!(
        "table",
        Media,
        "Data table",
        &["id", "class", "style", "border"],
        "<table>\n  <tr>\n    <th>Header 1</th>\n    <th>Header 2</th>\n  </tr>\n  <tr>\n    <td>Data 1</td>\n    <td>Data 2</td>\n  </tr>\n</table>",
        Some("<tr>\n  <th>Header 1</th>\n  <th>Header 2</th>\n</tr>\n<tr>\n  <td>Data 1</td>\n  <td>Data 2</td>\n</tr>")
    ),
    element!(
        "details",
        Media,
        "Disclosure widget revealing extra information",
        &["open", "id", "class", "style"],
        "<details>\n  <summary>Click for more info</summary>\n  <p>Detailed information here...</p>\n</details>",
        Some("<summary>Click for more info</summary>\n<p>Detailed information here...</p>")
    ),
];

/// Whole catalog, in display order
pub fn catalog() -> &'static [ElementDefinition] {
    CATALOG
}

pub fn find(tag: &str) -> Option<&'static ElementDefinition> {
    CATALOG.iter().find(|def| def.tag.eq_ignore_ascii_case(tag.trim()))
}

/// Case-insensitive substring search over tag and description
pub fn search(query: &str) -> Vec<&'static ElementDefinition> {
    let query = query.trim().to_lowercase();
    CATALOG
        .iter()
        .filter(|def| query.is_empty() || def.matches_query(&query))
        .collect()
}

/// Search results grouped by category; empty groups are omitted
pub fn grouped(query: &str) -> Vec<(ElementCategory, Vec<&'static ElementDefinition>)> {
    let matches = search(query);
    ElementCategory::ALL
        .into_iter()
        .filter_map(|category| {
            let group: Vec<_> = matches
                .iter()
                .copied()
                .filter(|def| def.category == category)
                .collect();
            (!group.is_empty()).then_some((category, group))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_shape() {
        assert_eq!(catalog().len(), 34);
        for category in ElementCategory::ALL {
            assert!(catalog().iter().any(|def| def.category == category));
        }

        let self_closing: Vec<_> = catalog()
            .iter()
            .filter(|def| def.self_closing)
            .map(|def| def.tag)
            .collect();
        assert_eq!(self_closing, vec!["input", "img"]);
    }

    #[test]
    fn test_markup_prefers_default_content() {
        assert_eq!(find("p").unwrap().markup(), "This is a paragraph of text.");
        assert_eq!(find("canvas").unwrap().markup(), "<canvas></canvas>");
        // Self-closing elements are not special-cased
        assert_eq!(find("img").unwrap().markup(), "<img></img>");
    }

    #[test]
    fn test_preselection_maps_attributes_to_empty() {
        let selected = find("a").unwrap().preselection();

        assert_eq!(selected.tag, "a");
        assert_eq!(selected.content, "Hyperlink");
        assert_eq!(selected.properties.len(), 6);
        assert!(selected.properties.values().all(|v| v.is_empty()));
        assert!(selected.properties.contains_key("href"));
    }

    #[test]
    fn test_find_is_case_insensitive() {
        assert_eq!(find("SECTION").map(|d| d.tag), Some("section"));
        assert!(find("marquee").is_none());
    }

    #[test]
    fn test_search_and_group() {
        let headings = search("heading");
        assert_eq!(
            headings.iter().map(|d| d.tag).collect::<Vec<_>>(),
            vec!["h1", "h2", "h3"]
        );

        let groups = grouped("list");
        let categories: Vec<_> = groups.iter().map(|(c, _)| *c).collect();
        assert_eq!(categories, vec![ElementCategory::Text, ElementCategory::Form]);

        assert_eq!(grouped("").len(), 4);
        assert!(grouped("no-such-element").is_empty());
    }
}
