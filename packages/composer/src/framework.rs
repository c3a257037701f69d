use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const BOOTSTRAP_URL: &str = "https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css";
const TAILWIND_URL: &str = "https://cdn.jsdelivr.net/npm/tailwindcss@2.2.19/dist/tailwind.min.css";

/// CSS framework linked into the preview head
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CssFramework {
    /// Plain CSS, nothing linked
    #[default]
    Pure,
    Tailwind,
    Bootstrap,
}

impl CssFramework {
    pub fn as_str(&self) -> &'static str {
        match self {
            CssFramework::Pure => "pure",
            CssFramework::Tailwind => "tailwind",
            CssFramework::Bootstrap => "bootstrap",
        }
    }

    pub fn stylesheet_url(&self) -> Option<&'static str> {
        match self {
            CssFramework::Pure => None,
            CssFramework::Tailwind => Some(TAILWIND_URL),
            CssFramework::Bootstrap => Some(BOOTSTRAP_URL),
        }
    }

    /// `<link>` tag for the head, if any
    pub fn link_tag(&self) -> Option<String> {
        self.stylesheet_url()
            .map(|url| format!("<link href=\"{url}\" rel=\"stylesheet\">"))
    }
}

impl fmt::Display for CssFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CssFramework {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pure" | "none" | "" => Ok(CssFramework::Pure),
            "tailwind" => Ok(CssFramework::Tailwind),
            "bootstrap" => Ok(CssFramework::Bootstrap),
            other => Err(format!("unknown CSS framework: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_tags() {
        assert_eq!(CssFramework::Pure.link_tag(), None);
        assert_eq!(
            CssFramework::Bootstrap.link_tag().unwrap(),
            "<link href=\"https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css\" rel=\"stylesheet\">"
        );
        assert!(CssFramework::Tailwind
            .link_tag()
            .unwrap()
            .contains("tailwindcss@2.2.19"));
    }

    #[test]
    fn test_parse() {
        assert_eq!("Tailwind".parse::<CssFramework>(), Ok(CssFramework::Tailwind));
        assert_eq!("none".parse::<CssFramework>(), Ok(CssFramework::Pure));
        assert!("bulma".parse::<CssFramework>().is_err());
    }
}
