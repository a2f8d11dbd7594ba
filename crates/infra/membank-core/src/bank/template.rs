use crate::error::{BankError, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// The five documents every memory bank holds, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Document {
    ActiveContext,
    ProductContext,
    Progress,
    DecisionLog,
    SystemPatterns,
}

impl Document {
    pub const ALL: [Self; 5] = [
        Self::ActiveContext,
        Self::ProductContext,
        Self::Progress,
        Self::DecisionLog,
        Self::SystemPatterns,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::ActiveContext => "activeContext",
            Self::ProductContext => "productContext",
            Self::Progress => "progress",
            Self::DecisionLog => "decisionLog",
            Self::SystemPatterns => "systemPatterns",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.md", self.name())
    }

    pub fn template(self) -> DocumentTemplate {
        let (title, sections) = match self {
            Self::ActiveContext => ("Active Context", ACTIVE_CONTEXT),
            Self::ProductContext => ("Product Context", PRODUCT_CONTEXT),
            Self::Progress => ("Progress", PROGRESS),
            Self::DecisionLog => ("Decision Log", DECISION_LOG),
            Self::SystemPatterns => ("System Patterns", SYSTEM_PATTERNS),
        };
        DocumentTemplate { title, sections }
    }
}

const ACTIVE_CONTEXT: &[Section] = &[
    Section::new("Current Focus", "- What is being worked on right now"),
    Section::new("Recent Changes", "- Notable changes since the last session"),
    Section::new("Open Questions", "- Unresolved questions and blockers"),
];

const PRODUCT_CONTEXT: &[Section] = &[
    Section::new("Overview", "- What this project is and who it is for"),
    Section::new("Goals", "- Outcomes the project is driving toward"),
    Section::new("Constraints", "- Technical or business limits to respect"),
];

const PROGRESS: &[Section] = &[
    Section::new("Done", "- Completed work"),
    Section::new("In Progress", "- Work currently underway"),
    Section::new("Next", "- Upcoming work"),
];

const DECISION_LOG: &[Section] = &[Section::new(
    "Decisions",
    "- Date, decision, rationale and alternatives considered",
)];

const SYSTEM_PATTERNS: &[Section] = &[
    Section::new("Architecture", "- Major components and how they interact"),
    Section::new("Patterns", "- Recurring design and coding patterns"),
    Section::new("Conventions", "- Naming, layout and tooling conventions"),
];

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Accepts `activeContext`, `activecontext` or `activeContext.md`.
impl FromStr for Document {
    type Err = BankError;

    fn from_str(s: &str) -> Result<Self> {
        let norm = s.trim().trim_end_matches(".md").to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|d| d.name().to_ascii_lowercase() == norm)
            .ok_or_else(|| {
                BankError::Other(anyhow::anyhow!(
                    "unknown document '{}'; expected one of activeContext, productContext, progress, decisionLog, systemPatterns",
                    s
                ))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub heading: &'static str,
    pub placeholder: &'static str,
}

impl Section {
    const fn new(heading: &'static str, placeholder: &'static str) -> Self {
        Self {
            heading,
            placeholder,
        }
    }
}

/// Initial shape of a document: a title and level-2 sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentTemplate {
    pub title: &'static str,
    pub sections: &'static [Section],
}

impl DocumentTemplate {
    /// Render with the given initialization timestamp.
    pub fn render(&self, initialized: &str) -> String {
        let mut out = format!("# {}\n\n*Initialized: {}*\n", self.title, initialized);
        for section in self.sections {
            out.push_str(&format!("\n## {}\n\n{}\n", section.heading, section.placeholder));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn render_progress() {
        let rendered = Document::Progress.template().render("2025-01-02 03:04:05");
        assert_eq!(
            rendered,
            "# Progress\n\n*Initialized: 2025-01-02 03:04:05*\n\n## Done\n\n- Completed work\n\n## In Progress\n\n- Work currently underway\n\n## Next\n\n- Upcoming work\n"
        );
    }

    #[test]
    fn every_template_has_sections() {
        for doc in Document::ALL {
            let t = doc.template();
            assert!(!t.sections.is_empty(), "{doc} has no sections");
            assert!(t.render("now").contains("## "));
        }
    }

    #[test]
    fn parse_document_names() {
        assert_eq!("activeContext".parse::<Document>().unwrap(), Document::ActiveContext);
        assert_eq!("decisionlog.md".parse::<Document>().unwrap(), Document::DecisionLog);
        assert!("notes".parse::<Document>().is_err());
    }

    #[test]
    fn file_names() {
        assert_eq!(Document::SystemPatterns.file_name(), "systemPatterns.md");
    }
}
