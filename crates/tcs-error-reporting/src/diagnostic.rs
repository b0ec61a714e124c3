//! Core diagnostic message types.

use crate::location::SourceLocation;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// The kind of diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    Error,
    Warning,
    Info,
}

impl DiagnosticKind {
    fn heading(self) -> &'static str {
        match self {
            DiagnosticKind::Error => "Error",
            DiagnosticKind::Warning => "Warning",
            DiagnosticKind::Info => "Info",
        }
    }
}

/// How detail items are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailKind {
    Error,
    Info,
    Note,
}

impl DetailKind {
    fn bullet(self) -> char {
        match self {
            DetailKind::Error => '✖',
            DetailKind::Info => 'ℹ',
            DetailKind::Note => '•',
        }
    }
}

/// Text of a problem, detail or hint. Serializes as
/// `{"type": "plain" | "markdown", "content": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum MessageContent {
    Plain(String),
    Markdown(String),
}

impl MessageContent {
    pub fn as_str(&self) -> &str {
        match self {
            MessageContent::Plain(s) | MessageContent::Markdown(s) => s,
        }
    }
}

impl From<String> for MessageContent {
    fn from(s: String) -> Self {
        MessageContent::Markdown(s)
    }
}

impl From<&str> for MessageContent {
    fn from(s: &str) -> Self {
        MessageContent::Markdown(s.to_owned())
    }
}

/// One bulleted line under the problem statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailItem {
    pub kind: DetailKind,
    pub content: MessageContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

/// A diagnostic: catalog code, title, problem statement, bulleted details
/// and hints, optionally pinned to a span of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub title: String,
    pub kind: DiagnosticKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem: Option<MessageContent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<DetailItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<MessageContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

impl DiagnosticMessage {
    pub fn new(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        Self {
            code: None,
            title: title.into(),
            kind,
            problem: None,
            details: Vec::new(),
            hints: Vec::new(),
            location: None,
        }
    }

    /// `[T-2-7] Title`, or the bare title without a code.
    fn headline(&self) -> String {
        match &self.code {
            Some(code) => format!("[{}] {}", code, self.title),
            None => self.title.clone(),
        }
    }

    /// Render as text.
    ///
    /// With a location and the `source` it points into, the headline and
    /// problem are shown as an annotated snippet. Otherwise:
    ///
    /// ```text
    /// Error [T-2-7]: Empty Append-Mode List
    /// List `tlvs` has no items to append
    /// at overlay.xml:40..72
    /// ? Use `overlay="overwrite"` to clear the list?
    /// ```
    pub fn to_text(&self, source: Option<&str>) -> String {
        let snippet = self
            .location
            .as_ref()
            .zip(source)
            .and_then(|(location, content)| self.render_snippet(location, content));

        let mut out = String::new();
        match snippet {
            Some(rendered) => out.push_str(&rendered),
            None => {
                let _ = match &self.code {
                    Some(code) => writeln!(out, "{} [{}]: {}", self.kind.heading(), code, self.title),
                    None => writeln!(out, "{}: {}", self.kind.heading(), self.title),
                };
                if let Some(problem) = &self.problem {
                    let _ = writeln!(out, "{}", problem.as_str());
                }
                if let Some(location) = &self.location {
                    let _ = writeln!(out, "at {}", location);
                }
            }
        }

        for detail in &self.details {
            let _ = writeln!(out, "{} {}", detail.kind.bullet(), detail.content.as_str());
        }
        for hint in &self.hints {
            let _ = writeln!(out, "? {}", hint.as_str());
        }
        out
    }

    /// Render as JSON. Empty fields are omitted.
    ///
    /// ```
    /// use tcs_error_reporting::DiagnosticMessageBuilder;
    ///
    /// let msg = DiagnosticMessageBuilder::error("Platform Not Detected")
    ///     .with_code("T-2-9")
    ///     .build();
    /// let json = msg.to_json();
    /// assert_eq!(json["kind"], "error");
    /// assert_eq!(json["code"], "T-2-9");
    /// assert!(json.get("details").is_none());
    /// ```
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }

    fn render_snippet(&self, location: &SourceLocation, content: &str) -> Option<String> {
        use ariadne::{Color, Label, Report, ReportKind, Source};

        let file = location.file.clone().unwrap_or_else(|| "<memory>".to_owned());

        // ariadne panics on spans past the end of the source
        let end = location.end.min(content.len());
        let start = location.start.min(end);

        let (report_kind, color) = match self.kind {
            DiagnosticKind::Error => (ReportKind::Error, Color::Red),
            DiagnosticKind::Warning => (ReportKind::Warning, Color::Yellow),
            DiagnosticKind::Info => (ReportKind::Advice, Color::Cyan),
        };
        let label = self.problem.as_ref().map_or(self.title.as_str(), MessageContent::as_str);

        let mut output = Vec::new();
        Report::build(report_kind, file.clone(), start)
            .with_message(self.headline())
            .with_label(
                Label::new((file.clone(), start..end))
                    .with_message(label)
                    .with_color(color),
            )
            .finish()
            .write((file, Source::from(content)), &mut output)
            .ok()?;

        String::from_utf8(output).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DiagnosticMessageBuilder;

    #[test]
    fn test_bare_warning_is_one_line() {
        let mut msg = DiagnosticMessage::new(DiagnosticKind::Warning, "Module Not In Catalog");
        msg.code = Some("T-2-6".into());
        assert_eq!(msg.to_text(None), "Warning [T-2-6]: Module Not In Catalog\n");
    }

    #[test]
    fn test_to_text_plain() {
        let msg = DiagnosticMessageBuilder::error("Module Not In Catalog")
            .with_code("T-2-6")
            .problem("Group `modules` has no entry for `crm3`")
            .add_info("Known modules: crm1, streamline1")
            .add_hint("Add a `<string key=\"crm3\">` entry to the modules group?")
            .build();

        let text = msg.to_text(None);
        assert!(text.starts_with("Error [T-2-6]: Module Not In Catalog\n"));
        assert!(text.contains("Group `modules` has no entry for `crm3`\n"));
        assert!(text.contains("ℹ Known modules: crm1, streamline1\n"));
        assert!(text.contains("? Add a"));
    }

    #[test]
    fn test_to_text_mentions_location_without_source() {
        let msg = DiagnosticMessageBuilder::error("Malformed Configuration Element")
            .with_location(SourceLocation::new(Some("crm.xml".into()), 4, 10))
            .build();
        assert!(msg.to_text(None).contains("at crm.xml:4..10"));
    }

    #[test]
    fn test_to_text_with_source_snippet() {
        let source = "<config>\n  <group/>\n</config>\n";
        let msg = DiagnosticMessageBuilder::error("Malformed Configuration Element")
            .with_code("T-2-4")
            .problem("`group` requires a `name` attribute")
            .with_location(SourceLocation::new(Some("base.xml".into()), 11, 19))
            .build();

        let text = msg.to_text(Some(source));
        assert!(text.contains("Malformed Configuration Element"));
        assert!(text.contains("base.xml"));
    }

    #[test]
    fn test_snippet_tolerates_out_of_range_location() {
        let msg = DiagnosticMessageBuilder::error("Broken")
            .with_location(SourceLocation::new(None, 50, 80))
            .build();
        let text = msg.to_text(Some("<config/>"));
        assert!(text.contains("Broken"));
    }

    #[test]
    fn test_to_json() {
        let msg = DiagnosticMessageBuilder::error("List Item Kind Mismatch")
            .with_code("T-2-8")
            .problem("List `tlvs` holds `<int>` items, the overlay adds `<string>` items")
            .add_detail("In group `streamline1`")
            .build();

        let json = msg.to_json();
        assert_eq!(json["kind"], "error");
        assert_eq!(json["code"], "T-2-8");
        assert_eq!(json["problem"]["type"], "markdown");
        assert_eq!(json["details"][0]["kind"], "error");
        assert!(json.get("hints").is_none());
    }
}
