//! Fluent construction of [`DiagnosticMessage`]s.

use crate::diagnostic::{DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage, MessageContent};
use crate::location::SourceLocation;

/// Builds a diagnostic one part at a time.
///
/// Problem statements say what must hold ("must", "can't"); hints that
/// suggest an action end with a question mark.
///
/// ```
/// use tcs_error_reporting::DiagnosticMessageBuilder;
///
/// let error = DiagnosticMessageBuilder::error("List Item Kind Mismatch")
///     .with_code("T-2-8")
///     .problem("List `tlvs` holds `<int>` items, the overlay adds `<string>` items")
///     .add_detail("Overlay file: `overlay/streamline/tlvs.xml`")
///     .add_hint("Use `overlay=\"overwrite\"` to replace the list?")
///     .build();
///
/// assert_eq!(error.code.as_deref(), Some("T-2-8"));
/// assert_eq!(error.details.len(), 1);
/// assert_eq!(error.hints.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct DiagnosticMessageBuilder {
    message: DiagnosticMessage,
}

impl DiagnosticMessageBuilder {
    pub fn new(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        Self {
            message: DiagnosticMessage::new(kind, title),
        }
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, title)
    }

    /// Catalog code, `T-<subsystem>-<number>`.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.message.code = Some(code.into());
        self
    }

    pub fn problem(mut self, statement: impl Into<MessageContent>) -> Self {
        self.message.problem = Some(statement.into());
        self
    }

    pub fn with_location(self, location: SourceLocation) -> Self {
        self.with_location_opt(Some(location))
    }

    pub fn with_location_opt(mut self, location: Option<SourceLocation>) -> Self {
        self.message.location = location;
        self
    }

    /// An ✖ detail.
    pub fn add_detail(self, detail: impl Into<MessageContent>) -> Self {
        self.push_detail(DetailKind::Error, detail.into())
    }

    /// An ℹ detail.
    pub fn add_info(self, info: impl Into<MessageContent>) -> Self {
        self.push_detail(DetailKind::Info, info.into())
    }

    /// A • detail.
    pub fn add_note(self, note: impl Into<MessageContent>) -> Self {
        self.push_detail(DetailKind::Note, note.into())
    }

    pub fn add_hint(mut self, hint: impl Into<MessageContent>) -> Self {
        self.message.hints.push(hint.into());
        self
    }

    fn push_detail(mut self, kind: DetailKind, content: MessageContent) -> Self {
        self.message.details.push(DetailItem {
            kind,
            content,
            location: None,
        });
        self
    }

    pub fn build(self) -> DiagnosticMessage {
        self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_kinds() {
        assert_eq!(DiagnosticMessageBuilder::error("e").build().kind, DiagnosticKind::Error);
        assert_eq!(
            DiagnosticMessageBuilder::new(DiagnosticKind::Warning, "w").build().kind,
            DiagnosticKind::Warning
        );
    }

    #[test]
    fn test_builder_details_keep_order() {
        let msg = DiagnosticMessageBuilder::error("Test")
            .add_detail("Detail 1")
            .add_info("Info 1")
            .add_note("Note 1")
            .build();

        assert_eq!(msg.details.len(), 3);
        assert_eq!(msg.details[0].kind, DetailKind::Error);
        assert_eq!(msg.details[1].kind, DetailKind::Info);
        assert_eq!(msg.details[2].kind, DetailKind::Note);
    }

    #[test]
    fn test_builder_optional_location() {
        let msg = DiagnosticMessageBuilder::error("Test")
            .with_location_opt(None)
            .build();
        assert!(msg.location.is_none());

        let msg = DiagnosticMessageBuilder::error("Test")
            .with_location_opt(Some(SourceLocation::new(None, 1, 2)))
            .build();
        assert_eq!(msg.location, Some(SourceLocation::new(None, 1, 2)));
    }
}
