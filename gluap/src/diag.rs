//! Errors and diagnostics.
//!
//! Everything that can go wrong in a parse is reported as a value implementing [`Diagnostic`],
//! which converts into a [`Diag`]. `Diag`s are rendered with source excerpts through
//! `codespan-reporting`.

use codespan_reporting::diagnostic::{Diagnostic as CsDiagnostic, Label, Severity};
use codespan_reporting::files::{self, SimpleFile};
use codespan_reporting::term::termcolor::NoColor;
use codespan_reporting::term::{self, Config};

use crate::span::Span;

pub trait Diagnostic {
    fn into_diag(self) -> Diag;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diag {
    kind: DiagKind,
    message: String,
    primary: Option<DiagLabel>,
    notes: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagKind {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagLabel {
    span: Span,
    label: String,
}

impl DiagLabel {
    pub fn new(span: Span, label: impl Into<String>) -> Self {
        Self {
            span,
            label: label.into(),
        }
    }
}

impl Diag {
    pub fn new(kind: DiagKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            primary: None,
            notes: Vec::new(),
        }
    }

    pub fn with_primary(mut self, span: Span, label: impl Into<String>) -> Self {
        self.primary = Some(DiagLabel::new(span, label));
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn kind(&self) -> DiagKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn primary_span(&self) -> Option<Span> {
        self.primary.as_ref().map(|label| label.span)
    }

    fn to_codespan(&self) -> CsDiagnostic<()> {
        let severity = match self.kind {
            DiagKind::Warning => Severity::Warning,
            DiagKind::Error => Severity::Error,
        };

        let labels = self
            .primary
            .iter()
            .map(|l| Label::primary((), l.span.range()).with_message(&l.label))
            .collect();

        CsDiagnostic::new(severity)
            .with_message(&self.message)
            .with_labels(labels)
            .with_notes(self.notes.clone())
    }
}

/// Render diagnostics against the source they were produced from.
///
/// `name` is used as the file name in the rendered output.
pub fn render<D: Diagnostic>(
    name: &str,
    source: &str,
    diags: impl IntoIterator<Item = D>,
) -> Result<String, files::Error> {
    let file = SimpleFile::new(name, source);
    let config = Config::default();
    let mut writer = NoColor::new(Vec::new());

    for diag in diags {
        term::emit(&mut writer, &config, &file, &diag.into_diag().to_codespan())?;
    }

    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

impl Diagnostic for Diag {
    fn into_diag(self) -> Diag {
        self
    }
}
