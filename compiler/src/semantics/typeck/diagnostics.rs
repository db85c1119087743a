//! Diagnostics shared by the semantic passes.
//!
//! Passes report problems in the analysed program as `SemanticDiagnostic`
//! values and keep going; an `AstError` is reserved for a tree the pass
//! cannot walk at all.

use std::collections::HashSet;
use std::fmt;

use smallc_core::Location;

/// Enumerates semantic error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticErrorCode {
    UnresolvedSymbol,
    DuplicateSymbol,
    TypeMismatch,
    ExpectedBoolean,
    ArityMismatch,
    MalformedTree,
}

/// Semantic diagnostic payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SemanticDiagnostic {
    /// Human-readable message summarising the issue.
    pub message: String,
    /// Source location of the offending node.
    pub location: Location,
    /// Categorical identifier for programmatic handling.
    pub code: SemanticErrorCode,
}

impl SemanticDiagnostic {
    pub fn new(message: impl Into<String>, location: Location, code: SemanticErrorCode) -> Self {
        Self {
            message: message.into(),
            location,
            code,
        }
    }
}

impl fmt::Display for SemanticDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}: {}", self.location, self.code, self.message)
    }
}

/// Ordered diagnostic sink that drops exact repeats.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<SemanticDiagnostic>,
    seen: HashSet<SemanticDiagnostic>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>, location: Location, code: SemanticErrorCode) {
        let diagnostic = SemanticDiagnostic::new(message, location, code);
        if self.seen.insert(diagnostic.clone()) {
            self.diagnostics.push(diagnostic);
        }
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_vec(self) -> Vec<SemanticDiagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeats_are_reported_once() {
        let mut sink = DiagnosticSink::new();
        let at = Location::new(3, 7);
        sink.push("unknown variable `x`", at, SemanticErrorCode::UnresolvedSymbol);
        sink.push("unknown variable `x`", at, SemanticErrorCode::UnresolvedSymbol);
        sink.push("unknown variable `x`", Location::new(4, 1), SemanticErrorCode::UnresolvedSymbol);
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn display_leads_with_the_location() {
        let diag = SemanticDiagnostic::new(
            "duplicate definition of variable `y`",
            Location::new(2, 5),
            SemanticErrorCode::DuplicateSymbol,
        );
        assert_eq!(
            diag.to_string(),
            "2:5 DuplicateSymbol: duplicate definition of variable `y`"
        );
    }
}
