//! Operator table overrides loaded from JSON.
//!
//! ```json
//! { "operators": [ { "operator": "+", "precedence": 7, "associativity": "left" } ] }
//! ```
//!
//! Entries replace the matching operator of a base table; operators that are
//! not mentioned keep their base values.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::errors::{unspanned, CowabungaError, ErrorKind, ErrorReporting, ParseContext, SourceContext};
use crate::precedence::{Associativity, OperatorTable};
use crate::syntax::TokenKind;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperatorConfig {
    pub operators: Vec<OperatorEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperatorEntry {
    /// Operator spelling, e.g. `"<<"`.
    pub operator: String,
    pub precedence: i32,
    /// Keeps the base associativity when omitted.
    #[serde(default)]
    pub associativity: Option<Associativity>,
}

impl OperatorConfig {
    /// Parses the JSON held by `source`.
    pub fn from_source(source: &SourceContext) -> Result<Self, CowabungaError> {
        serde_json::from_str(&source.content).map_err(|e| {
            let at = offset_of(&source.content, e.line(), e.column());
            ParseContext::new(source.clone(), "config").report(
                ErrorKind::InvalidConfig {
                    message: e.to_string(),
                },
                (at..at).into(),
            )
        })
    }

    pub fn load(path: &Path) -> Result<Self, CowabungaError> {
        let name = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ParseContext::new(SourceContext::fallback(&name), "config").report(
                ErrorKind::Io {
                    path: name.clone(),
                    message: e.to_string(),
                },
                unspanned(),
            )
        })?;
        Self::from_source(&SourceContext::from_file(name, content))
    }

    /// Returns `base` with every entry applied.
    pub fn apply(&self, mut base: OperatorTable) -> Result<OperatorTable, CowabungaError> {
        let reporter = ParseContext::new(SourceContext::fallback("operator configuration"), "config");
        for entry in &self.operators {
            let Some(kind) = TokenKind::operator_from_lexeme(&entry.operator) else {
                return Err(reporter.report(
                    ErrorKind::InvalidConfig {
                        message: format!("'{}' is not a binary operator", entry.operator),
                    },
                    unspanned(),
                ));
            };
            let associativity = entry
                .associativity
                .or_else(|| base.associativity(kind.id()))
                .unwrap_or(Associativity::LeftToRight);
            debug!(operator = %entry.operator, precedence = entry.precedence, ?associativity, "operator override");
            base.set(kind.id(), entry.precedence, associativity);
        }
        Ok(base)
    }
}

/// Byte offset of a 1-based line and column, clamped to the text.
fn offset_of(text: &str, line: usize, column: usize) -> usize {
    let line_start: usize = text
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::default_operator_table;

    fn config(json: &str) -> Result<OperatorConfig, CowabungaError> {
        OperatorConfig::from_source(&SourceContext::from_file("ops.json", json))
    }

    #[test]
    fn overrides_only_named_operators() {
        let cfg = config(r#"{"operators":[{"operator":"+","precedence":9,"associativity":"right"}]}"#).unwrap();
        let table = cfg.apply(default_operator_table()).unwrap();
        let plus = TokenKind::Addition.id();
        assert_eq!(table.precedence(plus), Some(9));
        assert_eq!(table.associativity(plus), Some(Associativity::RightToLeft));
        assert_eq!(table.precedence(TokenKind::Multiplication.id()), Some(8));
    }

    #[test]
    fn omitted_associativity_keeps_the_base_value() {
        let cfg = config(r#"{"operators":[{"operator":"=","precedence":2}]}"#).unwrap();
        let table = cfg.apply(default_operator_table()).unwrap();
        assert_eq!(table.associativity(TokenKind::Assignment.id()), Some(Associativity::RightToLeft));
    }

    #[test]
    fn unknown_operator_is_rejected() {
        let cfg = config(r#"{"operators":[{"operator":"/","precedence":8}]}"#).unwrap();
        let err = cfg.apply(default_operator_table()).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidConfig { .. }));
    }

    #[test]
    fn malformed_json_points_into_the_file() {
        let err = config("{\n  \"operators\": [ oops ]\n}").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidConfig { .. }));
        // Somewhere on the second line.
        let offset = err.source_info.primary_span.offset();
        assert!((2..25).contains(&offset), "offset {}", offset);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = OperatorConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Io { .. }));
    }
}
