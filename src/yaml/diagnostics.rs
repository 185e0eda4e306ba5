//! Source-annotated diagnostics for job files that fail to parse

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// A job file that could not be read back, pointing at the offending line
#[derive(Debug, Error, Diagnostic)]
#[error("cannot read job file: {message}")]
#[diagnostic(code(jobroute::yaml::syntax))]
pub struct YamlSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    message: String,
}

impl YamlSyntaxError {
    /// Create a diagnostic from a serde_yml error
    pub fn from_serde_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));

        let offset = line_col_to_offset(source, line, column);
        let message = err.to_string();
        let help = generate_help(&message);

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1)),
            help,
            message,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Convert a 1-based line/column to a byte offset, clamped to the source
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();

    let within = source[line_start.min(source.len())..]
        .char_indices()
        .take_while(|(_, c)| *c != '\n')
        .nth(column.saturating_sub(1))
        .map(|(i, _)| i)
        .unwrap_or(0);

    (line_start + within).min(source.len().saturating_sub(1))
}

/// Suggestions for the mistakes people make when hand-editing a job file
fn generate_help(message: &str) -> Option<String> {
    let msg = message.to_lowercase();

    if msg.contains("tab") {
        return Some("YAML requires spaces for indentation, not tabs.".to_string());
    }

    if msg.contains("unknown variant") && msg.contains("machining") {
        return Some(
            "department must be one of: methods, machining, sub_contracting, surface_treatment, inspection"
                .to_string(),
        );
    }

    if msg.contains("unknown variant") && msg.contains("not_ordered") {
        return Some("material status must be one of: not_ordered, rfq, ordered, received".to_string());
    }

    if msg.contains("checklist item") {
        return Some(
            "each milestone appears once; `completed_on` is set exactly when `done: true`".to_string(),
        );
    }

    if msg.contains("job id") || msg.contains("ulid") {
        return Some("`id` must look like JOB-01HXXXXXXXXXXXXXXXXXXXXXXX; do not edit it".to_string());
    }

    if msg.contains("input contains invalid characters") || msg.contains("premature end of input") {
        return Some("dates are written YYYY-MM-DD".to_string());
    }

    if msg.contains("mapping values are not allowed") {
        return Some("You may be missing a space after ':' or have incorrect indentation.".to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_to_offset() {
        let source = "line1\nline2\nline3";
        assert_eq!(line_col_to_offset(source, 1, 1), 0);
        assert_eq!(line_col_to_offset(source, 2, 1), 6);
        assert_eq!(line_col_to_offset(source, 3, 3), 14);
        assert_eq!(line_col_to_offset(source, 9, 9), 16);
    }

    #[test]
    fn test_help_for_domain_mistakes() {
        assert!(generate_help(
            "tasks[0].department: unknown variant `painting`, expected one of `methods`, `machining`"
        )
        .unwrap()
        .contains("sub_contracting"));
        assert!(generate_help("checklist item 'Purchase' appears twice").is_some());
        assert!(generate_help("some random error").is_none());
    }

    #[test]
    fn test_from_serde_error_points_into_source() {
        let source = "job_number: J-1\nquantity: [\n";
        let err = serde_yml::from_str::<serde_yml::Value>(source).unwrap_err();
        let diag = YamlSyntaxError::from_serde_error(&err, source, "J-1.job.yaml");
        assert!(!diag.message().is_empty());
        assert!(diag.span.offset() < source.len());
    }
}
