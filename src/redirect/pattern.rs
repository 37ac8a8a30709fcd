use percent_encoding::percent_decode_str;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("Unclosed placeholder starting at byte {0}")]
    UnclosedPlaceholder(usize),

    #[error("Empty placeholder name at byte {0}")]
    EmptyPlaceholder(usize),

    #[error("Invalid placeholder name `{0}`: only letters, digits, and underscores are allowed")]
    InvalidPlaceholderName(String),

    #[error("Invalid pattern expression: {0}")]
    InvalidExpression(#[from] regex::Error),
}

/// A source pattern compiled into a structural path matcher.
///
/// Each `{{name}}` placeholder becomes a capture matching a single path
/// segment; everything else is matched literally, path separators included.
#[derive(Debug)]
pub struct CompiledPattern {
    regex: Regex,
    names: Vec<String>,
}

impl CompiledPattern {
    pub fn compile(source: &str) -> Result<Self, PatternError> {
        let mut expr = String::with_capacity(source.len() + 16);
        let mut names = Vec::new();
        expr.push('^');

        let mut rest = source;
        let mut offset = 0;
        while let Some(start) = rest.find("{{") {
            expr.push_str(&regex::escape(&rest[..start]));

            let after = &rest[start + 2..];
            let end = after
                .find("}}")
                .ok_or(PatternError::UnclosedPlaceholder(offset + start))?;
            let name = &after[..end];

            if name.is_empty() {
                return Err(PatternError::EmptyPlaceholder(offset + start));
            }
            if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(PatternError::InvalidPlaceholderName(name.to_string()));
            }

            // Positional group: placeholder names are free of the naming
            // rules regex imposes on named captures
            expr.push_str("([^/]+)");
            names.push(name.to_string());

            offset += start + 2 + end + 2;
            rest = &after[end + 2..];
        }
        expr.push_str(&regex::escape(rest));
        expr.push('$');

        let regex = Regex::new(&expr)?;

        Ok(Self { regex, names })
    }

    /// Structural test without extracting bindings.
    pub fn matches(&self, pathname: &str) -> bool {
        self.regex.is_match(pathname)
    }

    /// Test `pathname` and, on a match, return placeholder bindings.
    /// Captured values are percent-decoded.
    pub fn captures(&self, pathname: &str) -> Option<HashMap<String, String>> {
        let caps = self.regex.captures(pathname)?;

        let mut bindings = HashMap::with_capacity(self.names.len());
        for (i, name) in self.names.iter().enumerate() {
            if let Some(m) = caps.get(i + 1) {
                bindings.insert(name.clone(), decode_segment(m.as_str()));
            }
        }
        Some(bindings)
    }

    /// Placeholder names in source order. A name repeated in the pattern
    /// appears once per occurrence; its last capture wins in the bindings.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

fn decode_segment(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

/// Result of validating a candidate source pattern.
#[derive(Debug, Clone, Serialize)]
pub struct PatternValidation {
    pub valid: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Check whether a candidate source pattern is compilable.
///
/// Intended for rule-authoring tooling before a rule is persisted. Never
/// panics; all failures are reported in the return value.
pub fn validate_redirect_pattern(source: &str) -> PatternValidation {
    match CompiledPattern::compile(source) {
        Ok(_) => PatternValidation {
            valid: true,
            error: None,
        },
        Err(e) => PatternValidation {
            valid: false,
            error: Some(e.to_string()),
        },
    }
}

/// List the well-formed `{{name}}` tokens in a pattern, deduplicated,
/// in order of first appearance. Malformed tokens are skipped.
pub fn placeholder_names(pattern: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut rest = pattern;

    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else { break };
        let name = &after[..end];

        if !name.is_empty()
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
            && !names.iter().any(|n| n == name)
        {
            names.push(name.to_string());
        }

        rest = &after[end + 2..];
    }

    names
}

/// Authoring-time lint: flag destination placeholders with no matching
/// capture in the source. Advisory only; matching leaves such tokens
/// unsubstituted at runtime.
pub fn lint_rule(source: &str, destination: &str) -> Vec<String> {
    let bound = placeholder_names(source);

    placeholder_names(destination)
        .into_iter()
        .filter(|name| !bound.contains(name))
        .map(|name| {
            format!("destination placeholder `{{{{{name}}}}}` has no matching capture in source")
        })
        .collect()
}
