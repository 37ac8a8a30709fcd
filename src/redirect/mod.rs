mod matcher;
mod pattern;
mod rule;

pub use matcher::match_redirect;
pub use pattern::{
    CompiledPattern, PatternError, PatternValidation, lint_rule, placeholder_names,
    validate_redirect_pattern,
};
pub use rule::{MatchResult, RedirectRule};
