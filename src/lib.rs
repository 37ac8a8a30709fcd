pub mod middleware;
pub mod redirect;
pub mod store;

pub use redirect::{MatchResult, RedirectRule, match_redirect, validate_redirect_pattern};
