use super::pattern::CompiledPattern;
use super::rule::{MatchResult, RedirectRule};
use std::collections::HashMap;

/// Find the first rule matching `pathname` and produce a redirect decision.
///
/// Rules are evaluated in list order (first-match-wins). A rule whose source
/// equals the pathname exactly short-circuits with the destination verbatim,
/// before any placeholder interpretation. A rule whose source fails to
/// compile is skipped; it never aborts the scan. No match is `None`, which
/// is the normal outcome for most requests.
///
/// Pure function of its inputs: no I/O, no logging, no mutation.
pub fn match_redirect(pathname: &str, rules: &[RedirectRule]) -> Option<MatchResult> {
    for rule in rules {
        if rule.source == pathname {
            return Some(MatchResult {
                destination: rule.destination.clone(),
                permanent: rule.permanent,
            });
        }

        let pattern = match CompiledPattern::compile(&rule.source) {
            Ok(pattern) => pattern,
            Err(_) => continue,
        };

        if let Some(bindings) = pattern.captures(pathname) {
            return Some(MatchResult {
                destination: substitute(&rule.destination, &bindings),
                permanent: rule.permanent,
            });
        }
    }

    None
}

/// Replace every bound `{{name}}` token in the destination template.
/// Tokens with no binding are left as literal text; bound values are
/// inserted as-is, with no re-encoding.
fn substitute(template: &str, bindings: &HashMap<String, String>) -> String {
    let mut out = template.to_string();
    for (name, value) in bindings {
        let token = format!("{{{{{name}}}}}");
        if out.contains(&token) {
            out = out.replace(&token, value);
        }
    }
    out
}
