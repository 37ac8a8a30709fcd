use crate::redirect::{RedirectRule, match_redirect};
use crate::store::RuleStore;
use arc_swap::ArcSwap;
use hyper::header::{HeaderValue, LOCATION};
use hyper::{Response, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Middleware that turns stored redirect rules into HTTP redirect responses
pub struct RedirectMiddleware {
    rules: ArcSwap<Vec<RedirectRule>>,
}

impl RedirectMiddleware {
    pub fn new(rules: Vec<RedirectRule>) -> Self {
        Self {
            rules: ArcSwap::from_pointee(rules),
        }
    }

    /// Replace the rule snapshot. In-flight lookups see either the old or
    /// the new list, never a mix.
    pub fn store_rules(&self, rules: Vec<RedirectRule>) {
        self.rules.store(Arc::new(rules));
    }

    pub fn rule_count(&self) -> usize {
        self.rules.load().len()
    }

    /// Check a request path against the current snapshot.
    /// Returns a ready-to-send redirect response, or None to fall through
    /// to normal routing.
    pub fn check(&self, path: &str) -> Option<Response<()>> {
        let rules = self.rules.load();
        let result = match_redirect(path, &rules)?;

        let status = if result.permanent {
            StatusCode::PERMANENT_REDIRECT
        } else {
            StatusCode::TEMPORARY_REDIRECT
        };

        let location = match HeaderValue::from_str(&result.destination) {
            Ok(value) => value,
            Err(_) => {
                // Fail open: serve the request normally instead of emitting
                // a redirect with a broken Location header
                warn!(
                    path = %path,
                    destination = %result.destination,
                    "Redirect destination is not a valid Location header value; skipping"
                );
                return None;
            }
        };

        debug!(
            path = %path,
            destination = %result.destination,
            permanent = result.permanent,
            "Redirecting"
        );

        Some(
            Response::builder()
                .status(status)
                .header(LOCATION, location)
                .body(())
                .unwrap(),
        )
    }
}

/// Periodically reload the rule snapshot from the store.
///
/// A failed reload keeps serving the previous snapshot and retries on the
/// next tick, so a storage outage degrades to stale rules rather than
/// dropped redirects.
pub async fn refresh_loop(
    middleware: Arc<RedirectMiddleware>,
    store: Arc<dyn RuleStore>,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        match store.list().await {
            Ok(rules) => {
                debug!(count = rules.len(), "Reloaded redirect rules");
                middleware.store_rules(rules);
            }
            Err(e) => {
                warn!(error = %e, "Failed to reload redirect rules; keeping previous snapshot");
            }
        }
    }
}
