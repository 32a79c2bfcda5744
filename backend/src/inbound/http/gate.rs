//! Server-side route gating.
//!
//! Turns an [`authorize`] decision into an HTTP refusal: a sign-in redirect
//! becomes `401`, a home redirect becomes `403`. Both carry
//! `details.redirect` so the UI can navigate without re-deriving the rule.

use serde_json::json;
use tracing::debug;

use crate::domain::ports::SessionVault;
use crate::domain::{Decision, Error, IdentitySession, Principal, RouteClass, authorize};

/// Admit the current principal into a protected route of class `route`.
///
/// Returns the admitted principal, cloned so the session stays free for
/// [`IdentitySession::settle`].
pub fn admit<V: SessionVault>(
    identity: &IdentitySession<V>,
    route: RouteClass,
) -> Result<Principal, Error> {
    let decision = authorize(identity.principal(), route);
    match (decision, decision.location()) {
        (Decision::Allow, _) => identity.require_principal().cloned(),
        (Decision::RedirectToLogin, redirect) => {
            Err(Error::unauthorized("login required").with_details(json!({ "redirect": redirect })))
        }
        (_, redirect) => {
            debug!(route = route.as_str(), ?decision, "route refused");
            Err(
                Error::forbidden(format!("{} routes are not available to this account", route.as_str()))
                    .with_details(json!({ "redirect": redirect })),
            )
        }
    }
}
