//! Caller identity extractor.
//!
//! The platform's auth gateway verifies the client's token and forwards the
//! account id in a trusted header (see `FUNCTIONS_CALLER_HEADER`). A missing
//! or blank header means the call is anonymous; rejecting anonymous calls is
//! left to each function so the error uses the callable envelope.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use kirana_core::AccountId;
use tracing::Span;

use crate::error::set_sentry_user;
use crate::state::AppState;

/// The authenticated caller, if any.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Caller(caller): Caller) -> impl IntoResponse {
///     match caller {
///         Some(uid) => format!("Hello, {uid}!"),
///         None => "Hello, anonymous!".to_string(),
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(pub Option<AccountId>);

impl Caller {
    #[must_use]
    pub const fn account(&self) -> Option<&AccountId> {
        self.0.as_ref()
    }
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let caller = parts
            .headers
            .get(&state.config().caller_header)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|uid| !uid.is_empty())
            .map(AccountId::new);

        if let Some(uid) = &caller {
            Span::current().record("caller", uid.as_str());
            set_sentry_user(uid);
        }

        Ok(Self(caller))
    }
}
