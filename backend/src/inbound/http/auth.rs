//! Caller resolution for HTTP handlers.
//!
//! Handlers never read the session directly for authorization. This helper
//! turns the session cookie into an explicit [`Caller`] via the identity
//! port, and every core operation receives that value.

use crate::domain::Caller;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Resolve the session cookie into a caller context.
///
/// Requests without a cookie, and cookies whose user no longer exists,
/// resolve to [`Caller::Anonymous`]; the role checks inside the services
/// produce the 401/403 responses.
pub async fn resolve_caller(session: &SessionContext, state: &HttpState) -> ApiResult<Caller> {
    let user_id = session.user_id()?;
    state.identity.resolve_caller(user_id).await
}
