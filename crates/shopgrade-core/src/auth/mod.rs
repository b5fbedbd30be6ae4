//! Preview-token authorization.
//!
//! The diff preview endpoint is gated by an HS256 token scoped to a single
//! shop. [`guard::AuthorizationGuard`] verifies it; [`token::mint_preview_token`]
//! issues one for operators.

pub mod guard;
pub mod token;

pub use guard::{AuthRejection, AuthorizationGuard, PreviewClaims};
pub use token::mint_preview_token;

/// Required `aud` claim
pub const PREVIEW_AUDIENCE: &str = "upgrade-preview";
/// Required `iss` claim
pub const PREVIEW_ISSUER: &str = "acme";
/// Literal prefix of the `Authorization` header value
pub const BEARER_PREFIX: &str = "Bearer ";
