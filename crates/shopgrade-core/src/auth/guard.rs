use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::Value;
use shopgrade_core_types::schema::EVENT_REJECT;
use shopgrade_core_types::Sensitive;
use thiserror::Error;

use super::{BEARER_PREFIX, PREVIEW_AUDIENCE, PREVIEW_ISSUER};
use crate::model::ShopId;

/// Why a preview request was refused
///
/// `Display` yields the short reason reported to callers;
/// [`AuthRejection::category`] is the finer label written to logs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthRejection {
    /// No (or an empty) signing secret is configured: nobody gets in
    #[error("invalid token")]
    SecretNotConfigured,

    #[error("missing bearer token")]
    MissingBearer,

    /// Signature, algorithm, claim or expiry check failed
    #[error("invalid token")]
    VerificationFailed { detail: String },

    /// Claims verified but `exp` is not a finite number
    #[error("invalid token")]
    ExpiryNotNumeric,
}

impl AuthRejection {
    /// Short reason: `"missing bearer token"` or `"invalid token"`
    pub fn reason(&self) -> String {
        self.to_string()
    }

    /// Stable log label for the failure
    pub fn category(&self) -> &'static str {
        match self {
            AuthRejection::SecretNotConfigured => "secret_not_configured",
            AuthRejection::MissingBearer => "missing_bearer",
            AuthRejection::VerificationFailed { .. } => "verification_failed",
            AuthRejection::ExpiryNotNumeric => "expiry_not_numeric",
        }
    }
}

/// Claims of an accepted preview token
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewClaims {
    pub subject: String,
    /// `exp` as seconds since the epoch
    pub expires_at: f64,
}

/// Verifies preview bearer tokens for one deployment
///
/// The secret is injected at construction. An absent or empty secret is kept
/// as "no secret" and every request is then rejected.
#[derive(Debug, Clone)]
pub struct AuthorizationGuard {
    secret: Option<Sensitive<String>>,
}

impl AuthorizationGuard {
    pub fn new(secret: Option<Sensitive<String>>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_blank()),
        }
    }

    /// True when a usable secret is configured
    pub fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }

    /// Authorize a preview request for `shop_id`
    ///
    /// `authorization` is the raw `Authorization` header value, if any.
    /// Every rejection is logged with the shop id and the failure category;
    /// the token itself is never logged.
    ///
    /// # Errors
    ///
    /// Returns the [`AuthRejection`] describing the first failed check.
    pub fn authorize(
        &self,
        shop_id: &ShopId,
        authorization: Option<&str>,
    ) -> Result<PreviewClaims, AuthRejection> {
        self.check(shop_id, authorization).inspect_err(|rejection| {
            let detail = match rejection {
                AuthRejection::VerificationFailed { detail } => detail.as_str(),
                _ => "",
            };
            tracing::warn!(
                component = module_path!(),
                op = "authorize_preview",
                event = EVENT_REJECT,
                shop_id = shop_id.as_str(),
                reason = rejection.category(),
                detail,
                "preview authorization rejected"
            );
        })
    }

    fn check(
        &self,
        shop_id: &ShopId,
        authorization: Option<&str>,
    ) -> Result<PreviewClaims, AuthRejection> {
        let Some(secret) = &self.secret else {
            return Err(AuthRejection::SecretNotConfigured);
        };

        let token = authorization
            .and_then(|header| header.strip_prefix(BEARER_PREFIX))
            .map(Sensitive::new)
            .ok_or(AuthRejection::MissingBearer)?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[PREVIEW_AUDIENCE]);
        validation.set_issuer(&[PREVIEW_ISSUER]);
        validation.sub = Some(shop_id.preview_subject());
        validation.set_required_spec_claims(&["exp", "aud", "iss", "sub"]);
        validation.leeway = 0;

        let data = decode::<Value>(
            token.expose(),
            &DecodingKey::from_secret(secret.expose().as_bytes()),
            &validation,
        )
        .map_err(|e| AuthRejection::VerificationFailed {
            detail: format!("{:?}", e.kind()),
        })?;

        let expires_at = data
            .claims
            .get("exp")
            .and_then(Value::as_f64)
            .filter(|exp| exp.is_finite())
            .ok_or(AuthRejection::ExpiryNotNumeric)?;

        Ok(PreviewClaims {
            subject: shop_id.preview_subject(),
            expires_at,
        })
    }
}
