use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;
use shopgrade_core_types::Sensitive;

use super::{PREVIEW_AUDIENCE, PREVIEW_ISSUER};
use crate::errors::{ExError, ExErrorKind, Result};
use crate::model::ShopId;

#[derive(Debug, Serialize)]
struct PreviewTokenClaims<'a> {
    sub: String,
    aud: &'a str,
    iss: &'a str,
    iat: i64,
    exp: i64,
}

/// Sign an HS256 preview token for `shop_id`, valid for `ttl` from `now`.
///
/// # Errors
///
/// `Config` when the secret is empty, `Internal` if signing fails.
pub fn mint_preview_token(
    secret: &Sensitive<String>,
    shop_id: &ShopId,
    ttl: Duration,
    now: DateTime<Utc>,
) -> Result<Sensitive<String>> {
    if secret.is_blank() {
        return Err(ExError::new(ExErrorKind::Config)
            .with_op("mint_preview_token")
            .with_message("preview token secret is not configured"));
    }

    let claims = PreviewTokenClaims {
        sub: shop_id.preview_subject(),
        aud: PREVIEW_AUDIENCE,
        iss: PREVIEW_ISSUER,
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.expose().as_bytes()),
    )
    .map(Sensitive::new)
    .map_err(|e| {
        ExError::new(ExErrorKind::Internal)
            .with_op("mint_preview_token")
            .with_shop_id(shop_id.as_str())
            .with_message(e.to_string())
    })
}
