use crate::errors::UpgradeError;

/// Longest accepted shop id
pub const MAX_SHOP_ID_LEN: usize = 63;

/// Validate a raw shop id
///
/// Accepts 1..=63 ASCII letters, digits, `-` or `_`. No trimming is done:
/// surrounding whitespace is a validation failure, as is anything that could
/// act as a path segment separator.
///
/// # Errors
///
/// Returns `UpgradeError::InvalidShopId` carrying the raw input.
pub fn validate_shop_id(raw: &str) -> Result<(), UpgradeError> {
    let valid = !raw.is_empty()
        && raw.len() <= MAX_SHOP_ID_LEN
        && raw
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if valid {
        Ok(())
    } else {
        Err(UpgradeError::InvalidShopId {
            raw: Some(raw.to_string()),
        })
    }
}
