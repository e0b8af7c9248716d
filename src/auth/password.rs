use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Split `{encoding}value` into its parts
fn split_encoding(stored: &str) -> Option<(&str, &str)> {
    let rest = stored.strip_prefix('{')?;
    let end = rest.find('}')?;
    Some((&rest[..end], &rest[end + 1..]))
}

/// Check a presented password against stored material.
///
/// Supported encodings:
/// - `{noop}secret`: plain text, demo only
/// - `{sha256}<hex>`: lowercase hex SHA-256 of the password
///
/// Anything else never verifies.
pub fn verify_password(stored: &str, presented: &str) -> bool {
    match split_encoding(stored) {
        Some(("noop", expected)) => constant_time_eq(expected.as_bytes(), presented.as_bytes()),
        Some(("sha256", expected)) => {
            let digest = sha256_hex(presented);
            constant_time_eq(expected.to_ascii_lowercase().as_bytes(), digest.as_bytes())
        }
        Some((encoding, _)) => {
            tracing::warn!("No password encoder registered for '{{{}}}'", encoding);
            false
        }
        None => {
            tracing::warn!("Stored password has no {{encoding}} prefix");
            false
        }
    }
}

/// Produce `{sha256}<hex>` material for a password
pub fn encode_sha256(password: &str) -> String {
    format!("{{sha256}}{}", sha256_hex(password))
}

fn sha256_hex(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
