use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{digest::InvalidLength, Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the base64 HMAC-SHA256 of the raw request body.
pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// Checks a LINE webhook signature against the raw request body.
///
/// The signature is the base64 encoding of HMAC-SHA256(`secret`, `raw_body`).
/// The header is compared as sent, with no trimming. The digest comparison
/// runs in constant time. Any failure along the way (empty header,
/// undecodable base64, unusable key) is a rejection.
pub fn verify(raw_body: &[u8], provided_signature: &str, secret: &[u8]) -> bool {
    if provided_signature.is_empty() {
        return false;
    }

    let Ok(expected) = STANDARD.decode(provided_signature) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
        return false;
    };
    mac.update(raw_body);

    mac.verify_slice(&expected).is_ok()
}

/// Computes the signature LINE would send for `raw_body`.
pub fn sign(raw_body: &[u8], secret: &[u8]) -> Result<String, InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(secret)?;
    mac.update(raw_body);
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}
