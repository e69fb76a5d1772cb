//! HMAC-SHA1 request signatures (`x-hub-signature: sha1=<hex>`).

use super::handler::WebhookError;
use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Header carrying the signature of the raw POST body.
pub const SIGNATURE_HEADER: &str = "x-hub-signature";

const SIGNATURE_PREFIX: &str = "sha1=";

fn mac_for(secret: &str, payload: &[u8]) -> HmacSha1 {
    let mut mac =
        HmacSha1::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(payload);
    mac
}

/// Hex-encoded HMAC-SHA1 of `payload` keyed by the app secret.
pub fn sign_payload(secret: &str, payload: &[u8]) -> String {
    hex::encode(mac_for(secret, payload).finalize().into_bytes())
}

/// Full header value (`sha1=<hex>`) as the platform would send it.
pub fn signature_header(secret: &str, payload: &[u8]) -> String {
    format!("{}{}", SIGNATURE_PREFIX, sign_payload(secret, payload))
}

/// Check a `sha1=<hex>` header value against the payload. Comparison is constant time.
pub fn verify_signature(secret: &str, payload: &[u8], header: &str) -> Result<(), WebhookError> {
    let received = header
        .trim()
        .strip_prefix(SIGNATURE_PREFIX)
        .ok_or(WebhookError::MalformedSignature)?;
    let received = hex::decode(received).map_err(|_| WebhookError::MalformedSignature)?;
    mac_for(secret, payload)
        .verify_slice(&received)
        .map_err(|_| WebhookError::SignatureMismatch)
}
