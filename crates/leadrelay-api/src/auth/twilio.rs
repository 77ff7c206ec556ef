/// Twilio request signature validation
///
/// Twilio signs each webhook with HMAC-SHA1 keyed by the account auth token.
/// The signed data is the full request URL followed by every form parameter
/// as `key + value`, sorted by key. JSON bodies are not part of the signed
/// data; instead the URL carries a `bodySHA256` query parameter holding the
/// hex SHA-256 of the body.
use base64::{Engine, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use leadrelay_core::constants::TWILIO_BODY_HASH_PARAM;
use sha1::Sha1;
use sha2::{Digest, Sha256};

type HmacSha1 = Hmac<Sha1>;

fn signing_mac(auth_token: &str, url: &str, params: &[(String, String)]) -> Option<HmacSha1> {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort();

    let mut mac = HmacSha1::new_from_slice(auth_token.as_bytes()).ok()?;
    mac.update(url.as_bytes());
    for (key, value) in sorted {
        mac.update(key.as_bytes());
        mac.update(value.as_bytes());
    }
    Some(mac)
}

/// Base64 signature Twilio sends for this URL and parameter set
pub fn compute_signature(auth_token: &str, url: &str, params: &[(String, String)]) -> String {
    signing_mac(auth_token, url, params)
        .map(|mac| STANDARD.encode(mac.finalize().into_bytes()))
        .unwrap_or_default()
}

/// Checks `signature` in constant time
pub fn verify_signature(
    auth_token: &str,
    url: &str,
    params: &[(String, String)],
    signature: &str,
) -> bool {
    let Ok(signature) = STANDARD.decode(signature.trim()) else {
        return false;
    };
    signing_mac(auth_token, url, params).is_some_and(|mac| mac.verify_slice(&signature).is_ok())
}

/// Hex SHA-256 of a request body, as carried in `bodySHA256`
pub fn body_sha256(body: &[u8]) -> String {
    hex::encode(Sha256::digest(body))
}

/// Whether a non-form body matches the `bodySHA256` query parameter.
/// An empty body needs no hash.
pub fn body_matches_hash(query: Option<&str>, body: &[u8]) -> bool {
    let declared = query.and_then(|q| {
        url::form_urlencoded::parse(q.as_bytes())
            .find(|(key, _)| key == TWILIO_BODY_HASH_PARAM)
            .map(|(_, value)| value.into_owned())
    });

    match declared {
        Some(hash) => hash.eq_ignore_ascii_case(&body_sha256(body)),
        None => body.is_empty(),
    }
}

/// Decodes an `application/x-www-form-urlencoded` body into signing parameters
pub fn form_params(body: &[u8]) -> Vec<(String, String)> {
    url::form_urlencoded::parse(body)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}
