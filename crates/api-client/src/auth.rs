use hmac::{Hmac, Mac};
use sha2::Sha256;

// Create a type alias for the HMAC-SHA256 implementation.
type HmacSha256 = Hmac<Sha256>;

/// Creates an HMAC-SHA256 signature over a canonical request string.
///
/// # Arguments
///
/// * `secret` - The user's API secret key.
/// * `canonical` - The string produced by [`canonical_string`].
///
/// # Returns
///
/// A lowercase hexadecimal string representation of the signature.
pub fn sign(secret: &str, canonical: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(canonical.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// The string a request signature is computed over: Unix timestamp in
/// seconds, upper-case method, full request path and the exact body bytes.
pub fn canonical_string(timestamp: i64, method: &str, path: &str, body: &str) -> String {
    format!("{timestamp}{}{path}{body}", method.to_uppercase())
}

/// Value of the `Signature` header: `"{timestamp}:{hex digest}"`.
pub fn signature_header(secret: &str, timestamp: i64, method: &str, path: &str, body: &str) -> String {
    let digest = sign(secret, &canonical_string(timestamp, method, path, body));
    format!("{timestamp}:{digest}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_rfc4231_test_vector() {
        assert_eq!(
            sign("Jefe", "what do ya want for nothing?"),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn canonical_string_concatenates_parts_in_order() {
        assert_eq!(
            canonical_string(1700000000, "post", "/public/api/ver1/x", "{\"a\":1}"),
            "1700000000POST/public/api/ver1/x{\"a\":1}"
        );
    }

    #[test]
    fn any_change_alters_the_signature() {
        let base = signature_header("secret", 1, "POST", "/p", "{}");
        assert_ne!(base, signature_header("other", 1, "POST", "/p", "{}"));
        assert_ne!(base, signature_header("secret", 2, "POST", "/p", "{}"));
        assert_ne!(base, signature_header("secret", 1, "POST", "/q", "{}"));
        assert_ne!(base, signature_header("secret", 1, "POST", "/p", "{ }"));
        assert!(base.starts_with("1:"));
        assert_eq!(base.len(), "1:".len() + 64);
    }
}
