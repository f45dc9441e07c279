use configuration::mask;
use serde::Serialize;
use std::collections::BTreeMap;

pub const API_KEY_HEADER: &str = "APIKEY";
pub const SIGNATURE_HEADER: &str = "Signature";
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";

const REDACTED: &str = "<redacted>";

/// A fully built and signed request, ready to be transmitted.
///
/// Holds live credential material; only [`RequestDescription`] leaves the client.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub method: &'static str,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl SignedRequest {
    /// A printable copy with the signature removed and the API key masked.
    /// Method, URL and body are kept byte-for-byte.
    pub fn describe(&self) -> RequestDescription {
        let headers = self
            .headers
            .iter()
            .map(|(name, value)| {
                let shown = match name.as_str() {
                    SIGNATURE_HEADER => REDACTED.to_string(),
                    API_KEY_HEADER => mask(value),
                    _ => value.clone(),
                };
                (name.clone(), shown)
            })
            .collect();

        RequestDescription {
            method: self.method.to_string(),
            url: self.url.clone(),
            headers,
            body: self.body.clone(),
        }
    }
}

/// What a dry run returns instead of sending the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestDescription {
    pub method: String,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}
