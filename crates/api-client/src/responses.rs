use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The response from a successful `create_simple_{buy,sell}` request.
///
/// Only the identifying fields are typed; everything else the API returns is
/// kept verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmartTradeResponse {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub pair: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Represents an error response from the 3Commas API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub error_attributes: Option<Value>,
}

impl ApiErrorResponse {
    pub fn describe(&self) -> String {
        let mut message = self.error.clone();
        if let Some(description) = &self.error_description {
            message.push_str(": ");
            message.push_str(description);
        }
        if let Some(attributes) = &self.error_attributes {
            message.push_str(&format!(" ({attributes})"));
        }
        message
    }
}
