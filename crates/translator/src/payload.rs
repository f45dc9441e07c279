use crate::error::TranslateError;
use core_types::{OrderSide, OrderType};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// The smart trade endpoint a payload must be posted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    SimpleBuy,
    SimpleSell,
}

impl Endpoint {
    pub fn for_side(side: OrderSide) -> Self {
        match side {
            OrderSide::Buy => Endpoint::SimpleBuy,
            OrderSide::Sell => Endpoint::SimpleSell,
        }
    }

    /// HTTP method; smart trades are always created with a POST.
    pub fn method(&self) -> &'static str {
        "POST"
    }

    /// Path relative to the API root.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::SimpleBuy => "/ver1/smart_trades/create_simple_buy",
            Endpoint::SimpleSell => "/ver1/smart_trades/create_simple_sell",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}

/// `{"value": "..."}` wrapper used for both units and price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Amount {
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Position {
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub units: Amount,
    /// Only sent for limit orders.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Amount>,
}

/// Request body of the `create_simple_{buy,sell}` endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmartTradeBody {
    pub account_id: u64,
    /// Aggregator pair notation, `BASE_QUOTE`.
    pub pair: String,
    pub position: Position,
}

/// An endpoint plus the body to send to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payload {
    pub endpoint: Endpoint,
    pub body: SmartTradeBody,
}

impl Payload {
    /// Compact JSON body. This exact string is what gets signed and sent.
    pub fn to_json(&self) -> Result<String, TranslateError> {
        Ok(serde_json::to_string(&self.body)?)
    }
}
