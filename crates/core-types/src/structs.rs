use crate::enums::{OrderSide, OrderType};
use crate::error::CoreError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A spot trading pair split into its base and quote assets.
///
/// Both legs are stored upper-cased. `symbol()` renders the concatenated
/// exchange identifier (e.g. "BTCUSDT").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradingPair {
    base: String,
    quote: String,
}

impl TradingPair {
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Result<Self, CoreError> {
        let base = base.into().to_uppercase();
        let quote = quote.into().to_uppercase();

        for (leg, value) in [("base", &base), ("quote", &quote)] {
            if value.is_empty() || !value.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(CoreError::InvalidInput(
                    format!("{leg} asset"),
                    format!("'{value}' is not an alphanumeric asset code"),
                ));
            }
        }

        Ok(Self { base, quote })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn quote(&self) -> &str {
        &self.quote
    }

    /// The concatenated exchange symbol, e.g. "BTCUSDT".
    pub fn symbol(&self) -> String {
        format!("{}{}", self.base, self.quote)
    }
}

impl fmt::Display for TradingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.base, self.quote)
    }
}

/// The structured result of parsing a trading instruction.
///
/// Fields are private so the invariants hold for every value in circulation:
/// quantity is strictly positive, and `limit_price` is present (and strictly
/// positive) exactly when the order type is `Limit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Intent {
    side: OrderSide,
    pair: TradingPair,
    quantity: Decimal,
    order_type: OrderType,
    limit_price: Option<Decimal>,
}

impl Intent {
    pub fn new(
        side: OrderSide,
        pair: TradingPair,
        quantity: Decimal,
        order_type: OrderType,
        limit_price: Option<Decimal>,
    ) -> Result<Self, CoreError> {
        if quantity <= Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "quantity".to_string(),
                format!("{quantity} is not strictly positive"),
            ));
        }

        match (order_type, limit_price) {
            (OrderType::Market, Some(price)) => {
                return Err(CoreError::InvalidInput(
                    "limit_price".to_string(),
                    format!("market orders cannot carry a price (got {price})"),
                ));
            }
            (OrderType::Limit, None) => {
                return Err(CoreError::InvalidInput(
                    "limit_price".to_string(),
                    "limit orders require a price".to_string(),
                ));
            }
            (OrderType::Limit, Some(price)) if price <= Decimal::ZERO => {
                return Err(CoreError::InvalidInput(
                    "limit_price".to_string(),
                    format!("{price} is not strictly positive"),
                ));
            }
            _ => {}
        }

        Ok(Self {
            side,
            pair,
            quantity,
            order_type,
            limit_price,
        })
    }

    pub fn market(side: OrderSide, pair: TradingPair, quantity: Decimal) -> Result<Self, CoreError> {
        Self::new(side, pair, quantity, OrderType::Market, None)
    }

    pub fn limit(
        side: OrderSide,
        pair: TradingPair,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<Self, CoreError> {
        Self::new(side, pair, quantity, OrderType::Limit, Some(price))
    }

    pub fn side(&self) -> OrderSide {
        self.side
    }

    pub fn pair(&self) -> &TradingPair {
        &self.pair
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn limit_price(&self) -> Option<Decimal> {
        self.limit_price
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.side, self.quantity, self.pair, self.order_type)?;
        if let Some(price) = self.limit_price {
            write!(f, " @ {price}")?;
        }
        Ok(())
    }
}
