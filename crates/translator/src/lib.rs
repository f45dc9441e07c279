use core_types::{Intent, TradingPair};

pub mod error;
pub mod payload;

pub use error::TranslateError;
pub use payload::{Amount, Endpoint, Payload, Position, SmartTradeBody};

/// Maps parsed intents onto 3Commas smart trade payloads.
///
/// The account id comes from configuration, never from the instruction text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translator {
    account_id: u64,
}

impl Translator {
    pub fn new(account_id: u64) -> Self {
        Self { account_id }
    }

    pub fn account_id(&self) -> u64 {
        self.account_id
    }

    /// Builds the payload for an intent. Pure: the same intent always yields
    /// the same payload.
    pub fn translate(&self, intent: &Intent) -> Payload {
        let position = Position {
            order_type: intent.order_type(),
            units: Amount {
                value: intent.quantity(),
            },
            price: intent.limit_price().map(|value| Amount { value }),
        };

        Payload {
            endpoint: Endpoint::for_side(intent.side()),
            body: SmartTradeBody {
                account_id: self.account_id,
                pair: exchange_pair(intent.pair()),
                position,
            },
        }
    }
}

/// Renders a pair in the aggregator's `BASE_QUOTE` notation.
pub fn exchange_pair(pair: &TradingPair) -> String {
    format!("{}_{}", pair.base(), pair.quote())
}
