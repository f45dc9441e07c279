use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("The instruction message is empty.")]
    Empty,

    #[error("Could not determine whether the order is a buy or sell.")]
    MissingSide,

    #[error("The instruction mentions both buying and selling.")]
    AmbiguousSide,

    #[error("No trading pair detected in the instruction.")]
    MissingPair,

    #[error("Several trading pairs detected in the instruction: {0}.")]
    AmbiguousPair(String),

    #[error("No quantity detected in the instruction.")]
    MissingQuantity,

    #[error("No limit price found in the instruction while a limit order was requested.")]
    MissingLimitPrice,

    #[error("The instruction asks for both a market and a limit order.")]
    ConflictingOrderType,

    #[error("Too many numbers for a {order_type} order (found {found}: {tokens}).")]
    AmbiguousNumbers {
        order_type: &'static str,
        found: usize,
        tokens: String,
    },

    #[error("'{0}' is not a strictly positive number.")]
    NonPositiveNumber(String),

    #[error("'{0}' is not a valid number.")]
    InvalidNumber(String),

    #[error("Invalid order: {0}")]
    InvalidIntent(#[from] core_types::CoreError),
}
