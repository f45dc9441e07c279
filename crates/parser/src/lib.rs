use crate::error::ParseError;
use core_types::{Intent, OrderSide, OrderType, TradingPair};
use rust_decimal::Decimal;
use std::str::FromStr;

pub mod error;
pub mod vocabulary;

pub use vocabulary::Vocabulary;

/// Parses a free-text instruction with the default English/French vocabulary.
pub fn parse(text: &str) -> Result<Intent, ParseError> {
    InstructionParser::default().parse(text)
}

/// Rule-based extractor turning short trading instructions into an [`Intent`].
///
/// The rules run in a fixed order over normalized tokens: side, pair, numbers,
/// then order type. Anything ambiguous is rejected rather than guessed.
#[derive(Debug, Clone, Default)]
pub struct InstructionParser {
    vocabulary: Vocabulary,
}

impl InstructionParser {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn parse(&self, text: &str) -> Result<Intent, ParseError> {
        let raw_tokens = split_tokens(text);
        if raw_tokens.is_empty() {
            return Err(ParseError::Empty);
        }
        let tokens: Vec<String> = raw_tokens.iter().map(|t| t.to_lowercase()).collect();

        let side = self.detect_side(&tokens)?;
        let pair = self.detect_pair(&raw_tokens)?;
        let numbers = numeric_tokens(&tokens)?;
        let order_type = self.detect_order_type(&tokens)?;

        let intent = match (order_type, numbers.as_slice()) {
            (_, []) => return Err(ParseError::MissingQuantity),
            (OrderType::Market, [(_, quantity)]) => Intent::market(side, pair, *quantity)?,
            (OrderType::Limit, [_]) => return Err(ParseError::MissingLimitPrice),
            (OrderType::Limit, [(_, quantity), (_, price)]) => {
                Intent::limit(side, pair, *quantity, *price)?
            }
            (order_type, numbers) => {
                return Err(ParseError::AmbiguousNumbers {
                    order_type: order_type.as_str(),
                    found: numbers.len(),
                    tokens: numbers
                        .iter()
                        .map(|(raw, _)| raw.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                });
            }
        };

        tracing::debug!(%intent, "Parsed instruction.");
        Ok(intent)
    }

    fn detect_side(&self, tokens: &[String]) -> Result<OrderSide, ParseError> {
        let buy = tokens.iter().any(|t| self.vocabulary.is_buy(t));
        let sell = tokens.iter().any(|t| self.vocabulary.is_sell(t));

        match (buy, sell) {
            (true, false) => Ok(OrderSide::Buy),
            (false, true) => Ok(OrderSide::Sell),
            (true, true) => Err(ParseError::AmbiguousSide),
            (false, false) => Err(ParseError::MissingSide),
        }
    }

    /// Tokens written like a symbol (`BTCUSDT`, `btc/usdt`) are looked at first.
    /// Plain lower-case words are only tried when none of those is a pair, and
    /// known words such as `meilleur` or `valeur` never are.
    fn detect_pair(&self, raw_tokens: &[String]) -> Result<TradingPair, ParseError> {
        let (explicit, plain): (Vec<&String>, Vec<&String>) = raw_tokens
            .iter()
            .filter(|t| !self.vocabulary.is_not_a_pair(&t.to_lowercase()))
            .partition(|t| looks_like_symbol(t));

        let mut pairs = self.distinct_pairs(explicit);
        if pairs.is_empty() {
            pairs = self.distinct_pairs(plain);
        }

        match pairs.len() {
            0 => Err(ParseError::MissingPair),
            1 => Ok(pairs.remove(0)),
            _ => Err(ParseError::AmbiguousPair(
                pairs.iter().map(TradingPair::symbol).collect::<Vec<_>>().join(", "),
            )),
        }
    }

    fn distinct_pairs<'a>(&self, tokens: impl IntoIterator<Item = &'a String>) -> Vec<TradingPair> {
        let mut pairs: Vec<TradingPair> = Vec::new();
        for pair in tokens.into_iter().filter_map(|t| self.pair_from_token(t)) {
            if !pairs.contains(&pair) {
                pairs.push(pair);
            }
        }
        pairs
    }

    /// Recognises `BTCUSDT` as well as `BTC/USDT`, `BTC-USDT` and `BTC_USDT`.
    fn pair_from_token(&self, token: &str) -> Option<TradingPair> {
        if !token.is_ascii() {
            return None;
        }
        let upper = token.to_ascii_uppercase();

        let (base, quote) = match upper.split_once(['/', '-', '_']) {
            Some((base, quote)) => {
                let quote_ok = (3..=5).contains(&quote.len())
                    && quote.chars().all(|c| c.is_ascii_alphabetic());
                if !quote_ok {
                    return None;
                }
                (base, quote)
            }
            None => self.vocabulary.split_symbol(&upper)?,
        };

        let base_ok = (2..=10).contains(&base.len())
            && base.chars().all(|c| c.is_ascii_alphanumeric())
            && base.chars().any(|c| c.is_ascii_alphabetic());
        if !base_ok {
            return None;
        }

        TradingPair::new(base, quote).ok()
    }

    fn detect_order_type(&self, tokens: &[String]) -> Result<OrderType, ParseError> {
        let limit = tokens.iter().any(|t| self.vocabulary.is_limit(t));
        let market = tokens.iter().any(|t| self.vocabulary.is_market(t));

        match (limit, market) {
            (true, true) => Err(ParseError::ConflictingOrderType),
            (true, false) => Ok(OrderType::Limit),
            // No keyword means a market order.
            (false, _) => Ok(OrderType::Market),
        }
    }
}

/// Splits on whitespace and strips punctuation around each token, keeping the
/// original case. French elisions (`l'achat`) keep only the word after the apostrophe.
fn split_tokens(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|raw| {
            let cleaned = raw
                .trim_matches(|c: char| {
                    matches!(
                        c,
                        ',' | ';' | ':' | '!' | '?' | '"' | '\'' | '’' | '(' | ')' | '[' | ']'
                            | '«' | '»' | '“' | '”' | '@' | '$' | '€'
                    )
                })
                .trim_end_matches('.');
            match cleaned.rfind(['\'', '’']) {
                Some(idx) => cleaned[idx..].chars().skip(1).collect(),
                None => cleaned.to_string(),
            }
        })
        .filter(|t| !t.is_empty())
        .collect()
}

/// Upper-case codes (`BTCUSDT`, `ETHBTC`) or tokens with a pair separator.
fn looks_like_symbol(token: &str) -> bool {
    token.contains(['/', '-', '_'])
        || (token.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
            && token.chars().any(|c| c.is_ascii_uppercase()))
}

/// A decimal literal with an optional sign and at most one `.` or `,` separator.
fn is_numeric_literal(token: &str) -> bool {
    let digits = token.strip_prefix(['+', '-']).unwrap_or(token);
    let mut separators = 0;
    let mut has_digit = false;
    for c in digits.chars() {
        match c {
            '0'..='9' => has_digit = true,
            '.' | ',' => separators += 1,
            _ => return false,
        }
    }
    has_digit && separators <= 1
}

/// Collects every numeric token in order of appearance. Any number that does
/// not fit a decimal, or is not strictly positive, fails the whole instruction.
fn numeric_tokens(tokens: &[String]) -> Result<Vec<(String, Decimal)>, ParseError> {
    tokens
        .iter()
        .filter(|t| is_numeric_literal(t))
        .map(|raw| {
            let value = Decimal::from_str(&raw.replace(',', "."))
                .map_err(|_| ParseError::InvalidNumber(raw.clone()))?;
            if value <= Decimal::ZERO {
                return Err(ParseError::NonPositiveNumber(raw.clone()));
            }
            Ok((raw.clone(), value.normalize()))
        })
        .collect()
}
