/// Keyword sets recognised by the parser, English and French.
///
/// All entries are lower-case; input tokens are lower-cased before lookup.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    pub buy: Vec<String>,
    pub sell: Vec<String>,
    pub limit: Vec<String>,
    pub market: Vec<String>,
    /// Quote assets recognised at the end of a concatenated symbol such as
    /// `BTCUSDT`. Longer codes are tried first so `USDT` wins over `USD`.
    pub quote_assets: Vec<String>,
    /// Ordinary words that end like a quote asset (`valeur` = `VAL` + `EUR`)
    /// and must not be read as a pair.
    pub not_pairs: Vec<String>,
}

const BUY_WORDS: &[&str] = &["buy", "achète", "achete", "achat", "acheter"];
const SELL_WORDS: &[&str] = &["sell", "vends", "vendre", "vend", "vente", "revends", "revendre"];
const LIMIT_WORDS: &[&str] = &["limit", "limite"];
const MARKET_WORDS: &[&str] = &["market", "marché", "marche"];
const QUOTE_ASSETS: &[&str] = &[
    "FDUSD", "USDT", "USDC", "BUSD", "TUSD", "EUR", "USD", "BTC", "ETH", "BNB",
];

const NOT_PAIRS: &[&str] = &[
    "meilleur", "valeur", "vendeur", "acheteur", "erreur", "hauteur", "teeth", "amateur",
    "secteur", "moteur", "auteur",
];

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for Vocabulary {
    fn default() -> Self {
        let mut quote_assets = owned(QUOTE_ASSETS);
        quote_assets.sort_by_key(|q| std::cmp::Reverse(q.len()));

        Self {
            buy: owned(BUY_WORDS),
            sell: owned(SELL_WORDS),
            limit: owned(LIMIT_WORDS),
            market: owned(MARKET_WORDS),
            quote_assets,
            not_pairs: owned(NOT_PAIRS),
        }
    }
}

impl Vocabulary {
    pub fn is_buy(&self, token: &str) -> bool {
        self.buy.iter().any(|w| w == token)
    }

    pub fn is_sell(&self, token: &str) -> bool {
        self.sell.iter().any(|w| w == token)
    }

    pub fn is_limit(&self, token: &str) -> bool {
        self.limit.iter().any(|w| w == token)
    }

    pub fn is_market(&self, token: &str) -> bool {
        self.market.iter().any(|w| w == token)
    }

    pub fn is_not_a_pair(&self, token: &str) -> bool {
        self.not_pairs.iter().any(|w| w == token)
    }

    /// Splits an upper-cased concatenated symbol into `(base, quote)` using the
    /// longest matching quote asset.
    pub fn split_symbol<'a>(&self, symbol: &'a str) -> Option<(&'a str, &'a str)> {
        self.quote_assets.iter().find_map(|quote| {
            let base = symbol.strip_suffix(quote.as_str())?;
            Some((base, &symbol[base.len()..]))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_quote_asset_wins() {
        let vocab = Vocabulary::default();
        assert_eq!(vocab.split_symbol("BTCUSDT"), Some(("BTC", "USDT")));
        assert_eq!(vocab.split_symbol("BTCUSD"), Some(("BTC", "USD")));
        assert_eq!(vocab.split_symbol("ETHBTC"), Some(("ETH", "BTC")));
        assert_eq!(vocab.split_symbol("XYZ"), None);
    }

    #[test]
    fn french_and_english_keywords_are_known() {
        let vocab = Vocabulary::default();
        assert!(vocab.is_buy("achète") && vocab.is_buy("buy"));
        assert!(vocab.is_sell("vends") && vocab.is_sell("sell"));
        assert!(vocab.is_limit("limite") && vocab.is_market("marché"));
        assert!(!vocab.is_buy("buyer"));
    }

    #[test]
    fn french_words_ending_in_eur_are_not_pairs() {
        let vocab = Vocabulary::default();
        assert_eq!(vocab.split_symbol("MEILLEUR"), Some(("MEILL", "EUR")));
        assert!(vocab.is_not_a_pair("meilleur") && vocab.is_not_a_pair("valeur"));
        assert!(!vocab.is_not_a_pair("btceur"));
    }
}
