//! Price values embedded in a product page's inline script
//!
//! Product pages assign their prices to a script object, e.g.
//!
//! ```text
//! o.goods.price = "15.99",
//! o.goods.market_price = "23.50",
//! ```
//!
//! The patterns are versioned together; bump [`SCRIPT_PATTERN_VERSION`]
//! whenever one of them changes.

use crate::ExtractResult;
use regex::Regex;

/// Version of the inline-script pattern set below
pub const SCRIPT_PATTERN_VERSION: u32 = 1;

/// Current selling price assignment
pub const PRICE_PATTERN: &str = r#"o\.goods\.price\s*=\s*"([^"]+)"\s*,"#;

/// Comparison (list) price assignment, present on discounted products
pub const MARKET_PRICE_PATTERN: &str = r#"o\.goods\.market_price\s*=\s*"([^"]+)"\s*,"#;

/// Raw price strings found in a page's inline script
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptPrices {
    pub price: Option<String>,
    pub market_price: Option<String>,
}

/// Compiled inline-script patterns
#[derive(Debug, Clone)]
pub struct ScriptPatterns {
    price: Regex,
    market_price: Regex,
}

impl ScriptPatterns {
    pub fn new() -> ExtractResult<Self> {
        Ok(Self {
            price: Regex::new(PRICE_PATTERN)?,
            market_price: Regex::new(MARKET_PRICE_PATTERN)?,
        })
    }

    /// Scans the raw page body for the price assignments
    pub fn prices(&self, body: &str) -> ScriptPrices {
        ScriptPrices {
            price: capture(&self.price, body),
            market_price: capture(&self.market_price, body),
        }
    }
}

fn capture(pattern: &Regex, body: &str) -> Option<String> {
    pattern
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_prices() {
        let body = r#"<script>
            var o = {};
            o.goods.price = "15.99",
            o.goods.market_price = "23.50",
            o.goods.id = "3647297";
        </script>"#;

        let prices = ScriptPatterns::new().unwrap().prices(body);
        assert_eq!(prices.price.as_deref(), Some("15.99"));
        assert_eq!(prices.market_price.as_deref(), Some("23.50"));
    }

    #[test]
    fn test_price_without_market_price() {
        let body = r#"o.goods.price = "9.00","#;
        let prices = ScriptPatterns::new().unwrap().prices(body);
        assert_eq!(prices.price.as_deref(), Some("9.00"));
        assert_eq!(prices.market_price, None);
    }

    #[test]
    fn test_market_price_does_not_satisfy_price() {
        let body = r#"o.goods.market_price = "23.50","#;
        let prices = ScriptPatterns::new().unwrap().prices(body);
        assert_eq!(prices.price, None);
        assert_eq!(prices.market_price.as_deref(), Some("23.50"));
    }

    #[test]
    fn test_no_script() {
        let prices = ScriptPatterns::new().unwrap().prices("<html></html>");
        assert_eq!(prices, ScriptPrices::default());
    }
}
