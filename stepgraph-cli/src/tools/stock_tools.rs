//! `get_stock_price` and `buy_stocks`.
//!
//! Prices come from a fixed table. `buy_stocks` pauses the run for a human decision before
//! "executing" the purchase.

use async_trait::async_trait;
use serde_json::{json, Value};
use stepgraph::{StepInput, Tool, ToolOutcome, ToolSourceError, ToolSpec};

pub const GET_STOCK_PRICE: &str = "get_stock_price";
pub const BUY_STOCKS: &str = "buy_stocks";

const PRICES: &[(&str, f64)] = &[
    ("MSFT", 200.3),
    ("AAPL", 100.4),
    ("AMZN", 150.0),
    ("RIL", 87.6),
];

/// Price per share for `symbol` (case-insensitive); 0.0 for unknown symbols.
pub fn price_of(symbol: &str) -> f64 {
    let symbol = symbol.trim().to_uppercase();
    PRICES
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, p)| *p)
        .unwrap_or(0.0)
}

fn str_arg<'a>(args: &'a Value, key: &str) -> Result<&'a str, ToolSourceError> {
    args.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| ToolSourceError::InvalidInput(format!("missing string argument '{}'", key)))
}

/// Looks up the current price of a stock symbol.
pub struct GetStockPrice;

#[async_trait]
impl Tool for GetStockPrice {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: GET_STOCK_PRICE.to_string(),
            description: Some("Get the current price of a stock symbol.".to_string()),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "symbol": { "type": "string", "description": "Ticker symbol, e.g. MSFT" }
                },
                "required": ["symbol"]
            }),
        }
    }

    async fn call(
        &self,
        arguments: Value,
        _input: &mut StepInput,
    ) -> Result<ToolOutcome, ToolSourceError> {
        let symbol = str_arg(&arguments, "symbol")?;
        Ok(ToolOutcome::Output(format!("{:?}", price_of(symbol))))
    }
}

/// Buys shares after a human approves the purchase.
///
/// The approval payload is `"Approve buying {quantity} {symbol} stocks for ${total:.2}?"`.
/// Only the decision `yes` (case-insensitive) executes the purchase.
pub struct BuyStocks;

#[async_trait]
impl Tool for BuyStocks {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: BUY_STOCKS.to_string(),
            description: Some("Buy shares of a stock. Requires human approval.".to_string()),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "symbol": { "type": "string" },
                    "quantity": { "type": "integer", "minimum": 1 },
                    "total_price": { "type": "number" }
                },
                "required": ["symbol", "quantity", "total_price"]
            }),
        }
    }

    async fn call(
        &self,
        arguments: Value,
        input: &mut StepInput,
    ) -> Result<ToolOutcome, ToolSourceError> {
        let symbol = str_arg(&arguments, "symbol")?.trim().to_uppercase();
        let quantity = arguments
            .get("quantity")
            .and_then(Value::as_u64)
            .ok_or_else(|| {
                ToolSourceError::InvalidInput("'quantity' must be a positive integer".into())
            })?;
        let total_price = arguments
            .get("total_price")
            .and_then(Value::as_f64)
            .ok_or_else(|| ToolSourceError::InvalidInput("'total_price' must be a number".into()))?;

        let payload = format!(
            "Approve buying {} {} stocks for ${:.2}?",
            quantity, symbol, total_price
        );
        let decision = match input.await_decision(payload) {
            Ok(d) => d,
            Err(request) => return Ok(ToolOutcome::Interrupt(request)),
        };

        if decision.trim().eq_ignore_ascii_case("yes") {
            Ok(ToolOutcome::Output(format!(
                "You bought {} shares of {} for a total price of {:?}",
                quantity, symbol, total_price
            )))
        } else {
            Ok(ToolOutcome::Output("Buying declined.".to_string()))
        }
    }
}
