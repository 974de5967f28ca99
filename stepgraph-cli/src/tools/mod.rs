//! Stock desk tools: price lookup and an approval-gated purchase.

mod stock_tools;

pub use stock_tools::{price_of, BuyStocks, GetStockPrice, BUY_STOCKS, GET_STOCK_PRICE};

use std::sync::Arc;

use stepgraph::ToolRegistry;

/// Registry with both stock desk tools.
pub fn stock_desk_tools() -> ToolRegistry {
    ToolRegistry::new()
        .with(Arc::new(GetStockPrice))
        .with(Arc::new(BuyStocks))
}
