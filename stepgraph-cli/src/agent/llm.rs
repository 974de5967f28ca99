//! Deterministic rule-based stand-in for the stock desk LLM.
//!
//! Reads the whole history the way a chat model would and answers with text or tool calls.
//! Used by the CLI and tests so the human-in-the-loop flow runs without an API key.

use async_trait::async_trait;
use serde_json::{json, Value};
use stepgraph::{AgentError, LlmClient, LlmResponse, Message, ToolCall};

use crate::tools::{BUY_STOCKS, GET_STOCK_PRICE};

const KNOWN_SYMBOLS: &[&str] = &["MSFT", "AAPL", "AMZN", "RIL"];

const HELP_REPLY: &str =
    "I can look up stock prices and buy shares for you. Try \"What is the price of MSFT?\"";

/// Rule-based LLM for the stock desk.
///
/// - "my name is X" is acknowledged and later recalled by "what is my name";
/// - a price question calls `get_stock_price`;
/// - a buy request calls `buy_stocks` with `quantity * price`, looking the price up first
///   when the history has none for that symbol;
/// - tool results are turned into a short answer.
#[derive(Debug, Default, Clone)]
pub struct StockDeskLlm;

impl StockDeskLlm {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LlmClient for StockDeskLlm {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError> {
        Ok(respond(messages))
    }
}

/// What the latest user message asks for.
#[derive(Debug, PartialEq)]
enum Intent {
    Introduce(String),
    AskName,
    Buy { symbol: String, quantity: Option<u64> },
    Price { symbol: String, quantity: Option<u64> },
    Other,
}

fn respond(messages: &[Message]) -> LlmResponse {
    match messages.iter().rev().find(|m| !matches!(m, Message::System { .. })) {
        Some(Message::Tool {
            tool_call_id,
            name,
            content,
        }) => after_tool(messages, tool_call_id, name, content),
        Some(Message::User { content }) => answer_user(messages, content),
        _ => LlmResponse::text(HELP_REPLY),
    }
}

fn answer_user(messages: &[Message], text: &str) -> LlmResponse {
    match parse_intent(text) {
        Intent::Introduce(name) => LlmResponse::text(format!("Nice to meet you, {}!", name)),
        Intent::AskName => match remembered_name(messages) {
            Some(name) => LlmResponse::text(format!("Your name is {}.", name)),
            None => LlmResponse::text("I don't know your name yet."),
        },
        Intent::Price { symbol, .. } => tool_call(messages, GET_STOCK_PRICE, json!({ "symbol": symbol })),
        Intent::Buy {
            symbol,
            quantity: None,
        } => LlmResponse::text(format!("How many shares of {} would you like to buy?", symbol)),
        Intent::Buy {
            symbol,
            quantity: Some(quantity),
        } => match known_price(messages, &symbol) {
            Some(price) => buy_call(messages, &symbol, quantity, price),
            None => tool_call(messages, GET_STOCK_PRICE, json!({ "symbol": symbol })),
        },
        Intent::Other => LlmResponse::text(HELP_REPLY),
    }
}

fn after_tool(messages: &[Message], call_id: &str, name: &str, content: &str) -> LlmResponse {
    if name != GET_STOCK_PRICE {
        return LlmResponse::text(content);
    }
    let symbol = call_arguments(messages, call_id)
        .and_then(|args| args.get("symbol").and_then(Value::as_str).map(str::to_uppercase))
        .unwrap_or_default();
    let price: f64 = content.trim().parse().unwrap_or(0.0);

    let request = messages
        .iter()
        .rev()
        .find_map(|m| match m {
            Message::User { content } => Some(parse_intent(content)),
            _ => None,
        })
        .unwrap_or(Intent::Other);

    match request {
        Intent::Buy {
            quantity: Some(quantity),
            ..
        } => buy_call(messages, &symbol, quantity, price),
        Intent::Price {
            quantity: Some(quantity),
            ..
        } if quantity > 1 => LlmResponse::text(format!(
            "The current price of {} is {:?} per share, so {} shares cost {:?}.",
            symbol,
            price,
            quantity,
            price * quantity as f64
        )),
        _ => LlmResponse::text(format!(
            "The current price of {} is {:?} per share.",
            symbol, price
        )),
    }
}

fn buy_call(messages: &[Message], symbol: &str, quantity: u64, price: f64) -> LlmResponse {
    tool_call(
        messages,
        BUY_STOCKS,
        json!({
            "symbol": symbol,
            "quantity": quantity,
            "total_price": price * quantity as f64,
        }),
    )
}

/// One tool call with an id unique within the history (`call_1`, `call_2`, ...).
fn tool_call(messages: &[Message], name: &str, arguments: Value) -> LlmResponse {
    let issued: usize = messages.iter().map(|m| m.tool_calls().len()).sum();
    LlmResponse::with_tool_calls(
        "",
        vec![ToolCall {
            id: format!("call_{}", issued + 1),
            name: name.to_string(),
            arguments,
        }],
    )
}

fn call_arguments<'a>(messages: &'a [Message], call_id: &str) -> Option<&'a Value> {
    messages
        .iter()
        .flat_map(|m| m.tool_calls())
        .find(|c| c.id == call_id)
        .map(|c| &c.arguments)
}

/// Most recent `get_stock_price` result for `symbol` in the history.
fn known_price(messages: &[Message], symbol: &str) -> Option<f64> {
    messages.iter().rev().find_map(|m| match m {
        Message::Tool {
            tool_call_id,
            name,
            content,
        } if name == GET_STOCK_PRICE => {
            let looked_up = call_arguments(messages, tool_call_id)?
                .get("symbol")?
                .as_str()?
                .to_uppercase();
            if looked_up == symbol {
                content.trim().parse().ok()
            } else {
                None
            }
        }
        _ => None,
    })
}

fn remembered_name(messages: &[Message]) -> Option<String> {
    messages.iter().rev().find_map(|m| match m {
        Message::User { content } => match parse_intent(content) {
            Intent::Introduce(name) => Some(name),
            _ => None,
        },
        _ => None,
    })
}

fn words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
        .filter(|w| !w.is_empty())
        .collect()
}

fn parse_intent(text: &str) -> Intent {
    let lower = text.to_lowercase();
    let tokens = words(text);

    if let Some(rest) = lower
        .find("my name is ")
        .and_then(|pos| text.get(pos + "my name is ".len()..))
    {
        if let Some(name) = words(rest).into_iter().next() {
            return Intent::Introduce(name);
        }
    }
    if lower.contains("what is my name") || lower.contains("what's my name") {
        return Intent::AskName;
    }

    let symbol = find_symbol(&tokens);
    let quantity = tokens.iter().find_map(|t| t.parse::<u64>().ok()).filter(|q| *q > 0);

    match symbol {
        Some(symbol) if lower.contains("buy") || lower.contains("purchase") => {
            Intent::Buy { symbol, quantity }
        }
        Some(symbol)
            if ["price", "cost", "worth", "quote"]
                .iter()
                .any(|k| lower.contains(k)) =>
        {
            Intent::Price { symbol, quantity }
        }
        _ => Intent::Other,
    }
}

/// A known ticker (any case) or any other all-caps word of 2..=5 letters.
fn find_symbol(tokens: &[String]) -> Option<String> {
    tokens
        .iter()
        .map(|t| t.to_uppercase())
        .find(|t| KNOWN_SYMBOLS.contains(&t.as_str()))
        .or_else(|| {
            tokens
                .iter()
                .find(|t| {
                    (2..=5).contains(&t.len()) && t.chars().all(|c| c.is_ascii_uppercase())
                })
                .cloned()
        })
}
