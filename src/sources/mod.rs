pub mod openrouter;
pub mod yahoo;

pub use openrouter::OpenRouterClient;
pub use yahoo::YahooFinanceClient;
