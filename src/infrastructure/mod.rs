pub mod core;
pub mod hyperliquid;
