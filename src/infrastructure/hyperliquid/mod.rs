pub mod client;
pub mod file_source;
pub mod wire;

pub use client::HyperliquidInfoClient;
pub use file_source::FileSnapshotSource;
pub use wire::decode_snapshot;
