// Spot market resolution and ranking
pub mod context_resolver;
pub mod lookup;
pub mod metrics;
pub mod pair_universe;
pub mod ranking;
pub mod reconciliation;
pub mod symbol_mapper;
pub mod token_index;
pub mod types;

pub use ranking::{ExclusionPolicy, RankedMarketList, RankingBuilder};
pub use reconciliation::{ReconciliationReport, ReferenceView};
pub use symbol_mapper::SymbolMapper;
pub use token_index::TokenIndex;
pub use types::{MarketContext, PairDefinition, RawNumber, ResolvedMarketRow, SpotSnapshot, Token};
