//! Duplicate-block detection.
//!
//! This module provides:
//! - Key derivation for elements ([`KeyFilter`])
//! - The aggregation pass into an ordered multimap and position arena
//! - Block discovery with backtracking ([`Concordance`])
//! - Accepted result blocks ([`Block`])

pub mod block;
pub mod builder;
pub mod cancel;
pub mod filter;
pub mod multimap;
pub mod registry;

pub use block::{Block, BlockLayout};
pub use builder::{Concordance, SearchOutcome, SearchSummary};
pub use cancel::{Cancellation, FnCancel, NeverCancel};
pub use filter::{Classified, FnFilter, IdentityFilter, KeyFilter};
pub use multimap::OrderedMultimap;
pub use registry::PositionRegistry;
