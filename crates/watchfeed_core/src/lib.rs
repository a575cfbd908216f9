//! Watchfeed core: pure watchlist parsing and the feed filter state machine.
mod filter;
mod ids;
mod report;
mod watchlist;

pub use filter::{
    extract_quoted_id, filter_feed, FeedFilter, FilteredFeed, ATTR_MARKER, ENTRY_CLOSE,
    ENTRY_OPEN, ID_DOMAIN_MARKER,
};
pub use ids::IdentifierSet;
pub use report::{EntryDecision, FilterReport};
pub use watchlist::{extract_ids, ID_SIGNATURE_END, ID_SIGNATURE_START};
