//! Ranking computation engine.
//!
//! Pure, synchronous computations over an in-memory record set:
//! - Filter predicate and scoring policy shared by both views
//! - Aggregate rankings across all players
//! - Per-player detail with grouped results and active years
//! - Presentation helpers for ranking, sorting and searching

pub mod detail;
pub mod filter;
pub mod rankings;
pub mod scoring;
pub mod sort;
pub mod years;

pub use detail::compute_detail;
pub use filter::{included, Exclusion};
pub use rankings::compute_rankings;
pub use scoring::points_for;
pub use sort::{
    filter_summary, rank_players, search_players, sort_ranked, sort_tournaments, RankedPlayer,
    SortKey, SortOrder, TournamentSortKey,
};
pub use years::summarize_years;
