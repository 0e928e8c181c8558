//! Client-side salon and service search.
//!
//! [`normalize`] folds text to a diacritic-free lowercase form,
//! [`ServiceIndex`] deduplicates the services offered across loaded salons,
//! and [`search`] ranks salons and filters services against a free-text
//! query.

pub mod index;
pub mod normalize;
pub mod ranker;

pub use index::ServiceIndex;
pub use normalize::{normalize, tokenize};
pub use ranker::{search, RankedSalon, SearchRanker, SearchResults};
