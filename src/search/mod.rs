//! Keyword search over a partition's announcements.
//!
//! Everything here is synchronous and side-effect free. A [`SearchIndex`] is
//! built once per record snapshot and never mutated afterwards, so it can be
//! shared behind an `Arc` while a newer snapshot is being indexed.
//!
//! - **`normalize`**: accent- and case-insensitive comparison form of text.
//! - **`tags`**: splits a keyword phrase into searchable word tags.
//! - **`index`**: the tag → phrase → entries lookup and the query resolver.
//! - **`windows`**: recent-announcement and upcoming-action views.

pub mod index;
pub mod normalize;
pub mod tags;
pub mod windows;

pub use index::{build_index, search, IndexedEntry, SearchHit, SearchIndex};
pub use normalize::normalize;
pub use tags::extract_tags;
pub use windows::{
    recent_window, recent_window_within, upcoming_window, upcoming_window_within, DaysRemaining,
    UpcomingAction, RECENT_WINDOW_DAYS, UPCOMING_WINDOW_DAYS,
};
