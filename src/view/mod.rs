//! View-level state over a finished layout: filtering and the pan/zoom surface.

pub mod filter;
pub mod viewport;

pub use filter::{FilterPredicate, SearchMatcher, TypeFilter, VisibleSet};
pub use viewport::Viewport;
