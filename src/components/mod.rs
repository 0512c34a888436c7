//! Maud HTML template components for the web UI.
//!
//! - `layout`: Base page layout and preview banner
//! - `card`: Post cards, listing "load more" control, empty state
//! - `navigation`: Previous/next post links
//! - `comments`: Utterances comment widget

pub mod card;
pub mod comments;
pub mod layout;
pub mod navigation;

pub use card::{EmptyState, LoadMoreButton, PostCard, PostCards};
pub use comments::UtterancesComments;
pub use layout::BaseLayout;
pub use navigation::SiblingNav;
