//! Maud-based page templates for the web UI.
//!
//! Each page module exports a render function that produces the complete HTML.

pub mod error;
pub mod home;
pub mod post;

pub use error::{render_not_found_page, render_unavailable_page};
pub use home::{render_home_page, render_more_posts_fragment, HomePageParams};
pub use post::{render_post_page, PostPageParams};
