//! Prismic blog library.
//!
//! Serves a blog whose posts live in a Prismic content repository: a
//! paginated listing, post pages with reading time and previous/next
//! navigation, and preview mode for unpublished drafts.

// Allow raw string hashes for safety - they're harmless and prevent issues if content changes
#![allow(clippy::needless_raw_string_hashes)]

pub mod components;
pub mod config;
pub mod posts;
pub mod preview;
pub mod prismic;
pub mod web;
