//! Headless blog front-end library.
//!
//! Serves a paginated post listing and statically generated post pages
//! backed by a Prismic repository.

// Allow raw string hashes for safety - they're harmless and prevent issues if content changes
#![allow(clippy::needless_raw_string_hashes)]

pub mod cms;
pub mod components;
pub mod config;
pub mod detail;
pub mod listing;
pub mod richtext;
pub mod view;
pub mod web;
