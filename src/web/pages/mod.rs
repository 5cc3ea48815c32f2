//! Maud-based page templates for the web UI.
//!
//! Each page module exports a render function that produces the complete HTML.

pub mod home;
pub mod not_found;
pub mod post;

pub use home::{render_home_page, HomePageParams};
pub use not_found::render_not_found_page;
pub use post::{render_post_page, render_post_placeholder, PostPageParams};
