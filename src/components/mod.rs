//! Maud HTML template components for the web UI.
//!
//! - `layout`: Base page layout, header and footer
//! - `card`: Post cards, post list, meta line and empty state
//! - `pagination`: The "load more" control
//! - `metadata`: Open Graph metadata
//!
//! # Example
//!
//! ```ignore
//! use maud::html;
//! use crate::components::{BaseLayout, EmptyState};
//!
//! fn my_page() -> maud::Markup {
//!     let content = html! {
//!         h1 { "Hello World" }
//!         (EmptyState::no_posts())
//!     };
//!     BaseLayout::new("My Page", "spacetraveling").render(content)
//! }
//! ```

pub mod card;
pub mod layout;
pub mod metadata;
pub mod pagination;

pub use card::{EmptyState, PostCard, PostList, PostMeta};
pub use layout::BaseLayout;
pub use metadata::{truncate_text, OpenGraphMetadata};
pub use pagination::LoadMore;
