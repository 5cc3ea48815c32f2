//! Listing page rendering using maud templates.

use maud::{html, Markup};

use crate::components::{BaseLayout, EmptyState, LoadMore, OpenGraphMetadata, PostList};
use crate::listing::{PaginationState, SessionId};

/// Parameters for the listing page.
#[derive(Debug, Clone)]
pub struct HomePageParams<'a> {
    pub state: &'a PaginationState,
    /// Listing session the page belongs to, if the visitor already has one.
    pub session: Option<&'a SessionId>,
    pub site_name: &'a str,
}

/// Render the post listing with its "load more" control.
#[must_use]
pub fn render_home_page(params: &HomePageParams<'_>) -> Markup {
    let state = params.state;

    let content = html! {
        section class="post-listing" {
            @if state.posts.is_empty() {
                (EmptyState::no_posts())
            } @else {
                (PostList::new(&state.posts))
            }
            (LoadMore::new(state.has_more()).with_session(params.session))
        }
    };

    let og = OpenGraphMetadata::new(params.site_name, "Posts", "/").with_site_name(params.site_name);

    BaseLayout::new("Home", params.site_name)
        .with_og_metadata(og)
        .render(content)
}
