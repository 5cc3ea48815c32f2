//! Listing controller: paginated post list with "load more".

mod sessions;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use tokio::sync::Notify;
use tracing::{debug, info};

use crate::cms::{CmsError, ContentSource, QueryOptions, QueryResponse};
use crate::view::ViewPost;

pub use sessions::{ListingSessions, SessionId};

/// Posts shown so far plus the reference to the next batch.
///
/// Posts are only ever appended; `next_page` is `None` once the last batch
/// has been loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationState {
    pub posts: Vec<ViewPost>,
    pub next_page: Option<String>,
}

impl PaginationState {
    /// Build the initial state from the first page of results.
    #[must_use]
    pub fn from_response(response: &QueryResponse) -> Self {
        Self {
            posts: response.results.iter().map(ViewPost::from_document).collect(),
            next_page: response.next_page.clone(),
        }
    }

    /// Whether another batch can be requested.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.next_page.is_some()
    }

    /// Append a batch and take over its `next_page` reference.
    ///
    /// Returns the number of posts appended. No de-duplication is done.
    pub fn merge(&mut self, response: &QueryResponse) -> usize {
        let before = self.posts.len();
        self.posts
            .extend(response.results.iter().map(ViewPost::from_document));
        self.next_page = response.next_page.clone();
        self.posts.len() - before
    }
}

/// Fetch the first batch of the listing, restricted to the listing fields.
///
/// # Errors
///
/// Returns the source's error if the query fails.
pub async fn load_first_page(
    source: &dyn ContentSource,
    doc_type: &str,
    page_size: u32,
) -> Result<PaginationState, CmsError> {
    let options = QueryOptions::first_page(page_size).with_fetch(
        ["title", "subtitle", "author"].map(|field| format!("{doc_type}.{field}")),
    );
    let response = source.query_by_type(doc_type, &options).await?;
    let state = PaginationState::from_response(&response);
    info!(
        posts = state.posts.len(),
        total = response.total_results_size,
        has_more = state.has_more(),
        "Loaded first page of posts"
    );
    Ok(state)
}

/// Result of [`ListingController::load_next_page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A batch was appended; `first_index` is the position of its first post.
    Appended { count: usize, first_index: usize },
    /// Another load is still running; nothing was requested.
    AlreadyLoading,
    /// There is no next page.
    Exhausted,
}

/// Owns one [`PaginationState`] and is its only writer.
#[derive(Debug, Default)]
pub struct ListingController {
    state: RwLock<PaginationState>,
    loading: AtomicBool,
    load_done: Notify,
}

/// Clears the in-flight flag when a load finishes, however it finishes.
struct LoadingGuard<'a>(&'a ListingController);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.loading.store(false, Ordering::Release);
        self.0.load_done.notify_waiters();
    }
}

impl ListingController {
    #[must_use]
    pub fn new(state: PaginationState) -> Self {
        Self {
            state: RwLock::new(state),
            loading: AtomicBool::new(false),
            load_done: Notify::new(),
        }
    }

    /// Copy of the current state for rendering.
    #[must_use]
    pub fn snapshot(&self) -> PaginationState {
        self.state
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Wait until no load is in flight.
    ///
    /// Returns immediately when the controller is idle.
    pub async fn wait_for_load(&self) {
        loop {
            // Register before checking the flag so a load finishing in between is not missed
            let done = self.load_done.notified();
            if !self.is_loading() {
                return;
            }
            done.await;
        }
    }

    /// Fetch the next batch and append it.
    ///
    /// At most one load runs at a time: a call made while another is in flight
    /// returns [`LoadOutcome::AlreadyLoading`] without contacting the source,
    /// so every batch is appended exactly once and in request order.
    ///
    /// # Errors
    ///
    /// Returns the source's error if the fetch fails. The state is left as it
    /// was before the call.
    pub async fn load_next_page(&self, source: &dyn ContentSource) -> Result<LoadOutcome, CmsError> {
        if self
            .loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Load already in flight, ignoring trigger");
            return Ok(LoadOutcome::AlreadyLoading);
        }
        let _guard = LoadingGuard(self);

        let Some(next_page) = self.snapshot().next_page else {
            return Ok(LoadOutcome::Exhausted);
        };

        let response = source.fetch_page(&next_page).await?;

        let mut state = self
            .state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let first_index = state.posts.len();
        let count = state.merge(&response);
        info!(
            appended = count,
            total = state.posts.len(),
            has_more = state.has_more(),
            "Loaded next page of posts"
        );

        Ok(LoadOutcome::Appended { count, first_index })
    }
}
