//! Detail page resolution.
//!
//! Post pages are generated ahead of time for a bounded set of known slugs
//! and on demand for every other slug. While an on-demand generation is
//! running, callers get [`Resolution::Resolving`] so the web layer can show a
//! placeholder instead of partial data. Generated pages are regenerated in the
//! background once they are older than the staleness window; the stale page
//! keeps being served until the new one is ready.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::cms::{CmsError, ContentSource, QueryOptions};
use crate::view::ViewPostDetail;

/// Default cap on stored pages, pending generations included.
const DEFAULT_MAX_PAGES: usize = 10_000;

/// Default number of generations allowed to run at once.
const DEFAULT_MAX_GENERATIONS: usize = 8;

/// What the web layer should show for a slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Ready(Arc<ViewPostDetail>),
    /// Generation in progress; show the placeholder.
    Resolving,
    NotFound,
}

#[derive(Debug)]
enum PageEntry {
    Resolving,
    Ready {
        post: Arc<ViewPostDetail>,
        generated_at: Instant,
        regenerating: bool,
    },
    NotFound {
        checked_at: Instant,
        rechecking: bool,
    },
}

/// Store of generated post pages.
pub struct PostPages {
    source: Arc<dyn ContentSource>,
    doc_type: String,
    revalidate_after: Duration,
    entries: RwLock<HashMap<String, PageEntry>>,
    max_pages: usize,
    generations: Arc<Semaphore>,
}

impl PostPages {
    #[must_use]
    pub fn new(
        source: Arc<dyn ContentSource>,
        doc_type: impl Into<String>,
        revalidate_after: Duration,
    ) -> Arc<Self> {
        Self::with_limits(
            source,
            doc_type,
            revalidate_after,
            DEFAULT_MAX_PAGES,
            DEFAULT_MAX_GENERATIONS,
        )
    }

    /// Store holding at most `max_pages` entries and running at most
    /// `max_generations` background generations at once.
    #[must_use]
    pub fn with_limits(
        source: Arc<dyn ContentSource>,
        doc_type: impl Into<String>,
        revalidate_after: Duration,
        max_pages: usize,
        max_generations: usize,
    ) -> Arc<Self> {
        Arc::new(Self {
            source,
            doc_type: doc_type.into(),
            revalidate_after,
            entries: RwLock::new(HashMap::new()),
            max_pages: max_pages.max(1),
            generations: Arc::new(Semaphore::new(max_generations.max(1))),
        })
    }

    /// Generate pages for the first `page_size` posts.
    ///
    /// Returns the slugs of the path set. A page that fails to generate is
    /// skipped and will be generated on its first request instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the path set itself cannot be listed.
    pub async fn prerender(&self, page_size: u32) -> Result<Vec<String>, CmsError> {
        let options =
            QueryOptions::first_page(page_size).with_fetch([format!("{}.title", self.doc_type)]);
        let listing = self.source.query_by_type(&self.doc_type, &options).await?;

        let slugs: Vec<String> = listing
            .results
            .into_iter()
            .filter_map(|doc| doc.uid)
            .collect();

        let mut generated = 0usize;
        for slug in &slugs {
            match self.generate(slug).await {
                Ok(Resolution::Ready(_)) => generated += 1,
                Ok(_) => warn!(slug = %slug, "Listed post has no document"),
                Err(e) => warn!(slug = %slug, "Failed to pre-generate post page: {e}"),
            }
        }
        info!(paths = slugs.len(), generated, "Pre-generated post pages");

        Ok(slugs)
    }

    /// Fetch, project and store one page.
    ///
    /// # Errors
    ///
    /// Returns the source's error; the stored entry is left untouched.
    pub async fn generate(&self, slug: &str) -> Result<Resolution, CmsError> {
        let document = self.source.get_by_uid(&self.doc_type, slug).await?;

        let (entry, resolution) = match document {
            Some(doc) => {
                let post = Arc::new(ViewPostDetail::from_document(&doc));
                (
                    PageEntry::Ready {
                        post: post.clone(),
                        generated_at: Instant::now(),
                        regenerating: false,
                    },
                    Resolution::Ready(post),
                )
            }
            None => (
                PageEntry::NotFound {
                    checked_at: Instant::now(),
                    rechecking: false,
                },
                Resolution::NotFound,
            ),
        };

        debug!(slug = %slug, ready = matches!(resolution, Resolution::Ready(_)), "Generated post page");
        self.write_entries().insert(slug.to_string(), entry);
        Ok(resolution)
    }

    /// Resolve a slug without waiting on the content source.
    ///
    /// Starts a background generation when the slug is unknown or its page is
    /// stale. At most one generation per slug runs at a time. When every
    /// generation slot is busy nothing is started and the next request tries
    /// again.
    pub fn resolve(self: &Arc<Self>, slug: &str) -> Resolution {
        let mut entries = self.write_entries();

        let (resolution, wants_generation) = match entries.get(slug) {
            None => (Resolution::Resolving, true),
            Some(PageEntry::Resolving) => (Resolution::Resolving, false),
            Some(PageEntry::Ready {
                post,
                generated_at,
                regenerating,
            }) => (
                Resolution::Ready(post.clone()),
                !*regenerating && generated_at.elapsed() >= self.revalidate_after,
            ),
            Some(PageEntry::NotFound {
                checked_at,
                rechecking,
            }) => (
                Resolution::NotFound,
                !*rechecking && checked_at.elapsed() >= self.revalidate_after,
            ),
        };
        if !wants_generation {
            return resolution;
        }

        let Ok(permit) = Arc::clone(&self.generations).try_acquire_owned() else {
            debug!(slug = %slug, "All generation slots busy, deferring");
            return resolution;
        };

        if entries.contains_key(slug) {
            if let Some(
                PageEntry::Ready {
                    regenerating: flag, ..
                }
                | PageEntry::NotFound {
                    rechecking: flag, ..
                },
            ) = entries.get_mut(slug)
            {
                *flag = true;
            }
        } else {
            self.make_room(&mut entries);
            entries.insert(slug.to_string(), PageEntry::Resolving);
        }
        drop(entries);

        let pages = Arc::clone(self);
        let slug = slug.to_string();
        tokio::spawn(async move {
            let _permit = permit;
            pages.regenerate(&slug).await;
        });

        resolution
    }

    /// Free a slot before inserting a new slug.
    ///
    /// Drops not-found entries older than the staleness window, then, if the
    /// store is still full, the oldest idle entry (not-found before ready).
    /// Pending generations are never evicted.
    fn make_room(&self, entries: &mut HashMap<String, PageEntry>) {
        let window = self.revalidate_after;
        entries.retain(|_, entry| {
            !matches!(
                entry,
                PageEntry::NotFound { checked_at, rechecking: false }
                    if checked_at.elapsed() >= window
            )
        });

        if entries.len() < self.max_pages {
            return;
        }

        let oldest = entries
            .iter()
            .filter_map(|(slug, entry)| match entry {
                PageEntry::NotFound {
                    checked_at,
                    rechecking: false,
                } => Some(((0u8, *checked_at), slug)),
                PageEntry::Ready {
                    generated_at,
                    regenerating: false,
                    ..
                } => Some(((1u8, *generated_at), slug)),
                _ => None,
            })
            .min_by_key(|(age, _)| *age)
            .map(|(_, slug)| slug.clone());

        if let Some(slug) = oldest {
            debug!(slug = %slug, "Evicting post page to stay under the cap");
            entries.remove(&slug);
        }
    }

    async fn regenerate(&self, slug: &str) {
        if let Err(e) = self.generate(slug).await {
            warn!(slug = %slug, "Failed to generate post page: {e}");

            let mut entries = self.write_entries();
            if matches!(entries.get(slug), Some(PageEntry::Resolving)) {
                // Next request starts over
                entries.remove(slug);
            } else if let Some(
                PageEntry::Ready {
                    regenerating: flag, ..
                }
                | PageEntry::NotFound {
                    rechecking: flag, ..
                },
            ) = entries.get_mut(slug)
            {
                *flag = false;
            }
        }
    }

    /// Number of slugs with a stored page or pending generation.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn write_entries(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, PageEntry>> {
        self.entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
