//! Vouch business logic - submission and paginated listing.
//!
//! Pages are fetched lazily: only the requested slice is read from the store,
//! together with the total used for the page count.

use crate::{
    errors::{Error, Result},
    models::{Stars, Vouch, VouchScope},
    store::VouchStore,
};
use chrono::Utc;

/// Longest accepted vouch description, in characters
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Number of pages needed for `total` records, `ceil(total / page_size)`.
#[must_use]
pub const fn total_pages(total: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        0
    } else {
        total.div_ceil(page_size)
    }
}

/// One page of a vouch listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VouchPage {
    /// Which vouches the listing covers
    pub scope: VouchScope,
    /// 1-based page number
    pub page: u64,
    /// Records per page
    pub page_size: u64,
    /// Records in scope across all pages
    pub total: u64,
    /// Records on this page, newest first
    pub vouches: Vec<Vouch>,
}

impl VouchPage {
    /// Pages needed for the whole listing
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        total_pages(self.total, self.page_size)
    }

    /// Whether a previous page exists
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Whether a following page exists
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }
}

/// Validates and appends a vouch.
///
/// Blank descriptions are stored as `None`; surrounding whitespace is trimmed.
pub async fn submit_vouch<S: VouchStore>(
    store: &S,
    staff_id: u64,
    user_id: u64,
    rating: i64,
    description: Option<String>,
) -> Result<Vouch> {
    let stars = Stars::new(rating)?;
    let description = description
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());
    if description
        .as_ref()
        .is_some_and(|text| text.chars().count() > MAX_DESCRIPTION_CHARS)
    {
        return Err(Error::DescriptionTooLong {
            max: MAX_DESCRIPTION_CHARS,
        });
    }

    let vouch = Vouch {
        staff_id,
        user_id,
        stars,
        description,
        created_at: Utc::now(),
    };
    store.append_vouch(vouch.clone()).await?;
    Ok(vouch)
}

/// Fetches one page of vouches, newest first.
///
/// Pages past the end come back empty with the real total, so callers can tell
/// the user how many pages exist.
pub async fn list_vouches<S: VouchStore>(
    store: &S,
    scope: VouchScope,
    page: u64,
    page_size: u64,
) -> Result<VouchPage> {
    if page == 0 || page_size == 0 {
        return Err(Error::InvalidPage { page, page_size });
    }

    let total = store.count_vouches(scope).await?;
    let offset = (page - 1).saturating_mul(page_size);
    let vouches = if offset >= total {
        Vec::new()
    } else {
        store.vouch_slice(scope, offset, page_size).await?
    };

    Ok(VouchPage {
        scope,
        page,
        page_size,
        total,
        vouches,
    })
}

/// Walks a vouch listing page by page.
///
/// Nothing is read until [`VouchPager::next_page`] is called, iteration stops
/// after the last page, and [`VouchPager::restart`] rewinds to the first page.
#[derive(Debug, Clone)]
pub struct VouchPager {
    scope: VouchScope,
    page_size: u64,
    next: u64,
    finished: bool,
}

impl VouchPager {
    /// Pager over `scope` with `page_size` records per page
    #[must_use]
    pub const fn new(scope: VouchScope, page_size: u64) -> Self {
        Self {
            scope,
            page_size,
            next: 1,
            finished: false,
        }
    }

    /// Fetches the next page, `None` once the listing is exhausted.
    pub async fn next_page<S: VouchStore>(&mut self, store: &S) -> Result<Option<VouchPage>> {
        if self.finished {
            return Ok(None);
        }

        let page = list_vouches(store, self.scope, self.next, self.page_size).await?;
        if page.vouches.is_empty() {
            self.finished = true;
            return Ok(None);
        }

        self.finished = !page.has_next();
        self.next += 1;
        Ok(Some(page))
    }

    /// Rewinds to the first page.
    pub const fn restart(&mut self) {
        self.next = 1;
        self.finished = false;
    }
}
