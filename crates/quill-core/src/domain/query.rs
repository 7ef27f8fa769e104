//! Post listing: filtering, ordering and pagination.
//!
//! These are pure functions over post snapshots so every [`PostRepository`]
//! implementation produces identical listings.
//!
//! [`PostRepository`]: crate::ports::PostRepository

use serde::{Deserialize, Serialize};

use super::Post;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// How a category filter compares against a post's category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryMatch {
    /// Case-insensitive substring.
    Contains(String),
    /// Case-insensitive equality.
    Exact(String),
}

impl CategoryMatch {
    fn matches(&self, category: &str) -> bool {
        let category = category.to_lowercase();
        match self {
            CategoryMatch::Contains(needle) => category.contains(needle.as_str()),
            CategoryMatch::Exact(needle) => category == *needle,
        }
    }
}

/// Predicate selecting posts for a listing.
///
/// Needles are lower-cased on construction; blank needles are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    category: Option<CategoryMatch>,
    search: Option<String>,
    search_category: bool,
}

impl PostFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category_contains(mut self, category: impl AsRef<str>) -> Self {
        self.category = needle(category.as_ref()).map(CategoryMatch::Contains);
        self
    }

    pub fn category_equals(mut self, category: impl AsRef<str>) -> Self {
        self.category = needle(category.as_ref()).map(CategoryMatch::Exact);
        self
    }

    /// Match the text against title, content, excerpt and tags.
    pub fn search(mut self, text: impl AsRef<str>) -> Self {
        self.search = needle(text.as_ref());
        self
    }

    /// Also match the search text against the category.
    pub fn search_in_category(mut self) -> Self {
        self.search_category = true;
        self
    }

    pub fn category(&self) -> Option<&CategoryMatch> {
        self.category.as_ref()
    }

    pub fn search_text(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn matches(&self, post: &Post) -> bool {
        if let Some(category) = &self.category {
            if !category.matches(&post.category) {
                return false;
            }
        }

        match &self.search {
            Some(text) => {
                let hit = |field: &str| field.to_lowercase().contains(text.as_str());
                hit(&post.title)
                    || hit(&post.content)
                    || hit(&post.excerpt)
                    || post.tags.iter().any(|tag| hit(tag))
                    || (self.search_category && hit(&post.category))
            }
            None => true,
        }
    }
}

fn needle(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

/// Listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostSort {
    #[default]
    Newest,
    Oldest,
    Popular,
}

impl PostSort {
    /// Parse a sort key; anything unrecognized falls back to [`PostSort::Newest`].
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "oldest" => PostSort::Oldest,
            "popular" => PostSort::Popular,
            _ => PostSort::Newest,
        }
    }

    /// Sort in place. All orders are stable; `Popular` keeps the incoming
    /// relative order for equal scores.
    pub fn apply(self, posts: &mut [Post]) {
        match self {
            PostSort::Newest => posts.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then_with(|| b.id.cmp(&a.id))
            }),
            PostSort::Oldest => posts.sort_by(|a, b| {
                a.created_at
                    .cmp(&b.created_at)
                    .then_with(|| a.id.cmp(&b.id))
            }),
            PostSort::Popular => posts.sort_by(|a, b| b.popularity().cmp(&a.popularity())),
        }
    }
}

/// 1-indexed page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Page 0 is treated as page 1; the limit is clamped to `1..=100`.
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    fn bounds(&self) -> (usize, usize) {
        let limit = self.limit as usize;
        let start = (self.page as usize - 1).saturating_mul(limit);
        (start, start.saturating_add(limit))
    }
}

/// Page metadata returned alongside listed items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Slice `items` to the requested page. Out-of-range pages are empty.
    pub fn slice(items: Vec<T>, request: PageRequest) -> Self {
        let total = items.len();
        let (start, end) = request.bounds();

        let items: Vec<T> = items
            .into_iter()
            .skip(start)
            .take(end - start)
            .collect();

        Self {
            items,
            pagination: Pagination {
                page: request.page,
                limit: request.limit,
                total: total as u64,
                total_pages: (total as u64).div_ceil(u64::from(request.limit)),
                has_next: end < total,
                has_prev: request.page > 1,
            },
        }
    }
}

/// A complete listing request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    pub filter: PostFilter,
    pub sort: PostSort,
    pub page: PageRequest,
}

impl PostQuery {
    /// Run the query over posts held in default (newest-insert-first) order.
    pub fn run<'a>(&self, posts: impl IntoIterator<Item = &'a Post>) -> Page<Post> {
        Page::slice(select(&self.filter, self.sort, posts), self.page)
    }
}

/// Filter and order posts without pagination.
pub fn select<'a>(
    filter: &PostFilter,
    sort: PostSort,
    posts: impl IntoIterator<Item = &'a Post>,
) -> Vec<Post> {
    let mut selected: Vec<Post> = posts
        .into_iter()
        .filter(|post| filter.matches(post))
        .cloned()
        .collect();
    sort.apply(&mut selected);
    selected
}
