// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::filters::FilterForm;

pub const DEFAULT_PAGE_SIZE: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageParams {
    pub page: u32,
    pub size: u32,
}

/// One page as returned by a paging endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct PageResult<T> {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub pages: u32,
    pub total: u64,
    #[serde(default)]
    pub has_previous: bool,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub records: Vec<T>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListMode {
    Paging,
    Queried,
}

impl ListMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Paging => "paging",
            Self::Queried => "filtered",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u32,
    pub total_count: u64,
    pub page_size: u32,
}

impl Pagination {
    pub fn page_count(&self) -> u32 {
        let size = u64::from(self.page_size.max(1));
        let pages = self.total_count.div_ceil(size);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }
}

/// Backend bindings for one list view.
pub trait ListSource {
    type Record: Clone;
    type Filter: FilterForm;

    fn fetch_page(&mut self, params: PageParams) -> Result<PageResult<Self::Record>>;

    /// Runs a search; the result is the complete, unpaginated match set.
    fn run_query(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Record>>;

    fn normalize_filter(&self, raw: &Self::Filter) -> Self::Filter {
        raw.normalized()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListCommand<F> {
    Load(u32),
    Query(F),
    ChangePage(u32),
    Reset,
    Reload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListEvent {
    PageLoaded { page: u32, total: u64 },
    QueryApplied { matches: u64 },
    PageSelected { page: u32 },
    Unchanged,
}

/// Paged browsing and filtered search over one backend list.
///
/// A view is either paging through server pages or showing the full result
/// of the last search. Failed calls leave items, pagination and mode as they
/// were.
pub struct ListView<S: ListSource> {
    source: S,
    items: Vec<S::Record>,
    mode: ListMode,
    pagination: Pagination,
    loading: bool,
    filter: S::Filter,
}

impl<S> std::fmt::Debug for ListView<S>
where
    S: ListSource + std::fmt::Debug,
    S::Record: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListView")
            .field("source", &self.source)
            .field("items", &self.items)
            .field("mode", &self.mode)
            .field("pagination", &self.pagination)
            .field("loading", &self.loading)
            .field("filter", &self.filter)
            .finish()
    }
}

impl<S: ListSource> ListView<S> {
    pub fn new(source: S, page_size: u32) -> Result<Self> {
        if page_size == 0 {
            bail!("page size must be positive -- set a page size of at least 1");
        }
        Ok(Self::empty(source, page_size))
    }

    pub fn with_default_page_size(source: S) -> Self {
        Self::empty(source, DEFAULT_PAGE_SIZE)
    }

    fn empty(source: S, page_size: u32) -> Self {
        Self {
            source,
            items: Vec::new(),
            mode: ListMode::Paging,
            pagination: Pagination {
                current_page: 1,
                total_count: 0,
                page_size,
            },
            loading: false,
            filter: S::Filter::default(),
        }
    }

    pub fn items(&self) -> &[S::Record] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut Vec<S::Record> {
        &mut self.items
    }

    pub fn retain_items(&mut self, keep: impl FnMut(&S::Record) -> bool) {
        self.items.retain(keep);
    }

    pub fn mode(&self) -> ListMode {
        self.mode
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// The form of the search currently shown, or an empty form while paging.
    pub fn filter(&self) -> &S::Filter {
        &self.filter
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn dispatch(&mut self, command: ListCommand<S::Filter>) -> Result<ListEvent> {
        match command {
            ListCommand::Load(page) => self.load(page),
            ListCommand::Query(filter) => self.query(filter),
            ListCommand::ChangePage(page) => self.change_page(page),
            ListCommand::Reset => self.reset(),
            ListCommand::Reload => self.reload(),
        }
    }

    pub fn load(&mut self, page: u32) -> Result<ListEvent> {
        let page = page.max(1);
        let params = PageParams {
            page,
            size: self.pagination.page_size,
        };
        debug!("fetching page {page} (size {})", params.size);

        self.loading = true;
        let result = self.source.fetch_page(params);
        self.loading = false;
        let result = result?;

        let total = result.total;
        self.items = result.records;
        self.pagination.current_page = page;
        self.pagination.total_count = total;
        if self.mode == ListMode::Queried {
            self.filter = S::Filter::default();
        }
        self.mode = ListMode::Paging;
        Ok(ListEvent::PageLoaded { page, total })
    }

    /// Runs a search. An empty form changes nothing and makes no call.
    pub fn query(&mut self, raw: S::Filter) -> Result<ListEvent> {
        if raw.is_empty() {
            return Ok(ListEvent::Unchanged);
        }
        let payload = self.source.normalize_filter(&raw);
        debug!("running query {payload:?}");

        self.loading = true;
        let result = self.source.run_query(&payload);
        self.loading = false;
        let records = result?;

        let matches = records.len() as u64;
        self.items = records;
        self.pagination.current_page = 1;
        self.pagination.total_count = matches;
        self.mode = ListMode::Queried;
        self.filter = raw;
        Ok(ListEvent::QueryApplied { matches })
    }

    /// Fetches `page` while paging; while showing a search result only the
    /// current page number moves.
    pub fn change_page(&mut self, page: u32) -> Result<ListEvent> {
        match self.mode {
            ListMode::Paging => self.load(page),
            ListMode::Queried => {
                let page = page.max(1);
                self.pagination.current_page = page;
                Ok(ListEvent::PageSelected { page })
            }
        }
    }

    pub fn reset(&mut self) -> Result<ListEvent> {
        if self.mode != ListMode::Queried {
            return Ok(ListEvent::Unchanged);
        }
        self.load(1)
    }

    pub fn reload(&mut self) -> Result<ListEvent> {
        self.load(self.pagination.current_page)
    }

    /// Items on the current page of a search result; every item while paging.
    pub fn query_page_items(&self) -> &[S::Record] {
        match self.mode {
            ListMode::Paging => &self.items,
            ListMode::Queried => {
                let size = self.pagination.page_size as usize;
                let start = (self.pagination.current_page.max(1) as usize - 1)
                    .saturating_mul(size)
                    .min(self.items.len());
                let end = start.saturating_add(size).min(self.items.len());
                &self.items[start..end]
            }
        }
    }
}
