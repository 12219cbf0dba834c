// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use vconsole_app::{FilterForm, ListSource, PageParams, PageResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceCall<F> {
    FetchPage(PageParams),
    Query(F),
}

type Matcher<D, F> = Box<dyn Fn(&F, &D) -> bool + Send>;

/// A list source over a fixed record set that logs every call it receives.
pub struct InMemorySource<D, F> {
    records: Vec<D>,
    matcher: Matcher<D, F>,
    calls: Vec<SourceCall<F>>,
    failure: Option<String>,
}

impl<D: std::fmt::Debug, F: std::fmt::Debug> std::fmt::Debug for InMemorySource<D, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemorySource")
            .field("records", &self.records)
            .field("calls", &self.calls)
            .field("failure", &self.failure)
            .finish_non_exhaustive()
    }
}

impl<D: Clone, F: FilterForm> InMemorySource<D, F> {
    pub fn new(records: Vec<D>, matcher: impl Fn(&F, &D) -> bool + Send + 'static) -> Self {
        Self {
            records,
            matcher: Box::new(matcher),
            calls: Vec::new(),
            failure: None,
        }
    }

    pub fn calls(&self) -> &[SourceCall<F>] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Makes every following call fail with `message`.
    pub fn fail_with(&mut self, message: &str) {
        self.failure = Some(message.to_owned());
    }

    pub fn recover(&mut self) {
        self.failure = None;
    }

    pub fn records_mut(&mut self) -> &mut Vec<D> {
        &mut self.records
    }

    fn check_failure(&self) -> Result<()> {
        match &self.failure {
            Some(message) => bail!("{message}"),
            None => Ok(()),
        }
    }
}

impl<D: Clone, F: FilterForm> ListSource for InMemorySource<D, F> {
    type Record = D;
    type Filter = F;

    fn fetch_page(&mut self, params: PageParams) -> Result<PageResult<D>> {
        self.calls.push(SourceCall::FetchPage(params));
        self.check_failure()?;

        let size = params.size.max(1) as usize;
        let total = self.records.len();
        let start = (params.page.max(1) as usize - 1).saturating_mul(size).min(total);
        let end = start.saturating_add(size).min(total);
        let pages = total.div_ceil(size);
        Ok(PageResult {
            page: params.page,
            size: params.size,
            pages: u32::try_from(pages).unwrap_or(u32::MAX),
            total: total as u64,
            has_previous: params.page > 1,
            has_next: end < total,
            records: self.records[start..end].to_vec(),
        })
    }

    fn run_query(&mut self, filter: &F) -> Result<Vec<D>> {
        self.calls.push(SourceCall::Query(filter.clone()));
        self.check_failure()?;

        Ok(self
            .records
            .iter()
            .filter(|record| (self.matcher)(filter, record))
            .cloned()
            .collect())
    }
}
