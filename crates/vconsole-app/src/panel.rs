// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;

use crate::columns::{CellValue, ColumnKind, TableRecord};
use crate::filters::{FilterField, FilterForm};
use crate::listing::{ListEvent, ListMode, ListSource, ListView, Pagination};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnHeader {
    pub title: &'static str,
    pub kind: ColumnKind,
    pub width: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelRow {
    pub id: i64,
    pub cells: Vec<CellValue>,
}

/// Type-erased handle on a list view, so a shell can drive every tab alike.
pub trait ListPanel {
    fn headers(&self) -> Vec<ColumnHeader>;

    /// Rows to render. With `slice_query_results` a search result is cut
    /// down to its current page; otherwise every match is returned.
    fn rows(&self, slice_query_results: bool) -> Vec<PanelRow>;

    fn mode(&self) -> ListMode;

    fn pagination(&self) -> Pagination;

    fn is_loading(&self) -> bool;

    fn filter_fields(&self) -> &'static [FilterField];

    fn filter_value(&self, key: &str) -> Option<String>;

    fn load(&mut self, page: u32) -> Result<ListEvent>;

    fn change_page(&mut self, page: u32) -> Result<ListEvent>;

    fn reset(&mut self) -> Result<ListEvent>;

    fn reload(&mut self) -> Result<ListEvent>;

    /// Builds a filter from `(key, raw text)` pairs and runs it.
    fn submit_filter(&mut self, inputs: &[(&str, &str)]) -> Result<ListEvent>;
}

impl<S> ListPanel for ListView<S>
where
    S: ListSource,
    S::Record: TableRecord,
{
    fn headers(&self) -> Vec<ColumnHeader> {
        S::Record::columns()
            .iter()
            .map(|column| ColumnHeader {
                title: column.title,
                kind: column.kind,
                width: column.width,
            })
            .collect()
    }

    fn rows(&self, slice_query_results: bool) -> Vec<PanelRow> {
        let items = if slice_query_results {
            self.query_page_items()
        } else {
            self.items()
        };
        items
            .iter()
            .map(|record| PanelRow {
                id: record.row_id(),
                cells: record.cells(),
            })
            .collect()
    }

    fn mode(&self) -> ListMode {
        ListView::mode(self)
    }

    fn pagination(&self) -> Pagination {
        ListView::pagination(self)
    }

    fn is_loading(&self) -> bool {
        ListView::is_loading(self)
    }

    fn filter_fields(&self) -> &'static [FilterField] {
        S::Filter::FIELDS
    }

    fn filter_value(&self, key: &str) -> Option<String> {
        self.filter().field_value(key)
    }

    fn load(&mut self, page: u32) -> Result<ListEvent> {
        ListView::load(self, page)
    }

    fn change_page(&mut self, page: u32) -> Result<ListEvent> {
        ListView::change_page(self, page)
    }

    fn reset(&mut self) -> Result<ListEvent> {
        ListView::reset(self)
    }

    fn reload(&mut self) -> Result<ListEvent> {
        ListView::reload(self)
    }

    fn submit_filter(&mut self, inputs: &[(&str, &str)]) -> Result<ListEvent> {
        let mut filter = S::Filter::default();
        for (key, raw) in inputs {
            filter.set_field(key, raw)?;
        }
        self.query(filter)
    }
}
