//! Page-number pagination. The page size is deployment configuration;
//! clients only pick the (1-based) page. Ordering inside a listing is the
//! service's contract and is unaffected by page boundaries.

use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TitleQuery {
    pub page: Option<i64>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
}

impl TitleQuery {
    pub fn filter(&self) -> domains::TitleFilter {
        domains::TitleFilter {
            category: self.category.clone(),
            genre: self.genre.clone(),
            year: self.year,
            search: self.search.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PageWindow {
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
}

pub fn window(page: Option<i64>, page_size: i64) -> PageWindow {
    let page = page.unwrap_or(1).max(1);
    PageWindow {
        page,
        limit: page_size,
        offset: (page - 1) * page_size,
    }
}

/// List envelope: unpaginated match count plus the requested slice.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub count: i64,
    pub page: i64,
    pub page_size: i64,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(window: PageWindow, count: i64, results: Vec<T>) -> Self {
        Self {
            count,
            page: window.page,
            page_size: window.limit,
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_one_based_and_clamped() {
        let w = window(None, 10);
        assert_eq!((w.page, w.limit, w.offset), (1, 10, 0));
        let w = window(Some(3), 10);
        assert_eq!((w.page, w.offset), (3, 20));
        let w = window(Some(0), 10);
        assert_eq!((w.page, w.offset), (1, 0));
        let w = window(Some(-2), 10);
        assert_eq!(w.offset, 0);
    }
}
