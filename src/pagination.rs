//! Page-number pagination: query parsing, range checks and window bounds.

use crate::error::AppError;
use std::collections::HashMap;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 1000;

/// A validated 1-indexed page request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageParams {
    pub page: i64,
    pub page_size: i64,
}

impl Default for PageParams {
    fn default() -> Self {
        PageParams {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

fn parse_param(params: &HashMap<String, String>, key: &str, default: i64) -> Result<i64, AppError> {
    match params.get(key) {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| AppError::BadRequest(format!("{} must be an integer", key))),
    }
}

impl PageParams {
    /// Reads `page` and `page_size` from query parameters; other keys are ignored.
    pub fn from_query(params: &HashMap<String, String>) -> Result<Self, AppError> {
        let page = parse_param(params, "page", DEFAULT_PAGE)?;
        let page_size = parse_param(params, "page_size", DEFAULT_PAGE_SIZE)?;
        Self::new(page, page_size)
    }

    pub fn new(page: i64, page_size: i64) -> Result<Self, AppError> {
        if page < 1 {
            return Err(AppError::BadRequest("page must be at least 1".into()));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(AppError::BadRequest(format!(
                "page_size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        // start must fit in i64 for the storage offset.
        (page - 1)
            .checked_mul(page_size)
            .and_then(|start| start.checked_add(page_size))
            .ok_or_else(|| AppError::BadRequest("page is out of range".into()))?;
        Ok(PageParams { page, page_size })
    }

    /// Offset of the first row on this page.
    pub fn start(&self) -> i64 {
        (self.page - 1) * self.page_size
    }

    /// Offset one past the last row on this page.
    pub fn end(&self) -> i64 {
        self.start() + self.page_size
    }

    pub fn has_next(&self, count: i64) -> bool {
        self.end() < count
    }

    pub fn has_previous(&self) -> bool {
        self.start() > 0
    }

    /// Link to the page at `page` with the same size, relative to `base_path`.
    pub fn link(&self, base_path: &str, page: i64) -> String {
        format!("{}?page={}&page_size={}", base_path, page, self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn defaults_when_absent() {
        let p = PageParams::from_query(&query(&[("other", "x")])).unwrap();
        assert_eq!(p, PageParams::default());
        assert_eq!((p.start(), p.end()), (0, 10));
    }

    #[test]
    fn window_bounds() {
        let p = PageParams::new(3, 4).unwrap();
        assert_eq!((p.start(), p.end()), (8, 12));
        assert!(p.has_previous());
        assert!(p.has_next(13));
        assert!(!p.has_next(12));
    }

    #[test]
    fn first_page_has_no_previous() {
        assert!(!PageParams::new(1, 5).unwrap().has_previous());
    }

    #[test]
    fn rejects_malformed_and_out_of_range() {
        for pairs in [
            vec![("page", "abc")],
            vec![("page_size", "1.5")],
            vec![("page", "0")],
            vec![("page", "-2")],
            vec![("page_size", "0")],
            vec![("page_size", "-10")],
            vec![("page_size", "1001")],
            vec![("page", "9223372036854775807"), ("page_size", "1000")],
        ] {
            let err = PageParams::from_query(&query(&pairs)).unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)), "accepted {:?}", pairs);
        }
    }

    #[test]
    fn links_keep_page_size() {
        let p = PageParams::new(2, 25).unwrap();
        assert_eq!(p.link("/directories/", 3), "/directories/?page=3&page_size=25");
    }
}
