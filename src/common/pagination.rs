// src/common/pagination.rs

use serde::Serialize;
use utoipa::ToSchema;

use crate::common::error::AppError;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

fn invalid_query() -> AppError {
    AppError::ValidationError("Invalid query parameters".into())
}

// Página e limite já validados (page >= 1, 1 <= limit <= 100).
// page * limit cabe em i64, o tipo do OFFSET no Postgres.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: u64,
    pub limit: u64,
}

impl PageParams {
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Result<Self, AppError> {
        let page = match page {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| invalid_query())?,
            None => DEFAULT_PAGE,
        };
        let limit = match limit {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| invalid_query())?,
            None => DEFAULT_LIMIT,
        };

        if page < 1 || !(1..=MAX_LIMIT).contains(&limit) {
            return Err(invalid_query());
        }
        match page.checked_mul(limit) {
            Some(end) if end <= i64::MAX as u64 => Ok(Self { page, limit }),
            _ => Err(invalid_query()),
        }
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// Lê um filtro booleano da query string ("true" / "false").
pub fn parse_bool_flag(raw: Option<&str>) -> Result<Option<bool>, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some("true") => Ok(Some(true)),
        Some("false") => Ok(Some(false)),
        Some(_) => Err(invalid_query()),
    }
}

/// Lê um id opcional da query string (ex: `productId`).
pub fn parse_optional_id(raw: Option<&str>) -> Result<Option<uuid::Uuid>, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => uuid::Uuid::parse_str(value)
            .map(Some)
            .map_err(|_| invalid_query()),
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(params: PageParams, total: u64) -> Self {
        let total_pages = total.div_ceil(params.limit);
        Self {
            page: params.page,
            limit: params.limit,
            total,
            total_pages,
            has_next: params.page.saturating_mul(params.limit) < total,
            has_prev: params.page > 1,
        }
    }
}

// Busca textual aplicada sobre a página já carregada.
pub fn matches_search(needle: &str, haystacks: &[Option<&str>]) -> bool {
    let needle = needle.to_lowercase();
    haystacks
        .iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page_of_ten() {
        let params = PageParams::parse(None, None).unwrap();
        assert_eq!(params, PageParams { page: 1, limit: 10 });
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn rejects_out_of_range_limits_and_pages() {
        assert!(PageParams::parse(Some("0"), None).is_err());
        assert!(PageParams::parse(None, Some("0")).is_err());
        assert!(PageParams::parse(None, Some("101")).is_err());
        assert!(PageParams::parse(Some("abc"), None).is_err());
        assert!(PageParams::parse(None, Some("100")).is_ok());
    }

    #[test]
    fn second_page_of_fifteen_items() {
        let params = PageParams::parse(Some("2"), Some("10")).unwrap();
        assert_eq!(params.offset(), 10);

        let pagination = Pagination::new(params, 15);
        assert_eq!(pagination.total_pages, 2);
        assert!(!pagination.has_next);
        assert!(pagination.has_prev);
    }

    #[test]
    fn empty_collection_has_zero_pages() {
        let pagination = Pagination::new(PageParams { page: 1, limit: 10 }, 0);
        assert_eq!(pagination.total_pages, 0);
        assert!(!pagination.has_next);
        assert!(!pagination.has_prev);
    }

    #[test]
    fn huge_pages_are_rejected_not_wrapped() {
        assert!(PageParams::parse(Some("18446744073709551615"), Some("100")).is_err());
        assert!(PageParams::parse(Some("92233720368547759"), Some("100")).is_err());

        let last = PageParams::parse(Some("92233720368547758"), Some("100")).unwrap();
        assert_eq!(last.offset(), 9_223_372_036_854_775_700);
        assert!(!Pagination::new(last, 15).has_next);

        let pagination = Pagination::new(PageParams { page: u64::MAX, limit: 100 }, 15);
        assert!(!pagination.has_next);
    }

    #[test]
    fn bool_flags_are_strict() {
        assert_eq!(parse_bool_flag(Some("true")).unwrap(), Some(true));
        assert_eq!(parse_bool_flag(Some("false")).unwrap(), Some(false));
        assert_eq!(parse_bool_flag(None).unwrap(), None);
        assert!(parse_bool_flag(Some("yes")).is_err());
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        assert!(matches_search("LAMP", &[Some("Desk lamp"), None]));
        assert!(!matches_search("chair", &[Some("Desk lamp"), Some("SKU-1")]));
    }
}
