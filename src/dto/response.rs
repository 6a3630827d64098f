use serde::{Deserialize, Serialize};

/// Success envelope shared by every JSON endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let total_pages = if total <= 0 {
            0
        } else {
            (total + limit - 1) / limit
        };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

/// Normalised page/limit pair; page is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Reads raw query values leniently: an unparsable or non-positive value
    /// falls back to the default instead of failing the request.
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        Self::new(page.and_then(leading_int), limit.and_then(leading_int))
    }

    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.filter(|p| *p >= 1).unwrap_or(1),
            limit: limit
                .filter(|l| *l >= 1)
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .min(MAX_PAGE_SIZE),
        }
    }

    /// Saturates instead of overflowing for absurd page numbers; Postgres
    /// then simply returns no rows.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Integer prefix of `raw`: optional sign then digits, ignoring anything after.
/// Digit runs too long for `i64` saturate. `None` when there are no digits.
pub fn leading_int(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let (negative, rest) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];
    if digits.is_empty() {
        return None;
    }
    let value = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(Pagination::new(2, 5, 12).total_pages, 3);
        assert_eq!(Pagination::new(1, 10, 10).total_pages, 1);
        assert_eq!(Pagination::new(1, 10, 0).total_pages, 0);
    }

    #[test]
    fn page_request_defaults_and_offsets() {
        let req = PageRequest::new(None, None);
        assert_eq!((req.page, req.limit, req.offset()), (1, 10, 0));

        let req = PageRequest::new(Some(2), Some(5));
        assert_eq!(req.offset(), 5);

        let req = PageRequest::new(Some(0), Some(1000));
        assert_eq!((req.page, req.limit), (1, MAX_PAGE_SIZE));
    }

    #[test]
    fn huge_page_saturates_offset() {
        let req = PageRequest::new(Some(i64::MAX), Some(10));
        assert_eq!(req.page, i64::MAX);
        assert_eq!(req.offset(), i64::MAX);

        let req = PageRequest::from_query(Some("99999999999999999999999"), Some("10"));
        assert_eq!(req.offset(), i64::MAX);
    }

    #[test]
    fn query_values_parse_leniently() {
        let req = PageRequest::from_query(Some("abc"), Some("x"));
        assert_eq!((req.page, req.limit), (1, DEFAULT_PAGE_SIZE));

        let req = PageRequest::from_query(Some("3rd"), Some(" 5 "));
        assert_eq!((req.page, req.limit), (3, 5));

        let req = PageRequest::from_query(Some("-2"), Some("0"));
        assert_eq!((req.page, req.limit), (1, DEFAULT_PAGE_SIZE));

        let req = PageRequest::from_query(None, None);
        assert_eq!((req.page, req.limit), (1, DEFAULT_PAGE_SIZE));
    }

    #[test]
    fn leading_int_takes_the_numeric_prefix() {
        assert_eq!(leading_int("42"), Some(42));
        assert_eq!(leading_int("7abc"), Some(7));
        assert_eq!(leading_int("-15"), Some(-15));
        assert_eq!(leading_int("2.9"), Some(2));
        assert_eq!(leading_int("abc"), None);
        assert_eq!(leading_int(""), None);
    }

    #[test]
    fn pagination_serializes_camel_case() {
        let value = serde_json::to_value(Pagination::new(2, 5, 12)).unwrap();
        assert_eq!(value["totalPages"], 3);
        assert_eq!(value["total"], 12);
    }

    #[test]
    fn message_only_envelope_omits_data() {
        let value = serde_json::to_value(ApiResponse::message("done")).unwrap();
        assert_eq!(value, serde_json::json!({"success": true, "message": "done"}));
    }
}
