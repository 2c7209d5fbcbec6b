use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}

impl Pagination {
    #[must_use]
    pub const fn new(page: u64, limit: u64, total: u64) -> Self {
        Self {
            page,
            limit,
            total,
            pages: total.div_ceil(limit),
        }
    }
}

/// List envelope: the usual `ApiResponse` shape plus the page descriptor.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Paginated<T> {
    #[must_use]
    pub fn new(data: Vec<T>, page: u64, limit: u64, total: u64) -> Self {
        Self {
            success: true,
            data,
            pagination: Pagination::new(page, limit, total),
        }
    }
}

/// Common list-query knobs; module filters are declared next to their
/// handlers.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

const fn default_page() -> u64 {
    1
}

const fn default_limit() -> u64 {
    10
}

impl PageQuery {
    /// Page is 1-based and the limit is capped to keep list responses
    /// bounded.
    #[must_use]
    pub const fn clamped(&self) -> (u64, u64) {
        let page = if self.page == 0 { 1 } else { self.page };
        let limit = if self.limit == 0 {
            10
        } else if self.limit > 100 {
            100
        } else {
            self.limit
        };
        (page, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_rounds_pages_up() {
        let p = Pagination::new(1, 10, 31);
        assert_eq!(p.pages, 4);

        let p = Pagination::new(1, 10, 30);
        assert_eq!(p.pages, 3);
    }

    #[test]
    fn test_page_query_clamps() {
        let q = PageQuery { page: 0, limit: 500 };
        assert_eq!(q.clamped(), (1, 100));

        let q = PageQuery { page: 3, limit: 25 };
        assert_eq!(q.clamped(), (3, 25));
    }
}
