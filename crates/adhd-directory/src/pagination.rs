use serde::Serialize;

pub const DIRECTORY_PAGE_SIZE: u64 = 20;
pub const CONTENT_PAGE_SIZE: u64 = 12;

/// One-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    pub fn new(page: u64, limit: u64) -> Self {
        Self { page, limit }
    }

    /// `(page - 1) * limit`. Page zero is treated as page one.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// Inclusive store range `[offset, offset + limit - 1]`, `None` for a zero limit.
    pub fn range(&self) -> Option<(u64, u64)> {
        if self.limit == 0 {
            return None;
        }
        let from = self.offset();
        Some((from, from.saturating_add(self.limit - 1)))
    }

    pub fn paginate(&self, total: u64) -> Pagination {
        Pagination {
            total,
            page: self.page,
            limit: self.limit,
            total_pages: total_pages(total, self.limit),
        }
    }
}

pub fn total_pages(total: u64, limit: u64) -> u64 {
    if limit == 0 {
        0
    } else {
        total.div_ceil(limit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl Pagination {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> PaginatedResponse<T> {
    /// Fallback shape used when a listing could not be fetched.
    pub fn empty(limit: u64) -> Self {
        Self {
            data: Vec::new(),
            pagination: Pagination {
                total: 0,
                page: 1,
                limit,
                total_pages: 0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_and_ranges_follow_page_arithmetic() {
        let request = PageRequest::new(3, 20);
        assert_eq!(request.offset(), 40);
        assert_eq!(request.range(), Some((40, 59)));
        assert_eq!(PageRequest::new(1, 12).range(), Some((0, 11)));
    }

    #[test]
    fn page_zero_does_not_underflow() {
        let request = PageRequest::new(0, 12);
        assert_eq!(request.offset(), 0);
        assert_eq!(request.range(), Some((0, 11)));
        assert_eq!(PageRequest::new(4, 0).range(), None);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(15, 12), 2);
        assert_eq!(total_pages(24, 12), 2);
        assert_eq!(total_pages(0, 12), 0);
        assert_eq!(total_pages(5, 0), 0);

        let pagination = PageRequest::new(2, 12).paginate(15);
        assert_eq!(pagination.total_pages, 2);
        assert!(pagination.has_previous());
        assert!(!pagination.has_next());
    }

    #[test]
    fn empty_response_serializes_in_camel_case() {
        let empty = PaginatedResponse::<u8>::empty(20);
        let value = serde_json::to_value(&empty).expect("serializes");
        assert_eq!(
            value,
            serde_json::json!({
                "data": [],
                "pagination": { "total": 0, "page": 1, "limit": 20, "totalPages": 0 }
            })
        );
    }
}
