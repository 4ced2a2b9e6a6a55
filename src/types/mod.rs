//! Common Types Module
//!
//! 애플리케이션 전반에서 사용되는 공통 타입 정의

use serde::Serialize;

/// 페이지네이션 정보
///
/// 문의 목록 응답에 그대로 직렬화된다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_items: i64,
    pub per_page: i64,
}

impl Pagination {
    /// 요청 페이지를 유효 범위로 보정하고 페이지네이션 정보를 계산
    ///
    /// - `total_pages = ceil(total_items / per_page)`
    /// - 페이지는 `[1, total_pages]`로 clamp
    /// - 항목이 하나도 없으면 `current_page = 1, total_pages = 0`
    pub fn compute(requested_page: i64, total_items: i64, per_page: i64) -> Self {
        if total_items == 0 {
            return Self {
                current_page: 1,
                total_pages: 0,
                total_items: 0,
                per_page,
            };
        }

        // 올림 나눗셈
        let total_pages = (total_items + per_page - 1) / per_page;
        let current_page = requested_page.clamp(1, total_pages);

        Self {
            current_page,
            total_pages,
            total_items,
            per_page,
        }
    }

    /// SQL LIMIT/OFFSET용 오프셋
    pub fn offset(&self) -> i64 {
        (self.current_page - 1) * self.per_page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list() {
        let p = Pagination::compute(3, 0, 15);
        assert_eq!(p.current_page, 1);
        assert_eq!(p.total_pages, 0);
        assert_eq!(p.total_items, 0);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_exact_page_boundary() {
        // 15개면 정확히 1페이지
        let p = Pagination::compute(1, 15, 15);
        assert_eq!(p.total_pages, 1);

        // 16개면 2페이지
        let p = Pagination::compute(1, 16, 15);
        assert_eq!(p.total_pages, 2);
    }

    #[test]
    fn test_page_clamping() {
        // 페이지 초과 요청은 마지막 페이지로
        let p = Pagination::compute(5, 16, 15);
        assert_eq!(p.current_page, 2);
        assert_eq!(p.offset(), 15);

        // 0 이하 요청은 1페이지로
        let p = Pagination::compute(0, 16, 15);
        assert_eq!(p.current_page, 1);
        let p = Pagination::compute(-3, 16, 15);
        assert_eq!(p.current_page, 1);
    }
}
