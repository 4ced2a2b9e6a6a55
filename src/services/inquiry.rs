//! Inquiry Service
//!
//! 고객 문의 접수/조회 비즈니스 로직.
//!
//! 일련번호는 날짜별로 "01"부터 시작해 접수 순서대로 1씩 증가한다.
//! 실제 번호 계산은 DB의 단일 INSERT 문 안에서 일어나므로 서비스 레이어는
//! 검증과 응답 구성만 담당한다.

use std::sync::Arc;

use chrono::Local;

use crate::config::INQUIRIES_PER_PAGE;
use crate::db::{Database, Inquiry};
use crate::error::ApiError;
use crate::types::Pagination;

/// 답변 전 placeholder 문구
pub const NO_ANSWER_PLACEHOLDER: &str = "아직 답변이 등록되지 않았습니다.";

/// 문의 접수 입력
#[derive(Debug, Default)]
pub struct NewInquiry {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub message: String,
    pub password: String,
}

pub struct InquiryService {
    db: Arc<Database>,
}

impl InquiryService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// 문의 접수
    ///
    /// 다섯 필드 모두 비어 있으면 안 된다. 날짜는 서버 로컬 기준.
    pub async fn submit(&self, input: NewInquiry) -> Result<Inquiry, ApiError> {
        for (field, value) in [
            ("name", &input.name),
            ("phone", &input.phone),
            ("email", &input.email),
            ("message", &input.message),
            ("password", &input.password),
        ] {
            if value.is_empty() {
                return Err(ApiError::ValidationError(format!(
                    "{field} 필드가 필요합니다."
                )));
            }
        }

        let date = Local::now().format("%Y-%m-%d").to_string();

        let inquiry = self
            .db
            .insert_inquiry(
                &date,
                &input.name,
                &input.phone,
                &input.email,
                &input.message,
                &input.password,
            )
            .await?;

        tracing::info!(date = %inquiry.date, serial = %inquiry.serial, "문의 접수 완료");
        Ok(inquiry)
    }

    /// 공개 문의 목록 (날짜/일련번호 내림차순, 15개씩)
    pub async fn list(&self, page: i64) -> Result<(Vec<Inquiry>, Pagination), ApiError> {
        let total_items = self.db.count_inquiries().await?;
        let pagination = Pagination::compute(page, total_items, INQUIRIES_PER_PAGE);

        if total_items == 0 {
            return Ok((Vec::new(), pagination));
        }

        let items = self
            .db
            .list_inquiries_by_date(pagination.per_page, pagination.offset())
            .await?;

        Ok((items, pagination))
    }

    /// 관리자 문의 목록 (접수 시각 내림차순, 15개씩)
    pub async fn admin_list(&self, page: i64) -> Result<(Vec<Inquiry>, Pagination), ApiError> {
        let total_items = self.db.count_inquiries().await?;
        let pagination = Pagination::compute(page, total_items, INQUIRIES_PER_PAGE);

        if total_items == 0 {
            return Ok((Vec::new(), pagination));
        }

        let items = self
            .db
            .list_inquiries_by_created(pagination.per_page, pagination.offset())
            .await?;

        Ok((items, pagination))
    }

    /// 비밀번호 확인 후 문의 조회
    ///
    /// 저장된 비밀번호와 대소문자까지 정확히 일치해야 한다.
    pub async fn verify(&self, id: i64, password: &str) -> Result<Inquiry, ApiError> {
        let inquiry = self
            .db
            .get_inquiry(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("해당 문의를 찾을 수 없습니다.".to_string()))?;

        if inquiry.password != password {
            return Err(ApiError::Unauthorized(
                "비밀번호가 일치하지 않습니다.".to_string(),
            ));
        }

        Ok(inquiry)
    }

    /// 관리자 답변 등록. 등록 시각(초 단위)을 돌려준다
    pub async fn add_answer(&self, id: i64, answer: &str) -> Result<String, ApiError> {
        if answer.is_empty() {
            return Err(ApiError::ValidationError(
                "문의 ID와 답변 내용이 필요합니다.".to_string(),
            ));
        }

        let answer_date = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        let updated = self.db.set_answer(id, answer, &answer_date).await?;
        if !updated {
            return Err(ApiError::NotFound(
                "해당 문의를 찾을 수 없습니다.".to_string(),
            ));
        }

        tracing::info!(inquiry_id = id, "답변 등록 완료");
        Ok(answer_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn service() -> InquiryService {
        let db = Database::connect_in_memory().await.unwrap();
        InquiryService::new(Arc::new(db))
    }

    fn inquiry(name: &str, password: &str) -> NewInquiry {
        NewInquiry {
            name: name.to_string(),
            phone: "010-1234-5678".to_string(),
            email: "test@hanstar.co".to_string(),
            message: "운송 문의드립니다.".to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_serials_increment_per_day() {
        let svc = service().await;

        for expected in ["01", "02", "03"] {
            let saved = svc.submit(inquiry("홍길동", "pw")).await.unwrap();
            assert_eq!(saved.serial, expected);
        }
    }

    #[tokio::test]
    async fn test_empty_field_rejected_and_not_persisted() {
        let svc = service().await;

        let mut input = inquiry("홍길동", "pw");
        input.email = String::new();

        let err = svc.submit(input).await.unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)));

        let (items, pagination) = svc.list(1).await.unwrap();
        assert!(items.is_empty());
        assert_eq!(pagination.total_items, 0);
        assert_eq!(pagination.current_page, 1);
        assert_eq!(pagination.total_pages, 0);
    }

    #[tokio::test]
    async fn test_verify_password_and_status() {
        let svc = service().await;
        let saved = svc.submit(inquiry("홍길동", "secret")).await.unwrap();

        // 잘못된 비밀번호
        let err = svc.verify(saved.id, "wrong").await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));

        // 없는 id
        let err = svc.verify(9999, "secret").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        // 답변 전에는 대기중
        let found = svc.verify(saved.id, "secret").await.unwrap();
        assert_eq!(found.status_label(), "대기중");
        assert!(found.answer.is_none());

        // 답변 후에는 답변완료, answer/answer_date 동시 세팅
        svc.add_answer(saved.id, "답변드립니다.").await.unwrap();
        let found = svc.verify(saved.id, "secret").await.unwrap();
        assert_eq!(found.status_label(), "답변완료");
        assert_eq!(found.answer.as_deref(), Some("답변드립니다."));
        assert!(found.answer_date.is_some());
    }

    #[tokio::test]
    async fn test_add_answer_unknown_id() {
        let svc = service().await;
        let err = svc.add_answer(42, "답변").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_pagination_clamps_page() {
        let svc = service().await;

        for i in 0..16 {
            svc.submit(inquiry(&format!("고객{i}"), "pw")).await.unwrap();
        }

        let (items, pagination) = svc.list(1).await.unwrap();
        assert_eq!(items.len(), 15);
        assert_eq!(pagination.total_pages, 2);

        let (items, pagination) = svc.list(2).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(pagination.current_page, 2);

        // 범위 밖 페이지는 마지막 페이지로 보정
        let (items, pagination) = svc.list(5).await.unwrap();
        assert_eq!(pagination.current_page, 2);
        assert_eq!(items.len(), 1);
    }
}
