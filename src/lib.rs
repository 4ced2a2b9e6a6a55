//! Hanstar Company Site API Library
//!
//! # Overview
//!
//! ㈜한스타 회사 사이트 백엔드. 정적 컨텐츠(메뉴/회사소개/연락처)와 함께
//! 두 가지 기록 기능을 제공한다:
//!
//! - 고객 문의함: 날짜별 일련번호 접수, 비밀번호 확인 후 답변 조회,
//!   관리자 답변 등록
//! - 자료실: 관리자 업로드/수정/삭제, 카테고리별 목록, 다운로드 카운트
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                         API                              │
//! │                                                          │
//! │  ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌─────────┐    │
//! │  │ Routes  │  │Services │  │   DB    │  │  Types  │    │
//! │  └────┬────┘  └────┬────┘  └────┬────┘  └────┬────┘    │
//! │       │            │            │            │          │
//! │       └────────────┴────────────┴────────────┘          │
//! │                         │                                │
//! └─────────────────────────┼────────────────────────────────┘
//!                           │
//!                           ▼
//!                  ┌────────────────┐
//!                  │ SQLite + 파일  │
//!                  └────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config`: 환경 설정 관리
//! - `error`: 에러 타입 및 처리
//! - `auth`: 관리자 인증 게이트
//! - `routes`: HTTP 엔드포인트 핸들러
//! - `services`: 비즈니스 로직 (문의, 자료, 정적 컨텐츠)
//! - `db`: 데이터베이스 연동
//! - `types`: 공통 타입 정의

use std::sync::Arc;

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod services;
pub mod types;

// Re-exports for convenience
pub use auth::{AdminGate, StaticSecretGate};
pub use config::Config;
pub use db::Database;
pub use error::ApiError;
pub use services::{ContentProvider, InquiryService, MaterialService};

/// 애플리케이션 전역 상태
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub inquiries: Arc<InquiryService>,
    pub materials: Arc<MaterialService>,
    pub content: Arc<ContentProvider>,
    pub admin: Arc<dyn AdminGate>,
    pub config: Arc<Config>,
}
