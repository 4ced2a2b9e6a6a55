//! Services Module
//!
//! 비즈니스 로직을 담당하는 서비스 레이어
//!
//! # Services
//! - `InquiryService`: 문의 접수/조회/답변
//! - `MaterialService`: 자료 업로드/목록/다운로드
//! - `ContentProvider`: 정적 컨텐츠 (메뉴, 연락처, 회사소개)

mod content;
mod inquiry;
mod material;

pub use content::{ContentProvider, MenuSection};
pub use inquiry::{InquiryService, NewInquiry, NO_ANSWER_PLACEHOLDER};
pub use material::{MaterialService, NewMaterial, StoredFile};
