//! API Routes Module
//!
//! 모든 HTTP 엔드포인트 정의
//!
//! # Routes
//! - `/health` - 헬스 체크
//! - `/api/menu`, `/api/contact`, `/api/company-*` - 정적 컨텐츠
//! - `/api/inquiry*`, `/api/verify-inquiry` - 문의
//! - `/api/materials*` - 자료실
//! - `/api/admin/*` - 관리자 전용

pub mod content;
pub mod health;
pub mod inquiry;
pub mod material;
