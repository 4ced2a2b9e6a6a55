//! Inquiry Endpoints
//!
//! 문의 접수/목록/비밀번호 확인과 관리자용 목록/답변 등록.
//!
//! 공개 목록 응답에는 비밀번호를 포함하지 않는다. 비밀번호는 확인
//! 엔드포인트의 비교용으로만 쓰인다.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::Inquiry;
use crate::error::ApiError;
use crate::services::{NewInquiry, NO_ANSWER_PLACEHOLDER};
use crate::types::Pagination;
use crate::AppState;

// ============ Request/Response Types ============

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
}

/// 공개 목록 항목. 비밀번호는 직렬화하지 않는다
#[derive(Debug, Serialize)]
pub struct ListItem {
    pub row_id: i64,
    pub date: String,
    pub serial: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub question: String,
    pub answer: String,
    pub answer_date: String,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub inquiries: Vec<ListItem>,
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub row_id: Option<i64>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub inquiry: InquiryView,
}

#[derive(Debug, Serialize)]
pub struct InquiryView {
    pub date: String,
    pub serial: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub question: String,
    pub answer_content: String,
    pub answer_status: String,
}

#[derive(Debug, Deserialize)]
pub struct AdminListRequest {
    #[serde(default)]
    pub admin_password: String,
    pub page: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct AdminListItem {
    pub id: i64,
    pub date: String,
    pub serial: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub question: String,
    pub answer: String,
    pub answer_date: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct AdminListResponse {
    pub success: bool,
    pub inquiries: Vec<AdminListItem>,
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize)]
pub struct AddAnswerRequest {
    #[serde(default)]
    pub admin_password: String,
    pub inquiry_id: Option<i64>,
    pub answer_content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AddAnswerResponse {
    pub success: bool,
    pub message: String,
    pub answer_date: String,
}

// ============ Handlers ============

/// POST /api/inquiry
///
/// 문의 접수. 다섯 필드 모두 필수.
pub async fn submit_inquiry(
    State(state): State<AppState>,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    state
        .inquiries
        .submit(NewInquiry {
            name: req.name,
            phone: req.phone,
            email: req.email,
            message: req.message,
            password: req.password,
        })
        .await?;

    Ok(Json(SubmitResponse {
        success: true,
        message: "문의가 성공적으로 등록되었습니다.".to_string(),
    }))
}

/// GET /api/inquiry-list?page=N
///
/// 공개 문의 목록 (날짜/일련번호 내림차순, 15개씩)
pub async fn list_inquiries(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, ApiError> {
    let page = query.page.unwrap_or(1);
    let (items, pagination) = state.inquiries.list(page).await?;

    Ok(Json(ListResponse {
        inquiries: items.into_iter().map(to_list_item).collect(),
        pagination,
    }))
}

/// POST /api/verify-inquiry
///
/// 비밀번호 확인 후 문의 내용과 답변 상태 반환
pub async fn verify_inquiry(
    State(state): State<AppState>,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let (id, password) = match (req.row_id, req.password.as_deref()) {
        (Some(id), Some(password)) if !password.is_empty() => (id, password),
        _ => {
            return Err(ApiError::ValidationError(
                "문의 ID와 비밀번호가 필요합니다.".to_string(),
            ))
        }
    };

    let inquiry = state.inquiries.verify(id, password).await?;

    let answer_status = inquiry.status_label().to_string();
    let answer_content = inquiry
        .answer
        .unwrap_or_else(|| NO_ANSWER_PLACEHOLDER.to_string());

    Ok(Json(VerifyResponse {
        success: true,
        inquiry: InquiryView {
            date: inquiry.date,
            serial: inquiry.serial,
            name: inquiry.name,
            phone: inquiry.phone,
            email: inquiry.email,
            question: inquiry.message,
            answer_content,
            answer_status,
        },
    }))
}

/// POST /api/admin/inquiry-list
///
/// 관리자 문의 목록 (접수 시각 내림차순, status 라벨 포함)
pub async fn admin_list_inquiries(
    State(state): State<AppState>,
    Json(req): Json<AdminListRequest>,
) -> Result<Json<AdminListResponse>, ApiError> {
    state.admin.require(&req.admin_password)?;

    let page = req.page.unwrap_or(1);
    let (items, pagination) = state.inquiries.admin_list(page).await?;

    Ok(Json(AdminListResponse {
        success: true,
        inquiries: items.into_iter().map(to_admin_item).collect(),
        pagination,
    }))
}

/// POST /api/admin/add-answer
///
/// 관리자 답변 등록
pub async fn admin_add_answer(
    State(state): State<AppState>,
    Json(req): Json<AddAnswerRequest>,
) -> Result<Json<AddAnswerResponse>, ApiError> {
    state.admin.require(&req.admin_password)?;

    let (id, answer) = match (req.inquiry_id, req.answer_content.as_deref()) {
        (Some(id), Some(answer)) if !answer.is_empty() => (id, answer),
        _ => {
            return Err(ApiError::ValidationError(
                "문의 ID와 답변 내용이 필요합니다.".to_string(),
            ))
        }
    };

    let answer_date = state.inquiries.add_answer(id, answer).await?;

    Ok(Json(AddAnswerResponse {
        success: true,
        message: "답변이 성공적으로 등록되었습니다.".to_string(),
        answer_date,
    }))
}

// ============ Helpers ============

fn to_list_item(inquiry: Inquiry) -> ListItem {
    ListItem {
        row_id: inquiry.id,
        date: inquiry.date,
        serial: inquiry.serial,
        name: inquiry.name,
        phone: inquiry.phone,
        email: inquiry.email,
        question: inquiry.message,
        answer: inquiry.answer.unwrap_or_default(),
        answer_date: inquiry.answer_date.unwrap_or_default(),
    }
}

fn to_admin_item(inquiry: Inquiry) -> AdminListItem {
    let status = inquiry.status_label().to_string();
    AdminListItem {
        id: inquiry.id,
        date: inquiry.date,
        serial: inquiry.serial,
        name: inquiry.name,
        phone: inquiry.phone,
        email: inquiry.email,
        question: inquiry.message,
        answer: inquiry.answer.unwrap_or_default(),
        answer_date: inquiry.answer_date.unwrap_or_default(),
        status,
    }
}
