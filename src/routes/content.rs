//! Static Content Endpoints
//!
//! 메뉴, 연락처, 회사소개, 회사연혁. `ContentProvider`가 주는 정적 데이터를
//! 그대로 JSON으로 감싼다.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::services::MenuSection;
use crate::AppState;

#[derive(Serialize)]
pub struct MenuResponse {
    pub menu: Vec<MenuSection>,
}

#[derive(Serialize)]
pub struct ContactResponse {
    pub contact: Vec<String>,
}

#[derive(Serialize)]
pub struct CompanyIntroResponse {
    pub company_intro: String,
}

#[derive(Serialize)]
pub struct CompanyHistoryResponse {
    pub company_history: Vec<String>,
}

/// GET /api/menu
pub async fn get_menu(State(state): State<AppState>) -> Json<MenuResponse> {
    Json(MenuResponse {
        menu: state.content.menu(),
    })
}

/// GET /api/contact
pub async fn get_contact(State(state): State<AppState>) -> Json<ContactResponse> {
    Json(ContactResponse {
        contact: state.content.contact(),
    })
}

/// GET /api/company-intro
pub async fn get_company_intro(State(state): State<AppState>) -> Json<CompanyIntroResponse> {
    Json(CompanyIntroResponse {
        company_intro: state.content.company_intro(),
    })
}

/// GET /api/company-history
pub async fn get_company_history(State(state): State<AppState>) -> Json<CompanyHistoryResponse> {
    Json(CompanyHistoryResponse {
        company_history: state.content.company_history(),
    })
}
