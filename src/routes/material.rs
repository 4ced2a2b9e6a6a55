//! Material Endpoints
//!
//! 자료실: 공개 목록/다운로드와 관리자용 등록/수정/삭제.
//!
//! 등록은 multipart 업로드이며 본문 크기는 라우터의 body limit(16 MiB)으로
//! 제한된다. 다운로드는 GET(미리보기, 카운트 유지)과 POST(실제 다운로드,
//! 카운트 증가)를 모두 받는다.

use axum::{
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use tokio_util::io::ReaderStream;

use crate::db::Material;
use crate::error::ApiError;
use crate::services::NewMaterial;
use crate::AppState;

// ============ Request/Response Types ============

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
}

/// 공개 목록 항목 (저장 경로, 활성 플래그 비노출)
#[derive(Debug, Serialize)]
pub struct PublicMaterial {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub file_name: String,
    pub file_size: String,
    pub file_type: String,
    pub category: String,
    pub download_count: i64,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub materials: Vec<PublicMaterial>,
}

#[derive(Debug, Deserialize)]
pub struct AdminListQuery {
    #[serde(default)]
    pub admin_password: String,
}

#[derive(Debug, Serialize)]
pub struct AdminMaterial {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub file_name: String,
    pub file_size: String,
    pub file_type: String,
    pub category: String,
    pub download_count: i64,
    pub is_active: bool,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct AdminListResponse {
    pub success: bool,
    pub materials: Vec<AdminMaterial>,
}

#[derive(Debug, Serialize)]
pub struct FileInfo {
    pub original_name: String,
    pub saved_name: String,
    pub size: String,
    #[serde(rename = "type")]
    pub content_type: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub file_info: FileInfo,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    #[serde(default)]
    pub admin_password: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    #[serde(default)]
    pub admin_password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

// ============ Handlers ============

/// GET /api/materials?category=
///
/// 사용자용 자료 목록 (활성 자료만)
pub async fn list_materials(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, ApiError> {
    let materials = state.materials.list(query.category.as_deref()).await?;

    Ok(Json(ListResponse {
        success: true,
        materials: materials.into_iter().map(to_public).collect(),
    }))
}

/// GET /api/admin/materials?admin_password=
///
/// 관리자용 자료 목록 (비활성 포함)
pub async fn admin_list_materials(
    State(state): State<AppState>,
    Query(query): Query<AdminListQuery>,
) -> Result<Json<AdminListResponse>, ApiError> {
    state.admin.require(&query.admin_password)?;

    let materials = state.materials.admin_list().await?;

    Ok(Json(AdminListResponse {
        success: true,
        materials: materials.into_iter().map(to_admin).collect(),
    }))
}

/// POST /api/admin/materials (multipart)
///
/// 새 자료 등록 (파일 업로드 포함)
pub async fn register_material(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<RegisterResponse>, ApiError> {
    let mut admin_password = String::new();
    let mut title = String::new();
    let mut description = String::new();
    let mut category = "기타".to_string();
    let mut file: Option<(String, Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(map_multipart_error)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "admin_password" => {
                admin_password = field.text().await.map_err(map_multipart_error)?;
            }
            "title" => {
                title = field.text().await.map_err(map_multipart_error)?;
            }
            "description" => {
                description = field.text().await.map_err(map_multipart_error)?;
            }
            "category" => {
                let value = field.text().await.map_err(map_multipart_error)?;
                if !value.is_empty() {
                    category = value;
                }
            }
            "file" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let content_type = field.content_type().map(|t| t.to_string());
                let data = field.bytes().await.map_err(map_multipart_error)?.to_vec();
                file = Some((file_name, content_type, data));
            }
            _ => {}
        }
    }

    state.admin.require(&admin_password)?;

    let (file_name, content_type, data) = file.ok_or_else(|| {
        ApiError::ValidationError("파일이 선택되지 않았습니다.".to_string())
    })?;

    let (_, stored) = state
        .materials
        .register(NewMaterial {
            title,
            description,
            category,
            file_name,
            content_type,
            data,
        })
        .await?;

    Ok(Json(RegisterResponse {
        success: true,
        message: "자료가 성공적으로 등록되었습니다.".to_string(),
        file_info: FileInfo {
            original_name: stored.original_name,
            saved_name: stored.saved_name,
            size: stored.size,
            content_type: stored.content_type,
        },
    }))
}

/// GET|POST /api/materials/:id/download
///
/// 자료 다운로드. POST일 때만 다운로드 카운트 증가
pub async fn download_material(
    State(state): State<AppState>,
    method: Method,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let count_download = method == Method::POST;
    let (material, file) = state.materials.open_download(id, count_download).await?;

    let stream = ReaderStream::new(file);

    let content_type = HeaderValue::from_str(&material.file_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(&material.file_name),
        )
        .body(Body::from_stream(stream))
        .map_err(|e| {
            tracing::error!("다운로드 응답 생성 실패: {:?}", e);
            ApiError::InternalError
        })
}

/// PUT /api/admin/materials/:id
///
/// 자료 수정 (제목/설명/카테고리/활성 여부)
pub async fn update_material(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.admin.require(&req.admin_password)?;

    state
        .materials
        .update(
            id,
            req.title.as_deref().unwrap_or(""),
            req.description.as_deref().unwrap_or(""),
            req.category.as_deref().unwrap_or("기타"),
            req.is_active.unwrap_or(true),
        )
        .await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "자료가 성공적으로 수정되었습니다.".to_string(),
    }))
}

/// DELETE /api/admin/materials/:id
///
/// 자료 삭제 (레코드 + 저장 파일)
pub async fn delete_material(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<DeleteRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.admin.require(&req.admin_password)?;

    state.materials.delete(id).await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "자료가 성공적으로 삭제되었습니다.".to_string(),
    }))
}

// ============ Helpers ============

fn to_public(m: Material) -> PublicMaterial {
    PublicMaterial {
        id: m.id,
        title: m.title,
        description: m.description,
        file_name: m.file_name,
        file_size: m.file_size,
        file_type: m.file_type,
        category: m.category,
        download_count: m.download_count,
        created_at: m.created_at,
    }
}

fn to_admin(m: Material) -> AdminMaterial {
    AdminMaterial {
        id: m.id,
        title: m.title,
        description: m.description,
        file_name: m.file_name,
        file_size: m.file_size,
        file_type: m.file_type,
        category: m.category,
        download_count: m.download_count,
        is_active: m.is_active,
        created_at: m.created_at,
    }
}

fn map_multipart_error(err: axum::extract::multipart::MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge("업로드 가능한 최대 크기는 16MB입니다.".to_string())
    } else {
        ApiError::BadRequest(err.to_string())
    }
}

/// 한글 파일명도 안전하게 내려가도록 RFC 5987 형식으로 인코딩
fn content_disposition(file_name: &str) -> HeaderValue {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_graphic() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let encoded: String = file_name
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'-' | b'_' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{b:02X}"),
        })
        .collect();

    HeaderValue::from_str(&format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}"
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition_ascii() {
        let value = content_disposition("report.pdf");
        let value = value.to_str().unwrap();
        assert!(value.contains("filename=\"report.pdf\""));
        assert!(value.contains("filename*=UTF-8''report.pdf"));
    }

    #[test]
    fn test_content_disposition_korean() {
        let value = content_disposition("무역자료.pdf");
        // 헤더 값은 항상 ASCII
        assert!(value.to_str().is_ok());
        assert!(value.to_str().unwrap().contains("%EB%AC%B4"));
    }
}
