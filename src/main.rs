//! Hanstar Company Site API Server
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Client (Frontend)                       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Axum Web Server                         │
//! │  ┌─────────────────────────────────────────────────────────┐│
//! │  │                      Routes Layer                        ││
//! │  │  /health  /api/inquiry*  /api/materials*  /api/admin/*  ││
//! │  └─────────────────────────────────────────────────────────┘│
//! │  ┌─────────────────────────────────────────────────────────┐│
//! │  │                    Services Layer                        ││
//! │  │  InquiryService   MaterialService   ContentProvider     ││
//! │  └─────────────────────────────────────────────────────────┘│
//! │  ┌─────────────────────────────────────────────────────────┐│
//! │  │                      Data Layer                          ││
//! │  │  SQLite (inquiries, materials)   업로드 파일 저장소      ││
//! │  └─────────────────────────────────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// 라이브러리에서 가져오기
use hanstar_api::{
    routes, AppState, Config, ContentProvider, Database, InquiryService, MaterialService,
    StaticSecretGate,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 환경변수 로드
    dotenvy::dotenv().ok();

    // 로깅 초기화
    // RUST_LOG=debug,sqlx=warn 형태로 레벨 제어 가능
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hanstar_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("🚀 Starting Hanstar Company Site API Server");

    // 설정 로드
    let config = Config::from_env()?;
    tracing::info!("📋 Configuration loaded");

    // 업로드 디렉토리 준비
    tokio::fs::create_dir_all(&config.upload_dir).await?;
    tracing::info!("📁 Upload directory ready: {}", config.upload_dir.display());

    // 데이터베이스 연결 (스키마 초기화 포함)
    let db = Arc::new(Database::connect(&config.database_path).await?);
    tracing::info!("🗄️  Database connected");

    // 서비스 초기화
    let inquiries = InquiryService::new(Arc::clone(&db));
    let materials = MaterialService::new(Arc::clone(&db), &config);
    let content = ContentProvider::new();
    let admin = StaticSecretGate::new(config.admin_password.clone());

    // 앱 상태 구성
    let state = AppState {
        db,
        inquiries: Arc::new(inquiries),
        materials: Arc::new(materials),
        content: Arc::new(content),
        admin: Arc::new(admin),
        config: Arc::new(config.clone()),
    };

    // 라우터 구성
    let app = create_router(state);

    // 서버 시작
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🌐 Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// 라우터 생성
///
/// # Route Structure
///
/// ```text
/// GET  /health                          - 서버 상태 확인
///
/// GET  /api/menu                        - 메뉴 구조
/// GET  /api/contact                     - 연락처
/// GET  /api/company-intro               - 회사소개
/// GET  /api/company-history             - 회사연혁
///
/// POST /api/inquiry                     - 문의 접수
/// GET  /api/inquiry-list                - 문의 목록 (페이지네이션)
/// POST /api/verify-inquiry              - 비밀번호 확인 후 답변 조회
/// POST /api/admin/inquiry-list          - 관리자 문의 목록
/// POST /api/admin/add-answer            - 관리자 답변 등록
///
/// GET  /api/materials                   - 자료 목록 (활성만)
/// GET  /api/materials/:id/download      - 자료 미리보기 (카운트 유지)
/// POST /api/materials/:id/download      - 자료 다운로드 (카운트 증가)
/// GET  /api/admin/materials             - 관리자 자료 목록
/// POST /api/admin/materials             - 자료 등록 (multipart)
/// PUT  /api/admin/materials/:id         - 자료 수정
/// DELETE /api/admin/materials/:id       - 자료 삭제
/// ```
fn create_router(state: AppState) -> Router {
    // CORS 설정
    // 프로덕션에서는 특정 도메인만 허용
    // 개발 환경에서는 localhost 허용
    use tower_http::cors::AllowOrigin;

    let cors = if state.config.is_production() {
        // 프로덕션: 특정 도메인만 허용 (환경변수로 설정)
        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "https://hanstar.co".to_string());
        let origins: Vec<_> = allowed_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
            ])
            .allow_headers([axum::http::header::CONTENT_TYPE])
    } else {
        // 개발: 모든 오리진 허용
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let max_body = state.config.max_upload_bytes;

    Router::new()
        // Health check
        .route("/health", get(routes::health::health_check))
        // 정적 컨텐츠
        .route("/api/menu", get(routes::content::get_menu))
        .route("/api/contact", get(routes::content::get_contact))
        .route("/api/company-intro", get(routes::content::get_company_intro))
        .route(
            "/api/company-history",
            get(routes::content::get_company_history),
        )
        // 문의
        .route("/api/inquiry", post(routes::inquiry::submit_inquiry))
        .route("/api/inquiry-list", get(routes::inquiry::list_inquiries))
        .route("/api/verify-inquiry", post(routes::inquiry::verify_inquiry))
        .route(
            "/api/admin/inquiry-list",
            post(routes::inquiry::admin_list_inquiries),
        )
        .route(
            "/api/admin/add-answer",
            post(routes::inquiry::admin_add_answer),
        )
        // 자료실
        .route("/api/materials", get(routes::material::list_materials))
        .route(
            "/api/materials/:id/download",
            get(routes::material::download_material).post(routes::material::download_material),
        )
        .route(
            "/api/admin/materials",
            get(routes::material::admin_list_materials).post(routes::material::register_material),
        )
        .route(
            "/api/admin/materials/:id",
            axum::routing::put(routes::material::update_material)
                .delete(routes::material::delete_material),
        )
        // 미들웨어
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // 상태 주입
        .with_state(state)
}
