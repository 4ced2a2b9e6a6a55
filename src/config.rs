//! Configuration Module
//!
//! 환경변수 기반 설정 (12-Factor App)
//!
//! 앱 시작 시 `Config::from_env()`로 한 번 로드하고, 이후에는 불변 값으로
//! 각 서비스 생성자에 주입한다. 전역 mutable 설정은 두지 않는다.
//! 잘못된 값은 시작 시점에 즉시 실패 (fail-fast).

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// 업로드 허용 확장자 (소문자 비교)
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "txt", "pdf", "png", "jpg", "jpeg", "gif", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "zip",
    "rar",
];

/// 페이지당 문의 수
pub const INQUIRIES_PER_PAGE: i64 = 15;

/// 애플리케이션 설정
#[derive(Debug, Clone)]
pub struct Config {
    /// 서버 포트 (기본값: 3001)
    pub port: u16,

    /// SQLite 데이터베이스 파일 경로
    pub database_path: PathBuf,

    /// 업로드 파일 저장 루트
    pub upload_dir: PathBuf,

    /// 관리자 공유 비밀번호
    pub admin_password: String,

    /// 요청 본문 최대 크기 (업로드 포함)
    pub max_upload_bytes: usize,

    /// 환경 (development, staging, production)
    pub environment: Environment,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Config {
    /// 환경변수에서 설정 로드
    ///
    /// # Environment Variables
    ///
    /// - `PORT`: 서버 포트 (기본값: 3001)
    /// - `DATABASE_PATH`: SQLite 파일 경로 (기본값: /tmp/inquiries.db)
    /// - `UPLOAD_PATH`: 업로드 저장 루트 (기본값: /tmp/uploads)
    /// - `ADMIN_PASSWORD`: 관리자 비밀번호 (기본값: hanstar)
    /// - `MAX_UPLOAD_BYTES`: 업로드 최대 크기 (기본값: 16 MiB)
    /// - `ENVIRONMENT`: development | staging | production
    pub fn from_env() -> Result<Self> {
        let environment = match env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string())
            .to_lowercase()
            .as_str()
        {
            "production" => Environment::Production,
            "staging" => Environment::Staging,
            _ => Environment::Development,
        };

        Ok(Config {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .context("PORT must be a valid number")?,

            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "/tmp/inquiries.db".to_string())
                .into(),

            upload_dir: env::var("UPLOAD_PATH")
                .unwrap_or_else(|_| "/tmp/uploads".to_string())
                .into(),

            admin_password: env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "hanstar".to_string()),

            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| (16 * 1024 * 1024).to_string())
                .parse()
                .context("MAX_UPLOAD_BYTES must be a valid number")?,

            environment,
        })
    }

    /// 프로덕션 환경인지 확인
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // 환경변수 없이 기본값으로 설정 생성
        let config = Config::from_env().unwrap();
        assert_eq!(config.port, 3001);
        assert_eq!(config.max_upload_bytes, 16 * 1024 * 1024);
        assert_eq!(config.environment, Environment::Development);
    }
}
