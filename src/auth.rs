//! Admin Gate Module
//!
//! 관리자 권한이 필요한 모든 엔드포인트를 지키는 단일 관문.
//!
//! trait으로 추상화해 두어 서비스 로직 변경 없이 더 강한 인증 방식
//! (관리자별 계정, 토큰, rate limiting)으로 교체할 수 있다.
//! 세션은 발급하지 않으며 모든 요청이 매번 재인증한다.

use crate::error::ApiError;

/// 관리자 인증 capability
///
/// `AppState`에 `Arc<dyn AdminGate>`로 주입된다.
pub trait AdminGate: Send + Sync {
    /// 전달받은 비밀번호가 유효한지 확인
    fn authorize(&self, secret: &str) -> bool;

    /// 인증 실패 시 공통 에러로 변환하는 헬퍼
    fn require(&self, secret: &str) -> Result<(), ApiError> {
        if self.authorize(secret) {
            Ok(())
        } else {
            Err(ApiError::Unauthorized(
                "관리자 인증에 실패했습니다.".to_string(),
            ))
        }
    }
}

/// 설정된 고정 비밀번호 하나와 정확히 비교하는 기본 구현
pub struct StaticSecretGate {
    secret: String,
}

impl StaticSecretGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl AdminGate for StaticSecretGate {
    fn authorize(&self, secret: &str) -> bool {
        secret == self.secret
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_only() {
        let gate = StaticSecretGate::new("hanstar");
        assert!(gate.authorize("hanstar"));
        assert!(!gate.authorize("Hanstar"));
        assert!(!gate.authorize("hanstar "));
        assert!(!gate.authorize(""));
    }

    #[test]
    fn test_require_maps_to_unauthorized() {
        let gate = StaticSecretGate::new("hanstar");
        assert!(gate.require("hanstar").is_ok());
        assert!(matches!(
            gate.require("wrong"),
            Err(ApiError::Unauthorized(_))
        ));
    }
}
