//! Database Models
//!
//! 문의(inquiries)와 자료(materials) 두 테이블의 행 구조.
//! 날짜/시각 컬럼은 원본 저장 형식 그대로 TEXT로 다룬다
//! (`YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`).

use sqlx::FromRow;

/// 고객 문의
#[derive(Debug, Clone, FromRow)]
pub struct Inquiry {
    pub id: i64,

    /// 접수 날짜 (YYYY-MM-DD)
    pub date: String,

    /// 하루 단위 일련번호, 2자리 0-패딩 ("01"부터)
    /// (date, serial) 쌍은 유일하다
    pub serial: String,

    pub name: String,
    pub phone: String,
    pub email: String,
    pub message: String,

    /// 답변 조회용 비밀번호 (평문, 공개 목록에는 내려주지 않음)
    pub password: String,

    /// 관리자 답변. answer가 있으면 answer_date도 반드시 있다
    pub answer: Option<String>,
    pub answer_date: Option<String>,

    pub created_at: String,
}

impl Inquiry {
    /// 답변 상태 라벨
    pub fn status_label(&self) -> &'static str {
        if self.answer.is_some() {
            "답변완료"
        } else {
            "대기중"
        }
    }
}

/// 배포 자료
#[derive(Debug, Clone, FromRow)]
pub struct Material {
    pub id: i64,
    pub title: String,
    pub description: String,

    /// 업로더가 올린 원래 파일명 (표시용)
    pub file_name: String,

    /// 서버 저장 경로 (업로드 루트 하위)
    pub file_path: String,

    /// 사람이 읽는 크기 문자열 ("1.8 MB", "512.0 KB")
    pub file_size: String,

    /// MIME 타입 (미상이면 application/octet-stream)
    pub file_type: String,

    pub category: String,
    pub download_count: i64,

    /// 비활성 자료는 사용자 목록/다운로드에서 제외
    pub is_active: bool,

    pub created_at: String,
    pub updated_at: String,
}
