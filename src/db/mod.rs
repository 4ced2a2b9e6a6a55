//! Database Module
//!
//! SQLite + SQLx 기반 저장소.
//!
//! 커넥션 풀은 시작 시 한 번 만들고, 스키마는 `CREATE TABLE IF NOT EXISTS`로
//! 초기화하므로 몇 번을 다시 실행해도 안전하다 (멱등).
//!
//! 일련번호 할당과 다운로드 카운트 증가는 둘 다 read-then-write가 아니라
//! 단일 SQL 문으로 처리한다. 같은 날짜에 동시 접수가 몰려도 중복 일련번호가
//! 나오지 않고, 동시 다운로드에서 카운트가 유실되지 않는다.

mod models;

pub use models::*;

use std::path::Path;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

/// 데이터베이스 연결 및 쿼리 담당
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// 데이터베이스 연결
    ///
    /// 파일이 없으면 생성하고, 연결 직후 스키마를 초기화한다.
    pub async fn connect(database_path: &Path) -> Result<Self> {
        if let Some(dir) = database_path.parent() {
            if !dir.as_os_str().is_empty() {
                tokio::fs::create_dir_all(dir).await?;
            }
        }

        // WAL 모드: 읽기가 쓰기를 막지 않음
        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(std::time::Duration::from_secs(3))
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.init_schema().await?;
        Ok(db)
    }

    /// 테스트용 인메모리 데이터베이스
    ///
    /// `:memory:`는 커넥션마다 별도 DB가 되므로 커넥션 1개로 고정한다.
    pub async fn connect_in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let db = Self { pool };
        db.init_schema().await?;
        Ok(db)
    }

    /// 스키마 초기화 (멱등, 반복 호출 안전)
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS inquiries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                serial TEXT NOT NULL,
                name TEXT NOT NULL,
                phone TEXT NOT NULL,
                email TEXT NOT NULL,
                message TEXT NOT NULL,
                password TEXT NOT NULL,
                answer TEXT,
                answer_date TEXT,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_inquiries_date_serial
            ON inquiries (date, serial)
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS materials (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                file_name TEXT NOT NULL,
                file_path TEXT NOT NULL,
                file_size TEXT NOT NULL,
                file_type TEXT NOT NULL,
                category TEXT NOT NULL DEFAULT '기타',
                download_count INTEGER NOT NULL DEFAULT 0,
                is_active BOOLEAN NOT NULL DEFAULT 1,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Health check
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    // ============ 문의 (inquiries) ============

    /// 문의 저장
    ///
    /// 오늘 날짜의 일련번호를 INSERT 문 안에서 계산한다
    /// (MAX(serial) + 1, 없으면 1). 단일 문이라 동시 접수에도
    /// 같은 번호가 두 번 나갈 수 없다.
    pub async fn insert_inquiry(
        &self,
        date: &str,
        name: &str,
        phone: &str,
        email: &str,
        message: &str,
        password: &str,
    ) -> sqlx::Result<Inquiry> {
        sqlx::query_as::<_, Inquiry>(
            r#"
            INSERT INTO inquiries (date, serial, name, phone, email, message, password)
            VALUES (
                ?1,
                printf(
                    '%02d',
                    COALESCE(
                        (SELECT MAX(CAST(serial AS INTEGER)) FROM inquiries WHERE date = ?1),
                        0
                    ) + 1
                ),
                ?2, ?3, ?4, ?5, ?6
            )
            RETURNING id, date, serial, name, phone, email, message, password,
                      answer, answer_date, created_at
            "#,
        )
        .bind(date)
        .bind(name)
        .bind(phone)
        .bind(email)
        .bind(message)
        .bind(password)
        .fetch_one(&self.pool)
        .await
    }

    /// 전체 문의 수
    pub async fn count_inquiries(&self) -> sqlx::Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM inquiries")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    /// 문의 목록 (날짜 + 일련번호 내림차순, 최신 우선)
    pub async fn list_inquiries_by_date(
        &self,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<Vec<Inquiry>> {
        sqlx::query_as::<_, Inquiry>(
            r#"
            SELECT id, date, serial, name, phone, email, message, password,
                   answer, answer_date, created_at
            FROM inquiries
            ORDER BY date DESC, serial DESC
            LIMIT ?1 OFFSET ?2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    /// 문의 목록 (접수 시각 내림차순, 관리자용)
    pub async fn list_inquiries_by_created(
        &self,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<Vec<Inquiry>> {
        sqlx::query_as::<_, Inquiry>(
            r#"
            SELECT id, date, serial, name, phone, email, message, password,
                   answer, answer_date, created_at
            FROM inquiries
            ORDER BY created_at DESC, id DESC
            LIMIT ?1 OFFSET ?2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    /// 문의 단건 조회
    pub async fn get_inquiry(&self, id: i64) -> sqlx::Result<Option<Inquiry>> {
        sqlx::query_as::<_, Inquiry>(
            r#"
            SELECT id, date, serial, name, phone, email, message, password,
                   answer, answer_date, created_at
            FROM inquiries
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// 답변 등록. 해당 id가 없으면 false
    pub async fn set_answer(
        &self,
        id: i64,
        answer: &str,
        answer_date: &str,
    ) -> sqlx::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE inquiries
            SET answer = ?1, answer_date = ?2
            WHERE id = ?3
            "#,
        )
        .bind(answer)
        .bind(answer_date)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    // ============ 자료 (materials) ============

    /// 자료 등록
    pub async fn insert_material(
        &self,
        title: &str,
        description: &str,
        file_name: &str,
        file_path: &str,
        file_size: &str,
        file_type: &str,
        category: &str,
    ) -> sqlx::Result<Material> {
        sqlx::query_as::<_, Material>(
            r#"
            INSERT INTO materials (title, description, file_name, file_path,
                                   file_size, file_type, category)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING id, title, description, file_name, file_path, file_size,
                      file_type, category, download_count, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(file_name)
        .bind(file_path)
        .bind(file_size)
        .bind(file_type)
        .bind(category)
        .fetch_one(&self.pool)
        .await
    }

    /// 활성 자료 목록 (사용자용), 카테고리 선택 필터
    pub async fn list_active_materials(
        &self,
        category: Option<&str>,
    ) -> sqlx::Result<Vec<Material>> {
        match category {
            Some(category) => {
                sqlx::query_as::<_, Material>(
                    r#"
                    SELECT id, title, description, file_name, file_path, file_size,
                           file_type, category, download_count, is_active,
                           created_at, updated_at
                    FROM materials
                    WHERE category = ?1 AND is_active = 1
                    ORDER BY created_at DESC, id DESC
                    "#,
                )
                .bind(category)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Material>(
                    r#"
                    SELECT id, title, description, file_name, file_path, file_size,
                           file_type, category, download_count, is_active,
                           created_at, updated_at
                    FROM materials
                    WHERE is_active = 1
                    ORDER BY created_at DESC, id DESC
                    "#,
                )
                .fetch_all(&self.pool)
                .await
            }
        }
    }

    /// 전체 자료 목록 (관리자용, 비활성 포함)
    pub async fn list_all_materials(&self) -> sqlx::Result<Vec<Material>> {
        sqlx::query_as::<_, Material>(
            r#"
            SELECT id, title, description, file_name, file_path, file_size,
                   file_type, category, download_count, is_active,
                   created_at, updated_at
            FROM materials
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// 활성 자료 단건 조회 (다운로드용)
    pub async fn get_active_material(&self, id: i64) -> sqlx::Result<Option<Material>> {
        sqlx::query_as::<_, Material>(
            r#"
            SELECT id, title, description, file_name, file_path, file_size,
                   file_type, category, download_count, is_active,
                   created_at, updated_at
            FROM materials
            WHERE id = ?1 AND is_active = 1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// 다운로드 카운트 +1 (단일 UPDATE 문, 유실 없음)
    pub async fn increment_download_count(&self, id: i64) -> sqlx::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE materials
            SET download_count = download_count + 1
            WHERE id = ?1 AND is_active = 1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 자료 수정. 해당 id가 없으면 false
    pub async fn update_material(
        &self,
        id: i64,
        title: &str,
        description: &str,
        category: &str,
        is_active: bool,
    ) -> sqlx::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE materials
            SET title = ?1, description = ?2, category = ?3, is_active = ?4,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?5
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(category)
        .bind(is_active)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 자료 삭제. 삭제된 행의 저장 경로를 돌려준다 (파일 정리용)
    pub async fn delete_material(&self, id: i64) -> sqlx::Result<Option<String>> {
        let deleted: Option<(String,)> =
            sqlx::query_as("DELETE FROM materials WHERE id = ?1 RETURNING file_path")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(deleted.map(|(path,)| path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 동시성 검증은 커넥션을 여러 개 쓸 수 있는 파일 DB로 한다
    async fn file_db(dir: &tempfile::TempDir) -> Arc<Database> {
        Arc::new(Database::connect(&dir.path().join("test.db")).await.unwrap())
    }

    use std::sync::Arc;

    #[tokio::test]
    async fn test_init_schema_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let db = file_db(&dir).await;

        // 몇 번을 다시 돌려도 실패하거나 중복 생성되지 않음
        db.init_schema().await.unwrap();
        db.init_schema().await.unwrap();
        assert_eq!(db.count_inquiries().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_submissions_get_distinct_serials() {
        let dir = tempfile::tempdir().unwrap();
        let db = file_db(&dir).await;

        let mut handles = Vec::new();
        for i in 0..10 {
            let db = Arc::clone(&db);
            handles.push(tokio::spawn(async move {
                db.insert_inquiry(
                    "2024-01-15",
                    &format!("고객{i}"),
                    "010-0000-0000",
                    "c@hanstar.co",
                    "문의",
                    "pw",
                )
                .await
                .unwrap()
                .serial
            }));
        }

        let mut serials = Vec::new();
        for handle in handles {
            serials.push(handle.await.unwrap());
        }
        serials.sort();

        let expected: Vec<String> = (1..=10).map(|n| format!("{n:02}")).collect();
        assert_eq!(serials, expected);
    }

    #[tokio::test]
    async fn test_concurrent_download_counts_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let db = file_db(&dir).await;

        let material = db
            .insert_material(
                "자료",
                "",
                "report.pdf",
                "/tmp/uploads/report.pdf",
                "1.0 KB",
                "application/pdf",
                "기타",
            )
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..10 {
            let db = Arc::clone(&db);
            let id = material.id;
            handles.push(tokio::spawn(async move {
                db.increment_download_count(id).await.unwrap()
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap());
        }

        let found = db.get_active_material(material.id).await.unwrap().unwrap();
        assert_eq!(found.download_count, 10);
    }
}
