//! Material Service
//!
//! 자료실 비즈니스 로직: 업로드 등록, 목록, 다운로드, 수정/삭제.
//!
//! 업로드 파일명은 경로 조작이 불가능하도록 정리하고, 저장소에 같은 이름이
//! 이미 있으면 확장자 앞에 `_1`, `_2`, …를 붙여 피한다. 레코드에는 정리된
//! 원래 이름을 표시용으로 남긴다.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{Config, ALLOWED_EXTENSIONS};
use crate::db::{Database, Material};
use crate::error::ApiError;

/// 업로드 등록 입력
#[derive(Debug)]
pub struct NewMaterial {
    pub title: String,
    pub description: String,
    pub category: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// 저장된 파일 정보 (등록 응답용)
#[derive(Debug)]
pub struct StoredFile {
    pub original_name: String,
    pub saved_name: String,
    pub size: String,
    pub content_type: String,
}

pub struct MaterialService {
    db: Arc<Database>,
    upload_dir: PathBuf,
}

impl MaterialService {
    pub fn new(db: Arc<Database>, config: &Config) -> Self {
        Self {
            db,
            upload_dir: config.upload_dir.clone(),
        }
    }

    /// 자료 등록 (파일 저장 + 레코드 삽입)
    pub async fn register(&self, input: NewMaterial) -> Result<(Material, StoredFile), ApiError> {
        if input.title.is_empty() {
            return Err(ApiError::ValidationError("제목은 필수입니다.".to_string()));
        }
        if input.file_name.is_empty() {
            return Err(ApiError::ValidationError(
                "파일이 선택되지 않았습니다.".to_string(),
            ));
        }
        if !allowed_file(&input.file_name) {
            return Err(ApiError::ValidationError(
                "허용되지 않는 파일 형식입니다.".to_string(),
            ));
        }

        let original_name = sanitize_filename(&input.file_name);
        if original_name.is_empty() {
            return Err(ApiError::ValidationError(
                "파일이 선택되지 않았습니다.".to_string(),
            ));
        }

        tokio::fs::create_dir_all(&self.upload_dir).await?;

        // 중복 파일명 회피
        let saved_name = self.resolve_collision(&original_name).await?;
        let file_path = self.upload_dir.join(&saved_name);
        tokio::fs::write(&file_path, &input.data).await?;

        let file_size = format_size(input.data.len() as u64);
        let file_type = input
            .content_type
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let material = self
            .db
            .insert_material(
                &input.title,
                &input.description,
                &original_name,
                &file_path.to_string_lossy(),
                &file_size,
                &file_type,
                &input.category,
            )
            .await?;

        tracing::info!(material_id = material.id, file = %saved_name, "자료 등록 완료");

        Ok((
            material,
            StoredFile {
                original_name,
                saved_name,
                size: file_size,
                content_type: file_type,
            },
        ))
    }

    /// 사용자용 활성 자료 목록. 빈 카테고리는 필터 없음
    pub async fn list(&self, category: Option<&str>) -> Result<Vec<Material>, ApiError> {
        let category = category.filter(|c| !c.is_empty());
        Ok(self.db.list_active_materials(category).await?)
    }

    /// 관리자용 전체 자료 목록 (비활성 포함)
    pub async fn admin_list(&self) -> Result<Vec<Material>, ApiError> {
        Ok(self.db.list_all_materials().await?)
    }

    /// 다운로드용 파일 열기
    ///
    /// 비활성 자료는 없는 것으로 취급한다. `count_download`가 true일 때만
    /// (실제 다운로드 의도) 카운트를 증가시킨다. 저장 경로가 업로드 루트
    /// 밖을 가리키면 제공하지 않는다.
    pub async fn open_download(
        &self,
        id: i64,
        count_download: bool,
    ) -> Result<(Material, tokio::fs::File), ApiError> {
        let material = self
            .db
            .get_active_material(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("자료를 찾을 수 없습니다.".to_string()))?;

        let path = Path::new(&material.file_path);
        if !path.starts_with(&self.upload_dir) {
            return Err(ApiError::NotFound(
                "파일 경로가 올바르지 않습니다.".to_string(),
            ));
        }

        if count_download {
            self.db.increment_download_count(id).await?;
        }

        let file = tokio::fs::File::open(path)
            .await
            .map_err(|_| ApiError::NotFound("자료를 찾을 수 없습니다.".to_string()))?;

        Ok((material, file))
    }

    /// 자료 수정
    pub async fn update(
        &self,
        id: i64,
        title: &str,
        description: &str,
        category: &str,
        is_active: bool,
    ) -> Result<(), ApiError> {
        if title.is_empty() {
            return Err(ApiError::ValidationError("제목은 필수입니다.".to_string()));
        }

        let updated = self
            .db
            .update_material(id, title, description, category, is_active)
            .await?;
        if !updated {
            return Err(ApiError::NotFound("자료를 찾을 수 없습니다.".to_string()));
        }

        Ok(())
    }

    /// 자료 삭제 (레코드 삭제 + 저장 파일 정리)
    ///
    /// 파일 삭제 실패는 경고만 남기고 요청은 성공 처리한다.
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let file_path = self
            .db
            .delete_material(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("자료를 찾을 수 없습니다.".to_string()))?;

        let path = Path::new(&file_path);
        if path.starts_with(&self.upload_dir) {
            if let Err(e) = tokio::fs::remove_file(path).await {
                tracing::warn!(material_id = id, error = %e, "업로드 파일 삭제 실패");
            }
        }

        Ok(())
    }

    /// 저장소에 이미 같은 이름이 있으면 `stem_1.ext`, `stem_2.ext`… 로 회피
    async fn resolve_collision(&self, name: &str) -> Result<String, ApiError> {
        let mut candidate = name.to_string();
        let (stem, ext) = split_extension(name);
        let mut counter = 1u32;

        while tokio::fs::try_exists(self.upload_dir.join(&candidate)).await? {
            candidate = match ext {
                Some(ext) => format!("{stem}_{counter}.{ext}"),
                None => format!("{stem}_{counter}"),
            };
            counter += 1;
        }

        Ok(candidate)
    }
}

/// 확장자 허용 여부 (대소문자 무시)
pub fn allowed_file(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => ALLOWED_EXTENSIONS.contains(&ext.to_lowercase().as_str()),
        None => false,
    }
}

/// 파일명 정리
///
/// 경로 구분자를 포함한 앞부분은 버리고, 남은 이름에서 공백과 위험 문자를
/// `_`로 바꾼다. 숨김/상위 경로로 해석될 수 있는 선행 `.`은 제거한다.
pub fn sanitize_filename(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .trim();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    cleaned.trim_start_matches('.').to_string()
}

/// `name.ext` → (`name`, `ext`)
fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    }
}

/// 사람이 읽는 크기 문자열 (1 MiB 이상이면 MB, 아니면 KB, 소수 1자리)
pub fn format_size(bytes: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    if bytes >= MIB {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    } else {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;

    fn test_config(upload_dir: &Path) -> Config {
        Config {
            port: 0,
            database_path: PathBuf::from(":memory:"),
            upload_dir: upload_dir.to_path_buf(),
            admin_password: "hanstar".to_string(),
            max_upload_bytes: 16 * 1024 * 1024,
            environment: Environment::Development,
        }
    }

    async fn service(upload_dir: &Path) -> MaterialService {
        let db = Database::connect_in_memory().await.unwrap();
        MaterialService::new(Arc::new(db), &test_config(upload_dir))
    }

    fn upload(title: &str, file_name: &str) -> NewMaterial {
        NewMaterial {
            title: title.to_string(),
            description: String::new(),
            category: "기타".to_string(),
            file_name: file_name.to_string(),
            content_type: Some("application/pdf".to_string()),
            data: b"test data".to_vec(),
        }
    }

    #[test]
    fn test_allowed_file() {
        assert!(allowed_file("report.pdf"));
        assert!(allowed_file("REPORT.PDF"));
        assert!(!allowed_file("archive.tar.gz"));
        assert!(!allowed_file("report.exe"));
        assert!(!allowed_file("noextension"));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("report.pdf"), "report.pdf");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("..\\..\\boot.ini"), "boot.ini");
        assert_eq!(sanitize_filename("my report (1).pdf"), "my_report__1_.pdf");
        assert_eq!(sanitize_filename("무역자료 2024.pdf"), "무역자료_2024.pdf");
        assert_eq!(sanitize_filename(".hidden"), "hidden");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "0.5 KB");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1024 * 1024), "1.0 MB");
        assert_eq!(format_size(1_887_437), "1.8 MB");
    }

    #[tokio::test]
    async fn test_register_rejects_bad_extension() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path()).await;

        let err = svc.register(upload("자료", "report.exe")).await.unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)));

        let ok = svc.register(upload("자료", "report.pdf")).await;
        assert!(ok.is_ok());
    }

    #[tokio::test]
    async fn test_register_resolves_filename_collision() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path()).await;

        let (first, first_file) = svc.register(upload("첫번째", "report.pdf")).await.unwrap();
        let (second, second_file) = svc.register(upload("두번째", "report.pdf")).await.unwrap();

        assert_eq!(first_file.saved_name, "report.pdf");
        assert_eq!(second_file.saved_name, "report_1.pdf");

        // 표시용 이름은 둘 다 원래 이름 그대로
        assert_eq!(first.file_name, "report.pdf");
        assert_eq!(second.file_name, "report.pdf");

        assert!(dir.path().join("report.pdf").exists());
        assert!(dir.path().join("report_1.pdf").exists());
    }

    #[tokio::test]
    async fn test_inactive_material_hidden_from_public() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path()).await;

        let (material, _) = svc.register(upload("자료", "report.pdf")).await.unwrap();

        svc.update(material.id, "자료", "", "기타", false)
            .await
            .unwrap();

        // 공개 목록/다운로드에서는 제외
        assert!(svc.list(None).await.unwrap().is_empty());
        let err = svc.open_download(material.id, true).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        // 관리자 목록에는 남아 있음
        let all = svc.admin_list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(!all[0].is_active);
    }

    #[tokio::test]
    async fn test_download_count_increments_on_download_intent_only() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path()).await;

        let (material, _) = svc.register(upload("자료", "report.pdf")).await.unwrap();

        // 조회 의도는 카운트 유지
        svc.open_download(material.id, false).await.unwrap();
        let listed = &svc.list(None).await.unwrap()[0];
        assert_eq!(listed.download_count, 0);

        // 다운로드 의도는 1씩 증가
        for expected in 1..=3 {
            svc.open_download(material.id, true).await.unwrap();
            let listed = &svc.list(None).await.unwrap()[0];
            assert_eq!(listed.download_count, expected);
        }
    }

    #[tokio::test]
    async fn test_category_filter() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path()).await;

        let mut trade = upload("무역자료", "trade.pdf");
        trade.category = "무역".to_string();
        svc.register(trade).await.unwrap();
        svc.register(upload("기타자료", "etc.pdf")).await.unwrap();

        assert_eq!(svc.list(Some("무역")).await.unwrap().len(), 1);
        // 빈 문자열은 필터 없음
        assert_eq!(svc.list(Some("")).await.unwrap().len(), 2);
        assert_eq!(svc.list(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_removes_record_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path()).await;

        let (material, stored) = svc.register(upload("자료", "report.pdf")).await.unwrap();
        assert!(dir.path().join(&stored.saved_name).exists());

        svc.delete(material.id).await.unwrap();
        assert!(svc.admin_list().await.unwrap().is_empty());
        assert!(!dir.path().join(&stored.saved_name).exists());

        // 이미 지워진 id는 NotFound
        let err = svc.delete(material.id).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path()).await;

        let err = svc.update(99, "제목", "", "기타", true).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
