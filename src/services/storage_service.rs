// src/services/storage_service.rs

use std::{
    path::{Component, Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::error::AppError;

// ---
// Backend de objetos
// ---

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<(), AppError>;
    async fn get(&self, path: &str) -> Result<Vec<u8>, AppError>;
    async fn delete(&self, path: &str) -> Result<(), AppError>;
}

/// Armazena os blobs em disco, abaixo de um diretório raiz.
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    // Só aceita caminhos relativos sem `..`
    fn resolve(&self, path: &str) -> Result<PathBuf, AppError> {
        let relative = Path::new(path);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if path.is_empty() || !safe {
            return Err(AppError::ResourceNotFound(format!("file {}", path)));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<(), AppError> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full, bytes).await?;
        Ok(())
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>, AppError> {
        let full = self.resolve(path)?;
        match tokio::fs::read(&full).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::ResourceNotFound(format!("file {}", path)))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, path: &str) -> Result<(), AppError> {
        let full = self.resolve(path)?;
        tokio::fs::remove_file(&full).await?;
        Ok(())
    }
}

// ---
// Convenções de caminho
// ---

/// Remove separadores e `..`, e troca espaços por `_`.
pub fn sanitize_filename(filename: &str) -> String {
    let cleaned: String = filename
        .replace("..", "")
        .chars()
        .filter(|c| *c != '/' && *c != '\\')
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();

    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

pub fn incident_attachment_path(hotel_id: Uuid, filename: &str, now: DateTime<Utc>) -> String {
    format!(
        "incidents/{}/{}_{}",
        hotel_id,
        now.timestamp_millis(),
        sanitize_filename(filename)
    )
}

pub fn lost_item_photo_path(hotel_id: Uuid, filename: &str, now: DateTime<Utc>) -> String {
    format!(
        "lost_items/{}/{}_{}",
        hotel_id,
        now.timestamp_millis(),
        sanitize_filename(filename)
    )
}

// ---
// URLs assinadas
// ---

#[derive(Debug, Serialize, Deserialize)]
struct FileClaims {
    path: String,
    exp: usize,
}

#[derive(Clone)]
pub struct StorageService {
    store: Arc<dyn ObjectStore>,
    signing_secret: String,
    url_ttl_secs: i64,
}

impl StorageService {
    pub fn new(store: Arc<dyn ObjectStore>, signing_secret: String, url_ttl_secs: i64) -> Self {
        Self { store, signing_secret, url_ttl_secs }
    }

    pub async fn upload(&self, path: &str, bytes: &[u8]) -> Result<(), AppError> {
        self.store.put(path, bytes).await?;
        tracing::info!("📦 Arquivo salvo: {} ({} bytes)", path, bytes.len());
        Ok(())
    }

    pub async fn read(&self, path: &str) -> Result<Vec<u8>, AppError> {
        self.store.get(path).await
    }

    /// Limpeza de blob órfão: falhas só vão para o log.
    pub async fn delete_quietly(&self, path: &str) {
        if let Err(e) = self.store.delete(path).await {
            tracing::warn!("⚠️ Falha ao remover arquivo órfão {}: {}", path, e);
        }
    }

    pub fn signed_url(&self, path: &str) -> Result<String, AppError> {
        let token = self.sign(path, Utc::now().timestamp() + self.url_ttl_secs)?;
        Ok(format!("/api/files?token={}", token))
    }

    fn sign(&self, path: &str, exp: i64) -> Result<String, AppError> {
        let claims = FileClaims { path: path.to_string(), exp: exp.max(0) as usize };
        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.signing_secret.as_ref()),
        )?)
    }

    /// Devolve o caminho do arquivo se o token for válido e não tiver expirado.
    pub fn verify_token(&self, token: &str) -> Result<String, AppError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        let data = decode::<FileClaims>(
            token,
            &DecodingKey::from_secret(self.signing_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;
        Ok(data.claims.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn service(dir: &Path) -> StorageService {
        StorageService::new(Arc::new(LocalObjectStore::new(dir)), "segredo".into(), 900)
    }

    #[test]
    fn paths_follow_the_bucket_convention() {
        let hotel = Uuid::new_v4();
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();

        assert_eq!(
            incident_attachment_path(hotel, "nota fiscal.pdf", now),
            format!("incidents/{}/1700000000123_nota_fiscal.pdf", hotel)
        );
        assert_eq!(
            lost_item_photo_path(hotel, "../../etc/passwd", now),
            format!("lost_items/{}/1700000000123_etcpasswd", hotel)
        );
    }

    #[test]
    fn blank_filename_gets_a_placeholder() {
        assert_eq!(sanitize_filename("/"), "file");
    }

    #[tokio::test]
    async fn upload_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let storage = service(dir.path());

        storage.upload("incidents/h1/1_a.txt", b"hello").await.unwrap();
        assert_eq!(storage.read("incidents/h1/1_a.txt").await.unwrap(), b"hello");

        storage.delete_quietly("incidents/h1/1_a.txt").await;
        assert!(matches!(
            storage.read("incidents/h1/1_a.txt").await,
            Err(AppError::ResourceNotFound(_))
        ));
    }

    #[tokio::test]
    async fn traversal_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let storage = service(dir.path());
        assert!(storage.upload("../outside.txt", b"x").await.is_err());
        assert!(storage.read("/etc/passwd").await.is_err());
    }

    #[tokio::test]
    async fn deleting_missing_blob_is_quiet() {
        let dir = tempfile::tempdir().unwrap();
        service(dir.path()).delete_quietly("lost_items/none.jpg").await;
    }

    #[test]
    fn signed_url_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = service(dir.path());

        let url = storage.signed_url("incidents/h1/1_a.txt").unwrap();
        let token = url.strip_prefix("/api/files?token=").unwrap();
        assert_eq!(storage.verify_token(token).unwrap(), "incidents/h1/1_a.txt");
    }

    #[test]
    fn expired_or_foreign_token_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = service(dir.path());

        let expired = storage.sign("incidents/h1/1_a.txt", Utc::now().timestamp() - 10).unwrap();
        assert!(matches!(storage.verify_token(&expired), Err(AppError::InvalidToken)));

        let other = StorageService::new(Arc::new(LocalObjectStore::new(dir.path())), "outro".into(), 900);
        let foreign = other.signed_url("x.txt").unwrap();
        let token = foreign.strip_prefix("/api/files?token=").unwrap();
        assert!(matches!(storage.verify_token(token), Err(AppError::InvalidToken)));
    }
}
