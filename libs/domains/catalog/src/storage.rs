//! Uploaded image files on local disk.
//!
//! Files are stored flat under `upload_dir` as `<uuid>.<ext>` and served
//! read-only from `public_path`.

use axum_helpers::UploadedFile;
use core_config::{ConfigError, FromEnv, env_or_default, env_parse};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::error::{CatalogError, CatalogResult};

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "avif"];

/// First path segments already owned by the API, docs and probes.
const RESERVED_SEGMENTS: &[&str] = &[
    "api", "api-docs", "swagger-ui", "redoc", "rapidoc", "scalar", "health", "ready",
];

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    /// URL prefix the upload directory is served under
    pub public_path: String,
    pub max_bytes: usize,
    pub write_timeout: Duration,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            public_path: "/uploads".to_string(),
            max_bytes: 5 * 1024 * 1024,
            write_timeout: Duration::from_secs(10),
        }
    }
}

impl FromEnv for StorageConfig {
    /// - UPLOAD_DIR: defaults to "uploads"
    /// - UPLOAD_PUBLIC_PATH: defaults to "/uploads"
    /// - UPLOAD_MAX_BYTES: defaults to 5 MiB
    /// - UPLOAD_WRITE_TIMEOUT_SECS: defaults to 10
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let public_path = parse_public_path(&env_or_default(
            "UPLOAD_PUBLIC_PATH",
            &defaults.public_path,
        ))?;
        Ok(Self {
            upload_dir: PathBuf::from(env_or_default("UPLOAD_DIR", "uploads")),
            public_path,
            max_bytes: env_parse("UPLOAD_MAX_BYTES", defaults.max_bytes)?,
            write_timeout: Duration::from_secs(env_parse(
                "UPLOAD_WRITE_TIMEOUT_SECS",
                defaults.write_timeout.as_secs(),
            )?),
        })
    }
}

/// Normalizes to `/<segments>`. The root and reserved prefixes are rejected
/// since the upload directory is nested beside the other routes.
fn parse_public_path(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_matches('/');
    let first = trimmed.split('/').next().unwrap_or_default();
    if trimmed.is_empty() || RESERVED_SEGMENTS.contains(&first) {
        return Err(ConfigError::ParseError {
            key: "UPLOAD_PUBLIC_PATH".to_string(),
            details: format!("'{}' collides with the root or a reserved route", raw),
        });
    }
    Ok(format!("/{}", trimmed))
}

#[derive(Debug, Clone)]
pub struct MediaStorage {
    config: Arc<StorageConfig>,
}

impl MediaStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn upload_dir(&self) -> &Path {
        &self.config.upload_dir
    }

    pub fn public_url(&self, name: &str) -> String {
        format!("{}/{}", self.config.public_path.trim_end_matches('/'), name)
    }

    pub async fn ensure_dir(&self) -> CatalogResult<()> {
        tokio::fs::create_dir_all(&self.config.upload_dir)
            .await
            .map_err(|e| {
                CatalogError::Storage(format!(
                    "Cannot create upload directory {}: {}",
                    self.config.upload_dir.display(),
                    e
                ))
            })
    }

    /// Checks an upload against the extension allow-list and size limit.
    pub fn check(&self, file: &UploadedFile) -> CatalogResult<String> {
        let extension = file
            .extension()
            .filter(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
            .ok_or_else(|| {
                CatalogError::Validation(format!(
                    "Unsupported image type, expected one of: {}",
                    IMAGE_EXTENSIONS.join(", ")
                ))
            })?;

        if file.bytes.len() > self.config.max_bytes {
            return Err(CatalogError::UploadTooLarge(format!(
                "Image is {} bytes, limit is {} bytes",
                file.bytes.len(),
                self.config.max_bytes
            )));
        }

        Ok(extension)
    }

    /// Writes the upload under a fresh name and returns that name.
    pub async fn store(&self, file: &UploadedFile) -> CatalogResult<String> {
        let extension = self.check(file)?;
        let name = format!("{}.{}", Uuid::new_v4(), extension);
        let path = self.config.upload_dir.join(&name);

        let write = async {
            tokio::fs::create_dir_all(&self.config.upload_dir).await?;
            tokio::fs::write(&path, &file.bytes).await
        };

        match tokio::time::timeout(self.config.write_timeout, write).await {
            Ok(Ok(())) => {
                tracing::debug!(file = %name, bytes = file.bytes.len(), "Stored upload");
                Ok(name)
            }
            Ok(Err(e)) => Err(CatalogError::Storage(format!("Failed to write {}: {}", name, e))),
            Err(_) => {
                // Don't leave a half-written file behind.
                let _ = tokio::fs::remove_file(&path).await;
                Err(CatalogError::Storage(format!(
                    "Writing {} timed out after {:?}",
                    name, self.config.write_timeout
                )))
            }
        }
    }

    /// Removes a stored file. Failures are logged, not returned: the row
    /// referencing the file is already gone by the time this runs.
    pub async fn remove(&self, name: &str) {
        if !is_stored_name(name) {
            tracing::warn!(file = %name, "Refusing to remove file outside the upload directory");
            return;
        }
        match tokio::fs::remove_file(self.config.upload_dir.join(name)).await {
            Ok(()) => tracing::debug!(file = %name, "Removed upload"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(file = %name, error = %e, "Failed to remove upload"),
        }
    }
}

/// Stored names are flat: no separators, no parent references.
fn is_stored_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\']) && !name.starts_with('.')
}
