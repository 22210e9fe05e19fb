//! Stockage des images du catalogue sur le bucket S3 `articles`.
//!
//! La validation (type MIME, taille) est synchrone et précède tout appel
//! réseau. Les suppressions ignorent silencieusement les chemins qui ne
//! relèvent pas du bucket géré.

use aws_sdk_s3::{primitives::ByteStream, Client as S3Client};
use futures::future::try_join_all;
use rand::{distr::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};

use crate::{
    config::StorageConfig,
    error::{AppError, Result},
};

const ALLOWED_CONTENT_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "image/gif"];
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredImage {
    pub url: String,
    pub path: String,
}

pub fn validate(file: &UploadFile) -> Result<()> {
    if file.bytes.is_empty() {
        return Err(AppError::BadRequest("Aucun fichier fourni".to_string()));
    }

    if !ALLOWED_CONTENT_TYPES.contains(&file.content_type.as_str()) {
        return Err(AppError::BadRequest(
            "Type de fichier non autorisé. Utilisez JPG, PNG, WebP ou GIF.".to_string(),
        ));
    }

    if file.bytes.len() > MAX_FILE_SIZE {
        return Err(AppError::BadRequest(
            "Le fichier est trop volumineux. Taille maximale: 5MB".to_string(),
        ));
    }

    Ok(())
}

// Même bizarrerie que l'historique: un nom sans point garde le nom entier
// comme extension.
fn extension(file_name: &str) -> &str {
    file_name.rsplit('.').next().unwrap_or("bin")
}

/// `<dossier>/<horodatage>_<suffixe aléatoire>.<extension d'origine>`
pub fn generate_object_key(folder: &str, file_name: &str) -> String {
    let timestamp = chrono::Utc::now().timestamp_millis();
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();

    format!(
        "{}/{}_{}.{}",
        folder,
        timestamp,
        suffix.to_lowercase(),
        extension(file_name)
    )
}

pub fn public_url(storage: &StorageConfig, path: &str) -> String {
    format!("{}/{}/{}", storage.assets_url, storage.bucket, path)
}

/// Une URL n'est candidate au nettoyage que si elle pointe dans notre bucket.
pub fn is_managed_url(storage: &StorageConfig, url: &str) -> bool {
    !storage.assets_url.is_empty()
        && url.starts_with(&storage.assets_url)
        && url.contains(&format!("/{}/", storage.bucket))
}

/// Ramène une URL publique ou un chemin brut au chemin relatif dans le
/// bucket; `None` pour tout ce qui n'est pas géré ici.
pub fn managed_path(storage: &StorageConfig, path_or_url: &str) -> Option<String> {
    let marker = format!("{}/", storage.bucket);
    path_or_url
        .rsplit_once(&marker)
        .map(|(_, relative)| relative.to_string())
        .filter(|relative| !relative.is_empty())
}

pub async fn upload(
    client: &S3Client,
    storage: &StorageConfig,
    file: UploadFile,
    folder: &str,
) -> Result<StoredImage> {
    validate(&file)?;

    if storage.assets_url.is_empty() {
        return Err(AppError::ConfigError("ASSETS_URL not set".to_string()));
    }

    let path = generate_object_key(folder, &file.file_name);

    client
        .put_object()
        .bucket(&storage.bucket)
        .key(&path)
        .content_type(&file.content_type)
        .cache_control("max-age=3600")
        .if_none_match("*")
        .body(ByteStream::from(file.bytes))
        .send()
        .await
        .map_err(|e| {
            tracing::error!("Upload error: {:?}", e);
            AppError::InternalError(format!("Erreur lors de l'upload: {}", e))
        })?;

    Ok(StoredImage {
        url: public_url(storage, &path),
        path,
    })
}

/// Téléverse chaque fichier indépendamment et attend l'ensemble; le premier
/// échec fait échouer le tout, sans agrégation de succès partiels.
pub async fn upload_multiple(
    client: &S3Client,
    storage: &StorageConfig,
    files: Vec<UploadFile>,
    folder: &str,
) -> Result<Vec<StoredImage>> {
    for file in &files {
        validate(file)?;
    }

    try_join_all(
        files
            .into_iter()
            .map(|file| upload(client, storage, file, folder)),
    )
    .await
}

pub async fn delete(client: &S3Client, storage: &StorageConfig, path: &str) -> Result<()> {
    let Some(relative) = managed_path(storage, path) else {
        return Ok(());
    };

    client
        .delete_object()
        .bucket(&storage.bucket)
        .key(&relative)
        .send()
        .await
        .map_err(|e| {
            tracing::error!("Delete error: {:?}", e);
            AppError::InternalError(format!("Erreur lors de la suppression: {}", e))
        })?;

    Ok(())
}

pub async fn delete_multiple(
    client: &S3Client,
    storage: &StorageConfig,
    paths: &[String],
) -> Result<()> {
    let relative_paths: Vec<String> = paths
        .iter()
        .filter_map(|path| managed_path(storage, path))
        .collect();

    for key in relative_paths {
        client
            .delete_object()
            .bucket(&storage.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Delete error: {:?}", e);
                AppError::InternalError(format!("Erreur lors de la suppression: {}", e))
            })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> StorageConfig {
        StorageConfig {
            bucket: "articles".to_string(),
            assets_url: "https://assets.example.com".to_string(),
        }
    }

    fn file(name: &str, content_type: &str, size: usize) -> UploadFile {
        UploadFile {
            file_name: name.to_string(),
            content_type: content_type.to_string(),
            bytes: vec![0u8; size],
        }
    }

    #[test]
    fn oversized_file_is_rejected_before_any_network_call() {
        let err = validate(&file("grand.jpg", "image/jpeg", 6 * 1024 * 1024)).unwrap_err();
        assert!(err.to_string().contains("volumineux"));
    }

    #[test]
    fn bmp_is_not_an_allowed_type() {
        let err = validate(&file("scan.bmp", "image/bmp", 1024)).unwrap_err();
        assert!(err.to_string().contains("non autorisé"));
    }

    #[test]
    fn file_at_the_limit_passes_validation() {
        assert!(validate(&file("pile.png", "image/png", 5 * 1024 * 1024)).is_ok());
    }

    #[test]
    fn object_key_keeps_folder_and_extension() {
        let key = generate_object_key("covers", "ma photo.JPEG");
        assert!(key.starts_with("covers/"));
        assert!(key.ends_with(".JPEG"));
    }

    #[test]
    fn managed_url_predicate() {
        let storage = storage();
        assert!(is_managed_url(
            &storage,
            "https://assets.example.com/articles/covers/1_abc.png"
        ));
        assert!(!is_managed_url(
            &storage,
            "https://images.unsplash.com/photo-1517336714731"
        ));
    }

    #[test]
    fn managed_path_strips_down_to_the_bucket_relative_key() {
        let storage = storage();
        assert_eq!(
            managed_path(
                &storage,
                "https://assets.example.com/articles/covers/1_abc.png"
            ),
            Some("covers/1_abc.png".to_string())
        );
        assert_eq!(
            managed_path(&storage, "articles/covers/1_abc.png"),
            Some("covers/1_abc.png".to_string())
        );
        assert_eq!(
            managed_path(&storage, "https://autre.example.com/ailleurs/1.png"),
            None
        );
    }
}
