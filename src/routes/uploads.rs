use axum::{
    Json,
    extract::{Multipart, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    AppState,
    error::{AppError, Result},
    services::storage_service::{self, StoredImage, UploadFile},
};

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    #[serde(default = "default_folder")]
    pub folder: String,
}

fn default_folder() -> String {
    "images".to_string()
}

#[derive(Debug, Deserialize)]
pub struct DeleteUploadsRequest {
    pub paths: Vec<String>,
}

pub async fn upload_images(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> Result<Json<Vec<StoredImage>>> {
    let client = state
        .s3
        .as_ref()
        .ok_or_else(|| AppError::ConfigError("S3 client not configured".to_string()))?;

    validate_folder(&query.folder)?;

    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Lecture du formulaire impossible: {}", e)))?
    {
        let file_name = field.file_name().unwrap_or("image").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Lecture du fichier impossible: {}", e)))?;

        files.push(UploadFile {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    if files.is_empty() {
        return Err(AppError::BadRequest("Aucun fichier fourni".to_string()));
    }

    let stored =
        storage_service::upload_multiple(client, &state.storage, files, &query.folder).await?;

    Ok(Json(stored))
}

pub async fn delete_images(
    State(state): State<AppState>,
    Json(payload): Json<DeleteUploadsRequest>,
) -> Result<StatusCode> {
    let client = state
        .s3
        .as_ref()
        .ok_or_else(|| AppError::ConfigError("S3 client not configured".to_string()))?;

    storage_service::delete_multiple(client, &state.storage, &payload.paths).await?;

    Ok(StatusCode::NO_CONTENT)
}

fn validate_folder(folder: &str) -> Result<()> {
    let valid = !folder.is_empty()
        && folder
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if !valid {
        return Err(AppError::BadRequest("Nom de dossier invalide".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_names_are_restricted_to_safe_characters() {
        assert!(validate_folder("covers").is_ok());
        assert!(validate_folder("galerie_2024").is_ok());
        assert!(validate_folder("../autre-bucket").is_err());
        assert!(validate_folder("").is_err());
    }
}
