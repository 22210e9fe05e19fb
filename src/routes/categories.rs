use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::json;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{Categorie, CreateCategorieRequest, UpdateCategorieRequest},
};

pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<Categorie>>> {
    let categories = state.repos.categories.list().await?;

    Ok(Json(categories))
}

/// Vue dérivée de `list`: uniquement les noms, pour les sélecteurs du
/// panneau d'administration.
pub async fn list_category_names(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    let names = state
        .repos
        .categories
        .list()
        .await?
        .into_iter()
        .map(|categorie| categorie.nom)
        .collect();

    Ok(Json(names))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Categorie>> {
    let categorie = state
        .repos
        .categories
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Catégorie introuvable".to_string()))?;

    Ok(Json(categorie))
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategorieRequest>,
) -> Result<Json<Categorie>> {
    if payload.nom.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Le nom de la catégorie est requis".to_string(),
        ));
    }

    let categorie = state.repos.categories.create(payload).await?;

    Ok(Json(categorie))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCategorieRequest>,
) -> Result<Json<Categorie>> {
    let categorie = state
        .repos
        .categories
        .update(id, payload)
        .await?
        .ok_or_else(|| AppError::NotFound("Catégorie introuvable".to_string()))?;

    Ok(Json(categorie))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>> {
    let deleted = state.repos.categories.delete(id).await?;

    Ok(Json(json!({ "deleted": deleted })))
}
