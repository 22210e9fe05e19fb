use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::json;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{
        self, CreateVarianteRequest, UpdateVarianteRequest, Variante, VarianteOption,
    },
};

pub async fn list_variantes(
    State(state): State<AppState>,
    Path(article_id): Path<i32>,
) -> Result<Json<Vec<Variante>>> {
    let variantes = state.repos.variantes.list_for_article(article_id).await?;

    Ok(Json(variantes))
}

/// Variantes d'un article regroupées par axe, ex.
/// `{"couleur": [{"valeur": "rouge"}, {"valeur": "bleu"}]}`.
pub async fn list_variantes_groupees(
    State(state): State<AppState>,
    Path(article_id): Path<i32>,
) -> Result<Json<BTreeMap<String, Vec<VarianteOption>>>> {
    let variantes = state.repos.variantes.list_for_article(article_id).await?;

    Ok(Json(models::group_by_axis(variantes)))
}

pub async fn create_variante(
    State(state): State<AppState>,
    Path(article_id): Path<i32>,
    Json(payload): Json<CreateVarianteRequest>,
) -> Result<Json<Variante>> {
    if payload.nom_variante.trim().is_empty() || payload.valeur.trim().is_empty() {
        return Err(AppError::BadRequest(
            "L'axe et la valeur de la variante sont requis".to_string(),
        ));
    }

    // L'article doit exister; la base le garantit par sa clé étrangère, le
    // magasin mémoire non.
    if state.repos.articles.get(article_id).await?.is_none() {
        return Err(AppError::NotFound("Article introuvable".to_string()));
    }

    let variante = state.repos.variantes.create(article_id, payload).await?;

    Ok(Json(variante))
}

pub async fn update_variante(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateVarianteRequest>,
) -> Result<Json<Variante>> {
    let variante = state
        .repos
        .variantes
        .update(id, payload)
        .await?
        .ok_or_else(|| AppError::NotFound("Variante introuvable".to_string()))?;

    Ok(Json(variante))
}

pub async fn delete_variante(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>> {
    let deleted = state.repos.variantes.delete(id).await?;

    Ok(Json(json!({ "deleted": deleted })))
}
