use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::json;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{ArticleView, CreateArticleRequest, SearchQuery, UpdateArticleRequest},
    services::storage_service,
};

pub async fn list_articles(State(state): State<AppState>) -> Result<Json<Vec<ArticleView>>> {
    let articles = state.repos.articles.list().await?;

    Ok(Json(articles))
}

pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ArticleView>> {
    let article = state
        .repos
        .articles
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Article introuvable".to_string()))?;

    Ok(Json(article))
}

pub async fn list_articles_by_category(
    State(state): State<AppState>,
    Path(categorie_id): Path<i32>,
) -> Result<Json<Vec<ArticleView>>> {
    let articles = state.repos.articles.list_by_category(categorie_id).await?;

    Ok(Json(articles))
}

pub async fn search_articles(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<ArticleView>>> {
    let articles = state.repos.articles.search(&params.q).await?;

    Ok(Json(articles))
}

pub async fn create_article(
    State(state): State<AppState>,
    Json(payload): Json<CreateArticleRequest>,
) -> Result<Json<ArticleView>> {
    validate_article(&payload)?;

    let article = state.repos.articles.create(payload).await?;

    Ok(Json(article))
}

pub async fn update_article(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateArticleRequest>,
) -> Result<Json<ArticleView>> {
    if payload.prix.is_some_and(|prix| prix.is_sign_negative()) {
        return Err(AppError::BadRequest("Le prix doit être positif".to_string()));
    }
    if payload.quantite.is_some_and(|quantite| quantite < 0) {
        return Err(AppError::BadRequest(
            "La quantité doit être positive".to_string(),
        ));
    }

    let article = state
        .repos
        .articles
        .update(id, payload)
        .await?
        .ok_or_else(|| AppError::NotFound("Article introuvable".to_string()))?;

    Ok(Json(article))
}

pub async fn delete_article(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>> {
    let article = state.repos.articles.get(id).await?;
    let deleted = state.repos.articles.delete(id).await?;

    // Nettoyage des images hébergées dans notre bucket; les URLs externes
    // restent intouchées. L'article est déjà supprimé: un échec ici se
    // journalise sans annuler la réponse.
    if deleted {
        if let (Some(client), Some(article)) = (state.s3.as_ref(), article) {
            let managed: Vec<String> = [
                article.article.photo,
                article.article.photo_2,
                article.article.photo_3,
                article.article.photo_4,
                article.article.photo_5,
            ]
            .into_iter()
            .flatten()
            .filter(|url| storage_service::is_managed_url(&state.storage, url))
            .collect();

            if !managed.is_empty() {
                if let Err(e) =
                    storage_service::delete_multiple(client, &state.storage, &managed).await
                {
                    tracing::error!("Photo cleanup failed for article {}: {}", id, e);
                }
            }
        }
    }

    Ok(Json(json!({ "deleted": deleted })))
}

fn validate_article(payload: &CreateArticleRequest) -> Result<()> {
    if payload.nom.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Le nom de l'article est requis".to_string(),
        ));
    }

    if payload.prix.is_sign_negative() {
        return Err(AppError::BadRequest("Le prix doit être positif".to_string()));
    }

    if payload.quantite < 0 {
        return Err(AppError::BadRequest(
            "La quantité doit être positive".to_string(),
        ));
    }

    Ok(())
}
