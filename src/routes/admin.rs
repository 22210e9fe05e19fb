use axum::{Json, extract::State};
use serde_json::json;

use crate::{AppState, error::Result, services::seed};

/// Insertion unique des données de démonstration dans la base distante.
/// `seeded` vaut `false` quand la table contient déjà des articles ou que
/// l'application tourne sur le magasin mémoire.
pub async fn seed_database(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    let seeded = seed::seed_database(&state.repos).await?;

    Ok(Json(json!({ "seeded": seeded })))
}
