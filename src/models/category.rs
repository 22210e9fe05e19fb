use serde::{Deserialize, Serialize};

/// Couleur appliquée aux catégories créées sans couleur explicite, et aux
/// articles sans catégorie.
pub const DEFAULT_CATEGORY_COLOR: &str = "#6b7280";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Categorie {
    pub id: i32,
    pub nom: String,
    pub description: String,
    pub couleur: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategorieRequest {
    pub nom: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub couleur: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCategorieRequest {
    pub nom: Option<String>,
    pub description: Option<String>,
    pub couleur: Option<String>,
}
