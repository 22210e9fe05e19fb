use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Libellé affiché quand un article ne référence aucune catégorie.
pub const UNCATEGORIZED_LABEL: &str = "Non catégorisé";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Article {
    pub id: i32,
    pub nom: String,
    pub description: Option<String>,
    pub prix: Decimal,
    pub quantite: i32,
    pub photo: Option<String>,
    pub photo_2: Option<String>,
    pub photo_3: Option<String>,
    pub photo_4: Option<String>,
    pub photo_5: Option<String>,
    pub categorie_id: Option<i32>,
}

/// Article aplati avec les métadonnées de sa catégorie, tel que le front-end
/// le consomme. `categorie` et `categorie_couleur` sont calculés à la lecture
/// et jamais persistés.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ArticleView {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub article: Article,
    pub categorie: String,
    pub categorie_couleur: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateArticleRequest {
    pub nom: String,
    pub description: Option<String>,
    pub prix: Decimal,
    pub quantite: i32,
    pub photo: Option<String>,
    pub photo_2: Option<String>,
    pub photo_3: Option<String>,
    pub photo_4: Option<String>,
    pub photo_5: Option<String>,
    pub categorie_id: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateArticleRequest {
    pub nom: Option<String>,
    pub description: Option<String>,
    pub prix: Option<Decimal>,
    pub quantite: Option<i32>,
    pub photo: Option<String>,
    pub photo_2: Option<String>,
    pub photo_3: Option<String>,
    pub photo_4: Option<String>,
    pub photo_5: Option<String>,
    pub categorie_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}
