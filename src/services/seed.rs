//! Alimentation initiale de la base distante avec le catalogue de
//! démonstration.

use std::collections::HashMap;

use crate::{
    data,
    error::Result,
    models::{CreateArticleRequest, CreateCategorieRequest},
    repositories::{BackendKind, Repositories},
};

/// Insertion unique et idempotente des données de démonstration.
///
/// Renvoie `false` sans rien faire en mode mémoire (le magasin est déjà
/// alimenté) ou quand la table des articles contient déjà des lignes.
pub async fn seed_database(repos: &Repositories) -> Result<bool> {
    if repos.kind == BackendKind::Memory {
        return Ok(false);
    }

    if repos.articles.count().await? > 0 {
        return Ok(false);
    }

    // Les identifiants des fixtures sont locaux au jeu de données; la base
    // attribue les siens, d'où la table de correspondance.
    let mut category_ids: HashMap<i32, i32> = HashMap::new();

    for categorie in data::fixture_categories() {
        let created = repos
            .categories
            .create(CreateCategorieRequest {
                nom: categorie.nom,
                description: Some(categorie.description),
                couleur: Some(categorie.couleur),
            })
            .await?;
        category_ids.insert(categorie.id, created.id);
    }

    let mut inserted = 0usize;
    for article in data::fixture_articles() {
        repos
            .articles
            .create(CreateArticleRequest {
                nom: article.nom,
                description: article.description,
                prix: article.prix,
                quantite: article.quantite,
                photo: article.photo,
                photo_2: article.photo_2,
                photo_3: article.photo_3,
                photo_4: article.photo_4,
                photo_5: article.photo_5,
                categorie_id: article
                    .categorie_id
                    .and_then(|id| category_ids.get(&id).copied()),
            })
            .await?;
        inserted += 1;
    }

    tracing::info!("Seeded database with {} fixture articles", inserted);

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeding_is_a_no_op_in_memory_mode() {
        let repos = Repositories::memory();

        assert!(!seed_database(&repos).await.unwrap());
        assert_eq!(repos.articles.count().await.unwrap(), 12);
    }
}
