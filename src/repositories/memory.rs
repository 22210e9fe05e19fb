//! Magasin mémoire pour le développement local sans base distante.
//!
//! Les collections sont protégées par des mutex standards; aucun verrou n'est
//! tenu pendant un await. Les identifiants sont attribués par un compteur
//! monotone initialisé à `max(ids) + 1`, jamais réutilisés après suppression.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    error::Result,
    models::{
        Article, ArticleView, Categorie, CreateArticleRequest, CreateCategorieRequest,
        CreateVarianteRequest, UpdateArticleRequest, UpdateCategorieRequest,
        UpdateVarianteRequest, User, Variante, DEFAULT_CATEGORY_COLOR, UNCATEGORIZED_LABEL,
    },
};

use super::{ArticleRepository, CategoryRepository, UserRepository, VariantRepository};

struct Table<T> {
    rows: Vec<T>,
    next_id: i32,
}

impl<T> Table<T> {
    fn new(rows: Vec<T>, next_id: i32) -> Self {
        Self { rows, next_id }
    }

    fn allocate_id(&mut self) -> i32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

// Un verrou empoisonné ne rend pas des données purement locales inutilisables.
fn lock<T>(table: &Mutex<Table<T>>) -> MutexGuard<'_, Table<T>> {
    table.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct MemoryStore {
    articles: Mutex<Table<Article>>,
    categories: Mutex<Table<Categorie>>,
    variantes: Mutex<Table<Variante>>,
    users: Mutex<Table<User>>,
}

impl MemoryStore {
    pub fn with_fixtures(categories: Vec<Categorie>, articles: Vec<Article>) -> Self {
        let next_article = articles.iter().map(|a| a.id).max().unwrap_or(0) + 1;
        let next_categorie = categories.iter().map(|c| c.id).max().unwrap_or(0) + 1;

        Self {
            articles: Mutex::new(Table::new(articles, next_article)),
            categories: Mutex::new(Table::new(categories, next_categorie)),
            variantes: Mutex::new(Table::new(Vec::new(), 1)),
            users: Mutex::new(Table::new(Vec::new(), 1)),
        }
    }

    fn category_name(&self, categorie_id: Option<i32>) -> Option<(String, String)> {
        let categories = lock(&self.categories);
        categorie_id.and_then(|id| {
            categories
                .rows
                .iter()
                .find(|c| c.id == id)
                .map(|c| (c.nom.clone(), c.couleur.clone()))
        })
    }

    fn view_one(&self, article: Article) -> ArticleView {
        let categorie = self.category_name(article.categorie_id);
        ArticleView {
            categorie: categorie
                .as_ref()
                .map(|(nom, _)| nom.clone())
                .unwrap_or_else(|| UNCATEGORIZED_LABEL.to_string()),
            categorie_couleur: categorie
                .map(|(_, couleur)| couleur)
                .unwrap_or_else(|| DEFAULT_CATEGORY_COLOR.to_string()),
            article,
        }
    }

    /// Aplatit des articles déjà extraits; le verrou des catégories n'est pris
    /// qu'une fois.
    fn views(&self, articles: Vec<Article>) -> Vec<ArticleView> {
        let categories = lock(&self.categories);

        articles
            .into_iter()
            .map(|article| {
                let categorie = article
                    .categorie_id
                    .and_then(|id| categories.rows.iter().find(|c| c.id == id));

                ArticleView {
                    categorie: categorie
                        .map(|c| c.nom.clone())
                        .unwrap_or_else(|| UNCATEGORIZED_LABEL.to_string()),
                    categorie_couleur: categorie
                        .map(|c| c.couleur.clone())
                        .unwrap_or_else(|| DEFAULT_CATEGORY_COLOR.to_string()),
                    article,
                }
            })
            .collect()
    }
}

pub struct MemoryArticles {
    store: Arc<MemoryStore>,
}

impl MemoryArticles {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    fn sorted_rows(&self) -> Vec<Article> {
        let articles = lock(&self.store.articles);
        let mut rows = articles.rows.clone();
        rows.sort_by_key(|a| a.id);
        rows
    }
}

#[async_trait]
impl ArticleRepository for MemoryArticles {
    async fn list(&self) -> Result<Vec<ArticleView>> {
        Ok(self.store.views(self.sorted_rows()))
    }

    async fn get(&self, id: i32) -> Result<Option<ArticleView>> {
        let found = {
            let articles = lock(&self.store.articles);
            articles.rows.iter().find(|a| a.id == id).cloned()
        };

        Ok(found.map(|article| self.store.view_one(article)))
    }

    async fn list_by_category(&self, categorie_id: i32) -> Result<Vec<ArticleView>> {
        let rows = self
            .sorted_rows()
            .into_iter()
            .filter(|a| a.categorie_id == Some(categorie_id))
            .collect();

        Ok(self.store.views(rows))
    }

    async fn create(&self, req: CreateArticleRequest) -> Result<ArticleView> {
        let article = {
            let mut articles = lock(&self.store.articles);
            let article = Article {
                id: articles.allocate_id(),
                nom: req.nom,
                description: req.description,
                prix: req.prix,
                quantite: req.quantite,
                photo: req.photo,
                photo_2: req.photo_2,
                photo_3: req.photo_3,
                photo_4: req.photo_4,
                photo_5: req.photo_5,
                categorie_id: req.categorie_id,
            };
            articles.rows.push(article.clone());
            article
        };

        Ok(self.store.view_one(article))
    }

    async fn update(&self, id: i32, req: UpdateArticleRequest) -> Result<Option<ArticleView>> {
        let updated = {
            let mut articles = lock(&self.store.articles);
            match articles.rows.iter_mut().find(|a| a.id == id) {
                Some(article) => {
                    if let Some(nom) = req.nom {
                        article.nom = nom;
                    }
                    if let Some(description) = req.description {
                        article.description = Some(description);
                    }
                    if let Some(prix) = req.prix {
                        article.prix = prix;
                    }
                    if let Some(quantite) = req.quantite {
                        article.quantite = quantite;
                    }
                    if let Some(photo) = req.photo {
                        article.photo = Some(photo);
                    }
                    if let Some(photo) = req.photo_2 {
                        article.photo_2 = Some(photo);
                    }
                    if let Some(photo) = req.photo_3 {
                        article.photo_3 = Some(photo);
                    }
                    if let Some(photo) = req.photo_4 {
                        article.photo_4 = Some(photo);
                    }
                    if let Some(photo) = req.photo_5 {
                        article.photo_5 = Some(photo);
                    }
                    if let Some(categorie_id) = req.categorie_id {
                        article.categorie_id = Some(categorie_id);
                    }
                    Some(article.clone())
                }
                None => None,
            }
        };

        Ok(updated.map(|article| self.store.view_one(article)))
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        let mut articles = lock(&self.store.articles);
        let before = articles.rows.len();
        articles.rows.retain(|a| a.id != id);
        Ok(articles.rows.len() < before)
    }

    async fn search(&self, term: &str) -> Result<Vec<ArticleView>> {
        let needle = term.to_lowercase();

        let matching = self
            .sorted_rows()
            .into_iter()
            .filter(|article| {
                if article.nom.to_lowercase().contains(&needle) {
                    return true;
                }
                self.store
                    .category_name(article.categorie_id)
                    .is_some_and(|(nom, _)| nom.to_lowercase().contains(&needle))
            })
            .collect();

        Ok(self.store.views(matching))
    }

    async fn count(&self) -> Result<i64> {
        let articles = lock(&self.store.articles);
        Ok(articles.rows.len() as i64)
    }
}

pub struct MemoryCategories {
    store: Arc<MemoryStore>,
}

impl MemoryCategories {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CategoryRepository for MemoryCategories {
    async fn list(&self) -> Result<Vec<Categorie>> {
        let categories = lock(&self.store.categories);
        let mut rows = categories.rows.clone();
        rows.sort_by(|a, b| a.nom.cmp(&b.nom));
        Ok(rows)
    }

    async fn get(&self, id: i32) -> Result<Option<Categorie>> {
        let categories = lock(&self.store.categories);
        Ok(categories.rows.iter().find(|c| c.id == id).cloned())
    }

    async fn create(&self, req: CreateCategorieRequest) -> Result<Categorie> {
        let mut categories = lock(&self.store.categories);
        let categorie = Categorie {
            id: categories.allocate_id(),
            nom: req.nom,
            description: req.description.unwrap_or_default(),
            couleur: req
                .couleur
                .unwrap_or_else(|| DEFAULT_CATEGORY_COLOR.to_string()),
        };
        categories.rows.push(categorie.clone());
        Ok(categorie)
    }

    async fn update(&self, id: i32, req: UpdateCategorieRequest) -> Result<Option<Categorie>> {
        let mut categories = lock(&self.store.categories);
        Ok(categories.rows.iter_mut().find(|c| c.id == id).map(|categorie| {
            if let Some(nom) = req.nom {
                categorie.nom = nom;
            }
            if let Some(description) = req.description {
                categorie.description = description;
            }
            if let Some(couleur) = req.couleur {
                categorie.couleur = couleur;
            }
            categorie.clone()
        }))
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        let mut categories = lock(&self.store.categories);
        let before = categories.rows.len();
        categories.rows.retain(|c| c.id != id);
        Ok(categories.rows.len() < before)
    }
}

pub struct MemoryVariantes {
    store: Arc<MemoryStore>,
}

impl MemoryVariantes {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl VariantRepository for MemoryVariantes {
    async fn list_for_article(&self, article_id: i32) -> Result<Vec<Variante>> {
        let variantes = lock(&self.store.variantes);
        let mut rows: Vec<Variante> = variantes
            .rows
            .iter()
            .filter(|v| v.article_id == article_id)
            .cloned()
            .collect();
        // Tri stable: l'ordre d'insertion est conservé au sein d'un même axe.
        rows.sort_by(|a, b| a.nom_variante.cmp(&b.nom_variante));
        Ok(rows)
    }

    async fn create(&self, article_id: i32, req: CreateVarianteRequest) -> Result<Variante> {
        let mut variantes = lock(&self.store.variantes);
        let variante = Variante {
            id: variantes.allocate_id(),
            article_id,
            nom_variante: req.nom_variante,
            valeur: req.valeur,
            image_url: req.image_url,
            created_at: Utc::now(),
        };
        variantes.rows.push(variante.clone());
        Ok(variante)
    }

    async fn update(&self, id: i32, req: UpdateVarianteRequest) -> Result<Option<Variante>> {
        let mut variantes = lock(&self.store.variantes);
        Ok(variantes.rows.iter_mut().find(|v| v.id == id).map(|variante| {
            if let Some(nom_variante) = req.nom_variante {
                variante.nom_variante = nom_variante;
            }
            if let Some(valeur) = req.valeur {
                variante.valeur = valeur;
            }
            if let Some(image_url) = req.image_url {
                variante.image_url = Some(image_url);
            }
            variante.clone()
        }))
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        let mut variantes = lock(&self.store.variantes);
        let before = variantes.rows.len();
        variantes.rows.retain(|v| v.id != id);
        Ok(variantes.rows.len() < before)
    }
}

pub struct MemoryUsers {
    store: Arc<MemoryStore>,
}

impl MemoryUsers {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = lock(&self.store.users);
        Ok(users
            .rows
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create(&self, email: &str, name: &str, password_hash: &str) -> Result<User> {
        let mut users = lock(&self.store.users);
        let now = Utc::now();
        let user = User {
            id: users.allocate_id(),
            email: email.to_string(),
            name: name.to_string(),
            password: Some(password_hash.to_string()),
            created_at: now,
            updated_at: now,
        };
        users.rows.push(user.clone());
        Ok(user)
    }

    async fn update_password(&self, email: &str, password_hash: &str) -> Result<bool> {
        let mut users = lock(&self.store.users);
        match users
            .rows
            .iter_mut()
            .find(|u| u.email.eq_ignore_ascii_case(email))
        {
            Some(user) => {
                user.password = Some(password_hash.to_string());
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::repositories::Repositories;

    use super::*;

    fn create_request(nom: &str, prix: Decimal, quantite: i32) -> CreateArticleRequest {
        CreateArticleRequest {
            nom: nom.to_string(),
            description: None,
            prix,
            quantite,
            photo: None,
            photo_2: None,
            photo_3: None,
            photo_4: None,
            photo_5: None,
            categorie_id: None,
        }
    }

    #[tokio::test]
    async fn create_then_get_keeps_numeric_values() {
        let repos = Repositories::memory();

        let mut req = create_request("Clavier mécanique", Decimal::new(64950, 2), 5);
        req.categorie_id = Some(1);
        let created = repos.articles.create(req).await.unwrap();

        let fetched = repos.articles.get(created.article.id).await.unwrap().unwrap();
        assert_eq!(fetched.article.prix, Decimal::new(64950, 2));
        assert_eq!(fetched.article.quantite, 5);
        assert_eq!(fetched.categorie, "Électronique");
    }

    #[tokio::test]
    async fn get_unknown_id_is_none_not_an_error() {
        let repos = Repositories::memory();
        assert!(repos.articles.get(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_missing_article_returns_false() {
        let repos = Repositories::memory();
        assert!(!repos.articles.delete(9999).await.unwrap());
        assert!(repos.articles.delete(1).await.unwrap());
    }

    #[tokio::test]
    async fn ids_are_never_reused_after_deletion() {
        let repos = Repositories::memory();

        assert!(repos.articles.delete(12).await.unwrap());
        let created = repos
            .articles
            .create(create_request("Tapis de souris", Decimal::new(1999, 2), 3))
            .await
            .unwrap();

        assert_eq!(created.article.id, 13);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_on_name() {
        let repos = Repositories::memory();

        let results = repos.articles.search("max").await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].article.nom, "Nike Air Max 90");
        assert_eq!(results[0].categorie, "Chaussures");
    }

    #[tokio::test]
    async fn search_matches_category_names_too() {
        let repos = Repositories::memory();

        let results = repos.articles.search("chaussures").await.unwrap();

        let noms: Vec<&str> = results.iter().map(|a| a.article.nom.as_str()).collect();
        assert_eq!(noms, vec!["Nike Air Max 90", "Sneakers Adidas Ultraboost"]);
    }

    #[tokio::test]
    async fn article_without_category_gets_the_fallback_label() {
        let repos = Repositories::memory();

        let created = repos
            .articles
            .create(create_request("Carte cadeau", Decimal::new(5000, 2), 100))
            .await
            .unwrap();

        assert_eq!(created.categorie, UNCATEGORIZED_LABEL);
        assert_eq!(created.categorie_couleur, DEFAULT_CATEGORY_COLOR);
    }

    #[tokio::test]
    async fn list_by_category_filters_and_orders_by_id() {
        let repos = Repositories::memory();

        let electronics = repos.articles.list_by_category(1).await.unwrap();

        let ids: Vec<i32> = electronics.iter().map(|a| a.article.id).collect();
        assert_eq!(ids, vec![1, 2, 4, 6, 11]);
    }

    #[tokio::test]
    async fn category_create_applies_defaults() {
        let repos = Repositories::memory();

        let created = repos
            .categories
            .create(CreateCategorieRequest {
                nom: "Jardin".to_string(),
                description: None,
                couleur: None,
            })
            .await
            .unwrap();

        assert_eq!(created.description, "");
        assert_eq!(created.couleur, DEFAULT_CATEGORY_COLOR);
        assert_eq!(created.id, 6);
    }

    #[tokio::test]
    async fn variantes_are_scoped_to_their_article() {
        let repos = Repositories::memory();

        for (axis, valeur) in [("couleur", "rouge"), ("taille", "M"), ("couleur", "bleu")] {
            repos
                .variantes
                .create(
                    3,
                    CreateVarianteRequest {
                        nom_variante: axis.to_string(),
                        valeur: valeur.to_string(),
                        image_url: None,
                    },
                )
                .await
                .unwrap();
        }

        let variantes = repos.variantes.list_for_article(3).await.unwrap();
        assert_eq!(variantes.len(), 3);
        // axe "couleur" d'abord, dans l'ordre d'insertion
        let pairs: Vec<(&str, &str)> = variantes
            .iter()
            .map(|v| (v.nom_variante.as_str(), v.valeur.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![("couleur", "rouge"), ("couleur", "bleu"), ("taille", "M")]
        );

        assert!(repos.variantes.list_for_article(4).await.unwrap().is_empty());
    }
}
