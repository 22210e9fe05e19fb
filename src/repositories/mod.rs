//! Contrat d'accès aux données du catalogue.
//!
//! Un trait par entité, deux implémentations: le magasin mémoire alimenté par
//! les données de démonstration, et la base Postgres. Le backend est choisi
//! une seule fois au démarrage; aucun appelant ne re-teste le mode.

mod memory;
mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    data,
    error::Result,
    models::{
        Article, ArticleView, Categorie, CreateArticleRequest, CreateCategorieRequest,
        CreateVarianteRequest, UpdateArticleRequest, UpdateCategorieRequest,
        UpdateVarianteRequest, User, Variante,
    },
};

pub use memory::MemoryStore;

/// CRUD + recherche des articles, lus sous leur forme aplatie
/// ([`ArticleView`]). `get` renvoie `None` pour un identifiant inconnu; seule
/// une vraie panne du backend produit une erreur.
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<ArticleView>>;
    async fn get(&self, id: i32) -> Result<Option<ArticleView>>;
    async fn list_by_category(&self, categorie_id: i32) -> Result<Vec<ArticleView>>;
    async fn create(&self, req: CreateArticleRequest) -> Result<ArticleView>;
    async fn update(&self, id: i32, req: UpdateArticleRequest) -> Result<Option<ArticleView>>;
    async fn delete(&self, id: i32) -> Result<bool>;
    async fn search(&self, term: &str) -> Result<Vec<ArticleView>>;
    async fn count(&self) -> Result<i64>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Categorie>>;
    async fn get(&self, id: i32) -> Result<Option<Categorie>>;
    async fn create(&self, req: CreateCategorieRequest) -> Result<Categorie>;
    async fn update(&self, id: i32, req: UpdateCategorieRequest) -> Result<Option<Categorie>>;
    async fn delete(&self, id: i32) -> Result<bool>;
}

#[async_trait]
pub trait VariantRepository: Send + Sync {
    async fn list_for_article(&self, article_id: i32) -> Result<Vec<Variante>>;
    async fn create(&self, article_id: i32, req: CreateVarianteRequest) -> Result<Variante>;
    async fn update(&self, id: i32, req: UpdateVarianteRequest) -> Result<Option<Variante>>;
    async fn delete(&self, id: i32) -> Result<bool>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn create(&self, email: &str, name: &str, password_hash: &str) -> Result<User>;
    async fn update_password(&self, email: &str, password_hash: &str) -> Result<bool>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Memory,
    Postgres,
}

/// Les quatre dépôts derrière des objets de trait, plus le mode effectif.
#[derive(Clone)]
pub struct Repositories {
    pub kind: BackendKind,
    pub articles: Arc<dyn ArticleRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub variantes: Arc<dyn VariantRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl Repositories {
    /// Magasin mémoire ré-alimenté à chaque démarrage; rien n'est persisté.
    pub fn memory() -> Self {
        let store = Arc::new(MemoryStore::with_fixtures(
            data::fixture_categories(),
            data::fixture_articles(),
        ));

        Self {
            kind: BackendKind::Memory,
            articles: Arc::new(memory::MemoryArticles::new(store.clone())),
            categories: Arc::new(memory::MemoryCategories::new(store.clone())),
            variantes: Arc::new(memory::MemoryVariantes::new(store.clone())),
            users: Arc::new(memory::MemoryUsers::new(store)),
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            kind: BackendKind::Postgres,
            articles: Arc::new(postgres::PgArticles::new(pool.clone())),
            categories: Arc::new(postgres::PgCategories::new(pool.clone())),
            variantes: Arc::new(postgres::PgVariantes::new(pool.clone())),
            users: Arc::new(postgres::PgUsers::new(pool)),
        }
    }
}
