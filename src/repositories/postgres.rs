//! Implémentation Postgres du contrat de dépôts.
//!
//! Requêtes sqlx à l'exécution; «introuvable» passe par `fetch_optional`,
//! jamais par l'inspection d'un code d'erreur du fournisseur.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    error::{AppError, Result},
    models::{
        ArticleView, Categorie, CreateArticleRequest, CreateCategorieRequest,
        CreateVarianteRequest, UpdateArticleRequest, UpdateCategorieRequest,
        UpdateVarianteRequest, User, Variante, DEFAULT_CATEGORY_COLOR, UNCATEGORIZED_LABEL,
    },
};

use super::{ArticleRepository, CategoryRepository, UserRepository, VariantRepository};

/// SELECT aplati commun aux lectures d'articles: la catégorie est jointe en
/// LEFT JOIN et les libellés de repli appliqués côté SQL.
fn article_view_select() -> String {
    format!(
        "SELECT a.id, a.nom, a.description, a.prix, a.quantite, \
                a.photo, a.photo_2, a.photo_3, a.photo_4, a.photo_5, a.categorie_id, \
                COALESCE(c.nom, '{}') AS categorie, \
                COALESCE(c.couleur, '{}') AS categorie_couleur \
         FROM articles a \
         LEFT JOIN categories c ON c.id = a.categorie_id",
        UNCATEGORIZED_LABEL, DEFAULT_CATEGORY_COLOR
    )
}

pub struct PgArticles {
    pool: PgPool,
}

impl PgArticles {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArticleRepository for PgArticles {
    async fn list(&self) -> Result<Vec<ArticleView>> {
        let query = format!("{} ORDER BY a.id ASC", article_view_select());
        let articles = sqlx::query_as::<_, ArticleView>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(articles)
    }

    async fn get(&self, id: i32) -> Result<Option<ArticleView>> {
        let query = format!("{} WHERE a.id = $1", article_view_select());
        let article = sqlx::query_as::<_, ArticleView>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(article)
    }

    async fn list_by_category(&self, categorie_id: i32) -> Result<Vec<ArticleView>> {
        let query = format!(
            "{} WHERE a.categorie_id = $1 ORDER BY a.id ASC",
            article_view_select()
        );
        let articles = sqlx::query_as::<_, ArticleView>(&query)
            .bind(categorie_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(articles)
    }

    async fn create(&self, req: CreateArticleRequest) -> Result<ArticleView> {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO articles \
                 (nom, description, prix, quantite, photo, photo_2, photo_3, photo_4, photo_5, categorie_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING id",
        )
        .bind(&req.nom)
        .bind(&req.description)
        .bind(req.prix)
        .bind(req.quantite)
        .bind(&req.photo)
        .bind(&req.photo_2)
        .bind(&req.photo_3)
        .bind(&req.photo_4)
        .bind(&req.photo_5)
        .bind(req.categorie_id)
        .fetch_one(&self.pool)
        .await?;

        self.get(id)
            .await?
            .ok_or_else(|| AppError::InternalError("Article créé introuvable".to_string()))
    }

    async fn update(&self, id: i32, req: UpdateArticleRequest) -> Result<Option<ArticleView>> {
        let mut query_builder = sqlx::QueryBuilder::<sqlx::Postgres>::new("UPDATE articles SET ");
        let mut fields = query_builder.separated(", ");
        let mut has_fields = false;

        if let Some(nom) = req.nom {
            fields.push("nom = ").push_bind_unseparated(nom);
            has_fields = true;
        }
        if let Some(description) = req.description {
            fields.push("description = ").push_bind_unseparated(description);
            has_fields = true;
        }
        if let Some(prix) = req.prix {
            fields.push("prix = ").push_bind_unseparated(prix);
            has_fields = true;
        }
        if let Some(quantite) = req.quantite {
            fields.push("quantite = ").push_bind_unseparated(quantite);
            has_fields = true;
        }
        if let Some(photo) = req.photo {
            fields.push("photo = ").push_bind_unseparated(photo);
            has_fields = true;
        }
        if let Some(photo) = req.photo_2 {
            fields.push("photo_2 = ").push_bind_unseparated(photo);
            has_fields = true;
        }
        if let Some(photo) = req.photo_3 {
            fields.push("photo_3 = ").push_bind_unseparated(photo);
            has_fields = true;
        }
        if let Some(photo) = req.photo_4 {
            fields.push("photo_4 = ").push_bind_unseparated(photo);
            has_fields = true;
        }
        if let Some(photo) = req.photo_5 {
            fields.push("photo_5 = ").push_bind_unseparated(photo);
            has_fields = true;
        }
        if let Some(categorie_id) = req.categorie_id {
            fields.push("categorie_id = ").push_bind_unseparated(categorie_id);
            has_fields = true;
        }

        if !has_fields {
            return self.get(id).await;
        }

        query_builder.push(" WHERE id = ");
        query_builder.push_bind(id);
        query_builder.push(" RETURNING id");

        let updated = query_builder
            .build_query_scalar::<i32>()
            .fetch_optional(&self.pool)
            .await?;

        match updated {
            Some(id) => self.get(id).await,
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn search(&self, term: &str) -> Result<Vec<ArticleView>> {
        let query = format!(
            "{} WHERE a.nom ILIKE $1 OR c.nom ILIKE $1 ORDER BY a.id ASC",
            article_view_select()
        );
        let articles = sqlx::query_as::<_, ArticleView>(&query)
            .bind(format!("%{}%", term))
            .fetch_all(&self.pool)
            .await?;

        Ok(articles)
    }

    async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM articles")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

pub struct PgCategories {
    pool: PgPool,
}

impl PgCategories {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategories {
    async fn list(&self) -> Result<Vec<Categorie>> {
        let categories =
            sqlx::query_as::<_, Categorie>("SELECT * FROM categories ORDER BY nom ASC")
                .fetch_all(&self.pool)
                .await?;

        Ok(categories)
    }

    async fn get(&self, id: i32) -> Result<Option<Categorie>> {
        let categorie = sqlx::query_as::<_, Categorie>("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(categorie)
    }

    async fn create(&self, req: CreateCategorieRequest) -> Result<Categorie> {
        let categorie = sqlx::query_as::<_, Categorie>(
            "INSERT INTO categories (nom, description, couleur) \
             VALUES ($1, $2, $3) \
             RETURNING *",
        )
        .bind(&req.nom)
        .bind(req.description.unwrap_or_default())
        .bind(
            req.couleur
                .unwrap_or_else(|| DEFAULT_CATEGORY_COLOR.to_string()),
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(categorie)
    }

    async fn update(&self, id: i32, req: UpdateCategorieRequest) -> Result<Option<Categorie>> {
        let mut query_builder = sqlx::QueryBuilder::<sqlx::Postgres>::new("UPDATE categories SET ");
        let mut fields = query_builder.separated(", ");
        let mut has_fields = false;

        if let Some(nom) = req.nom {
            fields.push("nom = ").push_bind_unseparated(nom);
            has_fields = true;
        }
        if let Some(description) = req.description {
            fields.push("description = ").push_bind_unseparated(description);
            has_fields = true;
        }
        if let Some(couleur) = req.couleur {
            fields.push("couleur = ").push_bind_unseparated(couleur);
            has_fields = true;
        }

        if !has_fields {
            return self.get(id).await;
        }

        query_builder.push(" WHERE id = ");
        query_builder.push_bind(id);
        query_builder.push(" RETURNING *");

        let categorie = query_builder
            .build_query_as::<Categorie>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(categorie)
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

pub struct PgVariantes {
    pool: PgPool,
}

impl PgVariantes {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VariantRepository for PgVariantes {
    async fn list_for_article(&self, article_id: i32) -> Result<Vec<Variante>> {
        let variantes = sqlx::query_as::<_, Variante>(
            "SELECT * FROM article_variantes \
             WHERE article_id = $1 \
             ORDER BY nom_variante ASC, created_at ASC",
        )
        .bind(article_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(variantes)
    }

    async fn create(&self, article_id: i32, req: CreateVarianteRequest) -> Result<Variante> {
        let variante = sqlx::query_as::<_, Variante>(
            "INSERT INTO article_variantes (article_id, nom_variante, valeur, image_url) \
             VALUES ($1, $2, $3, $4) \
             RETURNING *",
        )
        .bind(article_id)
        .bind(&req.nom_variante)
        .bind(&req.valeur)
        .bind(&req.image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(variante)
    }

    async fn update(&self, id: i32, req: UpdateVarianteRequest) -> Result<Option<Variante>> {
        let mut query_builder =
            sqlx::QueryBuilder::<sqlx::Postgres>::new("UPDATE article_variantes SET ");
        let mut fields = query_builder.separated(", ");
        let mut has_fields = false;

        if let Some(nom_variante) = req.nom_variante {
            fields.push("nom_variante = ").push_bind_unseparated(nom_variante);
            has_fields = true;
        }
        if let Some(valeur) = req.valeur {
            fields.push("valeur = ").push_bind_unseparated(valeur);
            has_fields = true;
        }
        if let Some(image_url) = req.image_url {
            fields.push("image_url = ").push_bind_unseparated(image_url);
            has_fields = true;
        }

        if !has_fields {
            let variante =
                sqlx::query_as::<_, Variante>("SELECT * FROM article_variantes WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?;
            return Ok(variante);
        }

        query_builder.push(" WHERE id = ");
        query_builder.push_bind(id);
        query_builder.push(" RETURNING *");

        let variante = query_builder
            .build_query_as::<Variante>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(variante)
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM article_variantes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

pub struct PgUsers {
    pool: PgPool,
}

impl PgUsers {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUsers {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn create(&self, email: &str, name: &str, password_hash: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, name, password) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update_password(&self, email: &str, password_hash: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE users SET password = $2, updated_at = NOW() WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
