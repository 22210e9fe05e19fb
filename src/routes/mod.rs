mod admin;
mod articles;
mod categories;
mod health;
mod login;
mod pages;
mod register;
mod reset_password;
mod session;
mod uploads;
mod variantes;

use axum::{
    middleware::from_fn,
    routing::{get, post, put},
    Router,
};

use crate::{middleware, AppState};

pub fn create_router() -> Router<AppState> {
    // Lectures du catalogue et cycle de session, sans authentification.
    let public_api = Router::new()
        .route("/articles", get(articles::list_articles))
        .route("/articles/search", get(articles::search_articles))
        .route("/articles/:id", get(articles::get_article))
        .route("/articles/:id/variantes", get(variantes::list_variantes))
        .route(
            "/articles/:id/variantes/groupees",
            get(variantes::list_variantes_groupees),
        )
        .route("/categories", get(categories::list_categories))
        .route("/categories/names", get(categories::list_category_names))
        .route("/categories/:id", get(categories::get_category))
        .route(
            "/categories/:id/articles",
            get(articles::list_articles_by_category),
        )
        .route("/auth/login", post(login::login_user))
        .route("/auth/register", post(register::register_user))
        .route("/auth/logout", post(session::logout_user))
        .route("/auth/session", get(session::get_session))
        .route(
            "/auth/reset-password",
            post(reset_password::request_password_reset),
        )
        .route(
            "/auth/reset-password/confirm",
            post(reset_password::confirm_password_reset),
        );

    // Mutations du catalogue: jeton de session exigé.
    let admin_api = Router::new()
        .route("/articles", post(articles::create_article))
        .route(
            "/articles/:id",
            put(articles::update_article).delete(articles::delete_article),
        )
        .route("/articles/:id/variantes", post(variantes::create_variante))
        .route(
            "/variantes/:id",
            put(variantes::update_variante).delete(variantes::delete_variante),
        )
        .route("/categories", post(categories::create_category))
        .route(
            "/categories/:id",
            put(categories::update_category).delete(categories::delete_category),
        )
        .route(
            "/uploads",
            post(uploads::upload_images).delete(uploads::delete_images),
        )
        .route("/admin/seed", post(admin::seed_database))
        .route("/auth/me", get(session::current_user))
        .route_layer(from_fn(middleware::auth_middleware));

    let admin_pages = Router::new()
        .route("/admin", get(pages::admin_page))
        .route("/admin/categories", get(pages::admin_categories_page))
        .route_layer(from_fn(middleware::page_guard));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .nest("/api", public_api.merge(admin_api))
        .route("/", get(pages::catalog_page))
        .route("/login", get(pages::login_page))
        .merge(admin_pages)
        .fallback(pages::not_found_redirect)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::{
        config::StorageConfig, repositories::Repositories, services::auth_events::AuthEvents,
        utils::jwt, AppState,
    };

    use super::*;

    fn test_app() -> Router {
        std::env::set_var("JWT_SECRET", "secret-de-test");

        let state = AppState {
            repos: Repositories::memory(),
            db: None,
            s3: None,
            ses: None,
            storage: StorageConfig {
                bucket: "articles".to_string(),
                assets_url: "https://assets.example.com".to_string(),
            },
            frontend_url: "http://localhost:5173".to_string(),
            auth_events: AuthEvents::new(),
        };

        create_router().with_state(state)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn admin_page_without_session_redirects_to_login() {
        let response = test_app().oneshot(get_request("/admin")).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/login?redirect=/admin"
        );
    }

    #[tokio::test]
    async fn admin_categories_page_keeps_its_destination_in_the_redirect() {
        let response = test_app()
            .oneshot(get_request("/admin/categories"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/login?redirect=/admin/categories"
        );
    }

    #[tokio::test]
    async fn login_page_with_a_session_redirects_to_admin() {
        std::env::set_var("JWT_SECRET", "secret-de-test");
        let token = jwt::generate_token(1, "admin@example.com").unwrap();

        let request = Request::builder()
            .uri("/login")
            .header(header::COOKIE, format!("session={}", token))
            .body(Body::empty())
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/admin");
    }

    #[tokio::test]
    async fn unknown_routes_redirect_to_the_catalog() {
        let response = test_app()
            .oneshot(get_request("/nimporte/quoi"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
    }

    #[tokio::test]
    async fn the_catalog_lists_the_twelve_fixture_articles() {
        let response = test_app().oneshot(get_request("/api/articles")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let articles = body.as_array().unwrap();
        assert_eq!(articles.len(), 12);
        assert_eq!(articles[0]["nom"], "MacBook Pro 14\"");
        assert_eq!(articles[0]["categorie"], "Électronique");
        assert_eq!(articles[0]["categorie_couleur"], "#3b82f6");
    }

    #[tokio::test]
    async fn search_matches_names_case_insensitively() {
        let response = test_app()
            .oneshot(get_request("/api/articles/search?q=Max"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let articles = body.as_array().unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0]["nom"], "Nike Air Max 90");
        assert_eq!(articles[0]["categorie"], "Chaussures");
    }

    #[tokio::test]
    async fn unknown_article_is_a_404() {
        let response = test_app()
            .oneshot(get_request("/api/articles/9999"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn mutations_require_a_session_token() {
        let response = test_app()
            .oneshot(json_request(
                "POST",
                "/api/articles",
                None,
                json!({ "nom": "Test", "prix": 10, "quantite": 1 }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn session_endpoint_returns_null_without_a_cookie() {
        let response = test_app()
            .oneshot(get_request("/api/auth/session"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, Value::Null);
    }

    #[tokio::test]
    async fn register_then_manage_the_catalog() {
        let app = test_app();

        // inscription
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/register",
                None,
                json!({
                    "email": "admin@example.com",
                    "name": "Admin",
                    "password": "tres-secret"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let token = body_json(response).await["token"].as_str().unwrap().to_string();

        // l'identité répond
        let request = Request::builder()
            .uri("/api/auth/me")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["email"], "admin@example.com");

        // création d'un article: le prix arrive en chaîne et la quantité en
        // nombre, les deux ressortent numériques
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/articles",
                Some(&token),
                json!({
                    "nom": "Écouteurs sans fil",
                    "prix": "129.99",
                    "quantite": 14,
                    "categorie_id": 1
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let created = body_json(response).await;
        assert_eq!(created["id"], 13);
        assert_eq!(created["prix"], "129.99");
        assert_eq!(created["quantite"], 14);
        assert_eq!(created["categorie"], "Électronique");

        // suppression d'un id inconnu: false, pas d'erreur
        let response = app
            .clone()
            .oneshot(json_request(
                "DELETE",
                "/api/articles/9999",
                Some(&token),
                json!(null),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["deleted"], false);

        // le semis est un no-op en mode mémoire
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/admin/seed",
                Some(&token),
                json!(null),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["seeded"], false);
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let app = test_app();
        let payload = json!({
            "email": "admin@example.com",
            "name": "Admin",
            "password": "tres-secret"
        });

        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/auth/register", None, payload.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/auth/register", None, payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn grouped_variantes_bucket_by_axis_in_backend_order() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/register",
                None,
                json!({
                    "email": "admin@example.com",
                    "name": "Admin",
                    "password": "tres-secret"
                }),
            ))
            .await
            .unwrap();
        let token = body_json(response).await["token"].as_str().unwrap().to_string();

        for valeur in ["rouge", "bleu"] {
            let response = app
                .clone()
                .oneshot(json_request(
                    "POST",
                    "/api/articles/3/variantes",
                    Some(&token),
                    json!({ "nom_variante": "couleur", "valeur": valeur }),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .clone()
            .oneshot(get_request("/api/articles/3/variantes/groupees"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let couleurs: Vec<&str> = body["couleur"]
            .as_array()
            .unwrap()
            .iter()
            .map(|option| option["valeur"].as_str().unwrap())
            .collect();
        assert_eq!(couleurs, vec!["rouge", "bleu"]);
    }

    #[tokio::test]
    async fn health_endpoints_respond() {
        let response = test_app().oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = test_app()
            .oneshot(get_request("/health/ready"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["database"], "in-memory");
    }
}
