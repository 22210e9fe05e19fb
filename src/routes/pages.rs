//! Coquilles HTML minimales des pages; l'interface elle-même est rendue par
//! le front-end monté sur `#app`.

use axum::{
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect},
};

use crate::middleware;

fn page_shell(title: &str, page: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n\
         <html lang=\"fr\">\n\
         <head><meta charset=\"utf-8\"><title>{} - ShopCatalog</title></head>\n\
         <body><div id=\"app\" data-page=\"{}\"></div></body>\n\
         </html>\n",
        title, page
    ))
}

pub async fn catalog_page() -> Html<String> {
    page_shell("Catalogue", "catalog")
}

/// Page de connexion; un visiteur déjà connecté est renvoyé vers
/// l'administration.
pub async fn login_page(headers: HeaderMap) -> impl IntoResponse {
    if middleware::session_claims(&headers).is_some() {
        return Redirect::to("/admin").into_response();
    }

    page_shell("Connexion", "login").into_response()
}

pub async fn admin_page() -> Html<String> {
    page_shell("Administration", "admin")
}

pub async fn admin_categories_page() -> Html<String> {
    page_shell("Catégories", "admin-categories")
}

/// Toute route inconnue ramène au catalogue.
pub async fn not_found_redirect() -> Redirect {
    Redirect::to("/")
}
