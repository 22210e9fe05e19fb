//! Jeu de données de démarrage: alimente le magasin mémoire à la
//! construction et la base distante via `POST /api/admin/seed`.

use rust_decimal::Decimal;

use crate::models::{Article, Categorie};

pub fn fixture_categories() -> Vec<Categorie> {
    vec![
        categorie(1, "Électronique", "Appareils électroniques et gadgets", "#3b82f6"),
        categorie(2, "Vêtements", "Mode et habillement", "#f59e0b"),
        categorie(3, "Chaussures", "Chaussures et accessoires", "#8b5cf6"),
        categorie(4, "Accessoires", "Accessoires divers", "#06b6d4"),
        categorie(5, "Mobilier", "Meubles et décoration", "#10b981"),
    ]
}

pub fn fixture_articles() -> Vec<Article> {
    vec![
        article(1, "MacBook Pro 14\"", 2499_99, 15, "photo-1517336714731-489689fd1ca8", 1),
        article(2, "iPhone 15 Pro", 1199_99, 25, "photo-1592750475338-74b7b21085ab", 1),
        article(3, "Nike Air Max 90", 149_99, 50, "photo-1542291026-7eec264c27ff", 3),
        article(4, "Casque Sony WH-1000XM5", 379_99, 30, "photo-1505740420928-5e560c06d30e", 1),
        article(5, "Sac à dos Fjällräven", 89_99, 40, "photo-1553062407-98eeb64c6a62", 4),
        article(6, "Montre Apple Watch Ultra", 899_99, 20, "photo-1434493789847-2f02dc6ca35d", 1),
        article(7, "Veste en cuir classique", 299_99, 12, "photo-1551028719-00167b16eac5", 2),
        article(8, "Lunettes de soleil Ray-Ban", 179_99, 35, "photo-1572635196237-14b3f281503f", 4),
        article(9, "Chaise de bureau ergonomique", 449_99, 8, "photo-1580480055273-228ff5388ef8", 5),
        article(10, "Sneakers Adidas Ultraboost", 189_99, 45, "photo-1556906781-9a412961c28c", 3),
        article(11, "Tablette iPad Pro 12.9\"", 1299_99, 18, "photo-1544244015-0df4b3ffc6b0", 1),
        article(12, "Lampe de bureau LED", 79_99, 60, "photo-1507473885765-e6ed057f782c", 5),
    ]
}

fn categorie(id: i32, nom: &str, description: &str, couleur: &str) -> Categorie {
    Categorie {
        id,
        nom: nom.to_string(),
        description: description.to_string(),
        couleur: couleur.to_string(),
    }
}

fn article(id: i32, nom: &str, centimes: i64, quantite: i32, photo_id: &str, categorie_id: i32) -> Article {
    Article {
        id,
        nom: nom.to_string(),
        description: None,
        prix: Decimal::new(centimes, 2),
        quantite,
        photo: Some(format!(
            "https://images.unsplash.com/{}?w=500&h=400&fit=crop",
            photo_id
        )),
        photo_2: None,
        photo_3: None,
        photo_4: None,
        photo_5: None,
        categorie_id: Some(categorie_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_fixture_article_resolves_to_a_category() {
        let categories = fixture_categories();

        for article in fixture_articles() {
            let categorie_id = article.categorie_id.unwrap();
            assert!(
                categories.iter().any(|c| c.id == categorie_id),
                "article {} references unknown category {}",
                article.nom,
                categorie_id
            );
        }
    }

    #[test]
    fn fixture_set_matches_the_catalog() {
        assert_eq!(fixture_articles().len(), 12);
        assert_eq!(fixture_categories().len(), 5);

        let sneakers = fixture_articles()
            .into_iter()
            .find(|a| a.nom == "Nike Air Max 90")
            .unwrap();
        assert_eq!(sneakers.prix, Decimal::new(14999, 2));
        assert_eq!(sneakers.categorie_id, Some(3));
    }
}
