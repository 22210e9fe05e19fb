use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Variante {
    pub id: i32,
    pub article_id: i32,
    pub nom_variante: String,
    pub valeur: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateVarianteRequest {
    pub nom_variante: String,
    pub valeur: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateVarianteRequest {
    pub nom_variante: Option<String>,
    pub valeur: Option<String>,
    pub image_url: Option<String>,
}

/// Une valeur d'un axe de variante, sans la colonne de regroupement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarianteOption {
    pub id: i32,
    pub valeur: String,
    pub image_url: Option<String>,
}

/// Regroupe les variantes par axe (`nom_variante`). Les axes sortent en ordre
/// alphabétique et les valeurs dans l'ordre où le backend les a renvoyées.
pub fn group_by_axis(variantes: Vec<Variante>) -> BTreeMap<String, Vec<VarianteOption>> {
    let mut grouped: BTreeMap<String, Vec<VarianteOption>> = BTreeMap::new();

    for variante in variantes {
        grouped
            .entry(variante.nom_variante)
            .or_default()
            .push(VarianteOption {
                id: variante.id,
                valeur: variante.valeur,
                image_url: variante.image_url,
            });
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variante(id: i32, nom_variante: &str, valeur: &str) -> Variante {
        Variante {
            id,
            article_id: 1,
            nom_variante: nom_variante.to_string(),
            valeur: valeur.to_string(),
            image_url: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn grouping_preserves_backend_order_within_axis() {
        let variantes = vec![
            variante(1, "couleur", "rouge"),
            variante(2, "couleur", "bleu"),
        ];

        let grouped = group_by_axis(variantes);

        let couleurs: Vec<&str> = grouped["couleur"]
            .iter()
            .map(|option| option.valeur.as_str())
            .collect();
        assert_eq!(couleurs, vec!["rouge", "bleu"]);
    }

    #[test]
    fn axes_come_out_in_alphabetical_order() {
        let variantes = vec![
            variante(1, "taille", "M"),
            variante(2, "couleur", "noir"),
            variante(3, "taille", "L"),
        ];

        let grouped = group_by_axis(variantes);

        let axes: Vec<&String> = grouped.keys().collect();
        assert_eq!(axes, vec!["couleur", "taille"]);
        assert_eq!(grouped["taille"].len(), 2);
    }
}
