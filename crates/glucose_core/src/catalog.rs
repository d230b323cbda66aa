//! crates/glucose_core/src/catalog.rs
//!
//! The starter food catalog loaded into an empty store on startup.

use crate::domain::{FoodFacts, FoodQuery, NewFood, TrafficLight};
use crate::ports::{FoodCatalog, PortResult};

#[allow(clippy::too_many_arguments)]
fn food(
    name: &str,
    category: &str,
    glycemic_index: f64,
    carbohydrates: f64,
    fiber: f64,
    sugars: f64,
    portion: &str,
    traffic_light: TrafficLight,
    common_names: &[&str],
) -> NewFood {
    NewFood {
        facts: FoodFacts {
            name: name.to_string(),
            category: category.to_string(),
            glycemic_index,
            carbohydrates,
            fiber,
            sugars,
            portion: portion.to_string(),
            traffic_light,
        },
        common_names: common_names.iter().map(|n| n.to_string()).collect(),
    }
}

/// Ten everyday foods with their glycemic index and carbohydrate content.
#[rustfmt::skip]
pub fn seed_foods() -> Vec<NewFood> {
    use TrafficLight::{Green, Red, Yellow};
    vec![
        food("Manzana", "frutas", 36.0, 14.0, 2.4, 10.0, "1 unidad mediana (180g)", Green, &["manzana", "poma"]),
        food("Arroz Integral", "cereales", 68.0, 23.0, 1.8, 0.4, "1 taza cocida (150g)", Yellow, &["arroz integral", "arroz moreno"]),
        food("Palta/Aguacate", "frutas", 15.0, 2.0, 7.0, 0.7, "1 unidad mediana (150g)", Green, &["palta", "aguacate"]),
        food("Pan Blanco", "cereales", 75.0, 50.0, 2.0, 6.0, "2 rebanadas (60g)", Red, &["pan", "pan blanco"]),
        food("Quinua", "cereales", 53.0, 21.0, 2.8, 0.9, "1 taza cocida (185g)", Green, &["quinua", "quinoa"]),
        food("Brócoli", "verduras", 15.0, 6.0, 2.6, 1.5, "1 taza cruda (90g)", Green, &["brócoli", "brécol"]),
        food("Plátano Maduro", "frutas", 62.0, 23.0, 2.6, 12.0, "1 unidad mediana (118g)", Yellow, &["plátano", "banana", "banano"]),
        food("Azúcar Blanca", "endulzantes", 100.0, 99.8, 0.0, 99.8, "1 cucharada (12g)", Red, &["azúcar", "azúcar blanco"]),
        food("Lentejas", "legumbres", 25.0, 20.0, 8.0, 1.8, "1 taza cocida (198g)", Green, &["lentejas"]),
        food("Fideos Blancos", "cereales", 61.0, 31.0, 1.8, 0.6, "1 taza cocida (140g)", Yellow, &["fideos", "pasta", "espagueti"]),
    ]
}

/// Loads [`seed_foods`] when the catalog holds nothing yet. Returns how many
/// foods were inserted.
pub async fn seed_catalog(catalog: &dyn FoodCatalog) -> PortResult<usize> {
    if !catalog.list_foods(&FoodQuery::default()).await?.is_empty() {
        return Ok(0);
    }
    let foods = seed_foods();
    let count = foods.len();
    for food in foods {
        catalog.insert_food(food).await?;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::GLYCEMIC_INDEX_RANGE;

    #[test]
    fn seed_foods_are_well_formed() {
        let foods = seed_foods();
        assert_eq!(foods.len(), 10);
        for food in &foods {
            assert!(GLYCEMIC_INDEX_RANGE.contains(&food.facts.glycemic_index));
            assert!(!food.common_names.is_empty(), "{} has no common names", food.facts.name);
        }
        let red: Vec<&str> = foods
            .iter()
            .filter(|f| f.facts.traffic_light == TrafficLight::Red)
            .map(|f| f.facts.name.as_str())
            .collect();
        assert_eq!(red, ["Pan Blanco", "Azúcar Blanca"]);
    }
}
