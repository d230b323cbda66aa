//! crates/glucose_core/src/nutrition.rs
//!
//! Reductions over food logs and meal plans: the daily nutrition summary and
//! the shopping list of a set of plans.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{FoodLog, MealPlan, TrafficLight};
use crate::stats::round2;

/// One line of a shopping list: a food in a given portion and how many times
/// the plans call for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShoppingItem {
    pub name: String,
    pub portion: String,
    pub quantity: usize,
}

/// Groups every planned food by `(name, portion)`, sorted by name then portion.
pub fn shopping_list(plans: &[MealPlan]) -> Vec<ShoppingItem> {
    let mut counts: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for planned in plans.iter().flat_map(MealPlan::foods) {
        *counts
            .entry((planned.food.name.as_str(), planned.portion.as_str()))
            .or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|((name, portion), quantity)| ShoppingItem {
            name: name.to_string(),
            portion: portion.to_string(),
            quantity,
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrafficLightCounts {
    pub green: usize,
    pub yellow: usize,
    pub red: usize,
}

/// Totals of the logged foods. Nutrient figures are per catalog portion, summed
/// once per log.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionSummary {
    pub total_logs: usize,
    pub carbohydrates: f64,
    pub fiber: f64,
    pub sugars: f64,
    /// `None` when nothing was logged.
    pub average_glycemic_index: Option<f64>,
    pub traffic_lights: TrafficLightCounts,
}

pub fn nutrition_summary(logs: &[FoodLog]) -> NutritionSummary {
    let mut summary = NutritionSummary {
        total_logs: logs.len(),
        ..Default::default()
    };
    let mut glycemic_total = 0.0;
    for log in logs {
        let food = &log.food;
        summary.carbohydrates += food.carbohydrates;
        summary.fiber += food.fiber;
        summary.sugars += food.sugars;
        glycemic_total += food.glycemic_index;
        match food.traffic_light {
            TrafficLight::Green => summary.traffic_lights.green += 1,
            TrafficLight::Yellow => summary.traffic_lights.yellow += 1,
            TrafficLight::Red => summary.traffic_lights.red += 1,
        }
    }
    summary.carbohydrates = round2(summary.carbohydrates);
    summary.fiber = round2(summary.fiber);
    summary.sugars = round2(summary.sugars);
    if !logs.is_empty() {
        summary.average_glycemic_index = Some(round2(glycemic_total / logs.len() as f64));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed_foods;
    use crate::domain::{FoodFacts, MealType, PlannedDay, PlannedFood, PlannedMeal};
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn facts(name: &str) -> FoodFacts {
        seed_foods()
            .into_iter()
            .find(|f| f.facts.name == name)
            .map(|f| f.facts)
            .unwrap()
    }

    fn planned(name: &str, portion: &str) -> PlannedFood {
        PlannedFood {
            food_id: None,
            food: facts(name),
            portion: portion.into(),
            notes: None,
        }
    }

    fn plan(days: Vec<Vec<PlannedFood>>) -> MealPlan {
        let start = NaiveDate::from_ymd_opt(2025, 11, 3).unwrap();
        MealPlan {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Semana".into(),
            description: None,
            start_date: start,
            end_date: start + chrono::Days::new(6),
            meals: days
                .into_iter()
                .enumerate()
                .map(|(i, foods)| PlannedDay {
                    day: start + chrono::Days::new(i as u64),
                    meals: vec![PlannedMeal {
                        kind: MealType::Breakfast,
                        foods,
                    }],
                })
                .collect(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn shopping_list_counts_name_and_portion_pairs() {
        let plans = vec![
            plan(vec![
                vec![planned("Manzana", "1 unidad"), planned("Quinua", "1 taza")],
                vec![planned("Manzana", "1 unidad")],
            ]),
            plan(vec![vec![planned("Manzana", "2 unidades")]]),
        ];
        let list = shopping_list(&plans);
        assert_eq!(
            list,
            vec![
                ShoppingItem {
                    name: "Manzana".into(),
                    portion: "1 unidad".into(),
                    quantity: 2
                },
                ShoppingItem {
                    name: "Manzana".into(),
                    portion: "2 unidades".into(),
                    quantity: 1
                },
                ShoppingItem {
                    name: "Quinua".into(),
                    portion: "1 taza".into(),
                    quantity: 1
                },
            ]
        );
        assert!(shopping_list(&[]).is_empty());
    }

    fn log(name: &str) -> FoodLog {
        FoodLog {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            food_id: None,
            food: facts(name),
            portion: "1".into(),
            consumed_at: Utc::now(),
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn summary_totals_and_average() {
        let summary = nutrition_summary(&[log("Manzana"), log("Pan Blanco"), log("Lentejas")]);
        assert_eq!(summary.total_logs, 3);
        assert_eq!(summary.carbohydrates, 84.0);
        assert_eq!(summary.fiber, 12.4);
        assert_eq!(summary.average_glycemic_index, Some(45.33));
        assert_eq!(
            summary.traffic_lights,
            TrafficLightCounts {
                green: 2,
                yellow: 0,
                red: 1
            }
        );

        let empty = nutrition_summary(&[]);
        assert_eq!(empty.total_logs, 0);
        assert_eq!(empty.average_glycemic_index, None);
    }
}
