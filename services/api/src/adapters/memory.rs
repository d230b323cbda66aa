//! services/api/src/adapters/memory.rs
//!
//! In-memory implementation of the store ports. Used when no `DATABASE_URL` is
//! configured and by the test suite. Data lives as long as the process.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use glucose_core::domain::{
    Account, AccountCredentials, Food, FoodLog, FoodQuery, GlucoseReading, MealPlan, MealPlanQuery,
    NewAccount, NewFood, NewFoodLog, NewGlucoseReading, NewMealPlan, NewSymptomEntry,
    ProfileUpdate, ReadingQuery, SortOrder, SymptomEntry,
};
use glucose_core::ports::{
    AccountStore, FoodCatalog, FoodLogStore, GlucoseStore, MealPlanStore, PortError, PortResult,
    SymptomStore,
};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    accounts: RwLock<HashMap<Uuid, AccountCredentials>>,
    glucose: RwLock<HashMap<Uuid, GlucoseReading>>,
    symptoms: RwLock<HashMap<Uuid, SymptomEntry>>,
    foods: RwLock<HashMap<Uuid, Food>>,
    food_logs: RwLock<HashMap<Uuid, FoodLog>>,
    meal_plans: RwLock<HashMap<Uuid, MealPlan>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn account_count(&self) -> usize {
        self.accounts.read().await.len()
    }
}

/// Filters, orders and truncates owner-scoped records the way the SQL queries do.
fn select<T: Clone>(
    records: impl Iterator<Item = T>,
    query: &ReadingQuery,
    recorded_at: impl Fn(&T) -> chrono::DateTime<Utc>,
    created_at: impl Fn(&T) -> chrono::DateTime<Utc>,
) -> Vec<T> {
    let mut selected: Vec<T> = records.filter(|r| query.contains(recorded_at(r))).collect();
    selected.sort_by_key(|r| (recorded_at(r), created_at(r)));
    if query.order == SortOrder::NewestFirst {
        selected.reverse();
    }
    if let Some(limit) = query.limit {
        selected.truncate(limit);
    }
    selected
}

//=========================================================================================
// `AccountStore` Implementation
//=========================================================================================

#[async_trait]
impl AccountStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> PortResult<Option<AccountCredentials>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|c| c.account.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> PortResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(&id).map(|c| c.account.clone()))
    }

    async fn insert_account(&self, new: NewAccount) -> PortResult<Account> {
        // Uniqueness is checked under the write lock, like a unique index would.
        let mut accounts = self.accounts.write().await;
        if accounts.values().any(|c| c.account.email == new.email) {
            return Err(PortError::Duplicate(format!("email {}", new.email)));
        }

        let account = Account {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            age: new.age,
            diabetes_type: new.diabetes_type,
            initial_glucose_level: new.initial_glucose_level,
            preferences: new.preferences,
            created_at: Utc::now(),
        };
        accounts.insert(
            account.id,
            AccountCredentials {
                account: account.clone(),
                password_hash: new.password_hash,
            },
        );
        Ok(account)
    }

    async fn update_account(&self, id: Uuid, update: ProfileUpdate) -> PortResult<Account> {
        let mut accounts = self.accounts.write().await;
        let creds = accounts
            .get_mut(&id)
            .ok_or_else(|| PortError::NotFound(format!("Account {} not found", id)))?;
        update.apply_to(&mut creds.account);
        Ok(creds.account.clone())
    }
}

//=========================================================================================
// `GlucoseStore` Implementation
//=========================================================================================

#[async_trait]
impl GlucoseStore for MemoryStore {
    async fn find_glucose(
        &self,
        owner: Uuid,
        query: &ReadingQuery,
    ) -> PortResult<Vec<GlucoseReading>> {
        let readings = self.glucose.read().await;
        Ok(select(
            readings.values().filter(|r| r.user_id == owner).cloned(),
            query,
            GlucoseReading::recorded_at,
            |r| r.created_at,
        ))
    }

    async fn get_glucose(&self, owner: Uuid, id: Uuid) -> PortResult<GlucoseReading> {
        let readings = self.glucose.read().await;
        readings
            .get(&id)
            .filter(|r| r.user_id == owner)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Glucose reading {} not found", id)))
    }

    async fn insert_glucose(
        &self,
        owner: Uuid,
        reading: NewGlucoseReading,
    ) -> PortResult<GlucoseReading> {
        let now = Utc::now();
        let record = GlucoseReading {
            id: Uuid::new_v4(),
            user_id: owner,
            date: reading.date,
            time: reading.time,
            level: reading.level,
            meal_context: reading.meal_context,
            notes: reading.notes,
            created_at: now,
            updated_at: now,
        };
        self.glucose.write().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_glucose(
        &self,
        owner: Uuid,
        id: Uuid,
        reading: NewGlucoseReading,
    ) -> PortResult<GlucoseReading> {
        let mut readings = self.glucose.write().await;
        let record = readings
            .get_mut(&id)
            .filter(|r| r.user_id == owner)
            .ok_or_else(|| PortError::NotFound(format!("Glucose reading {} not found", id)))?;
        record.date = reading.date;
        record.time = reading.time;
        record.level = reading.level;
        record.meal_context = reading.meal_context;
        record.notes = reading.notes;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete_glucose(&self, owner: Uuid, id: Uuid) -> PortResult<()> {
        let mut readings = self.glucose.write().await;
        match readings.get(&id) {
            Some(r) if r.user_id == owner => {
                readings.remove(&id);
                Ok(())
            }
            _ => Err(PortError::NotFound(format!("Glucose reading {} not found", id))),
        }
    }
}

//=========================================================================================
// `SymptomStore` Implementation
//=========================================================================================

#[async_trait]
impl SymptomStore for MemoryStore {
    async fn find_symptoms(
        &self,
        owner: Uuid,
        query: &ReadingQuery,
    ) -> PortResult<Vec<SymptomEntry>> {
        let entries = self.symptoms.read().await;
        Ok(select(
            entries.values().filter(|e| e.user_id == owner).cloned(),
            query,
            SymptomEntry::recorded_at,
            |e| e.created_at,
        ))
    }

    async fn get_symptom(&self, owner: Uuid, id: Uuid) -> PortResult<SymptomEntry> {
        let entries = self.symptoms.read().await;
        entries
            .get(&id)
            .filter(|e| e.user_id == owner)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Symptom entry {} not found", id)))
    }

    async fn insert_symptom(&self, owner: Uuid, entry: NewSymptomEntry) -> PortResult<SymptomEntry> {
        let now = Utc::now();
        let record = SymptomEntry {
            id: Uuid::new_v4(),
            user_id: owner,
            date: entry.date,
            symptoms: entry.symptoms,
            notes: entry.notes,
            created_at: now,
            updated_at: now,
        };
        self.symptoms.write().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_symptom(
        &self,
        owner: Uuid,
        id: Uuid,
        entry: NewSymptomEntry,
    ) -> PortResult<SymptomEntry> {
        let mut entries = self.symptoms.write().await;
        let record = entries
            .get_mut(&id)
            .filter(|e| e.user_id == owner)
            .ok_or_else(|| PortError::NotFound(format!("Symptom entry {} not found", id)))?;
        record.date = entry.date;
        record.symptoms = entry.symptoms;
        record.notes = entry.notes;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete_symptom(&self, owner: Uuid, id: Uuid) -> PortResult<()> {
        let mut entries = self.symptoms.write().await;
        match entries.get(&id) {
            Some(e) if e.user_id == owner => {
                entries.remove(&id);
                Ok(())
            }
            _ => Err(PortError::NotFound(format!("Symptom entry {} not found", id))),
        }
    }
}

//=========================================================================================
// `FoodCatalog` Implementation
//=========================================================================================

#[async_trait]
impl FoodCatalog for MemoryStore {
    async fn list_foods(&self, query: &FoodQuery) -> PortResult<Vec<Food>> {
        let foods = self.foods.read().await;
        let mut matching: Vec<Food> = foods.values().filter(|f| query.matches(f)).cloned().collect();
        matching.sort_by(|a, b| a.facts.name.cmp(&b.facts.name));
        Ok(matching)
    }

    async fn get_food(&self, id: Uuid) -> PortResult<Food> {
        let foods = self.foods.read().await;
        foods
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Food {} not found", id)))
    }

    async fn insert_food(&self, food: NewFood) -> PortResult<Food> {
        let record = Food {
            id: Uuid::new_v4(),
            facts: food.facts,
            common_names: food.common_names,
            created_at: Utc::now(),
        };
        self.foods.write().await.insert(record.id, record.clone());
        Ok(record)
    }
}

//=========================================================================================
// `FoodLogStore` Implementation
//=========================================================================================

#[async_trait]
impl FoodLogStore for MemoryStore {
    async fn find_food_logs(&self, owner: Uuid, query: &ReadingQuery) -> PortResult<Vec<FoodLog>> {
        let logs = self.food_logs.read().await;
        Ok(select(
            logs.values().filter(|l| l.user_id == owner).cloned(),
            query,
            |l| l.consumed_at,
            |l| l.created_at,
        ))
    }

    async fn get_food_log(&self, owner: Uuid, id: Uuid) -> PortResult<FoodLog> {
        let logs = self.food_logs.read().await;
        logs.get(&id)
            .filter(|l| l.user_id == owner)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Food log {} not found", id)))
    }

    async fn insert_food_log(&self, owner: Uuid, log: NewFoodLog) -> PortResult<FoodLog> {
        let now = Utc::now();
        let record = FoodLog {
            id: Uuid::new_v4(),
            user_id: owner,
            food_id: log.food_id,
            food: log.food,
            portion: log.portion,
            consumed_at: log.consumed_at,
            notes: log.notes,
            created_at: now,
            updated_at: now,
        };
        self.food_logs.write().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_food_log(&self, owner: Uuid, id: Uuid, log: NewFoodLog) -> PortResult<FoodLog> {
        let mut logs = self.food_logs.write().await;
        let record = logs
            .get_mut(&id)
            .filter(|l| l.user_id == owner)
            .ok_or_else(|| PortError::NotFound(format!("Food log {} not found", id)))?;
        record.food_id = log.food_id;
        record.food = log.food;
        record.portion = log.portion;
        record.consumed_at = log.consumed_at;
        record.notes = log.notes;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete_food_log(&self, owner: Uuid, id: Uuid) -> PortResult<()> {
        let mut logs = self.food_logs.write().await;
        match logs.get(&id) {
            Some(l) if l.user_id == owner => {
                logs.remove(&id);
                Ok(())
            }
            _ => Err(PortError::NotFound(format!("Food log {} not found", id))),
        }
    }
}

//=========================================================================================
// `MealPlanStore` Implementation
//=========================================================================================

#[async_trait]
impl MealPlanStore for MemoryStore {
    async fn find_meal_plans(&self, owner: Uuid, query: &MealPlanQuery) -> PortResult<Vec<MealPlan>> {
        let plans = self.meal_plans.read().await;
        let mut selected: Vec<MealPlan> = plans
            .values()
            .filter(|p| p.user_id == owner && query.matches(p))
            .cloned()
            .collect();
        selected.sort_by_key(|p| std::cmp::Reverse(p.created_at));
        if let Some(limit) = query.limit {
            selected.truncate(limit);
        }
        Ok(selected)
    }

    async fn get_meal_plan(&self, owner: Uuid, id: Uuid) -> PortResult<MealPlan> {
        let plans = self.meal_plans.read().await;
        plans
            .get(&id)
            .filter(|p| p.user_id == owner)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Meal plan {} not found", id)))
    }

    async fn insert_meal_plan(&self, owner: Uuid, plan: NewMealPlan) -> PortResult<MealPlan> {
        let now = Utc::now();
        let record = MealPlan {
            id: Uuid::new_v4(),
            user_id: owner,
            name: plan.name,
            description: plan.description,
            start_date: plan.start_date,
            end_date: plan.end_date,
            meals: plan.meals,
            is_active: plan.is_active,
            created_at: now,
            updated_at: now,
        };
        self.meal_plans.write().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_meal_plan(
        &self,
        owner: Uuid,
        id: Uuid,
        plan: NewMealPlan,
    ) -> PortResult<MealPlan> {
        let mut plans = self.meal_plans.write().await;
        let record = plans
            .get_mut(&id)
            .filter(|p| p.user_id == owner)
            .ok_or_else(|| PortError::NotFound(format!("Meal plan {} not found", id)))?;
        record.name = plan.name;
        record.description = plan.description;
        record.start_date = plan.start_date;
        record.end_date = plan.end_date;
        record.meals = plan.meals;
        record.is_active = plan.is_active;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete_meal_plan(&self, owner: Uuid, id: Uuid) -> PortResult<()> {
        let mut plans = self.meal_plans.write().await;
        match plans.get(&id) {
            Some(p) if p.user_id == owner => {
                plans.remove(&id);
                Ok(())
            }
            _ => Err(PortError::NotFound(format!("Meal plan {} not found", id))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, TimeZone};
    use glucose_core::catalog::seed_catalog;
    use glucose_core::domain::{MealContext, Preferences};

    fn reading(day: u32, level: f64) -> NewGlucoseReading {
        NewGlucoseReading {
            date: NaiveDate::from_ymd_opt(2025, 11, day).unwrap(),
            time: Some("08:00".to_string()),
            level,
            meal_context: MealContext::Fasting,
            notes: None,
        }
    }

    fn new_account(email: &str) -> NewAccount {
        NewAccount {
            name: "Ana".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            age: None,
            diabetes_type: None,
            initial_glucose_level: None,
            preferences: Preferences::default(),
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_refused() {
        let store = MemoryStore::new();
        store.insert_account(new_account("ana@example.com")).await.unwrap();
        let again = store.insert_account(new_account("ana@example.com")).await;
        assert!(matches!(again, Err(PortError::Duplicate(_))));
        assert_eq!(store.account_count().await, 1);
    }

    #[tokio::test]
    async fn readings_are_scoped_to_their_owner() {
        let store = MemoryStore::new();
        let (ana, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let mine = store.insert_glucose(ana, reading(1, 100.0)).await.unwrap();

        assert!(store.get_glucose(bob, mine.id).await.is_err());
        assert!(matches!(
            store.update_glucose(bob, mine.id, reading(1, 300.0)).await,
            Err(PortError::NotFound(_))
        ));
        assert!(matches!(
            store.delete_glucose(bob, mine.id).await,
            Err(PortError::NotFound(_))
        ));
        assert_eq!(store.get_glucose(ana, mine.id).await.unwrap().level, 100.0);
        assert!(store
            .find_glucose(bob, &ReadingQuery::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn window_and_order_are_applied() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        for (day, level) in [(1, 100.0), (5, 150.0), (10, 200.0)] {
            store.insert_glucose(owner, reading(day, level)).await.unwrap();
        }

        let start = Utc.with_ymd_and_hms(2025, 11, 4, 0, 0, 0).unwrap();
        let oldest_first = store
            .find_glucose(owner, &ReadingQuery::since(start))
            .await
            .unwrap();
        let levels: Vec<f64> = oldest_first.iter().map(|r| r.level).collect();
        assert_eq!(levels, vec![150.0, 200.0]);

        let query = ReadingQuery {
            end: Some(start + Duration::days(2)),
            limit: Some(1),
            ..Default::default()
        };
        let newest = store.find_glucose(owner, &query).await.unwrap();
        assert_eq!(newest.len(), 1);
        assert_eq!(newest[0].level, 150.0);
    }

    #[tokio::test]
    async fn catalog_is_seeded_once_and_searchable() {
        let store = MemoryStore::new();
        assert_eq!(seed_catalog(&store).await.unwrap(), 10);
        assert_eq!(seed_catalog(&store).await.unwrap(), 0);

        let fruits = store
            .list_foods(&FoodQuery {
                category: Some("frutas".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        let names: Vec<&str> = fruits.iter().map(|f| f.facts.name.as_str()).collect();
        assert_eq!(names, ["Manzana", "Palta/Aguacate", "Plátano Maduro"]);

        let banana = store
            .list_foods(&FoodQuery {
                search: Some("banana".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(banana.len(), 1);
        assert_eq!(store.get_food(banana[0].id).await.unwrap(), banana[0]);
    }

    #[tokio::test]
    async fn meal_plans_are_scoped_and_limited() {
        let store = MemoryStore::new();
        let (ana, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let day = |d| NaiveDate::from_ymd_opt(2025, 11, d).unwrap();
        let plan = |start, end| NewMealPlan {
            name: "Semana".into(),
            description: None,
            start_date: day(start),
            end_date: day(end),
            meals: vec![],
            is_active: true,
        };
        let first = store.insert_meal_plan(ana, plan(1, 7)).await.unwrap();
        store.insert_meal_plan(ana, plan(8, 14)).await.unwrap();

        assert!(matches!(
            store.get_meal_plan(bob, first.id).await,
            Err(PortError::NotFound(_))
        ));
        let covering = MealPlanQuery {
            covering: Some(day(3)),
            ..Default::default()
        };
        let found = store.find_meal_plans(ana, &covering).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, first.id);

        let limited = MealPlanQuery {
            limit: Some(1),
            ..Default::default()
        };
        assert_eq!(store.find_meal_plans(ana, &limited).await.unwrap().len(), 1);
        assert!(store
            .find_meal_plans(bob, &MealPlanQuery::default())
            .await
            .unwrap()
            .is_empty());
    }
}
