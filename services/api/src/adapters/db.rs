//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the store ports from the `core` crate. It handles all interactions with the
//! PostgreSQL database using `sqlx`.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use glucose_core::domain::{
    Account, AccountCredentials, DiabetesType, Food, FoodFacts, FoodLog, FoodQuery,
    GlucoseReading, MealContext, MealPlan, MealPlanQuery, NewAccount, NewFood, NewFoodLog,
    NewGlucoseReading, NewMealPlan, NewSymptomEntry, PlannedDay, Preferences, ProfileUpdate,
    ReadingQuery, SortOrder, SymptomEntry, SymptomItem, TrafficLight,
};
use glucose_core::ports::{
    AccountStore, FoodCatalog, FoodLogStore, GlucoseStore, MealPlanStore, PortError, PortResult,
    SymptomStore,
};
use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the store ports.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

fn unavailable(e: sqlx::Error) -> PortError {
    PortError::Unavailable(e.to_string())
}

fn parse_column<T: FromStr>(column: &str, raw: &str) -> PortResult<T> {
    T::from_str(raw)
        .map_err(|_| PortError::Unavailable(format!("unexpected value '{}' in column {}", raw, column)))
}

/// `LIMIT` parameter. `NULL` means no limit; anything past `i64::MAX` saturates.
fn limit_sql(limit: Option<usize>) -> Option<i64> {
    limit.map(|l| i64::try_from(l).unwrap_or(i64::MAX))
}

fn order_sql(order: SortOrder) -> &'static str {
    match order {
        SortOrder::OldestFirst => "ASC",
        SortOrder::NewestFirst => "DESC",
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

const ACCOUNT_COLUMNS: &str = "id, name, email, password_hash, age, diabetes_type, \
     initial_glucose_level, preferences, created_at";

#[derive(FromRow)]
struct AccountRecord {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    age: Option<i32>,
    diabetes_type: Option<String>,
    initial_glucose_level: Option<f64>,
    preferences: Json<Preferences>,
    created_at: DateTime<Utc>,
}
impl AccountRecord {
    fn to_domain(self) -> PortResult<AccountCredentials> {
        let diabetes_type = self
            .diabetes_type
            .as_deref()
            .map(|raw| parse_column::<DiabetesType>("diabetes_type", raw))
            .transpose()?;
        Ok(AccountCredentials {
            account: Account {
                id: self.id,
                name: self.name,
                email: self.email,
                age: self.age,
                diabetes_type,
                initial_glucose_level: self.initial_glucose_level,
                preferences: self.preferences.0,
                created_at: self.created_at,
            },
            password_hash: self.password_hash,
        })
    }
}

const GLUCOSE_COLUMNS: &str =
    "id, user_id, reading_date, reading_time, level, meal_context, notes, created_at, updated_at";

#[derive(FromRow)]
struct GlucoseRecord {
    id: Uuid,
    user_id: Uuid,
    reading_date: NaiveDate,
    reading_time: Option<String>,
    level: f64,
    meal_context: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl GlucoseRecord {
    fn to_domain(self) -> PortResult<GlucoseReading> {
        Ok(GlucoseReading {
            id: self.id,
            user_id: self.user_id,
            date: self.reading_date,
            time: self.reading_time,
            level: self.level,
            meal_context: parse_column::<MealContext>("meal_context", &self.meal_context)?,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SYMPTOM_COLUMNS: &str = "id, user_id, entry_date, symptoms, notes, created_at, updated_at";

#[derive(FromRow)]
struct SymptomRecord {
    id: Uuid,
    user_id: Uuid,
    entry_date: NaiveDate,
    symptoms: Json<Vec<SymptomItem>>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl SymptomRecord {
    fn to_domain(self) -> SymptomEntry {
        SymptomEntry {
            id: self.id,
            user_id: self.user_id,
            date: self.entry_date,
            symptoms: self.symptoms.0,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const FOOD_COLUMNS: &str = "id, name, category, glycemic_index, carbohydrates, fiber, sugars, \
     portion, traffic_light, common_names, created_at";

#[derive(FromRow)]
struct FoodRecord {
    id: Uuid,
    name: String,
    category: String,
    glycemic_index: f64,
    carbohydrates: f64,
    fiber: f64,
    sugars: f64,
    portion: String,
    traffic_light: String,
    common_names: Vec<String>,
    created_at: DateTime<Utc>,
}
impl FoodRecord {
    fn to_domain(self) -> PortResult<Food> {
        Ok(Food {
            id: self.id,
            facts: FoodFacts {
                name: self.name,
                category: self.category,
                glycemic_index: self.glycemic_index,
                carbohydrates: self.carbohydrates,
                fiber: self.fiber,
                sugars: self.sugars,
                portion: self.portion,
                traffic_light: parse_column::<TrafficLight>("traffic_light", &self.traffic_light)?,
            },
            common_names: self.common_names,
            created_at: self.created_at,
        })
    }
}

const FOOD_LOG_COLUMNS: &str =
    "id, user_id, food_id, food, portion, consumed_at, notes, created_at, updated_at";

#[derive(FromRow)]
struct FoodLogRecord {
    id: Uuid,
    user_id: Uuid,
    food_id: Option<Uuid>,
    food: Json<FoodFacts>,
    portion: String,
    consumed_at: DateTime<Utc>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl FoodLogRecord {
    fn to_domain(self) -> FoodLog {
        FoodLog {
            id: self.id,
            user_id: self.user_id,
            food_id: self.food_id,
            food: self.food.0,
            portion: self.portion,
            consumed_at: self.consumed_at,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const MEAL_PLAN_COLUMNS: &str = "id, user_id, name, description, start_date, end_date, meals, \
     is_active, created_at, updated_at";

#[derive(FromRow)]
struct MealPlanRecord {
    id: Uuid,
    user_id: Uuid,
    name: String,
    description: Option<String>,
    start_date: NaiveDate,
    end_date: NaiveDate,
    meals: Json<Vec<PlannedDay>>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl MealPlanRecord {
    fn to_domain(self) -> MealPlan {
        MealPlan {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            meals: self.meals.0,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

//=========================================================================================
// `AccountStore` Implementation
//=========================================================================================

#[async_trait]
impl AccountStore for DbAdapter {
    async fn find_by_email(&self, email: &str) -> PortResult<Option<AccountCredentials>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1");
        let record = sqlx::query_as::<_, AccountRecord>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?;
        record.map(AccountRecord::to_domain).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> PortResult<Option<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1");
        let record = sqlx::query_as::<_, AccountRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?;
        Ok(record.map(AccountRecord::to_domain).transpose()?.map(|c| c.account))
    }

    async fn insert_account(&self, new: NewAccount) -> PortResult<Account> {
        let sql = format!(
            "INSERT INTO accounts (id, name, email, password_hash, age, diabetes_type, \
             initial_glucose_level, preferences) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {ACCOUNT_COLUMNS}"
        );
        let record = sqlx::query_as::<_, AccountRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(&new.name)
            .bind(&new.email)
            .bind(&new.password_hash)
            .bind(new.age)
            .bind(new.diabetes_type.map(|t| t.to_string()))
            .bind(new.initial_glucose_level)
            .bind(Json(&new.preferences))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    PortError::Duplicate(format!("email {}", new.email))
                }
                other => unavailable(other),
            })?;
        Ok(record.to_domain()?.account)
    }

    async fn update_account(&self, id: Uuid, update: ProfileUpdate) -> PortResult<Account> {
        let mut tx = self.pool.begin().await.map_err(unavailable)?;

        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1 FOR UPDATE");
        let current = sqlx::query_as::<_, AccountRecord>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(unavailable)?
            .ok_or_else(|| PortError::NotFound(format!("Account {} not found", id)))?
            .to_domain()?;

        let mut account = current.account;
        update.apply_to(&mut account);

        sqlx::query(
            "UPDATE accounts SET name = $2, age = $3, diabetes_type = $4, \
             initial_glucose_level = $5, preferences = $6 WHERE id = $1",
        )
        .bind(id)
        .bind(&account.name)
        .bind(account.age)
        .bind(account.diabetes_type.map(|t| t.to_string()))
        .bind(account.initial_glucose_level)
        .bind(Json(&account.preferences))
        .execute(&mut *tx)
        .await
        .map_err(unavailable)?;

        tx.commit().await.map_err(unavailable)?;
        Ok(account)
    }
}

//=========================================================================================
// `GlucoseStore` Implementation
//=========================================================================================

#[async_trait]
impl GlucoseStore for DbAdapter {
    async fn find_glucose(
        &self,
        owner: Uuid,
        query: &ReadingQuery,
    ) -> PortResult<Vec<GlucoseReading>> {
        let sql = format!(
            "SELECT {GLUCOSE_COLUMNS} FROM glucose_readings WHERE user_id = $1 \
             AND ($2::timestamptz IS NULL OR recorded_at >= $2) \
             AND ($3::timestamptz IS NULL OR recorded_at <= $3) \
             ORDER BY recorded_at {order}, created_at {order} LIMIT $4",
            order = order_sql(query.order)
        );
        let records = sqlx::query_as::<_, GlucoseRecord>(&sql)
            .bind(owner)
            .bind(query.start)
            .bind(query.end)
            .bind(limit_sql(query.limit))
            .fetch_all(&self.pool)
            .await
            .map_err(unavailable)?;

        records.into_iter().map(GlucoseRecord::to_domain).collect()
    }

    async fn get_glucose(&self, owner: Uuid, id: Uuid) -> PortResult<GlucoseReading> {
        let sql =
            format!("SELECT {GLUCOSE_COLUMNS} FROM glucose_readings WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, GlucoseRecord>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?
            .ok_or_else(|| PortError::NotFound(format!("Glucose reading {} not found", id)))?
            .to_domain()
    }

    async fn insert_glucose(
        &self,
        owner: Uuid,
        reading: NewGlucoseReading,
    ) -> PortResult<GlucoseReading> {
        let sql = format!(
            "INSERT INTO glucose_readings (id, user_id, reading_date, reading_time, recorded_at, \
             level, meal_context, notes) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {GLUCOSE_COLUMNS}"
        );
        sqlx::query_as::<_, GlucoseRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(owner)
            .bind(reading.date)
            .bind(&reading.time)
            .bind(reading.recorded_at())
            .bind(reading.level)
            .bind(reading.meal_context.as_ref())
            .bind(&reading.notes)
            .fetch_one(&self.pool)
            .await
            .map_err(unavailable)?
            .to_domain()
    }

    async fn update_glucose(
        &self,
        owner: Uuid,
        id: Uuid,
        reading: NewGlucoseReading,
    ) -> PortResult<GlucoseReading> {
        let sql = format!(
            "UPDATE glucose_readings SET reading_date = $3, reading_time = $4, recorded_at = $5, \
             level = $6, meal_context = $7, notes = $8, updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 RETURNING {GLUCOSE_COLUMNS}"
        );
        sqlx::query_as::<_, GlucoseRecord>(&sql)
            .bind(id)
            .bind(owner)
            .bind(reading.date)
            .bind(&reading.time)
            .bind(reading.recorded_at())
            .bind(reading.level)
            .bind(reading.meal_context.as_ref())
            .bind(&reading.notes)
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?
            .ok_or_else(|| PortError::NotFound(format!("Glucose reading {} not found", id)))?
            .to_domain()
    }

    async fn delete_glucose(&self, owner: Uuid, id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM glucose_readings WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Glucose reading {} not found", id)));
        }
        Ok(())
    }
}

//=========================================================================================
// `SymptomStore` Implementation
//=========================================================================================

#[async_trait]
impl SymptomStore for DbAdapter {
    async fn find_symptoms(
        &self,
        owner: Uuid,
        query: &ReadingQuery,
    ) -> PortResult<Vec<SymptomEntry>> {
        let sql = format!(
            "SELECT {SYMPTOM_COLUMNS} FROM symptom_entries WHERE user_id = $1 \
             AND ($2::timestamptz IS NULL OR recorded_at >= $2) \
             AND ($3::timestamptz IS NULL OR recorded_at <= $3) \
             ORDER BY recorded_at {order}, created_at {order} LIMIT $4",
            order = order_sql(query.order)
        );
        let records = sqlx::query_as::<_, SymptomRecord>(&sql)
            .bind(owner)
            .bind(query.start)
            .bind(query.end)
            .bind(limit_sql(query.limit))
            .fetch_all(&self.pool)
            .await
            .map_err(unavailable)?;

        Ok(records.into_iter().map(SymptomRecord::to_domain).collect())
    }

    async fn get_symptom(&self, owner: Uuid, id: Uuid) -> PortResult<SymptomEntry> {
        let sql =
            format!("SELECT {SYMPTOM_COLUMNS} FROM symptom_entries WHERE id = $1 AND user_id = $2");
        let record = sqlx::query_as::<_, SymptomRecord>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?
            .ok_or_else(|| PortError::NotFound(format!("Symptom entry {} not found", id)))?;
        Ok(record.to_domain())
    }

    async fn insert_symptom(&self, owner: Uuid, entry: NewSymptomEntry) -> PortResult<SymptomEntry> {
        let sql = format!(
            "INSERT INTO symptom_entries (id, user_id, entry_date, recorded_at, symptoms, notes) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {SYMPTOM_COLUMNS}"
        );
        let record = sqlx::query_as::<_, SymptomRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(owner)
            .bind(entry.date)
            .bind(entry.recorded_at())
            .bind(Json(&entry.symptoms))
            .bind(&entry.notes)
            .fetch_one(&self.pool)
            .await
            .map_err(unavailable)?;
        Ok(record.to_domain())
    }

    async fn update_symptom(
        &self,
        owner: Uuid,
        id: Uuid,
        entry: NewSymptomEntry,
    ) -> PortResult<SymptomEntry> {
        let sql = format!(
            "UPDATE symptom_entries SET entry_date = $3, recorded_at = $4, symptoms = $5, \
             notes = $6, updated_at = NOW() WHERE id = $1 AND user_id = $2 \
             RETURNING {SYMPTOM_COLUMNS}"
        );
        let record = sqlx::query_as::<_, SymptomRecord>(&sql)
            .bind(id)
            .bind(owner)
            .bind(entry.date)
            .bind(entry.recorded_at())
            .bind(Json(&entry.symptoms))
            .bind(&entry.notes)
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?
            .ok_or_else(|| PortError::NotFound(format!("Symptom entry {} not found", id)))?;
        Ok(record.to_domain())
    }

    async fn delete_symptom(&self, owner: Uuid, id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM symptom_entries WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Symptom entry {} not found", id)));
        }
        Ok(())
    }
}

//=========================================================================================
// `FoodCatalog` Implementation
//=========================================================================================

#[async_trait]
impl FoodCatalog for DbAdapter {
    async fn list_foods(&self, query: &FoodQuery) -> PortResult<Vec<Food>> {
        let sql = format!(
            "SELECT {FOOD_COLUMNS} FROM foods \
             WHERE ($1::text IS NULL OR LOWER(category) = LOWER($1)) \
             AND ($2::text IS NULL OR LOWER(name) LIKE '%' || $2 || '%' \
                  OR LOWER(category) LIKE '%' || $2 || '%' \
                  OR EXISTS (SELECT 1 FROM UNNEST(common_names) AS n \
                             WHERE LOWER(n) LIKE '%' || $2 || '%')) \
             ORDER BY name"
        );
        let records = sqlx::query_as::<_, FoodRecord>(&sql)
            .bind(query.category_filter())
            .bind(query.search_term().map(|t| escape_like(&t)))
            .fetch_all(&self.pool)
            .await
            .map_err(unavailable)?;

        records.into_iter().map(FoodRecord::to_domain).collect()
    }

    async fn get_food(&self, id: Uuid) -> PortResult<Food> {
        let sql = format!("SELECT {FOOD_COLUMNS} FROM foods WHERE id = $1");
        sqlx::query_as::<_, FoodRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?
            .ok_or_else(|| PortError::NotFound(format!("Food {} not found", id)))?
            .to_domain()
    }

    async fn insert_food(&self, food: NewFood) -> PortResult<Food> {
        let sql = format!(
            "INSERT INTO foods (id, name, category, glycemic_index, carbohydrates, fiber, sugars, \
             portion, traffic_light, common_names) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {FOOD_COLUMNS}"
        );
        let facts = &food.facts;
        sqlx::query_as::<_, FoodRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(&facts.name)
            .bind(&facts.category)
            .bind(facts.glycemic_index)
            .bind(facts.carbohydrates)
            .bind(facts.fiber)
            .bind(facts.sugars)
            .bind(&facts.portion)
            .bind(facts.traffic_light.as_ref())
            .bind(&food.common_names)
            .fetch_one(&self.pool)
            .await
            .map_err(unavailable)?
            .to_domain()
    }
}

/// Escapes `LIKE` wildcards so a search term only matches literally.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

//=========================================================================================
// `FoodLogStore` Implementation
//=========================================================================================

#[async_trait]
impl FoodLogStore for DbAdapter {
    async fn find_food_logs(&self, owner: Uuid, query: &ReadingQuery) -> PortResult<Vec<FoodLog>> {
        let sql = format!(
            "SELECT {FOOD_LOG_COLUMNS} FROM food_logs WHERE user_id = $1 \
             AND ($2::timestamptz IS NULL OR consumed_at >= $2) \
             AND ($3::timestamptz IS NULL OR consumed_at <= $3) \
             ORDER BY consumed_at {order}, created_at {order} LIMIT $4",
            order = order_sql(query.order)
        );
        let records = sqlx::query_as::<_, FoodLogRecord>(&sql)
            .bind(owner)
            .bind(query.start)
            .bind(query.end)
            .bind(limit_sql(query.limit))
            .fetch_all(&self.pool)
            .await
            .map_err(unavailable)?;

        Ok(records.into_iter().map(FoodLogRecord::to_domain).collect())
    }

    async fn get_food_log(&self, owner: Uuid, id: Uuid) -> PortResult<FoodLog> {
        let sql = format!("SELECT {FOOD_LOG_COLUMNS} FROM food_logs WHERE id = $1 AND user_id = $2");
        let record = sqlx::query_as::<_, FoodLogRecord>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?
            .ok_or_else(|| PortError::NotFound(format!("Food log {} not found", id)))?;
        Ok(record.to_domain())
    }

    async fn insert_food_log(&self, owner: Uuid, log: NewFoodLog) -> PortResult<FoodLog> {
        let sql = format!(
            "INSERT INTO food_logs (id, user_id, food_id, food, portion, consumed_at, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {FOOD_LOG_COLUMNS}"
        );
        let record = sqlx::query_as::<_, FoodLogRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(owner)
            .bind(log.food_id)
            .bind(Json(&log.food))
            .bind(&log.portion)
            .bind(log.consumed_at)
            .bind(&log.notes)
            .fetch_one(&self.pool)
            .await
            .map_err(unavailable)?;
        Ok(record.to_domain())
    }

    async fn update_food_log(&self, owner: Uuid, id: Uuid, log: NewFoodLog) -> PortResult<FoodLog> {
        let sql = format!(
            "UPDATE food_logs SET food_id = $3, food = $4, portion = $5, consumed_at = $6, \
             notes = $7, updated_at = NOW() WHERE id = $1 AND user_id = $2 \
             RETURNING {FOOD_LOG_COLUMNS}"
        );
        let record = sqlx::query_as::<_, FoodLogRecord>(&sql)
            .bind(id)
            .bind(owner)
            .bind(log.food_id)
            .bind(Json(&log.food))
            .bind(&log.portion)
            .bind(log.consumed_at)
            .bind(&log.notes)
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?
            .ok_or_else(|| PortError::NotFound(format!("Food log {} not found", id)))?;
        Ok(record.to_domain())
    }

    async fn delete_food_log(&self, owner: Uuid, id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM food_logs WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Food log {} not found", id)));
        }
        Ok(())
    }
}

//=========================================================================================
// `MealPlanStore` Implementation
//=========================================================================================

#[async_trait]
impl MealPlanStore for DbAdapter {
    async fn find_meal_plans(&self, owner: Uuid, query: &MealPlanQuery) -> PortResult<Vec<MealPlan>> {
        let sql = format!(
            "SELECT {MEAL_PLAN_COLUMNS} FROM meal_plans WHERE user_id = $1 \
             AND ($2::date IS NULL OR (start_date <= $2 AND end_date >= $2)) \
             AND ($3::date IS NULL OR start_date >= $3) \
             AND ($4::date IS NULL OR end_date <= $4) \
             ORDER BY created_at DESC LIMIT $5"
        );
        let records = sqlx::query_as::<_, MealPlanRecord>(&sql)
            .bind(owner)
            .bind(query.covering)
            .bind(query.within.map(|(start, _)| start))
            .bind(query.within.map(|(_, end)| end))
            .bind(limit_sql(query.limit))
            .fetch_all(&self.pool)
            .await
            .map_err(unavailable)?;

        Ok(records.into_iter().map(MealPlanRecord::to_domain).collect())
    }

    async fn get_meal_plan(&self, owner: Uuid, id: Uuid) -> PortResult<MealPlan> {
        let sql = format!("SELECT {MEAL_PLAN_COLUMNS} FROM meal_plans WHERE id = $1 AND user_id = $2");
        let record = sqlx::query_as::<_, MealPlanRecord>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?
            .ok_or_else(|| PortError::NotFound(format!("Meal plan {} not found", id)))?;
        Ok(record.to_domain())
    }

    async fn insert_meal_plan(&self, owner: Uuid, plan: NewMealPlan) -> PortResult<MealPlan> {
        let sql = format!(
            "INSERT INTO meal_plans (id, user_id, name, description, start_date, end_date, meals, \
             is_active) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {MEAL_PLAN_COLUMNS}"
        );
        let record = sqlx::query_as::<_, MealPlanRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(owner)
            .bind(&plan.name)
            .bind(&plan.description)
            .bind(plan.start_date)
            .bind(plan.end_date)
            .bind(Json(&plan.meals))
            .bind(plan.is_active)
            .fetch_one(&self.pool)
            .await
            .map_err(unavailable)?;
        Ok(record.to_domain())
    }

    async fn update_meal_plan(
        &self,
        owner: Uuid,
        id: Uuid,
        plan: NewMealPlan,
    ) -> PortResult<MealPlan> {
        let sql = format!(
            "UPDATE meal_plans SET name = $3, description = $4, start_date = $5, end_date = $6, \
             meals = $7, is_active = $8, updated_at = NOW() WHERE id = $1 AND user_id = $2 \
             RETURNING {MEAL_PLAN_COLUMNS}"
        );
        let record = sqlx::query_as::<_, MealPlanRecord>(&sql)
            .bind(id)
            .bind(owner)
            .bind(&plan.name)
            .bind(&plan.description)
            .bind(plan.start_date)
            .bind(plan.end_date)
            .bind(Json(&plan.meals))
            .bind(plan.is_active)
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?
            .ok_or_else(|| PortError::NotFound(format!("Meal plan {} not found", id)))?;
        Ok(record.to_domain())
    }

    async fn delete_meal_plan(&self, owner: Uuid, id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM meal_plans WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Meal plan {} not found", id)));
        }
        Ok(())
    }
}
