pub mod catalog;
pub mod domain;
pub mod nutrition;
pub mod ports;
pub mod stats;
pub mod validation;

pub use domain::{
    Account, AccountCredentials, DiabetesType, Food, FoodFacts, FoodLog, FoodQuery,
    GlucoseReading, MealContext, MealPlan, MealPlanQuery, MealType, NewAccount, NewFood,
    NewFoodLog, NewGlucoseReading, NewMealPlan, NewSymptomEntry, NotificationSettings,
    PlannedDay, PlannedFood, PlannedMeal, Preferences, ProfileUpdate, ReadingQuery, SortOrder,
    SymptomEntry, SymptomItem, SymptomKind, TrafficLight,
};
pub use ports::{
    AccountStore, FoodCatalog, FoodLogStore, GlucoseStore, MealPlanStore, PortError, PortResult,
    SymptomStore,
};
pub use stats::{summarize, Reading, SeriesKind, Summary, Trend};
pub use validation::{FieldError, ValidationErrors};
