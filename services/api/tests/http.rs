//! End-to-end tests over the real router with the in-memory store.

use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum_test::{TestResponse, TestServer};
use glucose_api::{
    adapters::MemoryStore,
    config::Config,
    web::{self, state::AppState},
};
use glucose_core::catalog::seed_catalog;
use serde_json::{json, Value};

fn create_test_server() -> anyhow::Result<TestServer> {
    let state = AppState::new(Arc::new(MemoryStore::new()), Arc::new(Config::default()))?;
    let server = TestServer::new(web::router(Arc::new(state)))?;
    Ok(server)
}

/// Like [`create_test_server`], with the starter food catalog loaded.
async fn create_seeded_server() -> anyhow::Result<TestServer> {
    let store = Arc::new(MemoryStore::new());
    seed_catalog(store.as_ref()).await?;
    let state = AppState::new(store, Arc::new(Config::default()))?;
    let server = TestServer::new(web::router(Arc::new(state)))?;
    Ok(server)
}

/// The field names listed in a validation error body.
fn error_fields(response: &TestResponse) -> Vec<String> {
    response.json::<Value>()["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e["field"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// The session token carried by a response's `Set-Cookie` header.
fn session_token(response: &TestResponse) -> Option<String> {
    let cookie = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
    let value = cookie.split(';').next()?.strip_prefix("token=")?;
    (!value.is_empty()).then(|| value.to_string())
}

fn cookie(token: &str) -> String {
    format!("token={token}")
}

async fn register(server: &TestServer, email: &str) -> anyhow::Result<(String, String)> {
    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "name": "Ana",
            "email": email,
            "password": "secret1",
            "age": 34,
            "diabetesType": "type2"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let token = session_token(&response).ok_or_else(|| anyhow::anyhow!("no session cookie"))?;
    let body: Value = response.json();
    let id = body["user"]["id"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("no user id"))?
        .to_string();
    Ok((token, id))
}

#[tokio::test]
async fn health_is_public() -> anyhow::Result<()> {
    let server = create_test_server()?;
    let response = server.get("/api/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["status"], "OK");
    Ok(())
}

#[tokio::test]
async fn register_sets_cookie_and_login_finds_same_account() -> anyhow::Result<()> {
    let server = create_test_server()?;
    let (_, registered_id) = register(&server, "ana@example.com").await?;

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": "ANA@example.com ", "password": "secret1" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Max-Age=604800"));
    assert!(!set_cookie.contains("Secure"));

    let body: Value = response.json();
    assert_eq!(body["user"]["id"], registered_id.as_str());
    assert_eq!(body["user"]["email"], "ana@example.com");
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("passwordHash").is_none());
    Ok(())
}

#[tokio::test]
async fn duplicate_registration_is_rejected() -> anyhow::Result<()> {
    let server = create_test_server()?;
    register(&server, "ana@example.com").await?;

    let response = server
        .post("/api/auth/register")
        .json(&json!({ "name": "Other", "email": "Ana@Example.com", "password": "secret2" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(session_token(&response).is_none());
    assert_eq!(response.json::<Value>()["success"], false);
    Ok(())
}

#[tokio::test]
async fn invalid_registration_lists_fields() -> anyhow::Result<()> {
    let server = create_test_server()?;
    let response = server
        .post("/api/auth/register")
        .json(&json!({ "name": "", "email": "nope", "password": "123" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .map(|errors| errors.iter().filter_map(|e| e["field"].as_str()).collect())
        .unwrap_or_default();
    assert!(fields.contains(&"name"));
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"password"));
    Ok(())
}

#[tokio::test]
async fn login_failures_are_indistinguishable() -> anyhow::Result<()> {
    let server = create_test_server()?;
    register(&server, "ana@example.com").await?;

    let wrong_password = server
        .post("/api/auth/login")
        .json(&json!({ "email": "ana@example.com", "password": "not-it" }))
        .await;
    let unknown_email = server
        .post("/api/auth/login")
        .json(&json!({ "email": "bob@example.com", "password": "secret1" }))
        .await;

    assert_eq!(wrong_password.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.text(), unknown_email.text());
    assert!(session_token(&wrong_password).is_none());
    Ok(())
}

#[tokio::test]
async fn me_requires_a_valid_token() -> anyhow::Result<()> {
    let server = create_test_server()?;
    let (token, id) = register(&server, "ana@example.com").await?;

    let anonymous = server.get("/api/auth/me").await;
    assert_eq!(anonymous.status_code(), StatusCode::UNAUTHORIZED);

    let tampered = server
        .get("/api/auth/me")
        .add_header("Cookie", cookie(&format!("{token}x")))
        .await;
    assert_eq!(tampered.status_code(), StatusCode::UNAUTHORIZED);

    let me = server
        .get("/api/auth/me")
        .add_header("Cookie", cookie(&token))
        .await;
    assert_eq!(me.status_code(), StatusCode::OK);
    assert_eq!(me.json::<Value>()["user"]["id"], id.as_str());
    Ok(())
}

#[tokio::test]
async fn profile_update_changes_only_given_fields() -> anyhow::Result<()> {
    let server = create_test_server()?;
    let (token, _) = register(&server, "ana@example.com").await?;

    let response = server
        .put("/api/auth/me")
        .add_header("Cookie", cookie(&token))
        .json(&json!({ "name": "Ana María", "initialGlucoseLevel": 120 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let user = &response.json::<Value>()["user"];
    assert_eq!(user["name"], "Ana María");
    assert_eq!(user["initialGlucoseLevel"], 120.0);
    assert_eq!(user["age"], 34);
    assert_eq!(user["email"], "ana@example.com");

    let rejected = server
        .put("/api/auth/me")
        .add_header("Cookie", cookie(&token))
        .json(&json!({ "age": 0 }))
        .await;
    assert_eq!(rejected.status_code(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn logout_clears_the_cookie() -> anyhow::Result<()> {
    let server = create_test_server()?;
    let response = server.post("/api/auth/logout").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(set_cookie.starts_with("token=;"));
    assert!(set_cookie.contains("Max-Age=0"));
    Ok(())
}

#[tokio::test]
async fn readings_are_private_to_their_owner() -> anyhow::Result<()> {
    let server = create_test_server()?;
    let (ana, _) = register(&server, "ana@example.com").await?;
    let (bob, _) = register(&server, "bob@example.com").await?;

    let created = server
        .post("/api/glucose")
        .add_header("Cookie", cookie(&ana))
        .json(&json!({ "date": "2025-11-03", "time": "07:30", "level": 98, "mealContext": "fasting" }))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    let id = created.json::<Value>()["data"]["id"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("no reading id"))?
        .to_string();

    let path = format!("/api/glucose/{id}");
    let as_bob = server.get(&path).add_header("Cookie", cookie(&bob)).await;
    assert_eq!(as_bob.status_code(), StatusCode::NOT_FOUND);

    let delete_as_bob = server.delete(&path).add_header("Cookie", cookie(&bob)).await;
    assert_eq!(delete_as_bob.status_code(), StatusCode::NOT_FOUND);

    let bob_list = server
        .get("/api/glucose")
        .add_header("Cookie", cookie(&bob))
        .await;
    assert_eq!(bob_list.json::<Value>()["count"], 0);

    let as_ana = server.get(&path).add_header("Cookie", cookie(&ana)).await;
    assert_eq!(as_ana.status_code(), StatusCode::OK);
    assert_eq!(as_ana.json::<Value>()["data"]["level"], 98.0);

    let deleted = server.delete(&path).add_header("Cookie", cookie(&ana)).await;
    assert_eq!(deleted.status_code(), StatusCode::OK);
    let gone = server.get(&path).add_header("Cookie", cookie(&ana)).await;
    assert_eq!(gone.status_code(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn invalid_reading_is_rejected() -> anyhow::Result<()> {
    let server = create_test_server()?;
    let (token, _) = register(&server, "ana@example.com").await?;

    let response = server
        .post("/api/glucose")
        .add_header("Cookie", cookie(&token))
        .json(&json!({ "date": "2025-11-03", "time": "25:00", "level": 0, "mealContext": "fasting" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn glucose_statistics_summarize_the_window() -> anyhow::Result<()> {
    let server = create_test_server()?;
    let (token, _) = register(&server, "ana@example.com").await?;

    let today = chrono::Utc::now().date_naive();
    let levels = [60.0, 100.0, 200.0];
    for (i, level) in levels.iter().enumerate() {
        let date = today - chrono::Duration::days(3 - i as i64);
        let response = server
            .post("/api/glucose")
            .add_header("Cookie", cookie(&token))
            .json(&json!({
                "date": date.format("%Y-%m-%d").to_string(),
                "time": "08:00",
                "level": level,
                "mealContext": if i == 0 { "fasting" } else { "after_meal" }
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
    }

    let response = server
        .get("/api/glucose/statistics")
        .add_query_param("days", 7)
        .add_header("Cookie", cookie(&token))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let data = &response.json::<Value>()["data"];
    assert_eq!(data["count"], 3);
    assert_eq!(data["average"], 120.0);
    assert_eq!(data["min"], 60.0);
    assert_eq!(data["max"], 200.0);
    assert_eq!(data["trend"], "stable");
    assert_eq!(data["windowDays"], 7);
    assert_eq!(data["contextAverages"]["after_meal"], 150.0);
    assert_eq!(data["contextCounts"]["fasting"], 1);
    assert_eq!(data["targetBands"]["inTarget"], 1);
    assert_eq!(data["targetBands"]["aboveTarget"], 1);
    assert_eq!(data["targetBands"]["belowTarget"], 1);
    assert!(data["dateRange"]["start"].is_string());

    let zero = server
        .get("/api/glucose/statistics")
        .add_query_param("days", 0)
        .add_header("Cookie", cookie(&token))
        .await;
    assert_eq!(zero.status_code(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn empty_statistics_are_zero() -> anyhow::Result<()> {
    let server = create_test_server()?;
    let (token, _) = register(&server, "ana@example.com").await?;

    let response = server
        .get("/api/glucose/statistics")
        .add_header("Cookie", cookie(&token))
        .await;
    let data = &response.json::<Value>()["data"];
    assert_eq!(data["count"], 0);
    assert_eq!(data["average"], 0.0);
    assert_eq!(data["trend"], "stable");
    assert_eq!(data["windowDays"], 30);
    assert_eq!(data["contextAverages"], json!({}));
    Ok(())
}

#[tokio::test]
async fn symptom_stats_count_entries_and_types() -> anyhow::Result<()> {
    let server = create_test_server()?;
    let (token, _) = register(&server, "ana@example.com").await?;

    let today = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();
    let response = server
        .post("/api/symptoms")
        .add_header("Cookie", cookie(&token))
        .json(&json!({
            "date": today,
            "symptoms": [
                { "type": "energy", "severity": 4, "description": "tired" },
                { "type": "mood", "severity": 7, "description": "irritable" }
            ]
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let listed = server
        .get("/api/symptoms")
        .add_query_param("date", &today)
        .add_header("Cookie", cookie(&token))
        .await;
    assert_eq!(listed.json::<Value>()["count"], 1);

    let stats = server
        .get("/api/symptoms/stats")
        .add_header("Cookie", cookie(&token))
        .await;
    assert_eq!(stats.status_code(), StatusCode::OK);
    let data = &stats.json::<Value>()["data"];
    assert_eq!(data["totalEntries"], 1);
    assert_eq!(data["count"], 2);
    assert_eq!(data["average"], 5.5);
    assert_eq!(data["symptomCounts"]["energy"], 1);
    assert_eq!(data["contextAverages"]["mood"], 7.0);
    assert!(data.get("targetBands").is_none());
    Ok(())
}

#[tokio::test]
async fn oversized_statistics_window_is_rejected() -> anyhow::Result<()> {
    let server = create_test_server()?;
    let (token, _) = register(&server, "ana@example.com").await?;

    for path in ["/api/glucose/statistics", "/api/symptoms/stats"] {
        let response = server
            .get(path)
            .add_query_param("days", 100_000_000)
            .add_header("Cookie", cookie(&token))
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{path}");
        assert_eq!(error_fields(&response), ["days"], "{path}");
    }

    let widest = server
        .get("/api/glucose/statistics")
        .add_query_param("days", 3650)
        .add_header("Cookie", cookie(&token))
        .await;
    assert_eq!(widest.status_code(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn last_representable_day_is_a_validation_error() -> anyhow::Result<()> {
    let server = create_test_server()?;
    let (token, _) = register(&server, "ana@example.com").await?;

    let glucose = server
        .get("/api/glucose")
        .add_query_param("endDate", "+262142-12-31")
        .add_header("Cookie", cookie(&token))
        .await;
    assert_eq!(glucose.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&glucose), ["endDate"]);

    for path in ["/api/symptoms", "/api/food-logs"] {
        let response = server
            .get(path)
            .add_query_param("date", "+262142-12-31")
            .add_header("Cookie", cookie(&token))
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{path}");
        assert_eq!(error_fields(&response), ["date"], "{path}");
    }

    // The server keeps answering afterwards.
    let health = server.get("/api/health").await;
    assert_eq!(health.status_code(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn list_limit_is_bounded() -> anyhow::Result<()> {
    let server = create_test_server()?;
    let (token, _) = register(&server, "ana@example.com").await?;

    for path in ["/api/glucose", "/api/symptoms", "/api/food-logs", "/api/meal-plans"] {
        for limit in ["18446744073709551615", "0", "501"] {
            let response = server
                .get(path)
                .add_query_param("limit", limit)
                .add_header("Cookie", cookie(&token))
                .await;
            assert_eq!(
                response.status_code(),
                StatusCode::BAD_REQUEST,
                "{path}?limit={limit}"
            );
            assert_eq!(error_fields(&response), ["limit"], "{path}?limit={limit}");
        }
    }

    let within = server
        .get("/api/glucose")
        .add_query_param("limit", 500)
        .add_header("Cookie", cookie(&token))
        .await;
    assert_eq!(within.status_code(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn food_catalog_is_public_and_searchable() -> anyhow::Result<()> {
    let server = create_seeded_server().await?;

    let all = server.get("/api/foods").await;
    assert_eq!(all.status_code(), StatusCode::OK);
    assert_eq!(all.json::<Value>()["count"], 10);

    let everything = server.get("/api/foods").add_query_param("category", "todos").await;
    assert_eq!(everything.json::<Value>()["count"], 10);

    let cereals = server.get("/api/foods").add_query_param("category", "cereales").await;
    let body = cereals.json::<Value>();
    assert_eq!(body["count"], 4);
    assert_eq!(body["data"][0]["name"], "Arroz Integral");

    let quinoa = server.get("/api/foods").add_query_param("search", "QUINOA").await;
    let body = quinoa.json::<Value>();
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["glycemicIndex"], 53.0);
    assert_eq!(body["data"][0]["trafficLight"], "green");

    let id = body["data"][0]["id"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("no food id"))?
        .to_string();
    let one = server.get(&format!("/api/foods/{id}")).await;
    assert_eq!(one.status_code(), StatusCode::OK);
    assert_eq!(one.json::<Value>()["data"]["name"], "Quinua");

    let missing = server
        .get(&format!("/api/foods/{}", uuid::Uuid::new_v4()))
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn food_logs_copy_catalog_facts_and_summarize_the_day() -> anyhow::Result<()> {
    let server = create_seeded_server().await?;
    let (ana, _) = register(&server, "ana@example.com").await?;
    let (bob, _) = register(&server, "bob@example.com").await?;

    let bread = server.get("/api/foods").add_query_param("search", "pan blanco").await;
    let bread_id = bread.json::<Value>()["data"][0]["id"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("no food id"))?
        .to_string();

    let consumed_at = "2025-11-03T08:15:00Z";
    let from_catalog = server
        .post("/api/food-logs")
        .add_header("Cookie", cookie(&ana))
        .json(&json!({ "foodId": bread_id, "portion": "2 rebanadas", "consumedAt": consumed_at }))
        .await;
    assert_eq!(from_catalog.status_code(), StatusCode::CREATED);
    let log = from_catalog.json::<Value>();
    assert_eq!(log["data"]["food"]["name"], "Pan Blanco");
    assert_eq!(log["data"]["food"]["trafficLight"], "red");

    let own_facts = server
        .post("/api/food-logs")
        .add_header("Cookie", cookie(&ana))
        .json(&json!({
            "food": {
                "name": "Yogur natural", "category": "lácteos", "glycemicIndex": 35,
                "carbohydrates": 10, "fiber": 0, "sugars": 9,
                "portion": "1 vaso", "trafficLight": "green"
            },
            "portion": "1 vaso",
            "consumedAt": "2025-11-03T16:00:00Z"
        }))
        .await;
    assert_eq!(own_facts.status_code(), StatusCode::CREATED);

    let unknown = server
        .post("/api/food-logs")
        .add_header("Cookie", cookie(&ana))
        .json(&json!({ "foodId": uuid::Uuid::new_v4(), "portion": "1" }))
        .await;
    assert_eq!(unknown.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&unknown), ["foodId"]);

    let day = server
        .get("/api/food-logs")
        .add_query_param("date", "2025-11-03")
        .add_header("Cookie", cookie(&ana))
        .await;
    let body = day.json::<Value>();
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["food"]["name"], "Yogur natural");

    let summary = server
        .get("/api/food-logs/summary")
        .add_query_param("date", "2025-11-03")
        .add_header("Cookie", cookie(&ana))
        .await;
    assert_eq!(summary.status_code(), StatusCode::OK);
    let data = &summary.json::<Value>()["data"];
    assert_eq!(data["date"], "2025-11-03");
    assert_eq!(data["totalLogs"], 2);
    assert_eq!(data["carbohydrates"], 60.0);
    assert_eq!(data["averageGlycemicIndex"], 55.0);
    assert_eq!(data["trafficLights"]["red"], 1);

    let id = log["data"]["id"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("no log id"))?
        .to_string();
    let path = format!("/api/food-logs/{id}");
    let as_bob = server.get(&path).add_header("Cookie", cookie(&bob)).await;
    assert_eq!(as_bob.status_code(), StatusCode::NOT_FOUND);
    let deleted = server.delete(&path).add_header("Cookie", cookie(&ana)).await;
    assert_eq!(deleted.status_code(), StatusCode::OK);

    let anonymous = server.get("/api/food-logs").await;
    assert_eq!(anonymous.status_code(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn meal_plans_yield_shopping_lists() -> anyhow::Result<()> {
    let server = create_test_server()?;
    let (ana, _) = register(&server, "ana@example.com").await?;
    let (bob, _) = register(&server, "bob@example.com").await?;

    let apple = json!({
        "name": "Manzana", "category": "frutas", "glycemicIndex": 36,
        "carbohydrates": 14, "fiber": 2.4, "sugars": 10,
        "portion": "1 unidad mediana (180g)", "trafficLight": "green"
    });
    let plan = json!({
        "name": "Semana verde",
        "startDate": "2025-11-03",
        "endDate": "2025-11-09",
        "meals": [
            { "day": "2025-11-03", "meals": [
                { "type": "breakfast", "foods": [ { "food": apple, "portion": "1 unidad" } ] },
                { "type": "snack", "foods": [ { "food": apple, "portion": "1 unidad" } ] }
            ] },
            { "day": "2025-11-04", "meals": [
                { "type": "lunch", "foods": [ { "food": apple, "portion": "2 unidades" } ] }
            ] }
        ]
    });
    let created = server
        .post("/api/meal-plans")
        .add_header("Cookie", cookie(&ana))
        .json(&plan)
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    let body = created.json::<Value>();
    assert_eq!(body["data"]["isActive"], true);
    let id = body["data"]["id"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("no plan id"))?
        .to_string();

    let list = server
        .get(&format!("/api/meal-plans/{id}/shopping-list"))
        .add_header("Cookie", cookie(&ana))
        .await;
    assert_eq!(list.status_code(), StatusCode::OK);
    assert_eq!(
        list.json::<Value>()["data"],
        json!([
            { "name": "Manzana", "portion": "1 unidad", "quantity": 2 },
            { "name": "Manzana", "portion": "2 unidades", "quantity": 1 }
        ])
    );

    let inside = server
        .get("/api/meal-plans/shopping-list")
        .add_query_param("startDate", "2025-11-01")
        .add_query_param("endDate", "2025-11-30")
        .add_header("Cookie", cookie(&ana))
        .await;
    assert_eq!(inside.json::<Value>()["count"], 2);

    let outside = server
        .get("/api/meal-plans/shopping-list")
        .add_query_param("startDate", "2025-11-05")
        .add_query_param("endDate", "2025-11-30")
        .add_header("Cookie", cookie(&ana))
        .await;
    assert_eq!(outside.json::<Value>()["count"], 0);

    let running = server
        .get("/api/meal-plans")
        .add_query_param("date", "2025-11-05")
        .add_header("Cookie", cookie(&ana))
        .await;
    assert_eq!(running.json::<Value>()["count"], 1);

    let as_bob = server
        .get(&format!("/api/meal-plans/{id}/shopping-list"))
        .add_header("Cookie", cookie(&bob))
        .await;
    assert_eq!(as_bob.status_code(), StatusCode::NOT_FOUND);

    let mut stray = plan.clone();
    stray["meals"][0]["day"] = json!("2025-12-25");
    let rejected = server
        .put(&format!("/api/meal-plans/{id}"))
        .add_header("Cookie", cookie(&ana))
        .json(&stray)
        .await;
    assert_eq!(rejected.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&rejected), ["meals[0].day"]);

    let deleted = server
        .delete(&format!("/api/meal-plans/{id}"))
        .add_header("Cookie", cookie(&ana))
        .await;
    assert_eq!(deleted.status_code(), StatusCode::OK);
    Ok(())
}
