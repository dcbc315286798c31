// tests/api_tests.rs

use smartquiz::{config::Config, routes, state::AppState};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

/// Helper function to spawn the app on a random port for testing.
/// Runs against a fresh in-memory SQLite database, so every test is
/// hermetic. Returns the base URL and the pool for direct seeding.
async fn spawn_app() -> (String, SqlitePool) {
    // 1. Create a single-connection in-memory pool. The connection must
    //    never be recycled or the database goes with it.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite database");

    // 2. Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    // 3. Create test configuration and state
    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600, // 10 minutes for tests
        rust_log: "error".to_string(),
        admin_username: None,
        admin_password: None,
    };

    let state = AppState {
        pool: pool.clone(),
        config,
    };

    // 4. Create the router with the app state
    let app = routes::create_router(state);

    // 5. Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    // 6. Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (address, pool)
}

fn unique_username() -> String {
    format!("u_{}", &uuid::Uuid::new_v4().to_string()[..8])
}

/// Registers a fresh user and returns (username, token).
async fn register_and_login(client: &reqwest::Client, address: &str) -> (String, String) {
    let username = unique_username();
    let password = "password123";

    let resp = client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({ "username": username, "password": password }))
        .send()
        .await
        .expect("Register failed");
    assert_eq!(resp.status().as_u16(), 201);

    let login: serde_json::Value = client
        .post(format!("{}/api/auth/login", address))
        .json(&serde_json::json!({ "username": username, "password": password }))
        .send()
        .await
        .expect("Login failed")
        .json()
        .await
        .expect("Failed to parse login json");

    assert_eq!(login["success"], true);
    let token = login["token"].as_str().expect("Token not found").to_string();

    (username, token)
}

fn answered(topic: &str, is_correct: bool) -> serde_json::Value {
    serde_json::json!({
        "question": format!("Question about {}", topic),
        "userAnswer": if is_correct { "A" } else { "B" },
        "correctAnswer": "A",
        "isCorrect": is_correct,
        "topic": topic,
    })
}

async fn submit_result(
    client: &reqwest::Client,
    address: &str,
    token: &str,
    score: i64,
    total: i64,
    answers: Vec<serde_json::Value>,
) -> reqwest::Response {
    client
        .post(format!("{}/api/quiz-results", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({
            "category": "Math",
            "difficulty": "beginner",
            "score": score,
            "totalQuestions": total,
            "timeSpent": 300,
            "questionsAnswered": answers,
        }))
        .send()
        .await
        .expect("Submit failed")
}

#[tokio::test]
async fn health_check_404() {
    // Arrange
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn register_works() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "username": unique_username(),
            "password": "password123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    // The password hash must never leak.
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
async fn register_fails_validation() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();

    // Act: Send a username that is too short
    let response = client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "username": "yo",
            "password": "password123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn duplicate_username_conflicts() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let username = unique_username();

    for expected_status in [201, 409] {
        let response = client
            .post(format!("{}/api/auth/register", address))
            .json(&serde_json::json!({ "username": username, "password": "password123" }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), expected_status);
    }
}

#[tokio::test]
async fn protected_routes_require_token() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/quiz-results", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn submit_quiz_result_returns_personalized_recommendations() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let (username, token) = register_and_login(&client, &address).await;

    // 3/10 with Algebra failed twice: weak learner, Algebra ranked first.
    let answers = vec![
        answered("Algebra", false),
        answered("Algebra", false),
        answered("Geometry", false),
        answered("Fractions", true),
        answered("Fractions", true),
        answered("Fractions", true),
    ];
    let response = submit_result(&client, &address, &token, 3, 10, answers).await;
    assert_eq!(response.status().as_u16(), 201);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["personalized"], true);

    let recs = &body["recommendations"];
    assert_eq!(recs["percentageScore"], 30.0);
    assert_eq!(recs["performanceLevel"], "needs_improvement");
    assert_eq!(recs["learnerType"], "slow");
    assert_eq!(recs["weakAreas"][0], "Algebra");
    assert_eq!(recs["strongAreas"][0], "Fractions");

    // 30% average: supplementary weak-area weeks must be present.
    let plan = recs["studyPlan"].as_array().unwrap();
    assert!(plan.iter().any(|w| w["kind"] == "supplementary"));
    assert_eq!(plan[0]["kind"], "regular");
    assert_eq!(plan[0]["week"], 1);

    // Ranked resources come back sorted by relevance, best first.
    let resources = recs["recommendedResources"].as_array().unwrap();
    assert!(!resources.is_empty());
    let scores: Vec<i64> = resources
        .iter()
        .map(|r| r["relevanceScore"].as_i64().unwrap())
        .collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));

    // History reflects the submission.
    let history: serde_json::Value = client
        .get(format!("{}/api/quiz-results", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history["results"].as_array().unwrap().len(), 1);
    let result_id = history["results"][0]["id"].as_i64().unwrap();

    // Single-result lookup works for the owner.
    let one = client
        .get(format!("{}/api/quiz-results/{}", address, result_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(one.status().as_u16(), 200);

    // And the leaderboard picks the score up.
    let leaderboard: serde_json::Value = client
        .get(format!("{}/api/leaderboard", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let entries = leaderboard["leaderboard"].as_array().unwrap();
    assert!(entries.iter().any(|e| e["username"] == username.as_str()));
}

#[tokio::test]
async fn submit_quiz_result_rejects_invalid_score() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let (_, token) = register_and_login(&client, &address).await;

    let response = submit_result(&client, &address, &token, 11, 10, vec![]).await;
    assert_eq!(response.status().as_u16(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["error"],
        "Invalid score or totalQuestions: score must be between 0 and totalQuestions"
    );
}

#[tokio::test]
async fn quiz_result_of_another_user_is_not_found() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();

    let (_, owner_token) = register_and_login(&client, &address).await;
    let response = submit_result(&client, &address, &owner_token, 8, 10, vec![]).await;
    let body: serde_json::Value = response.json().await.unwrap();
    let result_id = body["result"]["id"].as_i64().unwrap();

    let (_, other_token) = register_and_login(&client, &address).await;
    let response = client
        .get(format!("{}/api/quiz-results/{}", address, result_id))
        .header("Authorization", format!("Bearer {}", other_token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn study_plan_flow() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let (_, token) = register_and_login(&client, &address).await;

    // Without history there is nothing to build a plan from.
    let response = client
        .post(format!("{}/api/study-plans", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    submit_result(
        &client,
        &address,
        &token,
        5,
        10,
        vec![answered("Algebra", false)],
    )
    .await;

    let response = client
        .post(format!("{}/api/study-plans", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);

    let body: serde_json::Value = response.json().await.unwrap();
    let plan = &body["studyPlan"];
    assert_eq!(plan["category"], "Math");
    assert_eq!(plan["learnerType"], "slow");
    let weeks = plan["weeks"].as_array().unwrap();
    assert!(weeks.len() >= 4);
    // 50% average with a weak area: drill weeks appended.
    assert!(weeks.iter().any(|w| w["kind"] == "supplementary"));

    let list: serde_json::Value = client
        .get(format!("{}/api/study-plans", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list["studyPlans"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn preferences_round_trip() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let (_, token) = register_and_login(&client, &address).await;

    // Defaults are served before anything is saved.
    let body: serde_json::Value = client
        .get(format!("{}/api/user-preferences", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["preferences"]["preferredDifficulty"], "beginner");
    assert_eq!(body["preferences"]["dailyGoalMinutes"], 30);

    let response = client
        .post(format!("{}/api/user-preferences", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({
            "preferredDifficulty": "advanced",
            "preferredCategories": ["Math", "Science"],
            "dailyGoalMinutes": 90,
            "emailReminders": true,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = client
        .get(format!("{}/api/user-preferences", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["preferences"]["preferredDifficulty"], "advanced");
    assert_eq!(body["preferences"]["preferredCategories"][1], "Science");
    assert_eq!(body["preferences"]["emailReminders"], true);

    // Unknown difficulty is rejected.
    let response = client
        .post(format!("{}/api/user-preferences", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({
            "preferredDifficulty": "impossible",
            "dailyGoalMinutes": 90,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn ml_train_and_predict_flow() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let (_, token) = register_and_login(&client, &address).await;

    // Untrained model: metrics and predictions are 404.
    let response = client
        .get(format!("{}/api/ml/metrics", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    submit_result(&client, &address, &token, 8, 10, vec![]).await;
    submit_result(&client, &address, &token, 6, 10, vec![]).await;

    let response = client
        .post(format!("{}/api/ml/train", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["metrics"]["version"], 1);
    assert_eq!(body["metrics"]["sampleCount"], 2);

    let response = client
        .post(format!("{}/api/ml/predictions", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({ "category": "Math" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    let prediction = &body["prediction"];
    assert_eq!(prediction["category"], "Math");
    assert_eq!(prediction["modelVersion"], 1);
    let predicted = prediction["predictedPercentage"].as_f64().unwrap();
    assert!((0.0..=100.0).contains(&predicted));

    // Retraining appends the next version instead of mutating in place.
    let response = client
        .post(format!("{}/api/ml/train", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["metrics"]["version"], 2);
}

#[tokio::test]
async fn resource_catalog_filters() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();

    let body: serde_json::Value = client
        .get(format!("{}/api/resources?category=Math&type=practice", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let resources = body["resources"].as_array().unwrap();
    assert!(!resources.is_empty());
    assert!(resources
        .iter()
        .all(|r| r["category"] == "Math" && r["type"] == "practice"));
}

#[tokio::test]
async fn admin_routes_are_role_gated() {
    let (address, pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let (username, token) = register_and_login(&client, &address).await;

    // A regular user is rejected with 403.
    let response = client
        .get(format!("{}/api/admin/users", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);

    // Promote the user and log in again to pick up the admin role.
    sqlx::query("UPDATE users SET role = 'admin' WHERE username = ?")
        .bind(&username)
        .execute(&pool)
        .await
        .unwrap();

    let login: serde_json::Value = client
        .post(format!("{}/api/auth/login", address))
        .json(&serde_json::json!({ "username": username, "password": "password123" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let admin_token = login["token"].as_str().unwrap();

    let response = client
        .get(format!("{}/api/admin/users", address))
        .header("Authorization", format!("Bearer {}", admin_token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    // Admins can curate the resource catalog.
    let response = client
        .post(format!("{}/api/admin/resources", address))
        .header("Authorization", format!("Bearer {}", admin_token))
        .json(&serde_json::json!({
            "title": "Probability starter pack",
            "type": "practice",
            "difficulty": "beginner",
            "category": "Math",
            "topic": "Probability",
            "tags": ["new"],
            "rating": 4.0,
            "url": "https://learn.example.com/math/probability",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    let resource_id = body["resource"]["id"].as_i64().unwrap();

    let response = client
        .delete(format!("{}/api/admin/resources/{}", address, resource_id))
        .header("Authorization", format!("Bearer {}", admin_token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
}
