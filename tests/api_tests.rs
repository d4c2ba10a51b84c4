// tests/api_tests.rs

use phishguard_backend::{config::Config, routes, state::AppState};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL and the pool backing the in-memory database.
async fn spawn_app() -> (String, SqlitePool) {
    // 1. Create an in-memory database. A single pinned connection keeps
    // the database alive for the whole test.
    let pool = SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(1)
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

    let state = AppState::new(pool.clone(), config);

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

fn unique_name() -> String {
    format!("u_{}", &uuid::Uuid::new_v4().to_string()[..8])
}

async fn register(client: &reqwest::Client, address: &str, username: &str) -> reqwest::Response {
    client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "password123"
        }))
        .send()
        .await
        .expect("Failed to execute request")
}

async fn login(client: &reqwest::Client, address: &str, identifier: &str) -> String {
    let body: serde_json::Value = client
        .post(format!("{}/api/auth/login", address))
        .json(&serde_json::json!({
            "identifier": identifier,
            "password": "password123"
        }))
        .send()
        .await
        .expect("Login failed")
        .json()
        .await
        .expect("Failed to parse login json");

    body["token"].as_str().expect("Token not found").to_string()
}

#[tokio::test]
async fn health_check_404() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn register_works() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();

    let response = register(&client, &address, &unique_name()).await;
    assert_eq!(response.status().as_u16(), 201);

    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["id"].as_i64().is_some());
    // The hash must never leave the server.
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn register_fails_validation() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();

    // Username too short
    let response = client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "username": "yo",
            "email": "yo@example.com",
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
    let name = unique_name();

    assert_eq!(register(&client, &address, &name).await.status().as_u16(), 201);
    assert_eq!(register(&client, &address, &name).await.status().as_u16(), 409);
}

#[tokio::test]
async fn login_accepts_username_or_email() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let name = unique_name();
    register(&client, &address, &name).await;

    let by_username = login(&client, &address, &name).await;
    assert!(!by_username.is_empty());

    let by_email = login(&client, &address, &format!("{}@example.com", name)).await;
    assert!(!by_email.is_empty());
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let name = unique_name();
    register(&client, &address, &name).await;

    let response = client
        .post(format!("{}/api/auth/login", address))
        .json(&serde_json::json!({
            "identifier": name,
            "password": "not-the-password"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn quiz_routes_require_auth() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/quiz/start", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn dashboard_starts_empty() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let name = unique_name();
    register(&client, &address, &name).await;
    let token = login(&client, &address, &name).await;

    let body: serde_json::Value = client
        .get(format!("{}/api/progress/dashboard", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .unwrap();

    assert_eq!(body["quiz"]["attempts"], 0);
    assert_eq!(body["quiz"]["average_score_pct"], 0.0);
    assert_eq!(body["simulation"]["attempts"], 0);
    assert_eq!(
        body["quiz"]["by_type"].as_array().unwrap().len(),
        4,
        "one row per quiz question type"
    );
}

#[tokio::test]
async fn admin_routes_reject_regular_users() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let name = unique_name();
    register(&client, &address, &name).await;
    let token = login(&client, &address, &name).await;

    let response = client
        .post(format!("{}/api/admin/questions", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({
            "question_type": "mcq",
            "prompt": "Is this allowed?",
            "correct_answer": "No"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn admin_can_create_and_delete_questions() {
    let (address, pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let name = unique_name();
    register(&client, &address, &name).await;

    // Promote the user directly; there is no HTTP route for role changes.
    sqlx::query("UPDATE users SET role = 'admin' WHERE username = ?")
        .bind(&name)
        .execute(&pool)
        .await
        .unwrap();
    let token = login(&client, &address, &name).await;

    let response = client
        .post(format!("{}/api/admin/questions", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({
            "question_type": "mcq",
            "prompt": "Which of these is a phishing sign?",
            "correct_answer": "Mismatched sender domain",
            "incorrect_answers": "A greeting,A signature",
            "explanation": "Check the sender domain.",
            "category": "Phishing"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 201);

    let body: serde_json::Value = response.json().await.unwrap();
    let id = body["id"].as_i64().unwrap();

    let response = client
        .delete(format!("{}/api/admin/questions/{}", address, id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 204);
}

#[tokio::test]
async fn admin_rejects_malformed_question_payloads() {
    let (address, pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let name = unique_name();
    register(&client, &address, &name).await;
    sqlx::query("UPDATE users SET role = 'admin' WHERE username = ?")
        .bind(&name)
        .execute(&pool)
        .await
        .unwrap();
    let token = login(&client, &address, &name).await;

    // A drag_drop answer must be one of the two bin labels.
    let response = client
        .post(format!("{}/api/admin/questions", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({
            "question_type": "drag_drop",
            "prompt": "Classify this message.",
            "correct_answer": "Suspicious"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
}
