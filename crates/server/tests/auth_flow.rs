use std::net::SocketAddr;

use axum::Router;
use migration::MigratorTrait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::routes::{self, auth};

struct TestApp {
    base_url: String,
}

async fn start_server() -> anyhow::Result<TestApp> {
    std::env::set_var("CONFIG_PATH", "/nonexistent-config-for-tests.toml");
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL missing; skip auth flow tests.");
        return Err(anyhow::anyhow!("missing DATABASE_URL"));
    }

    let db = models::db::connect().await?;
    migration::Migrator::up(&db, None).await?;

    let state = auth::ServerState {
        db,
        auth: auth::ServerAuthConfig { jwt_secret: "test-secret".into() },
    };
    let app: Router = routes::build_router(state, CorsLayer::very_permissive());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });
    Ok(TestApp { base_url })
}

#[tokio::test]
async fn register_login_me_flow() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };
    let client = reqwest::Client::new();
    let email = format!("flow_{}@example.com", Uuid::new_v4());

    // Weak passwords and bad emails are rejected with a field list.
    let res = client
        .post(format!("{}/api/auth/register", app.base_url))
        .json(&json!({ "name": "Ana", "email": "not-an-email", "password": "short" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"password"));

    let res = client
        .post(format!("{}/api/auth/register", app.base_url))
        .json(&json!({ "name": "Ana", "email": email, "password": "password123" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    // Re-registering the same email is a conflict.
    let res = client
        .post(format!("{}/api/auth/register", app.base_url))
        .json(&json!({ "name": "Ana Again", "email": email, "password": "password123" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // Wrong password and unknown email both come back as plain 401s.
    let res = client
        .post(format!("{}/api/auth/login", app.base_url))
        .json(&json!({ "email": email, "password": "wrong-password" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let res = client
        .post(format!("{}/api/auth/login", app.base_url))
        .json(&json!({ "email": format!("nobody_{}@example.com", Uuid::new_v4()), "password": "password123" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .post(format!("{}/api/auth/login", app.base_url))
        .json(&json!({ "email": email, "password": "password123" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let login: Value = res.json().await?;
    let token = login["token"].as_str().unwrap().to_string();
    assert_eq!(login["email"], email.as_str());

    // Password hashes never leak through the API.
    assert!(login.get("passwordHash").is_none());

    let res = client
        .get(format!("{}/api/auth/me", app.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let me: Value = res.json().await?;
    assert_eq!(me["name"], "Ana");
    Ok(())
}

#[tokio::test]
async fn cookie_fallback_authenticates_browser_clients() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };
    // Cookie store on: login sets auth_token, later requests ride on it.
    let client = reqwest::Client::builder().cookie_store(true).build()?;
    let email = format!("cookie_{}@example.com", Uuid::new_v4());

    let res = client
        .post(format!("{}/api/auth/register", app.base_url))
        .json(&json!({ "name": "Cookie User", "email": email, "password": "password123" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let res = client
        .post(format!("{}/api/auth/login", app.base_url))
        .json(&json!({ "email": email, "password": "password123" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    // No Authorization header here; the cookie carries the session.
    let res = client.get(format!("{}/api/auth/me", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let me: Value = res.json().await?;
    assert_eq!(me["name"], "Cookie User");

    // Logout clears the cookie; the next call is anonymous again.
    let res = client.post(format!("{}/api/auth/logout", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let res = client.get(format!("{}/api/auth/me", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
