use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use reqwest::StatusCode;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::routes;
use service::{roster::RosterStore, seed};

struct TestApp {
    base_url: String,
}

/// Spin up a server on an ephemeral port with a freshly seeded store.
/// Every test gets its own process-local roster, so no cross-test cleanup.
async fn start_server() -> anyhow::Result<TestApp> {
    let store = RosterStore::new(seed::catalog());
    let app: Router = routes::build_router(Arc::clone(&store), CorsLayer::very_permissive());

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

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

fn unique_email() -> String {
    format!("student_{}@mergington.edu", Uuid::new_v4().simple())
}

#[tokio::test]
async fn health_is_ok() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn get_activities_returns_seeded_catalog() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/activities", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let data = res.json::<serde_json::Value>().await?;
    let map = data.as_object().expect("activities payload is a JSON object");
    assert!(map.contains_key("Chess Club"));

    let chess = &map["Chess Club"];
    assert!(chess["description"].is_string());
    assert!(chess["schedule"].is_string());
    assert!(chess["max_participants"].as_u64().unwrap() > 0);

    // no activity may list the same email twice
    for (name, details) in map {
        let participants: Vec<&str> = details["participants"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        let mut deduped = participants.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), participants.len(), "{name} lists a duplicate email");
    }
    Ok(())
}

#[tokio::test]
async fn signup_is_reflected_in_listing() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let email = unique_email();

    let res = c
        .post(format!("{}/activities/Chess%20Club/signup", app.base_url))
        .query(&[("email", email.as_str())])
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert!(body["message"].as_str().unwrap().contains("Signed up"));

    let res = c.get(format!("{}/activities", app.base_url)).send().await?;
    let data = res.json::<serde_json::Value>().await?;
    let roster: Vec<&str> = data["Chess Club"]["participants"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert!(roster.contains(&email.as_str()));
    Ok(())
}

#[tokio::test]
async fn double_signup_is_rejected_with_400() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let email = unique_email();
    let url = format!("{}/activities/Chess%20Club/signup", app.base_url);

    let res = c.post(&url).query(&[("email", email.as_str())]).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = c.post(&url).query(&[("email", email.as_str())]).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert!(body["detail"].as_str().unwrap().contains("already"));

    // the roster still lists the email exactly once
    let res = c.get(format!("{}/activities", app.base_url)).send().await?;
    let data = res.json::<serde_json::Value>().await?;
    let hits = data["Chess Club"]["participants"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|v| v.as_str() == Some(email.as_str()))
        .count();
    assert_eq!(hits, 1);
    Ok(())
}

#[tokio::test]
async fn unregister_round_trip() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let email = unique_email();

    let res = c
        .post(format!("{}/activities/Chess%20Club/signup", app.base_url))
        .query(&[("email", email.as_str())])
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let unregister_url = format!("{}/activities/Chess%20Club/participants", app.base_url);
    let res = c.delete(&unregister_url).query(&[("email", email.as_str())]).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert!(body["message"].as_str().unwrap().contains("Unregistered"));

    let res = c.get(format!("{}/activities", app.base_url)).send().await?;
    let data = res.json::<serde_json::Value>().await?;
    assert!(!data["Chess Club"]["participants"]
        .as_array()
        .unwrap()
        .iter()
        .any(|v| v.as_str() == Some(email.as_str())));

    // removing again is a 404, not a silent no-op
    let res = c.delete(&unregister_url).query(&[("email", email.as_str())]).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn unregister_unknown_participant_returns_404() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client()
        .delete(format!("{}/activities/Chess%20Club/participants", app.base_url))
        .query(&[("email", unique_email().as_str())])
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn unknown_activity_returns_404_for_both_operations() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let email = unique_email();

    let res = c
        .post(format!("{}/activities/Knitting%20Circle/signup", app.base_url))
        .query(&[("email", email.as_str())])
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = c
        .delete(format!("{}/activities/Knitting%20Circle/participants", app.base_url))
        .query(&[("email", email.as_str())])
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // the catalog is unchanged
    let res = c.get(format!("{}/activities", app.base_url)).send().await?;
    let data = res.json::<serde_json::Value>().await?;
    assert!(data.as_object().unwrap().get("Knitting Circle").is_none());
    Ok(())
}

#[tokio::test]
async fn signup_without_email_param_is_rejected() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client()
        .post(format!("{}/activities/Chess%20Club/signup", app.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn root_redirects_to_static_frontend() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::builder().redirect(reqwest::redirect::Policy::none()).build()?;
    let res = c.get(format!("{}/", app.base_url)).send().await?;
    assert!(res.status().is_redirection());
    assert_eq!(
        res.headers().get("location").and_then(|v| v.to_str().ok()),
        Some("/static/index.html")
    );
    Ok(())
}
