use std::sync::Arc;

use anyhow::Result;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, Response, StatusCode, header},
};
use http_body_util::BodyExt;
use products_hr::EmployeeService;
use serde_json::{Value, json};
use server::{
    config::AppConfig,
    http::{AppState, DELETED_MESSAGE, build_router},
};
use suite_tests::sqlite_repository;
use tower::ServiceExt;

async fn app() -> Result<Router> {
    let (pool, repo) = sqlite_repository().await?;
    let state = AppState::new(EmployeeService::new(repo), Arc::new(AppConfig::default()))
        .with_pool(pool);
    Ok(build_router(state))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Result<Response<Body>> {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    Ok(app.clone().oneshot(builder.body(body)?).await?)
}

async fn json_body(response: Response<Body>) -> Result<Value> {
    let bytes = response.into_body().collect().await?.to_bytes();
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn employee_lifecycle_over_http() -> Result<()> {
    let app = app().await?;

    let created = send(
        &app,
        Method::POST,
        "/api/employees",
        Some(json!({"firstName": "Todimu", "lastName": "Isewon", "email": "todi@gmail.com"})),
    )
    .await?;
    assert_eq!(created.status(), StatusCode::CREATED);
    let created = json_body(created).await?;
    let id = created["id"].as_i64().unwrap_or_default();
    assert!(id > 0);
    assert_eq!(created["firstName"], "Todimu");
    assert_eq!(created["lastName"], "Isewon");
    assert_eq!(created["email"], "todi@gmail.com");

    let uri = format!("/api/employees/{id}");
    let fetched = send(&app, Method::GET, &uri, None).await?;
    assert_eq!(fetched.status(), StatusCode::OK);
    assert_eq!(json_body(fetched).await?, created);

    let updated = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({"firstName": "Lani", "email": "todimu@gmail.com"})),
    )
    .await?;
    assert_eq!(updated.status(), StatusCode::OK);
    assert_eq!(
        json_body(updated).await?,
        json!({"id": id, "firstName": "Lani", "lastName": "Isewon", "email": "todimu@gmail.com"})
    );

    let deleted = send(&app, Method::DELETE, &uri, None).await?;
    assert_eq!(deleted.status(), StatusCode::OK);
    let text = deleted.into_body().collect().await?.to_bytes();
    assert_eq!(text, DELETED_MESSAGE.as_bytes());

    let gone = send(&app, Method::GET, &uri, None).await?;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn list_reflects_created_employees() -> Result<()> {
    let app = app().await?;
    let empty = json_body(send(&app, Method::GET, "/api/employees", None).await?).await?;
    assert_eq!(empty, json!([]));

    for (first, email) in [("Todimu", "todi@gmail.com"), ("Lani", "lani@gmail.com")] {
        let response = send(
            &app,
            Method::POST,
            "/api/employees",
            Some(json!({"firstName": first, "lastName": "Isewon", "email": email})),
        )
        .await?;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let listed = json_body(send(&app, Method::GET, "/api/employees", None).await?).await?;
    assert_eq!(listed.as_array().map(Vec::len), Some(2));
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() -> Result<()> {
    let app = app().await?;
    let body = json!({"firstName": "Todimu", "lastName": "Isewon", "email": "toddy@gmail.com"});
    let first = send(&app, Method::POST, "/api/employees", Some(body.clone())).await?;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = send(&app, Method::POST, "/api/employees", Some(body)).await?;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(second).await?["code"], "DUPLICATE_RESOURCE");
    Ok(())
}

#[tokio::test]
async fn update_of_unknown_id_is_not_found() -> Result<()> {
    let app = app().await?;
    let response = send(
        &app,
        Method::PUT,
        "/api/employees/1",
        Some(json!({"firstName": "Lani", "lastName": "Isewon", "email": "todimu@gmail.com"})),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn health_sees_the_database() -> Result<()> {
    let app = app().await?;
    let health = json_body(send(&app, Method::GET, "/health", None).await?).await?;
    assert_eq!(health["ok"], true);
    assert_eq!(health["dbOk"], true);
    Ok(())
}
