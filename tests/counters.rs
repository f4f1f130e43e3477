use axum_test::TestServer;
use counter_service::prelude::*;
use serde_json::{json, Value};

mod counter_app;
use counter_app::app;

fn server() -> anyhow::Result<TestServer> {
    app().as_test_server()
}

#[tokio::test]
async fn create_a_counter() -> anyhow::Result<()> {
    let server = server()?;
    let response = server.post("/counters/foo").await;
    response.assert_status(StatusCode::CREATED);
    response.assert_json(&json!({ "foo": 0 }));
    Ok(())
}

#[tokio::test]
async fn duplicate_a_counter() -> anyhow::Result<()> {
    let server = server()?;
    server
        .post("/counters/baz")
        .await
        .assert_status(StatusCode::CREATED);
    let response = server.post("/counters/baz").await;
    response.assert_status(StatusCode::CONFLICT);
    response.assert_json(&json!({ "Message": "Counter baz already exists" }));
    Ok(())
}

#[tokio::test]
async fn update_a_counter() -> anyhow::Result<()> {
    let server = server()?;
    let base = server.post("/counters/bar").await.json::<Value>()["bar"]
        .as_u64()
        .unwrap();
    for step in 1..=3 {
        let response = server.put("/counters/bar").await;
        response.assert_status_ok();
        response.assert_json(&json!({ "bar": base + step }));
    }
    Ok(())
}

#[tokio::test]
async fn update_a_non_existent_counter() -> anyhow::Result<()> {
    let server = server()?;
    let response = server.put("/counters/non_existent").await;
    response.assert_status_not_found();
    response.assert_json(&json!({ "Message": "Counter non_existent does not exist" }));
    Ok(())
}

#[tokio::test]
async fn read_a_counter() -> anyhow::Result<()> {
    let server = server()?;
    server.post("/counters/bax").await;
    let response = server.get("/counters/bax").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "bax": 0 }));

    server.put("/counters/bax").await;
    server.get("/counters/bax").await.assert_json(&json!({ "bax": 1 }));
    // reading does not change the value
    server.get("/counters/bax").await.assert_json(&json!({ "bax": 1 }));
    Ok(())
}

#[tokio::test]
async fn read_a_non_existent_counter() -> anyhow::Result<()> {
    let server = server()?;
    server
        .get("/counters/non_existent")
        .await
        .assert_status_not_found();
    Ok(())
}

#[tokio::test]
async fn delete_a_counter() -> anyhow::Result<()> {
    let server = server()?;
    server.post("/counters/deleted").await;
    let response = server.delete("/counters/deleted").await;
    response.assert_status(StatusCode::NO_CONTENT);
    assert!(response.as_bytes().is_empty());

    server
        .get("/counters/deleted")
        .await
        .assert_status_not_found();
    server
        .put("/counters/deleted")
        .await
        .assert_status_not_found();
    Ok(())
}

#[tokio::test]
async fn delete_twice() -> anyhow::Result<()> {
    let server = server()?;
    server.post("/counters/twice").await;
    server
        .delete("/counters/twice")
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .delete("/counters/twice")
        .await
        .assert_status_not_found();
    Ok(())
}

#[tokio::test]
async fn delete_a_non_existent_counter() -> anyhow::Result<()> {
    let server = server()?;
    server
        .delete("/counters/non_existent")
        .await
        .assert_status_not_found();
    Ok(())
}

#[tokio::test]
async fn full_lifecycle() -> anyhow::Result<()> {
    let server = server()?;
    let created = server.post("/counters/foo").await;
    created.assert_status(StatusCode::CREATED);
    created.assert_json(&json!({ "foo": 0 }));

    let updated = server.put("/counters/foo").await;
    updated.assert_status_ok();
    updated.assert_json(&json!({ "foo": 1 }));

    let read = server.get("/counters/foo").await;
    read.assert_status_ok();
    read.assert_json(&json!({ "foo": 1 }));

    server
        .delete("/counters/foo")
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server.get("/counters/foo").await.assert_status_not_found();
    Ok(())
}

#[tokio::test]
async fn counters_are_independent() -> anyhow::Result<()> {
    let server = server()?;
    server.post("/counters/a").await;
    server.post("/counters/b").await;
    server.put("/counters/a").await;
    server.put("/counters/a").await;
    server.get("/counters/a").await.assert_json(&json!({ "a": 2 }));
    server.get("/counters/b").await.assert_json(&json!({ "b": 0 }));
    Ok(())
}

#[tokio::test]
async fn unsupported_method() -> anyhow::Result<()> {
    let server = server()?;
    server
        .patch("/counters/foo")
        .await
        .assert_status(StatusCode::METHOD_NOT_ALLOWED);
    Ok(())
}

#[tokio::test]
async fn missing_name_is_not_found() -> anyhow::Result<()> {
    let server = server()?;
    let response = server.post("/counters/").await;
    response.assert_status_not_found();
    response.assert_json(&json!({ "Message": "Not Found" }));
    Ok(())
}

#[tokio::test]
async fn undecodable_name_is_a_json_error() -> anyhow::Result<()> {
    let server = server()?;
    let response = server.get("/counters/%FF").await;
    response.assert_status_bad_request();
    let body = response.json::<Value>();
    assert!(body["Message"].is_string());
    Ok(())
}
