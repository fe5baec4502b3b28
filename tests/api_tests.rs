use practice_portal::{AppConfig, AppState, create_router};
use reqwest::{StatusCode, header, redirect};
use tokio::net::TcpListener;

#[derive(Debug)]
pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

async fn spawn_app() -> TestApp {
    let router = create_router(AppState::new(AppConfig::default()));

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    // Redirects are the thing under test, so never follow them.
    let client = reqwest::Client::builder()
        .redirect(redirect::Policy::none())
        .build()
        .expect("Failed to build client");

    TestApp { address, client }
}

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app().await;
    let response = app
        .client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.status().is_success());
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_anonymous_visit_to_current_session_redirects_to_login() {
    let app = spawn_app().await;
    let response = app
        .client
        .get(format!("{}/current-session", app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/login"
    );
}

#[tokio::test]
async fn test_signed_in_admin_session_flow() {
    let app = spawn_app().await;
    let admin_cookie = r#"token=abc; user={"role_id":4}"#;

    for path in ["/dashboard", "/services", "/invoice", "/about"] {
        let response = app
            .client
            .get(format!("{}{}", app.address, path))
            .header(header::COOKIE, admin_cookie)
            .send()
            .await
            .expect("Failed to execute request.");
        assert_eq!(response.status(), StatusCode::OK, "{path}");
    }

    let response = app
        .client
        .get(format!("{}/login", app.address))
        .header(header::COOKIE, admin_cookie)
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/dashboard"
    );
}

#[tokio::test]
async fn test_concurrent_requests_get_independent_decisions() {
    let app = spawn_app().await;

    let mut tasks = Vec::new();
    for i in 0..32 {
        let client = app.client.clone();
        let url = format!("{}/invoice", app.address);
        tasks.push(tokio::spawn(async move {
            let role = if i % 2 == 0 { 4 } else { 2 };
            let response = client
                .get(url)
                .header(header::COOKIE, format!(r#"token=t{i}; user={{"role_id":{role}}}"#))
                .send()
                .await
                .unwrap();
            (role, response.status())
        }));
    }

    for task in tasks {
        let (role, status) = task.await.unwrap();
        if role == 4 {
            assert_eq!(status, StatusCode::OK);
        } else {
            assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
        }
    }
}
