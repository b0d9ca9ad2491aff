//! API integration tests against a running server
//!
//! Start the server on a seeded database, then run with
//! `cargo test --test integration -- --ignored`.

use chrono::{Duration, Utc};
use reqwest::{redirect::Policy, Client, StatusCode};
use serde_json::{json, Value};

use locallibrary::models::{UserClaims, CAN_MARK_RETURNED};

const BASE_URL: &str = "http://localhost:8080";

fn client() -> Client {
    Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("Failed to build client")
}

/// Mint a token with the server's secret (`JWT_SECRET` or the default)
fn token(user_id: i32, permissions: &[&str]) -> String {
    let secret = std::env::var("JWT_SECRET")
        .unwrap_or_else(|_| "change-this-secret-in-production".to_string());
    let now = Utc::now();
    UserClaims {
        sub: format!("user{}", user_id),
        user_id,
        permissions: permissions.iter().map(|p| p.to_string()).collect(),
        is_superuser: false,
        iat: now.timestamp(),
        exp: (now + Duration::hours(1)).timestamp(),
    }
    .create_token(&secret)
    .expect("Failed to create token")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let response = client()
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_index_counts() {
    let response = client()
        .get(format!("{}/catalog/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["template"], "index.html");
    assert!(body["context"]["num_books"].is_number());
    assert!(body["context"]["num_instances_available"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_list_books_and_authors() {
    let client = client();

    for (path, key) in [("/catalog/books/", "book_list"), ("/catalog/authors/", "author_list")] {
        let response = client
            .get(format!("{}{}", BASE_URL, path))
            .send()
            .await
            .expect("Failed to send request");

        assert!(response.status().is_success());

        let body: Value = response.json().await.expect("Failed to parse response");
        assert!(body["context"][key].is_array());
    }
}

#[tokio::test]
#[ignore]
async fn test_unknown_book_is_not_found() {
    let response = client()
        .get(format!("{}/catalog/book/999999", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_my_books_are_sorted_by_due_date() {
    let response = client()
        .get(format!("{}/catalog/mybooks/", BASE_URL))
        .bearer_auth(token(1, &[]))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let due_dates: Vec<&str> = body["context"]["bookinstance_list"]
        .as_array()
        .expect("No list in response")
        .iter()
        .filter_map(|i| i["due_back"].as_str())
        .collect();

    let mut sorted = due_dates.clone();
    sorted.sort();
    assert_eq!(due_dates, sorted);
}

#[tokio::test]
#[ignore]
async fn test_my_books_requires_login() {
    let response = client()
        .get(format!("{}/catalog/mybooks/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::FOUND);
}

#[tokio::test]
#[ignore]
async fn test_all_borrowed_without_permission_is_blank() {
    let response = client()
        .get(format!("{}/catalog/borrowed/", BASE_URL))
        .bearer_auth(token(1, &[]))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["context"], json!({}));
}

#[tokio::test]
#[ignore]
async fn test_renewal_round_trip() {
    let client = client();
    let token = token(1, &[CAN_MARK_RETURNED]);

    let response = client
        .get(format!("{}/catalog/borrowed/", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");

    let Some(id) = body["context"]["bookinstance_list"][0]["id"].as_str() else {
        // nothing on loan in this database
        return;
    };
    let url = format!("{}/catalog/book/{}/renew/", BASE_URL, id);

    let too_far = (Utc::now().date_naive() + Duration::days(60)).to_string();
    let response = client
        .post(&url)
        .bearer_auth(&token)
        .json(&json!({ "due_back": too_far }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body["context"]["form"]["errors"]["due_back"][0],
        "Invalid date - renewal more than 4 weeks ahead"
    );

    let next_week = (Utc::now().date_naive() + Duration::days(7)).to_string();
    let response = client
        .post(&url)
        .bearer_auth(&token)
        .json(&json!({ "due_back": next_week }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::FOUND);
}

#[tokio::test]
#[ignore]
async fn test_renew_without_permission_is_forbidden() {
    let response = client()
        .get(format!(
            "{}/catalog/book/00000000-0000-0000-0000-000000000000/renew/",
            BASE_URL
        ))
        .bearer_auth(token(1, &[]))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
