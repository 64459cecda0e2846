use chrono::{Duration, Utc};
use reqwest::{header, Client, StatusCode};
use serde_json::json;
use tokio;

async fn login_token(client: &Client) -> String {
    let payload = json!({
        "email": "user@example.com",
        "password": "Secret15"
    });

    let response = client
        .post("http://127.0.0.1:3000/api/login")
        .json(&payload)
        .send()
        .await
        .expect("Failed to send login request");

    assert_eq!(response.status(), StatusCode::OK);

    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse login response JSON");
    body["token"]
        .as_str()
        .expect("Token not found in login response")
        .to_string()
}

fn bearer(token: &str) -> header::HeaderMap {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token))
            .expect("Failed to insert header"),
    );
    headers
}

#[tokio::test]
async fn test_check_rejects_past_date() {
    let client = Client::new();

    let response = client
        .post("http://127.0.0.1:3000/api/booking/check")
        .json(&json!({
            "eventDate": "2020-01-01",
            "eventTime": "12:00"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse response JSON");
    assert_eq!(body["available"].as_bool(), Some(false));
}

#[tokio::test]
async fn test_check_rejects_early_start() {
    let client = Client::new();
    let date = (Utc::now().date_naive() + Duration::days(30)).format("%Y-%m-%d");

    let response = client
        .post("http://127.0.0.1:3000/api/booking/check")
        .json(&json!({
            "eventDate": date.to_string(),
            "eventTime": "09:00"
        }))
        .send()
        .await
        .expect("Failed to send request");

    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse response JSON");
    assert_eq!(body["available"].as_bool(), Some(false));
    assert!(body["message"]
        .as_str()
        .expect("Expected a message")
        .contains("10:00"));
}

#[tokio::test]
async fn test_check_rejects_late_end() {
    let client = Client::new();
    let date = (Utc::now().date_naive() + Duration::days(30)).format("%Y-%m-%d");

    // 19:00 for 4 hours runs past closing
    let response = client
        .post("http://127.0.0.1:3000/api/booking/check")
        .json(&json!({
            "eventDate": date.to_string(),
            "eventTime": "19:00",
            "eventDuration": 4
        }))
        .send()
        .await
        .expect("Failed to send request");

    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse response JSON");
    assert_eq!(body["available"].as_bool(), Some(false));
}

// A slot that runs to midnight or beyond wraps around the clock, it must
// not slip past the closing check.
#[tokio::test]
async fn test_check_rejects_slot_past_midnight() {
    let client = Client::new();
    let date = (Utc::now().date_naive() + Duration::days(30)).format("%Y-%m-%d");

    for duration in [5, 8] {
        let response = client
            .post("http://127.0.0.1:3000/api/booking/check")
            .json(&json!({
                "eventDate": date.to_string(),
                "eventTime": "19:00",
                "eventDuration": duration
            }))
            .send()
            .await
            .expect("Failed to send request");

        let body = response
            .json::<serde_json::Value>()
            .await
            .expect("Failed to parse response JSON");
        assert_eq!(body["available"].as_bool(), Some(false));
    }
}

#[tokio::test]
async fn test_booking_requires_auth() {
    let client = Client::new();
    let date = (Utc::now().date_naive() + Duration::days(30)).format("%Y-%m-%d");

    let response = client
        .post("http://127.0.0.1:3000/api/booking")
        .json(&json!({
            "eventDate": date.to_string(),
            "eventTime": "12:00",
            "guestsCount": 10,
            "eventType": "birthday",
            "phone": "89991234567"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// Books a slot, sees it become unavailable, cancels it, sees it free up.
// Cancelling at the end keeps the test repeatable.
#[tokio::test]
async fn test_booking_lifecycle() {
    let client = Client::new();
    let token = login_token(&client).await;
    let date = (Utc::now().date_naive() + Duration::days(45)).format("%Y-%m-%d");

    let check = json!({
        "eventDate": date.to_string(),
        "eventTime": "10:00",
        "eventDuration": 1
    });

    // Step 1: the slot starts out free
    let body = client
        .post("http://127.0.0.1:3000/api/booking/check")
        .json(&check)
        .send()
        .await
        .expect("Failed to send request")
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse response JSON");
    assert_eq!(body["available"].as_bool(), Some(true));

    // Step 2: book it
    let payload = json!({
        "eventDate": date.to_string(),
        "eventTime": "10:00",
        "eventDuration": 1,
        "guestsCount": 10,
        "eventType": "birthday",
        "phone": "89991234567",
        "services": ["animator", "cake"]
    });

    let response = client
        .post("http://127.0.0.1:3000/api/booking")
        .headers(bearer(&token))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse response JSON");
    assert_eq!(body["success"].as_bool(), Some(true));
    let booking_id = body["booking_id"]
        .as_i64()
        .expect("Expected a booking id");

    // Step 3: the slot is now taken, for everyone
    let body = client
        .post("http://127.0.0.1:3000/api/booking/check")
        .json(&check)
        .send()
        .await
        .expect("Failed to send request")
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse response JSON");
    assert_eq!(body["available"].as_bool(), Some(false));

    // Step 4: a second booking for the same slot bounces
    let response = client
        .post("http://127.0.0.1:3000/api/booking")
        .headers(bearer(&token))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Step 5: cancel and the slot frees up
    let response = client
        .post(format!(
            "http://127.0.0.1:3000/api/booking/{}/cancel",
            booking_id
        ))
        .headers(bearer(&token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body = client
        .post("http://127.0.0.1:3000/api/booking/check")
        .json(&check)
        .send()
        .await
        .expect("Failed to send request")
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse response JSON");
    assert_eq!(body["available"].as_bool(), Some(true));
}

#[tokio::test]
async fn test_booking_too_many_guests() {
    let client = Client::new();
    let token = login_token(&client).await;
    let date = (Utc::now().date_naive() + Duration::days(30)).format("%Y-%m-%d");

    let response = client
        .post("http://127.0.0.1:3000/api/booking")
        .headers(bearer(&token))
        .json(&json!({
            "eventDate": date.to_string(),
            "eventTime": "12:00",
            "guestsCount": 100,
            "eventType": "birthday",
            "phone": "89991234567"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cancel_foreign_booking() {
    let client = Client::new();
    let token = login_token(&client).await;

    let response = client
        .post("http://127.0.0.1:3000/api/booking/999999/cancel")
        .headers(bearer(&token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
