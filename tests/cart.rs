use reqwest::{header, Client, StatusCode};
use serde_json::json;
use tokio;
use uuid::Uuid;

fn session_headers() -> header::HeaderMap {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        "x-session-key",
        header::HeaderValue::from_str(&Uuid::new_v4().to_string())
            .expect("Failed to insert header"),
    );
    headers
}

async fn any_product_id(client: &Client) -> i64 {
    let body = client
        .get("http://127.0.0.1:3000/api/product")
        .send()
        .await
        .expect("Failed to send request")
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse response JSON");
    body[0]["id"].as_i64().expect("Expected a product id")
}

#[tokio::test]
async fn test_new_session_gets_empty_cart() {
    let client = Client::new();

    let response = client
        .get("http://127.0.0.1:3000/api/cart")
        .headers(session_headers())
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    // The server echoes the session key back for the client to persist
    assert!(response.headers().contains_key("x-session-key"));

    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse response JSON");
    assert_eq!(body["cart_count"].as_u64(), Some(0));
    assert_eq!(body["total_price"].as_str(), Some("0"));
}

#[tokio::test]
async fn test_cart_flow() {
    let client = Client::new();
    let headers = session_headers();
    let product_id = any_product_id(&client).await;

    // Step 1: add twice, the entry accumulates
    let response = client
        .post("http://127.0.0.1:3000/api/cart")
        .headers(headers.clone())
        .json(&json!({ "product_id": product_id, "quantity": 2 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = client
        .post("http://127.0.0.1:3000/api/cart")
        .headers(headers.clone())
        .json(&json!({ "product_id": product_id, "quantity": 1 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body = client
        .get("http://127.0.0.1:3000/api/cart")
        .headers(headers.clone())
        .send()
        .await
        .expect("Failed to send request")
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse response JSON");
    assert_eq!(body["cart_count"].as_u64(), Some(3));

    // Step 2: set an exact quantity
    let response = client
        .patch(format!("http://127.0.0.1:3000/api/cart/{}", product_id))
        .headers(headers.clone())
        .json(&json!({ "quantity": 5 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body = client
        .get("http://127.0.0.1:3000/api/cart")
        .headers(headers.clone())
        .send()
        .await
        .expect("Failed to send request")
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse response JSON");
    assert_eq!(body["cart_count"].as_u64(), Some(5));

    // Step 3: remove the line
    let response = client
        .delete(format!("http://127.0.0.1:3000/api/cart/{}", product_id))
        .headers(headers.clone())
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body = client
        .get("http://127.0.0.1:3000/api/cart")
        .headers(headers)
        .send()
        .await
        .expect("Failed to send request")
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse response JSON");
    assert_eq!(body["cart_count"].as_u64(), Some(0));
}

#[tokio::test]
async fn test_patch_to_zero_removes_entry() {
    let client = Client::new();
    let headers = session_headers();
    let product_id = any_product_id(&client).await;

    client
        .post("http://127.0.0.1:3000/api/cart")
        .headers(headers.clone())
        .json(&json!({ "product_id": product_id, "quantity": 1 }))
        .send()
        .await
        .expect("Failed to send request");

    let response = client
        .patch(format!("http://127.0.0.1:3000/api/cart/{}", product_id))
        .headers(headers.clone())
        .json(&json!({ "quantity": 0 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body = client
        .get("http://127.0.0.1:3000/api/cart")
        .headers(headers)
        .send()
        .await
        .expect("Failed to send request")
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse response JSON");
    assert_eq!(body["cart_count"].as_u64(), Some(0));
}

#[tokio::test]
async fn test_add_unknown_product() {
    let client = Client::new();

    let response = client
        .post("http://127.0.0.1:3000/api/cart")
        .headers(session_headers())
        .json(&json!({ "product_id": 999999, "quantity": 1 }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delivery_selection() {
    let client = Client::new();
    let headers = session_headers();

    // Moscow costs 300 base plus 15 per km
    let response = client
        .post("http://127.0.0.1:3000/api/cart/delivery")
        .headers(headers.clone())
        .json(&json!({ "city": "moscow", "distance": 10 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse response JSON");
    assert_eq!(body["delivery_price"].as_str(), Some("450"));

    // The selection is remembered for the session
    let body = client
        .get("http://127.0.0.1:3000/api/cart")
        .headers(headers)
        .send()
        .await
        .expect("Failed to send request")
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse response JSON");
    assert_eq!(body["delivery_city"].as_str(), Some("moscow"));
    assert_eq!(body["delivery_distance"].as_i64(), Some(10));
    assert_eq!(body["delivery_price"].as_str(), Some("450"));
}

#[tokio::test]
async fn test_unknown_city_is_priced_as_other() {
    let client = Client::new();

    let response = client
        .post("http://127.0.0.1:3000/api/cart/delivery")
        .headers(session_headers())
        .json(&json!({ "city": "Венёв", "distance": 5 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse response JSON");
    // 200 base plus 20 per km
    assert_eq!(body["delivery_price"].as_str(), Some("300"));
}
