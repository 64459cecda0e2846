use reqwest::{header, Client, StatusCode};
use serde_json::json;
use tokio;
use uuid::Uuid;

async fn login_token(client: &Client, email: &str) -> String {
    let response = client
        .post("http://127.0.0.1:3000/api/login")
        .json(&json!({ "email": email, "password": "Secret15" }))
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
async fn test_admin_routes_reject_user_token() {
    let client = Client::new();
    let token = login_token(&client, "user@example.com").await;

    let response = client
        .get("http://127.0.0.1:3000/api/admin/message")
        .headers(bearer(&token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_product_crud() {
    let client = Client::new();
    let token = login_token(&client, "admin@cafe-raduga.ru").await;
    let title = format!("Тестовый салат {}", Uuid::new_v4());

    // Step 1: create
    let payload = json!({
        "title": title,
        "description": "Салат из свежих овощей",
        "price": 180.5,
        "category": "salad",
        "ingredients": "огурцы, помидоры, масло",
        "calories": 90
    });

    let response = client
        .post("http://127.0.0.1:3000/api/admin/product")
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
    let product_id = body["product_id"].as_i64().expect("Expected a product id");

    // Step 2: it shows up on the public menu
    let response = client
        .get(format!("http://127.0.0.1:3000/api/product/{}", product_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let product = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse response JSON");
    assert_eq!(product["price"].as_str(), Some("180.5"));
    assert_eq!(
        product["ingredients"]
            .as_array()
            .expect("Expected ingredients")
            .len(),
        3
    );

    // Step 3: hide it, the public menu loses it but the admin view keeps it
    let response = client
        .patch(format!(
            "http://127.0.0.1:3000/api/admin/product/{}",
            product_id
        ))
        .headers(bearer(&token))
        .json(&json!({ "is_available": false }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .get(format!("http://127.0.0.1:3000/api/product/{}", product_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .get(format!(
            "http://127.0.0.1:3000/api/admin/product/{}",
            product_id
        ))
        .headers(bearer(&token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    // Step 4: delete
    let response = client
        .delete(format!(
            "http://127.0.0.1:3000/api/admin/product/{}",
            product_id
        ))
        .headers(bearer(&token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_product_unknown_category() {
    let client = Client::new();
    let token = login_token(&client, "admin@cafe-raduga.ru").await;

    let payload = json!({
        "title": format!("Тест {}", Uuid::new_v4()),
        "description": "Описание",
        "price": 100.0,
        "category": "fastfood"
    });

    let response = client
        .post("http://127.0.0.1:3000/api/admin/product")
        .headers(bearer(&token))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_bookings() {
    let client = Client::new();
    let token = login_token(&client, "admin@cafe-raduga.ru").await;

    let response = client
        .get("http://127.0.0.1:3000/api/admin/booking")
        .headers(bearer(&token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse response JSON");
    assert!(body["bookings"].is_array());

    // Filters are validated
    let response = client
        .get("http://127.0.0.1:3000/api/admin/booking?status=approved")
        .headers(bearer(&token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_messages() {
    let client = Client::new();
    let token = login_token(&client, "admin@cafe-raduga.ru").await;

    let response = client
        .get("http://127.0.0.1:3000/api/admin/message")
        .headers(bearer(&token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse response JSON");
    assert!(body["messages"].is_array());
}
