use crate::helpers::{order_details, spawn_app, spawn_app_with_failing_sender};

#[tokio::test]
async fn test_order_confirmation_returns_200_and_sends_one_email_for_valid_data() {
    let app = spawn_app().await;
    let body = serde_json::json!({
        "orderDetails": order_details(),
        "userEmail": "asha@example.com"
    });

    let response = app.post_order_confirmation(&body).await;

    assert_eq!(200, response.status().as_u16());
    let response_body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        response_body,
        serde_json::json!({"message": "Order confirmation email sent successfully"})
    );

    let sent = app.mail_sender.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, "asha@example.com");
    assert_eq!(sent[0].subject, "Order Confirmation - Tulsi Fashion Store");
    assert!(sent[0].body.contains("999.00"));
    assert!(sent[0].body.contains("Dear Asha Rao,"));
}

#[tokio::test]
async fn test_order_confirmation_returns_400_when_fields_are_missing() {
    let app = spawn_app().await;

    let test_cases = vec![
        (serde_json::json!({"userEmail": "asha@example.com"}), "missing order details"),
        (serde_json::json!({"orderDetails": order_details()}), "missing user email"),
        (serde_json::json!({}), "missing order details and user email"),
        (
            serde_json::json!({"orderDetails": null, "userEmail": "asha@example.com"}),
            "null order details",
        ),
        (
            serde_json::json!({"orderDetails": order_details(), "userEmail": null}),
            "null user email",
        ),
        (
            serde_json::json!({"orderDetails": order_details(), "userEmail": ""}),
            "empty user email",
        ),
        (
            serde_json::json!({"orderDetails": false, "userEmail": "asha@example.com"}),
            "false order details",
        ),
        (
            serde_json::json!({"orderDetails": "", "userEmail": "asha@example.com"}),
            "empty string order details",
        ),
        (
            serde_json::json!({"orderDetails": 0, "userEmail": "asha@example.com"}),
            "zero order details",
        ),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = app.post_order_confirmation(&invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "API did not fail with 400 error code: {}",
            error_message
        );
        let response_body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(
            response_body,
            serde_json::json!({"error": "Missing required fields"}),
            "Unexpected error body: {}",
            error_message
        );
    }

    assert!(app.mail_sender.sent().is_empty());
}

#[tokio::test]
async fn test_order_confirmation_returns_400_for_a_malformed_body() {
    let app = spawn_app().await;

    let test_cases = vec![
        ("{not json", "invalid json"),
        (r#"{"orderDetails": "yes", "userEmail": "asha@example.com"}"#, "order details is a string"),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = app.post_raw_order_confirmation(invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "API did not fail with 400 error code: {}",
            error_message
        );
        let response_body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(response_body, serde_json::json!({"error": "Invalid request body"}));
    }

    assert!(app.mail_sender.sent().is_empty());
}

#[tokio::test]
async fn test_order_confirmation_sends_an_order_with_missing_text_fields() {
    let app = spawn_app().await;
    let mut order = order_details();
    order.as_object_mut().unwrap().remove("country");
    order.as_object_mut().unwrap().remove("lastName");
    let body = serde_json::json!({"orderDetails": order, "userEmail": "asha@example.com"});

    let response = app.post_order_confirmation(&body).await;

    assert_eq!(200, response.status().as_u16());
    let sent = app.mail_sender.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].body.contains("411001<br>"));
    assert!(sent[0].body.contains("999.00"));
    assert!(!sent[0].body.contains("India"));
}

#[tokio::test]
async fn test_order_confirmation_returns_500_when_the_email_cannot_be_sent() {
    let app = spawn_app_with_failing_sender().await;
    let body = serde_json::json!({
        "orderDetails": order_details(),
        "userEmail": "asha@example.com"
    });

    let response = app.post_order_confirmation(&body).await;

    assert_eq!(500, response.status().as_u16());
    let response_body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        response_body,
        serde_json::json!({"error": "Failed to send order confirmation email"})
    );
    // A single attempt, no retries
    assert_eq!(app.mail_sender.sent().len(), 1);
}

#[tokio::test]
async fn test_server_keeps_serving_after_a_failed_send() {
    let app = spawn_app_with_failing_sender().await;
    let body = serde_json::json!({
        "orderDetails": order_details(),
        "userEmail": "asha@example.com"
    });

    let first = app.post_order_confirmation(&body).await;
    let second = app.post_order_confirmation(&body).await;

    assert_eq!(500, first.status().as_u16());
    assert_eq!(500, second.status().as_u16());
    assert_eq!(app.mail_sender.sent().len(), 2);
}

#[tokio::test]
async fn test_order_confirmation_accepts_an_empty_cart() {
    let app = spawn_app().await;
    let mut order = order_details();
    order["cartItems"] = serde_json::json!([]);
    order["total"] = serde_json::json!(0);
    let body = serde_json::json!({"orderDetails": order, "userEmail": "asha@example.com"});

    let response = app.post_order_confirmation(&body).await;

    assert_eq!(200, response.status().as_u16());
    assert!(app.mail_sender.sent()[0].body.contains("₹0.00"));
}

#[tokio::test]
async fn test_order_confirmation_allows_the_configured_origin() {
    let app = spawn_app().await;
    let body = serde_json::json!({
        "orderDetails": order_details(),
        "userEmail": "asha@example.com"
    });

    let response = app
        .api_client
        .post(&format!("{}/api/send-order-confirmation", &app.address))
        .header("Origin", "https://tulsitraditional.in")
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(200, response.status().as_u16());
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("https://tulsitraditional.in")
    );
}

#[tokio::test]
async fn test_order_confirmation_does_not_allow_other_origins() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .request(
            reqwest::Method::OPTIONS,
            &format!("{}/api/send-order-confirmation", &app.address),
        )
        .header("Origin", "https://evil.example.com")
        .header("Access-Control-Request-Method", "POST")
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.headers().get("access-control-allow-origin").is_none());
    assert!(app.mail_sender.sent().is_empty());
}

#[tokio::test]
async fn test_order_confirmation_rejects_a_post_from_another_origin() {
    let app = spawn_app().await;
    let body = serde_json::json!({
        "orderDetails": order_details(),
        "userEmail": "asha@example.com"
    });

    let response = app
        .api_client
        .post(&format!("{}/api/send-order-confirmation", &app.address))
        .header("Origin", "https://other.example.com")
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(400, response.status().as_u16());
    assert!(response.headers().get("access-control-allow-origin").is_none());
    assert!(app.mail_sender.sent().is_empty());
}
