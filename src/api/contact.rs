//! `POST /api/contact` handler

use crate::state::Field;
use crate::transport::{is_truthy, DEFAULT_FAILURE_MESSAGE};
use axum::{body::Bytes, http::StatusCode, Json};
use serde_json::{json, Map, Value};

/// True when all four fields are present and truthy
fn is_complete(payload: &Map<String, Value>) -> bool {
    Field::ALL
        .iter()
        .all(|field| payload.get(field.key()).is_some_and(is_truthy))
}

/// Field value for the log line; strings unquoted, anything else as JSON
fn field_text(payload: &Map<String, Value>, field: Field) -> String {
    match payload.get(field.key()) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

fn failure(err: impl std::fmt::Display) -> (StatusCode, Json<Value>) {
    tracing::error!(error = %err, "Contact form error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": DEFAULT_FAILURE_MESSAGE })),
    )
}

/// Accept a submission and log it
pub async fn submit(body: Bytes) -> (StatusCode, Json<Value>) {
    let payload = match serde_json::from_slice::<Value>(&body) {
        Ok(Value::Object(payload)) => payload,
        Ok(_) => return failure("body is not a JSON object"),
        Err(err) => return failure(err),
    };

    if !is_complete(&payload) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "All fields are required" })),
        );
    }

    tracing::info!(
        name = %field_text(&payload, Field::Name),
        email = %field_text(&payload, Field::Email),
        subject = %field_text(&payload, Field::Subject),
        body = %field_text(&payload, Field::Message),
        "Contact form submission"
    );

    (
        StatusCode::OK,
        Json(json!({ "message": "Message sent successfully" })),
    )
}

#[cfg(test)]
mod tests {
    use crate::api::router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn post_contact(body: impl Into<Body>) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri("/api/contact")
            .method("POST")
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap();

        let response = router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn json_body(value: Value) -> Body {
        Body::from(serde_json::to_vec(&value).unwrap())
    }

    #[tokio::test]
    async fn test_complete_submission_is_accepted() {
        let (status, body) = post_contact(json_body(json!({
            "name": "Ada",
            "email": "ada@example.com",
            "subject": "Hi",
            "message": "hello there",
        })))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Message sent successfully"}));
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let (status, body) = post_contact(json_body(json!({
            "name": "Ada",
            "email": "ada@example.com",
            "message": "hello there",
        })))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "All fields are required"}));
    }

    #[tokio::test]
    async fn test_empty_field_is_bad_request() {
        let (status, _) = post_contact(json_body(json!({
            "name": "",
            "email": "ada@example.com",
            "subject": "Hi",
            "message": "hello there",
        })))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_json_is_server_error() {
        let (status, body) = post_contact("{not json").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Failed to send message"}));
    }

    #[tokio::test]
    async fn test_array_body_is_server_error() {
        let (status, body) = post_contact(r#"["Ada","ada@example.com","Hi","hello there"]"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Failed to send message"}));
    }

    #[tokio::test]
    async fn test_non_string_values_count_as_present() {
        let (status, body) = post_contact(json_body(json!({
            "name": 5,
            "email": "ada@example.com",
            "subject": true,
            "message": "hello there",
        })))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Message sent successfully"}));
    }

    #[tokio::test]
    async fn test_falsy_values_are_bad_request() {
        for falsy in [json!(null), json!(0), json!(false)] {
            let (status, _) = post_contact(json_body(json!({
                "name": "Ada",
                "email": "ada@example.com",
                "subject": falsy,
                "message": "hello there",
            })))
            .await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_get_is_not_allowed() {
        let request = Request::builder()
            .uri("/api/contact")
            .body(Body::empty())
            .unwrap();
        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
