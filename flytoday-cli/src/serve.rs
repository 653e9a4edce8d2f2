//! HTTP surface of the webhook: `POST /` for fulfillment, `GET /health`.

use std::sync::Arc;

use anyhow::Context;
use axum::{Json, Router, body::Bytes, extract::State, routing::get, routing::post};
use flytoday_core::{WebhookHandler, WebhookResponse};

pub fn router(handler: Arc<WebhookHandler>) -> Router {
    Router::new()
        .route("/", post(fulfill))
        .route("/health", get(health))
        .with_state(handler)
}

pub async fn serve(handler: WebhookHandler, bind: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;

    tracing::info!("Listening for fulfillment requests on {bind}");
    axum::serve(listener, router(Arc::new(handler)))
        .await
        .context("Webhook server stopped")
}

// Every body gets a 200 with a fulfillment text, even an unreadable one.
async fn fulfill(State(handler): State<Arc<WebhookHandler>>, body: Bytes) -> Json<WebhookResponse> {
    let body = String::from_utf8_lossy(&body);
    Json(handler.handle_json(&body).await)
}

async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
        response::Response,
    };
    use flytoday_core::{BuiltinTemplateStore, Config, STANDARD_ERROR_MESSAGE, provider_from_config};
    use tower::ServiceExt;

    use super::*;

    fn test_router() -> Router {
        let provider = provider_from_config(&Config::default()).unwrap();
        router(Arc::new(WebhookHandler::new(provider, Box::new(BuiltinTemplateStore))))
    }

    async fn post(body: impl Into<Body>) -> Response {
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap();
        test_router().oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn unreadable_body_gets_standard_error_with_ok_status() {
        for body in [Body::from("not json"), Body::from(vec![0xff_u8, 0xfe])] {
            let response = post(body).await;
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(
                json_body(response).await,
                serde_json::json!({ "fulfillmentText": STANDARD_ERROR_MESSAGE })
            );
        }
    }

    #[tokio::test]
    async fn request_without_icao_gets_standard_error() {
        let response = post(r#"{"queryResult": {"intent": {"displayName": "get_wind_information"}}}"#).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({ "fulfillmentText": STANDARD_ERROR_MESSAGE })
        );
    }

    #[tokio::test]
    async fn health_answers_ok() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = test_router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }
}
