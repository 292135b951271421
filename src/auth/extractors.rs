use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use crate::auth::jwt::JwtKeys;
use crate::error::ApiError;

/// Header carrying the raw signed token.
pub const AUTH_HEADER: &str = "x-auth-token";

/// The authentication gate. Protected handlers take an `AuthUser` argument;
/// the handler body cannot run unless verification succeeded, so a failed
/// check halts the request structurally instead of falling through.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let token = parts
            .headers
            .get(AUTH_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::bad_request("no token provided"))?;

        let claims = match keys.verify(token) {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "token rejected");
                return Err(ApiError::bad_request("token is not valid"));
            }
        };

        Ok(AuthUser(claims.user.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use axum::{body::Body, http::Request, http::StatusCode, routing::get, Router};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn protected_app(hit: Arc<AtomicBool>) -> Router {
        let state = AppState::fake();
        Router::new()
            .route(
                "/guarded",
                get(move |AuthUser(user_id): AuthUser| {
                    let hit = hit.clone();
                    async move {
                        hit.store(true, Ordering::SeqCst);
                        user_id.to_string()
                    }
                }),
            )
            .with_state(state)
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn missing_token_is_rejected_before_handler_runs() {
        let hit = Arc::new(AtomicBool::new(false));
        let app = protected_app(hit.clone());

        let resp = app
            .oneshot(Request::builder().uri("/guarded").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["msg"], "no token provided");
        assert!(!hit.load(Ordering::SeqCst), "handler must not execute");
    }

    #[tokio::test]
    async fn malformed_token_is_rejected() {
        let hit = Arc::new(AtomicBool::new(false));
        let app = protected_app(hit.clone());

        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/guarded")
                    .header(AUTH_HEADER, "garbage.token.here")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["msg"], "token is not valid");
        assert!(!hit.load(Ordering::SeqCst), "handler must not execute");
    }

    #[tokio::test]
    async fn token_signed_with_other_secret_is_rejected() {
        use jsonwebtoken::{DecodingKey, EncodingKey};

        let hit = Arc::new(AtomicBool::new(false));
        let app = protected_app(hit.clone());

        let other = JwtKeys {
            encoding: EncodingKey::from_secret(b"other-secret"),
            decoding: DecodingKey::from_secret(b"other-secret"),
            ttl_seconds: 3600,
        };
        let token = other.sign(Uuid::new_v4()).unwrap();

        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/guarded")
                    .header(AUTH_HEADER, token)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["msg"], "token is not valid");
        assert!(!hit.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn valid_token_reaches_handler_with_embedded_id() {
        let hit = Arc::new(AtomicBool::new(false));
        let app = protected_app(hit.clone());

        let state = AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        let user_id = Uuid::new_v4();
        let token = keys.sign(user_id).unwrap();

        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/guarded")
                    .header(AUTH_HEADER, token)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(String::from_utf8(bytes.to_vec()).unwrap(), user_id.to_string());
        assert!(hit.load(Ordering::SeqCst));
    }
}
