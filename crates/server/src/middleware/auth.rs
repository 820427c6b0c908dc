//! Authentication extractors.
//!
//! Protected handlers declare [`RequireAuth`] or [`RequireAdmin`] as an
//! argument; the extractor verifies the bearer token once and hands the
//! handler an immutable [`CurrentUser`]. Handlers never re-verify the
//! token.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use secrecy::ExposeSecret;

use tangelo_core::UserId;

use crate::error::AppError;
use crate::services::auth::token;
use crate::state::AppState;

const NOT_AUTHENTICATED: &str = "Not authenticated.";
const INVALID_TOKEN: &str = "Invalid or expired token.";
const ADMIN_ONLY: &str = "Access denied. Admins only.";

/// Verified claims for the requesting user, attached by [`RequireAuth`].
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// The authenticated user's ID.
    pub user_id: UserId,
    /// Email claim from the token.
    pub email: String,
    /// Admin claim from the token.
    pub is_admin: bool,
}

/// Extractor that requires a valid session token.
///
/// Rejections:
/// - no `Authorization` header → 401
/// - header present but token malformed, mis-signed, or expired → 403
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthenticated(NOT_AUTHENTICATED.to_string()))?;

        let token = header
            .to_str()
            .ok()
            .and_then(|h| h.strip_prefix("Bearer "))
            .ok_or_else(|| AppError::Forbidden(INVALID_TOKEN.to_string()))?;

        let secret = state.config().jwt_secret.expose_secret().as_bytes();
        let claims = token::verify(token, secret)
            .map_err(|_| AppError::Forbidden(INVALID_TOKEN.to_string()))?;
        let user_id = claims
            .user_id()
            .map_err(|_| AppError::Forbidden(INVALID_TOKEN.to_string()))?;

        Ok(Self(CurrentUser {
            user_id,
            email: claims.email,
            is_admin: claims.is_admin,
        }))
    }
}

/// Extractor that requires a valid session token with the admin claim.
///
/// Verifies the token exactly like [`RequireAuth`], then rejects
/// non-admin identities with 403.
pub struct RequireAdmin(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;

        if !user.is_admin {
            return Err(AppError::Forbidden(ADMIN_ONLY.to_string()));
        }

        Ok(Self(user))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use http_body_util::BodyExt;
    use secrecy::SecretString;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use tangelo_core::Email;

    use crate::config::ServerConfig;
    use crate::models::User;

    const TEST_SECRET: &str = "extractor-test-0123456789abcdef0123456789";

    fn test_state() -> AppState {
        let config = ServerConfig {
            database_url: SecretString::from("postgres://localhost/unused"),
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            jwt_secret: SecretString::from(TEST_SECRET),
        };
        // Lazy pool: never connected, since these routes don't touch the
        // database.
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        AppState::new(config, pool)
    }

    async fn whoami(RequireAuth(user): RequireAuth) -> String {
        user.email
    }

    async fn admin_area(RequireAdmin(user): RequireAdmin) -> String {
        user.email
    }

    fn app() -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .route("/admin", get(admin_area))
            .with_state(test_state())
    }

    fn token_for(is_admin: bool) -> String {
        let now = chrono::Utc::now();
        let user = User {
            id: UserId::new(1),
            name: "Extractor Test".to_string(),
            email: Email::parse("test@example.com").unwrap(),
            is_admin,
            created_at: now,
            updated_at: now,
        };
        token::issue(&user, TEST_SECRET.as_bytes()).unwrap()
    }

    async fn body_message(response: axum::response::Response) -> String {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        json["message"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_missing_header_is_401() {
        let response = app()
            .oneshot(Request::get("/whoami").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_message(response).await, "Not authenticated.");
    }

    #[tokio::test]
    async fn test_garbage_token_is_403() {
        let response = app()
            .oneshot(
                Request::get("/whoami")
                    .header(AUTHORIZATION, "Bearer not-a-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_message(response).await, "Invalid or expired token.");
    }

    #[tokio::test]
    async fn test_header_without_bearer_scheme_is_403() {
        let response = app()
            .oneshot(
                Request::get("/whoami")
                    .header(AUTHORIZATION, token_for(false))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_valid_token_passes() {
        let response = app()
            .oneshot(
                Request::get("/whoami")
                    .header(AUTHORIZATION, format!("Bearer {}", token_for(false)))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"test@example.com");
    }

    #[tokio::test]
    async fn test_non_admin_rejected_from_admin_route() {
        let response = app()
            .oneshot(
                Request::get("/admin")
                    .header(AUTHORIZATION, format!("Bearer {}", token_for(false)))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_message(response).await, "Access denied. Admins only.");
    }

    #[tokio::test]
    async fn test_admin_token_passes_admin_route() {
        let response = app()
            .oneshot(
                Request::get("/admin")
                    .header(AUTHORIZATION, format!("Bearer {}", token_for(true)))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_header_on_admin_route_is_401() {
        let response = app()
            .oneshot(Request::get("/admin").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
