use crate::{config::Config, error::ApiError};
use axum::{
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use log::warn;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use thiserror::Error;
use tower_oauth2_resource_server::server::OAuth2ResourceServer;
use utoipa::ToSchema;

/// Claims of a validated bearer token, attached to the request as an
/// `Extension`
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct AuthClaims {
    pub sub: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub user_id: Option<serde_json::Value>,
    pub email: Option<String>,
    pub role: Option<String>,
}

/// The token layer could not be set up, usually because the issuer's
/// discovery document was unreachable
#[derive(Debug, Error)]
#[error("Failed to build OAuth2 resource server: {0}")]
pub struct ResourceServerError(#[source] Box<dyn StdError + Send + Sync>);

/// Resource server validating tokens against the configured OIDC issuer
pub async fn resource_server(
    config: &Config,
) -> Result<OAuth2ResourceServer<AuthClaims>, ResourceServerError> {
    let mut builder =
        OAuth2ResourceServer::<AuthClaims>::builder().issuer_url(config.oidc_issuer_url.as_str());

    if !config.oidc_audiences.is_empty() {
        builder = builder.audiences(config.oidc_audiences.as_slice());
    }

    builder
        .build()
        .await
        .map_err(|err| ResourceServerError(Box::new(err)))
}

/// Rewrites the bare 401/403 answers of the token layer into the envelope.
///
/// Responses that already carry JSON come from handlers and are kept.
pub async fn envelope_auth_rejection(response: Response) -> Response {
    let status = response.status();
    if status != StatusCode::UNAUTHORIZED && status != StatusCode::FORBIDDEN {
        return response;
    }

    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));
    if is_json {
        return response;
    }

    warn!("Rejected request with status {status}");

    let err = if status == StatusCode::UNAUTHORIZED {
        ApiError::Unauthorized("Invalid or missing bearer token".to_owned())
    } else {
        ApiError::Forbidden("Access denied".to_owned())
    };

    let mut rewritten = err.into_response();
    for (name, value) in response.headers() {
        if name != CONTENT_TYPE && !rewritten.headers().contains_key(name) {
            rewritten.headers_mut().insert(name, value.clone());
        }
    }
    rewritten
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json,
        body::{Body, to_bytes},
        http::header::WWW_AUTHENTICATE,
    };
    use serde_json::{Value, json};

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_resource_server_error_keeps_its_source() {
        let err = ResourceServerError(Box::new(std::io::Error::other(
            "issuer discovery unreachable",
        )));

        assert_eq!(
            err.to_string(),
            "Failed to build OAuth2 resource server: issuer discovery unreachable"
        );
        assert_eq!(
            err.source().unwrap().to_string(),
            "issuer discovery unreachable"
        );
    }

    #[tokio::test]
    async fn test_bare_unauthorized_is_rewritten() {
        let bare = Response::builder()
            .status(StatusCode::UNAUTHORIZED)
            .header(WWW_AUTHENTICATE, "Bearer")
            .body(Body::empty())
            .unwrap();

        let response = envelope_auth_rejection(bare).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[WWW_AUTHENTICATE], "Bearer");

        let json = json_body(response).await;
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"], true);
        assert_eq!(json["message"], "Invalid or missing bearer token");
    }

    #[tokio::test]
    async fn test_json_rejections_are_kept() {
        let from_handler = (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "from handler"})),
        )
            .into_response();

        let json = json_body(envelope_auth_rejection(from_handler).await).await;
        assert_eq!(json["message"], "from handler");
    }

    #[tokio::test]
    async fn test_other_statuses_pass_through() {
        let ok = (StatusCode::OK, "OK").into_response();
        let response = envelope_auth_rejection(ok).await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_claims_accept_missing_fields() {
        let claims: AuthClaims =
            serde_json::from_value(json!({"sub": "abc", "user_id": 7, "exp": 1})).unwrap();

        assert_eq!(claims.sub.as_deref(), Some("abc"));
        assert_eq!(claims.user_id, Some(json!(7)));
        assert!(claims.role.is_none());
    }
}
