use crate::{auth::AuthClaims, dtos::envelope::Envelope, error::ApiError};
use axum::{Extension, Json};

/// Returns the claims of the caller's bearer token
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Successfully authenticated", body = Envelope<AuthClaims>),
        (status = 401, description = "Unauthorized - invalid or missing JWT")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Authentication"
)]
pub async fn me(
    claims: Option<Extension<AuthClaims>>,
) -> Result<Json<Envelope<AuthClaims>>, ApiError> {
    let Extension(claims) =
        claims.ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_owned()))?;

    Ok(Json(Envelope::success("Authenticated", claims)))
}
