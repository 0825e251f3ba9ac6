use crate::routes::error::ApiError;
use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde_json::{Map, Value};
use std::convert::Infallible;
use tracing::debug;

/// Request body parsed as a JSON object, regardless of `Content-Type`.
///
/// Anything that is not a JSON object is rejected with [`ApiError::InvalidJson`]
/// before the handler runs. Failures to read the body itself (e.g. the body
/// limit) keep their own status.
pub struct JsonParams(pub Map<String, Value>);

#[async_trait]
impl<S> FromRequest<S> for JsonParams
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state).await?;

        match serde_json::from_slice::<Value>(&body) {
            Ok(Value::Object(params)) => Ok(Self(params)),
            _ => Err(ApiError::InvalidJson),
        }
    }
}

/// The `:id` path segment. `None` when the segment does not decode, which no
/// stored book can match.
pub struct BookId(pub Option<String>);

impl BookId {
    pub fn known(self) -> Result<String, ApiError> {
        self.0.ok_or(ApiError::NotFound)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for BookId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<String>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(Self(Some(id))),
            Err(rejection) => {
                debug!("Undecodable book id in {}: {}", parts.uri.path(), rejection);
                Ok(Self(None))
            }
        }
    }
}
