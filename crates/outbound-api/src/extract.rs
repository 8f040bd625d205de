//! Request extractors that validate before any store interaction.

use std::collections::HashMap;

use axum::{
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use outbound_core::{FieldViolation, ListQuery, OutboundError, Record, ValidationError};
use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;

/// JSON body validated into a typed record.
///
/// Rejects unparseable bodies with E1002 and schema violations with E1001,
/// listing every violated field.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: Record,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| OutboundError::MalformedBody(rejection.body_text()))?;

        let record = T::validate(&value).inspect_err(|err| {
            debug!(
                collection = %T::COLLECTION,
                violations = err.violations().len(),
                "Request body failed validation"
            );
        })?;

        Ok(Self(record))
    }
}

/// Query string of a list request with `limit` coerced.
#[derive(Debug)]
pub struct ListParams(pub ListQuery);

impl<S> FromRequestParts<S> for ListParams
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|_| {
                ValidationError::new(vec![FieldViolation::wrong_type(
                    "query",
                    "url-encoded parameters",
                )])
            })?;

        Ok(Self(ListQuery::parse(params)?))
    }
}
