//! Request extractors shared by the modules.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use validator::{Validate, ValidationErrors};

use bookstall_http::AppError;

/// JSON body that has been deserialized and passed its `validator` rules.
///
/// Shape errors (missing fields, wrong types) and rule violations are both
/// reported as 422; unparseable JSON is a 400.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        value.validate().map_err(validation_failed)?;
        Ok(Self(value))
    }
}

/// Path parameters whose parse failures are reported as a 400 error body.
#[derive(Debug, Clone, Copy)]
pub struct Path<T>(pub T);

impl<S, T> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Path(value) = axum::extract::Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
        Ok(Self(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(err) => AppError::validation(
            vec![json!({ "field": null, "error": err.body_text() })],
            "Request body does not match the expected shape",
        ),
        other => AppError::bad_request(other.body_text()),
    }
}

/// Flatten `validator` errors into `[{field, error, message}]` details,
/// ordered by field name.
pub fn validation_failed(errors: ValidationErrors) -> AppError {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let details = fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| {
                json!({
                    "field": field,
                    "error": err.code,
                    "message": err.message,
                })
            })
        })
        .collect();

    AppError::validation(details, "Request validation failed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, StatusCode};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Probe {
        #[validate(range(min = 2020))]
        year: i64,
    }

    fn request(body: &'static str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn extract(body: &'static str) -> Result<ValidatedJson<Probe>, AppError> {
        ValidatedJson::<Probe>::from_request(request(body), &()).await
    }

    #[tokio::test]
    async fn accepts_valid_body() {
        let ValidatedJson(probe) = extract(r#"{"year": 2020}"#).await.unwrap();
        assert_eq!(probe.year, 2020);
    }

    #[tokio::test]
    async fn rule_violation_is_unprocessable() {
        let err = extract(r#"{"year": 2019}"#).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        match err {
            AppError::Validation { details, .. } => {
                assert_eq!(details[0]["field"], "year");
                assert_eq!(details[0]["error"], "range");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_field_is_unprocessable() {
        let err = extract(r#"{}"#).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn non_numeric_path_id_is_bad_request() {
        let app = axum::Router::new().route(
            "/items/{id}",
            axum::routing::get(|Path(id): Path<i64>| async move { id.to_string() }),
        );

        let response = tower::ServiceExt::oneshot(
            app,
            axum::http::Request::builder()
                .uri("/items/abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "bad_request");
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let err = extract(r#"{"year": "#).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
