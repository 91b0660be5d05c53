//! Request extractors that deserialize and validate in one step.
//!
//! Every field error is collected into `AppError::ValidationErrors`, so
//! handlers receive either a fully valid value or a single list of problems.

use crate::error::{AppError, AppResult};
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use validator::Validate;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

/// JSON body extractor that runs `validator::Validate`
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> AppResult<Self> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Query string extractor that runs `validator::Validate`
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> AppResult<Self> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        value.validate()?;
        Ok(ValidatedQuery(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, header};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct CourseBody {
        #[validate(length(
            min = 2,
            max = 64,
            message = "Course name must be between 2 and 64 characters"
        ))]
        name: String,
        #[validate(email(message = "Invalid email format"))]
        contact: String,
        #[validate(range(min = 1, max = 4, message = "Year must be between 1 and 4"))]
        year: u8,
    }

    fn json_request(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/test")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body() {
        let request = json_request(r#"{"name":"BCA","contact":"office@example.edu","year":2}"#);
        let ValidatedJson(body) = ValidatedJson::<CourseBody>::from_request(request, &())
            .await
            .unwrap();
        assert_eq!(body.name, "BCA");
        assert_eq!(body.year, 2);
    }

    #[tokio::test]
    async fn test_every_invalid_field_is_reported() {
        let request = json_request(r#"{"name":"B","contact":"nope","year":9}"#);
        match ValidatedJson::<CourseBody>::from_request(request, &()).await {
            Err(AppError::ValidationErrors { errors }) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["contact", "name", "year"]);
                assert!(errors[2].message.contains("between 1 and 4"));
            }
            other => panic!("Expected ValidationErrors, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let request = json_request(r#"{"name":"BCA""#);
        let result = ValidatedJson::<CourseBody>::from_request(request, &()).await;
        assert!(matches!(result, Err(AppError::BadRequest { .. })));
    }

    #[tokio::test]
    async fn test_missing_content_type_is_bad_request() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/test")
            .body(Body::from(r#"{"name":"BCA","contact":"a@b.edu","year":1}"#))
            .unwrap();
        let result = ValidatedJson::<CourseBody>::from_request(request, &()).await;
        assert!(matches!(result, Err(AppError::BadRequest { .. })));
    }

    #[derive(Debug, Deserialize, Validate)]
    struct Paging {
        #[validate(range(min = 1, message = "Page must be at least 1"))]
        page: u32,
    }

    #[tokio::test]
    async fn test_query_validation() {
        let (mut parts, _) = Request::builder()
            .uri("/test?page=0")
            .body(Body::empty())
            .unwrap()
            .into_parts();
        match ValidatedQuery::<Paging>::from_request_parts(&mut parts, &()).await {
            Err(AppError::ValidationErrors { errors }) => assert_eq!(errors[0].field, "page"),
            other => panic!("Expected ValidationErrors, got {:?}", other),
        }
    }
}
