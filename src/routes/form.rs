use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Form,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::AppError;

/// Form body extractor accepting both `application/x-www-form-urlencoded`
/// and `multipart/form-data`.
///
/// Multipart parts are read as text fields; file parts are not expected.
/// Repeated field names keep the last value.
#[derive(Debug)]
pub struct FormFields<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for FormFields<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("multipart/form-data"))
            .unwrap_or(false);

        if !is_multipart {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| AppError::InvalidInput(e.body_text()))?;
            return Ok(Self(value));
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::InvalidInput(e.body_text()))?;

        let mut fields = Map::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::InvalidInput(e.to_string()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let text = field
                .text()
                .await
                .map_err(|e| AppError::InvalidInput(e.to_string()))?;
            fields.insert(name, Value::String(text));
        }

        serde_json::from_value(Value::Object(fields))
            .map(Self)
            .map_err(|e| AppError::InvalidInput(format!("Invalid form: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UploadVideoForm;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;

    #[tokio::test]
    async fn test_urlencoded_body() {
        let req = HttpRequest::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("user_id=abc&title=Solo+Night&video_data=QUJD"))
            .unwrap();

        let FormFields(form) = FormFields::<UploadVideoForm>::from_request(req, &())
            .await
            .unwrap();
        assert_eq!(form.user_id, "abc");
        assert_eq!(form.title, "Solo Night");
        assert!(form.description.is_none());
    }

    #[tokio::test]
    async fn test_multipart_body() {
        let boundary = "XBOUNDARYX";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"user_id\"\r\n\r\nabc\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"title\"\r\n\r\nDuet\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"category\"\r\n\r\nduet\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"video_data\"\r\n\r\nQUJD\r\n\
             --{b}--\r\n",
            b = boundary
        );
        let req = HttpRequest::builder()
            .method("POST")
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(body))
            .unwrap();

        let FormFields(form) = FormFields::<UploadVideoForm>::from_request(req, &())
            .await
            .unwrap();
        assert_eq!(form.title, "Duet");
        assert_eq!(form.category, crate::models::VideoCategory::Duet);
        assert_eq!(form.video_data, "QUJD");
    }

    #[tokio::test]
    async fn test_missing_required_field_is_invalid_input() {
        let req = HttpRequest::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("title=No+Owner"))
            .unwrap();

        let err = FormFields::<UploadVideoForm>::from_request(req, &())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
