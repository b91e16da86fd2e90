// Actor identification for audited requests
//
// Clients identify themselves with an integer X-Actor-Id header. Requests
// without it are attributed to the configured default actor.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderName, StatusCode},
    Json,
};

pub const ACTOR_ID_HEADER: HeaderName = HeaderName::from_static("x-actor-id");

/// Actor id taken from the X-Actor-Id header, if present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorHeader(pub Option<i32>);

impl ActorHeader {
    /// The header value, or `default` when the header was absent
    pub fn or(self, default: i32) -> i32 {
        self.0.unwrap_or(default)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ActorHeader
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<Vec<String>>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(&ACTOR_ID_HEADER) else {
            return Ok(ActorHeader(None));
        };

        value
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<i32>().ok())
            .map(|id| ActorHeader(Some(id)))
            .ok_or_else(|| {
                (
                    StatusCode::BAD_REQUEST,
                    Json(vec!["Actor id must be an integer.".to_string()]),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Result<ActorHeader, StatusCode> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(ACTOR_ID_HEADER, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        ActorHeader::from_request_parts(&mut parts, &())
            .await
            .map_err(|(status, _)| status)
    }

    #[tokio::test]
    async fn test_missing_header_uses_default() {
        let actor = extract(None).await.unwrap();
        assert_eq!(actor, ActorHeader(None));
        assert_eq!(actor.or(5), 5);
    }

    #[tokio::test]
    async fn test_integer_header() {
        assert_eq!(extract(Some(" 42 ")).await.unwrap().or(0), 42);
    }

    #[tokio::test]
    async fn test_malformed_header_is_rejected() {
        assert_eq!(
            extract(Some("alice")).await.unwrap_err(),
            StatusCode::BAD_REQUEST
        );
    }
}
