//! Remote gateway: the network boundary of the sync core.
//!
//! A request either succeeds with a body or fails in one of two ways the
//! sync core treats differently: the server *rejected* the request as invalid
//! (terminal, never retried verbatim), or the server could not be *reached*
//! (network error, timeout or any other failure; retried from the pending
//! queue later).

mod http;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::EntityKind;
use crate::util::compact_text;

pub use http::HttpGateway;

/// HTTP method understood by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Successful response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    pub status: u16,
    pub body: String,
}

impl GatewayResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Decode the JSON body.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Failed request, split by whether retrying could ever help
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// The server refused the request as invalid (e.g. malformed fields)
    #[error("Bad Request ({status}): {detail}")]
    Rejected { status: u16, detail: String },
    /// Network failure, timeout or server-side failure
    #[error("{0}")]
    Unreachable(String),
}

impl GatewayError {
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// Trait for the remote API (async)
#[allow(async_fn_in_trait)]
pub trait RemoteGateway {
    /// Perform one request against `endpoint` (`/tea/`, `/tea/<id>/`, ...)
    async fn request(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<String>,
    ) -> Result<GatewayResponse, GatewayError>;
}

/// Endpoint of a collection, or of one of its instances when `server_id` is given.
pub fn endpoint_for(kind: EntityKind, server_id: Option<&str>) -> String {
    match server_id {
        Some(id) => format!("/{}/{}/", kind.endpoint(), urlencoding::encode(id)),
        None => format!("/{}/", kind.endpoint()),
    }
}

/// Classify a completed HTTP exchange.
///
/// 2xx succeeds, 400 is a validation rejection, anything else is treated as
/// the server being unavailable.
pub fn classify_response(status: u16, body: String) -> Result<GatewayResponse, GatewayError> {
    match status {
        200..=299 => Ok(GatewayResponse { status, body }),
        400 => {
            let detail = compact_text(&body);
            Err(GatewayError::Rejected {
                status,
                detail: if detail.is_empty() {
                    "Bad Request".to_string()
                } else {
                    detail
                },
            })
        }
        _ => {
            let detail = compact_text(&body);
            Err(GatewayError::Unreachable(if detail.is_empty() {
                format!("HTTP {status}")
            } else {
                format!("HTTP {status}: {detail}")
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_for_collection_and_instance() {
        assert_eq!(endpoint_for(EntityKind::Tea, None), "/tea/");
        assert_eq!(
            endpoint_for(EntityKind::Session, Some("abc-123")),
            "/brewing_session/abc-123/"
        );
    }

    #[test]
    fn endpoint_for_encodes_identifier() {
        assert_eq!(
            endpoint_for(EntityKind::Vendor, Some("a b/c")),
            "/vendor/a%20b%2Fc/"
        );
    }

    #[test]
    fn classify_success() {
        let response = classify_response(201, r#"{"id": "x"}"#.to_string()).unwrap();
        assert_eq!(response.status, 201);
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["id"], "x");
    }

    #[test]
    fn classify_bad_request_is_rejected() {
        let error = classify_response(400, r#"{"name": ["required"]}"#.to_string()).unwrap_err();
        assert!(error.is_rejected());
        assert!(error.to_string().contains("required"));
    }

    #[test]
    fn classify_empty_bad_request_keeps_status_text() {
        let error = classify_response(400, String::new()).unwrap_err();
        assert_eq!(
            error,
            GatewayError::Rejected {
                status: 400,
                detail: "Bad Request".to_string()
            }
        );
    }

    #[test]
    fn classify_server_errors_as_unreachable() {
        for status in [401, 404, 500, 503] {
            let error = classify_response(status, String::new()).unwrap_err();
            assert!(!error.is_rejected(), "status {status}");
        }
    }
}
