//! Credential surfaces read from an actix-web request

use actix_web::{web, HttpMessage, HttpRequest};
use mps_core::CredentialSource;
use serde_json::{Map, Value};

/// Body and query of an HTTP request, parsed into JSON values.
///
/// JSON bodies keep their nesting so bracket field names resolve;
/// urlencoded bodies and query strings become flat string maps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HttpCredentials {
    body: Option<Value>,
    query: Option<Value>,
}

impl HttpCredentials {
    pub fn from_request(req: &HttpRequest, payload: &[u8]) -> Self {
        Self {
            body: parse_body(req.content_type(), payload),
            query: parse_urlencoded(req.query_string()),
        }
    }
}

impl CredentialSource for HttpCredentials {
    fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    fn query(&self) -> Option<&Value> {
        self.query.as_ref()
    }
}

fn parse_body(content_type: &str, payload: &[u8]) -> Option<Value> {
    if payload.is_empty() {
        return None;
    }

    match content_type {
        "application/x-www-form-urlencoded" => {
            std::str::from_utf8(payload).ok().and_then(parse_urlencoded)
        }
        _ => match serde_json::from_slice(payload) {
            Ok(body) => Some(body),
            Err(e) => {
                log::debug!("Ignoring {} body that is not JSON: {}", content_type, e);
                None
            }
        },
    }
}

fn parse_urlencoded(input: &str) -> Option<Value> {
    if input.is_empty() {
        return None;
    }
    let pairs = web::Query::<Vec<(String, String)>>::from_query(input).ok()?;
    let fields: Map<String, Value> = pairs
        .into_inner()
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect();
    Some(Value::Object(fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use serde_json::json;

    #[test]
    fn test_json_body_and_query() {
        let req = TestRequest::post()
            .uri("/auth/mobile-phone?verifyCode=1234")
            .insert_header(("content-type", "application/json"))
            .to_http_request();

        let credentials =
            HttpCredentials::from_request(&req, br#"{"user": {"phone": "13800000000"}}"#);

        assert_eq!(credentials.body(), Some(&json!({"user": {"phone": "13800000000"}})));
        assert_eq!(credentials.query(), Some(&json!({"verifyCode": "1234"})));
    }

    #[test]
    fn test_form_body() {
        let req = TestRequest::post()
            .uri("/auth/mobile-phone")
            .insert_header(("content-type", "application/x-www-form-urlencoded"))
            .to_http_request();

        let credentials =
            HttpCredentials::from_request(&req, b"phoneNumber=13800000000&verifyCode=1234");

        assert_eq!(
            credentials.body(),
            Some(&json!({"phoneNumber": "13800000000", "verifyCode": "1234"}))
        );
        assert_eq!(credentials.query(), None);
    }

    #[test]
    fn test_malformed_json_is_ignored() {
        let req = TestRequest::post()
            .uri("/auth/mobile-phone")
            .insert_header(("content-type", "application/json"))
            .to_http_request();

        let credentials = HttpCredentials::from_request(&req, b"{not json");
        assert_eq!(credentials.body(), None);
    }
}
