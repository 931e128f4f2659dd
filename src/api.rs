// API client module: a small blocking HTTP client that talks to the hostgo
// platform. Requests go through a `Transport` so operations can be exercised
// without a network; `HttpTransport` is the reqwest-backed implementation
// used by the binary.

use crate::error::{Error, Result};
use crate::types::{Account, Envelope};
use reqwest::blocking::{multipart, Client};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Base URL of the platform API.
pub const DEFAULT_API_URL: &str = "http://167.172.159.245:4005/api";

/// Environment variable that replaces `DEFAULT_API_URL` for the whole process.
pub const API_URL_ENV: &str = "HOSTGO_API_URL";

/// Header carrying the account token on authenticated requests.
pub const AUTH_HEADER: &str = "X-Auth-Token";

/// Upper bound applied to every request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Outbound request, independent of the HTTP library.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Body,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Request {
            method,
            path: path.into(),
            query: Vec::new(),
            body: Body::Empty,
        }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn json(mut self, payload: serde_json::Value) -> Self {
        self.body = Body::Json(payload);
        self
    }

    pub fn upload(mut self, upload: Upload) -> Self {
        self.body = Body::Multipart(upload);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    Json(serde_json::Value),
    Multipart(Upload),
}

/// Multipart form made of plain text fields and a single file part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub fields: Vec<(String, String)>,
    pub file_field: String,
    pub file_path: PathBuf,
}

impl Upload {
    fn to_form(&self) -> Result<multipart::Form> {
        let mut form = multipart::Form::new();
        for (name, value) in &self.fields {
            form = form.text(name.clone(), value.clone());
        }
        Ok(form.file(self.file_field.clone(), &self.file_path)?)
    }
}

/// Raw status and body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Sends a request and hands back the raw response. Transport failures
/// (DNS, connect, timeout) surface as `Error::Network`.
pub trait Transport {
    fn send(&self, request: &Request, token: Option<&str>) -> Result<Response>;
}

/// reqwest-backed transport bound to a single base URL.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(HttpTransport {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Use `HOSTGO_API_URL` when set, otherwise the platform's fixed URL.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.into());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &Request, token: Option<&str>) -> Result<Response> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!(method = %request.method, path = %request.path, "sending request");

        let mut req = self.client.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            req = req.query(&request.query);
        }
        if let Some(token) = token {
            req = req.header(AUTH_HEADER, token);
        }
        req = match &request.body {
            Body::Empty => req,
            Body::Json(payload) => req.json(payload),
            Body::Multipart(upload) => req.multipart(upload.to_form()?),
        };

        let res = req.send()?;
        let status = res.status().as_u16();
        let body = res.bytes()?.to_vec();
        debug!(status, bytes = body.len(), "received response");
        Ok(Response { status, body })
    }
}

#[derive(Deserialize)]
struct Status {
    #[serde(default)]
    error: bool,
    #[serde(default)]
    message: Option<String>,
}

/// Client that attaches the account token (when there is one) and
/// interprets the `{error, message, data}` envelope.
#[derive(Clone)]
pub struct ApiClient<T = HttpTransport> {
    transport: T,
    token: Option<String>,
}

impl ApiClient<HttpTransport> {
    pub fn from_env(account: Option<&Account>) -> Result<Self> {
        Ok(ApiClient::with_transport(HttpTransport::from_env()?, account))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(transport: T, account: Option<&Account>) -> Self {
        ApiClient {
            transport,
            token: account
                .map(|a| a.account_token.clone())
                .filter(|t| !t.is_empty()),
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a request and decode its envelope. A non-OK status or
    /// `error: true` fails with the envelope's message.
    pub fn call<R>(&self, request: Request) -> Result<Envelope<R>>
    where
        R: DeserializeOwned + Default,
    {
        let res = self.transport.send(&request, self.token.as_deref())?;
        let status: Status = serde_json::from_slice(&res.body)?;
        if !res.is_ok() || status.error {
            let message = status
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| format!("server responded with status {}", res.status));
            return Err(Error::Server(message));
        }
        Ok(serde_json::from_slice(&res.body)?)
    }

    /// Send a bodiless request and return the response bytes untouched.
    pub fn call_raw(&self, request: Request) -> Result<Vec<u8>> {
        let request = Request {
            body: Body::Empty,
            ..request
        };
        let res = self.transport.send(&request, self.token.as_deref())?;
        if !res.is_ok() {
            return Err(Error::Server(format!(
                "server responded with status {}",
                res.status
            )));
        }
        Ok(res.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeTransport;
    use crate::types::{App, Instance};

    fn account() -> Account {
        Account {
            account_token: "secret".into(),
            ..Account::default()
        }
    }

    #[test]
    fn error_flag_with_ok_status_fails_with_message() {
        let fake = FakeTransport::new().reply(200, r#"{"error": true, "message": "X"}"#);
        let api = ApiClient::with_transport(fake, Some(&account()));
        let err = api
            .call::<serde_json::Value>(Request::new(Method::GET, "/x"))
            .unwrap_err();
        assert!(matches!(err, Error::Server(ref m) if m == "X"));
    }

    #[test]
    fn server_error_status_without_flag_still_fails() {
        let fake = FakeTransport::new().reply(500, r#"{"error": false}"#);
        let api = ApiClient::with_transport(fake, None);
        let err = api
            .call::<serde_json::Value>(Request::new(Method::GET, "/x"))
            .unwrap_err();
        match err {
            Error::Server(message) => {
                assert!(!message.is_empty());
                assert!(message.contains("500"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_json_body_is_a_parse_error() {
        let fake = FakeTransport::new().reply(502, "<html>bad gateway</html>");
        let api = ApiClient::with_transport(fake, None);
        let err = api
            .call::<serde_json::Value>(Request::new(Method::GET, "/x"))
            .unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn decodes_operation_specific_data() {
        let fake = FakeTransport::new().reply(
            200,
            r#"{"error": false, "data": {"id": 7, "app_name": "foo", "access_url": "http://foo.example"}}"#,
        );
        let api = ApiClient::with_transport(fake, None);
        let env = api.call::<App>(Request::new(Method::POST, "/me/apps")).unwrap();
        assert_eq!(env.data.id, 7);
        assert_eq!(env.data.app_name, "foo");
    }

    #[test]
    fn token_is_passed_only_when_authenticated() {
        let body = r#"{"error": false, "data": []}"#;
        let api = ApiClient::with_transport(FakeTransport::new().reply(200, body), Some(&account()));
        api.call::<Vec<Instance>>(Request::new(Method::GET, "/apps/ps/a"))
            .unwrap();
        assert_eq!(api.transport().tokens(), vec![Some("secret".to_string())]);

        let api = ApiClient::with_transport(FakeTransport::new().reply(200, body), None);
        api.call::<Vec<Instance>>(Request::new(Method::GET, "/apps/ps/a"))
            .unwrap();
        assert_eq!(api.transport().tokens(), vec![None]);
    }

    #[test]
    fn account_with_empty_token_sends_no_header() {
        let body = r#"{"error": false, "data": []}"#;
        let api = ApiClient::with_transport(
            FakeTransport::new().reply(200, body),
            Some(&Account::default()),
        );
        assert!(!api.has_token());
        api.call::<Vec<Instance>>(Request::new(Method::GET, "/apps/ps/a"))
            .unwrap();
        assert_eq!(api.transport().tokens(), vec![None]);
    }

    #[test]
    fn raw_call_skips_envelope_and_drops_body() {
        let fake = FakeTransport::new().reply(200, r#"{"error": true}"#);
        let api = ApiClient::with_transport(fake, None);
        let request = Request::new(Method::GET, "/dump").json(serde_json::json!({"a": 1}));
        let bytes = api.call_raw(request).unwrap();
        assert_eq!(bytes, br#"{"error": true}"#.to_vec());
        assert_eq!(api.transport().requests()[0].body, Body::Empty);
    }

    #[test]
    fn raw_call_fails_on_non_ok_status() {
        let fake = FakeTransport::new().reply(404, "missing");
        let api = ApiClient::with_transport(fake, None);
        let err = api.call_raw(Request::new(Method::GET, "/dump")).unwrap_err();
        assert!(matches!(err, Error::Server(_)));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let transport = HttpTransport::new("http://localhost:4005/api/").unwrap();
        assert_eq!(transport.base_url(), "http://localhost:4005/api");
    }
}
