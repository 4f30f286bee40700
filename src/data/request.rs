//! Conversion of host HTTP requests into plain data maps.
//!
//! Scripts never see the [`http::Request`] itself; they get a nested map with
//! `method`, `url`, `path`, `query`, `host`, `remote_addr`, `proto`, `headers`
//! and, when available, `body`.

use std::collections::HashMap;
use std::net::SocketAddr;

use http::{HeaderMap, Request, Uri, header};

use super::value::{DataMap, Value};

/// Snapshot of the parts of an HTTP request exposed to scripts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestData {
    pub method: String,
    pub url: String,
    pub path: String,
    pub query: HashMap<String, Vec<String>>,
    pub host: String,
    pub remote_addr: String,
    pub proto: String,
    /// Header name (lowercase) to its values in arrival order.
    pub headers: HashMap<String, Vec<String>>,
    pub body: Option<String>,
}

impl RequestData {
    /// Builds the snapshot from everything but the body.
    ///
    /// The remote address is read from a [`SocketAddr`] request extension,
    /// which is where most servers (axum's `ConnectInfo` included) can be told
    /// to put it.
    pub fn from_request<B>(request: &Request<B>) -> Self {
        let uri = request.uri();
        Self {
            method: request.method().as_str().to_string(),
            url: uri.to_string(),
            path: uri.path().to_string(),
            query: query_params(uri),
            host: host_of(uri, request.headers()),
            remote_addr: request
                .extensions()
                .get::<SocketAddr>()
                .map(ToString::to_string)
                .unwrap_or_default(),
            proto: format!("{:?}", request.version()),
            headers: header_values(request.headers()),
            body: None,
        }
    }

    pub fn with_body(mut self, body: &[u8]) -> Self {
        self.body = Some(String::from_utf8_lossy(body).into_owned());
        self
    }
}

/// Converts a request with a byte-like body, body included.
pub fn request_to_value<B: AsRef<[u8]>>(request: &Request<B>) -> Value {
    RequestData::from_request(request)
        .with_body(request.body().as_ref())
        .into()
}

fn host_of(uri: &Uri, headers: &HeaderMap) -> String {
    if let Some(authority) = uri.authority() {
        return authority.to_string();
    }
    headers
        .get(header::HOST)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
        .unwrap_or_default()
}

fn query_params(uri: &Uri) -> HashMap<String, Vec<String>> {
    let mut params: HashMap<String, Vec<String>> = HashMap::new();
    if let Some(query) = uri.query() {
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            params
                .entry(key.into_owned())
                .or_default()
                .push(value.into_owned());
        }
    }
    params
}

fn header_values(headers: &HeaderMap) -> HashMap<String, Vec<String>> {
    headers
        .keys()
        .map(|name| {
            let values = headers
                .get_all(name)
                .iter()
                .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
                .collect();
            (name.as_str().to_string(), values)
        })
        .collect()
}

fn multi_map(entries: HashMap<String, Vec<String>>) -> Value {
    Value::Map(
        entries
            .into_iter()
            .map(|(k, v)| (k, Value::from(v)))
            .collect::<DataMap>(),
    )
}

impl From<RequestData> for Value {
    fn from(request: RequestData) -> Self {
        let mut map = DataMap::new();
        map.insert("method".to_string(), Value::String(request.method));
        map.insert("url".to_string(), Value::String(request.url));
        map.insert("path".to_string(), Value::String(request.path));
        map.insert("query".to_string(), multi_map(request.query));
        map.insert("host".to_string(), Value::String(request.host));
        map.insert("remote_addr".to_string(), Value::String(request.remote_addr));
        map.insert("proto".to_string(), Value::String(request.proto));
        map.insert("headers".to_string(), multi_map(request.headers));
        if let Some(body) = request.body {
            map.insert("body".to_string(), Value::String(body));
        }
        Value::Map(map)
    }
}
