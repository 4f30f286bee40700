use std::net::SocketAddr;

use polyscript::{
    data::{request_to_value, RequestData},
    provider::{Getter, Setter},
    ContextProvider, ExecutionContext, Nesting, Value,
};
use pretty_assertions::assert_eq;

fn request() -> http::Request<&'static [u8]> {
    let mut request = http::Request::builder()
        .method("PUT")
        .uri("https://api.example.com:8443/v1/users/7?fields=name&fields=email")
        .header("X-Trace", "abc")
        .body(&b"{\"name\":\"ada\"}"[..])
        .unwrap();
    request
        .extensions_mut()
        .insert("192.168.1.20:55000".parse::<SocketAddr>().unwrap());
    request
}

#[test]
fn test_request_fields_from_absolute_uri() {
    let data = RequestData::from_request(&request()).with_body(request().body());
    assert_eq!(data.method, "PUT");
    assert_eq!(data.path, "/v1/users/7");
    assert_eq!(data.host, "api.example.com:8443");
    assert_eq!(data.remote_addr, "192.168.1.20:55000");
    assert_eq!(
        data.query.get("fields"),
        Some(&vec!["name".to_string(), "email".to_string()])
    );
    assert_eq!(data.body.as_deref(), Some("{\"name\":\"ada\"}"));
}

#[test]
fn test_request_stored_through_context_provider() {
    let Value::Map(map) = request_to_value(&request()) else {
        panic!("request must convert to a map");
    };
    let provider = ContextProvider::new("script_data").with_nesting(Nesting::Under("request".into()));
    let ctx = provider
        .add_data_to_context(&ExecutionContext::background(), &[map])
        .into_result()
        .unwrap();

    let stored = provider.get_data(&ctx).unwrap();
    let request = stored.get("request").unwrap();
    assert_eq!(request.get("method"), Some(&Value::from("PUT")));
    assert_eq!(
        request.get("headers").and_then(|h| h.get("x-trace")),
        Some(&Value::from(vec!["abc"]))
    );
}
