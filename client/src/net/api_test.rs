use std::rc::Rc;

use futures::executor::block_on;
use serde_json::{Value, json};

use super::*;
use crate::net::testing::MockTransport;
use crate::net::types::Method;

fn client() -> (ApiClient, Rc<MockTransport>) {
    let transport = Rc::new(MockTransport::new());
    let api = ApiClient::new(&ClientConfig::instant(), transport.clone());
    (api, transport)
}

#[test]
fn query_values_are_percent_encoded() {
    assert_eq!(career_generate_endpoint("class 12", "data & ai"), "/careers/generate?stage=class%2012&goal=data%20%26%20ai");
    assert_eq!(interests_search_endpoint("art"), "/interests/search?q=art");
    assert_eq!(jobs_search_endpoint("c++"), "/jobs/search?q=c%2B%2B");
}

#[test]
fn path_segments_are_percent_encoded() {
    assert_eq!(career_endpoint("a/b"), "/careers/a%2Fb");
    assert_eq!(business_idea_endpoint("idea-1"), "/business/ideas/idea-1");
    assert_eq!(job_endpoint("job_7"), "/jobs/job_7");
    assert_eq!(interests_category_endpoint("fine arts"), "/interests/category/fine%20arts");
    assert_eq!(business_category_endpoint("food"), "/business/category/food");
}

#[test]
fn job_endpoints_format_expected_paths() {
    assert_eq!(jobs_type_endpoint(JobType::Government), "/jobs/type/government");
    assert_eq!(jobs_type_endpoint(JobType::Private), "/jobs/type/private");
    assert_eq!(jobs_latest_endpoint(5), "/jobs/latest?limit=5");
}

#[test]
fn translation_paths_match() {
    assert_eq!(translations_endpoint("hi"), "/translations/hi");
    assert_eq!(fallback::translations("hi"), "/data/translations/hi.json");
}

#[test]
fn request_returns_envelope_payload() {
    let (api, transport) = client();
    transport.respond("/api/jobs", 200, r#"{"success":true,"data":[{"id":"j1"}]}"#);
    transport.serve_static(fallback::JOBS_SEED, r#"[{"id":"seed"}]"#);

    let jobs: Vec<Value> = block_on(api.jobs().all()).unwrap();
    assert_eq!(jobs, vec![json!({ "id": "j1" })]);
}

#[test]
fn request_sends_json_content_type() {
    let (api, transport) = client();
    transport.respond("/api/interests", 200, r#"{"success":true,"data":[]}"#);
    let _: Vec<Value> = block_on(api.interests().all()).unwrap();

    let calls = transport.calls.borrow();
    assert_eq!(calls[0].1.header("Content-Type"), Some("application/json"));
    assert_eq!(calls[0].1.method, Method::Get);
}

#[test]
fn request_keeps_caller_headers() {
    let (api, transport) = client();
    transport.respond("/api/jobs", 200, r#"{"success":true,"data":1}"#);
    let options = RequestOptions::get().with_header("X-Trace", "abc");
    let value: u32 = block_on(api.request("/jobs", fallback::JOBS_SEED, Some(options))).unwrap();
    assert_eq!(value, 1);

    let calls = transport.calls.borrow();
    assert_eq!(calls[0].1.header("x-trace"), Some("abc"));
    assert_eq!(calls[0].1.header("content-type"), Some("application/json"));
}

#[test]
fn network_failure_serves_fallback_file() {
    let (api, transport) = client();
    transport.serve_static(fallback::JOBS_SEED, r#"[{"id":"seed"}]"#);

    let jobs: Vec<Value> = block_on(api.jobs().all()).unwrap();
    assert_eq!(jobs, vec![json!({ "id": "seed" })]);
}

#[test]
fn server_error_serves_fallback_file() {
    let (api, transport) = client();
    transport.respond("/api/business/ideas", 503, "down");
    transport.serve_static(fallback::BUSINESS_IDEAS, r#"{"ideas":[]}"#);

    let ideas: Value = block_on(api.business().ideas()).unwrap();
    assert_eq!(ideas, json!({ "ideas": [] }));
}

#[test]
fn unsuccessful_envelope_serves_fallback_file() {
    let (api, transport) = client();
    transport.respond("/api/languages", 200, r#"{"success":false,"error":"nope"}"#);
    transport.serve_static(fallback::LANGUAGES, r#"["en"]"#);

    let langs: Vec<String> = block_on(api.language().languages()).unwrap();
    assert_eq!(langs, vec!["en"]);
}

#[test]
fn malformed_envelope_serves_fallback_file() {
    let (api, transport) = client();
    transport.respond("/api/careers/placeholders", 200, "<html>");
    transport.serve_static(fallback::PLACEHOLDERS, r#"{"stages":[]}"#);

    let placeholders: Value = block_on(api.careers().placeholders()).unwrap();
    assert_eq!(placeholders, json!({ "stages": [] }));
}

#[test]
fn both_sources_failing_is_unavailable() {
    let (api, transport) = client();
    transport.fail(&api.url("/jobs/j9"), TransportError::Timeout);
    transport.fail_static(fallback::JOBS_SEED, TransportError::Network("offline".into()));

    let err = block_on(api.jobs().job::<Value>("j9")).unwrap_err();
    assert_eq!(
        err,
        ClientError::Unavailable { endpoint: "/jobs/j9".into(), fallback: fallback::JOBS_SEED.into() }
    );
}

#[test]
fn missing_fallback_file_is_unavailable() {
    let (api, _transport) = client();
    let err = block_on(api.interests().search::<Value>("x")).unwrap_err();
    assert!(matches!(err, ClientError::Unavailable { .. }));
}

#[test]
fn health_check_reports_online_on_2xx() {
    let (api, transport) = client();
    transport.respond("/api/health", 200, "ok");
    assert!(block_on(api.check_health()));
    assert!(!block_on(api.is_offline_mode()));

    let calls = transport.calls.borrow();
    assert_eq!(calls[0].1.timeout, Some(crate::config::DEFAULT_HEALTH_TIMEOUT));
}

#[test]
fn health_check_reports_offline_on_failure() {
    let (api, transport) = client();
    transport.fail("/api/health", TransportError::Timeout);
    assert!(!block_on(api.check_health()));
    assert!(block_on(api.is_offline_mode()));

    transport.respond("/api/health", 500, "");
    assert!(!block_on(api.check_health()));
}

#[test]
fn track_event_posts_payload_and_swallows_failure() {
    let (api, transport) = client();
    block_on(api.track_event("career_viewed", json!({ "id": "c1" })));

    let calls = transport.calls.borrow();
    assert_eq!(calls[0].0, "/api/analytics/track");
    assert_eq!(calls[0].1.method, Method::Post);
    let body: Value = serde_json::from_str(calls[0].1.body.as_deref().unwrap()).unwrap();
    assert_eq!(body["event"], "career_viewed");
    assert_eq!(body["data"], json!({ "id": "c1" }));
    assert!(body["timestamp"].as_i64().unwrap() > 0);
}

#[test]
fn track_event_ignores_error_status() {
    let (api, transport) = client();
    transport.respond("/api/analytics/track", 500, "{}");
    block_on(api.track_event("career_viewed", json!({})));
    assert_eq!(transport.calls.borrow().len(), 1);
}

#[test]
fn stats_default_to_zero_when_offline() {
    let (api, _transport) = client();
    assert_eq!(block_on(api.stats()), json!({ "views": 0, "users": 0, "conversions": 0 }));
}

#[test]
fn stats_use_remote_payload() {
    let (api, transport) = client();
    transport.respond("/api/analytics/stats", 200, r#"{"success":true,"data":{"views":3}}"#);
    assert_eq!(block_on(api.stats()), json!({ "views": 3 }));
}

#[test]
fn url_joins_base_and_endpoint() {
    let transport = Rc::new(MockTransport::new());
    let config = ClientConfig::instant().with_api_base("https://api.example.com/");
    let api = ApiClient::new(&config, transport);
    assert_eq!(api.url("/jobs"), "https://api.example.com/jobs");
}
