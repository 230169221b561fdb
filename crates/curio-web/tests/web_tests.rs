use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;

use curio_core::testing::MockProvider;
use curio_core::{Error, PersonalizedContent};
use curio_web::queries::candidate_queries;
use curio_web::render::{NO_INPUT_WARNING, NO_RESULT_ERROR};
use curio_web::settings::crew_with_provider;
use curio_web::{router, AppState, Config};

const TRAVEL_QUERY: &str = "best travel destinations in europe";

const TRAVEL_REPLY: &str = r#"{
    "topic_overview": "Europe packs dozens of cultures into a short train ride.",
    "key_considerations": {"Budget": "Costs vary sharply between north and south."},
    "recent_trends": {"2024 trend": "Travellers are shifting to shoulder seasons."},
    "how_to_choose": {"Step 1": "Decide what kind of trip you want."},
    "additional_resources": {"Site A": "https://example.com/europe"},
    "conclusion": "Match the destination to season and budget."
}"#;

// ============= Helpers =============

fn create_test_server(mock: Arc<MockProvider>) -> TestServer {
    let crew = crew_with_provider(&Config::default(), mock);
    let state = AppState::new(crew, candidate_queries());
    TestServer::new(router(state)).expect("Failed to create test server")
}

fn section_titles(html: &str) -> Vec<String> {
    html.match_indices("<h3>")
        .map(|(i, _)| {
            let rest = &html[i + 4..];
            rest[..rest.find("</h3>").unwrap()].to_string()
        })
        .collect()
}

// ============= Page Tests =============

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server(Arc::new(MockProvider::new()));

    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_text("OK");
}

#[tokio::test]
async fn test_index_lists_all_queries() {
    let server = create_test_server(Arc::new(MockProvider::new()));

    let response = server.get("/").await;
    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("Personalized Content Generator"));
    assert_eq!(html.matches("<option ").count(), 20);
    assert!(html.contains("3d printing for beginners"));
    assert!(section_titles(&html).is_empty());
}

#[tokio::test]
async fn test_generate_renders_six_sections_in_order() {
    let mock = Arc::new(MockProvider::new());
    mock.queue_response(TRAVEL_REPLY);
    let server = create_test_server(Arc::clone(&mock));

    let response = server
        .post("/generate")
        .form(&[("query", TRAVEL_QUERY)])
        .await;
    response.assert_status_ok();
    let html = response.text();

    assert_eq!(
        section_titles(&html),
        vec![
            "Topic Overview",
            "Key Considerations",
            "Recent Trends",
            "How to Choose",
            "Additional Resources",
            "Conclusion"
        ]
    );
    // One row per key across the four mapping sections
    assert_eq!(html.matches("<div class=\"row\">").count(), 4);
    assert!(html.contains("<dt>Budget</dt><dd>Costs vary sharply between north and south.</dd>"));
    assert!(html.contains(&format!("<option value=\"{q}\" selected>{q}</option>", q = TRAVEL_QUERY)));

    assert_eq!(mock.request_count(), 1);
    let request = mock.last_request().unwrap();
    assert!(request.messages[1].content.contains(TRAVEL_QUERY));
}

#[tokio::test]
async fn test_empty_selection_warns_without_calling_model() {
    let mock = Arc::new(MockProvider::new());
    let server = create_test_server(Arc::clone(&mock));

    let response = server.post("/generate").form(&[("query", "  ")]).await;
    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("class=\"warning\""));
    assert!(html.contains(NO_INPUT_WARNING));

    let response = server
        .post("/generate")
        .form(&Vec::<(String, String)>::new())
        .await;
    response.assert_status_ok();
    assert!(response.text().contains(NO_INPUT_WARNING));

    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_model_failure_shows_error_text() {
    let mock = Arc::new(MockProvider::new());
    mock.queue_error(Error::api(503, "model overloaded"));
    let server = create_test_server(Arc::clone(&mock));

    let response = server
        .post("/generate")
        .form(&[("query", TRAVEL_QUERY)])
        .await;
    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("class=\"error\""));
    assert!(html.contains(
        "An error occurred during content generation: API error: model overloaded (status: 503)"
    ));
    assert!(section_titles(&html).is_empty());

    // The server keeps working after a failure
    mock.queue_response(TRAVEL_REPLY);
    let response = server
        .post("/generate")
        .form(&[("query", TRAVEL_QUERY)])
        .await;
    assert_eq!(section_titles(&response.text()).len(), 6);
}

#[tokio::test]
async fn test_incomplete_reply_renders_no_sections() {
    let mock = Arc::new(MockProvider::new());
    mock.queue_response(r#"{"topic_overview": "Only an overview", "conclusion": "Done"}"#);
    let server = create_test_server(mock);

    let response = server
        .post("/generate")
        .form(&[("query", TRAVEL_QUERY)])
        .await;
    let html = response.text();
    assert!(html.contains("class=\"error\""));
    assert!(html.contains("missing field"));
    assert!(section_titles(&html).is_empty());
}

#[tokio::test]
async fn test_blank_reply_shows_no_result_error() {
    let mock = Arc::new(MockProvider::new());
    mock.queue_response("");
    let server = create_test_server(mock);

    let response = server
        .post("/generate")
        .form(&[("query", TRAVEL_QUERY)])
        .await;
    assert!(response.text().contains(NO_RESULT_ERROR));
}

// ============= JSON API Tests =============

#[tokio::test]
async fn test_api_queries() {
    let server = create_test_server(Arc::new(MockProvider::new()));

    let response = server.get("/api/queries").await;
    response.assert_status_ok();
    let queries: Vec<String> = response.json();
    assert_eq!(queries, candidate_queries());
}

#[tokio::test]
async fn test_api_generate() {
    let mock = Arc::new(MockProvider::new());
    mock.queue_response(TRAVEL_REPLY);
    let server = create_test_server(mock);

    let response = server
        .post("/api/generate")
        .json(&json!({ "query": TRAVEL_QUERY }))
        .await;
    response.assert_status_ok();
    let content: PersonalizedContent = response.json();
    assert_eq!(content, PersonalizedContent::from_reply(TRAVEL_REPLY).unwrap());
}

#[tokio::test]
async fn test_api_generate_errors() {
    let mock = Arc::new(MockProvider::new());
    mock.queue_error(Error::network("connection reset"));
    let server = create_test_server(Arc::clone(&mock));

    let response = server
        .post("/api/generate")
        .json(&json!({ "query": "" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(mock.request_count(), 0);

    let response = server
        .post("/api/generate")
        .json(&json!({ "query": TRAVEL_QUERY }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["error"],
        "An error occurred during content generation: Network error: connection reset"
    );
}
