//! Integration tests for `ApiClient` using wiremock HTTP mocks.

use std::time::Duration;

use bizpulse_client::{ApiClient, ApiError, ChartKind, DashboardQuery, Tokens};
use bizpulse_core::{ChartFilters, Dimension, FilterSelection, Metric};
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> ApiClient {
    ApiClient::with_base_url(&format!("{base_url}/api/v1"), 30)
        .expect("client construction should not fail")
}

fn signed_in_client(base_url: &str) -> ApiClient {
    let client = test_client(base_url);
    client
        .session()
        .set(Tokens::new("old-token", Some("refresh-1".to_string())));
    client
}

fn overview_body() -> serde_json::Value {
    serde_json::json!({ "data": { "totalRevenue": 1500000.0, "growthRate": 4.2 } })
}

#[tokio::test]
async fn signin_stores_tokens() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/signin"))
        .and(body_json(serde_json::json!({ "email": "a@b.ie", "password": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": { "token": "access-1", "refreshToken": "refresh-1" }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client.signin("a@b.ie", "pw").await.expect("signin should succeed");

    assert_eq!(client.session().access_token().as_deref(), Some("access-1"));
    assert_eq!(client.session().refresh_token().as_deref(), Some("refresh-1"));
}

#[tokio::test]
async fn signin_rejection_carries_server_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/signin"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": { "message": "Invalid email or password" }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.signin("a@b.ie", "bad").await.unwrap_err();

    assert!(
        matches!(err, ApiError::Unauthorized(ref msg) if msg == "Invalid email or password"),
        "got: {err:?}"
    );
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn signup_sends_roles() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/signup"))
        .and(body_json(serde_json::json!({
            "email": "new@b.ie", "password": "pw", "roles": ["viewer", "admin"]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "data": { "token": "access-2", "refreshToken": "refresh-2" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client
        .signup("new@b.ie", "pw", &["viewer".to_string(), "admin".to_string()])
        .await
        .expect("signup should succeed");
    assert_eq!(client.session().access_token().as_deref(), Some("access-2"));
}

#[tokio::test]
async fn logout_clears_session_even_when_server_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in_client(&server.uri());
    client.logout().await;
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn requests_carry_bearer_token_and_strip_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/dashboard/overview"))
        .and(header("authorization", "Bearer old-token"))
        .and(query_param("period", "YTD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(overview_body()))
        .mount(&server)
        .await;

    let client = signed_in_client(&server.uri());
    let overview = client
        .overview(&DashboardQuery::from_filters(&FilterSelection::default()))
        .await
        .expect("should parse overview");

    assert!((overview.total_revenue - 1_500_000.0).abs() < f64::EPSILON);
    assert!((overview.growth_rate - 4.2).abs() < f64::EPSILON);
}

#[tokio::test]
async fn unrestricted_filters_are_not_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/dashboard/business-areas"))
        .and(query_param("period", "2024"))
        .and(query_param("channel", "Online"))
        .and(query_param_is_missing("businessArea"))
        .and(query_param_is_missing("month"))
        .and(query_param_is_missing("brand"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{ "name": "Food", "revenue": 100.0, "brands": ["Brillo"] }]
        })))
        .mount(&server)
        .await;

    let mut filters = FilterSelection::new();
    filters.set_period("2024");
    filters.set_channel("Online");

    let client = signed_in_client(&server.uri());
    let areas = client
        .business_areas(&DashboardQuery::from_filters(&filters))
        .await
        .expect("should parse business areas");

    assert_eq!(areas.len(), 1);
    assert_eq!(areas[0].brands, vec!["Brillo".to_string()]);
}

#[tokio::test]
async fn null_payload_decodes_as_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/dashboard/risk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": null })))
        .mount(&server)
        .await;

    let client = signed_in_client(&server.uri());
    let risk = client.risk(&DashboardQuery::new()).await.unwrap();
    assert!(risk.is_empty());
}

#[tokio::test]
async fn unauthorized_request_is_refreshed_and_replayed_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/dashboard/overview"))
        .and(header("authorization", "Bearer old-token"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/dashboard/overview"))
        .and(header("authorization", "Bearer new-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(overview_body()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .and(body_json(serde_json::json!({ "refreshToken": "refresh-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": { "token": "new-token", "refreshToken": "refresh-2" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in_client(&server.uri());
    let overview = client.overview(&DashboardQuery::new()).await;

    assert!(overview.is_ok(), "expected replay to succeed, got: {overview:?}");
    assert_eq!(client.session().access_token().as_deref(), Some("new-token"));
    assert_eq!(client.session().refresh_token().as_deref(), Some("refresh-2"));
}

#[tokio::test]
async fn concurrent_unauthorized_requests_share_one_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("authorization", "Bearer old-token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/dashboard/overview"))
        .and(header("authorization", "Bearer new-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(overview_body()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/dashboard/channels"))
        .and(header("authorization", "Bearer new-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": [] })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "data": { "token": "new-token" } }))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in_client(&server.uri());
    let query = DashboardQuery::new();
    let (overview, channels, again) = tokio::join!(
        client.overview(&query),
        client.channels(&query),
        client.overview(&query),
    );

    assert!(overview.is_ok(), "overview: {overview:?}");
    assert!(channels.is_ok(), "channels: {channels:?}");
    assert!(again.is_ok(), "second overview: {again:?}");
    // refresh token is kept when the server does not rotate it
    assert_eq!(client.session().refresh_token().as_deref(), Some("refresh-1"));
}

#[tokio::test]
async fn second_unauthorized_after_refresh_expires_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/dashboard/overview"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": { "token": "new-token", "refreshToken": "refresh-2" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in_client(&server.uri());
    let err = client.overview(&DashboardQuery::new()).await.unwrap_err();

    assert!(matches!(err, ApiError::SessionExpired), "got: {err:?}");
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn failed_refresh_clears_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/dashboard/variance"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": { "message": "Refresh token expired" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in_client(&server.uri());
    let err = client.variance(&DashboardQuery::new()).await.unwrap_err();

    assert!(matches!(err, ApiError::SessionExpired), "got: {err:?}");
    assert!(err.requires_login());
    assert!(client.session().tokens().is_none());
}

#[tokio::test]
async fn too_many_requests_maps_to_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/dashboard/performance-data"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .mount(&server)
        .await;

    let client = signed_in_client(&server.uri());
    let err = client
        .performance_data(&DashboardQuery::new())
        .await
        .unwrap_err();

    assert!(
        matches!(err, ApiError::RateLimited { retry_after_secs: Some(7) }),
        "got: {err:?}"
    );
    assert_eq!(
        err.user_message(),
        "Too many requests. Please wait a moment and try again."
    );
}

#[tokio::test]
async fn server_error_surfaces_status_and_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/dashboard/categories"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "error": { "message": "database unavailable" }
        })))
        .mount(&server)
        .await;

    let client = signed_in_client(&server.uri());
    let err = client.categories(&DashboardQuery::new()).await.unwrap_err();

    match err {
        ApiError::UnexpectedStatus {
            status, message, ..
        } => {
            assert_eq!(status, 500);
            assert_eq!(message, "database unavailable");
        }
        other => panic!("expected UnexpectedStatus, got: {other:?}"),
    }
}

#[tokio::test]
async fn top_performers_sends_dimension_and_window() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/dashboard/top-performers"))
        .and(query_param("dimension", "ProdConcat"))
        .and(query_param("metric", "gSales"))
        .and(query_param("limit", "20"))
        .and(query_param("offset", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {
                "data": [{ "name": "SKU-1", "value": 5000.0, "growth": -2.0 }],
                "pagination": { "total": 21, "limit": 20, "offset": 20,
                                "hasMore": false, "totalPages": 2, "currentPage": 2 }
            }
        })))
        .mount(&server)
        .await;

    let client = signed_in_client(&server.uri());
    let page = client
        .top_performers(
            &DashboardQuery::new()
                .dimension(Dimension::Sku)
                .metric(Metric::GSales)
                .limit(20)
                .offset(20),
        )
        .await
        .expect("should parse top performers");

    assert_eq!(page.data.len(), 1);
    assert_eq!(page.pagination.current_page, 2);
    assert_eq!(page.pagination.total_pages, 2);
}

#[tokio::test]
async fn filter_options_send_year_and_skip_all_business_area() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/dashboard/filter-options"))
        .and(query_param("year", "2025"))
        .and(query_param_is_missing("businessArea"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": { "years": [2024, 2025], "businessAreas": ["Food"] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in_client(&server.uri());
    let options = client
        .filter_options(Some(2025), Some("All"))
        .await
        .expect("should parse filter options");

    assert_eq!(options.years, vec![2024, 2025]);
    assert_eq!(options.business_areas, vec!["Food".to_string()]);
    assert!(options.channels.is_empty());
}

#[tokio::test]
async fn chart_posts_multi_select_filters_and_parses_year_columns() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/dashboard/gsales-by-channel"))
        .and(body_json(serde_json::json!({
            "year": ["2024", "2025"],
            "month": ["Jan", "Feb", "Mar", "Apr", "May", "Jun",
                      "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"],
            "business": ["Food"],
            "channel": ["Convenience", "Grocery", "International", "Online",
                        "Sports & Others", "Wholesale"],
            "brand": ["Asda", "Babykind", "Bensons", "Bonne Maman", "Brillo",
                      "BV Honey", "Koka", "McDonnells"],
            "category": ["Pickles", "Plastic sacks", "Polish", "Pots", "Preserves",
                         "Protein Bar", "Protein Milk", "Shopping bags", "Snacking"],
            "customer": ["Aldi ROI", "Amazon", "Australia", "Austria", "Bahrain",
                         "Barry Group", "Belgium", "BWG", "Canada"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "channel": "Online", "2023": 10.0, "2024": 20.0, "2025": 30.0 },
            { "channel": "International", "2024": 5.0 }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut filters = ChartFilters::new();
    filters.year = vec!["2024".to_string(), "2025".to_string()];
    filters.business = vec!["Food".to_string()];

    let client = signed_in_client(&server.uri());
    let rows = client
        .chart(ChartKind::GSalesByChannel, &filters)
        .await
        .expect("should parse chart rows");

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].label, "Online");
    assert!((rows[0].value("2025") - 30.0).abs() < f64::EPSILON);
    assert!(rows[1].value("2023").abs() < f64::EPSILON);
}

#[tokio::test]
async fn data_health_is_returned_untyped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/dashboard/data-health"))
        .and(header("authorization", "Bearer old-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": { "lastLoad": "2025-06-01T04:00:00Z", "rowCount": 48213 }
        })))
        .mount(&server)
        .await;

    let client = signed_in_client(&server.uri());
    let report = client.data_health().await.expect("should return the report");
    assert_eq!(report["rowCount"], 48213);
    assert_eq!(report["lastLoad"], "2025-06-01T04:00:00Z");
}

#[tokio::test]
async fn admin_users_are_unwrapped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": { "users": [{
                "id": "9f1c2a7e-0000", "email": "admin@b.ie", "roles": ["admin"],
                "createdAt": "2024-01-05T09:00:00Z", "updatedAt": "2024-02-01T09:00:00Z"
            }] }
        })))
        .mount(&server)
        .await;

    let client = signed_in_client(&server.uri());
    let users = client.users().await.expect("should parse users");
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email, "admin@b.ie");
}

#[tokio::test]
async fn health_probe_uses_origin_without_auth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let report = client.health().await.expect("health should succeed");
    assert_eq!(report.status.as_deref(), Some("ok"));
}
