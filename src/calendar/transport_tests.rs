use std::collections::HashMap;
use std::time::Duration;

use axum::Router;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::routing::get;
use tokio::net::TcpListener;

use crate::calendar::calendar_error::CalendarError;
use crate::calendar::calendar_source::CalendarSource;
use crate::calendar::forex_factory::ForexFactorySource;
use crate::calendar::http::build_client;
use crate::calendar::trading_economics::TradingEconomicsSource;

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{addr}")
}

fn client() -> reqwest::Client {
    build_client(Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn trading_economics_sends_key_and_filters_rows() {
    let router = Router::new().route(
        "/calendar",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            if params.get("c").map(String::as_str) != Some("guest:guest")
                || params.get("f").map(String::as_str) != Some("json")
            {
                return (StatusCode::FORBIDDEN, "bad key".to_string());
            }

            (
                StatusCode::OK,
                r#"[
                    {"Event": "GDP Growth Rate QoQ", "Category": "GDP Growth Rate", "Importance": 3, "Date": "2026-10-29T12:30:00"},
                    {"Event": "Pending Home Sales", "Importance": 2, "Date": "2026-10-29T14:00:00"}
                ]"#
                .to_string(),
            )
        }),
    );
    let base = serve(router).await;
    let source =
        TradingEconomicsSource::new(client(), format!("{base}/calendar"), Some("guest:guest".into()));

    let events = source.fetch_high_impact_us_events().await.unwrap();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].title, "GDP Growth Rate QoQ");
}

#[tokio::test]
async fn upstream_error_status_carries_body_snippet() {
    let router = Router::new().route(
        "/calendar",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
    );
    let base = serve(router).await;
    let source = TradingEconomicsSource::new(client(), format!("{base}/calendar"), Some("k".into()));

    let err = source.fetch_high_impact_us_events().await.unwrap_err();

    match err {
        CalendarError::Status { status, snippet } => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(snippet, "upstream exploded");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn forex_factory_follows_redirects() {
    let router = Router::new()
        .route("/old.xml", get(|| async { Redirect::permanent("/week.xml") }))
        .route(
            "/week.xml",
            get(|| async {
                r#"<weeklyevents>
                    <event>
                        <title>CPI m/m</title>
                        <country>USD</country>
                        <date>10-14-2026</date>
                        <time>12:30pm</time>
                        <impact>High</impact>
                    </event>
                </weeklyevents>"#
            }),
        );
    let base = serve(router).await;
    let source = ForexFactorySource::new(client(), format!("{base}/old.xml"));

    let events = source.fetch_high_impact_us_events().await.unwrap();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].title, "CPI m/m");
}

#[tokio::test]
async fn hung_upstream_is_cut_off_by_timeout() {
    let router = Router::new().route(
        "/week.xml",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "<weeklyevents/>"
        }),
    );
    let base = serve(router).await;
    let http = build_client(Duration::from_millis(200)).unwrap();
    let source = ForexFactorySource::new(http, format!("{base}/week.xml"));

    let err = source.fetch_high_impact_us_events().await.unwrap_err();

    match err {
        CalendarError::Transport(error) => assert!(error.is_timeout()),
        other => panic!("expected transport timeout, got {other:?}"),
    }
}
