use std::time::Duration;

use reqwest::{Client, RequestBuilder};

use crate::calendar::calendar_error::{CalendarError, snippet};

const USER_AGENT: &str = concat!("news-blackout-bridge/", env!("CARGO_PKG_VERSION"));

/// Client shared by the calendar sources. Every request is bounded by `timeout`
/// and redirects are followed with reqwest's default policy.
pub fn build_client(timeout: Duration) -> Result<Client, CalendarError> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .pool_max_idle_per_host(2)
        .build()?;

    Ok(client)
}

/// Sends the request and returns the body text of a 200 response.
pub async fn fetch_text(request: RequestBuilder) -> Result<String, CalendarError> {
    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;

    if status != reqwest::StatusCode::OK {
        return Err(CalendarError::Status {
            status,
            snippet: snippet(&text),
        });
    }

    Ok(text)
}
