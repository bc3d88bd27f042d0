use anyhow::{Context, Result};
use classcal_core::gateway::{MAX_LIST_RESULTS, RemoteEvent};
use classcal_core::remote::protocol::ListEvents;
use google_calendar::types::OrderBy;

use crate::commands::authed_client;
use crate::convert::FromGoogle;
use crate::remote_config::GoogleRemoteConfig;

/// Expanded event instances ordered by start time, at most `max_results`.
///
/// One page is fetched. Google caps a page at 2500 events.
pub async fn handle(cmd: ListEvents) -> Result<Vec<RemoteEvent>> {
    let config = GoogleRemoteConfig::try_from(&cmd.remote_config)?;
    let client = authed_client(&config).await?;
    let limit = page_size(cmd.max_results);

    let response = client
        .events()
        .list(
            &config.google_calendar_id,
            "",
            0,
            limit,
            OrderBy::StartTime,
            "", // page token: first page only
            &[],
            "", // search query
            &[],
            false,
            false,
            true, // single events: required for ordering by start time
            "",
            "",
            "",
            "",
        )
        .await
        .context("Failed to fetch events")?;

    Ok(response
        .body
        .into_iter()
        .take(limit as usize)
        .map(RemoteEvent::from_google)
        .collect())
}

/// `maxResults` for the request, within what Google accepts.
fn page_size(max_results: u32) -> i64 {
    i64::from(max_results.clamp(1, MAX_LIST_RESULTS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_is_bounded() {
        assert_eq!(page_size(250), 250);
        assert_eq!(page_size(MAX_LIST_RESULTS), 2500);
        assert_eq!(page_size(1_000_000), 2500);
        // 0 would drop maxResults from the query and fall back to Google's default
        assert_eq!(page_size(0), 1);
    }
}
