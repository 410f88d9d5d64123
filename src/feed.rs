use ureq::Agent;

use crate::Config;
use crate::error::{Error, Result};

/// Download the feed in one blocking request. Non-2xx statuses and timeouts are errors.
pub fn fetch(config: &Config) -> Result<Vec<u8>> {
    let agent = Agent::new_with_config(
        Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .build(),
    );
    let wrap = |source: ureq::Error| Error::Fetch {
        url: config.feed_url.clone(),
        source,
    };

    tracing::debug!(url = %config.feed_url, timeout = ?config.timeout, "fetching feed");
    let mut resp = agent
        .get(config.feed_url.as_str())
        .header("User-Agent", config.user_agent.as_str())
        .header("Accept", config.accept.as_str())
        .call()
        .map_err(wrap)?;
    let body = resp.body_mut().read_to_vec().map_err(wrap)?;
    tracing::debug!(status = %resp.status(), bytes = body.len(), "feed downloaded");
    Ok(body)
}
