use anyhow::{bail, Context, Result};
use log::debug;
use reqwest::{header::AUTHORIZATION, Client};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct StatsPayload {
    server_count: usize,
}

/// Reports the bot's guild count to a bot listing site.
#[derive(Clone)]
pub struct StatsManager {
    client: Client,
    base_url: String,
    token: String,
    bot_id: u64,
}

impl StatsManager {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>, bot_id: u64) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            bot_id,
        }
    }

    pub async fn set_active_count(&self, count: usize) -> Result<()> {
        let url = format!("{}/bots/{}/stats", self.base_url, self.bot_id);

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, &self.token)
            .json(&StatsPayload {
                server_count: count,
            })
            .send()
            .await
            .context("Failed to reach bot listing")?;

        let status = response.status();
        if !status.is_success() {
            bail!("Bot listing rejected guild count update with status {status}");
        }

        debug!("Reported {count} guilds to bot listing");

        Ok(())
    }
}
