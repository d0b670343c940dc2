mod env;

use std::time::Duration;

use serenity::all::GatewayIntents;

/// Number of latency samples kept per history, and required before a chart is drawn.
pub const LATENCY_WINDOW: usize = 60;

/// How often the latency sampler records a new websocket and RTT sample.
pub const LATENCY_SAMPLE_INTERVAL: Duration = Duration::from_secs(60);

/// Logged messages are kept for this many days after they were sent.
pub const MESSAGE_LOG_TTL_DAYS: i64 = 14;

/// Delay between two sweeps of expired message log rows.
pub const EXPIRY_SWEEP_INTERVAL: Duration = Duration::from_secs(10_300);

/// Delay between two guild count reports to the bot listing.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(1000);

/// Idle time after which paginated replies stop reacting to buttons.
pub const PAGINATION_TIMEOUT: Duration = Duration::from_secs(120);

pub fn discord_token() -> &'static str {
    &env::DISCORD_TOKEN
}

pub fn discord_intents() -> GatewayIntents {
    GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_PRESENCES
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
}

pub fn prefix() -> &'static str {
    &env::COMMAND_PREFIX
}

pub fn data_dir() -> &'static str {
    &env::DATA_DIR
}

pub fn message_key() -> &'static str {
    &env::MESSAGE_KEY
}

pub fn listing_token() -> Option<&'static str> {
    env::DBL_TOKEN.as_deref()
}

pub fn listing_base_url() -> &'static str {
    &env::DBL_BASE_URL
}

pub fn legend_image() -> &'static str {
    &env::LEGEND_IMAGE
}

pub fn source_dir() -> &'static str {
    &env::SOURCE_DIR
}

pub fn repository_url() -> &'static str {
    &env::REPOSITORY_URL
}

pub fn support_url() -> Option<&'static str> {
    env::SUPPORT_URL.as_deref()
}
