use std::sync::Arc;

use anyhow::{Error, Result};
use chrono::{DateTime, Utc};
use log::{error, info};
use poise::{Framework, FrameworkOptions, PrefixFrameworkOptions};
use serenity::all::{Context as SerenityContext, Ready};
use statcord_charts::LatencyHistory;
use statcord_config::{EXPIRY_SWEEP_INTERVAL, LATENCY_WINDOW};
use statcord_storage::{CommandRecord, UsageTracker};
use statcord_utils::task::{supervise, ExponentialBackoff, FailurePolicy};
use sysinfo::System;
use tokio::sync::{Mutex, RwLock};

use crate::{commands, events, latency};

pub type Context<'a> = poise::Context<'a, Data, Error>;
pub type FrameworkError<'a> = poise::FrameworkError<'a, Data, Error>;

pub struct Data {
    tracker: UsageTracker,
    ws_latency: Arc<RwLock<LatencyHistory>>,
    rtt: Arc<RwLock<LatencyHistory>>,
    started_at: DateTime<Utc>,
    system: Mutex<System>,
}

impl Data {
    pub fn new(tracker: UsageTracker) -> Self {
        Self {
            tracker,
            ws_latency: Arc::new(RwLock::new(LatencyHistory::new(LATENCY_WINDOW))),
            rtt: Arc::new(RwLock::new(LatencyHistory::new(LATENCY_WINDOW))),
            started_at: Utc::now(),
            system: Mutex::new(System::new()),
        }
    }

    pub fn tracker(&self) -> &UsageTracker {
        &self.tracker
    }

    /// Websocket heartbeat latency, in milliseconds
    pub fn ws_latency(&self) -> &RwLock<LatencyHistory> {
        &self.ws_latency
    }

    /// REST round trip time, in milliseconds
    pub fn rtt(&self) -> &RwLock<LatencyHistory> {
        &self.rtt
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn system(&self) -> &Mutex<System> {
        &self.system
    }
}

pub async fn setup(
    ctx: &SerenityContext,
    ready: &Ready,
    framework: &Framework<Data, Error>,
    tracker: UsageTracker,
) -> Result<Data> {
    info!("Successfully logged in as {}", ready.user.name);

    poise::builtins::register_globally(ctx, &framework.options().commands).await?;

    let data = Data::new(tracker);

    latency::spawn_sampler(
        ctx.clone(),
        framework.shard_manager().clone(),
        data.ws_latency.clone(),
        data.rtt.clone(),
    );

    let tracker = data.tracker.clone();
    tokio::spawn(async move {
        supervise(
            "Message log sweep",
            EXPIRY_SWEEP_INTERVAL,
            FailurePolicy::Retry(ExponentialBackoff::default()),
            move || {
                let tracker = tracker.clone();
                async move { tracker.sweep_expired(Utc::now()).await.map(|_| ()) }
            },
        )
        .await
    });

    #[cfg(feature = "stats")]
    spawn_heartbeat(ctx, ready);

    Ok(data)
}

/// Report the guild count to the bot listing, when a listing token is configured.
#[cfg(feature = "stats")]
fn spawn_heartbeat(ctx: &SerenityContext, ready: &Ready) {
    let Some(token) = statcord_config::listing_token() else {
        info!("No bot listing token configured, not reporting guild count");
        return;
    };

    let stats = statcord_stats::StatsManager::new(
        statcord_config::listing_base_url(),
        token,
        ready.user.id.get(),
    );
    let cache = ctx.cache.clone();

    tokio::spawn(async move {
        supervise(
            "Bot listing heartbeat",
            statcord_config::HEARTBEAT_INTERVAL,
            FailurePolicy::Ignore,
            move || {
                let stats = stats.clone();
                let count = cache.guild_count();

                async move { stats.set_active_count(count).await }
            },
        )
        .await
    });
}

pub fn framework_opts() -> FrameworkOptions<Data, Error> {
    FrameworkOptions {
        commands: vec![
            commands::profile::profile(),
            commands::profile::spotify(),
            commands::profile::activity(),
            commands::profile::avatar(),
            commands::profile::perms(),
            commands::stats::wsping(),
            commands::stats::rttping(),
            commands::stats::linecount(),
            commands::stats::about(),
            commands::owner::ps(),
            commands::owner::ca(),
        ],
        prefix_options: PrefixFrameworkOptions {
            prefix: Some(statcord_config::prefix().to_string()),
            ..Default::default()
        },
        post_command: |ctx| Box::pin(post_command(ctx)),
        event_handler: |ctx, event, framework, data| {
            Box::pin(events::event_handler(ctx, event, framework, data))
        },
        on_error: |error| Box::pin(on_error(error)),
        ..Default::default()
    }
}

async fn post_command(ctx: Context<'_>) {
    let record = CommandRecord {
        name: ctx.command().qualified_name.clone(),
        invoked_at: Utc::now(),
        guild_id: ctx.guild_id().map(|id| id.get()),
        user_id: ctx.author().id.get(),
        channel_id: ctx.channel_id().get(),
    };

    if let Err(why) = ctx.data().tracker().on_command_completed(&record).await {
        error!("Failed to record command '{}': {why}", record.name);
    }
}

async fn on_error(error: FrameworkError<'_>) {
    if let FrameworkError::Command { error, ctx, .. } = &error {
        error!(
            "Command '{}' failed: {error:?}",
            ctx.command().qualified_name
        );
    }

    if let Err(why) = poise::builtins::on_error(error).await {
        error!("Failed to handle framework error: {why}");
    }
}
