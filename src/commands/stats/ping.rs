use anyhow::Result;
use chrono::Utc;
use log::error;
use poise::CreateReply;
use serenity::all::{CreateAttachment, CreateEmbed};
use statcord_charts::{render_latency_chart, LatencyStats};
use statcord_config::LATENCY_WINDOW;
use statcord_utils::discord::Colors;

use crate::bot::{Context, FrameworkError};

/// Draw the latency chart on the blocking pool.
async fn render_chart(name: &'static str, samples: Vec<f64>) -> Result<Vec<u8>> {
    let image = tokio::task::spawn_blocking(move || {
        let stats = LatencyStats::compute(&samples)?;
        render_latency_chart(name, &stats, Utc::now())
    })
    .await??;

    Ok(image)
}

/// WebSocket pings, shown as a pretty graph
#[poise::command(prefix_command, slash_command, user_cooldown = 45, on_error = on_error)]
pub async fn wsping(ctx: Context<'_>) -> Result<()> {
    let samples = ctx.data().ws_latency().read().await.snapshot();

    if samples.len() < LATENCY_WINDOW {
        let latency = ctx.ping().await;
        ctx.say(format!("WS Latency: **`{}`ms**", latency.as_millis()))
            .await?;

        return Ok(());
    }

    ctx.defer_or_broadcast().await?;

    let image = render_chart("Websocket", samples).await?;
    ctx.send(CreateReply::default().attachment(CreateAttachment::bytes(image, "wsping.png")))
        .await?;

    Ok(())
}

/// REST round trip times, shown as a pretty graph
#[poise::command(prefix_command, slash_command, user_cooldown = 45, on_error = on_error)]
pub async fn rttping(ctx: Context<'_>) -> Result<()> {
    let (samples, latest) = {
        let history = ctx.data().rtt().read().await;
        (history.snapshot(), history.latest())
    };

    let Some(latest) = latest else {
        ctx.say("No round trips have been measured yet, try again in a minute.")
            .await?;
        return Ok(());
    };

    if samples.len() < LATENCY_WINDOW {
        ctx.say(format!("Latest RTT: **`{latest:.2}`ms**")).await?;
        return Ok(());
    }

    ctx.defer_or_broadcast().await?;

    let image = render_chart("RTT", samples).await?;
    ctx.send(
        CreateReply::default()
            .content(format!("```ini\nLatest RTT: [{latest:.2}]ms\n```"))
            .attachment(CreateAttachment::bytes(image, "rttping.png")),
    )
    .await?;

    Ok(())
}

async fn on_error(error: FrameworkError<'_>) {
    match error {
        FrameworkError::Command { error, ctx, .. } => {
            error!("Failed to draw latency chart: {error}");

            _ = ctx
                .send(
                    CreateReply::default()
                        .embed(
                            CreateEmbed::new()
                                .description("An error occured whilst drawing the latency chart.")
                                .color(Colors::Error),
                        )
                        .ephemeral(true),
                )
                .await;
        }
        error => {
            if let Err(why) = poise::builtins::on_error(error).await {
                error!("Failed to handle framework error: {why}");
            }
        }
    }
}
