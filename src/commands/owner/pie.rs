use std::path::Path;

use anyhow::Result;
use poise::CreateReply;
use serenity::all::{CreateAttachment, OnlineStatus};
use statcord_charts::{render_status_pie, ChartError, StatusBreakdown};

use crate::bot::Context;

/// Tally presence statuses, counting invisible members as offline.
fn tally(statuses: impl IntoIterator<Item = OnlineStatus>) -> StatusBreakdown {
    let mut breakdown = StatusBreakdown::default();

    for status in statuses {
        match status {
            OnlineStatus::Online => breakdown.online += 1,
            OnlineStatus::DoNotDisturb => breakdown.dnd += 1,
            OnlineStatus::Idle => breakdown.idle += 1,
            _ => breakdown.offline += 1,
        }
    }

    breakdown
}

/// Pie chart of member statuses across every cached guild
#[poise::command(prefix_command, slash_command, owners_only, aliases("piestatus"))]
pub async fn ps(ctx: Context<'_>) -> Result<()> {
    let cache = ctx.cache();

    let statuses = cache
        .guilds()
        .into_iter()
        .filter_map(|guild_id| {
            let guild = cache.guild(guild_id)?;

            // Members without a presence are offline
            Some(
                guild
                    .members
                    .keys()
                    .map(|user_id| {
                        guild
                            .presences
                            .get(user_id)
                            .map_or(OnlineStatus::Offline, |presence| presence.status)
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .flatten()
        .collect::<Vec<_>>();

    let breakdown = tally(statuses);

    ctx.defer_or_broadcast().await?;

    let legend = Path::new(statcord_config::legend_image());
    let rendered =
        tokio::task::spawn_blocking(move || render_status_pie(&breakdown, legend)).await?;

    match rendered {
        Ok(image) => {
            ctx.send(
                CreateReply::default().attachment(CreateAttachment::bytes(image, "pie_status.png")),
            )
            .await?;
        }
        Err(ChartError::EmptyPie) => {
            ctx.say("There are no cached members to chart yet.").await?;
        }
        Err(why) => return Err(why.into()),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn invisible_counts_as_offline() {
        let breakdown = tally([
            OnlineStatus::Online,
            OnlineStatus::Online,
            OnlineStatus::Invisible,
            OnlineStatus::Offline,
            OnlineStatus::DoNotDisturb,
            OnlineStatus::Idle,
        ]);

        assert_eq!(
            breakdown,
            StatusBreakdown {
                online: 2,
                offline: 2,
                dnd: 1,
                idle: 1,
            }
        );
    }
}
