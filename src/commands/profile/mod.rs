mod activity;
mod avatar;
mod perms;
mod profile;
mod spotify;

pub use activity::*;
pub use avatar::*;
pub use perms::*;
pub use profile::*;
pub use spotify::*;

use anyhow::{Context as _, Result};
use serenity::all::{Activity, Member, OnlineStatus, Permissions};

use crate::bot::Context;

/// A member's permissions in the invoking channel and across the guild.
struct ResolvedPermissions {
    channel_name: String,
    channel: Permissions,
    guild: Permissions,
}

async fn resolve_member(ctx: Context<'_>, member: Option<Member>) -> Result<Member> {
    if let Some(member) = member {
        return Ok(member);
    }

    let author = ctx
        .author_member()
        .await
        .context("Invoking member is not available")?;

    Ok(author.into_owned())
}

/// Status and primary activity from the guild's presence cache.
fn presence(ctx: Context<'_>, member: &Member) -> (OnlineStatus, Option<Activity>) {
    let Some(guild) = ctx.guild() else {
        return (OnlineStatus::Offline, None);
    };

    match guild.presences.get(&member.user.id) {
        Some(presence) => (
            presence.status,
            crate::cards::primary_activity(&presence.activities).cloned(),
        ),
        None => (OnlineStatus::Offline, None),
    }
}

fn member_permissions(ctx: Context<'_>, member: &Member) -> Option<ResolvedPermissions> {
    let guild = ctx.guild()?;
    let guild_permissions = guild.member_permissions(member);

    // Threads aren't part of the channel list, fall back to guild wide permissions there
    let (channel_name, channel) = match guild.channels.get(&ctx.channel_id()) {
        Some(channel) => (
            channel.name.clone(),
            guild.user_permissions_in(channel, member),
        ),
        None => ("this thread".to_string(), guild_permissions),
    };

    Some(ResolvedPermissions {
        channel_name,
        channel,
        guild: guild_permissions,
    })
}

fn channel_name(ctx: Context<'_>) -> String {
    ctx.guild()
        .and_then(|guild| {
            guild
                .channels
                .get(&ctx.channel_id())
                .map(|channel| channel.name.clone())
        })
        .unwrap_or_else(|| "this thread".to_string())
}
