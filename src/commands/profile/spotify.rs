use anyhow::Result;
use poise::CreateReply;
use serenity::all::{GuildId, Member};

use super::{presence, resolve_member};
use crate::{
    bot::Context,
    cards::{listener_card, primary_activity, ActivityView, SpotifyTrack},
    pagination::paginate,
};

fn spotify_track(view: ActivityView) -> Option<SpotifyTrack> {
    match view {
        ActivityView::Spotify(track) => Some(track),
        _ => None,
    }
}

/// Show what a member is listening to on Spotify
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    aliases("listening"),
    subcommands("guild")
)]
pub async fn spotify(
    ctx: Context<'_>,
    #[description = "The member to show, defaults to you"] member: Option<Member>,
) -> Result<()> {
    let member = resolve_member(ctx, member).await?;
    let (_, activity) = presence(ctx, &member);

    let Some(track) = activity
        .as_ref()
        .map(ActivityView::from_activity)
        .and_then(spotify_track)
    else {
        ctx.say(format!(
            "**`{}`** is not listening to Spotify with Discord integration!",
            member.user.tag()
        ))
        .await?;

        return Ok(());
    };

    let card = listener_card(&track, &member.user.tag(), &member.face());
    ctx.send(CreateReply::default().embed(card)).await?;

    Ok(())
}

/// Show everyone in a guild who is listening to Spotify
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn guild(
    ctx: Context<'_>,
    #[description = "ID of the guild, defaults to this one"] guild: Option<String>,
) -> Result<()> {
    let guild_id = match guild {
        Some(id) => id.trim().parse::<u64>().ok().filter(|id| *id != 0).map(GuildId::new),
        None => ctx.guild_id(),
    };

    let listeners = guild_id.and_then(|guild_id| {
        let guild = ctx.cache().guild(guild_id)?;

        let listeners = guild
            .presences
            .iter()
            .filter_map(|(user_id, presence)| {
                let track = primary_activity(&presence.activities)
                    .map(ActivityView::from_activity)
                    .and_then(spotify_track)?;
                let member = guild.members.get(user_id)?;

                Some((track, member.user.tag(), member.face()))
            })
            .collect::<Vec<_>>();

        Some(listeners)
    });

    let Some(listeners) = listeners else {
        ctx.say("Could not find a guild with that ID.").await?;
        return Ok(());
    };

    if listeners.is_empty() {
        ctx.say("No one in your guild is listening to Spotify with Discord.")
            .await?;
        return Ok(());
    }

    let pages = listeners
        .iter()
        .map(|(track, tag, avatar)| listener_card(track, tag, avatar))
        .collect();

    paginate(ctx, pages).await
}
