use anyhow::Result;
use chrono::Utc;
use poise::CreateReply;
use serenity::all::{CreateEmbed, Member};
use statcord_utils::discord::Colors;

use super::{presence, resolve_member};
use crate::{
    bot::Context,
    cards::{activity_card, ActivityView},
};

/// Show what a member is currently doing
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn activity(
    ctx: Context<'_>,
    #[description = "The member to show, defaults to you"] member: Option<Member>,
) -> Result<()> {
    let member = resolve_member(ctx, member).await?;
    let (_, activity) = presence(ctx, &member);

    let card = activity.as_ref().and_then(|activity| {
        activity_card(
            &ActivityView::from_activity(activity),
            member.display_name(),
            Utc::now(),
            CreateEmbed::new()
                .thumbnail(member.face())
                .color(Colors::Activity),
        )
    });

    let reply = match card {
        Some(card) => CreateReply::default().embed(card),
        None => CreateReply::default().content(format!(
            "**`{}`** is not currently doing anything.",
            member.user.tag()
        )),
    };

    ctx.send(reply).await?;

    Ok(())
}
