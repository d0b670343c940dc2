use anyhow::Result;
use serenity::all::Member;

use super::resolve_member;
use crate::bot::Context;

/// Show a member's avatar
#[poise::command(prefix_command, slash_command, guild_only, aliases("pfp", "ava"))]
pub async fn avatar(
    ctx: Context<'_>,
    #[description = "The member to show, defaults to you"] member: Option<Member>,
) -> Result<()> {
    let member = resolve_member(ctx, member).await?;

    ctx.say(member.face()).await?;

    Ok(())
}
