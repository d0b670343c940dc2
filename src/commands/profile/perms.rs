use anyhow::Result;
use serenity::all::{Member, Role};

use super::{channel_name, member_permissions, resolve_member};
use crate::{
    bot::Context,
    cards::{permission_cards, PermissionSubject},
    pagination::paginate,
};

/// Display permissions for a member or a role
#[poise::command(prefix_command, slash_command, guild_only, aliases("permissions"))]
pub async fn perms(
    ctx: Context<'_>,
    #[description = "The member to show, defaults to you"] member: Option<Member>,
    #[description = "Show a role instead of a member"] role: Option<Role>,
) -> Result<()> {
    if let Some(role) = role {
        let channel_name = channel_name(ctx);
        let subject = PermissionSubject {
            name: &role.name,
            colour: Some(role.colour),
            channel_name: &channel_name,
        };

        return paginate(ctx, permission_cards(&subject, role.permissions, None, None)).await;
    }

    let member = resolve_member(ctx, member).await?;
    let Some(permissions) = member_permissions(ctx, &member) else {
        ctx.say("Could not resolve permissions outside of a cached guild.")
            .await?;
        return Ok(());
    };

    let subject = PermissionSubject {
        name: &member.user.name,
        colour: member.colour(ctx.cache()),
        channel_name: &permissions.channel_name,
    };

    paginate(
        ctx,
        permission_cards(
            &subject,
            permissions.channel,
            Some(permissions.guild),
            None,
        ),
    )
    .await
}
