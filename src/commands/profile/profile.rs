use anyhow::Result;
use chrono::Utc;
use serenity::all::Member;
use statcord_utils::time::to_utc;

use super::{member_permissions, presence, resolve_member};
use crate::{
    bot::Context,
    cards::{
        activity_base, activity_card, kind_name, permission_cards, profile_card, ActivityView,
        PermissionSubject, ProfileInfo,
    },
    pagination::paginate,
};

/// Show profile information for a member, including activity and permissions
#[poise::command(prefix_command, slash_command, guild_only, aliases("userinfo"))]
pub async fn profile(
    ctx: Context<'_>,
    #[description = "The member to show, defaults to you"] member: Option<Member>,
) -> Result<()> {
    let member = resolve_member(ctx, member).await?;
    let (status, activity) = presence(ctx, &member);
    let avatar_url = member.face();

    let activity_page = activity.as_ref().and_then(|activity| {
        activity_card(
            &ActivityView::from_activity(activity),
            member.display_name(),
            Utc::now(),
            activity_base(&avatar_url),
        )
    });

    let info = ProfileInfo {
        tag: member.user.tag(),
        id: member.user.id.get(),
        mention: format!("<@{}>", member.user.id),
        display_name: member.display_name().to_string(),
        avatar_url: avatar_url.clone(),
        created_at: to_utc(member.user.created_at()),
        joined_at: member.joined_at.map(to_utc),
        status,
        top_role: member
            .highest_role_info(ctx.cache())
            .map(|(role, _)| format!("<@&{role}>")),
        colour: member.colour(ctx.cache()),
        activity: activity
            .as_ref()
            .map(|activity| (kind_name(activity.kind), activity.name.clone())),
    };

    let mut pages = vec![profile_card(&info, activity_page.is_some())];

    let previous = match activity_page {
        Some(page) => {
            pages.push(page);
            "Current Activity Info"
        }
        None => "Member Info",
    };

    if let Some(permissions) = member_permissions(ctx, &member) {
        let subject = PermissionSubject {
            name: &member.user.name,
            colour: info.colour,
            channel_name: &permissions.channel_name,
        };

        pages.extend(permission_cards(
            &subject,
            permissions.channel,
            Some(permissions.guild),
            Some(previous),
        ));
    }

    paginate(ctx, pages).await
}
