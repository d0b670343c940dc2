use chrono::{DateTime, Utc};
use serenity::all::{Colour, CreateEmbed, CreateEmbedFooter, OnlineStatus};
use statcord_utils::discord::status_indicator;

const DATE_FORMAT: &str = "%d %b, %Y @ %H:%M";

pub struct ProfileInfo {
    pub tag: String,
    pub id: u64,
    pub mention: String,
    pub display_name: String,
    pub avatar_url: String,
    pub created_at: DateTime<Utc>,
    pub joined_at: Option<DateTime<Utc>>,
    pub status: OnlineStatus,
    /// Mention of the member's highest role
    pub top_role: Option<String>,
    pub colour: Option<Colour>,
    /// Kind and name of the current activity, e.g. `("Playing", "Factorio")`
    pub activity: Option<(&'static str, String)>,
}

/// The member info card, always the first page of a profile.
pub fn profile_card(info: &ProfileInfo, has_activity_card: bool) -> CreateEmbed {
    let joined = info
        .joined_at
        .map(|joined| joined.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    let mut embed = CreateEmbed::new()
        .title(format!("Profile for {}", info.tag))
        .description(format!(
            "```ini\nID      : {}\nCREATED : [{}]\nJOINED  : [{}]\n```",
            info.id,
            info.created_at.format(DATE_FORMAT),
            joined
        ))
        .thumbnail(&info.avatar_url)
        .field("Display Name", &info.display_name, true)
        .field(
            "Status",
            format!(
                "{} **`{}`**",
                status_indicator(info.status),
                info.status.name()
            ),
            true,
        )
        .field(
            "Top Role",
            info.top_role.as_deref().unwrap_or("@everyone"),
            true,
        )
        .field("Profile", &info.mention, true);

    if let Some(colour) = info.colour {
        embed = embed.colour(colour);
    }

    if let Some((kind, name)) = &info.activity {
        embed = embed.field("Activity", format!("**`{kind}` | **{name}"), true);
    }

    let footer = if has_activity_card {
        "Current Activity Info >>"
    } else {
        "Channel Permissions >>"
    };

    embed.footer(CreateEmbedFooter::new(footer))
}

/// Base for the activity page of a profile.
pub fn activity_base(avatar_url: &str) -> CreateEmbed {
    CreateEmbed::new()
        .thumbnail(avatar_url)
        .footer(CreateEmbedFooter::new(
            "<< Member Info | Channel Permissions >>",
        ))
}
