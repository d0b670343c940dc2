use serenity::all::{Colour, CreateEmbed, CreateEmbedFooter, Permissions};
use statcord_utils::permissions::{PermissionScope, PermissionSummary};

/// Longest value Discord accepts in an embed field.
const FIELD_LIMIT: usize = 1024;

/// Who the permissions belong to, and where they were resolved.
pub struct PermissionSubject<'a> {
    pub name: &'a str,
    pub colour: Option<Colour>,
    pub channel_name: &'a str,
}

/// Channel permission card, followed by a guild permission card when `guild` is known.
///
/// `previous` names the card shown before these, for the footer hint.
pub fn permission_cards(
    subject: &PermissionSubject<'_>,
    channel: Permissions,
    guild: Option<Permissions>,
    previous: Option<&str>,
) -> Vec<CreateEmbed> {
    let channel_summary = PermissionSummary::evaluate(channel, PermissionScope::Channel);

    let mut channel_card = summary_card(
        CreateEmbed::new()
            .title(format!("Channel Permissions for {}", subject.name))
            .description(format!("Channel: **`{}`**\n", subject.channel_name)),
        &channel_summary,
        subject.colour,
    );

    let Some(guild) = guild else {
        return vec![channel_card];
    };

    let footer = match previous {
        Some(previous) => format!("<< {previous} | Guild Permissions >>"),
        None => "Guild Permissions >>".to_string(),
    };
    channel_card = channel_card.footer(CreateEmbedFooter::new(footer));

    let guild_card = summary_card(
        CreateEmbed::new()
            .title(format!("Guild Permissions for {}", subject.name))
            .footer(CreateEmbedFooter::new("<< Channel Permissions")),
        &PermissionSummary::evaluate(guild, PermissionScope::Guild),
        subject.colour,
    );

    vec![channel_card, guild_card]
}

fn summary_card(
    mut embed: CreateEmbed,
    summary: &PermissionSummary,
    colour: Option<Colour>,
) -> CreateEmbed {
    if let Some(colour) = colour {
        embed = embed.colour(colour);
    }

    embed
        .field("Allowed", fit(summary.allowed_block()), true)
        .field("Denied", fit(summary.denied_block()), true)
}

fn fit(mut value: String) -> String {
    if value.len() > FIELD_LIMIT {
        let mut end = FIELD_LIMIT - 3;
        while !value.is_char_boundary(end) {
            end -= 1;
        }

        value.truncate(end);
        value.push_str("...");
    }

    value
}
