use anyhow::{Context as _, Result};
use log::info;
use poise::CreateReply;
use serenity::all::{CreateAttachment, CreateEmbed, EditProfile};
use statcord_utils::discord::Colors;

use crate::bot::Context;

/// Change the bot's avatar to the image at `url`
#[poise::command(prefix_command, owners_only, hide_in_help)]
pub async fn ca(ctx: Context<'_>, #[description = "Image URL"] url: String) -> Result<()> {
    let image = reqwest::get(&url)
        .await
        .and_then(|response| response.error_for_status())
        .context("Failed to download avatar")?
        .bytes()
        .await
        .context("Failed to read avatar")?;

    let avatar = CreateAttachment::bytes(image.to_vec(), "avatar.png");
    let mut user = ctx.cache().current_user().clone();

    user.edit(ctx, EditProfile::new().avatar(&avatar)).await?;

    info!("Avatar changed by {}", ctx.author().tag());
    ctx.send(
        CreateReply::default().embed(
            CreateEmbed::new()
                .description("Avatar updated.")
                .color(Colors::Success),
        ),
    )
    .await?;

    Ok(())
}
