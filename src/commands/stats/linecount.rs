use std::path::Path;

use anyhow::Result;
use statcord_utils::source::count_lines;

use crate::bot::Context;

/// Count the lines of source code behind the bot, or behind one command or module
#[poise::command(prefix_command, slash_command)]
pub async fn linecount(
    ctx: Context<'_>,
    #[description = "A command or module name"] target: Option<String>,
) -> Result<()> {
    let root = Path::new(statcord_config::source_dir());

    let (target, counted) = tokio::task::spawn_blocking(move || -> Result<_> {
        // Unknown targets fall back to the total
        if let Some(target) = target {
            let count = count_lines(root, Some(&target))?;
            if count.files > 0 {
                return Ok((Some(target), count));
            }
        }

        Ok((None, count_lines(root, None)?))
    })
    .await??;

    let content = match target {
        Some(target) => format!("**{target} Lines:** `{}`", counted.lines),
        None => format!("**Total Lines:** `{}`", counted.lines),
    };

    ctx.say(content).await?;

    Ok(())
}
