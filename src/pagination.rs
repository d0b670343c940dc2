use anyhow::Result;
use poise::CreateReply;
use serenity::all::{
    ComponentInteractionCollector, CreateActionRow, CreateButton, CreateEmbed,
    CreateInteractionResponse, CreateInteractionResponseMessage,
};
use statcord_config::PAGINATION_TIMEOUT;

use crate::bot::Context;

/// Position in a list of pages, wrapping around at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PageCursor {
    index: usize,
    len: usize,
}

impl PageCursor {
    fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    fn next(&mut self) -> usize {
        self.index = (self.index + 1) % self.len;
        self.index
    }

    fn previous(&mut self) -> usize {
        self.index = self.index.checked_sub(1).unwrap_or(self.len - 1);
        self.index
    }
}

/// Show `pages` one at a time with previous/next buttons.
///
/// Buttons only react to this invocation and are removed once nobody has pressed one for a while.
pub async fn paginate(ctx: Context<'_>, pages: Vec<CreateEmbed>) -> Result<()> {
    let Some(first) = pages.first() else {
        return Ok(());
    };

    if pages.len() == 1 {
        ctx.send(CreateReply::default().embed(first.clone())).await?;
        return Ok(());
    }

    let ctx_id = ctx.id().to_string();
    let prev_id = format!("{ctx_id}prev");
    let next_id = format!("{ctx_id}next");

    let buttons = CreateActionRow::Buttons(vec![
        CreateButton::new(&prev_id).emoji('◀'),
        CreateButton::new(&next_id).emoji('▶'),
    ]);

    let handle = ctx
        .send(
            CreateReply::default()
                .embed(first.clone())
                .components(vec![buttons]),
        )
        .await?;

    let mut cursor = PageCursor::new(pages.len());

    while let Some(press) = ComponentInteractionCollector::new(ctx.serenity_context())
        .filter({
            let ctx_id = ctx_id.clone();
            move |press| press.data.custom_id.starts_with(&ctx_id)
        })
        .timeout(PAGINATION_TIMEOUT)
        .await
    {
        let index = if press.data.custom_id == next_id {
            cursor.next()
        } else if press.data.custom_id == prev_id {
            cursor.previous()
        } else {
            continue;
        };

        press
            .create_response(
                ctx.serenity_context(),
                CreateInteractionResponse::UpdateMessage(
                    CreateInteractionResponseMessage::new().embed(pages[index].clone()),
                ),
            )
            .await?;
    }

    // Timed out, leave the current page in place without buttons
    handle
        .edit(
            ctx,
            CreateReply::default()
                .embed(pages[cursor.index].clone())
                .components(vec![]),
        )
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_wraps_forward() {
        let mut cursor = PageCursor::new(3);

        assert_eq!(cursor.next(), 1);
        assert_eq!(cursor.next(), 2);
        assert_eq!(cursor.next(), 0);
    }

    #[test]
    fn cursor_wraps_backward() {
        let mut cursor = PageCursor::new(3);

        assert_eq!(cursor.previous(), 2);
        assert_eq!(cursor.previous(), 1);
        assert_eq!(cursor.next(), 2);
    }
}
