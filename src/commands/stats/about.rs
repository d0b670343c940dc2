use anyhow::Result;
use chrono::Utc;
use log::warn;
use serenity::all::{CreateEmbed, CreateEmbedFooter, GuildId, UserId};
use statcord_storage::{Counter, Ranked};
use statcord_utils::{
    discord::Colors,
    time::{format_delta, DeltaFormat},
};
use sysinfo::{get_current_pid, ProcessesToUpdate, System};
use tokio::process::Command;

use crate::{bot::Context, pagination::paginate};

const MEDALS: [&str; 3] = ["🥇", "🥈", "🥉"];
const REVISION_FALLBACK: &str = "Could not fetch the latest revisions. Sorry.";

/// Show statistics and information about the bot
#[poise::command(prefix_command, slash_command, aliases("info"))]
pub async fn about(ctx: Context<'_>) -> Result<()> {
    let storage = ctx.data().tracker().storage();

    let messages = storage.counter(Counter::Messages).await?;
    let commands = storage.counter(Counter::Commands).await?;
    let top_commands = storage.top_commands(3).await?;
    let top_users = storage.top_users(3).await?;
    let top_guilds = storage.top_guilds(3).await?;

    let uptime = format_delta(Utc::now() - ctx.data().started_at(), DeltaFormat::Verbose);
    let (memory, cpu) = {
        let mut system = ctx.data().system().lock().await;
        process_usage(&mut system).unwrap_or((0.0, 0.0))
    };
    let ping = ctx
        .data()
        .ws_latency()
        .read()
        .await
        .average()
        .map(|ping| format!("{ping:.2} ms"))
        .unwrap_or_else(|| "N/A".to_string());

    let cache = ctx.cache();
    let avatar = cache.current_user().face();

    let mut links = format!(
        "**Useful Links:**\n[Source Code]({})\n",
        statcord_config::repository_url()
    );
    if let Some(support) = statcord_config::support_url() {
        links.push_str(&format!("[Support Server]({support})\n"));
    }

    let overview = CreateEmbed::new()
        .description(format!(
            "{links}\n\
             {} messages read with {} commands invoked in {} servers.\n\n\
             Currently up for {uptime}\n\n\
             Memory Usage   :  {memory:.2} MiB\n\
             CPU Usage          :  {cpu:.2} %\n\
             Avg Ping              : {ping}",
            thousands(messages),
            thousands(commands),
            cache.guild_count(),
        ))
        .thumbnail(avatar)
        .footer(CreateEmbedFooter::new(format!(
            "statcord v{}",
            env!("CARGO_PKG_VERSION")
        )))
        .color(Colors::About);

    let revisions = CreateEmbed::new()
        .title("Latest Revisions:")
        .description(latest_revisions().await)
        .color(Colors::About);

    let command_rows = top_commands
        .into_iter()
        .map(|Ranked { key, count }| (key, count))
        .collect::<Vec<_>>();

    let user_rows = top_users
        .into_iter()
        .map(|Ranked { key, count }| {
            let name = cache
                .user(UserId::new(key))
                .map(|user| user.tag())
                .unwrap_or_else(|| "N/A".to_string());
            (name, count)
        })
        .collect::<Vec<_>>();

    let guild_rows = top_guilds
        .into_iter()
        .map(|Ranked { key, count }| {
            let name = cache
                .guild(GuildId::new(key))
                .map(|guild| guild.name.clone())
                .unwrap_or_else(|| "N/A".to_string());
            (name, count)
        })
        .collect::<Vec<_>>();

    let command_stats = CreateEmbed::new()
        .title("Command Stats")
        .field("Top commands", podium(&command_rows), true)
        .field("Top command users (Users)", podium(&user_rows), false)
        .field("Top command users (Guilds)", podium(&guild_rows), true)
        .color(Colors::About);

    paginate(ctx, vec![overview, revisions, command_stats]).await
}

/// Resident memory in MiB and CPU usage in percent of the whole machine.
fn process_usage(system: &mut System) -> Option<(f64, f64)> {
    let pid = get_current_pid().ok()?;
    system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

    let process = system.process(pid)?;
    let cores = std::thread::available_parallelism().map_or(1, |n| n.get());

    Some((
        process.memory() as f64 / 1024.0 / 1024.0,
        process.cpu_usage() as f64 / cores as f64,
    ))
}

async fn latest_revisions() -> String {
    let format = format!(
        "--format=[`%h`]({}/commit/%H) %s (%cr)",
        statcord_config::repository_url()
    );

    let output = Command::new("git")
        .args(["log", "-5", &format])
        .current_dir(statcord_config::source_dir())
        .output()
        .await;

    match output {
        Ok(output) if output.status.success() => {
            let log = String::from_utf8_lossy(&output.stdout).trim().to_string();

            if log.is_empty() {
                REVISION_FALLBACK.to_string()
            } else {
                log
            }
        }
        Ok(output) => {
            warn!("git log exited with {}", output.status);
            REVISION_FALLBACK.to_string()
        }
        Err(why) => {
            warn!("Failed to run git log: {why}");
            REVISION_FALLBACK.to_string()
        }
    }
}

/// Top three entries with medals, padded with `N/A` when there are fewer.
fn podium(rows: &[(String, i64)]) -> String {
    MEDALS
        .iter()
        .enumerate()
        .map(|(rank, medal)| match rows.get(rank) {
            Some((name, count)) => format!("{medal} {name} ({count})"),
            None => format!("{medal} N/A"),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if value < 0 {
        grouped.insert(0, '-');
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn podium_uses_each_rows_own_count() {
        let rows = vec![
            ("profile".to_string(), 9),
            ("wsping".to_string(), 4),
            ("about".to_string(), 1),
        ];

        assert_eq!(
            podium(&rows),
            "🥇 profile (9)\n🥈 wsping (4)\n🥉 about (1)"
        );
    }

    #[test]
    fn podium_pads_missing_ranks() {
        let rows = vec![("profile".to_string(), 2)];

        assert_eq!(podium(&rows), "🥇 profile (2)\n🥈 N/A\n🥉 N/A");
    }

    #[test]
    fn thousands_separators() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(1234567), "1,234,567");
        assert_eq!(thousands(-12345), "-12,345");
    }
}
