use chrono::{DateTime, TimeDelta, Utc};
use serenity::all::{
    Activity, ActivityType, ApplicationId, CreateEmbed, CreateEmbedAuthor, CreateEmbedFooter,
};
use statcord_utils::{
    discord::Colors,
    time::{format_delta, DeltaFormat},
};

pub const SPOTIFY_ICON: &str = "https://www.scdn.co/i/_global/favicon.png";

/// A track someone is listening to through the Spotify integration.
#[derive(Debug, Clone, PartialEq)]
pub struct SpotifyTrack {
    pub title: String,
    pub artists: Vec<String>,
    pub album: Option<String>,
    pub cover_url: Option<String>,
    pub duration: Option<TimeDelta>,
    pub track_id: Option<String>,
}

/// A game or other running application.
#[derive(Debug, Clone, PartialEq)]
pub struct GameActivity {
    pub name: String,
    pub details: Option<String>,
    pub state: Option<String>,
    /// Current and maximum party size
    pub party: Option<[u32; 2]>,
    pub large_image: Option<String>,
    pub small_image: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActivityView {
    Spotify(SpotifyTrack),
    Playing(GameActivity),
    /// Anything else, which gets no card of its own
    Unknown,
}

impl ActivityView {
    pub fn from_activity(activity: &Activity) -> Self {
        match activity.kind {
            ActivityType::Listening if is_spotify(activity) => Self::Spotify(spotify_track(activity)),
            ActivityType::Playing => Self::Playing(game_activity(activity)),
            _ => Self::Unknown,
        }
    }
}

/// The activity shown for a member: the first one that isn't a custom status.
pub fn primary_activity(activities: &[Activity]) -> Option<&Activity> {
    activities
        .iter()
        .find(|activity| activity.kind != ActivityType::Custom)
}

pub fn kind_name(kind: ActivityType) -> &'static str {
    match kind {
        ActivityType::Playing => "Playing",
        ActivityType::Streaming => "Streaming",
        ActivityType::Listening => "Listening",
        ActivityType::Watching => "Watching",
        ActivityType::Competing => "Competing",
        ActivityType::Custom => "Custom",
        _ => "Unknown",
    }
}

fn is_spotify(activity: &Activity) -> bool {
    activity.name == "Spotify" && activity.sync_id.is_some()
}

fn spotify_track(activity: &Activity) -> SpotifyTrack {
    let assets = activity.assets.as_ref();
    let timestamps = activity.timestamps.as_ref();

    let duration = timestamps
        .and_then(|ts| Some((ts.start?, ts.end?)))
        .filter(|(start, end)| end >= start)
        .map(|(start, end)| TimeDelta::milliseconds((end - start) as i64));

    SpotifyTrack {
        title: activity.details.clone().unwrap_or_default(),
        artists: activity
            .state
            .as_deref()
            .map(|state| state.split("; ").map(str::to_string).collect())
            .unwrap_or_default(),
        album: assets.and_then(|assets| assets.large_text.clone()),
        cover_url: assets
            .and_then(|assets| assets.large_image.as_deref())
            .and_then(|image| image.strip_prefix("spotify:"))
            .map(|id| format!("https://i.scdn.co/image/{id}")),
        duration,
        track_id: activity.sync_id.clone(),
    }
}

fn game_activity(activity: &Activity) -> GameActivity {
    let assets = activity.assets.as_ref();
    let image = |key: Option<&String>| key.and_then(|key| asset_url(activity.application_id, key));

    GameActivity {
        name: activity.name.clone(),
        details: activity.details.clone(),
        state: activity.state.clone(),
        party: activity.party.as_ref().and_then(|party| party.size),
        large_image: image(assets.and_then(|assets| assets.large_image.as_ref())),
        small_image: image(assets.and_then(|assets| assets.small_image.as_ref())),
        started_at: activity
            .timestamps
            .as_ref()
            .and_then(|ts| ts.start)
            .and_then(|start| DateTime::from_timestamp_millis(start as i64)),
    }
}

fn asset_url(application_id: Option<ApplicationId>, key: &str) -> Option<String> {
    if let Some(external) = key.strip_prefix("mp:") {
        return Some(format!("https://media.discordapp.net/{external}"));
    }

    application_id.map(|id| format!("https://cdn.discordapp.com/app-assets/{id}/{key}.png"))
}

pub fn spotify_card(track: &SpotifyTrack, mut embed: CreateEmbed) -> CreateEmbed {
    if let Some(cover) = &track.cover_url {
        embed = embed.image(cover);
    }

    embed = embed
        .title(&track.title)
        .description(format!("by **`{}`**.", track.artists.join(", ")))
        .color(Colors::Spotify);

    if let Some(album) = &track.album {
        embed = embed.field("Album", album, true);
    }

    if let Some(duration) = track.duration {
        embed = embed.field("Duration", format_delta(duration, DeltaFormat::Brief), true);
    }

    if let Some(id) = &track.track_id {
        embed = embed.field(
            "Open in Spotify",
            format!("[Play now!](https://open.spotify.com/track/{id})"),
            true,
        );
    }

    embed
}

pub fn game_card(
    game: &GameActivity,
    display_name: &str,
    now: DateTime<Utc>,
    mut embed: CreateEmbed,
) -> CreateEmbed {
    if let Some(icon) = &game.small_image {
        embed = embed.author(CreateEmbedAuthor::new(display_name).icon_url(icon));
    }

    if let Some(image) = &game.large_image {
        embed = embed.image(image);
    }

    let lines = [game.details.clone(), game.state.clone()];
    let mut description = lines.into_iter().flatten().collect::<Vec<_>>().join("\n");

    if let Some([size, max]) = game.party {
        description.push_str(&format!(" ({size} of {max})"));
    }

    if !description.trim().is_empty() {
        embed = embed.description(description.trim());
    }

    embed = embed
        .title(format!("Playing - {}", game.name))
        .color(Colors::Activity);

    if let Some(started_at) = game.started_at {
        embed = embed.field(
            "Playing For:",
            format_delta(now - started_at, DeltaFormat::Brief),
            true,
        );
    }

    embed
}

/// Card for the member's activity, or `None` when there is nothing worth showing.
pub fn activity_card(
    view: &ActivityView,
    display_name: &str,
    now: DateTime<Utc>,
    embed: CreateEmbed,
) -> Option<CreateEmbed> {
    match view {
        ActivityView::Spotify(track) => Some(spotify_card(track, embed)),
        ActivityView::Playing(game) => Some(game_card(game, display_name, now, embed)),
        ActivityView::Unknown => None,
    }
}

/// Spotify card as shown in listings, where the listener isn't otherwise obvious.
pub fn listener_card(track: &SpotifyTrack, listener: &str, avatar_url: &str) -> CreateEmbed {
    spotify_card(
        track,
        CreateEmbed::new()
            .thumbnail(avatar_url)
            .footer(
                CreateEmbedFooter::new(format!("Listening with Spotify... {listener}"))
                    .icon_url(SPOTIFY_ICON),
            ),
    )
}
