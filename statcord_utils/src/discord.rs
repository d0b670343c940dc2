use serenity::all::{Colour, OnlineStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colors {
    Success = 0x0BAF4F,
    Error = 0xFC1F28,
    About = 0xFF6961,
    Activity = 0x7289DA,
    Spotify = 0x1DB954,
}

impl From<Colors> for Colour {
    fn from(value: Colors) -> Self {
        Colour(value as u32)
    }
}

/// Small coloured dot shown next to a member's status.
pub fn status_indicator(status: OnlineStatus) -> &'static str {
    match status {
        OnlineStatus::Online => "🟢",
        OnlineStatus::Idle => "🌙",
        OnlineStatus::DoNotDisturb => "⛔",
        _ => "⚫",
    }
}
