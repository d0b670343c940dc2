use std::sync::LazyLock;

pub static DISCORD_TOKEN: LazyLock<String> = LazyLock::new(|| {
    std::env::var("DISCORD_TOKEN").expect("missing DISCORD_TOKEN environment variable")
});
pub static MESSAGE_KEY: LazyLock<String> = LazyLock::new(|| {
    std::env::var("MESSAGE_KEY").expect("missing MESSAGE_KEY environment variable")
});
pub static COMMAND_PREFIX: LazyLock<String> =
    LazyLock::new(|| std::env::var("COMMAND_PREFIX").unwrap_or_else(|_| "!".to_string()));
pub static DATA_DIR: LazyLock<String> =
    LazyLock::new(|| std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string()));
pub static DBL_TOKEN: LazyLock<Option<String>> = LazyLock::new(|| {
    std::env::var("DBL_TOKEN")
        .ok()
        .filter(|token| !token.trim().is_empty())
});
pub static DBL_BASE_URL: LazyLock<String> = LazyLock::new(|| {
    std::env::var("DBL_BASE_URL").unwrap_or_else(|_| "https://top.gg/api".to_string())
});
pub static LEGEND_IMAGE: LazyLock<String> = LazyLock::new(|| {
    std::env::var("LEGEND_IMAGE").unwrap_or_else(|_| "resources/pie_legend.png".to_string())
});
pub static SOURCE_DIR: LazyLock<String> =
    LazyLock::new(|| std::env::var("SOURCE_DIR").unwrap_or_else(|_| ".".to_string()));
pub static REPOSITORY_URL: LazyLock<String> = LazyLock::new(|| {
    std::env::var("REPOSITORY_URL").unwrap_or_else(|_| "https://github.com/statcord/statcord".to_string())
});
pub static SUPPORT_URL: LazyLock<Option<String>> =
    LazyLock::new(|| std::env::var("SUPPORT_URL").ok());
