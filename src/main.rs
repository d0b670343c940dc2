mod bot;
mod cards;
mod commands;
mod events;
mod latency;
mod pagination;

use log::{error, info};
use poise::Framework;
use serenity::all::ClientBuilder;
use statcord_storage::{MessageCipher, Storage, UsageTracker};

#[tokio::main]
async fn main() {
    // Force aws-lc-rs as default crypto provider
    // reqwest and serenity may pull in different rustls providers, so pick one explicitly
    _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    // Setup logging
    if std::env::var("RUST_LOG").is_err() {
        #[cfg(debug_assertions)]
        std::env::set_var("RUST_LOG", "statcord");

        #[cfg(not(debug_assertions))]
        std::env::set_var("RUST_LOG", "statcord=info");
    }

    env_logger::init();

    info!("Counting everything, one message at a time");

    dotenvy::dotenv().ok();

    // Set up storage
    let storage = Storage::new(statcord_config::data_dir());
    if let Err(why) = storage.init().await {
        error!("Failed to initialize storage: {why}");
        return;
    }

    let cipher = match MessageCipher::from_base64(statcord_config::message_key()) {
        Ok(cipher) => cipher,
        Err(why) => {
            error!("Invalid MESSAGE_KEY: {why}");
            return;
        }
    };

    let tracker = UsageTracker::new(storage, cipher);

    // Set up bot
    let framework = Framework::builder()
        .setup(|ctx, ready, framework| Box::pin(bot::setup(ctx, ready, framework, tracker)))
        .options(bot::framework_opts())
        .build();

    let mut client = match ClientBuilder::new(
        statcord_config::discord_token(),
        statcord_config::discord_intents(),
    )
    .framework(framework)
    .await
    {
        Ok(client) => client,
        Err(why) => {
            error!("Fatal error when building Serenity client: {why}");
            return;
        }
    };

    if let Err(why) = client.start_autosharded().await {
        error!("Fatal error occured during bot operations: {why}");
        error!("Bot will now shut down!");
    }
}
