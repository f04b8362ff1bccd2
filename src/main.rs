use clap::Parser;

use crate::commands::Commands;
use crate::screen::{Route, ScreenError};
use crate::settings::Settings;

mod api;
mod app_setting;
mod commands;
mod db;
mod http_api;
mod screen;
mod session;
mod settings;
mod utils;
mod worker;

#[derive(Parser, Debug)]
#[command(version, about = "Terminal client for the Howudoin chat server")]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    commands: Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    env_logger::init();

    let Cli { settings, commands } = Cli::parse();
    let ctx = settings.build_context()?;

    match commands::run(ctx, commands).await {
        Err(e) if e.downcast_ref::<ScreenError>().and_then(ScreenError::redirect) == Some(Route::Login) => {
            eprintln!("Not logged in. Run `{}` first.", commands::command_hint(&Route::Login));
            std::process::exit(2);
        }
        result => result,
    }
}
