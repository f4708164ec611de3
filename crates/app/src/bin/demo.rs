use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use app::{ConsoleSurface, Controller, Key};
use chart_binding::format_currency;
use models::ChatRole;

#[derive(Parser, Debug)]
#[command(
    name = "business360-demo",
    about = "Runs a scripted Business 360 session: period switch, bank connection, AI chat."
)]
struct Args {
    /// Optional demo_settings.json overriding the built-in constants
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Seed for the mock data; omit for a different run every time
    #[arg(long)]
    seed: Option<u64>,

    /// Chart period in days (7, 30, 90 or 365)
    #[arg(short, long, default_value_t = 30)]
    period: u32,

    /// Bank to connect in the simulated flow
    #[arg(short, long, default_value = "Chase")]
    bank: String,

    /// Skip the chat portion of the script
    #[arg(long, default_value_t = false)]
    no_chat: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.settings {
        if !settings_loader::settings_file_exists(path) {
            logger::warn("demo", "settings file not found, using defaults");
        }
    }
    let settings = settings_loader::load_settings_with_fallback(args.settings.as_ref())
        .context("loading demo settings")?;
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut controller = Controller::new(settings, ConsoleSurface, rng);

    if let Err(err) = controller.select_period(args.period) {
        logger::warn("demo", &format!("{}; keeping the default period", err));
    }

    // The daily walk behind the selected period, as a quick printout.
    let daily = controller.daily_view();
    println!(
        "Daily balance walk ({} points): {} -> {}",
        daily.points.len(),
        daily
            .points
            .first()
            .map(|p| format_currency(p.value))
            .unwrap_or_default(),
        daily
            .points
            .last()
            .map(|p| format_currency(p.value))
            .unwrap_or_default(),
    );

    // Simulated bank connection: Idle -> Connecting -> Connected -> Unlocked.
    controller.open_connect_banks();
    controller.connect_bank(&args.bank).await?;
    println!("Connected {}: multi-bank view unlocked.", args.bank);

    if !args.no_chat {
        controller.open_ai_chat();
        for prompt in [
            "What were my expenses in September?",
            "Can you forecast next quarter?",
            "hello",
        ] {
            let _ = controller.send_chat_message(prompt).await;
        }
        controller.handle_key(Key::Escape);

        println!("\nChat transcript:");
        for message in controller.transcript().messages() {
            let who = match message.role {
                ChatRole::User => "you",
                ChatRole::Assistant => "assistant",
            };
            println!("  [{}] {}", who, message.text);
        }
    }

    Ok(())
}
