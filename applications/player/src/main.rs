/// OneClick Player - press a button, hear a playlist
use anyhow::Context;
use clap::{Parser, Subcommand};
use oneclick_core::{IndicatorDriver, PlaybackSource};
use oneclick_indicator::Indicator;
use oneclick_player::{config::DEFAULT_SETTINGS_FILE, simulate, startup, Dispatcher, Settings};
use oneclick_playback::PlaybackController;
use oneclick_spotify::SpotifyClient;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "oneclick")]
#[command(about = "One-button Spotify playlist player", long_about = None)]
struct Cli {
    /// Settings file path
    #[arg(short, long, global = true, env = "ONECLICK_CONFIG", default_value = DEFAULT_SETTINGS_FILE)]
    config: PathBuf,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Wait for button presses on the GPIO header (default)
    Run,
    /// Authorize with Spotify and write the token cache
    Authorize,
    /// List the Spotify Connect devices visible to this account
    Devices,
    /// Run without GPIO: presses from stdin, lamps in the log
    Simulate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "oneclick=debug,oneclick_player=debug,oneclick_playback=debug,oneclick_indicator=debug,oneclick_spotify=debug"
    } else {
        "oneclick=info,oneclick_player=info,oneclick_playback=info,oneclick_indicator=info,oneclick_spotify=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::load(&cli.config)
        .with_context(|| format!("Failed to load settings from {}", cli.config.display()))?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run(settings).await?,
        Commands::Authorize => authorize(&settings).await?,
        Commands::Devices => devices(&settings).await?,
        Commands::Simulate => simulate(settings).await?,
    }

    Ok(())
}

#[cfg(target_os = "linux")]
async fn run(settings: Settings) -> anyhow::Result<()> {
    use oneclick_player::gpio;

    let source = spotify(&settings)?;
    let device = startup::prepare_device(source.as_ref(), &settings.speaker).await?;

    let gpio = gpio::open()?;
    let driver = Arc::new(gpio::GpioLamps::new(gpio.clone()));
    let indicator = indicator(driver, &settings)?;
    let controller = PlaybackController::new(source, device, settings.playback);

    let (events, queue) = mpsc::unbounded_channel();
    let _buttons = gpio::register_buttons(&gpio, &settings.button_pins(), &events)?;
    drop(events);

    let mut dispatcher = Dispatcher::new(&settings.buttons, settings.debounce, controller, indicator);
    dispatcher.run(queue, shutdown_on_signal()).await;
    Ok(())
}

#[cfg(not(target_os = "linux"))]
async fn run(_settings: Settings) -> anyhow::Result<()> {
    anyhow::bail!("GPIO is only available on Linux; use `oneclick simulate` instead")
}

async fn simulate(settings: Settings) -> anyhow::Result<()> {
    let source = spotify(&settings)?;
    let device = startup::prepare_device(source.as_ref(), &settings.speaker).await?;

    let driver = Arc::new(simulate::LogLamps::new(&settings.lamps));
    let indicator = indicator(driver, &settings)?;
    let controller = PlaybackController::new(source, device, settings.playback);

    let (events, queue) = mpsc::unbounded_channel();
    let lines = settings.button_pins();
    tokio::spawn(async move {
        tracing::info!(buttons = lines.len(), "Type a button number and Enter to press it, q to quit");
        match simulate::read_presses(BufReader::new(tokio::io::stdin()), &lines, &events).await {
            Ok(presses) => tracing::info!(presses, "Input closed"),
            Err(e) => tracing::error!(error = %e, "Failed to read stdin"),
        }
    });

    let mut dispatcher = Dispatcher::new(&settings.buttons, settings.debounce, controller, indicator);
    dispatcher.run(queue, shutdown_on_signal()).await;
    Ok(())
}

async fn authorize(settings: &Settings) -> anyhow::Result<()> {
    let client = SpotifyClient::new(settings.spotify_config())?;

    println!("Open this URL in a browser and grant access:\n\n  {}\n", client.authorize_url()?);
    print!("Paste the URL you were redirected to: ");
    std::io::stdout().flush()?;

    let mut redirected = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut redirected)
        .await?;

    let token = client.complete_authorization(&redirected).await?;
    println!(
        "Authorized (scope: {}). Token cached in {}",
        token.scope,
        settings.spotify.token_cache.display()
    );
    Ok(())
}

async fn devices(settings: &Settings) -> anyhow::Result<()> {
    let client = SpotifyClient::new(settings.spotify_config())?;
    let devices = client.devices().await?;

    if devices.is_empty() {
        println!("No devices found. Is the speaker switched on and logged in?");
        return Ok(());
    }

    for device in devices {
        let matched = device.name.starts_with(&settings.speaker.name);
        println!(
            "{} {:<32} {:<12} {:>4} {}",
            if matched { "*" } else { " " },
            device.name,
            device.kind,
            device
                .volume_percent
                .map_or_else(|| "-".to_string(), |v| format!("{}%", v)),
            device.id.as_deref().unwrap_or("(restricted)"),
        );
    }
    Ok(())
}

fn spotify(settings: &Settings) -> anyhow::Result<Arc<dyn PlaybackSource>> {
    let client = SpotifyClient::new(settings.spotify_config())?;
    Ok(Arc::new(client))
}

fn indicator(driver: Arc<dyn IndicatorDriver>, settings: &Settings) -> anyhow::Result<Indicator> {
    let indicator = Indicator::new(driver, settings.lamps.clone(), settings.pattern, settings.timing)?;
    Ok(indicator)
}

/// Token cancelled on Ctrl-C or SIGTERM
fn shutdown_on_signal() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            let mut terminate =
                match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                    Ok(signal) => signal,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                        let _ = ctrl_c.await;
                        trigger.cancel();
                        return;
                    }
                };
            tokio::select! {
                _ = ctrl_c => {}
                _ = terminate.recv() => {}
            }
        }

        #[cfg(not(unix))]
        let _ = ctrl_c.await;

        trigger.cancel();
    });

    token
}
