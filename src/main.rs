mod api;
mod app;
mod cli;
mod event;
mod feed;
mod help;
mod keys;
mod logging;
mod settings;
mod theme;
mod tui;
mod viewport;
mod views;

#[cfg(test)]
mod test_utils;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use ratatui::Frame;
use tracing::info;

use api::JokeClient;
use app::{App, AppOptions, Message, Tab};
use cli::{Cli, Commands, ConfigArgs, ConfigCommands, OutputFormat};
use event::Event;
use settings::Settings;
use theme::{ResolvedTheme, ThemeVariant, by_name, default_for_variant, detect_terminal_theme};
use tui::EventHandler;

/// Rows taken by the debug pane when it is open.
const DEBUG_PANE_HEIGHT: u16 = 10;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_dir = settings::config_dir(cli.config_dir.as_ref());

    if let Some(Commands::Config(args)) = &cli.command {
        return handle_config_command(args, config_dir.as_ref());
    }

    let settings = load_settings(config_dir.as_ref());
    let _log_guard = match &config_dir {
        Some(dir) => {
            let path = settings::log_path(dir);
            if cli.verbose {
                eprintln!("Logging to {}", path.display());
            }
            Some(logging::init(&path, cli.verbose)?)
        }
        None => None,
    };

    match &cli.command {
        Some(Commands::Fetch { format }) => fetch_jokes(&cli, &settings, *format).await,
        Some(Commands::Categories) => print_categories(&cli, &settings).await,
        Some(Commands::Config(_)) | None => run_tui(&cli, &settings).await,
    }
}

fn load_settings(config_dir: Option<&PathBuf>) -> Settings {
    config_dir
        .map(|dir| {
            let path = settings::settings_path(dir);
            Settings::load(&path).unwrap_or_else(|e| {
                eprintln!("Warning: {}", e);
                Settings::default()
            })
        })
        .unwrap_or_default()
}

fn handle_config_command(args: &ConfigArgs, config_dir: Option<&PathBuf>) -> Result<()> {
    let config_dir = config_dir.context("Could not determine config directory")?;
    let path = settings::settings_path(config_dir);
    match &args.command {
        ConfigCommands::Path => println!("{}", path.display()),
        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists. Use --force to overwrite it.",
                    path.display()
                );
            }
            Settings::starter().save(&path)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

fn client_for(cli: &Cli, settings: &Settings) -> Result<JokeClient> {
    let base = settings.api_base(cli.api_base.as_deref());
    JokeClient::new(base).with_context(|| format!("Failed to create client for {base}"))
}

async fn fetch_jokes(cli: &Cli, settings: &Settings, format: OutputFormat) -> Result<()> {
    let client = client_for(cli, settings)?;
    let name = settings.name(cli.first_name.as_deref(), cli.last_name.as_deref());
    let jokes = client
        .fetch_jokes(&name)
        .await
        .with_context(|| format!("Failed to fetch jokes for {}", name.display()))?;

    match format {
        OutputFormat::Text => {
            for joke in &jokes {
                println!("{:>5}  {} [{}]", joke.id, joke.text, joke.category_label());
            }
        }
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&jokes).context("Failed to serialize jokes")?;
            println!("{}", json);
        }
    }
    Ok(())
}

async fn print_categories(cli: &Cli, settings: &Settings) -> Result<()> {
    let client = client_for(cli, settings)?;
    let categories = client
        .fetch_categories()
        .await
        .context("Failed to fetch categories")?;
    for category in categories {
        println!("{}", category);
    }
    Ok(())
}

fn resolve_theme(cli: &Cli, settings: &Settings) -> Result<ResolvedTheme> {
    // Priority: CLI --theme > settings file > detected variant
    if let Some(name) = cli.theme.as_ref().or(settings.theme.as_ref()) {
        let theme = by_name(name).with_context(|| {
            format!("Theme '{name}' not found. Use dark, light, or a builtin theme name.")
        })?;
        return Ok(theme.into());
    }

    let variant = if cli.dark {
        ThemeVariant::Dark
    } else if cli.light {
        ThemeVariant::Light
    } else {
        detect_terminal_theme()
    };
    Ok(default_for_variant(variant))
}

async fn run_tui(cli: &Cli, settings: &Settings) -> Result<()> {
    let resolved_theme = resolve_theme(cli, settings)?;
    let options = AppOptions {
        client: client_for(cli, settings)?,
        name: settings.name(cli.first_name.as_deref(), cli.last_name.as_deref()),
        page_delay: settings.page_delay(),
        surface_errors: settings.surface_errors,
    };
    info!(
        name = %options.name.display(),
        api = options.client.base(),
        "starting"
    );

    let mut terminal = tui::init()?;
    let mut app = App::new(resolved_theme, options);
    let mut events = EventHandler::new(250);
    let mut last_height: Option<u16> = None;

    app.load_initial();

    loop {
        terminal.draw(|frame| render(&app, frame))?;

        // The joke list shrinks while the debug pane is open
        let mut current_height = terminal.size()?.height;
        if app.debug.visible {
            current_height = current_height.saturating_sub(DEBUG_PANE_HEIGHT);
        }
        if last_height != Some(current_height) {
            last_height = Some(current_height);
            app.update(Message::UpdateViewportHeight(current_height));
        }

        while let Ok(result) = app.result_rx.try_recv() {
            app.handle_async_result(result);
        }

        if app.should_quit {
            break;
        }

        match events.next().await? {
            Event::Key(key) => {
                if let Some(msg) = keys::handle_key(key, &app) {
                    app.update(msg);
                }
            }
            Event::Tick | Event::Resize => {}
        }
    }

    app.shutdown();
    tui::restore()?;
    info!("exiting");
    Ok(())
}

fn render(app: &App, frame: &mut Frame) {
    use ratatui::layout::{Constraint, Layout};

    let area = frame.area();

    let (main_area, debug_area) = if app.debug.visible {
        let chunks = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(DEBUG_PANE_HEIGHT),
        ])
        .split(area);
        (chunks[0], Some(chunks[1]))
    } else {
        (area, None)
    };

    match app.tab {
        Tab::Home => views::home::render(frame, app, main_area),
        Tab::Likes => views::likes::render(frame, app, main_area),
    }

    if let Some(debug_area) = debug_area {
        views::debug::render(frame, app, debug_area);
    }

    views::help_overlay::render(frame, app, area);
    views::name_editor::render(frame, app, area);
}
