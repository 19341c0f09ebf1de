use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use sysview_app::app::App;
use sysview_app::config::Config;
use sysview_app::settings::SettingsStore;
use sysview_app::ui;

#[tokio::main]
async fn main() -> Result<()> {
    // The panel drives pkg/zfs/beadm/kill directly; nothing works unprivileged.
    if unsafe { libc::geteuid() } != 0 {
        eprintln!("sysview must be run as root.");
        std::process::exit(1);
    }

    let config = if Config::exists() {
        Config::load()?
    } else {
        Config::default()
    };

    let log_file = std::fs::File::create(&config.log_path)
        .with_context(|| format!("Failed to create {}", config.log_path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("SYSVIEW_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .init();

    let settings = SettingsStore::load(&config.settings_path)?;
    let mut app = App::new(config, settings);
    app.init().await;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen, crossterm::cursor::Hide)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app).await;

    disable_raw_mode().ok();
    let mut out = io::stdout();
    crossterm::execute!(out, crossterm::cursor::Show, LeaveAlternateScreen).ok();

    result
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let tick_rate = Duration::from_millis(app.config.tick_rate_ms);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key).await;
                }
            }
        }
        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }
        if app.should_quit {
            return Ok(());
        }
    }
}
