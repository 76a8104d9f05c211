mod api;
mod app;
mod clipboard;
mod error;
mod types;

use api::StatsClient;
use app::App;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use error::Result;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::env;
use std::{
    io,
    time::{Duration, Instant},
};

use tracing::{debug, error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

const DEFAULT_USERNAME: &str = "Priyanshu";
const BASE_URL_ENV: &str = "LC_METRICS_API";

fn setup_logging() -> Result<()> {
    // Stdout belongs to the TUI, so logs go to a rolling file
    let file_appender = RollingFileAppender::new(
        Rotation::DAILY,
        "logs",
        "lc_metrics.log",
    );

    // Set different log levels based on build type
    let env_filter = if cfg!(debug_assertions) {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(file_appender)
        .with_ansi(false)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .init();

    info!("Logging system initialized");
    debug!("Debug logging {}", if cfg!(debug_assertions) { "enabled" } else { "disabled" });

    Ok(())
}

fn parse_args() -> String {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.is_empty() {
        info!("No username specified, defaulting to {}", DEFAULT_USERNAME);
        return DEFAULT_USERNAME.to_string();
    }

    let first_arg = args[0].trim();
    if first_arg.is_empty() {
        warn!("Blank username argument, defaulting to {}", DEFAULT_USERNAME);
        return DEFAULT_USERNAME.to_string();
    }

    info!("Initial username '{}' from argument", first_arg);
    first_arg.to_string()
}

fn stats_client() -> StatsClient {
    match env::var(BASE_URL_ENV) {
        Ok(base) if !base.trim().is_empty() => {
            info!("Using stats provider from {}: {}", BASE_URL_ENV, base);
            StatsClient::new(base)
        }
        _ => StatsClient::default(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;
    info!("Starting lc_metrics dashboard");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let initial_username = parse_args();
    let mut app = App::new(&initial_username, stats_client());
    // The initial mount immediately triggers a search for the default user
    app.search(&initial_username);

    let tick_rate = Duration::from_millis(250);
    let res = run_app(&mut terminal, &mut app, tick_rate);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("Application error: {}", err);
        println!("Error: {}", err);
    }

    info!("Application terminated");
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    tick_rate: Duration,
) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        app.drain_fetch_results();
        app.tick();

        terminal.draw(|f| app.render(f))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char(c) => {
                        app.handle_input(c);
                    }
                    KeyCode::Enter => {
                        app.handle_enter();
                    }
                    KeyCode::Backspace => {
                        app.state.input_buffer.pop();
                    }
                    KeyCode::Tab => {
                        app.copy_profile_link();
                    }
                    KeyCode::Esc => {
                        app.should_quit = true;
                    }
                    _ => {}
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
