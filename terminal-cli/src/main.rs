use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use bitcli_client::RpcClient;
use clap::Parser;
use crossterm::event::EventStream;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::select;
use tracing::info;

mod app;
mod config;
mod ui;
mod views;

use app::AppState;

/// Connection settings live in the config file (`config.json` under the platform
/// config directory); it is created with defaults on first run.
#[derive(Parser, Debug)]
#[command(name = "bitcli", version, about = "Terminal wallet for a bitcoin JSON-RPC daemon")]
struct Args {}

#[tokio::main]
async fn main() -> Result<()> {
    let _args = Args::parse();
    let settings = config::load_settings()?;
    let log_path = config::init_logging(settings.log_level)?;
    info!(
        host = %settings.rpc.host,
        port = settings.rpc.port,
        log = ?log_path,
        "starting bitcli"
    );
    let client = RpcClient::new(&settings.rpc).context("build rpc client")?;

    // TUI setup
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run(&mut terminal, &client).await;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::cursor::Show
    )?;
    terminal.show_cursor()?;
    info!("exiting bitcli");
    result
}

/// One event at a time: a handler's RPC work finishes before the next key is read.
async fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, client: &RpcClient) -> Result<()> {
    let mut app = AppState::new();
    let mut events = EventStream::new();
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(200);

    loop {
        terminal.draw(|f| ui::draw_ui(f, &app))?;

        if app.is_busy() {
            app.advance(client).await;
            continue;
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::from_millis(0));

        select! {
            maybe_ev = events.next() => {
                match maybe_ev {
                    Some(Ok(ev)) => {
                        if app.handle_event(ev) {
                            break;
                        }
                    }
                    Some(Err(err)) => return Err(err).context("read terminal event"),
                    None => break,
                }
            }
            _ = tokio::time::sleep(timeout) => {
                last_tick = Instant::now();
            }
        }
    }
    Ok(())
}
