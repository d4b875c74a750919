use std::io;
use std::time::Duration;

use anyhow::{bail, Context};
use crossterm::event::KeyEventKind;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

mod app;
mod config;
mod dashboard;
mod error;
mod models;
mod roster;
mod sentiment;
mod services;
mod tui;

use app::{App, RosterOutcome};
use config::Config;
use tui::{draw, handle_key_event};

const USAGE: &str = "\
Usage: creator-pulse [COMMAND]

Without a command the interactive dashboard starts.

Commands:
  --list                     Print the roster
  --add NAME [CHANNEL_ID]    Add a creator (channel looked up by name if omitted)
  --remove NAME              Remove a creator
  --report NAME              Print the dashboard for a creator
  --help                     Show this message";

enum Command {
    Interactive,
    List,
    Add { name: String, channel_id: String },
    Remove(String),
    Report(String),
    Help,
}

fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let name_arg = |flag: &str| -> anyhow::Result<String> {
        match args.get(1) {
            Some(name) if !name.trim().is_empty() => Ok(name.clone()),
            _ => bail!("{flag} needs a creator name\n\n{USAGE}"),
        }
    };

    let command = match args.first().map(String::as_str) {
        None => Command::Interactive,
        Some("--list") => Command::List,
        Some("--add") => Command::Add {
            name: name_arg("--add")?,
            channel_id: args.get(2).cloned().unwrap_or_default(),
        },
        Some("--remove") => Command::Remove(name_arg("--remove")?),
        Some("--report") => Command::Report(name_arg("--report")?),
        Some("--help") | Some("-h") => Command::Help,
        Some(other) => bail!("unknown argument '{other}'\n\n{USAGE}"),
    };
    Ok(command)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging (only show warnings and errors by default)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_args(&args)?;

    if let Command::Help = command {
        println!("{USAGE}");
        return Ok(());
    }

    let config = Config::load().context("Failed to load configuration")?;
    let mut app = App::new(&config)
        .with_context(|| format!("Failed to open roster {}", config.roster_path))?;

    match command {
        Command::Interactive | Command::Help => {}
        Command::List => {
            if app.creators.is_empty() {
                println!("Roster is empty ({})", app.roster_path().display());
            }
            for creator in &app.creators {
                println!(
                    "{}\t{}\t{}\t{}",
                    creator.name,
                    creator.channel_id,
                    creator.priority.as_deref().unwrap_or("-"),
                    creator.status.as_deref().unwrap_or("-"),
                );
            }
            return Ok(());
        }
        Command::Add { name, channel_id } => {
            let outcome = app.add_creator(&name, &channel_id, "").await?;
            println!("{}", outcome.message());
            if let RosterOutcome::Unchanged(_) = outcome {
                std::process::exit(1);
            }
            return Ok(());
        }
        Command::Remove(name) => {
            println!("{}", app.remove_creator(&name)?.message());
            return Ok(());
        }
        Command::Report(name) => {
            let Some(report) = app.report_for(&name).await? else {
                bail!("{name} is not in the roster");
            };
            print!("{}", dashboard::render_text(&report));
            return Ok(());
        }
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> anyhow::Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, app))?;

        // Advance spinner animation
        app.tick_spinner();

        // Poll for a finished report
        app.poll_report_result();

        // Poll for a finished channel search from the add form
        app.poll_lookup_result();

        // Poll for events with timeout to allow async operations
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = handle_key_event(key, app.session.input_mode()) {
                        let should_quit = app.handle_action(action).await?;
                        if should_quit {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}
