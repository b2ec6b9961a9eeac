use anyhow::{Context, Result};
use clap::Parser;
use matchmaster_core::{GameConfig, Session, Snapshot};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use web_time::Instant;

use command::{Command, HELP};
use render::Printer;

mod command;
mod config;
mod render;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// TOML file overriding the default rules
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print snapshots and events as JSON lines
    #[arg(long)]
    json: bool,

    /// Only let game time pass on `wait` and `tick`
    #[arg(long)]
    manual_clock: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let config = match &args.config {
        Some(path) => config::load(path)?,
        None => GameConfig::default(),
    };
    let seed = args.seed.unwrap_or_else(rand::random::<u64>);
    log::debug!("seed: {}", seed);

    let mut session = Session::new(config, seed).context("Could not start a session")?;
    let printer = Printer::new(args.json);
    let mut out = io::stdout().lock();
    printer.snapshot(&mut out, &Snapshot::from_session(&session))?;
    out.flush()?;

    let mut last_input = Instant::now();
    for line in io::stdin().lock().lines() {
        let line = line.context("Could not read from stdin")?;
        if !args.manual_clock {
            let now = Instant::now();
            let elapsed = now.duration_since(last_input).as_millis();
            session.advance(elapsed.try_into().unwrap_or(u32::MAX));
            last_input = now;
        }
        if line.trim().is_empty() {
            continue;
        }

        let keep_going = match line.parse::<Command>() {
            Ok(command) => run(command, &mut session, &printer, &mut out)?,
            Err(err) => {
                printer.message(&mut out, &format!("{err:#}"))?;
                true
            }
        };
        printer.events(&mut out, &session.take_events())?;
        out.flush()?;
        if !keep_going {
            break;
        }
    }

    log::debug!("finished after {} levels", session.results().len());
    Ok(())
}

/// Applies one command; `false` asks to stop reading input.
fn run(
    command: Command,
    session: &mut Session,
    printer: &Printer,
    out: &mut impl Write,
) -> Result<bool> {
    log::trace!("command {:?}", command);
    let side = session.board().side();

    let changed = match command {
        Command::Pick(cell) => report(
            cell.resolve(side)
                .and_then(|index| Ok(session.select_cell(index)?.has_update())),
            printer,
            out,
        )?,
        Command::Bomb(cell) => report(
            cell.resolve(side)
                .and_then(|index| Ok(session.activate_bomb(index)?.has_update())),
            printer,
            out,
        )?,
        Command::Bonus => {
            let changed = session.activate_bonus().has_update();
            if !changed {
                printer.message(out, "The star is not available yet")?;
            }
            changed
        }
        Command::Next => {
            let changed = session.confirm_next_level().has_update();
            if !changed {
                printer.message(out, "The level is still running")?;
            }
            changed
        }
        Command::Tick => session.tick().has_update(),
        Command::Wait(ms) => {
            session.advance(ms);
            true
        }
        Command::Hint => {
            printer.message(out, session.hint())?;
            false
        }
        Command::Results => {
            printer.results(out, session.results())?;
            false
        }
        Command::Show => true,
        Command::Help => {
            printer.message(out, HELP)?;
            false
        }
        Command::Quit => return Ok(false),
    };

    if changed {
        printer.snapshot(out, &Snapshot::from_session(session))?;
    }
    Ok(true)
}

/// Prints rejected input instead of stopping the game.
fn report(result: Result<bool>, printer: &Printer, out: &mut impl Write) -> Result<bool> {
    match result {
        Ok(changed) => Ok(changed),
        Err(err) => {
            printer.message(out, &format!("{err:#}"))?;
            Ok(false)
        }
    }
}
