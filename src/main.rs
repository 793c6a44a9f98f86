// SPDX-License-Identifier: MIT
//
// chroma-pick — pick a color with three sliders, right in the terminal.
//
// This is the binary that wires the two crates together:
//
//   chroma-term   → raw mode, key input, cursor queries, key loop
//   chroma-widget → the ColorPicker and its sliders
//
// The picker draws inline below the shell prompt, followed by a one-line
// instructions footer. The cursor stays parked at the end of that footer;
// every repaint jumps into the picker and comes back. On Ctrl+C the
// terminal is restored and the chosen color is printed as `#rrggbb`.
//
// Layout:
//
//   ████████  [R] ──────────│───────────────────── [  80 ]   ← picker origin
//   ████████  [G] ─────────────────────────│────── [ 200 ]
//   ████████  [B] ───────────────│──────────────── [ 120 ]
//   ←/→ adjust   ↑/↓ select   Ctrl+C quit█                  ← caller's cursor

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Mutex;

use anyhow::{Context, anyhow};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chroma_term::ansi::CursorUp;
use chroma_term::color::Rgb;
use chroma_term::driver::{Driver, Key, TerminalDriver};
use chroma_term::event_loop::{self, Action, App};
use chroma_widget::ColorPicker;
use chroma_widget::paint::LINE_BREAK;
use chroma_widget::picker::{DEFAULT_COLOR, ROWS};

/// Environment variable holding the log filter (`EnvFilter` syntax).
const LOG_ENV: &str = "CHROMA_PICK_LOG";

/// Instructions shown on the line below the picker.
const FOOTER: &str = "←/→ adjust   ↑/↓ select   Ctrl+C quit";

// ─── Command line ───────────────────────────────────────────────────────────

/// Pick an RGB color with arrow keys, drawn in place in the terminal.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Initial red channel.
    #[arg(short, long, default_value_t = DEFAULT_COLOR.r)]
    red: u8,

    /// Initial green channel.
    #[arg(short, long, default_value_t = DEFAULT_COLOR.g)]
    green: u8,

    /// Initial blue channel.
    #[arg(short, long, default_value_t = DEFAULT_COLOR.b)]
    blue: u8,

    /// Initial color as hex (`#rgb` or `#rrggbb`).
    #[arg(long, value_name = "HEX", value_parser = parse_hex, conflicts_with_all = ["red", "green", "blue"])]
    hex: Option<Rgb>,

    /// Write logs to this file. Filter with CHROMA_PICK_LOG (default: info).
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Don't print the instructions line below the picker.
    #[arg(long)]
    no_footer: bool,
}

impl Cli {
    fn initial_color(&self) -> Rgb {
        self.hex
            .unwrap_or_else(|| Rgb::new(self.red, self.green, self.blue))
    }
}

fn parse_hex(s: &str) -> Result<Rgb, String> {
    Rgb::hex(s).ok_or_else(|| format!("`{s}` is not a #rgb or #rrggbb color"))
}

// ─── Logging ────────────────────────────────────────────────────────────────

/// Send `tracing` output to `path`.
///
/// Only ever to a file: stdout and stderr are the picker's canvas.
fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!(e))
}

// ─── App ────────────────────────────────────────────────────────────────────

/// Maps keys to picker operations.
struct PickerApp {
    picker: ColorPicker,
}

impl App for PickerApp {
    fn on_key(&mut self, driver: &mut dyn Driver, key: Key) -> io::Result<Action> {
        match key {
            Key::Up => self.picker.select_up(driver)?,
            Key::Down => self.picker.select_down(driver)?,
            Key::Left => self.picker.select_left(driver)?,
            Key::Right => self.picker.select_right(driver)?,
            Key::CtrlC => return Ok(Action::Quit),
            Key::Other => {}
        }
        Ok(Action::Continue)
    }
}

/// Make sure the rows the picker needs exist below the cursor.
///
/// Origins are absolute screen rows. If the first render scrolled the
/// terminal, every origin captured before the scroll would point one row
/// too low, so the scrolling happens here, before anything is captured.
fn reserve_rows(driver: &mut dyn Driver, rows: u16) -> io::Result<()> {
    driver.write("\r")?;
    for _ in 0..rows {
        driver.write(LINE_BREAK)?;
    }
    driver.write(&CursorUp(rows).to_string())
}

/// Draw the picker, run the key loop, and return the chosen color.
///
/// Leaves the cursor at the start of a fresh line below everything drawn.
fn session(driver: &mut dyn Driver, initial: Rgb, footer: bool) -> io::Result<Rgb> {
    let mut app = PickerApp {
        picker: ColorPicker::from_color(initial),
    };

    reserve_rows(driver, ROWS)?;
    app.picker.render(driver)?;
    if footer {
        driver.write(FOOTER)?;
    }

    event_loop::run(driver, &mut app)?;

    if footer {
        driver.write(LINE_BREAK)?;
    }
    Ok(app.picker.color())
}

fn run(cli: &Cli) -> anyhow::Result<Rgb> {
    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let initial = cli.initial_color();
    info!(%initial, "starting picker");

    let mut driver = TerminalDriver::new().context("failed to initialize terminal")?;
    let chosen = session(&mut driver, initial, !cli.no_footer);
    driver.leave().context("failed to restore terminal")?;
    let chosen = chosen?;

    info!(%chosen, "picker closed");
    Ok(chosen)
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(color) => println!("{color}"),
        Err(e) => {
            eprintln!("chroma-pick: {e:#}");
            process::exit(1);
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
