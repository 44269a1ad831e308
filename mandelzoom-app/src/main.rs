mod app_dir;
mod command;
mod error;
mod explorer;
mod preferences;
mod preview;

use std::io::{self, BufRead, Write};

use tracing::{info, warn};

use command::{parse_line, HELP};
use explorer::{Explorer, Outcome};
use mandelzoom_render::Frame;
use preferences::AppPreferences;

/// Width of the `show` preview, in characters.
const PREVIEW_COLUMNS: u32 = 80;

fn print_frame(out: &mut impl Write, frame: &Frame) -> io::Result<()> {
    let vp = frame.viewport;
    writeln!(
        out,
        "frame {}x{}  x [{}, {}]  y [{}, {}]  inside {}  {:.1} ms{}",
        frame.pixels.width,
        frame.pixels.height,
        vp.x_min,
        vp.x_max,
        vp.y_min,
        vp.y_max,
        frame.iterations.inside_count(),
        frame.elapsed.as_secs_f64() * 1000.0,
        if frame.monochrome { "  (mono)" } else { "" },
    )
}

fn run(explorer: &mut Explorer) -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match explorer.redraw_if_needed() {
        Ok(Some(frame)) => print_frame(&mut out, frame)?,
        Ok(None) => {}
        Err(e) => warn!("Initial frame failed: {e}"),
    }

    for line in stdin.lock().lines() {
        let line = line?;
        let cmd = match parse_line(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "error: {e}")?;
                writeln!(out, "{HELP}")?;
                continue;
            }
        };

        match explorer.handle(cmd) {
            Ok(Outcome::Continue) => {}
            Ok(Outcome::Show) => match explorer.frame() {
                Some(frame) => {
                    print_frame(&mut out, frame)?;
                    write!(out, "{}", preview::text_preview(&frame.pixels, PREVIEW_COLUMNS))?;
                }
                None => writeln!(out, "no frame yet")?,
            },
            Ok(Outcome::ListPresets) => {
                for name in explorer.controller().presets().names() {
                    writeln!(out, "{name}")?;
                }
            }
            Ok(Outcome::Quit) => break,
            Err(e) => {
                writeln!(out, "error: {e}")?;
                continue;
            }
        }

        match explorer.redraw_if_needed() {
            Ok(Some(frame)) => print_frame(&mut out, frame)?,
            Ok(None) => {}
            Err(e) => writeln!(out, "error: {e}")?,
        }
        out.flush()?;
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting Mandelzoom");

    let mut prefs = AppPreferences::load();
    let mut explorer = match Explorer::new(&prefs) {
        Ok(explorer) => explorer,
        Err(e) => {
            warn!("Preferences rejected ({e}), using defaults");
            prefs = AppPreferences::default();
            match Explorer::new(&prefs) {
                Ok(explorer) => explorer,
                Err(e) => {
                    tracing::error!("Cannot start explorer: {e}");
                    std::process::exit(1);
                }
            }
        }
    };

    if let Err(e) = run(&mut explorer) {
        tracing::error!("Input error: {e}");
    }

    if prefs.restore_last_view {
        explorer.store_into(&mut prefs);
        prefs.save();
    }
    info!(frames = explorer.frames_rendered(), "Exiting");
}
