use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use calc_console::logging::build_logger;
use calc_console::{CalcConsole, ConsoleAction};
use clap::Parser;
use log::LevelFilter;
use services_calc_display::DisplayConfig;
use simplelog::CombinedLogger;

#[derive(Parser)]
#[command(name = "calc_console")]
#[command(about = "Drive the calculator display from the terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// Display configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_parser = ["error", "warn", "info", "debug", "trace"], default_value = "warn")]
    log_level: String,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let level: LevelFilter = cli.log_level.parse()?;
    CombinedLogger::init(vec![build_logger(level, cli.log_file.as_deref())?])?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = match &cli.config {
        Some(path) => DisplayConfig::load(path)?,
        None => DisplayConfig::default(),
    };
    let mut console = CalcConsole::new(config);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write!(out, "{}", console.render_frame())?;
    out.flush()?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        match console.process_line(&line) {
            Ok(ConsoleAction::Quit) => break,
            Ok(ConsoleAction::Continue) => {}
            Err(err) => writeln!(out, "error: {}", err)?,
        }
        write!(out, "{}", console.render_frame())?;
        out.flush()?;
    }
    Ok(())
}
