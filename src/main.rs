// opplay: walks the operator tour and prints what every line produced

use std::io::{self, IsTerminal, Write};

use clap::{ArgAction, Parser};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use opplay::interpreter::Interpreter;
use opplay::render::Renderer;
use opplay::script::playground;
use opplay::transcript::RunSummary;

#[derive(Parser, Debug)]
#[command(name = "opplay")]
#[command(version, about = "Operator semantics playground")]
struct RunnerArgs {
    /// Only show sections whose title contains this text
    #[arg(short, long)]
    section: Option<String>,

    /// List section titles and exit
    #[arg(long)]
    list: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) -> Result<(), Box<dyn std::error::Error>> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = RunnerArgs::parse();
    init_logging(args.verbose)?;

    let script = playground::operators();
    let mut out = io::stdout().lock();

    if args.list {
        for section in &script.sections {
            writeln!(out, "{:>4}  {}", section.first_line, section.title)?;
        }
        return Ok(());
    }

    let color = !args.no_color && io::stdout().is_terminal();
    let renderer = Renderer::new(color);
    let mut interpreter = Interpreter::new();
    let mut summary = RunSummary::default();

    for section in &script.sections {
        // Skipped sections still run so later ones see their bindings
        let shown = args
            .section
            .as_deref()
            .map_or(true, |filter| section.matches(filter));
        interpreter.transcript_mut().set_muted(!shown);
        info!(section = %section.title, shown, "running section");

        if shown {
            writeln!(out, "{}", renderer.section_header(section))?;
        }
        for line in &section.lines {
            let start = interpreter.transcript().len();
            let outcome = interpreter.run_line(line, &mut summary);
            if shown {
                let entries = &interpreter.transcript().entries()[start..];
                for row in renderer.line(line, entries, &outcome) {
                    writeln!(out, "{}", row)?;
                }
            }
        }
    }

    writeln!(out, "\n{}", renderer.summary(&summary))?;
    out.flush()?;

    if !summary.is_clean() {
        std::process::exit(1);
    }
    Ok(())
}
