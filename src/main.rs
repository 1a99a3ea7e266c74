// metastep: reversible debugger for C++ template metaprogram traces

use std::fs::File;
use std::io;
use std::path::PathBuf;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use metastep::metaprogram::kind::InstantiationKind;
use metastep::trace::TraceLoader;
use metastep::ui::App;

#[derive(Debug, Parser)]
#[command(name = "metastep")]
#[command(about = "Step through C++ template instantiation traces", long_about = None)]
struct Cli {
    /// Trace to load (text records or templight XML)
    trace: PathBuf,

    /// Name shown for the root of the instantiation tree
    #[arg(long, default_value = "<root>")]
    root_name: String,

    /// Evaluation result to show instead of the one recorded in the trace
    #[arg(long)]
    result: Option<String>,

    /// Disable memoization events before the session starts
    #[arg(long)]
    hide_memoization: bool,

    /// Write diagnostics to this file (filter with METASTEP_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        metastep::logging::init(File::create(path)?);
    }

    let mut loader = TraceLoader::new(cli.root_name.as_str());
    if let Some(result) = &cli.result {
        loader = loader.with_evaluation_result(result.as_str());
    }

    eprintln!("Loading {}...", cli.trace.display());
    let mut metaprogram = match loader.from_file(&cli.trace) {
        Ok(metaprogram) => metaprogram,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if cli.hide_memoization {
        metaprogram.disable_edges_of_kind(InstantiationKind::Memoization);
    }

    eprintln!(
        "Loaded {} entities and {} instantiation events.",
        metaprogram.graph().num_vertices(),
        metaprogram.graph().num_edges()
    );

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(metaprogram);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
