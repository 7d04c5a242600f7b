//!
//! Report how each declaration is classified for wrapper generation.
//!
//! Usage: `classify_declarations <declarations> [--all]`

use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing::{error, info};

use factory_codegen::load_declarations;
use factory_tools::report::classification_rows;

#[derive(Parser, Debug)]
#[command(name = "classify_declarations")]
#[command(about = "Show eligibility, option aggregation and option shape per declaration")]
struct Args {
    /// Declaration list (YAML or JSON)
    declarations: PathBuf,

    /// Include declarations that get no wrapper
    #[arg(long)]
    all: bool,
}

fn main() {
    factory_tools::init_logging();

    let args = Args::parse();

    let declarations = match load_declarations(&args.declarations) {
        Ok(declarations) => declarations,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let rows = classification_rows(&declarations, args.all);
    for row in &rows {
        println!("{}", row);
    }

    info!("{} of {} declarations listed", rows.len(), declarations.len());
}
