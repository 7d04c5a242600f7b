//!
//! Generate `variable_factories.h` from a declaration list.
//!
//! Usage: `gen_variable_factories <declarations> <out-dir> [--template-dir DIR]`

use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing::{error, info};

use factory_codegen::{load_declarations, Generator, GeneratorConfig, Strictness, TraceMode};

#[derive(Parser, Debug)]
#[command(name = "gen_variable_factories")]
#[command(about = "Generate autograd wrappers for tensor factory declarations")]
struct Args {
    /// Declaration list (YAML or JSON)
    declarations: PathBuf,

    /// Directory receiving the generated header
    out_dir: PathBuf,

    /// Directory holding the top-level template (built-in template if omitted)
    #[arg(long = "template-dir")]
    template_dir: Option<PathBuf>,

    /// Generator config file (YAML)
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Emit unrecognized defaults and types verbatim instead of failing
    #[arg(long)]
    lenient: bool,

    /// Omit tracer recording from the wrapper bodies
    #[arg(long = "no-trace")]
    no_trace: bool,
}

fn main() {
    factory_tools::init_logging();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match GeneratorConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                error!("{}", e);
                process::exit(1);
            }
        },
        None => GeneratorConfig::default(),
    };
    if args.lenient {
        config.strictness = Strictness::Lenient;
    }
    if args.no_trace {
        config.trace = TraceMode::None;
    }

    let generator = match Generator::new(config) {
        Ok(generator) => generator,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    info!("Loading declarations from: {}", args.declarations.display());
    let declarations = match load_declarations(&args.declarations) {
        Ok(declarations) => declarations,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let report = match generator.generate(
        &args.out_dir,
        &declarations,
        args.template_dir.as_deref(),
    ) {
        Ok(report) => report,
        Err(e) => {
            error!("Generation failed: {}", e);
            process::exit(1);
        }
    };

    info!(
        "{} wrappers from {} declarations",
        report.wrappers, report.declarations
    );
    if !report.output.written {
        info!("{} is up to date", report.output.path.display());
    }
    info!("sha256 {}", report.output.digest);
}
