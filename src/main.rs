use anyhow::Result;
use packfs::cli;
use packfs::utils::error::{PackError, format_error};

fn main() {
    // Usage errors are reported and exited on by clap itself
    let args = cli::args::parse();
    let verbose = args.verbose > 0;

    if let Err(e) = run_main(args) {
        display_error(&e, verbose);
        std::process::exit(1);
    }
}

/// Display an error on stderr.
///
/// Tries to downcast to `PackError` for the plain diagnostic, falls back to
/// anyhow's error chain for everything else.
fn display_error(error: &anyhow::Error, verbose: bool) {
    if let Some(pack_error) = error.downcast_ref::<PackError>() {
        eprintln!("{}", format_error(pack_error, verbose));
        return;
    }

    eprintln!("packfs: {}", error);
    let causes: Vec<_> = error.chain().skip(1).collect();
    for (i, cause) in causes.iter().enumerate() {
        let prefix = if i == causes.len() - 1 {
            "\u{2514}\u{2500}"
        } else {
            "\u{251c}\u{2500}"
        };
        eprintln!("{} {}", prefix, cause);
    }

    if verbose {
        let backtrace = error.backtrace();
        if backtrace.status() == std::backtrace::BacktraceStatus::Captured {
            eprintln!("\nBacktrace:\n{}", backtrace);
        }
    }
}

fn run_main(args: cli::args::Args) -> Result<()> {
    packfs::init_logging(args.verbose, args.quiet);

    let config = cli::config::load(&args)?;
    let merged_config = cli::config::merge_config(args, config);

    packfs::run(&merged_config)?;
    Ok(())
}
