use parcelc::cli::{self, Command};
use parcelc::{config, runner};
use pcc_error::Diagnostic;

fn main() {
    env_logger::init();
    let args = cli::parse_command_line_args();
    if let Err(err) = run(args.command) {
        print_error(&err);
        std::process::exit(1);
    }
}

fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Build { overrides } => {
            let settings = config::load(&overrides)?;
            let summary = runner::build(&settings)?;
            println!(
                "{} written, {} unchanged, {} removed",
                summary.report.written.len(),
                summary.report.unchanged.len(),
                summary.report.removed.len()
            );
        }
        Command::Check { overrides } => {
            let settings = config::load(&overrides)?;
            for line in runner::check(&settings)? {
                println!("{}", line);
            }
        }
        Command::Clean { overrides } => {
            let settings = config::load(&overrides)?;
            runner::clean(settings.dest()?)?;
        }
    }
    Ok(())
}

/// Parse and link errors are shown with the offending declaration
fn print_error(err: &anyhow::Error) {
    if let Some(e) = err.downcast_ref::<parcel_parser::Error>() {
        eprintln!("{}", e.report());
    } else if let Some(e) = err.downcast_ref::<pcc_hierarchy::Error>() {
        eprintln!("{}", e.report());
    } else {
        eprintln!("Error: {:?}", err);
    }
}
