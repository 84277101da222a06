use clap::Parser;
use envlog_core::{logging, Level};

/// Writes one record through the logger configured by the LOG_* variables.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, default_value = "info")]
    level: String,

    /// Print the resolved settings to stdout
    #[arg(long)]
    settings: bool,

    message: Vec<String>,
}

fn main() {
    let args = Args::parse();
    let logger = match logging::setup() {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("failed to initialize logger: {}", e);
            std::process::exit(1);
        }
    };
    tracing::trace!(settings = %logger.settings(), "logger ready");

    if args.settings {
        println!("{}", logger.settings());
    }
    if !args.message.is_empty() {
        logger.log(Level::from_setting(&args.level), &args.message.join(" "));
    }
}
