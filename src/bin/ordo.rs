extern crate ordo as lib;

use flexi_logger::{Duplicate, FileSpec, Logger};
use lib::overlay::Overlay;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "ordo",
    about = "Marks holy days, fast days and days of abstinence in an iCalendar file."
)]
pub struct Args {
    #[structopt(help = "calendar to read", parse(from_os_str))]
    pub input: PathBuf,

    #[structopt(help = "where to write the marked calendar", parse(from_os_str))]
    pub output: PathBuf,

    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(long = "mark-sundays", help = "treat every Sunday as a holy day")]
    pub mark_sundays: bool,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger =
        Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?.duplicate_to_stderr(Duplicate::Warn);

    if let Some(log_file) = args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    let _logger = logger.start()?;

    let mut config = lib::config::load_suitable_config(args.configfile.as_deref())?;
    if args.mark_sundays {
        config.mark_sundays_as_holy = true;
    }

    let overlay = Overlay::new(&config);

    log::info!(
        "Marking '{}' -> '{}'",
        args.input.display(),
        args.output.display()
    );
    let stats = overlay.process_file(&args.input, &args.output)?;
    log::info!("{}", stats);

    Ok(())
}
