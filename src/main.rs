use std::fs::File;
use std::path::Path;

use clap::{crate_authors, crate_description, crate_version, Arg, Command};
use failure::Error;
use log::{error, info};
use simplelog::{ColorChoice, CombinedLogger, SharedLogger, TermLogger, TerminalMode, WriteLogger};

use nvcl_kit::{NvclReader, Settings};

fn main() {
    let matches = Command::new("NVCL Catalog")
        .version(crate_version!())
        .author(crate_authors!())
        .about(crate_description!())
        .arg(
            Arg::new("settings")
                .index(1)
                .value_name("SETTINGS")
                .help("Specify the settings file")
                .takes_value(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the borehole records as JSON instead of their ids"),
        )
        .get_matches();

    let settings_path = matches.value_of("settings").map(Path::new);
    let settings = Settings::new(settings_path).expect("Unable to use config file.");

    initialize_logger(Path::new(&settings.general.log_file), &settings)
        .expect("Unable to initialize logger.");

    let reader = NvclReader::new(&settings.catalog, settings.service.timeout());

    if !reader.is_ready() {
        error!(
            "No NVCL boreholes found ({} diagnostics)",
            reader.catalog().diagnostics().entries().len()
        );
        return; // stop program
    }

    info!("Found {} NVCL boreholes", reader.boreholes().len());

    if matches.is_present("json") {
        match serde_json::to_string_pretty(reader.boreholes()) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Unable to serialize boreholes: {}", e),
        }
    } else {
        for nvcl_id in reader.nvcl_ids() {
            println!("{}", nvcl_id);
        }
    }
}

/// Initialize the logger.
fn initialize_logger(file_path: &Path, settings: &Settings) -> Result<(), Error> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    let log_level = if settings.general.debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    loggers.push(TermLogger::new(
        log_level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ));

    if let Ok(file) = File::create(file_path) {
        loggers.push(WriteLogger::new(
            log_level,
            simplelog::Config::default(),
            file,
        ));
    }

    CombinedLogger::init(loggers)?;

    Ok(())
}
