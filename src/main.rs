use std::io::{self, Write};
use std::process::ExitCode;

use bikeshare_dashboard::config::{resolve_config_path, DashboardConfig, OutputFormat};
use bikeshare_dashboard::logging::{self, Stage};
use bikeshare_dashboard::report;

fn main() -> ExitCode {
    let config_path = resolve_config_path(std::env::args().nth(1));
    let (config, found) = match DashboardConfig::load_or_default(&config_path) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("   ✗ {}", e);
            return ExitCode::FAILURE;
        }
    };

    logging::init_logger(
        config.logging.level,
        Some(config.logging.file.as_str()),
        config.logging.timestamps,
    );
    let path = config_path.display().to_string();
    if found {
        logging::debug(Stage::System, Some(&path), "Loaded configuration");
    } else {
        logging::debug(Stage::System, Some(&path), "No config file, using defaults");
    }

    let dashboard = match bikeshare_dashboard::run(&config) {
        Ok(dashboard) => dashboard,
        Err(e) => {
            logging::error(Stage::System, None, &format!("No dashboard produced: {}", e));
            return ExitCode::FAILURE;
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let written = match config.output.format {
        OutputFormat::Text => report::render_text(&dashboard, &mut out),
        OutputFormat::Json => match report::render_json(&dashboard) {
            Ok(json) => writeln!(out, "{}", json),
            Err(e) => {
                logging::error(Stage::Presenter, None, &format!("JSON encoding failed: {}", e));
                return ExitCode::FAILURE;
            }
        },
    };

    if let Err(e) = written {
        logging::error(Stage::Presenter, None, &format!("Failed to write report: {}", e));
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
