use log::{error, info};
use simplelog::{ColorChoice, Config as LogConfig, LevelFilter, TermLogger, TerminalMode};
use quizz_index::config::{Config, Deployment};
use quizz_index::utils::server::serve;

#[tokio::main]
async fn main() {
    // Info and above to the terminal, errors on stderr.
    if let Err(e) = TermLogger::init(
        LevelFilter::Info,
        LogConfig::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto
    ) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    // Loads `.env` and QUIZZ_* overrides on top of the built-in defaults.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            return;
        },
    };

    let paths = match config.resolve(&Deployment::LongRunning) {
        Ok(paths) => paths,
        Err(e) => {
            error!("Error resolving quiz paths: {:#}", e);
            return;
        },
    };
    info!("School year {} with grades {}", config.school_year, config.grades.join(", "));

    // Runs until Ctrl+C or SIGTERM; every page request rescans the quiz folders.
    if let Err(e) = serve(config, paths).await {
        error!("Server failed: {:#}", e);
    }
}
