//! # Gradebook
//!
//! The command-line binary for the gradebook record store.
//!
//! ## Usage
//!
//! ```bash
//! # Create a data file and register records
//! gradebook -D records.json init
//! gradebook -D records.json add-student --id 1 --name "Иванова Мария" \
//!     --email i@i.ru --password-hash h --gradebook-number 23-002 --group САУ-23-1б
//!
//! # Search grades
//! gradebook -D records.json find --semester 3 --type exam
//! gradebook --json find --student иванова
//! ```

use clap::Parser;
use gradebook::{cli, logging};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Configuration decides the log format, so it is resolved before tracing exists.
    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    logging::init(config.log_format, cli.verbose);
    tracing::debug!("Resolved configuration: {:?}", config);

    // Execute command
    if let Err(e) = cli::execute(cli, &config) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}
