//! cssvr binary

use cssvr::{EnhancedCli, RenameError};
use std::process;

fn main() {
    let mut cli = EnhancedCli::new();

    match cli.run() {
        Ok(()) => {}
        Err(RenameError::Io(e)) => {
            eprintln!("IO Error: {}", e);
            process::exit(1);
        }
        Err(e) if e.is_configuration_error() => {
            eprintln!("Configuration error: {}", e);
            process::exit(2);
        }
        Err(e) => {
            eprintln!("Rename failed: {}", e);
            process::exit(1);
        }
    }
}
