use std::process::exit;

use colored::Colorize;

fn main() {
    if let Err(e) = showcase::app::run_cli() {
        eprintln!("{} {}", "[ERR]".red().bold(), e);
        exit(1);
    }
}
