pub mod app;
pub mod assets;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod output;
pub mod page;
pub mod runner;
pub mod signing;
pub mod utils;

#[cfg(test)]
mod tests;
