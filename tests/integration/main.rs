// tests/integration/main.rs

mod cli_overrides;
mod config_loading;
mod error_handling;
