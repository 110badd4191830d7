use anyhow::Result;
use rusty_grades::{app, config::AppConfig};

fn main() -> Result<()> {
    env_logger::init();

    let config = AppConfig::parse();
    app::run(&config)
}
