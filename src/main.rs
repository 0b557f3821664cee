use anyhow::Result;
use irdecode::config::AppConfig;
use irdecode::{init_tracing, session};

fn main() -> Result<()> {
    let config = AppConfig::parse_args()?;
    init_tracing(&config);
    session::run(&config)
}
