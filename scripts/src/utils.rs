use log::LevelFilter;
use simplelog::{ConfigBuilder, SimpleLogger};
use std::io::Read;

pub fn setup_simple_logger() -> anyhow::Result<()> {
    let logger_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .add_filter_allow_str("scripts")
        .build();

    Ok(SimpleLogger::init(LevelFilter::Info, logger_config)?)
}

/// Reads a payload file verbatim, `-` reads stdin
pub fn read_body(path: &str) -> anyhow::Result<String> {
    if path == "-" {
        let mut body = String::new();
        std::io::stdin().read_to_string(&mut body)?;
        return Ok(body);
    }

    Ok(std::fs::read_to_string(path)?)
}
