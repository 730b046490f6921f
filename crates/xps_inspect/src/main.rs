use clap::Parser;
use xps_utils::{ok, AnyResult};

fn main() -> AnyResult {
    let cli = xps_inspect::Cli::parse_from(wild::args());

    pretty_env_logger::formatted_builder()
        .format_indent(None)
        .format_timestamp(None)
        .filter_level(cli.global.log_level())
        .init();

    xps_inspect::run(cli)?;
    ok()
}
