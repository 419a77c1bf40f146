use anyhow::Result;
use clap::Parser;

use usercrud::bootstrap::CliArgs;

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    usercrud::bootstrap::init_logging(&cli_args.log_level);
    usercrud::bootstrap::setup_panic_handler();

    let bootstrap_result = usercrud::bootstrap::bootstrap(cli_args).await?;
    usercrud::bootstrap::start_server(bootstrap_result).await?;

    Ok(())
}
