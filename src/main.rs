use clap::Parser;
use color_eyre::Result;
use fritzbox_exporter::{
    init_logging,
    run,
    Args,
    Config,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;
    run(Config::new(&args)?).await
}
