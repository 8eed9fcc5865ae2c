use clap::Parser;
use nstat::cli::{self, Cli};
use nstat_core::config::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/nstat-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("nstat debug log started, tail -f /tmp/nstat-debug.log");
    }

    let config = cli::config_or_defaults(Config::load(), &mut std::io::stderr());

    let code = cli::run(cli, config, &mut std::io::stdout(), &mut std::io::stderr());
    std::process::exit(code)
}
