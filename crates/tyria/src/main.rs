use clap::Parser;
use tyria::cli::Cli;
use tyria::config::AppConfig;
use tyria::init::get_tyria_dir;
use tyria::prelude::*;
use tyria::trace::install_tracing;

fn main() -> Result<()> {
    miette::set_panic_hook();
    let cli = Cli::parse();
    let (tyria_dir_path, tyria_dir) = get_tyria_dir()?;
    let log_file_flush_guard = install_tracing(&tyria_dir)?;
    info!("Application Name: {}", env!("CARGO_PKG_NAME"));
    info!("Application Version: {}", env!("CARGO_PKG_VERSION"));
    info!(?tyria_dir_path, "using data dir");

    let config = AppConfig::load(&tyria_dir)?.client_config(&cli.overrides());
    let result = cli.run(config).and_then(|output| {
        serde_json::to_string_pretty(&output)
            .into_diagnostic()
            .wrap_err("failed to format output")
    });
    let output = match result {
        Ok(output) => output,
        Err(e) => {
            error!(?e, "command failed");
            std::mem::drop(log_file_flush_guard);
            return Err(e);
        }
    };
    println!("{output}");
    std::mem::drop(log_file_flush_guard);
    Ok(())
}
