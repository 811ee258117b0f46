use clap::Parser;
use colored::Colorize;

use affilink::cli::{Cli, Commands, ConfigCommands};
use affilink::config::AppConfig;
use affilink::runtime::modes;
use affilink::system::init_logging;

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let exit_code = match cli.command {
        None | Some(Commands::Serve) => run_serve(&cli.config),
        Some(Commands::Promote {
            ref user_id,
            ref email,
            revoke,
        }) => {
            let config = AppConfig::load(&cli.config);
            match block_on(modes::cli::run_promote(
                &config,
                user_id,
                email.as_deref(),
                revoke,
            )) {
                Ok(Ok(_)) => 0,
                Ok(Err(e)) => {
                    eprintln!("{}", e.format_colored());
                    1
                }
                Err(e) => {
                    eprintln!("{} {:#}", "Error:".red().bold(), e);
                    1
                }
            }
        }
        Some(Commands::Config {
            action: ConfigCommands::Generate { ref path, force },
        }) => match modes::cli::run_config_generate(path.as_deref(), force) {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("{}", e.format_colored());
                1
            }
        },
    };

    std::process::exit(exit_code);
}

/// 单次命令用的 tokio runtime
fn block_on<F: std::future::Future>(future: F) -> std::io::Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(future))
}

fn run_serve(config_path: &str) -> i32 {
    let config = AppConfig::load(config_path);

    // guard 必须活到进程结束，否则异步日志丢失
    let _guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{} {:#}", "Failed to initialize logging:".red().bold(), e);
            return 1;
        }
    };

    let result = actix_web::rt::System::new().block_on(modes::server::run_server(&config));
    match result {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!("Server exited with error: {:#}", e);
            eprintln!("{} {:#}", "Server error:".red().bold(), e);
            1
        }
    }
}
