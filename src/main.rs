use clap::Parser;
use lobo_wireless::core::{disconnect_radio, scan_networks};
use lobo_wireless::utils::error::ErrorSeverity;
use lobo_wireless::utils::{logger, validation::Validate};
use lobo_wireless::{CliConfig, Command, NmcliDriver, Wireless, WirelessConfig, WirelessError, WlanDriver};
use serde_json::json;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if config.json_logging() {
        logger::init_json_logger(config.log_level());
    } else {
        logger::init_cli_logger(cli.verbose, config.log_level());
    }

    tracing::info!("Starting lobo-wireless ({:?})", cli.command);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let driver = NmcliDriver::new(config.interface().map(str::to_string));

    match run(cli.command, driver, &config, cli.json).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            tracing::error!(
                "❌ {} failed: {} (Category: {:?}, Severity: {:?})",
                command_name(cli.command),
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(exit_code(&e));
        }
    }
}

/// Returns the process exit code on success paths (a failed connect is not an error).
async fn run(
    command: Command,
    driver: NmcliDriver,
    config: &WirelessConfig,
    as_json: bool,
) -> Result<i32, WirelessError> {
    match command {
        Command::Connect => {
            let wireless = Wireless::from_config(driver, config).await?;
            tracing::info!("Connecting {}", wireless);
            let report = wireless.connect().await?;

            if as_json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for line in &report.messages {
                    println!("{}", line);
                }
            }
            Ok(if report.is_connected() { 0 } else { 2 })
        }
        Command::Scan => {
            let networks = scan_networks(&driver, config.timing().wake).await?;
            if as_json {
                println!("{}", serde_json::to_string_pretty(&networks)?);
            } else {
                for n in &networks {
                    let ssid = if n.hidden { "<hidden>" } else { n.ssid.as_str() };
                    println!(
                        "{:<32} {} ch{:<3} {:>4} dBm  {}",
                        ssid, n.bssid, n.channel, n.rssi, n.security
                    );
                }
            }
            Ok(0)
        }
        Command::Status => {
            let status = driver.status().await?;
            let ip = if driver.is_connected().await? {
                Some(driver.ifconfig().await?)
            } else {
                None
            };
            if as_json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "status": status.message(),
                        "code": status.code(),
                        "ifconfig": ip,
                    }))?
                );
            } else {
                println!("{}", status);
                if let Some(ifconfig) = ip {
                    println!(
                        "{} netmask {} gateway {} dns {}",
                        ifconfig.ip, ifconfig.netmask, ifconfig.gateway, ifconfig.dns
                    );
                }
            }
            Ok(0)
        }
        Command::Disconnect => {
            let dropped = disconnect_radio(&driver).await?;
            if !dropped {
                println!("Not connected");
            }
            Ok(0)
        }
    }
}

fn command_name(command: Command) -> &'static str {
    match command {
        Command::Connect => "connect",
        Command::Scan => "scan",
        Command::Status => "status",
        Command::Disconnect => "disconnect",
    }
}

fn exit_code(e: &WirelessError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}
