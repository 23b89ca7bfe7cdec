use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive used when `RUST_LOG` is unset. `--verbose` raises the
/// configured level to at least debug; it never lowers `trace`.
pub fn cli_filter_directive(verbose: bool, level: Option<&str>) -> String {
    match (verbose, level) {
        (_, Some("trace")) => "lobo_wireless=trace,info".to_string(),
        (true, _) => "lobo_wireless=debug,info".to_string(),
        (false, Some(level)) => format!("lobo_wireless={}", level),
        (false, None) => "lobo_wireless=info".to_string(),
    }
}

pub fn init_cli_logger(verbose: bool, level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli_filter_directive(verbose, level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

/// JSON lines on stderr, for running under a supervisor that collects logs.
pub fn init_json_logger(level: Option<&str>) {
    let default = format!("lobo_wireless={}", level.unwrap_or("info"));
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_writer(std::io::stderr)
                .json(),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_level_selects_filter() {
        assert_eq!(cli_filter_directive(false, None), "lobo_wireless=info");
        assert_eq!(cli_filter_directive(false, Some("warn")), "lobo_wireless=warn");
        assert_eq!(cli_filter_directive(false, Some("error")), "lobo_wireless=error");
        assert_eq!(
            cli_filter_directive(false, Some("trace")),
            "lobo_wireless=trace,info"
        );
    }

    #[test]
    fn test_verbose_raises_but_never_lowers() {
        assert_eq!(
            cli_filter_directive(true, Some("warn")),
            "lobo_wireless=debug,info"
        );
        assert_eq!(cli_filter_directive(true, None), "lobo_wireless=debug,info");
        assert_eq!(
            cli_filter_directive(true, Some("trace")),
            "lobo_wireless=trace,info"
        );
    }
}
