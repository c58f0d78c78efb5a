//! Terminal and log-level setup for the CLI.

use crate::app_config::VerbositySetting;

pub(crate) fn no_color_env_requested() -> bool {
    std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty())
}

pub(crate) fn is_dumb_terminal() -> bool {
    std::env::var("TERM")
        .map(|value| value.eq_ignore_ascii_case("dumb"))
        .unwrap_or(false)
}

/// Priority: quiet flag > verbose flag > config verbosity > info.
pub(crate) fn resolve_default_log_level(
    verbose: u8,
    quiet: bool,
    config_verbosity: VerbositySetting,
) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => match config_verbosity {
            VerbositySetting::Default => "info",
            VerbositySetting::Verbose => "debug",
            VerbositySetting::Quiet => "error",
            VerbositySetting::Debug => "trace",
        },
        1 => "debug",
        _ => "trace",
    }
}

/// `RUST_LOG` wins over `default_level` when set.
pub(crate) fn init_tracing(default_level: &str, no_color: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_env_filter(filter)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_flag_wins() {
        assert_eq!(
            resolve_default_log_level(2, true, VerbositySetting::Debug),
            "error"
        );
    }

    #[test]
    fn test_verbose_flag_wins_over_config() {
        assert_eq!(
            resolve_default_log_level(1, false, VerbositySetting::Quiet),
            "debug"
        );
        assert_eq!(
            resolve_default_log_level(3, false, VerbositySetting::Default),
            "trace"
        );
    }

    #[test]
    fn test_config_verbosity_applies_without_flags() {
        assert_eq!(
            resolve_default_log_level(0, false, VerbositySetting::Default),
            "info"
        );
        assert_eq!(
            resolve_default_log_level(0, false, VerbositySetting::Verbose),
            "debug"
        );
        assert_eq!(
            resolve_default_log_level(0, false, VerbositySetting::Quiet),
            "error"
        );
        assert_eq!(
            resolve_default_log_level(0, false, VerbositySetting::Debug),
            "trace"
        );
    }
}
