//! Tracing / logging initialisation helpers.

use chainprobe_core::config::LogSettings;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the filter directives: `"info,chainprobe_http=debug"` etc.
pub fn directives(settings: &LogSettings) -> String {
    let mut directives = settings.level.clone();
    for (component, level) in &settings.components {
        directives.push_str(&format!(",{}={}", component.replace('-', "_"), level));
    }
    directives
}

/// `RUST_LOG` if set and valid, else the configured directives, else `info`.
pub fn build_filter(settings: &LogSettings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directives(settings)))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Call once at startup; later calls are
/// ignored.
pub fn init_tracing(settings: &LogSettings) {
    let filter = build_filter(settings);

    let installed = if settings.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .try_init()
    };

    if installed.is_err() {
        tracing::debug!("global subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_overrides_are_appended() {
        let mut settings = LogSettings::default();
        settings.level = "warn".into();
        settings.components.insert("chainprobe-http".into(), "debug".into());
        settings.components.insert("chainprobe_core".into(), "trace".into());
        assert_eq!(
            directives(&settings),
            "warn,chainprobe_core=trace,chainprobe_http=debug"
        );
    }

    #[test]
    fn default_is_info() {
        assert_eq!(directives(&LogSettings::default()), "info");
    }
}
