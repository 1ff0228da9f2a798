//! Subscriber installation
//!
//! The library never installs a subscriber on its own; binaries call
//! [`init`] once, tests call [`init_test_capture`](super::init_test_capture).

use std::sync::Once;
use tracing_subscriber::EnvFilter;

use super::test_capture::init_test_capture;

/// Where log output goes and how it is shaped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable lines on stderr
    Development,
    /// One JSON object per event on stderr
    Production,
    /// In-memory capture, see [`TestCapture`](super::TestCapture)
    Test,
}

impl Profile {
    /// Filter used when `RUST_LOG` is not set
    pub fn default_filter(&self) -> &'static str {
        match self {
            Profile::Development => "tmplx=debug",
            Profile::Production => "tmplx=info",
            Profile::Test => "tmplx=trace",
        }
    }
}

static INSTALLED: Once = Once::new();

/// Install the global subscriber for `profile`
///
/// Later calls are ignored, whatever their profile. `RUST_LOG` overrides the
/// profile's default filter. A subscriber installed by someone else wins; the
/// failure to replace it is reported on stderr.
pub fn init(profile: Profile) {
    INSTALLED.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(profile.default_filter()));
        let fmt = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr);

        let installed = match profile {
            Profile::Development => fmt.try_init(),
            Profile::Production => fmt.json().flatten_event(true).try_init(),
            Profile::Test => {
                init_test_capture();
                Ok(())
            }
        };
        if let Err(err) = installed {
            eprintln!("tmplx: logging not initialised: {}", err);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filters_target_tmplx() {
        assert_eq!(Profile::Development.default_filter(), "tmplx=debug");
        assert_eq!(Profile::Production.default_filter(), "tmplx=info");
        assert_eq!(Profile::Test.default_filter(), "tmplx=trace");
    }

    #[test]
    fn test_test_profile_installs_capture() {
        init(Profile::Test);
        let capture = init_test_capture();

        tracing::info!(op = "init_test_profile_op", "captured");
        assert_eq!(capture.events_for("init_test_profile_op").len(), 1);
    }
}
