//! Logging initialization

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

const DEFAULT_DEV_FILTER: &str = "scorekeep_store=debug,scorekeep_cli=debug";
const DEFAULT_PROD_FILTER: &str = "scorekeep_store=info,scorekeep_cli=info";

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output for development
    Development,
    /// JSON structured output for production
    Production,
    /// Test capture mode for deterministic testing
    Test,
}

impl Profile {
    /// Filter used when `RUST_LOG` is not set
    pub fn default_filter(self) -> &'static str {
        match self {
            Profile::Development => DEFAULT_DEV_FILTER,
            Profile::Production => DEFAULT_PROD_FILTER,
            Profile::Test => "off",
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility with the profile's default filter
///
/// Only the first call has any effect, and it backs off if another global
/// subscriber (such as the test capture layer) is already installed. Output
/// goes to stderr so that command output on stdout stays machine-readable.
///
/// ```
/// use scorekeep_core::logging_facility::{init, Profile};
///
/// init(Profile::Production);
/// ```
pub fn init(profile: Profile) {
    init_with_filter(profile, profile.default_filter());
}

/// Initialize with an explicit default filter
///
/// `RUST_LOG` still takes precedence when it is set.
pub fn init_with_filter(profile: Profile, default_filter: &str) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(env_filter(default_filter))
                .finish()
                .try_init()
                .ok();
        }
        Profile::Production => {
            tracing_subscriber::fmt()
                .json()
                .with_writer(std::io::stderr)
                .with_env_filter(env_filter(default_filter))
                .finish()
                .try_init()
                .ok();
        }
        Profile::Test => {
            // Capture is installed separately via init_test_capture()
            tracing_subscriber::registry().try_init().ok();
        }
    });
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}
