//! Defines the environment variables to use.

#![cfg(feature = "env")]

use crate::error::DispatchError;

/// The variable holding the GitHub token.
pub const GITHUB_TOKEN: &str = "GITHUB_TOKEN";
/// The variable set by CI providers. Prompting is disabled when it is truthy.
pub const CI: &str = "CI";
/// The variable overriding the GitHub REST API base URL.
pub const GITHUB_API_URL: &str = "GITHUB_API_URL";
/// The variable bounding the number of concurrent workflow file checks.
pub const CONCURRENCY: &str = "WORKFLOW_DISPATCH_CONCURRENCY";

/// The GitHub REST API base URL used when [`GITHUB_API_URL`] is not set.
pub const DEFAULT_API_URL: &str = "https://api.github.com";
/// The concurrency bound used when [`CONCURRENCY`] is not set or invalid.
pub const DEFAULT_CONCURRENCY: usize = 16;

/// Parses an environment variable from [`String`] to something else, wrapping any error in [`anyhow::Error`].
#[macro_export]
macro_rules! parse_env {
    ($lookup:expr, $key:expr => |$var:ident| $expr:expr) => {
        ($lookup)($key)
            .ok_or_else(|| anyhow::anyhow!("{} not set", $key))
            .and_then(|$var| $expr)
    };
    ($lookup:expr, $key:expr => |$var:ident| $expr:expr; anyhow) => {
        parse_env!($lookup, $key => |$var| $expr.map_err(|e| anyhow::anyhow!(e)))
    };
}

pub use parse_env;

/// The configuration collected from the environment.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// The GitHub token, if any.
    pub token: Option<String>,
    /// The GitHub REST API base URL without trailing slashes.
    pub api_url: String,
    /// Whether the user can be prompted.
    pub interactive: bool,
    /// The maximum number of concurrent workflow file checks.
    pub concurrency: usize,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .field("interactive", &self.interactive)
            .field("concurrency", &self.concurrency)
            .finish()
    }
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through a variable lookup.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(GITHUB_TOKEN).filter(|token| !token.is_empty());
        let api_url = lookup(GITHUB_API_URL)
            .map(|url| url.trim_end_matches('/').to_owned())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        let interactive = !lookup(CI).is_some_and(|ci| is_truthy(&ci));
        let concurrency = parse_env!(&lookup, CONCURRENCY => |s| s.parse::<usize>(); anyhow)
            .ok()
            .filter(|&concurrency| concurrency > 0)
            .unwrap_or(DEFAULT_CONCURRENCY);

        Self {
            token,
            api_url,
            interactive,
            concurrency,
        }
    }

    /// Returns the GitHub token.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::MissingToken`] if the token is not set.
    pub fn github_token(&self) -> Result<&str, DispatchError> {
        self.token.as_deref().ok_or(DispatchError::MissingToken)
    }
}

fn is_truthy(value: &str) -> bool {
    !matches!(value.trim(), "" | "0") && !value.trim().eq_ignore_ascii_case("false")
}
