use crate::error::{PinbumpError, Result};
use crate::utils::verbose;
use crate::version::VersionString;
use indicatif::{ProgressBar, ProgressStyle};
use jiff::Timestamp;
use std::fmt;
use std::time::Duration;

pub mod factory;
pub use factory::SourceFactory;

/// Which provider produced a [`RemoteVersionInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Release listing (newest first)
    Primary,
    /// Package index (ascending version list)
    Fallback,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SourceKind::Primary => "release listing",
            SourceKind::Fallback => "package index",
        };
        f.write_str(label)
    }
}

/// Latest version as reported by one remote source.
#[derive(Debug, Clone)]
pub struct RemoteVersionInfo {
    pub version: VersionString,
    pub source: SourceKind,
    pub notes: String,
    pub published_at: Option<Timestamp>,
    pub info_url: String,
}

/// A remote provider that can report the latest published version.
pub trait VersionSource {
    fn name(&self) -> &str;

    fn resolve(&self) -> Result<RemoteVersionInfo>;
}

/// Tries each source in order and returns the first success.
pub struct RemoteVersionResolver {
    sources: Vec<Box<dyn VersionSource>>,
}

impl RemoteVersionResolver {
    pub fn new(sources: Vec<Box<dyn VersionSource>>) -> Self {
        Self { sources }
    }

    pub fn resolve(&self) -> Result<RemoteVersionInfo> {
        let mut failures = Vec::new();

        for source in &self.sources {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::default_spinner()
                    .template("   {spinner} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner.set_message(format!("Querying {}", source.name()));

            let outcome = source.resolve();
            spinner.finish_and_clear();

            match outcome {
                Ok(info) => {
                    verbose::log(format!(
                        "{} reported version {}",
                        source.name(),
                        info.version
                    ));
                    return Ok(info);
                }
                Err(err) => {
                    verbose::log(format!("{} failed: {}", source.name(), err));
                    failures.push(format!("{}: {}", source.name(), err));
                }
            }
        }

        if failures.is_empty() {
            return Err(PinbumpError::Resolution(
                "no version sources configured".to_string(),
            ));
        }

        Err(PinbumpError::Resolution(failures.join("; ")))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Source returning a canned answer, for tests.
    pub struct StaticSource {
        pub name: String,
        pub outcome: std::result::Result<(String, SourceKind), String>,
    }

    impl StaticSource {
        pub fn ok(version: &str, kind: SourceKind) -> Box<dyn VersionSource> {
            Box::new(Self {
                name: format!("static {kind}"),
                outcome: Ok((version.to_string(), kind)),
            })
        }

        pub fn failing(message: &str) -> Box<dyn VersionSource> {
            Box::new(Self {
                name: "broken source".to_string(),
                outcome: Err(message.to_string()),
            })
        }
    }

    impl VersionSource for StaticSource {
        fn name(&self) -> &str {
            &self.name
        }

        fn resolve(&self) -> Result<RemoteVersionInfo> {
            match &self.outcome {
                Ok((version, kind)) => Ok(RemoteVersionInfo {
                    version: VersionString::parse(version)
                        .ok_or_else(|| PinbumpError::Resolution(version.clone()))?,
                    source: *kind,
                    notes: String::new(),
                    published_at: None,
                    info_url: String::new(),
                }),
                Err(message) => Err(PinbumpError::Resolution(message.clone())),
            }
        }
    }
}
