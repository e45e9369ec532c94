//! The logging capability the core reports through.
//!
//! The core never depends on a log event being delivered. Implementations
//! of [`EventRecorder`] must return promptly and must swallow their own
//! failures.

use crate::error::EventError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stack {
    Backend,
    Frontend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Package {
    Cache,
    Controller,
    CronJob,
    Db,
    Domain,
    Handler,
    Repository,
    Route,
    Service,
    Api,
}

const BACKEND_PACKAGES: &[Package] = &[
    Package::Cache,
    Package::Controller,
    Package::CronJob,
    Package::Db,
    Package::Domain,
    Package::Handler,
    Package::Repository,
    Package::Route,
    Package::Service,
];

const FRONTEND_PACKAGES: &[Package] = &[Package::Api];

impl Stack {
    pub fn as_str(self) -> &'static str {
        match self {
            Stack::Backend => "backend",
            Stack::Frontend => "frontend",
        }
    }

    /// Packages that may be logged under this stack.
    pub fn packages(self) -> &'static [Package] {
        match self {
            Stack::Backend => BACKEND_PACKAGES,
            Stack::Frontend => FRONTEND_PACKAGES,
        }
    }
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }
}

impl Package {
    pub fn as_str(self) -> &'static str {
        match self {
            Package::Cache => "cache",
            Package::Controller => "controller",
            Package::CronJob => "cron_job",
            Package::Db => "db",
            Package::Domain => "domain",
            Package::Handler => "handler",
            Package::Repository => "repository",
            Package::Route => "route",
            Package::Service => "service",
            Package::Api => "api",
        }
    }

    pub fn is_allowed_on(self, stack: Stack) -> bool {
        stack.packages().contains(&self)
    }
}

macro_rules! impl_display_from_str {
    ($ty:ty, $err:path, [$($variant:expr),+ $(,)?]) => {
        impl Display for $ty {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = EventError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let lowered = s.to_ascii_lowercase();
                [$($variant),+]
                    .into_iter()
                    .find(|v| v.as_str() == lowered)
                    .ok_or_else(|| $err(s.to_string()))
            }
        }
    };
}

impl_display_from_str!(Stack, EventError::UnknownStack, [Stack::Backend, Stack::Frontend]);
impl_display_from_str!(
    Level,
    EventError::UnknownLevel,
    [Level::Debug, Level::Info, Level::Warn, Level::Error, Level::Fatal]
);
impl_display_from_str!(
    Package,
    EventError::UnknownPackage,
    [
        Package::Cache,
        Package::Controller,
        Package::CronJob,
        Package::Db,
        Package::Domain,
        Package::Handler,
        Package::Repository,
        Package::Route,
        Package::Service,
        Package::Api,
    ]
);

/// A single structured log line handed to the logging collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub stack: Stack,
    pub level: Level,
    pub package: Package,
    pub message: String,
}

impl LogEvent {
    pub fn new(stack: Stack, level: Level, package: Package, message: impl Into<String>) -> Self {
        Self {
            stack,
            level,
            package,
            message: message.into(),
        }
    }

    pub fn backend(level: Level, package: Package, message: impl Into<String>) -> Self {
        Self::new(Stack::Backend, level, package, message)
    }

    /// Parses the loosely typed form callers outside the crate use.
    pub fn parse(
        stack: &str,
        level: &str,
        package: &str,
        message: impl Into<String>,
    ) -> Result<Self, EventError> {
        let event = Self::new(stack.parse()?, level.parse()?, package.parse()?, message);
        event.validate()?;
        Ok(event)
    }

    /// Checks that the package belongs to the stack.
    pub fn validate(&self) -> Result<(), EventError> {
        if !self.package.is_allowed_on(self.stack) {
            return Err(EventError::PackageNotAllowed {
                package: self.package.to_string(),
                stack: self.stack.to_string(),
            });
        }
        Ok(())
    }
}

/// Best-effort sink for [`LogEvent`]s.
///
/// `record` must not block on I/O and must never panic or report an error
/// back to the caller; delivery problems stay inside the recorder.
pub trait EventRecorder: Send + Sync + 'static {
    fn record(&self, event: LogEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRecorder;

impl EventRecorder for NoopRecorder {
    fn record(&self, _event: LogEvent) {}
}
