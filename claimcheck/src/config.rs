//! Configuration types for controlling a check run.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Invalid number of trials (must be > 0)
    #[error("Invalid trial count: {0} (must be > 0)")]
    InvalidTrials(usize),
    /// Invalid time limit (must be > 0)
    #[error("Invalid time limit (must be > 0)")]
    InvalidTimeLimit,
    /// Invalid detail level (must be 0 to 4)
    #[error("Invalid detail level: {0} (must be 0 to 4)")]
    InvalidDetail(u8),
    /// Invalid attempt factor (must be > 0)
    #[error("Invalid attempt factor: {0} (must be > 0)")]
    InvalidAttemptsFactor(usize),
    /// The option bag could not be parsed
    #[error("Invalid check options: {0}")]
    Parse(String),
}

/// How much of a run the text report shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Detail {
    /// Nothing at all
    Silent = 0,
    /// One line per claim and the total line
    Summary = 1,
    /// Adds labels with failures and the failing and lost cases
    Failures = 2,
    /// Adds every classification label
    #[default]
    Classes = 3,
    /// Adds every passing case
    Verbose = 4,
}

impl Detail {
    pub fn level(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Detail {
    type Error = ConfigError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(Detail::Silent),
            1 => Ok(Detail::Summary),
            2 => Ok(Detail::Failures),
            3 => Ok(Detail::Classes),
            4 => Ok(Detail::Verbose),
            other => Err(ConfigError::InvalidDetail(other)),
        }
    }
}

impl fmt::Display for Detail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level())
    }
}

/// Configuration for a check run
#[derive(Debug, Clone, PartialEq)]
pub struct CheckConfig {
    /// Counted trials per claim
    pub nr_trials: usize,
    /// Wall-clock budget per claim, measured from the claim's first attempt
    pub time_limit: Option<Duration>,
    /// Report detail level
    pub detail: Detail,
    /// Base seed; drawn from entropy when absent
    pub seed: Option<u64>,
    /// Attempts allowed per counted trial when a classifier rejects inputs
    pub max_attempts_factor: usize,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            nr_trials: 100,
            time_limit: None,
            detail: Detail::default(),
            seed: None,
            max_attempts_factor: 10,
        }
    }
}

impl CheckConfig {
    /// Create a new check configuration with validation
    pub fn new(
        nr_trials: usize,
        time_limit: Option<Duration>,
        detail: Detail,
        seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            nr_trials,
            time_limit,
            detail,
            seed,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the check configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nr_trials == 0 {
            return Err(ConfigError::InvalidTrials(self.nr_trials));
        }
        if self.time_limit.is_some_and(|limit| limit.is_zero()) {
            return Err(ConfigError::InvalidTimeLimit);
        }
        if self.max_attempts_factor == 0 {
            return Err(ConfigError::InvalidAttemptsFactor(self.max_attempts_factor));
        }
        Ok(())
    }

    pub fn with_trials(mut self, nr_trials: usize) -> Self {
        self.nr_trials = nr_trials;
        self
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    pub fn with_detail(mut self, detail: Detail) -> Self {
        self.detail = detail;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_attempts_factor(mut self, factor: usize) -> Self {
        self.max_attempts_factor = factor;
        self
    }

    /// Upper bound on attempts for one claim, rejected ones included
    pub fn max_attempts(&self) -> usize {
        self.nr_trials.saturating_mul(self.max_attempts_factor)
    }

    /// Overlay an option bag on the defaults, then validate
    pub fn from_options(options: &CheckOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(nr_trials) = options.nr_trials {
            config.nr_trials = nr_trials;
        }
        if let Some(millis) = options.time_limit {
            config.time_limit = Some(Duration::from_millis(millis));
        }
        if let Some(level) = options.detail {
            config.detail = Detail::try_from(level)?;
        }
        config.seed = options.seed;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON option bag such as `{"nr_trials": 50, "time_limit": 200}`.
    ///
    /// Unknown keys are ignored.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let options: CheckOptions =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::from_options(&options)
    }
}

/// The loose option-bag form of a configuration; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CheckOptions {
    pub nr_trials: Option<usize>,
    /// Milliseconds
    pub time_limit: Option<u64>,
    pub detail: Option<u8>,
    pub seed: Option<u64>,
}
