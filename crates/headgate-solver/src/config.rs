// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Run configuration.
//!
//! ```toml
//! parallel = true
//!
//! [build]
//! max_pipes_per_field = 5
//! slack = false
//!
//! [build.margins]
//! field_demand = 0.9
//!
//! [sampler]
//! iterations = 500
//! seed = 7
//! strategy = "random"
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use crate::error::ConfigError;
use headgate_lp::config::BuildConfig;
use headgate_search::config::SamplerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for one planning pass.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub build: BuildConfig,
    pub sampler: SamplerConfig,
    /// Run service areas on separate threads.
    pub parallel: bool,
}

impl RunConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Toml` if the text is not valid TOML or does not
    /// match the expected layout.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read and
    /// `ConfigError::Toml` if it cannot be parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    #[inline]
    pub fn with_build(mut self, build: BuildConfig) -> Self {
        self.build = build;
        self
    }

    #[inline]
    pub fn with_sampler(mut self, sampler: SamplerConfig) -> Self {
        self.sampler = sampler;
        self
    }

    #[inline]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use headgate_core::num::fraction::Fraction;
    use headgate_search::config::SamplingStrategy;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(RunConfig::from_toml_str("").unwrap(), RunConfig::default());
    }

    #[test]
    fn test_nested_tables_override_defaults() {
        let config = RunConfig::from_toml_str(
            r#"
            parallel = true

            [build]
            max_pipes_per_field = 5

            [build.margins]
            field_demand = 0.9

            [sampler]
            iterations = 500
            seed = 7
            strategy = "random"
            "#,
        )
        .unwrap();

        assert!(config.parallel);
        assert_eq!(config.build.max_pipes_per_field, Some(5));
        assert_eq!(config.build.margins.field_demand, Fraction::new(0.9).unwrap());
        assert_eq!(config.build.margins.well_allocation, Fraction::new(0.95).unwrap());
        assert!(config.build.crop_attribution);
        assert_eq!(config.sampler.iterations, 500);
        assert_eq!(config.sampler.seed, 7);
        assert_eq!(config.sampler.strategy, SamplingStrategy::Random);
        assert_eq!(
            config.sampler.exhaustive_threshold,
            SamplerConfig::DEFAULT_EXHAUSTIVE_THRESHOLD
        );
    }

    #[test]
    fn test_malformed_config_is_rejected() {
        let err = RunConfig::from_toml_str("parallel = \"yes\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = RunConfig::from_path("/nonexistent/headgate.toml").unwrap_err();
        match err {
            ConfigError::Io { path, .. } => {
                assert_eq!(path, Path::new("/nonexistent/headgate.toml"));
            }
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
