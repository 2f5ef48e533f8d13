//! MCTS configuration parameters.

use crate::search::SearchError;

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone, PartialEq)]
pub struct MctsConfig {
    /// Number of simulations to run per search.
    pub num_simulations: u32,

    /// Exploration constant for the PUCT formula.
    /// Useful range is roughly 1 - 10; higher values spread visits wider.
    pub c_puct: f32,

    /// Dirichlet noise alpha for root exploration.
    /// 0.0 disables noise, which is the default for match play.
    pub dirichlet_alpha: f32,

    /// Fraction of each root prior replaced by Dirichlet noise.
    pub dirichlet_epsilon: f32,

    /// Temperature for action selection after search.
    /// 0.0 = always pick the most-visited child
    /// 1.0 = sample proportional to visit counts
    pub temperature: f32,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_simulations: 1000,
            c_puct: 4.0,
            dirichlet_alpha: 0.0,
            dirichlet_epsilon: 0.25,
            temperature: 0.0,
        }
    }
}

impl MctsConfig {
    /// Config for generating training games: root noise and proportional sampling.
    pub fn for_training() -> Self {
        Self {
            dirichlet_alpha: 0.3,
            temperature: 1.0,
            ..Self::default()
        }
    }

    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            num_simulations: 50,
            ..Self::default()
        }
    }

    pub fn with_simulations(mut self, n: u32) -> Self {
        self.num_simulations = n;
        self
    }

    pub fn with_c_puct(mut self, c: f32) -> Self {
        self.c_puct = c;
        self
    }

    pub fn with_temperature(mut self, t: f32) -> Self {
        self.temperature = t;
        self
    }

    pub fn with_dirichlet(mut self, alpha: f32, epsilon: f32) -> Self {
        self.dirichlet_alpha = alpha;
        self.dirichlet_epsilon = epsilon;
        self
    }

    /// Reject settings the search cannot run with.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.num_simulations == 0 {
            return Err(SearchError::InvalidConfig(
                "num_simulations must be at least 1".into(),
            ));
        }
        if !(self.c_puct.is_finite() && self.c_puct > 0.0) {
            return Err(SearchError::InvalidConfig(format!(
                "c_puct must be positive, got {}",
                self.c_puct
            )));
        }
        if self.dirichlet_alpha.is_nan() || self.dirichlet_alpha < 0.0 {
            return Err(SearchError::InvalidConfig(format!(
                "dirichlet_alpha must be non-negative, got {}",
                self.dirichlet_alpha
            )));
        }
        if !(0.0..=1.0).contains(&self.dirichlet_epsilon) {
            return Err(SearchError::InvalidConfig(format!(
                "dirichlet_epsilon must be in [0, 1], got {}",
                self.dirichlet_epsilon
            )));
        }
        if self.temperature.is_nan() || self.temperature < 0.0 {
            return Err(SearchError::InvalidConfig(format!(
                "temperature must be non-negative, got {}",
                self.temperature
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert_eq!(config.num_simulations, 1000);
        assert!((config.c_puct - 4.0).abs() < 1e-6);
        assert_eq!(config.dirichlet_alpha, 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = MctsConfig::default()
            .with_simulations(100)
            .with_c_puct(5.0)
            .with_temperature(0.5);

        assert_eq!(config.num_simulations, 100);
        assert!((config.c_puct - 5.0).abs() < 1e-6);
        assert!((config.temperature - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_training_config_has_noise() {
        let config = MctsConfig::for_training();
        assert!(config.dirichlet_alpha > 0.0);
        assert!((config.temperature - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(MctsConfig::default().with_simulations(0).validate().is_err());
        assert!(MctsConfig::default().with_c_puct(0.0).validate().is_err());
        assert!(MctsConfig::default().with_c_puct(f32::NAN).validate().is_err());
        assert!(MctsConfig::default()
            .with_dirichlet(-0.1, 0.25)
            .validate()
            .is_err());
        assert!(MctsConfig::default()
            .with_dirichlet(0.3, 1.5)
            .validate()
            .is_err());
        assert!(MctsConfig::default()
            .with_temperature(-1.0)
            .validate()
            .is_err());
    }
}
