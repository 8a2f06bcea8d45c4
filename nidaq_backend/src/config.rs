//! Acquisition settings: wiring mode, trigger slope, per-read options and the constructor
//! configuration of [`NiDaq`](crate::instrument::NiDaq).

use std::fmt;
use std::str::FromStr;

use crate::error::DaqError;

/// Analog-input terminal configuration (wiring mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChanConfig {
    /// Let the driver pick the default for the channel.
    Default,
    /// Referenced single-ended.
    RSE,
    /// Non-referenced single-ended.
    NRSE,
    /// Differential.
    #[default]
    Diff,
    /// Pseudo-differential.
    PseudoDiff,
}

impl ChanConfig {
    /// Every wiring mode, in the order they are offered as parameter options.
    pub const ALL: [ChanConfig; 5] = [
        ChanConfig::Default,
        ChanConfig::RSE,
        ChanConfig::NRSE,
        ChanConfig::Diff,
        ChanConfig::PseudoDiff,
    ];

    /// Option strings as exposed on the `chan_config` parameter.
    pub fn option_list() -> Vec<String> {
        Self::ALL.iter().map(|c| c.to_string()).collect()
    }
}

impl fmt::Display for ChanConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ChanConfig::Default => "Default",
                ChanConfig::RSE => "RSE",
                ChanConfig::NRSE => "NRSE",
                ChanConfig::Diff => "Diff",
                ChanConfig::PseudoDiff => "PseudoDiff",
            }
        )
    }
}

impl FromStr for ChanConfig {
    type Err = DaqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChanConfig::ALL
            .iter()
            .find(|c| c.to_string() == s)
            .copied()
            .ok_or_else(|| DaqError::InvalidOption {
                name: "chan_config".to_string(),
                value: s.to_string(),
                options: ChanConfig::option_list(),
            })
    }
}

/// Edge on which a triggered acquisition fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerSlope {
    #[default]
    Pos,
    Neg,
}

impl fmt::Display for TriggerSlope {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TriggerSlope::Pos => write!(f, "POS"),
            TriggerSlope::Neg => write!(f, "NEG"),
        }
    }
}

impl FromStr for TriggerSlope {
    type Err = DaqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "POS" => Ok(TriggerSlope::Pos),
            "NEG" => Ok(TriggerSlope::Neg),
            _ => Err(DaqError::InvalidOption {
                name: "trig_slope".to_string(),
                value: s.to_string(),
                options: vec!["POS".to_string(), "NEG".to_string()],
            }),
        }
    }
}

/// Per-call options of an analog input acquisition.
///
/// The defaults are those used when an input parameter is read through `get`: averaged,
/// clamped to ±10 V, untriggered, with the minimum of 2 pre-trigger samples.
#[derive(Debug, Clone, PartialEq)]
pub struct InputOptions {
    pub average: bool,
    pub min_volts: f64,
    pub max_volts: f64,
    pub trigger: bool,
    pub trig_slope: TriggerSlope,
    pub pre_trigger_samples: usize,
}

impl Default for InputOptions {
    fn default() -> Self {
        Self {
            average: true,
            min_volts: -10.0,
            max_volts: 10.0,
            trigger: false,
            trig_slope: TriggerSlope::Pos,
            pre_trigger_samples: 2,
        }
    }
}

/// Constructor configuration of the adapter.
///
/// # Example
/// ```
/// use nidaq_backend::DaqConfig;
///
/// let cfg = DaqConfig { samples: 500, ..DaqConfig::default() };
/// assert_eq!(cfg.freq, 10000.0);
/// assert!(!cfg.reset);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DaqConfig {
    /// Number of samples taken per acquisition.
    pub samples: usize,
    /// Sampling rate in samples per second.
    pub freq: f64,
    /// Reset the device at the end of construction instead of reading back every channel.
    pub reset: bool,
    /// Counter integration time in seconds.
    pub count_time: f64,
    /// Initial analog-input wiring mode.
    pub chan_config: ChanConfig,
}

impl Default for DaqConfig {
    fn default() -> Self {
        Self {
            samples: 100,
            freq: 10000.0,
            reset: false,
            count_time: 0.1,
            chan_config: ChanConfig::Diff,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chan_config_round_trips_through_its_options() {
        for opt in ChanConfig::option_list() {
            let cfg: ChanConfig = opt.parse().unwrap();
            assert_eq!(cfg.to_string(), opt);
        }
    }

    #[test]
    fn chan_config_is_case_sensitive() {
        // "DIFF" is not one of the declared options
        assert!(matches!(
            "DIFF".parse::<ChanConfig>(),
            Err(DaqError::InvalidOption { .. })
        ));
    }

    #[test]
    fn trigger_slope_parsing() {
        assert_eq!("POS".parse::<TriggerSlope>().unwrap(), TriggerSlope::Pos);
        assert_eq!("neg".parse::<TriggerSlope>().unwrap(), TriggerSlope::Neg);
        assert!("UP".parse::<TriggerSlope>().is_err());
    }

    #[test]
    fn input_option_defaults() {
        let opts = InputOptions::default();
        assert!(opts.average);
        assert!(!opts.trigger);
        assert_eq!(opts.pre_trigger_samples, 2);
        assert_eq!((opts.min_volts, opts.max_volts), (-10.0, 10.0));
    }
}
