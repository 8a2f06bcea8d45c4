//! Pure helpers for talking to NI-DAQmx: value constants, enum translation and decoding of
//! the string and range buffers the `DAQmxGetDev*` queries fill in.
//!
//! Nothing here calls into the driver, so it builds and is tested without `NIDAQmx`.

use nidaq_backend::{ChanConfig, TriggerSlope};

pub const DAQMX_VAL_CFG_DEFAULT: i32 = -1;
pub const DAQMX_VAL_RSE: i32 = 10083;
pub const DAQMX_VAL_NRSE: i32 = 10078;
pub const DAQMX_VAL_DIFF: i32 = 10106;
pub const DAQMX_VAL_PSEUDODIFF: i32 = 12529;
pub const DAQMX_VAL_RISING_SLOPE: i32 = 10280;
pub const DAQMX_VAL_FALLING_SLOPE: i32 = 10171;

/// Analog level (V) at which a triggered acquisition fires.
pub const TRIGGER_LEVEL: f64 = 0.0;
/// Slack (s) added on top of the acquisition duration before a read times out.
pub const READ_TIMEOUT_SLACK: f64 = 1.0;

/// Translates a wiring mode into the `terminalConfig` value of `DAQmxCreateAIVoltageChan`.
pub fn terminal_config(config: ChanConfig) -> i32 {
    match config {
        ChanConfig::Default => DAQMX_VAL_CFG_DEFAULT,
        ChanConfig::RSE => DAQMX_VAL_RSE,
        ChanConfig::NRSE => DAQMX_VAL_NRSE,
        ChanConfig::Diff => DAQMX_VAL_DIFF,
        ChanConfig::PseudoDiff => DAQMX_VAL_PSEUDODIFF,
    }
}

pub fn trigger_slope(slope: TriggerSlope) -> i32 {
    match slope {
        TriggerSlope::Pos => DAQMX_VAL_RISING_SLOPE,
        TriggerSlope::Neg => DAQMX_VAL_FALLING_SLOPE,
    }
}

/// Splits a comma-separated NI list (`"Dev1/ai0, Dev1/ai1"`) into its entries.
pub fn split_channel_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Pairs up a flat `[min0, max0, min1, max1, ...]` range buffer.
///
/// The driver leaves the unused tail of the buffer zeroed; decoding stops at the first
/// `(0, 0)` pair.
pub fn pair_ranges(flat: &[f64]) -> Vec<(f64, f64)> {
    flat.chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .take_while(|&(lo, hi)| !(lo == 0.0 && hi == 0.0))
        .collect()
}

/// Fully qualifies a terminal name with a leading `/`, as NI-DAQmx expects for routing.
pub fn terminal_name(src: &str) -> String {
    if src.starts_with('/') {
        src.to_string()
    } else {
        format!("/{}", src)
    }
}

/// Timeout in seconds for a finite acquisition of `samples` at `freq`.
pub fn read_timeout(samples: usize, freq: f64) -> f64 {
    samples as f64 / freq + READ_TIMEOUT_SLACK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_lists() {
        assert_eq!(
            split_channel_list("Dev1/ai0, Dev1/ai1,Dev1/ai2"),
            vec!["Dev1/ai0", "Dev1/ai1", "Dev1/ai2"]
        );
        assert!(split_channel_list("").is_empty());
        assert_eq!(split_channel_list("Dev1"), vec!["Dev1"]);
    }

    #[test]
    fn pairs_ranges_until_zero_tail() {
        let flat = [-10., 10., -5., 5., 0., 0., 0., 0.];
        assert_eq!(pair_ranges(&flat), vec![(-10., 10.), (-5., 5.)]);
        assert_eq!(pair_ranges(&[0., 5., 0., 0.]), vec![(0., 5.)]);
        assert!(pair_ranges(&[]).is_empty());
    }

    #[test]
    fn qualifies_terminals() {
        assert_eq!(terminal_name("Dev1/PFI0"), "/Dev1/PFI0");
        assert_eq!(terminal_name("/Dev1/PFI0"), "/Dev1/PFI0");
    }

    #[test]
    fn translates_enums() {
        assert_eq!(terminal_config(ChanConfig::Diff), DAQMX_VAL_DIFF);
        assert_eq!(terminal_config(ChanConfig::Default), DAQMX_VAL_CFG_DEFAULT);
        assert_eq!(trigger_slope(TriggerSlope::Neg), DAQMX_VAL_FALLING_SLOPE);
    }

    #[test]
    fn timeout_covers_acquisition() {
        assert_eq!(read_timeout(2000, 1000.), 3.0);
    }
}
