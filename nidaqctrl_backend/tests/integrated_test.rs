use rstest::rstest;
use std::collections::HashSet;

use nidaq_backend::{ChanConfig, TriggerSlope};
use nidaqctrl_backend::utils::*;

#[rstest]
#[case("RSE", DAQMX_VAL_RSE)]
#[case("NRSE", DAQMX_VAL_NRSE)]
#[case("Diff", DAQMX_VAL_DIFF)]
#[case("PseudoDiff", DAQMX_VAL_PSEUDODIFF)]
#[case("Default", DAQMX_VAL_CFG_DEFAULT)]
fn chan_config_options_reach_the_driver(#[case] option: &str, #[case] expected: i32) {
    let config: ChanConfig = option.parse().unwrap();
    assert_eq!(terminal_config(config), expected);
}

#[test]
fn every_chan_config_has_a_distinct_terminal_config() {
    let values: HashSet<i32> = ChanConfig::ALL.iter().map(|c| terminal_config(*c)).collect();
    assert_eq!(values.len(), ChanConfig::ALL.len());
}

#[rstest]
#[case("POS", DAQMX_VAL_RISING_SLOPE)]
#[case("neg", DAQMX_VAL_FALLING_SLOPE)]
fn trigger_slopes_reach_the_driver(#[case] slope: &str, #[case] expected: i32) {
    let slope: TriggerSlope = slope.parse().unwrap();
    assert_eq!(trigger_slope(slope), expected);
}

#[test]
fn decodes_device_queries() {
    // As filled in by DAQmxGetDevAIPhysicalChans and DAQmxGetDevAIVoltageRngs on a PCIe-6259
    let chans = split_channel_list("Dev1/ai0, Dev1/ai1, Dev1/ai2, Dev1/ai3");
    assert_eq!(chans.len(), 4);
    assert_eq!(chans[3], "Dev1/ai3");

    let mut flat = vec![0.0; 64];
    flat[..8].copy_from_slice(&[-0.1, 0.1, -0.2, 0.2, -0.5, 0.5, -1., 1.]);
    assert_eq!(
        pair_ranges(&flat),
        vec![(-0.1, 0.1), (-0.2, 0.2), (-0.5, 0.5), (-1., 1.)]
    );
}

#[test]
fn counter_source_is_routed_as_a_terminal() {
    let src = nidaq_backend::device_channel("Dev1", "PFI0");
    assert_eq!(terminal_name(&src), "/Dev1/PFI0");
}
