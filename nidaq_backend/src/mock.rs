//! An in-memory NI card implementing [`DaqBinding`].
//!
//! The mock keeps its state behind an `Arc<Mutex<_>>`: clone the binding, hand one clone to
//! the adapter and keep the other to script input voltages and inspect the calls the adapter
//! made. Writes to an output are looped back onto the input given by
//! [`loopback_input`](crate::channel::loopback_input), like on the rack the driver was built for.
//!
//! Reads are served for any `ai<n>` channel of a known device, enumerated or not; unscripted
//! inputs read zero volts.

use indexmap::IndexMap;
use ndarray::Array1;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::binding::*;
use crate::channel::*;
use crate::error::{DaqError, DaqResult};

/// A call the adapter made on the mock.
#[derive(Debug, Clone, PartialEq)]
pub enum BindingCall {
    Read {
        devchan: String,
        request: ReadRequest,
    },
    Write {
        devchan: String,
        volts: f64,
    },
    ReadCounter {
        devchan: String,
        src: Option<String>,
        freq: f64,
    },
    Reset {
        device: String,
    },
}

#[derive(Debug, Clone)]
struct MockDevice {
    inputs: Vec<String>,
    outputs: Vec<String>,
    counters: Vec<String>,
    info: DeviceInfo,
    volts: IndexMap<String, Array1<f64>>,
    counts: IndexMap<String, u32>,
}

#[derive(Debug, Default)]
struct MockState {
    devices: IndexMap<String, MockDevice>,
    calls: Vec<BindingCall>,
    fail_next: Option<DaqError>,
}

#[derive(Debug, Clone, Default)]
pub struct MockBinding {
    state: Arc<Mutex<MockState>>,
}

impl MockBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a card named `name` with `ai0..`, `ao0..` and `ctr0..` channels.
    ///
    /// Capabilities mimic a PCIe-6259: ±10 V ranges, 1.25 MS/s input rate, 2.86 MS/s output.
    pub fn with_device(self, name: &str, n_inputs: usize, n_outputs: usize, n_counters: usize) -> Self {
        let chans = |kind: ChannelKind, n: usize| -> Vec<String> {
            (0..n)
                .map(|i| device_channel(name, &format!("{}{}", kind.prefix(), i)))
                .collect()
        };
        let device = MockDevice {
            inputs: chans(ChannelKind::Input, n_inputs),
            outputs: chans(ChannelKind::Output, n_outputs),
            counters: chans(ChannelKind::Counter, n_counters),
            info: DeviceInfo {
                device_type: "PCIe-6259".to_string(),
                ai_ranges: vec![(-10., 10.), (-5., 5.), (-1., 1.)],
                ao_ranges: vec![(-10., 10.), (-5., 5.)],
                ai_max_rate: 1.25e6,
                ai_min_rate: 0.0232831,
                ao_max_rate: 2.86e6,
                simultaneous_sampling: false,
            },
            volts: IndexMap::new(),
            counts: IndexMap::new(),
        };
        self.state.lock().devices.insert(name.to_string(), device);
        self
    }

    /// Scripts the voltages returned by reads of `devchan`.
    pub fn set_input(&self, devchan: &str, volts: Array1<f64>) {
        let Ok((device, _)) = split_devchan(devchan) else {
            return;
        };
        if let Some(dev) = self.state.lock().devices.get_mut(device) {
            dev.volts.insert(devchan.to_string(), volts);
        }
    }

    /// Scripts the edge count returned by `devchan`.
    pub fn set_counts(&self, devchan: &str, counts: u32) {
        let mut state = self.state.lock();
        if let Some(dev) = state.devices.values_mut().find(|d| d.counters.iter().any(|c| c == devchan)) {
            dev.counts.insert(devchan.to_string(), counts);
        }
    }

    /// Makes the next read, write, counter read or reset fail with `err`.
    pub fn fail_next(&self, err: DaqError) {
        self.state.lock().fail_next = Some(err);
    }

    pub fn calls(&self) -> Vec<BindingCall> {
        self.state.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    fn device<R>(&self, device: &str, f: impl FnOnce(&MockDevice) -> R) -> DaqResult<R> {
        let state = self.state.lock();
        state
            .devices
            .get(device)
            .map(f)
            .ok_or_else(|| DaqError::Binding(format!("Device {} not found", device)))
    }

    // Records the call, then fails if a failure was scripted
    fn record(&self, call: BindingCall) -> DaqResult<()> {
        let mut state = self.state.lock();
        state.calls.push(call);
        match state.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn split_devchan(devchan: &str) -> DaqResult<(&str, &str)> {
    devchan
        .split_once('/')
        .ok_or_else(|| DaqError::Binding(format!("Channel {} is not of form device/channel", devchan)))
}

impl DaqBinding for MockBinding {
    fn device_names(&self) -> DaqResult<Vec<String>> {
        Ok(self.state.lock().devices.keys().cloned().collect())
    }
    fn physical_input_channels(&self, device: &str) -> DaqResult<Vec<String>> {
        self.device(device, |d| d.inputs.clone())
    }
    fn physical_output_channels(&self, device: &str) -> DaqResult<Vec<String>> {
        self.device(device, |d| d.outputs.clone())
    }
    fn physical_counter_channels(&self, device: &str) -> DaqResult<Vec<String>> {
        self.device(device, |d| d.counters.clone())
    }
    fn input_voltage_ranges(&self, device: &str) -> DaqResult<Vec<(f64, f64)>> {
        self.device(device, |d| d.info.ai_ranges.clone())
    }
    fn output_voltage_ranges(&self, device: &str) -> DaqResult<Vec<(f64, f64)>> {
        self.device(device, |d| d.info.ao_ranges.clone())
    }
    fn maximum_input_channel_rate(&self, device: &str) -> DaqResult<f64> {
        self.device(device, |d| d.info.ai_max_rate)
    }
    fn minimum_input_channel_rate(&self, device: &str) -> DaqResult<f64> {
        self.device(device, |d| d.info.ai_min_rate)
    }
    fn maximum_output_channel_rate(&self, device: &str) -> DaqResult<f64> {
        self.device(device, |d| d.info.ao_max_rate)
    }
    fn device_type(&self, device: &str) -> DaqResult<String> {
        self.device(device, |d| d.info.device_type.clone())
    }
    fn simultaneous_sampling_support(&self, device: &str) -> DaqResult<bool> {
        self.device(device, |d| d.info.simultaneous_sampling)
    }

    fn read(&self, devchan: &str, request: &ReadRequest) -> DaqResult<Array1<f64>> {
        self.record(BindingCall::Read {
            devchan: devchan.to_string(),
            request: request.clone(),
        })?;
        let (device, chan) = split_devchan(devchan)?;
        if ChannelKind::classify(chan) != Some(ChannelKind::Input) {
            return Err(DaqError::Binding(format!("{} is not an analog input", devchan)));
        }
        let volts = self.device(device, |d| {
            d.volts
                .get(devchan)
                .cloned()
                .unwrap_or_else(|| Array1::zeros(request.samples))
        })?;
        if request.averaging {
            let mean = volts.mean().unwrap_or(0.0);
            Ok(Array1::from_elem(1, mean))
        } else {
            Ok(volts)
        }
    }

    fn write(&self, devchan: &str, volts: f64) -> DaqResult<bool> {
        self.record(BindingCall::Write {
            devchan: devchan.to_string(),
            volts,
        })?;
        let (device, chan) = split_devchan(devchan)?;
        let is_output = self.device(device, |d| d.outputs.iter().any(|c| c == devchan))?;
        if !is_output {
            return Err(DaqError::Binding(format!("Output channel {} not found", devchan)));
        }
        self.set_input(&device_channel(device, &loopback_input(chan)), Array1::from_elem(1, volts));
        Ok(true)
    }

    fn read_counter(&self, devchan: &str, src: Option<&str>, freq: f64) -> DaqResult<u32> {
        self.record(BindingCall::ReadCounter {
            devchan: devchan.to_string(),
            src: src.map(|s| s.to_string()),
            freq,
        })?;
        let (device, _) = split_devchan(devchan)?;
        let counts = self.device(device, |d| {
            d.counters
                .iter()
                .any(|c| c == devchan)
                .then(|| d.counts.get(devchan).copied().unwrap_or(0))
        })?;
        counts.ok_or_else(|| DaqError::Binding(format!("Counter channel {} not found", devchan)))
    }

    fn reset_device(&self, device: &str) -> DaqResult<()> {
        self.record(BindingCall::Reset {
            device: device.to_string(),
        })?;
        let mut state = self.state.lock();
        match state.devices.get_mut(device) {
            Some(dev) => {
                dev.volts.clear();
                Ok(())
            }
            None => Err(DaqError::Binding(format!("Device {} not found", device))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ChanConfig, TriggerSlope};
    use ndarray::array;

    fn request(averaging: bool) -> ReadRequest {
        ReadRequest {
            config: ChanConfig::Diff,
            samples: 4,
            freq: 1000.,
            averaging,
            min_volts: -10.,
            max_volts: 10.,
            triggered: false,
            trigger_slope: TriggerSlope::Pos,
            pre_trig_samples: 2,
        }
    }

    #[test]
    fn enumerates_channels() {
        let mock = MockBinding::new().with_device("Dev1", 2, 1, 1);
        assert_eq!(mock.device_names().unwrap(), vec!["Dev1"]);
        assert_eq!(
            mock.physical_input_channels("Dev1").unwrap(),
            vec!["Dev1/ai0", "Dev1/ai1"]
        );
        assert_eq!(mock.physical_counter_channels("Dev1").unwrap(), vec!["Dev1/ctr0"]);
        assert!(mock.physical_output_channels("Dev2").is_err());
    }

    #[test]
    fn averaging_returns_the_mean() {
        let mock = MockBinding::new().with_device("Dev1", 1, 0, 0);
        mock.set_input("Dev1/ai0", array![1.0, 2.0, 3.0]);
        assert_eq!(mock.read("Dev1/ai0", &request(true)).unwrap(), array![2.0]);
        assert_eq!(
            mock.read("Dev1/ai0", &request(false)).unwrap(),
            array![1.0, 2.0, 3.0]
        );
    }

    #[test]
    fn writes_loop_back() {
        let mock = MockBinding::new().with_device("Dev1", 8, 2, 0);
        assert!(mock.write("Dev1/ao1", 1.5).unwrap());
        assert_eq!(mock.read("Dev1/ai7", &request(true)).unwrap(), array![1.5]);
    }

    #[test]
    fn scripted_failure_is_returned_once() {
        let mock = MockBinding::new().with_device("Dev1", 0, 0, 0);
        mock.fail_next(DaqError::Binding("boom".into()));
        assert!(mock.reset_device("Dev1").is_err());
        assert!(mock.reset_device("Dev1").is_ok());
        assert_eq!(mock.calls().len(), 2);
    }
}
