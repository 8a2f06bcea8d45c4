//! The [`DaqBinding`] trait is the seam between the adapter and the vendor library.
//!
//! Everything that touches hardware (enumeration, capability queries, reading, writing,
//! counting and resetting) goes through this trait. `nidaqctrl_backend` implements it on top
//! of NI-DAQmx; [`MockBinding`](crate::mock::MockBinding) implements it in memory for tests.
//!
//! All calls are synchronous and blocking. Channel arguments are fully addressed
//! (`device/channel`).

use ndarray::Array1;

use crate::config::{ChanConfig, TriggerSlope};
use crate::error::DaqResult;

/// Everything a binding needs to perform one finite analog-input acquisition.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadRequest {
    pub config: ChanConfig,
    pub samples: usize,
    pub freq: f64,
    /// Return the mean of the acquisition as a single-element array.
    pub averaging: bool,
    pub min_volts: f64,
    pub max_volts: f64,
    pub triggered: bool,
    pub trigger_slope: TriggerSlope,
    pub pre_trig_samples: usize,
}

/// Capability metadata of a card. Queried once at construction, for diagnostics only.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeviceInfo {
    pub device_type: String,
    /// (min, max) voltage pairs supported on the analog inputs.
    pub ai_ranges: Vec<(f64, f64)>,
    /// (min, max) voltage pairs supported on the analog outputs.
    pub ao_ranges: Vec<(f64, f64)>,
    /// Maximum single channel rate of the analog inputs, in S/s.
    pub ai_max_rate: f64,
    /// Minimum rate of the analog inputs, in S/s.
    pub ai_min_rate: f64,
    /// Maximum rate of the analog outputs, in S/s.
    pub ao_max_rate: f64,
    pub simultaneous_sampling: bool,
}

impl DeviceInfo {
    /// Queries every capability of `device` from `binding`.
    pub fn query<B: DaqBinding + ?Sized>(binding: &B, device: &str) -> DaqResult<Self> {
        Ok(Self {
            device_type: binding.device_type(device)?,
            ai_ranges: binding.input_voltage_ranges(device)?,
            ao_ranges: binding.output_voltage_ranges(device)?,
            ai_max_rate: binding.maximum_input_channel_rate(device)?,
            ai_min_rate: binding.minimum_input_channel_rate(device)?,
            ao_max_rate: binding.maximum_output_channel_rate(device)?,
            simultaneous_sampling: binding.simultaneous_sampling_support(device)?,
        })
    }

    /// Writes the capabilities to the log at info level.
    pub fn log(&self) {
        log::info!("NI daq device type: {}", self.device_type);
        log::info!("Voltage ranges on the inputs: {:?}", self.ai_ranges);
        log::info!("Voltage ranges on the outputs: {:?}", self.ao_ranges);
        log::info!(
            "Minimum single channel rate for analog inputs: {:.1} kS/s",
            self.ai_min_rate / 1000.
        );
        log::info!(
            "Maximum single channel rate for analog inputs: {:.1} kS/s",
            self.ai_max_rate / 1000.
        );
        log::info!(
            "Maximum channel rate for analog output: {:.1} kS/s",
            self.ao_max_rate / 1000.
        );
        if self.simultaneous_sampling {
            log::info!("This DAQ supports simultaneous sampling.");
        } else {
            log::info!("This DAQ does not support simultaneous sampling.");
        }
    }
}

/// Hardware operations consumed by the adapter.
///
/// Implementations report failures as [`DaqError`](crate::DaqError); the adapter passes them
/// to its caller unmodified.
pub trait DaqBinding {
    // Enumeration
    fn device_names(&self) -> DaqResult<Vec<String>>;
    fn physical_input_channels(&self, device: &str) -> DaqResult<Vec<String>>;
    fn physical_output_channels(&self, device: &str) -> DaqResult<Vec<String>>;
    fn physical_counter_channels(&self, device: &str) -> DaqResult<Vec<String>>;

    // Capabilities
    fn input_voltage_ranges(&self, device: &str) -> DaqResult<Vec<(f64, f64)>>;
    fn output_voltage_ranges(&self, device: &str) -> DaqResult<Vec<(f64, f64)>>;
    fn maximum_input_channel_rate(&self, device: &str) -> DaqResult<f64>;
    fn minimum_input_channel_rate(&self, device: &str) -> DaqResult<f64>;
    fn maximum_output_channel_rate(&self, device: &str) -> DaqResult<f64>;
    fn device_type(&self, device: &str) -> DaqResult<String>;
    fn simultaneous_sampling_support(&self, device: &str) -> DaqResult<bool>;

    // Operations
    /// Acquires from an analog input, returning volts.
    fn read(&self, devchan: &str, request: &ReadRequest) -> DaqResult<Array1<f64>>;
    /// Commands an analog output to `volts`. Returns whether the sample was written.
    fn write(&self, devchan: &str, volts: f64) -> DaqResult<bool>;
    /// Counts edges on a counter for `1 / freq` seconds, optionally gated on `src`.
    fn read_counter(&self, devchan: &str, src: Option<&str>, freq: f64) -> DaqResult<u32>;
    fn reset_device(&self, device: &str) -> DaqResult<()>;
}
