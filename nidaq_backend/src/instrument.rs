//! The instrument adapter for a single NI DAQ card.
//!
//! ## Overview
//!
//! [`NiDaq`] owns one device handle and one [`DaqBinding`]. On construction it queries the
//! card's channels and declares one parameter per analog input, analog output and counter,
//! plus the configuration knobs (`chan_config`, `count_time`, `samples`, `freq`) and the
//! `reset` function. The host framework then drives the card through [`NiDaq::get`] and
//! [`NiDaq::set`], which validate against the declarations and dispatch to the typed methods:
//!
//! - [`NiDaq::read_input`]: finite acquisition, returned in millivolts.
//! - [`NiDaq::set_output`] / [`NiDaq::output`]: command an output in millivolts, read back
//!   the last commanded value.
//! - [`NiDaq::read_counter`]: count edges for `count_time` seconds.
//!
//! ## Output cache
//!
//! NI cards cannot report the value an analog output was last commanded to. The adapter keeps
//! the last value written per output and seeds it at construction by reading the input each
//! output is wired back to (see [`loopback_input`]).
//!
//! ## Example
//!
//! ```
//! use nidaq_backend::*;
//!
//! let card = MockBinding::new().with_device("Dev1", 8, 2, 1);
//! let mut daq = NiDaq::try_new(card, "Dev1", DaqConfig::default()).unwrap();
//!
//! daq.set("ao0", ParamValue::Float(250.0)).unwrap();
//! assert_eq!(daq.get("ao0").unwrap(), ParamValue::Float(250.0));
//! ```

use indexmap::IndexMap;
use ndarray::Array1;

use crate::binding::*;
use crate::channel::*;
use crate::config::*;
use crate::error::{DaqError, DaqResult};
use crate::parameter::*;

/// Millivolts per volt.
const MV_PER_V: f64 = 1000.0;
/// Bounds of the analog output parameters, in mV.
const OUTPUT_LIMIT_MV: f64 = 10000.0;

pub struct NiDaq<B: DaqBinding> {
    id: String,
    binding: B,
    info: DeviceInfo,
    params: ParameterTable,
    output: IndexMap<String, f64>,
    counter_src: IndexMap<String, Option<String>>,
    chan_config: ChanConfig,
    count_time: f64,
    samples: usize,
    freq: f64,
}

impl<B: DaqBinding> NiDaq<B> {
    /// Initializes the card `id` behind `binding`.
    ///
    /// Declares the parameters, applies `config`, seeds the output cache from the loopback
    /// inputs and finally either resets the device (`config.reset`) or reads back every input
    /// and output.
    ///
    /// # Errors
    /// Any binding failure during the capability queries, the seeding reads or the final
    /// reset/read-back. A `config.freq` outside the card's input rate range is rejected with
    /// [`DaqError::ValueOutOfRange`].
    pub fn try_new(binding: B, id: &str, config: DaqConfig) -> DaqResult<Self> {
        let info = DeviceInfo::query(&binding, id)?;
        info.log();

        let mut daq = Self {
            id: id.to_string(),
            binding,
            info,
            params: ParameterTable::new(),
            output: IndexMap::new(),
            counter_src: IndexMap::new(),
            chan_config: config.chan_config,
            count_time: config.count_time,
            samples: config.samples,
            freq: config.freq,
        };
        daq.declare_parameters()?;

        daq.set("chan_config", ParamValue::Str(config.chan_config.to_string()))?;
        daq.set("count_time", ParamValue::Float(config.count_time))?;
        daq.set("samples", ParamValue::Int(config.samples as i64))?;
        daq.set("freq", ParamValue::Float(config.freq))?;

        daq.refresh_output_cache()?;

        if config.reset {
            daq.reset()?;
        } else {
            daq.get_all()?;
        }
        Ok(daq)
    }

    fn declare_parameters(&mut self) -> DaqResult<()> {
        self.params.add_parameter(
            Parameter::new(
                "chan_config",
                ParamRole::ChanConfig,
                ParamFlags::SET | ParamFlags::SOFTGET,
                ParamType::Str,
            )
            .with_options(ChanConfig::option_list()),
        );

        for ch_in in self.input_channels()? {
            let ch_in = bare_channel(&ch_in);
            self.params.add_parameter(
                Parameter::new(ch_in, ParamRole::Input, ParamFlags::GET, ParamType::Array)
                    .with_channel(ch_in)
                    .with_units("mV")
                    .with_format("%.02f")
                    .with_tags(&["measure"]),
            );
        }

        for ch_out in self.output_channels()? {
            let ch_out = bare_channel(&ch_out);
            self.params.add_parameter(
                Parameter::new(ch_out, ParamRole::Output, ParamFlags::GETSET, ParamType::Float)
                    .with_channel(ch_out)
                    .with_bounds(-OUTPUT_LIMIT_MV, OUTPUT_LIMIT_MV)
                    .with_units("mV")
                    .with_format("%.02f")
                    .with_tags(&["sweep"])
                    .with_ramp(100., 50),
            );
        }

        for ch_ctr in self.counter_channels()? {
            let ch_ctr = bare_channel(&ch_ctr);
            self.params.add_parameter(
                Parameter::new(ch_ctr, ParamRole::Counter, ParamFlags::GET, ParamType::Int)
                    .with_channel(ch_ctr)
                    .with_units("#")
                    .with_tags(&["measure"]),
            );
            self.params.add_parameter(
                Parameter::new(
                    &format!("{}_src", ch_ctr),
                    ParamRole::CounterSrc,
                    ParamFlags::SET | ParamFlags::SOFTGET,
                    ParamType::Str,
                )
                .with_channel(ch_ctr),
            );
            self.counter_src.insert(ch_ctr.to_string(), None);
        }

        self.params.add_parameter(
            Parameter::new(
                "count_time",
                ParamRole::CountTime,
                ParamFlags::SET | ParamFlags::SOFTGET,
                ParamType::Float,
            )
            .with_units("s"),
        );
        self.params.add_parameter(
            Parameter::new(
                "samples",
                ParamRole::Samples,
                ParamFlags::SET | ParamFlags::SOFTGET,
                ParamType::Int,
            )
            .with_units("#"),
        );
        self.params.add_parameter(
            Parameter::new(
                "freq",
                ParamRole::Freq,
                ParamFlags::SET | ParamFlags::SOFTGET,
                ParamType::Float,
            )
            .with_units("#/s")
            .with_bounds(self.info.ai_min_rate, self.info.ai_max_rate),
        );

        self.params.add_function("reset");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Field methods
    // ------------------------------------------------------------------

    /// Device identifier as set in the NI configuration (e.g. `Dev1`).
    pub fn id(&self) -> &str {
        &self.id
    }
    /// Capabilities queried at construction.
    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }
    /// Parameters and functions declared for the card.
    pub fn parameters(&self) -> &ParameterTable {
        &self.params
    }
    pub fn binding(&self) -> &B {
        &self.binding
    }
    /// Last commanded value of every output, in mV.
    pub fn output_cache(&self) -> &IndexMap<String, f64> {
        &self.output
    }
    /// Wiring mode used for analog input acquisitions.
    pub fn chan_config(&self) -> ChanConfig {
        self.chan_config
    }
    /// Counter integration time, in seconds.
    pub fn count_time(&self) -> f64 {
        self.count_time
    }
    pub fn samples(&self) -> usize {
        self.samples
    }
    /// Analog input sampling rate, in S/s.
    pub fn freq(&self) -> f64 {
        self.freq
    }

    pub fn set_chan_config(&mut self, config: ChanConfig) {
        self.chan_config = config;
    }
    /// Sets the counter integration time, in seconds.
    pub fn set_count_time(&mut self, count_time: f64) {
        self.count_time = count_time;
    }
    /// Sets the number of samples taken in a single acquisition.
    pub fn set_samples(&mut self, samples: usize) {
        self.samples = samples;
    }
    pub fn set_freq(&mut self, freq: f64) {
        self.freq = freq;
    }

    // ------------------------------------------------------------------
    // Channel enumeration
    // ------------------------------------------------------------------

    /// Physical analog inputs of the card, fully addressed.
    pub fn input_channels(&self) -> DaqResult<Vec<String>> {
        self.binding.physical_input_channels(&self.id)
    }
    pub fn output_channels(&self) -> DaqResult<Vec<String>> {
        self.binding.physical_output_channels(&self.id)
    }
    pub fn counter_channels(&self) -> DaqResult<Vec<String>> {
        self.binding.physical_counter_channels(&self.id)
    }

    // ------------------------------------------------------------------
    // Hardware operations
    // ------------------------------------------------------------------

    /// Reads `self.samples()` samples from an analog input and returns them in mV.
    ///
    /// # Errors
    /// [`DaqError::InvalidConfiguration`] when `opts.pre_trigger_samples < 2` or when the
    /// configured sample count is below `opts.pre_trigger_samples + 2`; otherwise whatever the
    /// binding reports.
    pub fn read_input(&self, channel: &str, opts: &InputOptions) -> DaqResult<Array1<f64>> {
        if opts.pre_trigger_samples < 2 {
            return Err(DaqError::InvalidConfiguration(
                "The number of pre_trigger samples has to be larger than 1.".to_string(),
            ));
        }
        let min_samples = opts.pre_trigger_samples.checked_add(2);
        if min_samples.map_or(true, |min| self.samples < min) {
            return Err(DaqError::InvalidConfiguration(format!(
                "The total number of samples ({}) has to be larger than the number of pre trigger samples + 1 ({})",
                self.samples,
                opts.pre_trigger_samples.saturating_add(1)
            )));
        }
        let devchan = device_channel(&self.id, bare_channel(channel));
        let request = ReadRequest {
            config: self.chan_config,
            samples: self.samples,
            freq: self.freq,
            averaging: opts.average,
            min_volts: opts.min_volts,
            max_volts: opts.max_volts,
            triggered: opts.trigger,
            trigger_slope: opts.trig_slope,
            pre_trig_samples: opts.pre_trigger_samples,
        };
        log::debug!("Reading {} with {:?}", devchan, request);
        let volts = self.binding.read(&devchan, &request)?;
        Ok(volts * MV_PER_V)
    }

    /// Commands an analog output to `millivolts` and records it in the output cache.
    ///
    /// Returns the binding's success flag.
    pub fn set_output(&mut self, channel: &str, millivolts: f64) -> DaqResult<bool> {
        let channel = bare_channel(channel);
        let devchan = device_channel(&self.id, channel);
        self.output.insert(channel.to_string(), millivolts);
        log::debug!("Writing {} mV to {}", millivolts, devchan);
        self.binding.write(&devchan, millivolts / MV_PER_V)
    }

    /// Last value commanded to (or seeded for) an analog output, in mV.
    pub fn output(&self, channel: &str) -> DaqResult<f64> {
        let channel = bare_channel(channel);
        self.output
            .get(channel)
            .copied()
            .ok_or_else(|| DaqError::NoCachedOutput(channel.to_string()))
    }

    /// Counts edges on a counter during `count_time` seconds.
    ///
    /// The count is gated on the counter's `<ctr>_src` terminal when one is set.
    pub fn read_counter(&self, channel: &str) -> DaqResult<u32> {
        let channel = bare_channel(channel);
        let devchan = device_channel(&self.id, channel);
        let src = self
            .counter_src(channel)
            .filter(|src| !src.is_empty())
            .map(|src| device_channel(&self.id, src));
        let freq = 1.0 / self.count_time;
        log::debug!("Counting on {} (src {:?}) at {} Hz", devchan, src, freq);
        self.binding.read_counter(&devchan, src.as_deref(), freq)
    }

    /// Gating source of a counter, as set through `<ctr>_src`.
    pub fn counter_src(&self, channel: &str) -> Option<&str> {
        self.counter_src
            .get(bare_channel(channel))
            .and_then(|src| src.as_deref())
    }

    /// Sets the terminal a counter is gated on. An empty `src` leaves the counter ungated.
    pub fn set_counter_src(&mut self, channel: &str, src: &str) -> bool {
        self.counter_src
            .insert(bare_channel(channel).to_string(), Some(src.to_string()));
        true
    }

    /// Resets the device.
    pub fn reset(&mut self) -> DaqResult<()> {
        log::info!("Resetting NI device {}", self.id);
        self.binding.reset_device(&self.id)
    }

    /// Re-seeds the output cache by reading the input each output is wired back to.
    pub fn refresh_output_cache(&mut self) -> DaqResult<()> {
        let opts = InputOptions::default();
        for ch_out in self.output_channels()? {
            let ch_out = bare_channel(&ch_out).to_string();
            let ch_in = loopback_input(&ch_out);
            let reading = self.read_input(&ch_in, &opts)?;
            let value = reading
                .mean()
                .ok_or_else(|| DaqError::EmptyReading(ch_in.clone()))?;
            self.output.insert(ch_out, value);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Host framework surface
    // ------------------------------------------------------------------

    /// Reads a parameter through its get callback, or from the last set value for soft
    /// parameters.
    pub fn get(&self, name: &str) -> DaqResult<ParamValue> {
        let param = self.params.get(name)?;
        if !param.is_gettable() {
            return Err(DaqError::NotGettable(name.to_string()));
        }
        let channel = param.channel().unwrap_or(name);
        let value = match param.role() {
            ParamRole::Input => ParamValue::Array(self.read_input(channel, &InputOptions::default())?),
            ParamRole::Output => ParamValue::Float(self.output(channel)?),
            ParamRole::Counter => ParamValue::Int(self.read_counter(channel)? as i64),
            ParamRole::CounterSrc => {
                ParamValue::Str(self.counter_src(channel).unwrap_or_default().to_string())
            }
            ParamRole::ChanConfig => ParamValue::Str(self.chan_config.to_string()),
            ParamRole::CountTime => ParamValue::Float(self.count_time),
            ParamRole::Samples => ParamValue::Int(self.samples as i64),
            ParamRole::Freq => ParamValue::Float(self.freq),
        };
        Ok(value)
    }

    /// Validates `value` against the declaration of `name` and hands it to the set callback.
    ///
    /// Returns the callback's success flag (the binding's for outputs, `true` otherwise).
    pub fn set(&mut self, name: &str, value: ParamValue) -> DaqResult<bool> {
        let param = self.params.get(name)?;
        if !param.is_settable() {
            return Err(DaqError::NotSettable(name.to_string()));
        }
        let value = param.validate(value)?;
        let role = param.role();
        let expected = param.value_type();
        let channel = param.channel().unwrap_or(name).to_string();

        match (role, value) {
            (ParamRole::Output, ParamValue::Float(mv)) => self.set_output(&channel, mv),
            (ParamRole::CounterSrc, ParamValue::Str(src)) => Ok(self.set_counter_src(&channel, &src)),
            (ParamRole::ChanConfig, ParamValue::Str(config)) => {
                self.set_chan_config(config.parse()?);
                Ok(true)
            }
            (ParamRole::CountTime, ParamValue::Float(count_time)) => {
                self.set_count_time(count_time);
                Ok(true)
            }
            (ParamRole::Samples, ParamValue::Int(samples)) => {
                let samples = usize::try_from(samples).map_err(|_| DaqError::ValueOutOfRange {
                    name: name.to_string(),
                    value: samples as f64,
                    min: 0.,
                    max: usize::MAX as f64,
                })?;
                self.set_samples(samples);
                Ok(true)
            }
            (ParamRole::Freq, ParamValue::Float(freq)) => {
                self.set_freq(freq);
                Ok(true)
            }
            (ParamRole::Input | ParamRole::Counter, _) => Err(DaqError::NotSettable(name.to_string())),
            (_, value) => Err(DaqError::TypeMismatch {
                name: name.to_string(),
                expected: expected.to_string(),
                received: value.value_type().to_string(),
            }),
        }
    }

    /// Runs a declared function.
    pub fn call(&mut self, function: &str) -> DaqResult<()> {
        if !self.params.has_function(function) {
            return Err(DaqError::UnknownFunction(function.to_string()));
        }
        match function {
            "reset" => self.reset(),
            _ => Err(DaqError::UnknownFunction(function.to_string())),
        }
    }

    /// Reads every analog input, then every analog output.
    pub fn get_all(&self) -> DaqResult<IndexMap<String, ParamValue>> {
        let names: Vec<String> = [ParamRole::Input, ParamRole::Output]
            .iter()
            .flat_map(|role| self.params.with_role(*role))
            .map(|name| name.to_string())
            .collect();
        names
            .into_iter()
            .map(|name| -> DaqResult<(String, ParamValue)> {
                let value = self.get(&name)?;
                Ok((name, value))
            })
            .collect()
    }
}

/// Creates one adapter per card the binding enumerates, keyed `NI<device>`.
pub fn detect_instruments<B: DaqBinding + Clone>(
    binding: &B,
    config: &DaqConfig,
) -> DaqResult<IndexMap<String, NiDaq<B>>> {
    binding
        .device_names()?
        .into_iter()
        .map(|name| -> DaqResult<(String, NiDaq<B>)> {
            let daq = NiDaq::try_new(binding.clone(), &name, config.clone())?;
            Ok((format!("NI{}", name), daq))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::*;
    use ndarray::array;

    fn daq(samples: usize) -> NiDaq<MockBinding> {
        let card = MockBinding::new().with_device("Dev1", 8, 2, 1);
        let cfg = DaqConfig {
            samples,
            ..DaqConfig::default()
        };
        NiDaq::try_new(card, "Dev1", cfg).unwrap()
    }

    #[test]
    fn pre_trigger_below_two_fails() {
        let daq = daq(100);
        for pre in [0, 1] {
            let opts = InputOptions {
                pre_trigger_samples: pre,
                ..InputOptions::default()
            };
            assert!(matches!(
                daq.read_input("ai0", &opts),
                Err(DaqError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn too_few_samples_fails() {
        let mut daq = daq(100);
        daq.set_samples(5);
        let opts = InputOptions {
            pre_trigger_samples: 4,
            ..InputOptions::default()
        };
        assert!(matches!(
            daq.read_input("ai0", &opts),
            Err(DaqError::InvalidConfiguration(_))
        ));
        daq.set_samples(6);
        assert!(daq.read_input("ai0", &opts).is_ok());
    }

    #[test]
    fn huge_pre_trigger_count_fails_without_reading() {
        let daq = daq(100);
        daq.binding().clear_calls();
        let opts = InputOptions {
            pre_trigger_samples: usize::MAX,
            ..InputOptions::default()
        };
        assert!(matches!(
            daq.read_input("ai0", &opts),
            Err(DaqError::InvalidConfiguration(_))
        ));
        assert!(daq.binding().calls().is_empty());
    }

    #[test]
    fn construction_fails_with_too_few_samples() {
        let card = MockBinding::new().with_device("Dev1", 8, 2, 0);
        let cfg = DaqConfig {
            samples: 3,
            ..DaqConfig::default()
        };
        assert!(matches!(
            NiDaq::try_new(card, "Dev1", cfg),
            Err(DaqError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn input_is_scaled_to_millivolts() {
        let daq = daq(100);
        daq.binding().set_input("Dev1/ai3", array![0.25, -0.5, 2.0]);
        let opts = InputOptions {
            average: false,
            ..InputOptions::default()
        };
        assert_eq!(daq.read_input("ai3", &opts).unwrap(), array![250.0, -500.0, 2000.0]);
        assert_eq!(daq.read_input("Dev1/ai3", &InputOptions::default()).unwrap().len(), 1);
    }

    #[test]
    fn output_round_trip() {
        let mut daq = daq(100);
        let values = [0.0, 123.456, -9999.9, 10000.0];
        for mv in values {
            daq.set("ao1", ParamValue::Float(mv)).unwrap();
            assert_eq!(daq.get("ao1").unwrap(), ParamValue::Float(mv));
        }
        let writes: Vec<f64> = daq
            .binding()
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                BindingCall::Write { devchan, volts } if devchan == "Dev1/ao1" => Some(volts),
                _ => None,
            })
            .collect();
        let expected: Vec<f64> = values.iter().map(|mv| mv / 1000.0).collect();
        assert_eq!(writes, expected);
    }

    #[test]
    fn counter_gating() {
        let mut daq = daq(100);
        daq.binding().clear_calls();
        daq.get("ctr0").unwrap();
        daq.set("ctr0_src", "".into()).unwrap();
        daq.get("ctr0").unwrap();
        daq.set("ctr0_src", "PFI0".into()).unwrap();
        daq.get("ctr0").unwrap();

        let srcs: Vec<Option<String>> = daq
            .binding()
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                BindingCall::ReadCounter { src, .. } => Some(src),
                _ => None,
            })
            .collect();
        assert_eq!(srcs, vec![None, None, Some("Dev1/PFI0".to_string())]);
    }

    #[test]
    fn counter_frequency_is_reciprocal_of_count_time() {
        let mut daq = daq(100);
        daq.set("count_time", ParamValue::Float(0.5)).unwrap();
        daq.binding().set_counts("Dev1/ctr0", 42);
        daq.binding().clear_calls();
        assert_eq!(daq.get("ctr0").unwrap(), ParamValue::Int(42));
        match &daq.binding().calls()[0] {
            BindingCall::ReadCounter { devchan, freq, .. } => {
                assert_eq!(devchan, "Dev1/ctr0");
                assert_eq!(*freq, 2.0);
            }
            call => panic!("Unexpected call {:?}", call),
        }
    }

    #[test]
    fn access_flags_are_enforced() {
        let mut daq = daq(100);
        assert!(matches!(
            daq.set("ai0", ParamValue::Array(array![1.0])),
            Err(DaqError::NotSettable(_))
        ));
        assert!(matches!(
            daq.set("ctr0", ParamValue::Int(1)),
            Err(DaqError::NotSettable(_))
        ));
        assert!(matches!(
            daq.get("nonexistent"),
            Err(DaqError::UnknownParameter(_))
        ));
    }

    #[test]
    fn bounds_and_options_are_enforced() {
        let mut daq = daq(100);
        assert!(matches!(
            daq.set("ao0", ParamValue::Float(10000.1)),
            Err(DaqError::ValueOutOfRange { .. })
        ));
        assert!(matches!(
            daq.set("freq", ParamValue::Float(2e6)),
            Err(DaqError::ValueOutOfRange { .. })
        ));
        assert!(matches!(
            daq.set("chan_config", "DIFF".into()),
            Err(DaqError::InvalidOption { .. })
        ));
        daq.set("chan_config", "RSE".into()).unwrap();
        assert_eq!(daq.chan_config(), ChanConfig::RSE);
        assert!(matches!(
            daq.set("samples", ParamValue::Int(-1)),
            Err(DaqError::ValueOutOfRange { .. })
        ));
    }

    #[test]
    fn non_finite_output_never_reaches_the_card() {
        let mut daq = daq(100);
        daq.set("ao0", ParamValue::Float(250.)).unwrap();
        daq.binding().clear_calls();
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                daq.set("ao0", ParamValue::Float(bad)),
                Err(DaqError::ValueOutOfRange { .. })
            ));
        }
        assert_eq!(daq.output("ao0").unwrap(), 250.);
        assert!(daq.binding().calls().is_empty());
    }

    #[test]
    fn mismatched_declaration_is_a_type_error() {
        let mut daq = daq(100);
        daq.params.add_parameter(Parameter::new(
            "count_time_str",
            ParamRole::CountTime,
            ParamFlags::SET | ParamFlags::SOFTGET,
            ParamType::Str,
        ));
        assert!(matches!(
            daq.set("count_time_str", "0.5".into()),
            Err(DaqError::TypeMismatch { .. })
        ));
        assert_eq!(daq.count_time(), 0.1);
    }

    #[test]
    fn read_request_carries_configuration() {
        let mut daq = daq(200);
        daq.set("freq", ParamValue::Int(5000)).unwrap();
        daq.set("chan_config", "NRSE".into()).unwrap();
        daq.binding().clear_calls();
        let opts = InputOptions {
            average: false,
            min_volts: -1.,
            max_volts: 1.,
            trigger: true,
            trig_slope: TriggerSlope::Neg,
            pre_trigger_samples: 10,
        };
        daq.read_input("ai2", &opts).unwrap();
        assert_eq!(
            daq.binding().calls(),
            vec![BindingCall::Read {
                devchan: "Dev1/ai2".to_string(),
                request: ReadRequest {
                    config: ChanConfig::NRSE,
                    samples: 200,
                    freq: 5000.,
                    averaging: false,
                    min_volts: -1.,
                    max_volts: 1.,
                    triggered: true,
                    trigger_slope: TriggerSlope::Neg,
                    pre_trig_samples: 10,
                },
            }]
        );
    }

    #[test]
    fn reset_function() {
        let mut daq = daq(100);
        daq.binding().clear_calls();
        daq.call("reset").unwrap();
        assert_eq!(
            daq.binding().calls(),
            vec![BindingCall::Reset {
                device: "Dev1".to_string()
            }]
        );
        assert!(matches!(
            daq.call("self_test"),
            Err(DaqError::UnknownFunction(_))
        ));
    }

    #[test]
    fn binding_errors_pass_through() {
        let mut daq = daq(100);
        let err = DaqError::Driver {
            code: -200220,
            message: "Device identifier is invalid.".to_string(),
        };
        daq.binding().fail_next(err.clone());
        assert_eq!(daq.set("ao0", ParamValue::Float(1.0)).unwrap_err(), err);
    }
}
