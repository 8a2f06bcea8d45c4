//! [`DaqBinding`] implementation on top of the NI-DAQmx C library.
//!
//! Every operation runs in its own short-lived [`NiTask`], which is cleared when it goes out
//! of scope, so a failed acquisition never leaves a task reserved on the card.

use ndarray::Array1;
use std::thread;
use std::time::Duration;

use nidaq_backend::*;

use crate::nidaqmx::*;
use crate::utils::*;

/// Output range (V) the analog outputs are driven with.
const AO_MIN_VOLTS: f64 = -10.;
const AO_MAX_VOLTS: f64 = 10.;

/// Talks to the cards installed on this machine through NI-DAQmx.
#[derive(Debug, Clone, Copy, Default)]
pub struct DaqmxBinding;

impl DaqmxBinding {
    pub fn new() -> Self {
        Self
    }
}

impl DaqBinding for DaqmxBinding {
    fn device_names(&self) -> DaqResult<Vec<String>> {
        Ok(split_channel_list(&sys_dev_names()?))
    }
    fn physical_input_channels(&self, device: &str) -> DaqResult<Vec<String>> {
        Ok(split_channel_list(&dev_string(device, DevString::AIPhysicalChans)?))
    }
    fn physical_output_channels(&self, device: &str) -> DaqResult<Vec<String>> {
        Ok(split_channel_list(&dev_string(device, DevString::AOPhysicalChans)?))
    }
    fn physical_counter_channels(&self, device: &str) -> DaqResult<Vec<String>> {
        Ok(split_channel_list(&dev_string(device, DevString::CIPhysicalChans)?))
    }

    fn input_voltage_ranges(&self, device: &str) -> DaqResult<Vec<(f64, f64)>> {
        Ok(pair_ranges(&dev_voltage_ranges(device, true)?))
    }
    fn output_voltage_ranges(&self, device: &str) -> DaqResult<Vec<(f64, f64)>> {
        Ok(pair_ranges(&dev_voltage_ranges(device, false)?))
    }
    fn maximum_input_channel_rate(&self, device: &str) -> DaqResult<f64> {
        dev_rate(device, DevRate::AIMaxSingleChan)
    }
    fn minimum_input_channel_rate(&self, device: &str) -> DaqResult<f64> {
        dev_rate(device, DevRate::AIMin)
    }
    fn maximum_output_channel_rate(&self, device: &str) -> DaqResult<f64> {
        dev_rate(device, DevRate::AOMax)
    }
    fn device_type(&self, device: &str) -> DaqResult<String> {
        dev_string(device, DevString::ProductType)
    }
    fn simultaneous_sampling_support(&self, device: &str) -> DaqResult<bool> {
        dev_simultaneous_sampling(device)
    }

    fn read(&self, devchan: &str, request: &ReadRequest) -> DaqResult<Array1<f64>> {
        let task = NiTask::new()?;
        task.create_ai_chan(
            devchan,
            terminal_config(request.config),
            request.min_volts,
            request.max_volts,
        )?;
        task.cfg_sample_clk("", request.freq, request.samples as u64)?;
        if request.triggered {
            task.cfg_anlg_edge_ref_trig(
                devchan,
                trigger_slope(request.trigger_slope),
                TRIGGER_LEVEL,
                request.pre_trig_samples,
            )?;
        }
        let data = Array1::from(task.read_analog(request.samples, read_timeout(request.samples, request.freq))?);
        log::debug!("Read {} samples from {}", data.len(), devchan);

        if request.averaging {
            let mean = data
                .mean()
                .ok_or_else(|| DaqError::EmptyReading(devchan.to_string()))?;
            Ok(Array1::from_elem(1, mean))
        } else {
            Ok(data)
        }
    }

    fn write(&self, devchan: &str, volts: f64) -> DaqResult<bool> {
        let task = NiTask::new()?;
        task.create_ao_chan(devchan, AO_MIN_VOLTS, AO_MAX_VOLTS)?;
        let written = task.write_analog_scalar(volts)?;
        log::debug!("Wrote {} V to {}", volts, devchan);
        Ok(written == 1)
    }

    fn read_counter(&self, devchan: &str, src: Option<&str>, freq: f64) -> DaqResult<u32> {
        let task = NiTask::new()?;
        task.create_ci_count_edges_chan(devchan)?;
        if let Some(src) = src {
            task.set_ci_count_edges_term(devchan, &terminal_name(src))?;
        }
        task.start()?;
        let count_time = 1. / freq;
        let wait = Duration::try_from_secs_f64(count_time)
            .map_err(|_| DaqError::InvalidConfiguration(format!("Invalid count time {} s", count_time)))?;
        thread::sleep(wait);
        let counts = task.read_counter_scalar(count_time + READ_TIMEOUT_SLACK)?;
        task.stop()?;
        log::debug!("Counted {} edges on {}", counts, devchan);
        Ok(counts)
    }

    fn reset_device(&self, device: &str) -> DaqResult<()> {
        log::info!("Resetting NI device {}", device);
        reset_ni_device(device)
    }
}
