//! Provides a minimal rust wrapper for the parts of the NI-DAQmx C library an instrument
//! driver needs.
//!
//! ## Overview
//!
//! The core of this module is the [`NiTask`] struct which represents an NI-DAQmx task. It
//! encapsulates a task handle and provides methods that map to the DAQmx C-functions used for
//! single-shot acquisitions: creating analog input/output and edge-counting channels,
//! configuring the sample clock and reference trigger, and reading or writing.
//!
//! Device-level queries (device enumeration, physical channels, voltage ranges, rates, product
//! type) do not need a task and are exposed as free functions, together with
//! [`reset_ni_device`].
//!
//! **Refer to the [DAQmx C reference](https://www.ni.com/docs/en-US/bundle/ni-daqmx-c-api-ref/page/cdaqmx/help_file_title.html)
//! for the behavior of the wrapped functions.**
//!
//! ## Error Handling
//!
//! Every DAQmx C-function returns an `int32` status. [`daqmx_call`] turns a negative status
//! into [`DaqError::Driver`] carrying the extended error information. The error is also logged
//! and appended to `nidaqmx_error.logs` in the working directory of the calling shell. Positive
//! status codes are warnings and are logged only.
//!
//! ## Cleanup and Resource Management
//!
//! `NiTask` implements `Drop`: the task is cleared when the instance goes out of scope, so a
//! failed acquisition never leaks a task handle.
//!
//! ## Example
//!
//! ```ignore
//! # use nidaqctrl_backend::nidaqmx::*;
//! let task = NiTask::new()?;
//! task.create_ao_chan("Dev1/ao0", -10., 10.)?;
//! task.write_analog_scalar(1.5)?;
//! ```

use libc;
use std::ffi::{CStr, CString};
use std::fs::OpenOptions;
use std::io::Write;

use nidaq_backend::{DaqError, DaqResult};

type CConstStr = *const libc::c_char;
type CCharBuf = *mut libc::c_char;
type CFloat64 = libc::c_double;
type CUint32 = libc::c_uint;
type CUint64 = libc::c_ulonglong;
type CBool32 = libc::c_uint;
type CInt32 = libc::c_int;
pub type TaskHandle = *mut libc::c_void;

pub const DAQMX_VAL_RISING: CInt32 = 10280;
pub const DAQMX_VAL_VOLTS: CInt32 = 10348;
pub const DAQMX_VAL_FINITESAMPS: CInt32 = 10178;
pub const DAQMX_VAL_GROUPBYCHANNEL: CBool32 = 0;
pub const DAQMX_VAL_COUNTUP: CInt32 = 10128;

/// Size of the buffers handed to string queries.
const STR_BUF_SIZE: usize = 4096;
/// Number of f64 slots handed to range queries (pairs of min/max).
const RANGE_BUF_SIZE: usize = 64;
/// Timeout (s) for single-sample writes.
const WRITE_TIMEOUT: CFloat64 = 1.0;

#[link(name = "NIDAQmx")]
extern "C" {
    fn DAQmxResetDevice(name: CConstStr) -> CInt32;
    fn DAQmxGetExtendedErrorInfo(errorString: CCharBuf, bufferSize: CUint32) -> CInt32;

    fn DAQmxGetSysDevNames(data: CCharBuf, bufferSize: CUint32) -> CInt32;
    fn DAQmxGetDevAIPhysicalChans(device: CConstStr, data: CCharBuf, bufferSize: CUint32) -> CInt32;
    fn DAQmxGetDevAOPhysicalChans(device: CConstStr, data: CCharBuf, bufferSize: CUint32) -> CInt32;
    fn DAQmxGetDevCIPhysicalChans(device: CConstStr, data: CCharBuf, bufferSize: CUint32) -> CInt32;
    fn DAQmxGetDevProductType(device: CConstStr, data: CCharBuf, bufferSize: CUint32) -> CInt32;
    fn DAQmxGetDevAIVoltageRngs(device: CConstStr, data: *mut CFloat64, arraySize: CUint32) -> CInt32;
    fn DAQmxGetDevAOVoltageRngs(device: CConstStr, data: *mut CFloat64, arraySize: CUint32) -> CInt32;
    fn DAQmxGetDevAIMaxSingleChanRate(device: CConstStr, data: *mut CFloat64) -> CInt32;
    fn DAQmxGetDevAIMinRate(device: CConstStr, data: *mut CFloat64) -> CInt32;
    fn DAQmxGetDevAOMaxRate(device: CConstStr, data: *mut CFloat64) -> CInt32;
    fn DAQmxGetDevAISimultaneousSamplingSupported(device: CConstStr, data: *mut CBool32) -> CInt32;

    fn DAQmxCreateTask(taskName: CConstStr, taskHandle_ptr: &mut TaskHandle) -> CInt32;
    fn DAQmxStartTask(handle: TaskHandle) -> CInt32;
    fn DAQmxStopTask(handle: TaskHandle) -> CInt32;
    fn DAQmxClearTask(handle: TaskHandle) -> CInt32;

    fn DAQmxCfgSampClkTiming(
        handle: TaskHandle,
        src: CConstStr,
        rate: CFloat64,
        activeEdge: CInt32,
        sampleMode: CInt32,
        sampsPerChan: CUint64,
    ) -> CInt32;
    fn DAQmxCfgAnlgEdgeRefTrig(
        handle: TaskHandle,
        triggerSource: CConstStr,
        triggerSlope: CInt32,
        triggerLevel: CFloat64,
        pretriggerSamples: CUint32,
    ) -> CInt32;

    fn DAQmxCreateAIVoltageChan(
        handle: TaskHandle,
        name: CConstStr,
        assigned_name: CConstStr,
        terminalConfig: CInt32,
        minVal: CFloat64,
        maxVal: CFloat64,
        units: CInt32,
        customScaleName: CConstStr,
    ) -> CInt32;
    fn DAQmxCreateAOVoltageChan(
        handle: TaskHandle,
        name: CConstStr,
        assigned_name: CConstStr,
        minVal: CFloat64,
        maxVal: CFloat64,
        units: CInt32,
        customScaleName: CConstStr,
    ) -> CInt32;
    fn DAQmxCreateCICountEdgesChan(
        handle: TaskHandle,
        counter: CConstStr,
        assigned_name: CConstStr,
        edge: CInt32,
        initialCount: CUint32,
        countDirection: CInt32,
    ) -> CInt32;
    fn DAQmxSetCICountEdgesTerm(handle: TaskHandle, channel: CConstStr, data: CConstStr) -> CInt32;

    fn DAQmxReadAnalogF64(
        handle: TaskHandle,
        numSampsPerChan: CInt32,
        timeout: CFloat64,
        fillMode: CBool32,
        readArray: *mut CFloat64,
        arraySizeInSamps: CUint32,
        sampsPerChanRead: *mut CInt32,
        reserved: *mut CBool32,
    ) -> CInt32;
    fn DAQmxWriteAnalogF64(
        handle: TaskHandle,
        seqLen: CInt32,
        autoStart: CBool32,
        timeout: CFloat64,
        dataLayout: CBool32,
        writeArray: *const CFloat64,
        sampsPerChanWritten: *mut CInt32,
        reserved: *mut CBool32,
    ) -> CInt32;
    fn DAQmxReadCounterScalarU32(
        handle: TaskHandle,
        timeout: CFloat64,
        value: *mut CUint32,
        reserved: *mut CBool32,
    ) -> CInt32;
}

/// Calls a DAQmx C-function and converts its status code.
///
/// Every DAQmx C-function returns an `int32` which, if negative, indicates an error. In that
/// case the extended error information is retrieved with `DAQmxGetExtendedErrorInfo`, logged,
/// appended to `nidaqmx_error.logs` and returned as [`DaqError::Driver`].
///
/// # Examples
///
/// ```ignore
/// daqmx_call(|| unsafe { DAQmxSomeFunction(param1, param2) })?;
/// ```
pub fn daqmx_call<F: FnOnce() -> CInt32>(func: F) -> DaqResult<()> {
    let err_code = func();
    if err_code < 0 {
        let mut err_buff = [0 as libc::c_char; 2048];
        unsafe {
            DAQmxGetExtendedErrorInfo(err_buff.as_mut_ptr(), err_buff.len() as CUint32);
        }
        let error_string = unsafe { CStr::from_ptr(err_buff.as_ptr()) }
            .to_string_lossy()
            .into_owned();
        log::error!("DAQmx Error {}: {}", err_code, error_string);
        append_error_log(&error_string);
        return Err(DaqError::Driver {
            code: err_code,
            message: error_string,
        });
    }
    if err_code > 0 {
        log::warn!("DAQmx call returned warning code {}", err_code);
    }
    Ok(())
}

fn append_error_log(error_string: &str) {
    let written = OpenOptions::new()
        .append(true)
        .create(true)
        .open("./nidaqmx_error.logs")
        .and_then(|mut file| writeln!(file, "DAQmx Error: {}", error_string));
    if let Err(err) = written {
        log::warn!("Failed to write error to nidaqmx_error.logs: {}", err);
    }
}

fn cstring(s: &str) -> DaqResult<CString> {
    CString::new(s).map_err(|_| DaqError::Binding(format!("{:?} contains a NUL byte", s)))
}

fn c_buf_to_string(buf: &[libc::c_char]) -> String {
    unsafe { CStr::from_ptr(buf.as_ptr()) }
        .to_string_lossy()
        .into_owned()
}

/// Resets a National Instruments (NI) device, aborting its tasks and returning it to its
/// initialized state.
///
/// # Example
/// ```ignore
/// # use nidaqctrl_backend::nidaqmx::*;
/// reset_ni_device("PXI1Slot3")?;
/// ```
pub fn reset_ni_device(name: &str) -> DaqResult<()> {
    let name_cstr = cstring(name)?;
    daqmx_call(|| unsafe { DAQmxResetDevice(name_cstr.as_ptr()) })
}

/// Comma-separated list of the devices known to NI-DAQmx.
pub fn sys_dev_names() -> DaqResult<String> {
    let mut buf = [0 as libc::c_char; STR_BUF_SIZE];
    daqmx_call(|| unsafe { DAQmxGetSysDevNames(buf.as_mut_ptr(), STR_BUF_SIZE as CUint32) })?;
    Ok(c_buf_to_string(&buf))
}

type DevStrQuery = unsafe extern "C" fn(CConstStr, CCharBuf, CUint32) -> CInt32;
type DevRangeQuery = unsafe extern "C" fn(CConstStr, *mut CFloat64, CUint32) -> CInt32;
type DevF64Query = unsafe extern "C" fn(CConstStr, *mut CFloat64) -> CInt32;

/// Which string property to query with [`dev_string`].
#[derive(Debug, Clone, Copy)]
pub enum DevString {
    AIPhysicalChans,
    AOPhysicalChans,
    CIPhysicalChans,
    ProductType,
}

/// Which rate to query with [`dev_rate`].
#[derive(Debug, Clone, Copy)]
pub enum DevRate {
    AIMaxSingleChan,
    AIMin,
    AOMax,
}

pub fn dev_string(device: &str, property: DevString) -> DaqResult<String> {
    let query: DevStrQuery = match property {
        DevString::AIPhysicalChans => DAQmxGetDevAIPhysicalChans,
        DevString::AOPhysicalChans => DAQmxGetDevAOPhysicalChans,
        DevString::CIPhysicalChans => DAQmxGetDevCIPhysicalChans,
        DevString::ProductType => DAQmxGetDevProductType,
    };
    let device_cstr = cstring(device)?;
    let mut buf = [0 as libc::c_char; STR_BUF_SIZE];
    daqmx_call(|| unsafe { query(device_cstr.as_ptr(), buf.as_mut_ptr(), STR_BUF_SIZE as CUint32) })?;
    Ok(c_buf_to_string(&buf))
}

/// Flat `[min0, max0, min1, max1, ...]` voltage ranges of the inputs (`input = true`) or
/// outputs. Unused slots are zero.
pub fn dev_voltage_ranges(device: &str, input: bool) -> DaqResult<Vec<f64>> {
    let query: DevRangeQuery = if input {
        DAQmxGetDevAIVoltageRngs
    } else {
        DAQmxGetDevAOVoltageRngs
    };
    let device_cstr = cstring(device)?;
    let mut buf = vec![0.0 as CFloat64; RANGE_BUF_SIZE];
    daqmx_call(|| unsafe { query(device_cstr.as_ptr(), buf.as_mut_ptr(), RANGE_BUF_SIZE as CUint32) })?;
    Ok(buf)
}

pub fn dev_rate(device: &str, rate: DevRate) -> DaqResult<f64> {
    let query: DevF64Query = match rate {
        DevRate::AIMaxSingleChan => DAQmxGetDevAIMaxSingleChanRate,
        DevRate::AIMin => DAQmxGetDevAIMinRate,
        DevRate::AOMax => DAQmxGetDevAOMaxRate,
    };
    let device_cstr = cstring(device)?;
    let mut data: CFloat64 = 0.0;
    daqmx_call(|| unsafe { query(device_cstr.as_ptr(), &mut data as *mut CFloat64) })?;
    Ok(data as f64)
}

pub fn dev_simultaneous_sampling(device: &str) -> DaqResult<bool> {
    let device_cstr = cstring(device)?;
    let mut data: CBool32 = 0;
    daqmx_call(|| unsafe {
        DAQmxGetDevAISimultaneousSamplingSupported(device_cstr.as_ptr(), &mut data as *mut CBool32)
    })?;
    Ok(data != 0)
}

/// Represents a National Instruments (NI) DAQmx task.
///
/// Creating an instance corresponds to creating a new NI-DAQmx task; dropping it clears the
/// task. Methods invoke the associated DAQmx functions on the task handle.
///
/// # Note
///
/// Ensure you have the necessary NI-DAQmx drivers and libraries installed and accessible when
/// using this struct and its associated methods.
pub struct NiTask {
    handle: TaskHandle,
}

impl NiTask {
    pub fn new() -> DaqResult<Self> {
        let mut taskhandle: TaskHandle = std::ptr::null_mut();
        let task_name_cstr = cstring("")?;
        daqmx_call(|| unsafe { DAQmxCreateTask(task_name_cstr.as_ptr(), &mut taskhandle) })?;
        Ok(Self { handle: taskhandle })
    }

    pub fn clear(&self) -> DaqResult<()> {
        daqmx_call(|| unsafe { DAQmxClearTask(self.handle) })
    }
    pub fn start(&self) -> DaqResult<()> {
        daqmx_call(|| unsafe { DAQmxStartTask(self.handle) })
    }
    pub fn stop(&self) -> DaqResult<()> {
        daqmx_call(|| unsafe { DAQmxStopTask(self.handle) })
    }

    pub fn cfg_sample_clk(&self, clk_src: &str, samp_rate: f64, seq_len: u64) -> DaqResult<()> {
        let src_cstring = cstring(clk_src)?;
        daqmx_call(|| unsafe {
            DAQmxCfgSampClkTiming(
                self.handle,
                src_cstring.as_ptr(),
                samp_rate as CFloat64,
                DAQMX_VAL_RISING,
                DAQMX_VAL_FINITESAMPS,
                seq_len as CUint64,
            )
        })
    }

    /// Starts the acquisition's reference on an analog edge of `trigger_source`, keeping
    /// `pretrigger_samples` samples from before the edge.
    pub fn cfg_anlg_edge_ref_trig(
        &self,
        trigger_source: &str,
        slope: i32,
        level: f64,
        pretrigger_samples: usize,
    ) -> DaqResult<()> {
        let trigger_source_cstr = cstring(trigger_source)?;
        daqmx_call(|| unsafe {
            DAQmxCfgAnlgEdgeRefTrig(
                self.handle,
                trigger_source_cstr.as_ptr(),
                slope as CInt32,
                level as CFloat64,
                pretrigger_samples as CUint32,
            )
        })
    }

    pub fn create_ai_chan(&self, name: &str, terminal_config: i32, min: f64, max: f64) -> DaqResult<()> {
        let name_cstr = cstring(name)?;
        let assigned_name_cstr = cstring("")?;
        daqmx_call(|| unsafe {
            DAQmxCreateAIVoltageChan(
                self.handle,
                name_cstr.as_ptr(),
                assigned_name_cstr.as_ptr(),
                terminal_config as CInt32,
                min,
                max,
                DAQMX_VAL_VOLTS,
                std::ptr::null(),
            )
        })
    }

    pub fn create_ao_chan(&self, name: &str, min: f64, max: f64) -> DaqResult<()> {
        let name_cstr = cstring(name)?;
        let assigned_name_cstr = cstring("")?;
        daqmx_call(|| unsafe {
            DAQmxCreateAOVoltageChan(
                self.handle,
                name_cstr.as_ptr(),
                assigned_name_cstr.as_ptr(),
                min,
                max,
                DAQMX_VAL_VOLTS,
                std::ptr::null(),
            )
        })
    }

    /// Creates a channel counting rising edges upwards from zero.
    pub fn create_ci_count_edges_chan(&self, counter: &str) -> DaqResult<()> {
        let counter_cstr = cstring(counter)?;
        let assigned_name_cstr = cstring("")?;
        daqmx_call(|| unsafe {
            DAQmxCreateCICountEdgesChan(
                self.handle,
                counter_cstr.as_ptr(),
                assigned_name_cstr.as_ptr(),
                DAQMX_VAL_RISING,
                0,
                DAQMX_VAL_COUNTUP,
            )
        })
    }

    /// Routes the input terminal whose edges `channel` counts.
    pub fn set_ci_count_edges_term(&self, channel: &str, terminal: &str) -> DaqResult<()> {
        let channel_cstr = cstring(channel)?;
        let terminal_cstr = cstring(terminal)?;
        daqmx_call(|| unsafe {
            DAQmxSetCICountEdgesTerm(self.handle, channel_cstr.as_ptr(), terminal_cstr.as_ptr())
        })
    }

    /// Reads `nsamps` samples of a single-channel task, in volts.
    pub fn read_analog(&self, nsamps: usize, timeout: f64) -> DaqResult<Vec<f64>> {
        let mut data = vec![0.0 as CFloat64; nsamps];
        let mut nread: CInt32 = 0;
        daqmx_call(|| unsafe {
            DAQmxReadAnalogF64(
                self.handle,
                nsamps as CInt32,
                timeout as CFloat64,
                DAQMX_VAL_GROUPBYCHANNEL,
                data.as_mut_ptr(),
                nsamps as CUint32,
                &mut nread as *mut CInt32,
                std::ptr::null_mut(),
            )
        })?;
        data.truncate(nread.max(0) as usize);
        Ok(data)
    }

    /// Writes a single value, auto-starting the task. Returns the number of samples written.
    pub fn write_analog_scalar(&self, value: f64) -> DaqResult<usize> {
        let mut nwritten: CInt32 = 0;
        let data = [value as CFloat64];
        daqmx_call(|| unsafe {
            DAQmxWriteAnalogF64(
                self.handle,
                1,
                true as CBool32,
                WRITE_TIMEOUT,
                DAQMX_VAL_GROUPBYCHANNEL,
                data.as_ptr(),
                &mut nwritten as *mut CInt32,
                std::ptr::null_mut(),
            )
        })?;
        Ok(nwritten as usize)
    }

    pub fn read_counter_scalar(&self, timeout: f64) -> DaqResult<u32> {
        let mut value: CUint32 = 0;
        daqmx_call(|| unsafe {
            DAQmxReadCounterScalarU32(
                self.handle,
                timeout as CFloat64,
                &mut value as *mut CUint32,
                std::ptr::null_mut(),
            )
        })?;
        Ok(value as u32)
    }
}

// Define deletion behavior
impl Drop for NiTask {
    fn drop(&mut self) {
        if let Err(err) = self.clear() {
            log::warn!("Failed to clear DAQmx task: {}", err);
        }
    }
}
