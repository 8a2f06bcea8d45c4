//! Drives National Instruments (NI) DAQ cards through NI-DAQmx.
//!
//! [`DaqmxBinding`](device::DaqmxBinding) implements
//! [`nidaq_backend::DaqBinding`] on the NI-DAQmx C library; the `python` feature exposes the
//! resulting [`nidaq_backend::NiDaq`] adapter as the `NI_DAQ` python class.
//!
//! Cargo features:
//! - `nidaqmx`: link against `NIDAQmx` and build the hardware binding.
//! - `python`: build the python extension module (implies `nidaqmx`).

#[cfg(feature = "nidaqmx")]
pub mod device;
#[cfg(feature = "nidaqmx")]
pub mod nidaqmx;
#[cfg(feature = "python")]
pub mod python;
pub mod utils;

#[cfg(feature = "nidaqmx")]
pub use crate::device::DaqmxBinding;

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule]
fn nidaqctrl_backend(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<python::PyNiDaq>()?;
    m.add_function(wrap_pyfunction!(python::detect_instruments, m)?)?;
    Ok(())
}
