//! Python surface of the driver.
//!
//! [`PyNiDaq`] is exposed as `NI_DAQ` and wraps a [`NiDaq`] driving a real card through
//! [`DaqmxBinding`]. Parameter values cross the boundary as python floats, ints and strings;
//! analog input readings are returned as numpy arrays (millivolts).
//!
//! # Example (python)
//! ```python
//! from nidaqctrl_backend import NI_DAQ, detect_instruments
//!
//! print(list(detect_instruments()))    # ['NIDev1']
//! daq = NI_DAQ("Dev1", samples=200)
//! daq.set("ao0", 1500.0)
//! print(daq.get("ai6"))                # array([1500.03])
//! ```

use numpy::PyArray1;
use pyo3::exceptions::{PyKeyError, PyRuntimeError, PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use nidaq_backend::*;

use crate::device::DaqmxBinding;

/// Maps adapter errors onto the closest python exception.
fn to_pyerr(err: DaqError) -> PyErr {
    let msg = err.to_string();
    match err {
        DaqError::UnknownParameter(_) | DaqError::UnknownFunction(_) => PyKeyError::new_err(msg),
        DaqError::TypeMismatch { .. } => PyTypeError::new_err(msg),
        DaqError::ValueOutOfRange { .. }
        | DaqError::InvalidOption { .. }
        | DaqError::InvalidConfiguration(_) => PyValueError::new_err(msg),
        _ => PyRuntimeError::new_err(msg),
    }
}

fn value_to_py(py: Python, value: ParamValue) -> PyObject {
    match value {
        ParamValue::Array(arr) => PyArray1::from_owned_array(py, arr).to_object(py),
        ParamValue::Float(v) => v.to_object(py),
        ParamValue::Int(v) => v.to_object(py),
        ParamValue::Str(v) => v.to_object(py),
    }
}

/// Extracts a python value as the type `expected` declares.
fn value_from_py(value: &PyAny, expected: ParamType) -> PyResult<ParamValue> {
    Ok(match expected {
        ParamType::Float => ParamValue::Float(value.extract::<f64>()?),
        ParamType::Int => ParamValue::Int(value.extract::<i64>()?),
        ParamType::Str => ParamValue::Str(value.extract::<String>()?),
        ParamType::Array => ParamValue::Array(value.extract::<Vec<f64>>()?.into()),
    })
}

#[pyclass(name = "NI_DAQ")]
pub struct PyNiDaq {
    daq: NiDaq<DaqmxBinding>,
}

#[pymethods]
impl PyNiDaq {
    /// Opens the card `id` (e.g. `"Dev1"`), declares its parameters and reads back every
    /// channel, or resets the card when `reset` is true.
    #[new]
    #[pyo3(signature = (id, samples = 100, freq = 10000.0, reset = false))]
    pub fn new(id: &str, samples: usize, freq: f64, reset: bool) -> PyResult<Self> {
        let config = DaqConfig {
            samples,
            freq,
            reset,
            ..DaqConfig::default()
        };
        let daq = NiDaq::try_new(DaqmxBinding::new(), id, config).map_err(to_pyerr)?;
        Ok(Self { daq })
    }

    #[getter]
    pub fn id(&self) -> String {
        self.daq.id().to_string()
    }

    pub fn get(&self, name: &str, py: Python) -> PyResult<PyObject> {
        let value = self.daq.get(name).map_err(to_pyerr)?;
        Ok(value_to_py(py, value))
    }

    pub fn set(&mut self, name: &str, value: &PyAny) -> PyResult<bool> {
        let expected = self.daq.parameters().get(name).map_err(to_pyerr)?.value_type();
        let value = value_from_py(value, expected)?;
        self.daq.set(name, value).map_err(to_pyerr)
    }

    pub fn call(&mut self, function: &str) -> PyResult<()> {
        self.daq.call(function).map_err(to_pyerr)
    }

    pub fn reset(&mut self) -> PyResult<()> {
        self.daq.reset().map_err(to_pyerr)
    }

    /// Reads every analog input, then every analog output, into a dict.
    pub fn get_all(&self, py: Python) -> PyResult<PyObject> {
        let values = self.daq.get_all().map_err(to_pyerr)?;
        let dict = PyDict::new(py);
        for (name, value) in values {
            dict.set_item(name, value_to_py(py, value))?;
        }
        Ok(dict.to_object(py))
    }

    /// Acquires from an analog input with explicit options, in millivolts.
    #[pyo3(signature = (
        channel,
        average = true,
        min_volts = -10.0,
        max_volts = 10.0,
        trigger = false,
        trig_slope = "POS",
        pre_trigger_samples = 2
    ))]
    #[allow(clippy::too_many_arguments)]
    pub fn read_input(
        &self,
        channel: &str,
        average: bool,
        min_volts: f64,
        max_volts: f64,
        trigger: bool,
        trig_slope: &str,
        pre_trigger_samples: usize,
        py: Python,
    ) -> PyResult<PyObject> {
        let opts = InputOptions {
            average,
            min_volts,
            max_volts,
            trigger,
            trig_slope: trig_slope.parse().map_err(to_pyerr)?,
            pre_trigger_samples,
        };
        let arr = self.daq.read_input(channel, &opts).map_err(to_pyerr)?;
        Ok(PyArray1::from_owned_array(py, arr).to_object(py))
    }

    pub fn parameter_names(&self) -> Vec<String> {
        self.daq
            .parameters()
            .names()
            .into_iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn function_names(&self) -> Vec<String> {
        self.daq.parameters().functions().to_vec()
    }

    /// Declaration metadata of every parameter, keyed by name.
    pub fn get_parameter_options(&self, py: Python) -> PyResult<PyObject> {
        let out = PyDict::new(py);
        for param in self.daq.parameters().iter() {
            let opts = PyDict::new(py);
            let (minval, maxval) = param.bounds();
            opts.set_item("type", param.value_type().to_string())?;
            opts.set_item("get", param.is_gettable())?;
            opts.set_item("set", param.is_settable())?;
            opts.set_item("channel", param.channel())?;
            opts.set_item("units", param.units())?;
            opts.set_item("format", param.format())?;
            opts.set_item("minval", minval)?;
            opts.set_item("maxval", maxval)?;
            opts.set_item("tags", param.tags().to_vec())?;
            opts.set_item("options", param.option_list().to_vec())?;
            opts.set_item("maxstep", param.maxstep())?;
            opts.set_item("stepdelay", param.stepdelay())?;
            out.set_item(param.name(), opts)?;
        }
        Ok(out.to_object(py))
    }
}

/// Opens an `NI_DAQ` per card NI-DAQmx knows about, keyed `NI<device>`.
#[pyfunction]
pub fn detect_instruments(py: Python) -> PyResult<PyObject> {
    let instruments =
        nidaq_backend::detect_instruments(&DaqmxBinding::new(), &DaqConfig::default()).map_err(to_pyerr)?;
    let dict = PyDict::new(py);
    for (name, daq) in instruments {
        dict.set_item(name, Py::new(py, PyNiDaq { daq })?)?;
    }
    Ok(dict.to_object(py))
}
