//! Error type shared by the adapter, the parameter table and every [`DaqBinding`] implementation.
//!
//! Binding failures are carried through unmodified: the adapter never retries and makes no
//! distinction between transient and permanent hardware errors.
//!
//! [`DaqBinding`]: crate::binding::DaqBinding

use thiserror::Error;

/// The error enum for the NI DAQ adapter.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum DaqError {
    /// The acquisition timing configuration cannot be satisfied (pre-trigger or total sample
    /// count). Not recoverable by retrying with the same settings.
    #[error("Invalid acquisition configuration: {0}")]
    InvalidConfiguration(String),
    /// A NI-DAQmx call returned a negative status code.
    #[error("DAQmx Error {code}: {message}")]
    Driver {
        /// Status code returned by the driver.
        code: i32,
        /// Extended error information reported by the driver.
        message: String,
    },
    /// Any other failure reported by the hardware binding.
    #[error("Binding error: {0}")]
    Binding(String),
    /// No parameter with this name was declared.
    #[error("Parameter {0} is not declared. Declared parameters can be listed with `parameter_names`")]
    UnknownParameter(String),
    /// No function with this name was declared.
    #[error("Function {0} is not declared")]
    UnknownFunction(String),
    /// The parameter has neither the GET nor the SOFTGET flag.
    #[error("Parameter {0} cannot be read")]
    NotGettable(String),
    /// The parameter does not have the SET flag.
    #[error("Parameter {0} cannot be set")]
    NotSettable(String),
    /// The value handed to a setter has the wrong type.
    #[error("Parameter {name} expects a value of type {expected}, received {received}")]
    TypeMismatch {
        /// Parameter name.
        name: String,
        /// Declared value type.
        expected: String,
        /// Type of the value received.
        received: String,
    },
    /// A numeric value lies outside the declared bounds.
    #[error("Value {value} for parameter {name} is out of range. Allowed range is [{min}, {max}]")]
    ValueOutOfRange {
        /// Parameter name.
        name: String,
        /// Rejected value.
        value: f64,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
    /// A string value is not part of the declared option list.
    #[error("Value {value} for parameter {name} is not one of {options:?}")]
    InvalidOption {
        /// Parameter name.
        name: String,
        /// Rejected value.
        value: String,
        /// Declared options.
        options: Vec<String>,
    },
    /// The output channel has never been commanded nor seeded from its loopback input.
    #[error("No output value cached for channel {0}")]
    NoCachedOutput(String),
    /// The binding returned no samples where at least one was expected.
    #[error("Reading channel {0} returned no samples")]
    EmptyReading(String),
}

/// Result alias used throughout the crate.
pub type DaqResult<T> = Result<T, DaqError>;
