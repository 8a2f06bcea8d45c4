//! Parameter declarations handed to the host measurement framework.
//!
//! A [`Parameter`] carries what the host needs to register a named quantity (access flags,
//! value type, bounds, units, display format, tags, options) plus the [`ParamRole`] the adapter
//! dispatches on when the host calls `get` or `set`. The host's own registry, tagging and sweep
//! machinery stay with the host; maximum step and step delay are declared but not acted on.
//!
//! [`ParameterTable`] keeps the declarations in registration order together with the names of
//! the declared functions.

use indexmap::IndexMap;
use ndarray::Array1;
use std::fmt;
use std::ops::BitOr;

use crate::error::{DaqError, DaqResult};

/// Access flags of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamFlags(u8);

impl ParamFlags {
    /// Value is read through the get callback.
    pub const GET: ParamFlags = ParamFlags(0b001);
    /// Value can be set.
    pub const SET: ParamFlags = ParamFlags(0b010);
    /// Value is read back from the last set value, without a callback.
    pub const SOFTGET: ParamFlags = ParamFlags(0b100);
    pub const GETSET: ParamFlags = ParamFlags(0b011);

    pub fn contains(&self, other: ParamFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ParamFlags {
    type Output = ParamFlags;

    fn bitor(self, rhs: Self) -> Self::Output {
        ParamFlags(self.0 | rhs.0)
    }
}

/// Declared value type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Array,
    Float,
    Int,
    Str,
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ParamType::Array => "array",
                ParamType::Float => "float",
                ParamType::Int => "int",
                ParamType::Str => "str",
            }
        )
    }
}

/// A value flowing through `get`/`set`.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Array(Array1<f64>),
    Float(f64),
    Int(i64),
    Str(String),
}

impl ParamValue {
    /// Type tag of the value, compared against a parameter's declared [`ParamType`].
    pub fn value_type(&self) -> ParamType {
        match self {
            ParamValue::Array(_) => ParamType::Array,
            ParamValue::Float(_) => ParamType::Float,
            ParamValue::Int(_) => ParamType::Int,
            ParamValue::Str(_) => ParamType::Str,
        }
    }

    /// Numeric view of scalar values; integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Float(v) => Some(*v),
            ParamValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Str(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Str(v)
    }
}

impl From<Array1<f64>> for ParamValue {
    fn from(v: Array1<f64>) -> Self {
        ParamValue::Array(v)
    }
}

/// Which adapter callback backs a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamRole {
    Input,
    Output,
    Counter,
    CounterSrc,
    ChanConfig,
    CountTime,
    Samples,
    Freq,
}

/// Declaration of a single parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    role: ParamRole,
    flags: ParamFlags,
    value_type: ParamType,
    channel: Option<String>,
    minval: Option<f64>,
    maxval: Option<f64>,
    units: Option<String>,
    format: Option<String>,
    tags: Vec<String>,
    option_list: Vec<String>,
    maxstep: Option<f64>,
    stepdelay: Option<u64>,
}

impl Parameter {
    pub fn new(name: &str, role: ParamRole, flags: ParamFlags, value_type: ParamType) -> Self {
        Self {
            name: name.to_string(),
            role,
            flags,
            value_type,
            channel: None,
            minval: None,
            maxval: None,
            units: None,
            format: None,
            tags: Vec::new(),
            option_list: Vec::new(),
            maxstep: None,
            stepdelay: None,
        }
    }

    pub fn with_channel(mut self, channel: &str) -> Self {
        self.channel = Some(channel.to_string());
        self
    }

    pub fn with_bounds(mut self, minval: f64, maxval: f64) -> Self {
        self.minval = Some(minval);
        self.maxval = Some(maxval);
        self
    }

    pub fn with_units(mut self, units: &str) -> Self {
        self.units = Some(units.to_string());
        self
    }

    pub fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.option_list = options;
        self
    }

    /// Sweep metadata: largest step per set and delay between steps in ms.
    pub fn with_ramp(mut self, maxstep: f64, stepdelay: u64) -> Self {
        self.maxstep = Some(maxstep);
        self.stepdelay = Some(stepdelay);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    /// Which adapter callback backs the parameter.
    pub fn role(&self) -> ParamRole {
        self.role
    }
    pub fn flags(&self) -> ParamFlags {
        self.flags
    }
    pub fn value_type(&self) -> ParamType {
        self.value_type
    }
    /// Bare channel the parameter reads or drives, `None` for configuration knobs.
    pub fn channel(&self) -> Option<&str> {
        self.channel.as_deref()
    }
    /// `(minval, maxval)`; `None` is unbounded on that side.
    pub fn bounds(&self) -> (Option<f64>, Option<f64>) {
        (self.minval, self.maxval)
    }
    pub fn units(&self) -> Option<&str> {
        self.units.as_deref()
    }
    /// printf-style display format for the host, e.g. `%.02f`.
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }
    pub fn tags(&self) -> &[String] {
        &self.tags
    }
    /// Accepted values of a string parameter; empty means any.
    pub fn option_list(&self) -> &[String] {
        &self.option_list
    }
    /// Largest step the host may take when sweeping the parameter.
    pub fn maxstep(&self) -> Option<f64> {
        self.maxstep
    }
    /// Delay (ms) the host waits between sweep steps.
    pub fn stepdelay(&self) -> Option<u64> {
        self.stepdelay
    }

    /// Readable through a get callback or from the last set value.
    pub fn is_gettable(&self) -> bool {
        self.flags.contains(ParamFlags::GET) || self.flags.contains(ParamFlags::SOFTGET)
    }

    pub fn is_settable(&self) -> bool {
        self.flags.contains(ParamFlags::SET)
    }

    /// Checks a value against the declared type, bounds and options.
    ///
    /// Integers are accepted for float parameters and converted. Returns the value to hand to
    /// the set callback.
    pub fn validate(&self, value: ParamValue) -> DaqResult<ParamValue> {
        let value = match (self.value_type, value) {
            (ParamType::Float, ParamValue::Int(v)) => ParamValue::Float(v as f64),
            (expected, v) if v.value_type() != expected => {
                return Err(DaqError::TypeMismatch {
                    name: self.name.clone(),
                    expected: expected.to_string(),
                    received: v.value_type().to_string(),
                })
            }
            (_, v) => v,
        };

        if let Some(v) = value.as_f64() {
            let min = self.minval.unwrap_or(f64::NEG_INFINITY);
            let max = self.maxval.unwrap_or(f64::INFINITY);
            if !v.is_finite() || v < min || v > max {
                return Err(DaqError::ValueOutOfRange {
                    name: self.name.clone(),
                    value: v,
                    min,
                    max,
                });
            }
        }

        if let Some(s) = value.as_str() {
            if !self.option_list.is_empty() && !self.option_list.iter().any(|o| o == s) {
                return Err(DaqError::InvalidOption {
                    name: self.name.clone(),
                    value: s.to_string(),
                    options: self.option_list.clone(),
                });
            }
        }
        Ok(value)
    }
}

/// Parameters and functions declared by an instrument, in registration order.
#[derive(Debug, Clone, Default)]
pub struct ParameterTable {
    params: IndexMap<String, Parameter>,
    functions: Vec<String>,
}

impl ParameterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a parameter. A later declaration with the same name replaces the earlier one.
    pub fn add_parameter(&mut self, param: Parameter) {
        if self.params.contains_key(param.name()) {
            log::warn!("Parameter {} declared twice, replacing", param.name());
        }
        self.params.insert(param.name().to_string(), param);
    }

    pub fn add_function(&mut self, name: &str) {
        if !self.has_function(name) {
            self.functions.push(name.to_string());
        }
    }

    pub fn get(&self, name: &str) -> DaqResult<&Parameter> {
        self.params
            .get(name)
            .ok_or_else(|| DaqError::UnknownParameter(name.to_string()))
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.iter().any(|f| f == name)
    }

    pub fn functions(&self) -> &[String] {
        &self.functions
    }

    pub fn names(&self) -> Vec<&str> {
        self.params.keys().map(|k| k.as_str()).collect()
    }

    /// Names of the parameters carrying `tag`.
    pub fn tagged(&self, tag: &str) -> Vec<&str> {
        self.params
            .values()
            .filter(|p| p.tags().iter().any(|t| t == tag))
            .map(|p| p.name())
            .collect()
    }

    /// Names of the parameters backed by `role`.
    pub fn with_role(&self, role: ParamRole) -> Vec<&str> {
        self.params
            .values()
            .filter(|p| p.role() == role)
            .map(|p| p.name())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.values()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}
