//! # nidaq_backend
//!
//! Hardware-independent half of the NI DAQ instrument driver. It adapts a National Instruments
//! data acquisition card to a measurement framework's instrument model: named parameters backed
//! by get/set callbacks that are forwarded to a [`DaqBinding`].
//!
//! - [`channel`]: channel name normalization, classification and the loopback wiring rule.
//! - [`config`]: wiring modes, trigger slope, per-read options and [`DaqConfig`].
//! - [`parameter`]: parameter declarations and values exchanged with the host.
//! - [`binding`]: the [`DaqBinding`] trait implemented by `nidaqctrl_backend` on NI-DAQmx.
//! - [`instrument`]: the [`NiDaq`] adapter itself.
//! - [`mock`]: an in-memory card for tests and demos.

pub mod binding;
pub mod channel;
pub mod config;
pub mod error;
pub mod instrument;
pub mod mock;
pub mod parameter;

pub use binding::*;
pub use channel::*;
pub use config::*;
pub use error::*;
pub use instrument::*;
pub use mock::*;
pub use parameter::*;
