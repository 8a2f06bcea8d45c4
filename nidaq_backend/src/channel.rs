//! Channel naming for NI DAQ cards.
//!
//! NI-DAQmx addresses a physical channel as `device/suffix` (e.g. `Dev1/ai0`). The adapter
//! declares its parameters under the bare suffix and re-attaches the device name whenever it
//! talks to the binding. The functions here do that conversion and classify a suffix as an
//! analog input, analog output or counter channel.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Strips the device part from a `device/channel` name.
///
/// Returns the channel suffix when the name contains exactly one `/`, otherwise the name is
/// returned unchanged (this includes multi-segment names such as `Dev1/port0/line1`).
///
/// # Example
/// ```
/// use nidaq_backend::channel::bare_channel;
///
/// assert_eq!(bare_channel("Dev1/ai0"), "ai0");
/// assert_eq!(bare_channel("ai0"), "ai0");
/// assert_eq!(bare_channel("Dev1/port0/line1"), "Dev1/port0/line1");
/// ```
pub fn bare_channel(devchan: &str) -> &str {
    match devchan.split_once('/') {
        Some((_, chan)) if !chan.contains('/') => chan,
        _ => devchan,
    }
}

/// Composes the fully addressed channel name `device/channel`.
pub fn device_channel(device: &str, channel: &str) -> String {
    format!("{}/{}", device, channel)
}

/// Returns the analog input that an analog output is wired back to.
///
/// The rack this driver was written for loops every output back into an input. The pairing
/// is a plain textual substitution on the channel name: `o` becomes `i`, then `0` becomes `6`
/// and `1` becomes `7` (so `ao0` is read back on `ai6`, `ao1` on `ai7`).
pub fn loopback_input(output: &str) -> String {
    output.replace('o', "i").replace('0', "6").replace('1', "7")
}

/// Classification of a channel suffix by its prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// Analog input, `ai<n>`.
    Input,
    /// Analog output, `ao<n>`.
    Output,
    /// Counter, `ctr<n>`.
    Counter,
}

fn channel_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(ai|ao|ctr)(\d+)$").unwrap())
}

impl ChannelKind {
    /// Classifies a channel name (with or without device prefix).
    ///
    /// Returns `None` for names that are not of the form `ai(number)`, `ao(number)` or
    /// `ctr(number)`.
    pub fn classify(name: &str) -> Option<Self> {
        let caps = channel_regex().captures(bare_channel(name))?;
        match &caps[1] {
            "ai" => Some(ChannelKind::Input),
            "ao" => Some(ChannelKind::Output),
            "ctr" => Some(ChannelKind::Counter),
            _ => None,
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            ChannelKind::Input => "ai",
            ChannelKind::Output => "ao",
            ChannelKind::Counter => "ctr",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ChannelKind::Input => "input",
                ChannelKind::Output => "output",
                ChannelKind::Counter => "counter",
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ai0", "ai0")]
    #[case("Dev1/ai0", "ai0")]
    #[case("PXI1Slot3/ctr1", "ctr1")]
    #[case("Dev1/port0/line1", "Dev1/port0/line1")]
    #[case("a/b/c/d", "a/b/c/d")]
    #[case("", "")]
    #[case("Dev1/", "")]
    fn normalizes_channel_names(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(bare_channel(input), expected);
    }

    #[test]
    fn composes_device_channel() {
        assert_eq!(device_channel("Dev1", "ao1"), "Dev1/ao1");
        assert_eq!(bare_channel(&device_channel("Dev1", "ao1")), "ao1");
    }

    #[rstest]
    #[case("ao0", "ai6")]
    #[case("ao1", "ai7")]
    #[case("ao10", "ai76")]
    #[case("ao3", "ai3")]
    fn loopback_substitution(#[case] output: &str, #[case] input: &str) {
        assert_eq!(loopback_input(output), input);
    }

    #[rstest]
    #[case("ai0", Some(ChannelKind::Input))]
    #[case("Dev1/ai15", Some(ChannelKind::Input))]
    #[case("ao1", Some(ChannelKind::Output))]
    #[case("ctr0", Some(ChannelKind::Counter))]
    #[case("port0/line1", None)]
    #[case("aio", None)]
    fn classifies_channels(#[case] name: &str, #[case] kind: Option<ChannelKind>) {
        assert_eq!(ChannelKind::classify(name), kind);
    }
}
