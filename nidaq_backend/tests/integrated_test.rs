use nidaq_backend::*;

use maplit::hashset;
use ndarray::array;
use std::collections::HashSet;

fn card() -> MockBinding {
    MockBinding::new().with_device("Dev1", 3, 2, 1)
}

#[test]
fn declares_one_parameter_per_channel() {
    let daq = NiDaq::try_new(card(), "Dev1", DaqConfig::default()).unwrap();
    let params = daq.parameters();

    assert_eq!(params.with_role(ParamRole::Input), vec!["ai0", "ai1", "ai2"]);
    assert_eq!(params.with_role(ParamRole::Output), vec!["ao0", "ao1"]);
    assert_eq!(params.with_role(ParamRole::Counter), vec!["ctr0"]);
    assert_eq!(params.with_role(ParamRole::CounterSrc), vec!["ctr0_src"]);

    let names: HashSet<&str> = params.names().into_iter().collect();
    let expected = hashset! {
        "chan_config", "ai0", "ai1", "ai2", "ao0", "ao1", "ctr0", "ctr0_src",
        "count_time", "samples", "freq",
    };
    assert_eq!(names, expected);
    assert_eq!(params.functions(), &["reset".to_string()]);
}

#[test]
fn declarations_carry_host_metadata() {
    let daq = NiDaq::try_new(card(), "Dev1", DaqConfig::default()).unwrap();
    let params = daq.parameters();

    let ai = params.get("ai1").unwrap();
    assert_eq!(ai.flags(), ParamFlags::GET);
    assert_eq!(ai.value_type(), ParamType::Array);
    assert_eq!(ai.units(), Some("mV"));
    assert_eq!(ai.format(), Some("%.02f"));

    let ao = params.get("ao0").unwrap();
    assert_eq!(ao.bounds(), (Some(-10000.), Some(10000.)));
    assert_eq!(ao.maxstep(), Some(100.));
    assert_eq!(ao.stepdelay(), Some(50));
    assert_eq!(params.tagged("sweep"), vec!["ao0", "ao1"]);
    assert_eq!(params.tagged("measure"), vec!["ai0", "ai1", "ai2", "ctr0"]);

    let freq = params.get("freq").unwrap();
    assert_eq!(freq.bounds(), (Some(daq.info().ai_min_rate), Some(daq.info().ai_max_rate)));
    assert_eq!(params.get("chan_config").unwrap().option_list().len(), 5);
}

#[test]
fn configuration_is_applied() {
    let cfg = DaqConfig {
        samples: 250,
        freq: 2000.,
        ..DaqConfig::default()
    };
    let daq = NiDaq::try_new(card(), "Dev1", cfg).unwrap();
    assert_eq!(daq.get("samples").unwrap(), ParamValue::Int(250));
    assert_eq!(daq.get("freq").unwrap(), ParamValue::Float(2000.));
    assert_eq!(daq.get("count_time").unwrap(), ParamValue::Float(0.1));
    assert_eq!(daq.get("chan_config").unwrap(), ParamValue::Str("Diff".to_string()));
    assert_eq!(daq.get("ctr0_src").unwrap(), ParamValue::Str(String::new()));
}

#[test]
fn out_of_range_frequency_fails_construction() {
    let cfg = DaqConfig {
        freq: 1e9,
        ..DaqConfig::default()
    };
    assert!(matches!(
        NiDaq::try_new(card(), "Dev1", cfg),
        Err(DaqError::ValueOutOfRange { .. })
    ));
}

#[test]
fn output_cache_is_seeded_from_loopback_inputs() {
    let mock = MockBinding::new().with_device("Dev1", 8, 2, 0);
    mock.set_input("Dev1/ai6", array![1.0, 1.0]);
    mock.set_input("Dev1/ai7", array![-0.25, -0.75]);

    let daq = NiDaq::try_new(mock, "Dev1", DaqConfig::default()).unwrap();
    assert_eq!(daq.get("ao0").unwrap(), ParamValue::Float(1000.));
    assert_eq!(daq.get("ao1").unwrap(), ParamValue::Float(-500.));
}

#[test]
fn unknown_device_fails_construction() {
    assert!(matches!(
        NiDaq::try_new(card(), "Dev2", DaqConfig::default()),
        Err(DaqError::Binding(_))
    ));
}

#[test]
fn reset_flag_resets_instead_of_reading_back() {
    let mock = MockBinding::new().with_device("Dev1", 8, 2, 1);
    let cfg = DaqConfig {
        reset: true,
        ..DaqConfig::default()
    };
    let _daq = NiDaq::try_new(mock.clone(), "Dev1", cfg).unwrap();
    let calls = mock.calls();
    // Two seeding reads, then the reset
    assert_eq!(calls.len(), 3);
    assert_eq!(
        calls.last(),
        Some(&BindingCall::Reset {
            device: "Dev1".to_string()
        })
    );

    let mock = MockBinding::new().with_device("Dev1", 8, 2, 1);
    let _daq = NiDaq::try_new(mock.clone(), "Dev1", DaqConfig::default()).unwrap();
    let calls = mock.calls();
    // Two seeding reads, then every input read back
    assert_eq!(calls.len(), 2 + 8);
    assert!(calls.iter().all(|c| matches!(c, BindingCall::Read { .. })));
}

#[test]
fn get_all_reads_inputs_then_outputs() {
    let mock = MockBinding::new().with_device("Dev1", 8, 2, 1);
    let mut daq = NiDaq::try_new(mock, "Dev1", DaqConfig::default()).unwrap();
    daq.set("ao1", ParamValue::Float(-2000.)).unwrap();

    let all = daq.get_all().unwrap();
    let keys: Vec<&str> = all.keys().map(|k| k.as_str()).collect();
    assert_eq!(
        keys,
        vec!["ai0", "ai1", "ai2", "ai3", "ai4", "ai5", "ai6", "ai7", "ao0", "ao1"]
    );
    assert_eq!(all["ao1"], ParamValue::Float(-2000.));
    // ao1 loops back onto ai7
    assert_eq!(all["ai7"], ParamValue::Array(array![-2000.]));
}

#[test]
fn unit_scaling_round_trip() {
    let mock = MockBinding::new().with_device("Dev1", 8, 2, 0);
    let mut daq = NiDaq::try_new(mock, "Dev1", DaqConfig::default()).unwrap();
    for mv in [-10000., -3.3, 0., 0.01, 42.5, 9999.99] {
        assert!(daq.set("ao0", ParamValue::Float(mv)).unwrap());
        assert_eq!(daq.get("ao0").unwrap(), ParamValue::Float(mv));
    }
}

#[test]
fn detects_every_device() {
    let mock = MockBinding::new()
        .with_device("Dev1", 8, 2, 1)
        .with_device("PXI1Slot3", 8, 0, 4);
    let instruments = detect_instruments(&mock, &DaqConfig::default()).unwrap();
    let names: Vec<&str> = instruments.keys().map(|k| k.as_str()).collect();
    assert_eq!(names, vec!["NIDev1", "NIPXI1Slot3"]);
    assert_eq!(
        instruments["NIPXI1Slot3"]
            .parameters()
            .with_role(ParamRole::CounterSrc)
            .len(),
        4
    );
}
