use nidaq_backend::*;

// Drives a simulated card the way the host framework would.
fn main() {
    let card = MockBinding::new().with_device("Dev1", 16, 2, 2);
    let mut daq = match NiDaq::try_new(card, "Dev1", DaqConfig::default()) {
        Ok(daq) => daq,
        Err(err) => {
            eprintln!("Failed to initialize Dev1: {}", err);
            return;
        }
    };
    println!("Declared parameters: {:?}", daq.parameters().names());

    if let Err(err) = daq.set("ao0", ParamValue::Float(1500.)) {
        eprintln!("Failed to set ao0: {}", err);
    }
    // ao0 is wired back to ai6
    println!("ao0 = {:?}", daq.get("ao0"));
    println!("ai6 = {:?}", daq.get("ai6"));
    println!("ctr0 = {:?}", daq.get("ctr0"));
}
