use backprop_nn::data::sample::xor_gate_samples;
use backprop_nn::{Network, NetworkConfig, Topology};

fn main() -> backprop_nn::Result<()> {
    let mut network = Network::new(
        Topology::new(vec![2, 3, 1])?,
        NetworkConfig::default().with_seed(42),
    )?;

    let samples = xor_gate_samples();
    let epochs = 20000;

    for epoch in 0..epochs {
        for sample in &samples {
            network.train(&sample.input, &sample.target)?;
        }
        if epoch % 2000 == 0 {
            let loss = backprop_nn::train::evaluate(&mut network, &samples)?;
            println!("Epoch {epoch}: loss = {loss:.6}");
        }
    }

    for sample in &samples {
        println!("Input: {:?} -> Output: {:.4}", sample.input, network.fire(&sample.input)?[0]);
    }
    Ok(())
}
