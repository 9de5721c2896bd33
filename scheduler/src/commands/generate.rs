use std::fs;

use anyhow::{Context, Result};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rcpsp::psp_gen::{generate_psp, GeneratorOptions};

use crate::Generate;

pub fn generate(generate: Generate) -> Result<()> {
    let options = generator_options(&generate)?;
    let mut rng = match generate.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let psp = generate_psp(&options, &mut rng);

    fs::write(&generate.output, psp.to_string())
        .with_context(|| format!("failed to write {:?}", generate.output))?;

    info!(
        "Wrote problem with {} jobs and horizon {} to: {:?}",
        psp.jobs, psp.horizon, generate.output
    );

    Ok(())
}

fn generator_options(generate: &Generate) -> Result<GeneratorOptions> {
    if !(0.0..=1.0).contains(&generate.edge_probability) {
        anyhow::bail!(
            "edge probability must lie within [0, 1], got {}",
            generate.edge_probability
        )
    }
    if generate.min_capacity > generate.max_capacity {
        anyhow::bail!(
            "min capacity {} exceeds max capacity {}",
            generate.min_capacity,
            generate.max_capacity
        )
    }

    Ok(GeneratorOptions {
        activities: generate.activities,
        resources: generate.resources,
        max_duration: generate.max_duration,
        min_capacity: generate.min_capacity,
        max_capacity: generate.max_capacity,
        edge_probability: generate.edge_probability,
    })
}
