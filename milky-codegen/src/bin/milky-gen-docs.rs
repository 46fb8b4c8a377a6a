//! Generates `docs/api.md` from `openapi.json`.

use milky_codegen::{Artifact, Generator, GeneratorConfig};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cwd = std::env::current_dir()?;
    let Some(config) = GeneratorConfig::discover(&cwd) else {
        println!("openapi.json not found");
        return Ok(());
    };

    let report = Generator::new(config).run(&[Artifact::ApiDoc])?;
    for path in &report.written {
        println!("Generated {}", path.display());
    }
    Ok(())
}
