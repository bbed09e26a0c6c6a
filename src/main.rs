use orbit_showcase::{config::ShowcaseConfig, flow};

fn main() -> anyhow::Result<()> {
    flow::run(ShowcaseConfig::from_env())
}
