//! The zoo under the skydome with the debug overlay (build with `--features ui`).

use zoo_ngin::config::DemoConfig;

fn main() -> anyhow::Result<()> {
    zoo_ngin::run_demo(DemoConfig::zoo())
}
