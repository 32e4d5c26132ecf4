//! Title screen, then the zoo with sounds that play near the enclosures.

use zoo_ngin::config::DemoConfig;

fn main() -> anyhow::Result<()> {
    zoo_ngin::run_demo(DemoConfig::tour())
}
