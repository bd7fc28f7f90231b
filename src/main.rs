use anyhow::Context;
use clap::Parser;
use frozen_lake_showcase::settings::Settings;
use frozen_lake_showcase::ui::ShowcaseApp;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let settings = Settings::parse();
    settings.init_logging();

    info!(endpoint = %settings.endpoint, "starting FrozenLake showcase");

    ShowcaseApp::run(settings).context("showcase window failed")
}
