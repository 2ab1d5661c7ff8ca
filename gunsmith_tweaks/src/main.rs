#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
//! ** Gunsmith Tweaks **
//! Dry run: apply the mod to a dumped quest database and report what changed.

use gunsmith_tweaks::data_paths::{mod_path, mod_root};
use gunsmith_tweaks::{GUNSMITH_TWEAKS_VERSION, HostDatabase, on_load};

use anyhow::{Context, Result};
use gunsmith_data::STARTED_BUCKET;
use log::info;

fn main() -> Result<()> {
    env_logger::init();
    info!("Gunsmith Tweaks v{GUNSMITH_TWEAKS_VERSION}: mod root '{}'", mod_root().display());

    let mut host = HostDatabase::load(&mod_path("database")).context("while loading host database")?;
    let before: usize = host.quests.values().map(|quest| quest.bucket(STARTED_BUCKET).len()).sum();

    let report = on_load(&mut host.quests, &host.items).context("while applying Gunsmith tweaks")?;

    let after: usize = host.quests.values().map(|quest| quest.bucket(STARTED_BUCKET).len()).sum();
    for line in report.summary_lines() {
        println!("{line}");
    }
    println!("Started rewards across all quests: {before} -> {after}");
    Ok(())
}
