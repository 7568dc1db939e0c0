//! `imgdim menus` – show the menu layout after activation.

use anyhow::Result;
use imgdim_core::command::{Extension, MENUS};
use imgdim_core::config::ImgdimConfig;
use imgdim_core::decode::FsImageDecoder;
use imgdim_core::headless::{HeadlessHost, MenuEntry};
use imgdim_core::inserter::DimensionInserter;
use std::sync::Arc;

pub fn run_menus() -> Result<()> {
    let host = Arc::new(HeadlessHost::new());
    let inserter = Arc::new(DimensionInserter::new(
        Arc::clone(&host),
        Arc::new(FsImageDecoder::new()),
        ImgdimConfig::default(),
    ));
    let mut extension = Extension::new();
    extension.activate(&*host, inserter.command_handler())?;

    for (id, label) in host.registered_commands() {
        println!("command {:<16} {}", id, label);
    }
    for menu in MENUS {
        println!("{:?}:", menu);
        for entry in host.menu_entries(menu) {
            match entry {
                MenuEntry::Divider(_) => println!("  ----"),
                MenuEntry::Command(id) => println!("  {}", id),
            }
        }
    }

    extension.deactivate(&*host);
    Ok(())
}
