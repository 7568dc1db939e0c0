//! Menu and command registry of the headless host.

use std::collections::BTreeMap;
use std::sync::Mutex;

use anyhow::{bail, Result};

use super::HeadlessHost;
use crate::host::{CommandHandler, DividerId, MenuHost, MenuId};
use crate::inserter::Invocation;

struct Command {
    label: String,
    handler: CommandHandler,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Divider(DividerId),
    Command(String),
}

#[derive(Default)]
struct Menus {
    next_divider: u64,
    commands: BTreeMap<String, Command>,
    entries: BTreeMap<MenuId, Vec<MenuEntry>>,
}

#[derive(Default)]
pub(super) struct MenuState {
    inner: Mutex<Menus>,
}

impl MenuState {
    pub(super) fn entries(&self, menu: MenuId) -> Vec<MenuEntry> {
        let menus = self.inner.lock().unwrap();
        menus.entries.get(&menu).cloned().unwrap_or_default()
    }

    pub(super) fn commands(&self) -> Vec<(String, String)> {
        let menus = self.inner.lock().unwrap();
        menus
            .commands
            .iter()
            .map(|(id, cmd)| (id.clone(), cmd.label.clone()))
            .collect()
    }

    /// Runs the handler registered under `id` outside the registry lock, so
    /// the handler may touch menus itself.
    pub(super) fn execute(&self, id: &str) -> Result<Invocation> {
        let handler = {
            let menus = self.inner.lock().unwrap();
            match menus.commands.get(id) {
                Some(cmd) => cmd.handler.clone(),
                None => bail!("unknown command {id}"),
            }
        };
        tracing::debug!("executing command {}", id);
        Ok(handler())
    }
}

impl MenuHost for HeadlessHost {
    fn register_command(&self, id: &str, label: &str, handler: CommandHandler) -> Result<()> {
        let mut menus = self.menus.inner.lock().unwrap();
        if menus.commands.contains_key(id) {
            bail!("command {id} is already registered");
        }
        menus.commands.insert(
            id.to_string(),
            Command {
                label: label.to_string(),
                handler,
            },
        );
        Ok(())
    }

    fn unregister_command(&self, id: &str) {
        self.menus.inner.lock().unwrap().commands.remove(id);
    }

    fn add_menu_divider(&self, menu: MenuId) -> DividerId {
        let mut menus = self.menus.inner.lock().unwrap();
        menus.next_divider += 1;
        let divider = DividerId(menus.next_divider);
        menus
            .entries
            .entry(menu)
            .or_default()
            .push(MenuEntry::Divider(divider));
        divider
    }

    fn remove_menu_divider(&self, menu: MenuId, divider: DividerId) {
        let mut menus = self.menus.inner.lock().unwrap();
        if let Some(entries) = menus.entries.get_mut(&menu) {
            entries.retain(|e| *e != MenuEntry::Divider(divider));
        }
    }

    fn add_menu_item(&self, menu: MenuId, command_id: &str) -> Result<()> {
        let mut menus = self.menus.inner.lock().unwrap();
        if !menus.commands.contains_key(command_id) {
            bail!("unknown command {command_id}");
        }
        menus
            .entries
            .entry(menu)
            .or_default()
            .push(MenuEntry::Command(command_id.to_string()));
        Ok(())
    }

    fn remove_menu_item(&self, menu: MenuId, command_id: &str) {
        let mut menus = self.menus.inner.lock().unwrap();
        if let Some(entries) = menus.entries.get_mut(&menu) {
            entries.retain(|e| !matches!(e, MenuEntry::Command(id) if id == command_id));
        }
    }
}
