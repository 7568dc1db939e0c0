//! Extension lifecycle: command registration and menu placement.
//!
//! Activation registers the command with its handler and appends a divider
//! followed by the item to the edit menu and the editor context menu.
//! Deactivation undoes exactly what activation added, so the command can no
//! longer be executed afterwards.

use anyhow::{Context, Result};

use crate::host::{CommandHandler, DividerId, MenuHost, MenuId};

pub const GET_DIMENSIONS: &str = "get_dimensions";
pub const GET_DIMENSIONS_LABEL: &str = "Get image dimension";

/// Menus the command is placed in, in activation order.
pub const MENUS: [MenuId; 2] = [MenuId::Edit, MenuId::EditorContext];

#[derive(Debug, Default)]
pub struct Extension {
    /// Dividers added on activation; `None` while inactive.
    placed: Option<Vec<(MenuId, DividerId)>>,
}

impl Extension {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.placed.is_some()
    }

    /// Registers the command with `handler` and adds its menu entries.
    /// No-op when already active.
    pub fn activate<M: MenuHost + ?Sized>(
        &mut self,
        host: &M,
        handler: CommandHandler,
    ) -> Result<()> {
        if self.is_active() {
            return Ok(());
        }
        host.register_command(GET_DIMENSIONS, GET_DIMENSIONS_LABEL, handler)
            .context("register command")?;

        let mut placed = Vec::with_capacity(MENUS.len());
        for menu in MENUS {
            let divider = host.add_menu_divider(menu);
            placed.push((menu, divider));
            if let Err(e) = host.add_menu_item(menu, GET_DIMENSIONS) {
                remove_entries(host, &placed);
                host.unregister_command(GET_DIMENSIONS);
                return Err(e).with_context(|| format!("add menu item to {menu:?}"));
            }
        }
        tracing::debug!("registered {} in {} menus", GET_DIMENSIONS, placed.len());
        self.placed = Some(placed);
        Ok(())
    }

    /// Removes everything `activate` added. No-op when inactive.
    pub fn deactivate<M: MenuHost + ?Sized>(&mut self, host: &M) {
        let Some(placed) = self.placed.take() else {
            return;
        };
        remove_entries(host, &placed);
        host.unregister_command(GET_DIMENSIONS);
        tracing::debug!("unregistered {}", GET_DIMENSIONS);
    }
}

fn remove_entries<M: MenuHost + ?Sized>(host: &M, placed: &[(MenuId, DividerId)]) {
    for &(menu, divider) in placed.iter().rev() {
        host.remove_menu_item(menu, GET_DIMENSIONS);
        host.remove_menu_divider(menu, divider);
    }
}
