// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! The power-domain state machine.
//!
//! [`Pmgr`] loads the region and device tables once from the hardware
//! description, then serves enable/disable requests by writing target
//! power states and polling for hardware acknowledgment, walking parent
//! edges as required.

use alloc::vec::Vec;

use driver_base::{DeviceKind, DriverOps};
use log::{info, warn};

use crate::{
    error::{PmgrError, Result},
    io::RegisterIo,
    regs::{self, PowerState, PsReg},
    table::{self, DeviceDesc, RegionEntry},
    tree::{NodeHandle, TreeSource},
};

/// Path of the power controller node in the hardware description.
pub const PMGR_NODE_PATH: &str = "/arm-io/pmgr";

/// How many `poll32` reads a single state transition may burn before the
/// device is declared stuck.
pub const POLL_BUDGET: u32 = 10_000;

/// Upper bound on the parent chain; deeper chains only occur in malformed
/// (cyclic) device tables.
const MAX_PARENT_DEPTH: u32 = 8;

/// The power-domain controller engine.
///
/// Construct with [`Pmgr::new`] and call [`Pmgr::init`] once; every other
/// operation fails with [`PmgrError::NotInitialized`] until that succeeds.
/// Operations take `&mut self`: the register handshake is not reentrant, so
/// sharing an engine across contexts requires one external mutual-exclusion
/// boundary around it.
pub struct Pmgr<T, R> {
    tree: T,
    io: R,
    node: Option<NodeHandle>,
    regions: Vec<RegionEntry>,
    devices: Vec<DeviceDesc>,
}

impl<T: TreeSource, R: RegisterIo> Pmgr<T, R> {
    /// Create an engine that is not yet initialized.
    pub fn new(tree: T, io: R) -> Self {
        Pmgr {
            tree,
            io,
            node: None,
            regions: Vec::new(),
            devices: Vec::new(),
        }
    }

    /// Load the region and device tables and reconcile hardware state left
    /// over from earlier boot stages.
    pub fn init(&mut self) -> Result<()> {
        let Some(node) = self.tree.find_node(PMGR_NODE_PATH) else {
            warn!("pmgr: error getting {PMGR_NODE_PATH} node");
            return Err(PmgrError::NodeNotFound);
        };
        let regions = match self.tree.property(node, "ps-regs") {
            Some(raw) => table::parse_regions(raw)?,
            None => {
                warn!("pmgr: error getting {PMGR_NODE_PATH} ps-regs");
                return Err(PmgrError::MissingProperty);
            }
        };
        let devices = match self.tree.property(node, "devices") {
            Some(raw) => table::parse_devices(raw)?,
            None => {
                warn!("pmgr: error getting {PMGR_NODE_PATH} devices");
                return Err(PmgrError::MissingProperty);
            }
        };

        self.regions = regions;
        self.devices = devices;
        self.node = Some(node);

        self.reconcile();

        info!("pmgr: initialized, {} devices found", self.devices.len());
        Ok(())
    }

    /// Number of devices in the loaded table.
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    fn require_init(&self) -> Result<()> {
        match self.node {
            Some(_) => Ok(()),
            None => Err(PmgrError::NotInitialized),
        }
    }

    fn find_device(&self, id: u16) -> Option<DeviceDesc> {
        self.devices.iter().find(|dev| dev.id == id).copied()
    }

    /// Resolve a register-bank base: the controller node's Nth register
    /// range plus the entry's byte offset.
    fn bank_addr(&self, bank_index: u8) -> Option<usize> {
        let node = self.node?;
        let Some(entry) = self.regions.get(bank_index as usize) else {
            warn!("pmgr: index {bank_index} is out of bounds for ps-regs");
            return None;
        };
        let Some(base) = self.tree.reg_base(node, entry.reg_index as usize) else {
            warn!(
                "pmgr: error getting register range {} of {PMGR_NODE_PATH}",
                entry.reg_index
            );
            return None;
        };
        Some(base + entry.byte_offset as usize)
    }

    fn device_addr(&self, dev: &DeviceDesc) -> Option<usize> {
        if dev.is_virtual() {
            return None;
        }
        Some(self.bank_addr(dev.bank_index)? + ((dev.addr_offset as usize) << 3))
    }

    /// Request `target` at `addr` and wait for hardware to report it.
    fn set_mode(&mut self, addr: usize, target: PowerState) -> Result<()> {
        self.io
            .write32_masked(addr, regs::PS_TARGET, regs::target_field(target));
        self.io
            .poll32(addr, regs::PS_ACTUAL, regs::actual_field(target), POLL_BUDGET)
            .map_err(|last| {
                warn!(
                    "pmgr: timeout while trying to set mode {:x} for device at {addr:#x}: {last:#010x}",
                    target as u8
                );
                PmgrError::Timeout { addr, target, last }
            })
    }

    /// Apply `target` to `id`, then, if `recurse`, to each of its parents.
    /// The first failure anywhere in the walk stops it.
    fn set_mode_recursive(
        &mut self,
        id: u16,
        target: PowerState,
        recurse: bool,
        depth: u32,
    ) -> Result<()> {
        self.require_init()?;
        if id == 0 {
            return Err(PmgrError::InvalidId);
        }
        if depth > MAX_PARENT_DEPTH {
            warn!("pmgr: parent chain of device {id} is deeper than {MAX_PARENT_DEPTH} levels");
            return Err(PmgrError::TooDeep);
        }

        let dev = self.find_device(id).ok_or(PmgrError::UnknownDevice)?;

        if !dev.is_virtual() {
            let addr = self.device_addr(&dev).ok_or(PmgrError::NoAddress)?;
            self.set_mode(addr, target)?;
        }
        if !recurse {
            return Ok(());
        }

        for parent in dev.parents {
            if parent != 0 {
                self.set_mode_recursive(parent, target, true, depth + 1)?;
            }
        }

        Ok(())
    }

    /// Power up `id` and, transitively, every domain it depends on. The
    /// device's own register is written before its parents'.
    pub fn enable_device(&mut self, id: u16) -> Result<()> {
        self.set_mode_recursive(id, PowerState::Active, true, 0)
    }

    /// Power-gate `id` alone. Parents are left untouched: sibling domains
    /// may still depend on them.
    pub fn disable_device(&mut self, id: u16) -> Result<()> {
        self.set_mode_recursive(id, PowerState::PowerGated, false, 0)
    }

    fn node_clocks(&self, path: &str) -> Result<Vec<u16>> {
        let Some(node) = self.tree.find_node(path) else {
            warn!("pmgr: error getting node {path}");
            return Err(PmgrError::NodeNotFound);
        };
        let Some(raw) = self.tree.property(node, "clock-gates") else {
            warn!("pmgr: error getting {path} clock-gates");
            return Err(PmgrError::MissingProperty);
        };
        table::parse_clock_gates(raw)
    }

    fn set_node_clocks(&mut self, path: &str, target: PowerState, recurse: bool) -> Result<()> {
        self.require_init()?;
        let ids = self.node_clocks(path)?;

        let mut failure = None;
        for id in ids {
            if let Err(err) = self.set_mode_recursive(id, target, recurse, 0) {
                warn!(
                    "pmgr: failed to set mode {:x} for device {id} of {path}: {err}",
                    target as u8
                );
                failure = Some(err);
            }
        }
        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Enable every device listed in the `clock-gates` property of the node
    /// at `path`, dependencies included. All entries are attempted even if
    /// some fail; the last failure is reported.
    pub fn enable_node_clocks(&mut self, path: &str) -> Result<()> {
        self.set_node_clocks(path, PowerState::Active, true)
    }

    /// Power-gate every device listed in the `clock-gates` property of the
    /// node at `path`.
    pub fn disable_node_clocks(&mut self, path: &str) -> Result<()> {
        self.set_node_clocks(path, PowerState::PowerGated, false)
    }

    /// Repair domains left running by an earlier boot stage: an active
    /// device must have active parents, so idle parents of active devices
    /// are brought up. Immediate parents only; devices that are not already
    /// active are not touched.
    fn reconcile(&mut self) {
        info!("pmgr: cleaning up device states");

        for i in 0..self.devices.len() {
            let dev = self.devices[i];
            if dev.is_virtual() {
                continue;
            }
            let Some(addr) = self.device_addr(&dev) else {
                continue;
            };
            if !PsReg(self.io.read32(addr)).wants_active() {
                continue;
            }

            for parent in dev.parents {
                if parent == 0 {
                    continue;
                }
                let Some(pdev) = self.find_device(parent) else {
                    warn!("pmgr: failed to find parent #{parent} for {}", dev.name());
                    continue;
                };
                let Some(paddr) = self.device_addr(&pdev) else {
                    continue;
                };
                if PsReg(self.io.read32(paddr)).wants_active() {
                    continue;
                }
                info!(
                    "pmgr: enabling {}, parent of active device {}",
                    pdev.name(),
                    dev.name()
                );
                // a timeout here is already logged by set_mode; the scan
                // keeps going either way
                let _ = self.set_mode(paddr, PowerState::Active);
            }
        }
    }
}

impl<T: TreeSource, R: RegisterIo> DriverOps for Pmgr<T, R> {
    fn device_kind(&self) -> DeviceKind {
        DeviceKind::Power
    }

    fn name(&self) -> &str {
        "pmgr"
    }
}
