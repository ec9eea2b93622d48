// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Power-domain controller for SoC power management units.
//!
//! A PMU-style block exposes one 32-bit control register per clock/power
//! domain, grouped into banks located through the firmware-supplied hardware
//! description. Domains depend on up to two parent domains, so the
//! controller walks a dependency graph while driving registers through the
//! request-target / poll-actual handshake:
//!
//! - enabling a device transitively enables every domain it depends on;
//! - disabling a device gates only that device, leaving shared ancestors up
//!   for sibling consumers;
//! - at init, domains left active by an earlier boot stage get their idle
//!   parents re-enabled so the dependency tree is consistent before normal
//!   operation starts.
//!
//! The description-blob reader and the raw register transport are supplied
//! by the consumer through the [`TreeSource`] and [`RegisterIo`] seams;
//! [`MmioIo`] covers the common directly-mapped case.

#![no_std]

extern crate alloc;

pub mod engine;
pub mod error;
pub mod io;
pub mod regs;
pub mod table;
pub mod tree;

#[doc(no_inline)]
pub use driver_base::{DeviceKind, DriverError, DriverOps, DriverResult};

pub use self::{
    engine::{PMGR_NODE_PATH, POLL_BUDGET, Pmgr},
    error::PmgrError,
    io::{MmioIo, RegisterIo},
    regs::{PowerState, PsReg},
    table::{DeviceDesc, DeviceFlags, RegionEntry},
    tree::{NodeHandle, TreeSource},
};
