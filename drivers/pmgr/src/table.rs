// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Decoding of the controller's configuration tables.
//!
//! Two properties on the controller node describe the hardware: `ps-regs`
//! lists the control-register banks and `devices` the power domains
//! themselves. Both are packed native-endian arrays; byte lengths that do
//! not divide into whole records are rejected up front instead of being
//! sliced past the end.

use alloc::vec::Vec;

use bitflags::bitflags;
use bytemuck::{Pod, Zeroable};

use crate::error::{PmgrError, Result};

/// Byte size of one `ps-regs` entry: three packed `u32`s.
pub const REGION_ENTRY_SIZE: usize = 12;

/// Byte size of one `devices` record.
pub const DEVICE_RECORD_SIZE: usize = core::mem::size_of::<RawDevice>();

bitflags! {
    /// Per-device flag word.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DeviceFlags: u32 {
        /// The device has no backing register and only contributes
        /// dependency edges.
        const VIRTUAL = 1 << 4;
    }
}

/// One control-register bank: an index into the controller node's register
/// ranges plus a byte offset within that range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionEntry {
    pub reg_index: u32,
    pub byte_offset: u32,
}

/// On-blob layout of one `devices` record. Reserved fields are carried
/// through untouched.
#[repr(C, packed)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct RawDevice {
    flags: u32,
    parents: [u16; 2],
    rsvd0: [u8; 2],
    addr_offset: u8,
    bank_index: u8,
    rsvd1: [u8; 14],
    id: u16,
    rsvd2: [u8; 4],
    name: [u8; 16],
}

/// One power domain, decoded for lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceDesc {
    /// Unique non-zero id consumers use to name the domain.
    pub id: u16,
    /// Upstream domains this one depends on; 0 marks an empty slot.
    pub parents: [u16; 2],
    pub flags: DeviceFlags,
    /// Index into the region table locating this device's register bank.
    pub bank_index: u8,
    /// Register offset within the bank, in units of 8 bytes.
    pub addr_offset: u8,
    name: [u8; 16],
}

impl DeviceDesc {
    fn from_raw(raw: &RawDevice) -> Self {
        DeviceDesc {
            id: raw.id,
            parents: raw.parents,
            flags: DeviceFlags::from_bits_retain(raw.flags),
            bank_index: raw.bank_index,
            addr_offset: raw.addr_offset,
            name: raw.name,
        }
    }

    /// Diagnostic label, trimmed at the first NUL.
    pub fn name(&self) -> &str {
        let len = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.name.len());
        core::str::from_utf8(&self.name[..len]).unwrap_or("<bad name>")
    }

    /// Whether this device carries no backing register.
    pub fn is_virtual(&self) -> bool {
        self.flags.contains(DeviceFlags::VIRTUAL)
    }
}

fn ne_u32(bytes: &[u8]) -> u32 {
    u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Decode the `ps-regs` property into the region table.
pub fn parse_regions(raw: &[u8]) -> Result<Vec<RegionEntry>> {
    if raw.is_empty() {
        return Err(PmgrError::MissingProperty);
    }
    if raw.len() % REGION_ENTRY_SIZE != 0 {
        return Err(PmgrError::InvalidProperty);
    }
    Ok(raw
        .chunks_exact(REGION_ENTRY_SIZE)
        .map(|entry| RegionEntry {
            reg_index: ne_u32(&entry[0..4]),
            byte_offset: ne_u32(&entry[4..8]),
            // entry[8..12] is reserved
        })
        .collect())
}

/// Decode the `devices` property into the device table.
pub fn parse_devices(raw: &[u8]) -> Result<Vec<DeviceDesc>> {
    if raw.is_empty() {
        return Err(PmgrError::MissingProperty);
    }
    if raw.len() % DEVICE_RECORD_SIZE != 0 {
        return Err(PmgrError::InvalidProperty);
    }
    let records: &[RawDevice] =
        bytemuck::try_cast_slice(raw).map_err(|_| PmgrError::InvalidProperty)?;
    Ok(records.iter().map(DeviceDesc::from_raw).collect())
}

/// Decode a node's `clock-gates` property: packed `u32` cells carrying
/// device ids in their low half.
pub fn parse_clock_gates(raw: &[u8]) -> Result<Vec<u16>> {
    if raw.is_empty() {
        return Err(PmgrError::MissingProperty);
    }
    if raw.len() % 4 != 0 {
        return Err(PmgrError::InvalidProperty);
    }
    Ok(raw.chunks_exact(4).map(|cell| ne_u32(cell) as u16).collect())
}
