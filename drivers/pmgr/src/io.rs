// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Register access primitives.

/// Raw access to memory-mapped control registers.
///
/// All methods take `&mut self` so a register space has exactly one writer,
/// matching the single-caller firmware context the controller runs in.
pub trait RegisterIo {
    /// Read a 32-bit register.
    fn read32(&mut self, addr: usize) -> u32;

    /// Update only the `mask` bits of a 32-bit register.
    fn write32_masked(&mut self, addr: usize, mask: u32, value: u32);

    /// Re-read `addr` until `(value & mask) == expected`, giving up after
    /// `budget` reads. On timeout the last observed value is returned.
    fn poll32(
        &mut self,
        addr: usize,
        mask: u32,
        expected: u32,
        budget: u32,
    ) -> core::result::Result<(), u32>;
}

/// [`RegisterIo`] over directly mapped MMIO, using volatile accesses.
///
/// Every address handed to an `MmioIo`-backed engine must point at a mapped
/// device register.
pub struct MmioIo;

impl MmioIo {
    pub const fn new() -> Self {
        MmioIo
    }
}

impl RegisterIo for MmioIo {
    fn read32(&mut self, addr: usize) -> u32 {
        unsafe { (addr as *const u32).read_volatile() }
    }

    fn write32_masked(&mut self, addr: usize, mask: u32, value: u32) {
        let old = self.read32(addr);
        unsafe { (addr as *mut u32).write_volatile((old & !mask) | (value & mask)) }
    }

    fn poll32(
        &mut self,
        addr: usize,
        mask: u32,
        expected: u32,
        budget: u32,
    ) -> core::result::Result<(), u32> {
        let mut last = 0;
        for _ in 0..budget {
            last = self.read32(addr);
            if last & mask == expected {
                return Ok(());
            }
            core::hint::spin_loop();
        }
        Err(last)
    }
}
