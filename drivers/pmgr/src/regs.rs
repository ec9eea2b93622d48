// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Bit-level layout of a power-domain control register.
//!
//! Every non-virtual domain owns one 32-bit register. Software writes the
//! requested state into TARGET_STATE and waits for hardware to mirror it
//! into ACTUAL_STATE; the remaining fields are status and configuration
//! bits owned by hardware or earlier boot stages.

/// Reset request.
pub const PS_RESET: u32 = 1 << 31;
/// Hardware may power the domain up on its own.
pub const PS_AUTO_ENABLE: u32 = 1 << 28;
/// State applied by hardware when auto-enabling (bits 24-27).
pub const PS_AUTO_STATE: u32 = 0xf << 24;
/// An upstream domain is currently off.
pub const PS_PARENT_OFF: u32 = 1 << 11;
/// Device disable request.
pub const PS_DEV_DISABLE: u32 = 1 << 10;
/// Sticky: the domain has been clock gated.
pub const PS_WAS_CLKGATED: u32 = 1 << 9;
/// Sticky: the domain has been power gated.
pub const PS_WAS_PWRGATED: u32 = 1 << 8;
/// State currently reported by hardware (bits 4-7).
pub const PS_ACTUAL: u32 = 0xf << 4;
/// Requested state (bits 0-3).
pub const PS_TARGET: u32 = 0xf;

/// Power states this controller requests.
///
/// ACTUAL_STATE may transiently report other encodings while hardware moves
/// between states; they are never written as a target.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    /// Clocked and powered.
    Active = 0xf,
    /// Powered with the clock stopped.
    ClockGated = 0x4,
    /// Unpowered.
    PowerGated = 0x0,
}

/// TARGET_STATE field value encoding `state`.
pub const fn target_field(state: PowerState) -> u32 {
    state as u32
}

/// ACTUAL_STATE field value encoding `state`.
pub const fn actual_field(state: PowerState) -> u32 {
    (state as u32) << 4
}

/// Read-only view over a control register word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PsReg(pub u32);

impl PsReg {
    /// Requested state field.
    pub const fn target(self) -> u8 {
        (self.0 & PS_TARGET) as u8
    }

    /// State currently reported by hardware.
    pub const fn actual(self) -> u8 {
        ((self.0 & PS_ACTUAL) >> 4) as u8
    }

    /// Whether hardware may power the domain up on its own.
    pub const fn auto_enable(self) -> bool {
        self.0 & PS_AUTO_ENABLE != 0
    }

    /// Whether the register shows the domain wants to run: left
    /// auto-enabled by an earlier boot stage, or already targeting ACTIVE.
    pub const fn wants_active(self) -> bool {
        self.auto_enable() || self.target() == PowerState::Active as u8
    }
}
