// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Error types for the power-domain controller.

use driver_base::DriverError;

use crate::regs::PowerState;

/// Possible errors when operating on power domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PmgrError {
    /// An operation was invoked before a successful init
    NotInitialized,
    /// The controller node is absent from the hardware description
    NodeNotFound,
    /// A required property is absent or empty
    MissingProperty,
    /// A property's byte length does not divide into whole records
    InvalidProperty,
    /// Device id 0 is reserved and never valid
    InvalidId,
    /// No device with the requested id exists in the table
    UnknownDevice,
    /// The device's control register address could not be resolved
    NoAddress,
    /// Hardware did not acknowledge the requested state within the poll
    /// budget
    Timeout {
        /// Control register the transition was applied to
        addr: usize,
        /// The state that was requested
        target: PowerState,
        /// Register value observed when the budget ran out
        last: u32,
    },
    /// The parent chain exceeds any valid topology depth (likely a cycle)
    TooDeep,
}

impl core::fmt::Display for PmgrError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self {
            PmgrError::NotInitialized => write!(f, "power controller is not initialized"),
            PmgrError::NodeNotFound => write!(f, "node not found in the hardware description"),
            PmgrError::MissingProperty => write!(f, "required property absent or empty"),
            PmgrError::InvalidProperty => write!(f, "property length does not match its layout"),
            PmgrError::InvalidId => write!(f, "device id 0 is reserved"),
            PmgrError::UnknownDevice => write!(f, "no such device id"),
            PmgrError::NoAddress => write!(f, "device register address is unresolvable"),
            PmgrError::Timeout { addr, target, last } => write!(
                f,
                "timeout setting mode {:x} at {addr:#x} (last value {last:#010x})",
                target as u8
            ),
            PmgrError::TooDeep => write!(f, "parent chain too deep or cyclic"),
        }
    }
}

/// Convenience type alias for Result with PmgrError
pub type Result<T> = core::result::Result<T, PmgrError>;

/// Converts power-controller errors to generalized driver errors.
impl From<PmgrError> for DriverError {
    fn from(err: PmgrError) -> Self {
        use PmgrError::*;
        match err {
            NotInitialized => DriverError::BadState,
            NodeNotFound | InvalidId | UnknownDevice | TooDeep => DriverError::InvalidInput,
            MissingProperty | InvalidProperty => DriverError::Io,
            NoAddress => DriverError::Unsupported,
            Timeout { .. } => DriverError::Io,
        }
    }
}
