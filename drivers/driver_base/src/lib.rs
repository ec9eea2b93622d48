// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Common interfaces for all kinds of device drivers.

#![no_std]

/// All supported device kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    /// Block storage device.
    Block,
    /// Network interface card.
    Net,
    /// Graphic display device.
    Display,
    /// Input device.
    Input,
    /// Clock/power domain controller.
    Power,
}

/// The error type for driver operation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    /// The entity already exists.
    AlreadyExists,
    /// The driver is in a state unfit for this operation.
    BadState,
    /// Invalid parameter or argument.
    InvalidInput,
    /// Input/output error.
    Io,
    /// Memory allocation failed.
    NoMemory,
    /// The underlying resource is busy.
    ResourceBusy,
    /// The operation is unsupported by this device.
    Unsupported,
    /// The operation would block, try again later.
    WouldBlock,
}

impl core::fmt::Display for DriverError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DriverError::AlreadyExists => write!(f, "entity already exists"),
            DriverError::BadState => write!(f, "bad driver state"),
            DriverError::InvalidInput => write!(f, "invalid parameter"),
            DriverError::Io => write!(f, "input/output error"),
            DriverError::NoMemory => write!(f, "memory allocation failed"),
            DriverError::ResourceBusy => write!(f, "resource busy"),
            DriverError::Unsupported => write!(f, "operation unsupported"),
            DriverError::WouldBlock => write!(f, "operation would block"),
        }
    }
}

/// A specialized `Result` type for driver operations.
pub type DriverResult<T = ()> = core::result::Result<T, DriverError>;

/// Operations that all device drivers must implement.
pub trait DriverOps {
    /// The kind of this device.
    fn device_kind(&self) -> DeviceKind;

    /// The name of this driver.
    fn name(&self) -> &str;
}
