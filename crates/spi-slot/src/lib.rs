#![no_std]
//! Single-slot SPI transaction arbiter.
//!
//! One [`SpiSlot`] owns a bus peripheral and a fixed transmit/receive buffer
//! pair. A device claims the slot, fills the transmit window through the
//! returned handle, and the transfer is dispatched when the handle is
//! released. Completion (synchronous for a blocking dispatch, from the
//! peripheral's interrupt for an armed one) de-asserts chip-select, refreshes
//! the slot's readiness from the peripheral and hands the received bytes to
//! the device.

mod device;
mod phy;
mod slot;
mod transfer;

pub use device::SlotDevice;
pub use phy::{SpiPhy, SpiPhyIrq};
pub use slot::{SpiSlot, MAX_TRANSFER};
pub use transfer::{IrqTransfer, Transfer};
