#![no_std]
//! Board support for the axl-node: pin mapping, peripheral split and the
//! SPI phy driving the accelerometer front-end.

mod board;
mod phy;

pub use board::*;
pub use phy::SpimPhy;
