#![no_std]
//! Minimal LIS2DW12 accelerometer driver speaking through the single-slot
//! SPI arbiter.
//!
//! The driver owns the sensor's chip-select pin and implements
//! [`SlotDevice`]: it frames register reads into a claimed transmit window
//! and decodes the response in the receive callback. The latest decoded
//! sample sits in a mailbox until the application takes it.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embedded_hal::digital::OutputPin;
use spi_slot::{SlotDevice, SpiPhy, SpiSlot};

/// Read bit of the SPI register protocol.
const READ: u8 = 0x80;

const WHO_AM_I: u8 = 0x0F;
const CTRL1: u8 = 0x20;
const OUT_X_L: u8 = 0x28;

/// Factory identification value of the WHO_AM_I register.
const DEVICE_ID: u8 = 0x44;

/// High-performance mode bits of CTRL1 (MODE = 01, LP_MODE = 00).
const HIGH_PERFORMANCE: u8 = 0b0100;

/// Sensitivity of the ±2 g range in high-performance (14-bit) mode,
/// µg per digit.
const SENSITIVITY_UG: i32 = 244;

/// Output data rate field of CTRL1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputDataRate {
    PowerDown = 0b0000,
    Hz12_5 = 0b0010,
    Hz25 = 0b0011,
    Hz50 = 0b0100,
    Hz100 = 0b0101,
    Hz200 = 0b0110,
}

/// One decoded acceleration sample, in milli-g per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelSample {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// WHO_AM_I returned an unexpected value.
    InvalidWhoAmI(u8),
    /// No response has been clocked in yet.
    NoResponse,
    /// The transaction slot was occupied; try again next cycle.
    SlotBusy,
}

/// Outstanding request, used to route the receive callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Request {
    None,
    WhoAmI,
    Axes,
    Control,
}

struct Shared<CS> {
    cs: CS,
    pending: Request,
    sample: Option<AccelSample>,
    ident: Option<u8>,
}

pub struct Lis2dw12<CS: OutputPin> {
    state: Mutex<CriticalSectionRawMutex, RefCell<Shared<CS>>>,
}

impl<CS: OutputPin + 'static> Lis2dw12<CS> {
    /// Take ownership of the sensor's chip-select pin. The pin must already
    /// be configured as a high (inactive) output.
    pub fn new(cs: CS) -> Self {
        Self {
            state: Mutex::new(RefCell::new(Shared {
                cs,
                pending: Request::None,
                sample: None,
                ident: None,
            })),
        }
    }

    /// Check the sensor's WHO_AM_I register.
    ///
    /// Expects a synchronously completing dispatch: the identity has been
    /// clocked in by the time the claim is released.
    pub fn probe<P: SpiPhy>(
        &'static self,
        slot: &SpiSlot<P>,
    ) -> Result<(), Error> {
        let mut transfer = slot.claim(self, 2).ok_or(Error::SlotBusy)?;
        self.set_pending(Request::WhoAmI);
        transfer.tx_buffer().copy_from_slice(&[READ | WHO_AM_I, 0]);
        transfer.submit();

        match self.state.lock(|s| s.borrow().ident) {
            Some(DEVICE_ID) => Ok(()),
            Some(other) => Err(Error::InvalidWhoAmI(other)),
            None => Err(Error::NoResponse),
        }
    }

    /// Program the output data rate in high-performance mode.
    pub fn configure<P: SpiPhy>(
        &'static self,
        slot: &SpiSlot<P>,
        odr: OutputDataRate,
    ) -> Result<(), Error> {
        let mut transfer = slot.claim(self, 2).ok_or(Error::SlotBusy)?;
        self.set_pending(Request::Control);
        transfer
            .tx_buffer()
            .copy_from_slice(&[CTRL1, (odr as u8) << 4 | HIGH_PERFORMANCE]);
        transfer.submit();
        Ok(())
    }

    /// Frame an auto-incrementing read of OUT_X_L..OUT_Z_H.
    ///
    /// Returns `false` when the slot is occupied; the caller skips this
    /// cycle and retries on the next one.
    pub fn request_axes<P: SpiPhy>(&'static self, slot: &SpiSlot<P>) -> bool {
        let Some(mut transfer) = slot.claim(self, 1 + 6) else {
            return false;
        };
        self.set_pending(Request::Axes);
        let tx = transfer.tx_buffer();
        tx[0] = READ | OUT_X_L;
        tx[1..].fill(0);
        transfer.submit();
        true
    }

    /// Latest decoded sample, cleared on read.
    pub fn take_sample(&self) -> Option<AccelSample> {
        self.state.lock(|s| s.borrow_mut().sample.take())
    }

    fn set_pending(&self, request: Request) {
        self.state.lock(|s| s.borrow_mut().pending = request);
    }
}

impl<CS: OutputPin> SlotDevice for Lis2dw12<CS> {
    fn select(&self) {
        self.state.lock(|s| s.borrow_mut().cs.set_low().unwrap());
    }

    fn deselect(&self) {
        self.state.lock(|s| s.borrow_mut().cs.set_high().unwrap());
    }

    fn on_transfer(&self, rx: &[u8]) {
        self.state.lock(|s| {
            let mut s = s.borrow_mut();
            match s.pending {
                Request::WhoAmI if rx.len() == 2 => {
                    s.ident = Some(rx[1]);
                }
                Request::Axes if rx.len() == 7 => {
                    s.sample = Some(decode_axes(&rx[1..]));
                }
                _ => {}
            }
            s.pending = Request::None;
        });
    }
}

/// Decode three little-endian, left-justified 14-bit axes into milli-g.
fn decode_axes(raw: &[u8]) -> AccelSample {
    let axis = |lo: u8, hi: u8| -> i16 {
        let word = i16::from_le_bytes([lo, hi]);
        ((i32::from(word) >> 2) * SENSITIVITY_UG / 1000) as i16
    };
    AccelSample {
        x: axis(raw[0], raw[1]),
        y: axis(raw[2], raw[3]),
        z: axis(raw[4], raw[5]),
    }
}
