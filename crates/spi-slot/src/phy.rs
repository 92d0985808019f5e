use core::fmt::Debug;

/// Bus peripheral abstraction consumed by [`SpiSlot`](crate::SpiSlot).
pub trait SpiPhy {
    /// Error type for transfer failures.
    type Error: Debug;

    /// Full-duplex transfer that returns once the data phase has completed.
    ///
    /// Waits on the hardware without a timeout; `tx` and `rx` have the same
    /// length.
    fn transfer(&mut self, tx: &[u8], rx: &mut [u8])
        -> Result<(), Self::Error>;

    /// Clear the peripheral's completion event / interrupt source.
    ///
    /// Called once per transaction before readiness is re-sampled, in both
    /// dispatch modes. A no-op for peripherals whose driver already manages
    /// its events.
    fn acknowledge(&mut self);

    /// Whether the peripheral can accept a new transfer.
    fn is_idle(&self) -> bool;
}

/// Peripherals that can arm a transfer and signal completion through an
/// interrupt.
pub trait SpiPhyIrq: SpiPhy {
    /// Arm a full-duplex transfer and return immediately. The peripheral's
    /// completion interrupt fires once the data phase ends; the interrupt
    /// handler is responsible for routing it into
    /// [`SpiSlot::completion`](crate::SpiSlot::completion).
    ///
    /// # Safety
    ///
    /// `tx` and `rx` must each point to `len` bytes that stay valid, and are
    /// not read or written by software, until the completion interrupt has
    /// fired.
    unsafe fn start_transfer(
        &mut self,
        tx: *const u8,
        rx: *mut u8,
        len: usize,
    ) -> Result<(), Self::Error>;
}
