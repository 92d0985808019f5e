use core::ops::{Deref, DerefMut};

use crate::phy::{SpiPhy, SpiPhyIrq};
use crate::slot::SpiSlot;

/// Scoped handle to a claimed slot, dispatched with the blocking primitive.
///
/// The transmit window is the handle's only public surface: write the
/// outgoing bytes through [`tx_buffer`](Self::tx_buffer) (or the `DerefMut`
/// sugar), then release the handle. Release on any exit path triggers
/// exactly one hardware dispatch; [`submit`](Self::submit) is the explicit
/// spelling of the same thing. The handle is move-only, so the dispatch
/// cannot run twice.
pub struct Transfer<'a, P: SpiPhy> {
    slot: &'a SpiSlot<P>,
}

impl<'a, P: SpiPhy> Transfer<'a, P> {
    /// Only called by `SpiSlot` after a successful claim.
    pub(crate) fn new(slot: &'a SpiSlot<P>) -> Self {
        Self { slot }
    }

    /// The transmit window for the claimed transfer length.
    pub fn tx_buffer(&mut self) -> &mut [u8] {
        // SAFETY: A live handle is the slot's claim; the window cannot be
        // observed by another context until this handle is released.
        unsafe { self.slot.tx_window() }
    }

    /// Dispatch the transfer now instead of at end of scope.
    pub fn submit(self) {}
}

impl<P: SpiPhy> Deref for Transfer<'_, P> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        // SAFETY: As in `tx_buffer`; shared read only.
        unsafe { self.slot.tx_window_ref() }
    }
}

impl<P: SpiPhy> DerefMut for Transfer<'_, P> {
    fn deref_mut(&mut self) -> &mut [u8] {
        unsafe { self.slot.tx_window() }
    }
}

impl<P: SpiPhy> Drop for Transfer<'_, P> {
    fn drop(&mut self) {
        self.slot.dispatch_blocking();
    }
}

/// Scoped handle to a claimed slot, armed on release; completion is signaled
/// by the peripheral's interrupt.
///
/// Identical surface to [`Transfer`], but the releasing scope regains
/// control immediately after arming and the slot stays occupied until the
/// interrupt routes into [`SpiSlot::completion`].
pub struct IrqTransfer<'a, P: SpiPhyIrq> {
    slot: &'a SpiSlot<P>,
}

impl<'a, P: SpiPhyIrq> IrqTransfer<'a, P> {
    pub(crate) fn new(slot: &'a SpiSlot<P>) -> Self {
        Self { slot }
    }

    /// The transmit window for the claimed transfer length.
    pub fn tx_buffer(&mut self) -> &mut [u8] {
        // SAFETY: As in `Transfer::tx_buffer`.
        unsafe { self.slot.tx_window() }
    }

    /// Arm the transfer now instead of at end of scope.
    pub fn submit(self) {}
}

impl<P: SpiPhyIrq> Deref for IrqTransfer<'_, P> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        unsafe { self.slot.tx_window_ref() }
    }
}

impl<P: SpiPhyIrq> DerefMut for IrqTransfer<'_, P> {
    fn deref_mut(&mut self) -> &mut [u8] {
        unsafe { self.slot.tx_window() }
    }
}

impl<P: SpiPhyIrq> Drop for IrqTransfer<'_, P> {
    fn drop(&mut self) {
        self.slot.dispatch_irq();
    }
}
