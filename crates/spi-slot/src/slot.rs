use core::cell::{Cell, UnsafeCell};

use portable_atomic::{AtomicBool, Ordering};

use crate::device::SlotDevice;
use crate::phy::{SpiPhy, SpiPhyIrq};
use crate::transfer::{IrqTransfer, Transfer};

/// Largest transfer the slot's buffers can hold, in bytes.
pub const MAX_TRANSFER: usize = 16;

/// Single-slot owner of one bus peripheral.
///
/// Exactly one transaction may occupy the slot at a time. The claim is
/// guarded by a lock-free compare-and-swap because one of the contending
/// contexts is the peripheral's completion interrupt, which must never
/// block.
pub struct SpiSlot<P: SpiPhy> {
    phy: UnsafeCell<P>,
    /// True iff the slot is free for a new claim.
    ready: AtomicBool,
    /// Raised when a completion left the peripheral busy; tells the next
    /// claim attempt to re-observe the hardware before giving up.
    recheck: AtomicBool,
    /// Device bound to the in-flight transaction, if any.
    device: Cell<Option<&'static dyn SlotDevice>>,
    /// Agreed length of the in-flight transaction.
    len: Cell<usize>,
    tx_buf: UnsafeCell<[u8; MAX_TRANSFER]>,
    rx_buf: UnsafeCell<[u8; MAX_TRANSFER]>,
}

// SAFETY: Every cross-context transition goes through the `ready`/`recheck`
// atomics. The Cell and UnsafeCell fields are only touched by whichever
// context currently holds the claim (device, len, buffers, phy during
// dispatch and completion), or, for the idle probe in `try_acquire`, while
// `ready` is false and no completion is using the phy (`recheck` is raised
// strictly after the completing context is done with it). P: Send because
// the phy is handed between the claiming context and the completion
// interrupt.
unsafe impl<P: SpiPhy + Send> Sync for SpiSlot<P> {}

impl<P: SpiPhy> SpiSlot<P> {
    /// Take ownership of a configured peripheral. Initial readiness is
    /// sampled from the hardware rather than assumed.
    pub fn new(phy: P) -> Self {
        let idle = phy.is_idle();
        Self {
            phy: UnsafeCell::new(phy),
            ready: AtomicBool::new(idle),
            recheck: AtomicBool::new(!idle),
            device: Cell::new(None),
            len: Cell::new(0),
            tx_buf: UnsafeCell::new([0; MAX_TRANSFER]),
            rx_buf: UnsafeCell::new([0; MAX_TRANSFER]),
        }
    }

    /// Claim the slot for a transfer dispatched with the blocking primitive.
    ///
    /// Returns `None` without blocking when the slot is occupied; retry
    /// policy belongs to the caller. `len` larger than [`MAX_TRANSFER`] is a
    /// caller bug and panics.
    pub fn claim(
        &self,
        device: &'static dyn SlotDevice,
        len: usize,
    ) -> Option<Transfer<'_, P>> {
        self.try_acquire(device, len).then(|| Transfer::new(self))
    }

    /// Claim the slot for an interrupt-armed transfer. Completion must be
    /// routed from the peripheral's interrupt into [`Self::completion`].
    pub fn claim_irq(
        &self,
        device: &'static dyn SlotDevice,
        len: usize,
    ) -> Option<IrqTransfer<'_, P>>
    where
        P: SpiPhyIrq,
    {
        self.try_acquire(device, len).then(|| IrqTransfer::new(self))
    }

    /// Non-blocking observation of slot availability. Purely informational:
    /// the answer may be stale by the time the caller acts on it.
    pub fn ready(&self) -> bool {
        self.ready.load(Ordering::Relaxed)
    }

    /// Finish the in-flight transaction: de-assert chip-select, refresh
    /// readiness from the peripheral and hand the received bytes to the
    /// device.
    ///
    /// Invoked exactly once per transaction, either synchronously after a
    /// blocking dispatch or from the peripheral's completion interrupt for
    /// an armed one.
    pub fn completion(&self) {
        let Some(device) = self.device.get() else {
            #[cfg(feature = "defmt")]
            defmt::warn!("spi-slot: completion with no transaction in flight");
            return;
        };

        device.deselect();

        // SAFETY: The data phase is over and the claim is still held, so
        // this context has exclusive use of the phy and the receive buffer
        // until the flag stores below make the slot claimable again.
        let idle = unsafe {
            let phy = &mut *self.phy.get();
            phy.acknowledge();
            phy.is_idle()
        };

        let len = self.len.get();
        let mut rx = [0u8; MAX_TRANSFER];
        // SAFETY: Shared read of the receive buffer; no writer can exist
        // before the slot is released below.
        rx[..len].copy_from_slice(unsafe { &(&*self.rx_buf.get())[..len] });

        self.device.set(None);
        if idle {
            self.ready.store(true, Ordering::Release);
        } else {
            // Peripheral still busy; leave the slot unavailable and let the
            // next claim attempt re-observe it.
            self.recheck.store(true, Ordering::Release);
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("spi > {=[u8]:x}", &rx[..len]);

        device.on_transfer(&rx[..len]);
    }

    fn try_acquire(
        &self,
        device: &'static dyn SlotDevice,
        len: usize,
    ) -> bool {
        assert!(
            len <= MAX_TRANSFER,
            "transfer of {} bytes exceeds the {}-byte slot capacity",
            len,
            MAX_TRANSFER
        );

        if !self.ready.load(Ordering::Acquire)
            && self.recheck.swap(false, Ordering::AcqRel)
        {
            // The last completion found the peripheral busy; observe it
            // again now.
            // SAFETY: `recheck` is only raised once the completing context
            // is done with the phy, and no transaction can start while
            // `ready` is false, so this shared read cannot alias an
            // exclusive use.
            if unsafe { (*self.phy.get()).is_idle() } {
                self.ready.store(true, Ordering::Release);
            } else {
                self.recheck.store(true, Ordering::Release);
            }
        }

        if self
            .ready
            .compare_exchange(
                true,
                false,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
        {
            self.device.set(Some(device));
            self.len.set(len);
            true
        } else {
            false
        }
    }

    /// Exclusive view of the claimed transmit window.
    ///
    /// # Safety
    ///
    /// Caller must hold the slot's live claim and must not let the returned
    /// borrow overlap a dispatch.
    pub(crate) unsafe fn tx_window(&self) -> &mut [u8] {
        &mut (&mut *self.tx_buf.get())[..self.len.get()]
    }

    /// Shared view of the claimed transmit window.
    ///
    /// # Safety
    ///
    /// Caller must hold the slot's live claim.
    pub(crate) unsafe fn tx_window_ref(&self) -> &[u8] {
        &(&*self.tx_buf.get())[..self.len.get()]
    }

    /// Assert chip-select and run the blocking transfer, then complete the
    /// transaction synchronously. Called from handle release.
    pub(crate) fn dispatch_blocking(&self) {
        // A handle only exists after a claim recorded its device.
        let Some(device) = self.device.get() else { return };
        let len = self.len.get();

        device.select();

        // SAFETY: The handle being released is the slot's only claimant; no
        // other context touches the phy or the buffers until `completion`
        // frees the slot.
        let result = unsafe {
            let phy = &mut *self.phy.get();
            let tx = &(&*self.tx_buf.get())[..len];
            let rx = &mut (&mut *self.rx_buf.get())[..len];
            #[cfg(feature = "defmt")]
            defmt::trace!("spi < {=[u8]:x}", tx);
            phy.transfer(tx, rx)
        };
        if let Err(_e) = result {
            #[cfg(feature = "defmt")]
            defmt::error!(
                "spi transfer failed: {}",
                defmt::Debug2Format(&_e)
            );
        }

        self.completion();
    }

    /// Assert chip-select and arm the transfer; completion arrives later
    /// from the peripheral's interrupt. Called from handle release.
    pub(crate) fn dispatch_irq(&self)
    where
        P: SpiPhyIrq,
    {
        let Some(device) = self.device.get() else { return };
        let len = self.len.get();

        device.select();

        // SAFETY: The buffers live inside `self` and the claim stays held
        // until `completion` runs, so they remain valid and untouched while
        // the hardware owns them.
        let result = unsafe {
            let phy = &mut *self.phy.get();
            #[cfg(feature = "defmt")]
            defmt::trace!("spi < {=[u8]:x}", &(*self.tx_buf.get())[..len]);
            phy.start_transfer(
                (*self.tx_buf.get()).as_ptr(),
                (*self.rx_buf.get()).as_mut_ptr(),
                len,
            )
        };
        if let Err(_e) = result {
            #[cfg(feature = "defmt")]
            defmt::error!(
                "spi arm failed: {}",
                defmt::Debug2Format(&_e)
            );
            // No interrupt will fire for a transfer that never started;
            // complete now so the slot cannot leak.
            self.completion();
        }
    }
}
