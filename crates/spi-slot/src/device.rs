/// Capability set required of a device attached to the slot.
///
/// Methods take `&self` because the completion path may run in interrupt
/// context; implementations keep their chip-select pin and decode state
/// behind interior mutability.
pub trait SlotDevice {
    /// Drive this device's chip-select line low, framing the start of a
    /// transaction.
    fn select(&self);

    /// Drive this device's chip-select line high, framing the end of the
    /// data phase.
    fn deselect(&self);

    /// Receive callback, invoked exactly once per completed transaction with
    /// the bytes clocked in during the transfer.
    ///
    /// The slice is only valid for the duration of the call; copy out
    /// anything needed beyond it.
    fn on_transfer(&self, rx: &[u8]);
}
