use std::collections::VecDeque;
use std::convert::Infallible;
use std::sync::{Arc, Mutex};

use lis2dw12::{AccelSample, Error, Lis2dw12, OutputDataRate};
use spi_slot::{SpiPhy, SpiSlot};

// ---------------------------------------------------------------------------
// Mock bus
// ---------------------------------------------------------------------------

/// Scripted peripheral: each transfer logs the transmitted frame and clocks
/// in the next queued response.
#[derive(Clone)]
struct BusProbe {
    frames: Arc<Mutex<Vec<Vec<u8>>>>,
    responses: Arc<Mutex<VecDeque<Vec<u8>>>>,
}

impl BusProbe {
    fn new(responses: &[&[u8]]) -> Self {
        Self {
            frames: Arc::new(Mutex::new(Vec::new())),
            responses: Arc::new(Mutex::new(
                responses.iter().map(|r| r.to_vec()).collect(),
            )),
        }
    }

    fn frames(&self) -> Vec<Vec<u8>> {
        self.frames.lock().unwrap().clone()
    }
}

struct ScriptedPhy {
    probe: BusProbe,
}

impl SpiPhy for ScriptedPhy {
    type Error = Infallible;

    fn transfer(
        &mut self,
        tx: &[u8],
        rx: &mut [u8],
    ) -> Result<(), Infallible> {
        self.probe.frames.lock().unwrap().push(tx.to_vec());
        if let Some(response) = self.probe.responses.lock().unwrap().pop_front()
        {
            for (dst, src) in rx.iter_mut().zip(&response) {
                *dst = *src;
            }
        }
        Ok(())
    }

    fn acknowledge(&mut self) {}

    fn is_idle(&self) -> bool {
        true
    }
}

// ---------------------------------------------------------------------------
// Mock chip-select pin
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct PinProbe {
    levels: Arc<Mutex<Vec<bool>>>,
}

struct MockPin {
    probe: PinProbe,
}

impl embedded_hal::digital::ErrorType for MockPin {
    type Error = Infallible;
}

impl embedded_hal::digital::OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.probe.levels.lock().unwrap().push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.probe.levels.lock().unwrap().push(true);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_fixture(
    responses: &[&[u8]],
) -> (&'static Lis2dw12<MockPin>, SpiSlot<ScriptedPhy>, BusProbe, PinProbe) {
    let bus = BusProbe::new(responses);
    let pin = PinProbe { levels: Arc::new(Mutex::new(Vec::new())) };
    let slot = SpiSlot::new(ScriptedPhy { probe: bus.clone() });
    let accel = Box::leak(Box::new(Lis2dw12::new(MockPin {
        probe: pin.clone(),
    })));
    (accel, slot, bus, pin)
}

// ---------------------------------------------------------------------------
// Identification and configuration
// ---------------------------------------------------------------------------

#[test]
fn probe_accepts_factory_identity() {
    let (accel, slot, bus, _pin) = make_fixture(&[&[0x00, 0x44]]);

    assert_eq!(accel.probe(&slot), Ok(()));
    // Read of WHO_AM_I (0x0F) with the read bit set, one dummy byte.
    assert_eq!(bus.frames(), vec![vec![0x8F, 0x00]]);
}

#[test]
fn probe_rejects_unknown_identity() {
    let (accel, slot, _bus, _pin) = make_fixture(&[&[0x00, 0x33]]);

    assert_eq!(accel.probe(&slot), Err(Error::InvalidWhoAmI(0x33)));
}

#[test]
fn configure_programs_ctrl1() {
    let (accel, slot, bus, _pin) = make_fixture(&[&[0x00, 0x00]]);

    accel.configure(&slot, OutputDataRate::Hz100).unwrap();
    // CTRL1 = ODR 100 Hz in high-performance mode.
    assert_eq!(bus.frames(), vec![vec![0x20, 0x54]]);
}

// ---------------------------------------------------------------------------
// Sample acquisition
// ---------------------------------------------------------------------------

#[test]
fn request_axes_frames_autoincrement_read() {
    let (accel, slot, bus, _pin) =
        make_fixture(&[&[0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]]);

    assert!(accel.request_axes(&slot));
    // OUT_X_L (0x28) with the read bit, six dummy bytes for the data.
    assert_eq!(
        bus.frames(),
        vec![vec![0xA8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]]
    );
}

#[test]
fn sample_decodes_to_milli_g() {
    // +1 g on X (0x4000 left-justified), -1 g on Y, flat Z.
    let (accel, slot, _bus, _pin) = make_fixture(&[&[
        0x00, 0x00, 0x40, 0x00, 0xC0, 0x00, 0x00,
    ]]);

    assert!(accel.request_axes(&slot));
    assert_eq!(
        accel.take_sample(),
        Some(AccelSample { x: 999, y: -999, z: 0 })
    );
}

#[test]
fn take_sample_clears_the_mailbox() {
    let (accel, slot, _bus, _pin) = make_fixture(&[&[
        0x00, 0x00, 0x40, 0x00, 0x40, 0x00, 0x40,
    ]]);

    assert!(accel.request_axes(&slot));
    assert!(accel.take_sample().is_some());
    assert!(accel.take_sample().is_none());
}

#[test]
fn occupied_slot_skips_the_cycle() {
    let (accel, slot, bus, _pin) = make_fixture(&[]);

    // Another request holds the slot across this cycle.
    let held = slot.claim(accel, 1).unwrap();
    assert!(!accel.request_axes(&slot));
    assert!(bus.frames().is_empty());
    drop(held);

    assert!(accel.request_axes(&slot));
}

#[test]
fn chip_select_brackets_every_transfer() {
    let (accel, slot, _bus, pin) = make_fixture(&[&[0x00, 0x44]]);

    accel.probe(&slot).unwrap();
    // Asserted low for the data phase, released high afterwards.
    assert_eq!(pin.levels.lock().unwrap().clone(), vec![false, true]);
}
