use axl_node_bsp::SpimPhy;
use embassy_nrf::gpio::Output;
use embassy_time::Timer;
use lis2dw12::Lis2dw12;
use spi_slot::SpiSlot;

use crate::info;

/// Poll cadence of the accelerometer.
const POLL_PERIOD_MS: u64 = 500;

#[embassy_executor::task]
pub async fn accel_task(
    slot: &'static SpiSlot<SpimPhy>,
    accel: &'static Lis2dw12<Output<'static>>,
) {
    loop {
        Timer::after_millis(POLL_PERIOD_MS).await;

        if !accel.request_axes(slot) {
            // Slot occupied this cycle; try again on the next tick.
            continue;
        }

        if let Some(sample) = accel.take_sample() {
            info!(
                "accel x={} y={} z={} mg",
                sample.x, sample.y, sample.z
            );
        }
    }
}
