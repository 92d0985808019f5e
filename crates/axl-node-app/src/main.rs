#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_nrf::gpio::Output;
use static_cell::StaticCell;

#[cfg(feature = "defmt")]
use defmt_rtt as _;
#[cfg(feature = "defmt")]
use panic_probe as _;
#[cfg(not(feature = "defmt"))]
use panic_reset as _;

use axl_node_app::prelude::*;
use axl_node_bsp::{AxlNode, SpimPhy};
use lis2dw12::{Lis2dw12, OutputDataRate};
use spi_slot::SpiSlot;

static SPI_SLOT: StaticCell<SpiSlot<SpimPhy>> = StaticCell::new();
static ACCEL: StaticCell<Lis2dw12<Output<'static>>> = StaticCell::new();

// Application main entry point. The spawner can be used to start async tasks.
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("axl-node boot");

    // First we initialize our board.
    let board = AxlNode::default();

    let phy = board.spi_bus_resources.configure();
    let slot: &'static SpiSlot<SpimPhy> = SPI_SLOT.init(SpiSlot::new(phy));
    let accel: &'static Lis2dw12<Output<'static>> =
        ACCEL.init(board.accel_resources.configure());

    match accel.probe(slot) {
        Ok(()) => info!("LIS2DW12 present"),
        Err(e) => warn!("accelerometer probe failed: {:?}", e),
    }
    if let Err(e) = accel.configure(slot, OutputDataRate::Hz100) {
        warn!("accelerometer configuration failed: {:?}", e);
    }

    spawner.must_spawn(status_led_task(
        board.leds.green.into(),
        board.leds.blue.into(),
    ));
    spawner.must_spawn(accel_task(slot, accel));
}
