use embassy_nrf::gpio::{Level, Output, OutputDrive};
use embassy_nrf::interrupt::Priority;
use embassy_nrf::peripherals::{
    P0_06, P0_08, P0_13, P0_14, P0_15, P0_16, P0_17, RNG, SPI3, WDT,
};
use embassy_nrf::Peri;

use lis2dw12::Lis2dw12;

use crate::phy::SpimPhy;

/// SPI bus pins and instance for the sensor bus.
pub struct SpiBusResources {
    pub spim: Peri<'static, SPI3>,
    pub sclk: Peri<'static, P0_13>,
    pub mosi: Peri<'static, P0_14>,
    pub miso: Peri<'static, P0_15>,
}

impl SpiBusResources {
    /// Configure the SPI peripheral behind the slot arbiter's phy contract.
    pub fn configure(self) -> SpimPhy {
        SpimPhy::new(self.spim, self.sclk, self.miso, self.mosi)
    }
}

/// Accelerometer front-end pins.
pub struct AccelResources {
    pub cs: Peri<'static, P0_16>,
    /// Data-ready line, routed but unused while the node polls.
    pub int1: Peri<'static, P0_17>,
}

impl AccelResources {
    /// Build the accelerometer driver over its chip-select pin.
    pub fn configure(self) -> Lis2dw12<Output<'static>> {
        let cs = Output::new(self.cs, Level::High, OutputDrive::Standard);
        Lis2dw12::new(cs)
    }
}

/// Status and power LED pins.
pub struct LedResources {
    /// Toggled on the status period.
    pub green: Peri<'static, P0_06>,
    /// Driven high for the life of the node.
    pub blue: Peri<'static, P0_08>,
}

/// Represents the peripherals and pins available on the axl-node board.
pub struct AxlNode {
    /// LED pins.
    pub leds: LedResources,
    /// Peripherals for the sensor SPI bus.
    pub spi_bus_resources: SpiBusResources,
    /// Peripherals for the accelerometer.
    pub accel_resources: AccelResources,
    /// Watchdog Timer.
    pub wdt: Peri<'static, WDT>,
    /// Random Number Generator.
    pub rng: Peri<'static, RNG>,
}

impl Default for AxlNode {
    fn default() -> Self {
        let mut config = embassy_nrf::config::Config::default();
        config.gpiote_interrupt_priority = Priority::P2;
        config.time_interrupt_priority = Priority::P2;
        Self::new(config)
    }
}

impl AxlNode {
    /// Create a new instance based on HAL configuration
    pub fn new(config: embassy_nrf::config::Config) -> Self {
        let p = embassy_nrf::init(config);

        Self {
            leds: LedResources { green: p.P0_06, blue: p.P0_08 },
            spi_bus_resources: SpiBusResources {
                spim: p.SPI3,
                sclk: p.P0_13,
                mosi: p.P0_14,
                miso: p.P0_15,
            },
            accel_resources: AccelResources { cs: p.P0_16, int1: p.P0_17 },
            wdt: p.WDT,
            rng: p.RNG,
        }
    }
}
