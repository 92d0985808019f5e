use embassy_nrf::gpio::OutputDrive;
use embassy_nrf::interrupt::{self, InterruptExt};
use embassy_nrf::peripherals::{P0_13, P0_14, P0_15, SPI3};
use embassy_nrf::{bind_interrupts, peripherals, spim, Peri};

use spi_slot::SpiPhy;

bind_interrupts!(struct SpimIrqs {
    SPIM3 => spim::InterruptHandler<peripherals::SPI3>;
});

/// SPIM-backed phy for the sensor bus.
///
/// Transfers run on the blocking primitive: the driver returns only once the
/// data phase has finished, so the peripheral is idle again between calls
/// and nothing is left for `acknowledge` to clear.
pub struct SpimPhy {
    spim: spim::Spim<'static>,
}

impl SpimPhy {
    pub fn new(
        spim: Peri<'static, SPI3>,
        sclk: Peri<'static, P0_13>,
        miso: Peri<'static, P0_15>,
        mosi: Peri<'static, P0_14>,
    ) -> Self {
        let mut config = spim::Config::default();
        config.mode = spim::MODE_0;
        config.frequency = spim::Frequency::M4;
        config.mosi_drive = OutputDrive::HighDrive;
        config.sck_drive = OutputDrive::HighDrive;
        interrupt::SPIM3.set_priority(interrupt::Priority::P3);

        Self {
            spim: spim::Spim::new(spim, SpimIrqs, sclk, miso, mosi, config),
        }
    }
}

impl SpiPhy for SpimPhy {
    type Error = spim::Error;

    fn transfer(
        &mut self,
        tx: &[u8],
        rx: &mut [u8],
    ) -> Result<(), spim::Error> {
        self.spim.blocking_transfer(rx, tx)
    }

    fn acknowledge(&mut self) {}

    fn is_idle(&self) -> bool {
        true
    }
}
