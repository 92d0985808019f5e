use embassy_nrf::gpio::{AnyPin, Level, Output, OutputDrive};
use embassy_nrf::Peri;
use embassy_time::Timer;

/// Fixed blink period of the status LED.
const BLINK_PERIOD_MS: u64 = 500;

#[embassy_executor::task]
pub async fn status_led_task(
    green: Peri<'static, AnyPin>,
    blue: Peri<'static, AnyPin>,
) {
    // Power LED stays lit for the life of the node.
    let _blue = Output::new(blue, Level::High, OutputDrive::Standard);

    let mut green = Output::new(green, Level::Low, OutputDrive::Standard);
    loop {
        Timer::after_millis(BLINK_PERIOD_MS).await;
        green.toggle();
    }
}
