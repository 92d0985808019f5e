#![no_std]

mod fmt;
pub mod tasks;

pub mod prelude {
    pub use crate::tasks::*;
    pub use crate::{error, info, trace, unwrap, warn};

    pub use embassy_executor::Spawner;
    pub use embassy_time::{Duration, Timer};
}
