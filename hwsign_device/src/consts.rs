use std::time::Duration;

pub const TIMEOUT: Duration = Duration::from_secs(90);
pub const BAUD_RATE: u32 = 115_200;

/// USB (vid, pid) pairs of the serial bridges mounted on supported devices.
pub const DEVICE_IDS: [(u16, u16); 2] = [(0x10c4, 0xea60), (0x1a86, 0x55d4)];
