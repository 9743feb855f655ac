use std::time::Duration;


/// default baud rate of the FPGA UART
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// settings for opening a connection
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// line speed in bits per second
    pub baud_rate: u32,
    /// timeout used by transport reads not given one explicitly, `None` waits forever
    pub read_timeout: Option<Duration>,
    /// time for the device's input buffer to time out after receiving the reset marker
    pub reset_settle: Duration,
    /// window during which garbage is discarded at the end of a reset
    pub reset_drain: Duration,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: None,
            reset_settle: Duration::from_millis(150),
            reset_drain: Duration::from_millis(100),
        }
    }
}
impl Config {
    pub fn with_baud_rate(baud_rate: u32) -> Self {
        Self {baud_rate, .. Default::default()}
    }
}
