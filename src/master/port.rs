use std::{
    io,
    path::Path,
    time::Duration,
    };
use serial2::{SerialPort, CharSize, StopBits, Parity, FlowControl};


/// longest single wait on the device when reading without timeout, the wait is simply restarted afterwards
const POLL_PERIOD: Duration = Duration::from_secs(1);

/**
    raw byte device the transport is talking through

    this is the seam between the protocol and the hardware: [SerialTransport](super::SerialTransport) only relies on these two primitives, so it can run on any device or on an in-memory fake.
*/
pub trait Port {
    /**
        read the bytes available, blocking until at least one byte is available or the timeout elapses

        - `timeout = None` blocks until data arrives
        - returns `Ok(0)` when nothing arrived in time
    */
    fn read(&mut self, buffer: &mut [u8], timeout: Option<Duration>) -> io::Result<usize>;
    /// write all bytes in the buffer, blocking until the device accepted them
    fn write_all(&mut self, buffer: &[u8]) -> io::Result<()>;
}

/// open and configure a serial device for raw binary transfer
pub(crate) fn open(path: impl AsRef<Path>, rate: u32) -> io::Result<SerialPort> {
    SerialPort::open(path, |mut settings: serial2::Settings| {
        settings.set_raw();
        settings.set_baud_rate(rate)?;
        settings.set_char_size(CharSize::Bits8);
        settings.set_stop_bits(StopBits::One);
        settings.set_parity(Parity::None);
        settings.set_flow_control(FlowControl::None);
        Ok(settings)
        })
}

impl Port for SerialPort {
    fn read(&mut self, buffer: &mut [u8], timeout: Option<Duration>) -> io::Result<usize> {
        loop {
            self.set_read_timeout(timeout.unwrap_or(POLL_PERIOD))?;
            match SerialPort::read(self, buffer) {
                Err(error) if error.kind() == io::ErrorKind::TimedOut => {
                    if timeout.is_some() {return Ok(0)}
                },
                Err(error) if error.kind() == io::ErrorKind::Interrupted => {},
                result => return result,
            }
        }
    }
    fn write_all(&mut self, buffer: &[u8]) -> io::Result<()> {
        SerialPort::write_all(self, buffer)?;
        SerialPort::flush(self)
    }
}
