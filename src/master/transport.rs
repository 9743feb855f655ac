use std::{
    fmt,
    io,
    path::Path,
    string::String,
    vec::Vec,
    time::{Duration, Instant},
    };
use serial2::SerialPort;
use log::*;

use super::{Port, Config, Error, Result, port};


/// target of the log records produced by sniffing
pub const SNIFF_TARGET: &str = "axi_uart::sniff";
/// longest line accepted by [SerialTransport::get_line], line feed excluded
pub const MAX_LINE: usize = 1024;

/**
    how long a read may wait for its bytes

    reads are never bounded by a magic number: waiting forever, waiting as configured and waiting a given time are distinct cases.
*/
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Timeout {
    /// use the transport's default read timeout
    #[default]
    Default,
    /// block until all requested bytes arrived
    Never,
    /// give up after the given time
    After(Duration),
}
impl Timeout {
    pub const fn millis(milliseconds: u64) -> Self {
        Self::After(Duration::from_millis(milliseconds))
    }
    /// maximum waiting time, `None` meaning forever
    pub fn resolve(self, default: Option<Duration>) -> Option<Duration> {
        match self {
            Self::Default => default,
            Self::Never => None,
            Self::After(duration) => Some(duration),
        }
    }
}
impl From<Duration> for Timeout {
    fn from(duration: Duration) -> Self {
        Self::After(duration)
    }
}
impl From<Option<Duration>> for Timeout {
    fn from(duration: Option<Duration>) -> Self {
        duration.map_or(Self::Never, Self::After)
    }
}


/**
    blocking, timeout-bounded byte I/O over one serial device

    The transport exclusively owns its port, there is no internal locking: one transport is used by one thread at a time.
    Reads accumulate bytes until the requested count is reached, a read that cannot complete in time fails with [Error::Timeout] and the bytes it received are lost.
*/
pub struct SerialTransport<P = SerialPort> {
    /// `None` once closed
    port: Option<P>,
    /// timeout applied by reads using [Timeout::Default], `None` waits forever
    default_timeout: Option<Duration>,
    /// echo all received bytes to the log
    sniff: bool,
}

impl SerialTransport<SerialPort> {
    /// open the given serial device in raw mode, reads wait forever by default
    pub fn open(path: impl AsRef<Path>, rate: u32) -> Result<Self> {
        Self::open_with(path, &Config::with_baud_rate(rate))
    }
    pub fn open_with(path: impl AsRef<Path>, config: &Config) -> Result<Self> {
        let path = path.as_ref();
        let port = port::open(path, config.baud_rate)
            .map_err(|source| Error::Open {path: path.display().to_string(), source})?;
        debug!("opened {} at {} bauds", path.display(), config.baud_rate);
        let mut transport = Self::from_port(port);
        transport.set_default_read_timeout(config.read_timeout);
        Ok(transport)
    }
}

impl<P: Port> SerialTransport<P> {
    /// wrap an already opened port
    pub fn from_port(port: P) -> Self {
        Self {
            port: Some(port),
            default_timeout: None,
            sniff: false,
        }
    }

    pub fn set_default_read_timeout(&mut self, timeout: Option<Duration>) {
        self.default_timeout = timeout;
    }
    pub fn default_read_timeout(&self) -> Option<Duration> {
        self.default_timeout
    }
    /// when enabled, every byte read is echoed as hex to the log target [SNIFF_TARGET]
    pub fn enable_sniffing(&mut self, flag: bool) {
        self.sniff = flag;
    }

    pub fn is_open(&self) -> bool {
        self.port.is_some()
    }
    /// release the device, does nothing if already closed
    pub fn close(&mut self) {
        if self.port.take().is_some() {
            debug!("closed serial port");
        }
    }

    /// read exactly `buffer.len()` bytes
    pub fn read(&mut self, buffer: &mut [u8], timeout: Timeout) -> Result<()> {
        let deadline = self.deadline(timeout);
        self.fill(buffer, deadline)
    }
    /// write all bytes, blocking until the device accepted them
    pub fn write(&mut self, buffer: &[u8]) -> Result<()> {
        trace!("send {:02x?}", buffer);
        self.port()?.write_all(buffer)?;
        Ok(())
    }

    /**
        discard incoming bytes during the given window

        never waits longer than the window, returns the number of discarded bytes
    */
    pub fn drain_input(&mut self, window: Duration) -> Result<usize> {
        let deadline = Instant::now().checked_add(window);
        let mut buffer = [0u8; 64];
        let mut discarded = 0;
        loop {
            // a window too long to be represented is simply never reached
            let remaining = match deadline {
                Some(deadline) => deadline.saturating_duration_since(Instant::now()),
                None => window,
            };
            if remaining.is_zero() {break}
            let received = self.receive(&mut buffer, Some(remaining))?;
            if received == 0 {break}
            discarded += received;
        }
        if discarded != 0 {
            debug!("drained {} bytes", discarded);
        }
        Ok(discarded)
    }

    pub fn get_char(&mut self, timeout: Timeout) -> Result<u8> {
        let mut byte = [0];
        self.read(&mut byte, timeout)?;
        Ok(byte[0])
    }
    pub fn put_char(&mut self, byte: u8) -> Result<()> {
        self.write(&[byte])
    }

    /**
        receive a line of text, without its trailing carriage returns and line feed

        the timeout bounds the whole line, the line is lost if no line feed arrived in time or if it exceeds [MAX_LINE] bytes
    */
    pub fn get_line(&mut self, timeout: Timeout) -> Result<String> {
        let deadline = self.deadline(timeout);
        let mut line = Vec::new();
        loop {
            let mut byte = [0];
            self.fill(&mut byte, deadline)?;
            if byte[0] == b'\n' {break}
            if line.len() == MAX_LINE
                {return Err(Error::LineTooLong(MAX_LINE))}
            line.push(byte[0]);
        }
        while line.last() == Some(&b'\r') {
            line.pop();
        }
        Ok(String::from_utf8_lossy(&line).into_owned())
    }
    /// send a line of text as is, the caller appends carriage return or line feed if needed
    pub fn put_line(&mut self, line: &str) -> Result<()> {
        self.write(line.as_bytes())
    }
    /// send formatted text, as produced by [format_args]
    pub fn put_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<()> {
        match args.as_str() {
            Some(text) => self.put_line(text),
            None => self.put_line(&fmt::format(args)),
        }
    }

    fn port(&mut self) -> Result<&mut P> {
        self.port.as_mut().ok_or(Error::Closed)
    }
    /// `None` waits forever, as do timeouts too long to be represented
    fn deadline(&self, timeout: Timeout) -> Option<Instant> {
        timeout.resolve(self.default_timeout)
            .and_then(|timeout| Instant::now().checked_add(timeout))
    }
    /// accumulate bytes until the buffer is full or the deadline passed
    fn fill(&mut self, buffer: &mut [u8], deadline: Option<Instant>) -> Result<()> {
        let mut filled = 0;
        while filled < buffer.len() {
            let wait = deadline.map(|deadline| deadline.saturating_duration_since(Instant::now()));
            let received = self.receive(&mut buffer[filled ..], wait)?;
            if received == 0 {
                match deadline {
                    Some(deadline) if Instant::now() < deadline => continue,
                    Some(_) => {
                        debug!("timeout after receiving {} of {} bytes", filled, buffer.len());
                        return Err(Error::Timeout);
                    },
                    // a port waiting forever only comes back empty handed when the device is gone
                    None => return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into()),
                }
            }
            filled += received;
        }
        Ok(())
    }
    /// single read on the port
    fn receive(&mut self, buffer: &mut [u8], timeout: Option<Duration>) -> Result<usize> {
        let sniff = self.sniff;
        let received = self.port()?.read(buffer, timeout)?;
        if received != 0 {
            let data = &buffer[.. received];
            trace!("receive {:02x?}", data);
            if sniff {
                info!(target: SNIFF_TARGET, "{:02x?}", data);
            }
        }
        Ok(received)
    }
}
