/*!
    host side of the AXI-over-UART bridge, in a `std` environment

    The central resource is the [Master] struct which performs register transactions. It is built on a [SerialTransport] which owns the serial device and implements blocking, timeout-bounded byte I/O on it.

    - register access is blocking: [Master::connect] forces the transport to wait forever for responses
    - a nonzero bus status is not an error, it is returned in the [Answer] for the caller to check
    - nothing is retried, recovering from a communication fault is done by explicitly calling [Master::reset]
*/

/// raw byte device abstraction, implemented by the serial port
mod port;
/// timeout-bounded byte and line I/O, this is the tricky part of the code
mod transport;
/// encoding and decoding of bus transactions
mod client;
/// connection settings
mod config;


pub use port::Port;
pub use transport::{SerialTransport, Timeout};
pub use client::{Master, Answer};
pub use config::{Config, DEFAULT_BAUD_RATE};

use std::{
    io,
    string::String,
    };
use thiserror::Error;
use crate::command::Status;


/// error regarding communication with the FPGA
#[derive(Error, Debug)]
pub enum Error {
    #[error("{path} not found or no permissions")]
    Open {path: String, source: io::Error},
    #[error("problem with uart bus")]
    Bus(#[source] io::Error),
    #[error("no data arrived in expected time")]
    Timeout,
    #[error("serial port is closed")]
    Closed,
    #[error("no line feed in the first {0} bytes of line")]
    LineTooLong(usize),
    #[error("bus responded with status {0:#04x}")]
    Slave(Status),
}
impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Self::Bus(error)
    }
}

pub type Result<T> = core::result::Result<T, Error>;


#[cfg(test)]
pub(crate) mod mock;
