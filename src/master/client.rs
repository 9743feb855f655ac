use std::{
    path::Path,
    thread,
    time::Duration,
    };
use packbytes::{FromBytes, ToBytes, ByteArray};
use serial2::SerialPort;
use log::*;

use crate::command::{
    Address, Word, Status, STATUS_OKAY, RESET_MARKER,
    ReadCommand, WriteCommand, ReadResponse, WriteResponse,
    };
use super::{Port, SerialTransport, Timeout, Config, Error, Result};


/// data received from the bus and the status of the transaction
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Answer<T> {
    pub status: Status,
    /// always filled, but only meaningful when `status` is OKAY
    pub data: T,
}
impl<T> Answer<T> {
    pub fn is_okay(&self) -> bool {
        self.status == STATUS_OKAY
    }
    /// data if the bus reported success, [Error::Slave] with the status otherwise
    pub fn okay(self) -> Result<T> {
        if ! self.is_okay()
            {return Err(Error::Slave(self.status))}
        Ok(self.data)
    }
}


/**
    AXI bus master on the other end of a serial line

    each transaction writes one command frame and blocks for its fixed size response, nothing is pipelined.
    A multi-threaded caller has to serialize its own access to the master.
*/
pub struct Master<P = SerialPort> {
    transport: SerialTransport<P>,
    reset_settle: Duration,
    reset_drain: Duration,
}

impl Master<SerialPort> {
    /// open the serial device connected to the FPGA
    pub fn connect(path: impl AsRef<Path>, rate: u32) -> Result<Self> {
        Self::connect_with(path, &Config::with_baud_rate(rate))
    }
    pub fn connect_with(path: impl AsRef<Path>, config: &Config) -> Result<Self> {
        // transactions must block until the device answers
        let config = Config {read_timeout: None, .. config.clone()};
        let transport = SerialTransport::open_with(path, &config)?;
        Ok(Self::with_config(transport, &config))
    }
}

impl<P: Port> Master<P> {
    /// use an already opened transport, its default read timeout is reset to wait forever
    pub fn from_transport(transport: SerialTransport<P>) -> Self {
        Self::with_config(transport, &Config::default())
    }
    fn with_config(mut transport: SerialTransport<P>, config: &Config) -> Self {
        transport.set_default_read_timeout(None);
        Self {
            transport,
            reset_settle: config.reset_settle,
            reset_drain: config.reset_drain,
        }
    }

    pub fn transport(&self) -> &SerialTransport<P> {&self.transport}
    pub fn transport_mut(&mut self) -> &mut SerialTransport<P> {&mut self.transport}
    pub fn is_connected(&self) -> bool {self.transport.is_open()}

    /// read a bus register, the word is returned whatever the status
    pub fn read(&mut self, address: Address) -> Result<Answer<Word>> {
        let command = ReadCommand::new(address);
        self.transport.write(&command.to_be_bytes())?;

        let mut buffer = <ReadResponse as FromBytes>::Bytes::zeroed();
        self.transport.read(buffer.as_mut(), Timeout::Default)?;
        let response = ReadResponse::from_be_bytes(buffer);
        debug!("read {:#010x} -> {:#010x} status {}", address, response.data, response.status);
        Ok(Answer {
            status: response.status,
            data: response.data,
        })
    }
    /// write a bus register
    pub fn write(&mut self, address: Address, data: Word) -> Result<Answer<()>> {
        let command = WriteCommand::new(address, data);
        self.transport.write(&command.to_be_bytes())?;

        let mut buffer = <WriteResponse as FromBytes>::Bytes::zeroed();
        self.transport.read(buffer.as_mut(), Timeout::Default)?;
        let response = WriteResponse::from_be_bytes(buffer);
        debug!("write {:#010x} <- {:#010x} status {}", address, data, response.status);
        Ok(Answer {
            status: response.status,
            data: (),
        })
    }

    /**
        force the FPGA's input buffer into a known good state

        the reset marker makes the device's frame parser time out, then whatever it answered meanwhile is discarded.
        This is never done automatically, call it after a communication fault.
    */
    pub fn reset(&mut self) -> Result<()> {
        warn!("resetting device frame parser");
        self.transport.write(&RESET_MARKER)?;
        thread::sleep(self.reset_settle);
        self.transport.drain_input(self.reset_drain)?;
        Ok(())
    }

    /// close the serial device, does nothing if already closed
    pub fn disconnect(&mut self) {
        self.transport.close();
    }
}
