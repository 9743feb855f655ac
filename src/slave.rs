/*!
    device side of the protocol: frame parsing and response encoding

    This is what the FPGA does in hardware, written so that it can run on a microcontroller (no std, no allocation) or simulate the FPGA in tests.
    Bytes are pushed one at a time in a [Receiver], which yields a [Request] when a complete command arrived. A [Request] is executed on a [Bus] implementation and its [Response] sent back.
*/

use packbytes::{FromBytes, ToBytes};
use log::*;

use crate::command::*;


/// memory-mapped bus the device gives access to
pub trait Bus {
    /// read a register, returning the transaction status and the data read
    fn read(&mut self, address: Address) -> (Status, Word);
    /// write a register, returning the transaction status
    fn write(&mut self, address: Address, data: Word) -> Status;
}

/// decoded command
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Request {
    Read {address: Address},
    Write {address: Address, data: Word},
}
/// answer to a command, ready to be encoded
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Response {
    Read(ReadResponse),
    Write(WriteResponse),
}
/// reason a byte could not be part of a command
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameError {
    /// a frame started with a byte that is not an opcode, the byte is dropped
    UnknownOpcode(u8),
}

impl Request {
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::Read {..} => Opcode::Read,
            Self::Write {..} => Opcode::Write,
        }
    }
    pub fn execute(self, bus: &mut impl Bus) -> Response {
        match self {
            Self::Read {address} => {
                let (status, data) = bus.read(address);
                Response::Read(ReadResponse {status, data})
            },
            Self::Write {address, data} => {
                let status = bus.write(address, data);
                Response::Write(WriteResponse {status})
            },
        }
    }
}

impl Response {
    pub fn status(&self) -> Status {
        match self {
            Self::Read(response) => response.status,
            Self::Write(response) => response.status,
        }
    }
    /// write the response frame at the start of the buffer and return its size
    pub fn encode(&self, buffer: &mut [u8]) -> usize {
        match self {
            Self::Read(response) => {
                buffer[.. READ_RESPONSE].copy_from_slice(&response.to_be_bytes());
                READ_RESPONSE
            },
            Self::Write(response) => {
                buffer[.. WRITE_RESPONSE].copy_from_slice(&response.to_be_bytes());
                WRITE_RESPONSE
            },
        }
    }
}


/**
    command frame parser

    the frame length is given by its first byte. There is no way to detect a frame boundary in the byte stream, so a partial frame is only dropped when the input line stays silent long enough, which is signaled by calling [Self::expire].
*/
#[derive(Clone, Debug, Default)]
pub struct Receiver {
    buffer: [u8; MAX_FRAME],
    len: usize,
}
impl Receiver {
    pub const fn new() -> Self {
        Self {buffer: [0; MAX_FRAME], len: 0}
    }
    /// true when no partial frame is pending
    pub fn is_idle(&self) -> bool {
        self.len == 0
    }
    /// input line timed out, forget any partial frame
    pub fn expire(&mut self) {
        if self.len != 0 {
            debug!("dropping partial frame of {} bytes", self.len);
        }
        self.len = 0;
    }
    /// feed one received byte, returning a request when it completes a frame
    pub fn push(&mut self, byte: u8) -> Option<Result<Request, FrameError>> {
        if self.len == 0 && Opcode::try_from(byte).is_err() {
            return Some(Err(FrameError::UnknownOpcode(byte)));
        }
        self.buffer[self.len] = byte;
        self.len += 1;

        let opcode = Opcode::try_from(self.buffer[0]).ok()?;
        if self.len < opcode.command_size() {
            return None;
        }
        self.len = 0;
        Some(Ok(match opcode {
            Opcode::Read => {
                let command = ReadCommand::from_be_bytes(self.buffer[.. READ_COMMAND].try_into().ok()?);
                Request::Read {address: command.address}
            },
            Opcode::Write => {
                let command = WriteCommand::from_be_bytes(self.buffer[.. WRITE_COMMAND].try_into().ok()?);
                Request::Write {address: command.address, data: command.data}
            },
        }))
    }
}
