/*!
    wire format of the register protocol

    there is no checksum, no token and no delimiter: the boundaries of every frame are given by its opcode alone. All multi-byte fields are big-endian, every frame is packed and unpacked by its `packbytes` [ToBytes]/[FromBytes] implementation and nowhere else.

    | direction     | frame          | layout                      |
    |---------------|----------------|-----------------------------|
    | host → device | read command   | `[0x01][addr:4]`            |
    | host → device | write command  | `[0x02][addr:4][data:4]`    |
    | device → host | read response  | `[status:1][data:4]`        |
    | device → host | write response | `[status:1]`                |
    | host → device | reset marker   | 16 times `b'X'`             |
*/

use packbytes::{FromBytes, ToBytes, ByteArray};


/// integer used for addressing the AXI bus
pub type Address = u32;
/// unit of data transfered by one transaction
pub type Word = u32;
/// transaction outcome sent back by the device, `0` is OKAY, anything else is an opaque bus error
pub type Status = u8;

pub const CMD_READ: u8 = 1;
pub const CMD_WRITE: u8 = 2;
pub const STATUS_OKAY: Status = 0;

/**
    out-of-band sequence forcing the device's frame parser back to idle

    `b'X'` is not an opcode, so an idle parser drops every byte of the marker.

    A parser left mid-frame takes the first marker bytes as the rest of that frame: the interrupted command is completed with `b'X'` bytes and executed (an interrupted write stores `0x58585858`-like garbage), the remaining marker bytes are then dropped. The answer to that command is part of what the reset drains.
*/
pub const RESET_MARKER: [u8; 16] = [b'X'; 16];

/// largest frame exchanged in any direction
pub const MAX_FRAME: usize = WRITE_COMMAND;
pub const READ_COMMAND: usize = <ReadCommand as ToBytes>::Bytes::SIZE;
pub const WRITE_COMMAND: usize = <WriteCommand as ToBytes>::Bytes::SIZE;
pub const READ_RESPONSE: usize = <ReadResponse as ToBytes>::Bytes::SIZE;
pub const WRITE_RESPONSE: usize = <WriteResponse as ToBytes>::Bytes::SIZE;


/// type of bus transaction, first byte of every command
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Opcode {
    Read,
    Write,
}
impl Opcode {
    /// number of bytes in a command frame with this opcode, opcode included
    pub const fn command_size(self) -> usize {
        match self {
            Self::Read => READ_COMMAND,
            Self::Write => WRITE_COMMAND,
        }
    }
    /// number of bytes the device answers to a command with this opcode
    pub const fn response_size(self) -> usize {
        match self {
            Self::Read => READ_RESPONSE,
            Self::Write => WRITE_RESPONSE,
        }
    }
}
impl From<Opcode> for u8 {
    fn from(opcode: Opcode) -> u8 {
        match opcode {
            Opcode::Read => CMD_READ,
            Opcode::Write => CMD_WRITE,
        }
    }
}
impl TryFrom<u8> for Opcode {
    type Error = u8;
    fn try_from(byte: u8) -> Result<Self, u8> {
        match byte {
            CMD_READ => Ok(Self::Read),
            CMD_WRITE => Ok(Self::Write),
            other => Err(other),
        }
    }
}


/// read transaction, host to device
#[derive(Copy, Clone, FromBytes, ToBytes, Debug, PartialEq, Eq)]
pub struct ReadCommand {
    pub opcode: u8,
    pub address: Address,
}
impl ReadCommand {
    pub const fn new(address: Address) -> Self {
        Self {opcode: CMD_READ, address}
    }
}

/// write transaction, host to device
#[derive(Copy, Clone, FromBytes, ToBytes, Debug, PartialEq, Eq)]
pub struct WriteCommand {
    pub opcode: u8,
    pub address: Address,
    pub data: Word,
}
impl WriteCommand {
    pub const fn new(address: Address, data: Word) -> Self {
        Self {opcode: CMD_WRITE, address, data}
    }
}

/// answer to a [ReadCommand], `data` is meaningless unless `status` is OKAY
#[derive(Copy, Clone, FromBytes, ToBytes, Debug, Default, PartialEq, Eq)]
pub struct ReadResponse {
    pub status: Status,
    pub data: Word,
}

/// answer to a [WriteCommand]
#[derive(Copy, Clone, FromBytes, ToBytes, Debug, Default, PartialEq, Eq)]
pub struct WriteResponse {
    pub status: Status,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_sizes() {
        assert_eq!(READ_COMMAND, 5);
        assert_eq!(WRITE_COMMAND, 9);
        assert_eq!(READ_RESPONSE, 5);
        assert_eq!(WRITE_RESPONSE, 1);
        assert_eq!(Opcode::Read.command_size(), 5);
        assert_eq!(Opcode::Write.command_size(), 9);
        assert_eq!(Opcode::Read.response_size(), 5);
        assert_eq!(Opcode::Write.response_size(), 1);
    }

    #[test]
    fn write_command_layout() {
        let bytes = WriteCommand::new(0x0000_1000, 0xdead_beef).to_be_bytes();
        assert_eq!(bytes, [0x02, 0x00, 0x00, 0x10, 0x00, 0xde, 0xad, 0xbe, 0xef]);
        let decoded = WriteCommand::from_be_bytes(bytes);
        assert_eq!(decoded.address, 0x0000_1000);
        assert_eq!(decoded.data, 0xdead_beef);
    }

    #[test]
    fn read_command_layout() {
        let bytes = ReadCommand::new(0x0000_2000).to_be_bytes();
        assert_eq!(bytes, [0x01, 0x00, 0x00, 0x20, 0x00]);
    }

    #[test]
    fn read_response_is_big_endian() {
        let response = ReadResponse::from_be_bytes([0x00, 0x12, 0x34, 0x56, 0x78]);
        assert_eq!(response.status, STATUS_OKAY);
        assert_eq!(response.data, 0x1234_5678);

        for word in [0, 1, 0xff, 0x100, 0x8000_0000, u32::MAX] {
            let mut bytes = [0x05; 5];
            bytes[1..].copy_from_slice(&word.to_be_bytes());
            assert_eq!(ReadResponse::from_be_bytes(bytes).data, word);
        }
    }

    #[test]
    fn opcodes() {
        assert_eq!(Opcode::try_from(1), Ok(Opcode::Read));
        assert_eq!(Opcode::try_from(2), Ok(Opcode::Write));
        assert_eq!(Opcode::try_from(b'X'), Err(b'X'));
        assert_eq!(u8::from(Opcode::Write), CMD_WRITE);
        assert!(RESET_MARKER.iter().all(|&b| Opcode::try_from(b).is_err()));
    }
}
