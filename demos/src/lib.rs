//! command line glue shared by the demo binaries

use std::process;
use clap::Args;
use axi_uart::master::{Master, DEFAULT_BAUD_RATE};


/// serial device options common to all demos
#[derive(Args, Debug)]
pub struct Device {
    /// serial device connected to the FPGA
    #[arg(long, env = "axi_uart_device")]
    pub device: String,
    /// line speed in bits per second
    #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
    pub baud: u32,
}
impl Device {
    /// connect to the FPGA or exit the process with an error message
    pub fn connect(&self) -> Master {
        match Master::connect(&self.device, self.baud) {
            Ok(master) => master,
            Err(error) => {
                eprintln!("{}", error);
                process::exit(1);
            },
        }
    }
}

/**
    parse an unsigned integer the way C's `strtoul(text, 0, 0)` does

    `0x` prefix for hexadecimal, a leading `0` for octal, decimal otherwise
*/
pub fn parse_int(text: &str) -> Result<u32, String> {
    let text = text.trim();
    let (digits, radix) = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        (hex, 16)
    } else if text.len() > 1 && text.starts_with('0') {
        (&text[1 ..], 8)
    } else {
        (text, 10)
    };
    u32::from_str_radix(digits, radix)
        .map_err(|error| format!("invalid number {:?}: {}", text, error))
}

/**
    split a string in bus words, NUL terminator included

    each word packs 4 consecutive bytes, first byte in the least significant bits. The last word is the first one containing a NUL byte, padded with zeros.
*/
pub fn string_words(text: &str) -> Vec<u32> {
    let mut bytes = text.as_bytes().to_vec();
    bytes.push(0);
    let mut words = Vec::new();
    for chunk in bytes.chunks(4) {
        let mut word = [0u8; 4];
        word[.. chunk.len()].copy_from_slice(chunk);
        words.push(u32::from_le_bytes(word));
        if chunk.contains(&0) {break}
    }
    words
}
