//! copy a NUL terminated string into consecutive AXI registers

use std::process;
use clap::Parser;
use axi_uart_demos::{Device, parse_int, string_words};


#[derive(Parser, Debug)]
#[command(name = "strcpy_to_axi", version, about = "copy a string into AXI address space")]
struct Cli {
    #[command(flatten)]
    device: Device,
    /// first register address, decimal or 0x hexadecimal
    #[arg(value_parser = parse_int)]
    address: u32,
    /// text to copy, a NUL terminator is appended
    text: String,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let mut master = cli.device.connect();

    let mut address = cli.address;
    for word in string_words(&cli.text) {
        // bus status of each write is ignored
        if let Err(error) = master.write(address, word) {
            eprintln!("{}", error);
            process::exit(1);
        }
        address = address.wrapping_add(4);
    }
    master.disconnect();
}
