//! read or write one AXI register from the command line

use std::process;
use clap::{Parser, Subcommand};
use axi_uart_demos::{Device, parse_int};


#[derive(Parser, Debug)]
#[command(name = "axi", version, about = "AXI register access through a serial line")]
struct Cli {
    #[command(flatten)]
    device: Device,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// read a register and print its value
    Read {
        /// register address, decimal or 0x hexadecimal
        #[arg(value_parser = parse_int)]
        address: u32,
    },
    /// write a value to a register
    Write {
        /// register address, decimal or 0x hexadecimal
        #[arg(value_parser = parse_int)]
        address: u32,
        /// value to write, decimal or 0x hexadecimal
        #[arg(value_parser = parse_int)]
        data: u32,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let mut master = cli.device.connect();

    let result = match cli.command {
        Command::Read {address} => master.read(address).map(|answer| {
            println!("{:#010x} = {:#010x} ({})  status {}", address, answer.data, answer.data, answer.status);
            answer.status
        }),
        Command::Write {address, data} => master.write(address, data).map(|answer| {
            println!("{:#010x} <- {:#010x}  status {}", address, data, answer.status);
            answer.status
        }),
    };
    master.disconnect();
    match result {
        Ok(0) => {},
        Ok(_) => process::exit(2),
        Err(error) => {
            eprintln!("{}", error);
            process::exit(1);
        },
    }
}
