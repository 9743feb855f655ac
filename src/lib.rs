/*!
    register-level access to a memory-mapped AXI bus on a remote FPGA, through a UART

    - [command] defines the byte-exact frames exchanged on the line
    - [master] is the host side: a blocking serial transport and the bus client built on it
    - [slave] is the device side frame parser, usable without std
*/
#![cfg_attr(not(feature = "std"), no_std)]

pub mod command;

#[cfg(feature = "master")]
pub mod master;
#[cfg(feature = "slave")]
pub mod slave;
