/*!
    tests against a real FPGA

    the serial device is given by the `AXI_UART_DEVICE` environment variable, the tests do nothing when it is not set.
    `AXI_UART_SCRATCH` gives the address of a read/write register usable for testing, `0x0` by default.
*/

use std::{
    env,
    time::{Duration, Instant},
    };
use serial_test::serial;
use axi_uart::master::*;


fn test(test: impl FnOnce(&mut Master)) {
    let _ = env_logger::builder().is_test(true).try_init();
    let Ok(device) = env::var("AXI_UART_DEVICE")
        else {
            eprintln!("AXI_UART_DEVICE not set, skipping hardware test");
            return;
        };
    let mut master = Master::connect(&device, DEFAULT_BAUD_RATE).expect("failed to initialize master");
    master.reset().expect("failed to reset device");
    test(&mut master);
    master.disconnect();
}

fn scratch() -> u32 {
    env::var("AXI_UART_SCRATCH").ok()
        .and_then(|text| match text.strip_prefix("0x") {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => text.parse().ok(),
        })
        .unwrap_or(0)
}


#[test]
#[serial]
fn write_read_back() {
    test(|master| {
        let address = scratch();
        for value in [0, 0xdead_beef, 0x1234_5678, u32::MAX] {
            master.write(address, value).unwrap().okay().unwrap();
            assert_eq!(master.read(address).unwrap().okay().unwrap(), value);
        }
    });
}

#[test]
#[serial]
fn reset_between_transactions() {
    test(|master| {
        let address = scratch();
        master.write(address, 42).unwrap().okay().unwrap();
        // leave the device mid-frame
        master.transport_mut().write(&[axi_uart::command::CMD_READ, 0]).unwrap();
        master.reset().unwrap();
        assert_eq!(master.read(address).unwrap().okay().unwrap(), 42);
    });
}

#[test]
#[serial]
fn transaction_rate() {
    test(|master| {
        let address = scratch();
        let start = Instant::now();
        for _ in 0 .. 100 {
            master.read(address).unwrap();
        }
        let elapsed = start.elapsed();
        log::info!("100 reads in {:?}", elapsed);
        // 1000 bytes on the line at 115200 bauds take about 87ms
        assert!(elapsed > Duration::from_millis(80));
    });
}

#[test]
#[serial]
fn disconnect_twice() {
    test(|master| {
        master.disconnect();
        master.disconnect();
        assert!(!master.is_connected());
    });
}
