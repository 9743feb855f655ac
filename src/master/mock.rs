//! in-memory port for tests, the device side is fed by hand through [Remote]

use std::{
    io,
    string::{String, ToString},
    sync::{Arc, Mutex, mpsc::{self, Receiver, Sender, RecvTimeoutError, TryRecvError}},
    time::{Duration, Instant},
    vec::Vec,
    };
use log::{Log, Metadata, Record, LevelFilter};
use super::Port;


/// operation performed on the fake port
#[derive(Clone, Debug)]
pub enum Event {
    Write {data: Vec<u8>, at: Instant},
    Read {timeout: Option<Duration>, at: Instant, received: usize},
}

pub struct FakePort {
    incoming: Receiver<u8>,
    log: Arc<Mutex<Vec<Event>>>,
}
/// handle kept by the test to play the device
pub struct Remote {
    outgoing: Sender<u8>,
    log: Arc<Mutex<Vec<Event>>>,
}

pub fn pair() -> (FakePort, Remote) {
    let (outgoing, incoming) = mpsc::channel();
    let log = Arc::new(Mutex::new(Vec::new()));
    (
        FakePort {incoming, log: log.clone()},
        Remote {outgoing, log},
    )
}

impl Port for FakePort {
    fn read(&mut self, buffer: &mut [u8], timeout: Option<Duration>) -> io::Result<usize> {
        let at = Instant::now();
        let first = match timeout {
            None => self.incoming.recv()
                .map_err(|_| io::Error::from(io::ErrorKind::BrokenPipe)),
            Some(timeout) => match self.incoming.recv_timeout(timeout) {
                Ok(byte) => Ok(byte),
                Err(RecvTimeoutError::Timeout) => {
                    self.log.lock().unwrap().push(Event::Read {timeout: Some(timeout), at, received: 0});
                    return Ok(0);
                },
                Err(RecvTimeoutError::Disconnected) => Err(io::Error::from(io::ErrorKind::BrokenPipe)),
            },
        }?;
        buffer[0] = first;
        let mut received = 1;
        while received < buffer.len() {
            match self.incoming.try_recv() {
                Ok(byte) => {
                    buffer[received] = byte;
                    received += 1;
                },
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        self.log.lock().unwrap().push(Event::Read {timeout, at, received});
        Ok(received)
    }
    fn write_all(&mut self, buffer: &[u8]) -> io::Result<()> {
        self.log.lock().unwrap().push(Event::Write {data: buffer.to_vec(), at: Instant::now()});
        Ok(())
    }
}

impl Remote {
    /// make bytes available to the host
    pub fn feed(&self, bytes: &[u8]) {
        for &byte in bytes {
            self.outgoing.send(byte).unwrap();
        }
    }
    pub fn events(&self) -> Vec<Event> {
        self.log.lock().unwrap().clone()
    }
    /// all buffers written by the host, in order
    pub fn written(&self) -> Vec<Vec<u8>> {
        self.events().into_iter()
            .filter_map(|event| match event {
                Event::Write {data, ..} => Some(data),
                _ => None,
            })
            .collect()
    }
    pub fn reads(&self) -> usize {
        self.events().iter()
            .filter(|event| matches!(event, Event::Read {..}))
            .count()
    }
}


/// logger keeping every record in memory, with its target
struct Capture(Mutex<Vec<(String, String)>>);

static CAPTURE: Capture = Capture(Mutex::new(Vec::new()));

impl Log for Capture {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {true}
    fn log(&self, record: &Record<'_>) {
        self.0.lock().unwrap().push((record.target().to_string(), record.args().to_string()));
    }
    fn flush(&self) {}
}

/// route log records of the whole test process to memory
pub fn capture_log() {
    // only the first call installs it
    let _ = log::set_logger(&CAPTURE);
    log::set_max_level(LevelFilter::Trace);
}
/// messages logged so far on the given target
pub fn captured(target: &str) -> Vec<String> {
    CAPTURE.0.lock().unwrap().iter()
        .filter(|(logged, _)| logged == target)
        .map(|(_, message)| message.clone())
        .collect()
}
