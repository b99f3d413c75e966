//! Recording native client shared by the handle tests

#![allow(dead_code)]

use outport_core::{ClientError, NativeClient, OutputBuffer, Result, StreamInfo};
use std::sync::{Arc, Mutex, Once};

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::TRACE)
            .try_init();
    });
}

pub const INFO: StreamInfo = StreamInfo {
    sample_rate: 44_100,
    channels: 2,
    chunk_frames: 64,
};

/// Calls observed across every client a factory produced
#[derive(Debug, Default)]
pub struct CallLog {
    pub creates: usize,
    pub activates: usize,
    pub exchanges: usize,
    pub deactivates: usize,
    pub disposes: usize,
    pub events: Vec<&'static str>,
}

pub type SharedLog = Arc<Mutex<CallLog>>;

/// Native client that records every call and hands out two alternating buffers
pub struct RecordingClient {
    log: SharedLog,
    buffers: [OutputBuffer; 2],
    current: usize,
    next_sequence: u64,
    deactivate_failures: usize,
}

impl RecordingClient {
    fn record(&self, event: &'static str) {
        self.log.lock().unwrap().events.push(event);
    }
}

impl NativeClient for RecordingClient {
    fn activate(&mut self) -> Result<StreamInfo> {
        self.record("activate");
        self.log.lock().unwrap().activates += 1;
        self.next_sequence += 1;
        self.buffers[self.current].set_sequence(self.next_sequence);
        Ok(INFO)
    }

    fn current_output_buffer(&mut self) -> Result<&mut OutputBuffer> {
        self.record("current");
        Ok(&mut self.buffers[self.current])
    }

    fn send_and_get_output_buffer(&mut self) -> Result<&mut OutputBuffer> {
        self.record("exchange");
        self.log.lock().unwrap().exchanges += 1;
        self.current = 1 - self.current;
        self.next_sequence += 1;
        let buffer = &mut self.buffers[self.current];
        buffer.set_sequence(self.next_sequence);
        Ok(buffer)
    }

    fn deactivate(&mut self) -> Result<()> {
        self.record("deactivate");
        self.log.lock().unwrap().deactivates += 1;
        if self.deactivate_failures > 0 {
            self.deactivate_failures -= 1;
            return Err(ClientError::stream("device gone"));
        }
        Ok(())
    }

    fn dispose(self) -> Result<()> {
        self.record("dispose");
        self.log.lock().unwrap().disposes += 1;
        Ok(())
    }
}

/// Factory producing recording clients that share one log
pub fn recording_factory(log: SharedLog) -> impl FnMut() -> Result<RecordingClient> {
    factory_with(log, 0)
}

/// Factory whose clients fail on every `deactivate`
pub fn failing_deactivate_factory(log: SharedLog) -> impl FnMut() -> Result<RecordingClient> {
    factory_with(log, usize::MAX)
}

/// Factory whose clients fail the first `failures` deactivations
pub fn flaky_deactivate_factory(
    log: SharedLog,
    failures: usize,
) -> impl FnMut() -> Result<RecordingClient> {
    factory_with(log, failures)
}

fn factory_with(
    log: SharedLog,
    deactivate_failures: usize,
) -> impl FnMut() -> Result<RecordingClient> {
    move || {
        {
            let mut guard = log.lock().unwrap();
            guard.creates += 1;
            guard.events.push("create");
        }
        Ok(RecordingClient {
            log: Arc::clone(&log),
            buffers: [OutputBuffer::new(2, 64), OutputBuffer::new(2, 64)],
            current: 0,
            next_sequence: 0,
            deactivate_failures,
        })
    }
}

pub fn new_log() -> SharedLog {
    Arc::new(Mutex::new(CallLog::default()))
}
