use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex as RawMutex, mutex::Mutex, signal::Signal,
};
use peltier_config::RegisterFile;
use portable_atomic::{AtomicU32, Ordering};

/// Registers shared between the host link and the DHT sampling task.
pub static REGISTERS: Mutex<RawMutex, RegisterFile> = Mutex::new(RegisterFile::new());

/// Latest requested relay state (true = Peltier powered).
pub static RELAY_SIGNAL: Signal<RawMutex, bool> = Signal::new();

/// Raised when the host asks for a humidity/temperature conversion.
pub static CONVERSION_SIGNAL: Signal<RawMutex, ()> = Signal::new();

pub struct LinkStats {
    frames: AtomicU32,
    rejected: AtomicU32,
}

impl LinkStats {
    pub const fn new() -> Self {
        Self {
            frames: AtomicU32::new(0),
            rejected: AtomicU32::new(0),
        }
    }

    pub fn record(&self, accepted: bool) {
        self.frames.fetch_add(1, Ordering::Relaxed);
        if !accepted {
            self.rejected.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// (frames, rejected) since the last call
    pub fn take(&self) -> (u32, u32) {
        (
            self.frames.swap(0, Ordering::Relaxed),
            self.rejected.swap(0, Ordering::Relaxed),
        )
    }
}

pub static LINK_STATS: LinkStats = LinkStats::new();
