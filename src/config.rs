// Centralize all configuration constants
use crate::sensors::{DhtType, RtdPreset};

// ── PID selection ────────────────────────────────────────
// Both loops may be compiled in together; only "neither" is rejected.
pub const PID_TEMP: bool = cfg!(feature = "pid-temp");
pub const PID_CURR: bool = cfg!(feature = "pid-curr");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PidMode {
    Temperature,
    Current,
    Dual,
}

pub const PID_MODE: PidMode = match (PID_TEMP, PID_CURR) {
    (true, false) => PidMode::Temperature,
    (false, true) => PidMode::Current,
    (true, true) => PidMode::Dual,
    (false, false) => panic!("enable at least one of the `pid-temp` / `pid-curr` features"),
};

// ── Actuator limits ──────────────────────────────────────
pub const MIN_VOLT: u16 = 0; // mV
pub const MAX_VOLT: u16 = 3800; // mV
pub const MAX_CURR: u16 = 4000; // mA

// Arduino supply, only used for ADC scaling
pub const REF_VOLTAGE: u16 = 5110; // mV

// ── MAX31865 RTD ─────────────────────────────────────────
#[cfg(not(feature = "pt1000"))]
pub const RTD_PRESET: RtdPreset = RtdPreset::Pt100;
#[cfg(feature = "pt1000")]
pub const RTD_PRESET: RtdPreset = RtdPreset::Pt1000;

pub const RREF: f32 = RTD_PRESET.rref(); // ohms
pub const RNOMINAL: f32 = RTD_PRESET.rnominal(); // ohms

// ── Loop rates ───────────────────────────────────────────
pub const REFRESH_RATE: u32 = 20; // Hz, temperature PID
pub const PERIOD_RATE: u32 = 1000 / REFRESH_RATE; // ms
pub const CURRENT_PID_REFRESH_RATE: u32 = 2; // ms

// ── Pins (Arduino header numbering) ──────────────────────
pub const DHTPIN: u8 = 2;
pub const DHTTYPE: DhtType = DhtType::Dht22;
pub const RELAY_PIN: u8 = 7;

// D0/D1 carry the host serial link
pub const FIRST_FREE_DIGITAL_PIN: u8 = 2;
pub const LAST_DIGITAL_PIN: u8 = 13;

// ── Host link ────────────────────────────────────────────
pub const HOST_BAUDRATE: u32 = 115_200;
pub const HOST_LINE_MAX: usize = 32;
pub const HOST_RESPONSE_MAX: usize = 48;
pub const HOST_RX_DMA_SIZE: usize = 256;

// ── Build-time checks ────────────────────────────────────
const _: () = {
    assert!(PID_TEMP || PID_CURR);
    assert!(MIN_VOLT <= MAX_VOLT);
    assert!(MAX_CURR > 0);
    assert!(REF_VOLTAGE > 0);
    assert!(REFRESH_RATE > 0);
    assert!(PERIOD_RATE * REFRESH_RATE <= 1000);
    assert!(1000 - PERIOD_RATE * REFRESH_RATE < REFRESH_RATE);
    assert!(CURRENT_PID_REFRESH_RATE > 0);
    assert!(CURRENT_PID_REFRESH_RATE < PERIOD_RATE);
    assert!(DHTPIN != RELAY_PIN, "DHT and relay share a pin");
    assert!(is_digital_io(DHTPIN));
    assert!(is_digital_io(RELAY_PIN));
    assert!(HOST_LINE_MAX <= HOST_RX_DMA_SIZE);
};

/// True for header pins usable as plain digital I/O.
pub const fn is_digital_io(pin: u8) -> bool {
    pin >= FIRST_FREE_DIGITAL_PIN && pin <= LAST_DIGITAL_PIN
}
