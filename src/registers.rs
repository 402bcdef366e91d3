//! Register map the host PC reads and writes over the serial link.
//!
//! Four 16-bit registers:
//!
//! | idx | register            | access |
//! |-----|---------------------|--------|
//! | 0   | command             | W      |
//! | 1   | current temperature | R      |
//! | 2   | desired temperature | R/W    |
//! | 3   | status flag         | R      |
//!
//! Temperatures travel as `u16` scaled over -10 °C ..= 35 °C.

use crate::error::{Error, Result};

/// Bits of the command register, applied lowest first.
pub mod command {
    pub const READ_HUMIDITY: u16 = 1 << 0; // start a DHT conversion
    pub const SEND_HT: u16 = 1 << 1; // answer with humidity,temperature
    pub const TOGGLE_STATE: u16 = 1 << 2; // STANDBY <-> RUNNING
    pub const RESET_ERROR: u16 = 1 << 3;
}

/// Bits of the status flag.
pub mod status {
    pub const RTD_ERR: u16 = 0x00FF; // MAX31865 fault byte
    pub const VT_ERR: u16 = 1 << 8; // host protocol
    pub const DHT_ERR: u16 = 1 << 9;
    pub const DAC_ERR: u16 = 1 << 10;
    pub const RUNNING: u16 = 1 << 11;

    pub const ERRORS: u16 = RTD_ERR | VT_ERR | DHT_ERR | DAC_ERR;
}

pub const TEMP_CODEC_MIN_C: f32 = -10.0;
pub const TEMP_CODEC_SPAN_C: f32 = 45.0;
pub const TEMP_CODEC_MAX_C: f32 = TEMP_CODEC_MIN_C + TEMP_CODEC_SPAN_C;
const COUNTS_PER_DEGREE: f32 = 65535.0 / TEMP_CODEC_SPAN_C;

pub fn encode_temperature(celsius: f32) -> Result<u16> {
    if !(TEMP_CODEC_MIN_C..=TEMP_CODEC_MAX_C).contains(&celsius) {
        return Err(Error::OutOfRange);
    }
    Ok(((celsius - TEMP_CODEC_MIN_C) * COUNTS_PER_DEGREE) as u16)
}

pub fn decode_temperature(raw: u16) -> f32 {
    raw as f32 / COUNTS_PER_DEGREE + TEMP_CODEC_MIN_C
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    Command = 0,
    CurrentTemperature = 1,
    DesiredTemperature = 2,
    StatusFlag = 3,
}

impl Register {
    pub fn from_index(index: u16) -> Result<Self> {
        match index {
            0 => Ok(Self::Command),
            1 => Ok(Self::CurrentTemperature),
            2 => Ok(Self::DesiredTemperature),
            3 => Ok(Self::StatusFlag),
            other => Err(Error::Index(other)),
        }
    }

    pub const fn writable(self) -> bool {
        matches!(self, Self::Command | Self::DesiredTemperature)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    pub humidity: f32,    // %RH
    pub temperature: f32, // °C
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Access {
    Read,
    Write(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Request {
    pub register: Register,
    pub access: Access,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reply {
    Ack,
    /// Ack followed by the latest reading, `None` if nothing was recorded yet
    AckWithMeasurement(Option<Measurement>),
    Value(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault {
    Rtd(u8),
    Dht,
    Dac,
    Link,
}

#[derive(Debug, Clone, Copy)]
pub struct RegisterFile {
    desired: u16,
    status: u16,
    latest: Option<Measurement>,
    conversion_pending: bool,
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterFile {
    pub const fn new() -> Self {
        Self {
            desired: 0,
            status: 0,
            latest: None,
            conversion_pending: false,
        }
    }

    /// Run one host request. Any rejected request latches `VT_ERR`.
    pub fn apply(&mut self, req: Request) -> Result<Reply> {
        let res = self.dispatch(req);
        if res.is_err() {
            self.set_fault(Fault::Link);
        }
        res
    }

    /// Like [`apply`](Self::apply) for a line that may have failed to parse.
    pub fn serve(&mut self, parsed: Result<Request>) -> Result<Reply> {
        match parsed {
            Ok(req) => self.apply(req),
            Err(e) => {
                self.set_fault(Fault::Link);
                Err(e)
            }
        }
    }

    fn dispatch(&mut self, req: Request) -> Result<Reply> {
        match req.access {
            Access::Read => Ok(Reply::Value(self.read(req.register))),
            Access::Write(_) if !req.register.writable() => Err(Error::ReadOnly),
            Access::Write(value) => match req.register {
                Register::Command => Ok(self.run_command(value)),
                Register::DesiredTemperature => {
                    self.desired = value;
                    Ok(Reply::Ack)
                }
                _ => Err(Error::ReadOnly),
            },
        }
    }

    pub fn read(&self, register: Register) -> u16 {
        match register {
            Register::Command => 0,
            Register::CurrentTemperature => self
                .latest
                .map(|m| saturating_encode(m.temperature))
                .unwrap_or(0),
            Register::DesiredTemperature => self.desired,
            Register::StatusFlag => self.status,
        }
    }

    fn run_command(&mut self, bits: u16) -> Reply {
        let mut reply = Reply::Ack;
        if bits & command::READ_HUMIDITY != 0 {
            self.conversion_pending = true;
        }
        if bits & command::SEND_HT != 0 {
            reply = Reply::AckWithMeasurement(self.latest);
        }
        if bits & command::TOGGLE_STATE != 0 {
            self.status ^= status::RUNNING;
        }
        if bits & command::RESET_ERROR != 0 {
            self.status &= !status::ERRORS;
        }
        reply
    }

    pub fn record_measurement(&mut self, m: Measurement) {
        self.latest = Some(m);
        self.conversion_pending = false;
    }

    /// Outcome of one sensor conversion. A failed conversion latches its
    /// fault and keeps the previous reading.
    pub fn record_reading(&mut self, reading: core::result::Result<Measurement, Fault>) {
        match reading {
            Ok(m) => self.record_measurement(m),
            Err(fault) => {
                self.set_fault(fault);
                self.conversion_pending = false;
            }
        }
    }

    pub fn set_fault(&mut self, fault: Fault) {
        self.status |= match fault {
            Fault::Rtd(code) => code as u16,
            Fault::Dht => status::DHT_ERR,
            Fault::Dac => status::DAC_ERR,
            Fault::Link => status::VT_ERR,
        };
    }

    pub fn is_running(&self) -> bool {
        self.status & status::RUNNING != 0
    }

    pub fn has_errors(&self) -> bool {
        self.status & status::ERRORS != 0
    }

    pub fn conversion_pending(&self) -> bool {
        self.conversion_pending
    }

    /// Setpoint as written by the host, in °C
    pub fn desired_celsius(&self) -> f32 {
        decode_temperature(self.desired)
    }

    pub fn latest(&self) -> Option<Measurement> {
        self.latest
    }
}

fn saturating_encode(celsius: f32) -> u16 {
    match encode_temperature(celsius) {
        Ok(raw) => raw,
        Err(_) if celsius > TEMP_CODEC_MAX_C => u16::MAX,
        Err(_) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(register: Register, value: u16) -> Request {
        Request {
            register,
            access: Access::Write(value),
        }
    }

    fn read(register: Register) -> Request {
        Request {
            register,
            access: Access::Read,
        }
    }

    #[test]
    fn codec_matches_host_scaling() {
        // host: int((T + 10) * (65535 / 45))
        assert_eq!(encode_temperature(-10.0), Ok(0));
        assert_eq!(encode_temperature(0.0), Ok(14563));
        assert_eq!(encode_temperature(-5.0), Ok(7281));
        assert!(encode_temperature(35.0).unwrap() >= 65534);
        assert_eq!(encode_temperature(-10.5), Err(Error::OutOfRange));
        assert_eq!(encode_temperature(35.5), Err(Error::OutOfRange));
        assert_eq!(encode_temperature(f32::NAN), Err(Error::OutOfRange));
        assert!((decode_temperature(14563) - 0.0).abs() < 0.001);
    }

    #[test]
    fn toggle_state_flips_running_bit() {
        let mut regs = RegisterFile::new();
        assert!(!regs.is_running());
        assert_eq!(regs.apply(write(Register::Command, command::TOGGLE_STATE)), Ok(Reply::Ack));
        assert!(regs.is_running());
        assert_eq!(regs.apply(read(Register::StatusFlag)), Ok(Reply::Value(2048)));
        regs.apply(write(Register::Command, command::TOGGLE_STATE)).unwrap();
        assert!(!regs.is_running());
    }

    #[test]
    fn read_only_write_latches_link_error() {
        let mut regs = RegisterFile::new();
        assert_eq!(
            regs.apply(write(Register::CurrentTemperature, 5)),
            Err(Error::ReadOnly)
        );
        assert_eq!(regs.read(Register::StatusFlag), status::VT_ERR);
        assert!(regs.has_errors());
    }

    #[test]
    fn reset_error_keeps_run_state() {
        let mut regs = RegisterFile::new();
        regs.apply(write(Register::Command, command::TOGGLE_STATE)).unwrap();
        regs.set_fault(Fault::Rtd(0x84));
        regs.set_fault(Fault::Dht);
        regs.set_fault(Fault::Dac);
        assert_eq!(regs.read(Register::StatusFlag), 0x0E84);
        regs.apply(write(Register::Command, command::RESET_ERROR)).unwrap();
        assert_eq!(regs.read(Register::StatusFlag), status::RUNNING);
    }

    #[test]
    fn measurement_flow() {
        let mut regs = RegisterFile::new();
        assert_eq!(
            regs.apply(write(Register::Command, command::SEND_HT)),
            Ok(Reply::AckWithMeasurement(None))
        );

        regs.apply(write(Register::Command, command::READ_HUMIDITY)).unwrap();
        assert!(regs.conversion_pending());

        let m = Measurement {
            humidity: 3.5,
            temperature: 0.0,
        };
        regs.record_measurement(m);
        assert!(!regs.conversion_pending());
        assert_eq!(
            regs.apply(write(Register::Command, command::SEND_HT)),
            Ok(Reply::AckWithMeasurement(Some(m)))
        );
        assert_eq!(regs.read(Register::CurrentTemperature), 14563);
    }

    #[test]
    fn sensor_reading_reaches_host_registers() {
        let mut regs = RegisterFile::new();
        regs.apply(write(Register::Command, command::READ_HUMIDITY)).unwrap();
        assert!(regs.conversion_pending());

        let m = Measurement {
            humidity: 41.3,
            temperature: 22.5,
        };
        regs.record_reading(Ok(m));
        assert!(!regs.conversion_pending());
        assert_eq!(
            regs.apply(write(Register::Command, command::SEND_HT)),
            Ok(Reply::AckWithMeasurement(Some(m)))
        );
        assert_eq!(regs.read(Register::CurrentTemperature), encode_temperature(22.5).unwrap());
    }

    #[test]
    fn failed_conversion_latches_fault_and_keeps_last_reading() {
        let mut regs = RegisterFile::new();
        let m = Measurement {
            humidity: 3.0,
            temperature: -4.0,
        };
        regs.record_reading(Ok(m));

        regs.apply(write(Register::Command, command::READ_HUMIDITY)).unwrap();
        regs.record_reading(Err(Fault::Dht));
        assert!(!regs.conversion_pending());
        assert_eq!(regs.read(Register::StatusFlag), status::DHT_ERR);
        assert_eq!(regs.latest(), Some(m));
    }

    #[test]
    fn current_temperature_saturates() {
        let mut regs = RegisterFile::new();
        regs.record_measurement(Measurement {
            humidity: 0.0,
            temperature: 80.0,
        });
        assert_eq!(regs.read(Register::CurrentTemperature), u16::MAX);
        regs.record_measurement(Measurement {
            humidity: 0.0,
            temperature: -40.0,
        });
        assert_eq!(regs.read(Register::CurrentTemperature), 0);
    }

    #[test]
    fn setpoint_round_trips_through_register() {
        let mut regs = RegisterFile::new();
        let raw = encode_temperature(-5.0).unwrap();
        regs.apply(write(Register::DesiredTemperature, raw)).unwrap();
        assert_eq!(regs.apply(read(Register::DesiredTemperature)), Ok(Reply::Value(raw)));
        assert!((regs.desired_celsius() + 5.0).abs() < 0.01);
    }

    #[test]
    fn unknown_index_is_rejected() {
        assert_eq!(Register::from_index(4), Err(Error::Index(4)));
        assert_eq!(Register::from_index(3), Ok(Register::StatusFlag));
    }
}
