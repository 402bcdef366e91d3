//! Calibration presets for the sensors wired to the regulator.

/// MAX31865 RTD probe variants. The reference resistor on the breakout
/// has to match the probe: 430 Ω for PT100, 4300 Ω for PT1000.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RtdPreset {
    Pt100,
    Pt1000,
}

impl RtdPreset {
    /// Value of the Rref resistor (ohms).
    pub const fn rref(self) -> f32 {
        match self {
            Self::Pt100 => 430.0,
            Self::Pt1000 => 4300.0,
        }
    }

    /// Nominal 0 °C resistance of the probe (ohms).
    pub const fn rnominal(self) -> f32 {
        match self {
            Self::Pt100 => 100.0,
            Self::Pt1000 => 1000.0,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Pt100 => "PT100",
            Self::Pt1000 => "PT1000",
        }
    }

    /// Identify the preset an (Rref, Rnominal) pair belongs to. Only the
    /// two documented pairings match; anything else is a wiring mistake.
    pub fn from_calibration(rref: f32, rnominal: f32) -> Option<Self> {
        [Self::Pt100, Self::Pt1000]
            .into_iter()
            .find(|p| p.rref() == rref && p.rnominal() == rnominal)
    }
}

/// Ambient humidity/temperature sensor models, numbered like the Arduino
/// DHT library tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DhtType {
    Dht11,
    Dht12,
    Dht21,
    Dht22,
}

impl DhtType {
    pub const fn code(self) -> u8 {
        match self {
            Self::Dht11 => 11,
            Self::Dht12 => 12,
            Self::Dht21 => 21,
            Self::Dht22 => 22,
        }
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            11 => Some(Self::Dht11),
            12 => Some(Self::Dht12),
            21 => Some(Self::Dht21),
            22 => Some(Self::Dht22),
            _ => None,
        }
    }

    /// Shortest spacing between two conversions (ms)
    pub const fn min_sample_interval_ms(self) -> u32 {
        match self {
            Self::Dht11 | Self::Dht12 => 1000,
            Self::Dht21 | Self::Dht22 => 2000,
        }
    }
}
