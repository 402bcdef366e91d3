use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Line is not a `{INDEX,R|W,VAL}` frame
    Frame,
    /// Register index not in the map
    Index(u16),
    /// Access field other than `R` / `W`
    Access,
    /// Value field not a u16
    Value,
    ReadOnly,
    /// Setpoint outside the encodable range
    OutOfRange,
    /// Line longer than `HOST_LINE_MAX`
    Overflow,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Frame => f.write_str("malformed frame"),
            Self::Index(i) => write!(f, "unknown register {i}"),
            Self::Access => f.write_str("access must be R or W"),
            Self::Value => f.write_str("value is not a 16-bit integer"),
            Self::ReadOnly => f.write_str("register is read-only"),
            Self::OutOfRange => f.write_str("temperature outside encodable range"),
            Self::Overflow => f.write_str("line too long"),
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
