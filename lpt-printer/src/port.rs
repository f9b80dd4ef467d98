//! Printer port identifiers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PrintError;

/// One of the two parallel ports the bridge can drive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortId {
    #[default]
    #[serde(rename = "LPT1")]
    Primary,
    #[serde(rename = "LPT2")]
    Secondary,
}

impl PortId {
    pub const ALL: [PortId; 2] = [PortId::Primary, PortId::Secondary];

    /// Port name as used by the OS tools (`LPT1`, `LPT2`)
    pub fn name(&self) -> &'static str {
        match self {
            PortId::Primary => "LPT1",
            PortId::Secondary => "LPT2",
        }
    }

    /// Raw device path the spool file is copied onto
    #[cfg(windows)]
    pub fn device_path(&self) -> &'static str {
        match self {
            PortId::Primary => r"\\.\LPT1",
            PortId::Secondary => r"\\.\LPT2",
        }
    }

    /// Raw device path the spool file is copied onto
    #[cfg(not(windows))]
    pub fn device_path(&self) -> &'static str {
        match self {
            PortId::Primary => "/dev/lp0",
            PortId::Secondary => "/dev/lp1",
        }
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PortId {
    type Err = PrintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LPT1" => Ok(PortId::Primary),
            "LPT2" => Ok(PortId::Secondary),
            other => Err(PrintError::InvalidPort(other.to_string())),
        }
    }
}
