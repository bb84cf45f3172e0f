// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Persisted clock settings and the text command vocabulary that edits them.
//!
//! The settings document is a flat JSON object:
//!
//! ```json
//! {"utc_offset_seconds": -18000, "latitude_millionths": 43451600,
//!  "longitude_millionths": 80492500, "dst_strategy": "canada"}
//! ```
//!
//! Missing keys take their defaults, unknown keys are ignored. Longitude is
//! positive west.
//!
//! | Command | Arguments | Persisted |
//! |---------|-----------|-----------|
//! | `UTC`     | hours, minutes, seconds | no (clock) |
//! | `DATE`    | year, month, day, day of week | no (clock) |
//! | `OFFSET`  | UTC offset in seconds | yes |
//! | `DST`     | strategy token | yes |
//! | `POS`     | latitude, longitude in millionths of a degree | yes |
//! | `CAL`     | channel (mod 2), value (mod 4096) | no (dials) |
//! | `STOPCAL` | – | no (dials) |

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::local_time::{DstStrategy, LocalTimeConfig};

const MILLIONTHS: f64 = 1_000_000.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub utc_offset_seconds: i32,
    pub latitude_millionths: i64,
    pub longitude_millionths: i64,
    pub dst_strategy: DstStrategy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            utc_offset_seconds: 0,
            latitude_millionths: 43_451_600,
            longitude_millionths: 80_492_500,
            dst_strategy: DstStrategy::Canada,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    /// The engine's read-only view of these settings.
    pub fn local_time_config(&self) -> LocalTimeConfig {
        LocalTimeConfig {
            utc_offset_seconds: self.utc_offset_seconds,
            dst: self.dst_strategy,
            latitude_deg: self.latitude_millionths as f64 / MILLIONTHS,
            longitude_west_deg: self.longitude_millionths as f64 / MILLIONTHS,
        }
    }

    /// Applies a command; returns `true` when the document changed and must
    /// be saved. Clock and dial commands are left to their collaborators.
    pub fn apply(&mut self, command: &SettingsCommand) -> bool {
        match *command {
            SettingsCommand::SetUtcOffset(seconds) => {
                self.utc_offset_seconds = seconds;
                true
            }
            SettingsCommand::SetDst(strategy) => {
                self.dst_strategy = strategy;
                true
            }
            SettingsCommand::SetPosition {
                latitude_millionths,
                longitude_millionths,
            } => {
                self.latitude_millionths = latitude_millionths;
                self.longitude_millionths = longitude_millionths;
                true
            }
            SettingsCommand::SetUtcTime { .. }
            | SettingsCommand::SetDate { .. }
            | SettingsCommand::Calibrate { .. }
            | SettingsCommand::StopCalibration => false,
        }
    }
}

/// A parsed settings command.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SettingsCommand {
    SetUtcTime {
        hours: u32,
        minutes: u32,
        seconds: u32,
    },
    SetDate {
        year: i32,
        month: u32,
        day: u32,
        day_of_week: u32,
    },
    SetUtcOffset(i32),
    SetDst(DstStrategy),
    SetPosition {
        latitude_millionths: i64,
        longitude_millionths: i64,
    },
    /// Drive a dial channel directly, suspending the computed outputs.
    Calibrate { channel: u8, value: u16 },
    StopCalibration,
}

impl SettingsCommand {
    /// Parses `NAME,arg,arg,...`.
    ///
    /// ```
    /// use moonclock::settings::SettingsCommand;
    ///
    /// assert_eq!(
    ///     SettingsCommand::parse("CAL,3,4097").unwrap(),
    ///     SettingsCommand::Calibrate { channel: 1, value: 1 }
    /// );
    /// assert!(SettingsCommand::parse("REBOOT").is_err());
    /// ```
    pub fn parse(line: &str) -> Result<Self, ConfigError> {
        let mut tokens = line.trim().split(',');
        let name = tokens.next().unwrap_or_default();
        let args: Vec<&str> = tokens.map(str::trim).collect();

        let command = match name {
            "UTC" => {
                let [h, m, s] = arguments::<3>("UTC", &args)?;
                Self::SetUtcTime {
                    hours: number("UTC", h)?,
                    minutes: number("UTC", m)?,
                    seconds: number("UTC", s)?,
                }
            }
            "DATE" => {
                let [y, m, d, dow] = arguments::<4>("DATE", &args)?;
                Self::SetDate {
                    year: number("DATE", y)?,
                    month: number("DATE", m)?,
                    day: number("DATE", d)?,
                    day_of_week: number("DATE", dow)?,
                }
            }
            "OFFSET" => {
                let [seconds] = arguments::<1>("OFFSET", &args)?;
                Self::SetUtcOffset(number("OFFSET", seconds)?)
            }
            "DST" => {
                let [token] = arguments::<1>("DST", &args)?;
                Self::SetDst(DstStrategy::from_token(token))
            }
            "POS" => {
                let [lat, lon] = arguments::<2>("POS", &args)?;
                Self::SetPosition {
                    latitude_millionths: number("POS", lat)?,
                    longitude_millionths: number("POS", lon)?,
                }
            }
            "CAL" => {
                let [channel, value] = arguments::<2>("CAL", &args)?;
                let channel: i64 = number("CAL", channel)?;
                let value: i64 = number("CAL", value)?;
                Self::Calibrate {
                    channel: channel.rem_euclid(2) as u8,
                    value: value.rem_euclid(4096) as u16,
                }
            }
            "STOPCAL" => {
                arguments::<0>("STOPCAL", &args)?;
                Self::StopCalibration
            }
            other => return Err(ConfigError::UnknownCommand(other.to_string())),
        };
        Ok(command)
    }
}

impl FromStr for SettingsCommand {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn arguments<'a, const N: usize>(
    command: &'static str,
    args: &[&'a str],
) -> Result<[&'a str; N], ConfigError> {
    <[&str; N]>::try_from(args).map_err(|_| ConfigError::ArgumentCount {
        command,
        expected: N,
        found: args.len(),
    })
}

fn number<T: FromStr>(command: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidArgument {
        command,
        value: value.to_string(),
    })
}
