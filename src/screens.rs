// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Text lines for the clock display.
//!
//! | Screen | Lines |
//! |--------|-------|
//! | [`Screen::LocalTime`]   | `HH:MM:SS` |
//! | [`Screen::Date`]        | `YYYY-MM-DD`, weekday |
//! | [`Screen::MoonRiseSet`] | `moonrise HH:MM`, `moonset HH:MM` |
//! | [`Screen::SunRiseSet`]  | `sunrise HH:MM`, `sunset HH:MM` |
//!
//! A rise or set that was not found renders as `--:--`.

use chrono::NaiveDateTime;

use crate::astro_state::DayAstroState;

const UNKNOWN_MOMENT: &str = "--:--";

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum Screen {
    #[default]
    LocalTime,
    Date,
    MoonRiseSet,
    SunRiseSet,
}

impl Screen {
    pub const ALL: [Screen; 4] = [
        Screen::LocalTime,
        Screen::Date,
        Screen::MoonRiseSet,
        Screen::SunRiseSet,
    ];

    const fn index(self) -> usize {
        match self {
            Self::LocalTime => 0,
            Self::Date => 1,
            Self::MoonRiseSet => 2,
            Self::SunRiseSet => 3,
        }
    }

    pub const fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub const fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Lines to render for `local_time` and the current day snapshot.
    pub fn lines(self, local_time: NaiveDateTime, state: &DayAstroState) -> Vec<String> {
        match self {
            Self::LocalTime => vec![local_time.format("%H:%M:%S").to_string()],
            Self::Date => vec![
                local_time.format("%Y-%m-%d").to_string(),
                local_time.format("%A").to_string(),
            ],
            Self::MoonRiseSet => vec![
                format!("moonrise {}", hour_minute(state.moon_today.rise)),
                format!("moonset {}", hour_minute(state.moon_today.set)),
            ],
            Self::SunRiseSet => vec![
                format!("sunrise {}", hour_minute(state.sun_today.rise)),
                format!("sunset {}", hour_minute(state.sun_today.set)),
            ],
        }
    }
}

fn hour_minute(moment: Option<NaiveDateTime>) -> String {
    moment.map_or_else(
        || UNKNOWN_MOMENT.to_string(),
        |moment| moment.format("%H:%M").to_string(),
    )
}
