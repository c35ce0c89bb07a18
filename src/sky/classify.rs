//! Discrete sun, moon and sky states.
//!
//! Each classifier maps an elevation (or a pair of states) to a label. Bands
//! are closed on their lower bound, so a value exactly on a threshold belongs
//! to the brighter band.

use serde::Serialize;

use crate::common::constants::*;

/// Which body a condition interval describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    Sun,
    Moon,
    Sky,
}

/// A state label that belongs to one [`Component`] track.
pub trait ConditionState: Copy + PartialEq + std::fmt::Debug {
    const COMPONENT: Component;

    /// Human-readable label, e.g. `"civil twilight"`.
    fn label(&self) -> &'static str;
}

/// Sun state by elevation band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SunState {
    #[serde(rename = "day")]
    Day,
    #[serde(rename = "civil twilight")]
    CivilTwilight,
    #[serde(rename = "nautical twilight")]
    NauticalTwilight,
    #[serde(rename = "astronomical twilight")]
    AstronomicalTwilight,
    #[serde(rename = "night")]
    Night,
}

impl ConditionState for SunState {
    const COMPONENT: Component = Component::Sun;

    fn label(&self) -> &'static str {
        match self {
            SunState::Day => "day",
            SunState::CivilTwilight => "civil twilight",
            SunState::NauticalTwilight => "nautical twilight",
            SunState::AstronomicalTwilight => "astronomical twilight",
            SunState::Night => "night",
        }
    }
}

/// Moon state by elevation band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MoonState {
    #[serde(rename = "moon up")]
    Up,
    #[serde(rename = "moon twilight")]
    Twilight,
    #[serde(rename = "moon down")]
    Down,
}

impl ConditionState for MoonState {
    const COMPONENT: Component = Component::Moon;

    fn label(&self) -> &'static str {
        match self {
            MoonState::Up => "moon up",
            MoonState::Twilight => "moon twilight",
            MoonState::Down => "moon down",
        }
    }
}

/// Combined darkness of the sky.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SkyState {
    #[serde(rename = "dark")]
    Dark,
    #[serde(rename = "not dark")]
    NotDark,
}

impl ConditionState for SkyState {
    const COMPONENT: Component = Component::Sky;

    fn label(&self) -> &'static str {
        match self {
            SkyState::Dark => "dark",
            SkyState::NotDark => "not dark",
        }
    }
}

macro_rules! impl_display_via_label {
    ($($state:ty),+) => {
        $(impl std::fmt::Display for $state {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        })+
    };
}

impl_display_via_label!(SunState, MoonState, SkyState);

pub fn classify_sun(elevation: f64) -> SunState {
    if elevation >= SUN_DAY_THRESHOLD {
        SunState::Day
    } else if elevation >= SUN_CIVIL_TWILIGHT_THRESHOLD {
        SunState::CivilTwilight
    } else if elevation >= SUN_NAUTICAL_TWILIGHT_THRESHOLD {
        SunState::NauticalTwilight
    } else if elevation >= SUN_ASTRONOMICAL_TWILIGHT_THRESHOLD {
        SunState::AstronomicalTwilight
    } else {
        SunState::Night
    }
}

pub fn classify_moon(elevation: f64) -> MoonState {
    if elevation >= MOON_UP_THRESHOLD {
        MoonState::Up
    } else if elevation >= MOON_DARKNESS_THRESHOLD {
        MoonState::Twilight
    } else {
        MoonState::Down
    }
}

/// Dark only when the sun is in full night and the moon is below its darkness threshold.
pub fn classify_sky(sun: SunState, moon: MoonState) -> SkyState {
    if sun == SunState::Night && moon == MoonState::Down {
        SkyState::Dark
    } else {
        SkyState::NotDark
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sun_bands_closed_on_lower_bound() {
        assert_eq!(classify_sun(45.0), SunState::Day);
        assert_eq!(classify_sun(0.0), SunState::Day);
        assert_eq!(classify_sun(-0.001), SunState::CivilTwilight);
        assert_eq!(classify_sun(-6.0), SunState::CivilTwilight);
        assert_eq!(classify_sun(-6.001), SunState::NauticalTwilight);
        assert_eq!(classify_sun(-12.0), SunState::NauticalTwilight);
        assert_eq!(classify_sun(-12.5), SunState::AstronomicalTwilight);
        assert_eq!(classify_sun(-18.0), SunState::AstronomicalTwilight);
        assert_eq!(classify_sun(-18.001), SunState::Night);
        assert_eq!(classify_sun(-80.0), SunState::Night);
    }

    #[test]
    fn test_moon_bands() {
        assert_eq!(classify_moon(10.0), MoonState::Up);
        assert_eq!(classify_moon(0.0), MoonState::Up);
        assert_eq!(classify_moon(-3.0), MoonState::Twilight);
        assert_eq!(classify_moon(-6.0), MoonState::Twilight);
        assert_eq!(classify_moon(-6.5), MoonState::Down);
    }

    #[test]
    fn test_sky_requires_night_and_moon_down() {
        assert_eq!(classify_sky(SunState::Night, MoonState::Down), SkyState::Dark);
        assert_eq!(
            classify_sky(SunState::Night, MoonState::Twilight),
            SkyState::NotDark
        );
        assert_eq!(
            classify_sky(SunState::AstronomicalTwilight, MoonState::Down),
            SkyState::NotDark
        );
        assert_eq!(classify_sky(SunState::Day, MoonState::Up), SkyState::NotDark);
    }

    #[test]
    fn test_labels_match_serialized_names() {
        for state in [
            SunState::Day,
            SunState::CivilTwilight,
            SunState::NauticalTwilight,
            SunState::AstronomicalTwilight,
            SunState::Night,
        ] {
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(json, format!("\"{}\"", state.label()));
        }
        assert_eq!(MoonState::Twilight.to_string(), "moon twilight");
        assert_eq!(SkyState::NotDark.to_string(), "not dark");
    }
}
