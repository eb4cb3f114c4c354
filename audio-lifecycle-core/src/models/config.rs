use std::fmt;
use std::ops::BitOr;

use serde::{Deserialize, Serialize};

use super::error::SessionError;

/// Session category requested from the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionCategory {
    Ambient,
    SoloAmbient,
    Playback,
    Record,
    PlayAndRecord,
    MultiRoute,
}

impl SessionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ambient => "ambient",
            Self::SoloAmbient => "solo_ambient",
            Self::Playback => "playback",
            Self::Record => "record",
            Self::PlayAndRecord => "play_and_record",
            Self::MultiRoute => "multi_route",
        }
    }

    pub fn records(&self) -> bool {
        matches!(self, Self::Record | Self::PlayAndRecord | Self::MultiRoute)
    }
}

/// Session mode requested from the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    Default,
    VoiceChat,
    VideoChat,
    GameChat,
    Measurement,
    MoviePlayback,
    SpokenAudio,
}

impl SessionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::VoiceChat => "voice_chat",
            Self::VideoChat => "video_chat",
            Self::GameChat => "game_chat",
            Self::Measurement => "measurement",
            Self::MoviePlayback => "movie_playback",
            Self::SpokenAudio => "spoken_audio",
        }
    }
}

/// Raw category option bits (mixing and routing hints).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryOptions(u32);

impl CategoryOptions {
    pub const NONE: Self = Self(0);
    pub const MIX_WITH_OTHERS: Self = Self(0x1);
    pub const DUCK_OTHERS: Self = Self(0x2);
    pub const ALLOW_BLUETOOTH: Self = Self(0x4);
    pub const DEFAULT_TO_SPEAKER: Self = Self(0x8);

    const ALL: u32 = 0xF;

    pub fn from_raw(raw: u32) -> Option<Self> {
        (raw & !Self::ALL == 0).then_some(Self(raw))
    }

    pub fn raw(&self) -> u32 {
        self.0
    }

    pub fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Options that change the input/output route rather than mixing.
    fn routes(&self) -> bool {
        self.contains(Self::DEFAULT_TO_SPEAKER) || self.contains(Self::ALLOW_BLUETOOTH)
    }
}

impl BitOr for CategoryOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Display for CategoryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Category, mode and routing applied to the device-wide session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfiguration {
    pub category: SessionCategory,
    pub mode: SessionMode,
    #[serde(default)]
    pub options: CategoryOptions,
}

impl SessionConfiguration {
    /// Reject combinations no platform accepts before touching the backend.
    pub fn validate(&self) -> Result<(), SessionError> {
        let play_and_record = self.category == SessionCategory::PlayAndRecord;

        if self.options.routes() && !play_and_record {
            return Err(SessionError::ConfigurationRejected(format!(
                "routing options {} require play_and_record, got {}",
                self.options,
                self.category.as_str()
            )));
        }

        match self.mode {
            SessionMode::VoiceChat | SessionMode::VideoChat | SessionMode::GameChat
                if !play_and_record =>
            {
                Err(SessionError::ConfigurationRejected(format!(
                    "mode {} requires play_and_record, got {}",
                    self.mode.as_str(),
                    self.category.as_str()
                )))
            }
            SessionMode::Measurement
                if !matches!(
                    self.category,
                    SessionCategory::Record
                        | SessionCategory::Playback
                        | SessionCategory::PlayAndRecord
                ) =>
            {
                Err(SessionError::ConfigurationRejected(format!(
                    "mode measurement is not supported with {}",
                    self.category.as_str()
                )))
            }
            _ => Ok(()),
        }
    }
}

impl Default for SessionConfiguration {
    fn default() -> Self {
        Self {
            category: SessionCategory::PlayAndRecord,
            mode: SessionMode::Measurement,
            options: CategoryOptions::DEFAULT_TO_SPEAKER,
        }
    }
}

/// Coordinator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfiguration {
    pub session: SessionConfiguration,

    /// Logical name of the bundled sample (default: "sound").
    pub resource_name: String,

    /// Extension of the bundled sample (default: "wav").
    pub resource_extension: String,

    /// Keep session + capture running when a playback-last ordering fails
    /// to load its sample (default: true). When false every load failure
    /// rolls back to idle.
    pub retain_capture_on_load_failure: bool,

    /// Output volume for created playback units, 0.0–1.0 (default: 1.0).
    pub playback_volume: f32,
}

impl LifecycleConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        self.session.validate().map_err(|e| e.to_string())?;
        if self.resource_name.trim().is_empty() {
            return Err("resource name must not be empty".into());
        }
        if !(0.0..=1.0).contains(&self.playback_volume) {
            return Err(format!("playback volume out of range: {}", self.playback_volume));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| format!("invalid configuration: {}", e))?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for LifecycleConfiguration {
    fn default() -> Self {
        Self {
            session: SessionConfiguration::default(),
            resource_name: "sound".into(),
            resource_extension: "wav".into(),
            retain_capture_on_load_failure: true,
            playback_volume: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_session_is_valid() {
        assert!(SessionConfiguration::default().validate().is_ok());
        assert!(LifecycleConfiguration::default().validate().is_ok());
    }

    #[test]
    fn speaker_routing_requires_play_and_record() {
        let config = SessionConfiguration {
            category: SessionCategory::Playback,
            mode: SessionMode::Default,
            options: CategoryOptions::DEFAULT_TO_SPEAKER,
        };
        assert!(matches!(
            config.validate(),
            Err(SessionError::ConfigurationRejected(_))
        ));
    }

    #[test]
    fn voice_chat_requires_play_and_record() {
        let config = SessionConfiguration {
            category: SessionCategory::Record,
            mode: SessionMode::VoiceChat,
            options: CategoryOptions::NONE,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn measurement_rejected_for_ambient() {
        let config = SessionConfiguration {
            category: SessionCategory::Ambient,
            mode: SessionMode::Measurement,
            options: CategoryOptions::MIX_WITH_OTHERS,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn option_bits_combine() {
        let opts = CategoryOptions::DEFAULT_TO_SPEAKER | CategoryOptions::ALLOW_BLUETOOTH;
        assert_eq!(opts.raw(), 0xC);
        assert!(opts.contains(CategoryOptions::ALLOW_BLUETOOTH));
        assert_eq!(CategoryOptions::from_raw(0x10), None);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = LifecycleConfiguration::from_json(
            r#"{ "resource_name": "click", "retain_capture_on_load_failure": false }"#,
        )
        .unwrap();

        assert_eq!(config.resource_name, "click");
        assert_eq!(config.resource_extension, "wav");
        assert!(!config.retain_capture_on_load_failure);
        assert_eq!(config.session, SessionConfiguration::default());
    }

    #[test]
    fn json_with_invalid_session_is_rejected() {
        let json = r#"{ "session": { "category": "ambient", "mode": "voice_chat" } }"#;
        assert!(LifecycleConfiguration::from_json(json).is_err());
    }

    #[test]
    fn volume_out_of_range_is_rejected() {
        let config = LifecycleConfiguration {
            playback_volume: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
