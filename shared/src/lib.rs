use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// ===== SLICE TYPES =====

/// Position of a viewport inside its slice range.
///
/// When `total_slices > 0` the current index always lies in
/// `0..total_slices`. An empty range renders the scrollbar at its minimum.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SliceState {
    pub current_index: usize,
    pub total_slices: usize,
}

impl SliceState {
    pub const EMPTY: SliceState = SliceState {
        current_index: 0,
        total_slices: 0,
    };

    /// Builds a state, clamping the index into the slice range.
    pub fn new(current_index: usize, total_slices: usize) -> Self {
        Self {
            current_index,
            total_slices,
        }
        .clamped()
    }

    pub fn is_valid(&self) -> bool {
        self.total_slices == 0 || self.current_index < self.total_slices
    }

    /// Highest index the scrollbar can reach, `0` for an empty range.
    pub fn max_index(&self) -> usize {
        self.total_slices.saturating_sub(1)
    }

    pub fn clamped(self) -> Self {
        if self.is_valid() {
            return self;
        }
        Self {
            current_index: self.max_index(),
            total_slices: self.total_slices,
        }
    }
}

impl fmt::Display for SliceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.current_index, self.total_slices)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AddressingKind {
    /// Flat ordered sequence of images addressed by id.
    Stack,
    /// Reformatted volume whose slice position is derived.
    Volumetric,
}

impl AddressingKind {
    /// Native event kind a viewport of this kind emits when it navigates.
    pub fn event_kind(self) -> ViewportEventKind {
        match self {
            AddressingKind::Stack => ViewportEventKind::StackNavigation,
            AddressingKind::Volumetric => ViewportEventKind::VolumeSliceChanged,
        }
    }
}

impl fmt::Display for AddressingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressingKind::Stack => f.write_str("stack"),
            AddressingKind::Volumetric => f.write_str("volumetric"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ImageId(pub String);

impl From<&str> for ImageId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ===== NATIVE VIEWPORT EVENTS =====

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackNavigationEvent {
    pub new_index: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeSliceChangedEvent {
    pub current_index: usize,
    pub total_slices: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewportEvent {
    StackNavigation(StackNavigationEvent),
    VolumeSliceChanged(VolumeSliceChangedEvent),
}

impl ViewportEvent {
    pub fn kind(&self) -> ViewportEventKind {
        match self {
            ViewportEvent::StackNavigation(_) => ViewportEventKind::StackNavigation,
            ViewportEvent::VolumeSliceChanged(_) => ViewportEventKind::VolumeSliceChanged,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ViewportEventKind {
    StackNavigation,
    VolumeSliceChanged,
}

// ===== SCROLLBAR RENDER MODEL =====

/// Inputs of the scrollbar widget.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ScrollbarProps {
    pub value: usize,
    pub max: usize,
    pub height: String,
}

impl ScrollbarProps {
    pub fn from_slice_state(state: SliceState, height: impl Into<String>) -> Self {
        Self {
            value: state.current_index,
            max: state.max_index(),
            height: height.into(),
        }
    }
}

// ===== CONFIG TYPES =====

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse scrollbar config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize scrollbar config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("unsupported config version '{version}'")]
    UnsupportedVersion { version: String },
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ScrollbarConfig {
    pub app: AppSection,
    pub scrollbar: ScrollbarSection,
}

impl ScrollbarConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: ScrollbarConfig = toml::from_str(source)?;
        if !config.app.is_supported_version() {
            return Err(ConfigError::UnsupportedVersion {
                version: config.app.version,
            });
        }
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Quiescence window applied to scrollbar drags before navigating.
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.scrollbar.debounce_ms)
    }
}

/// Config format version; files written by any other version are rejected.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AppSection {
    pub version: String,
}

impl AppSection {
    /// Current configuration format version
    pub const CURRENT_VERSION: &'static str = "1.0.0";

    pub fn is_supported_version(&self) -> bool {
        self.version == Self::CURRENT_VERSION
    }
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ScrollbarSection {
    pub debounce_ms: u64,
    pub height: String,
}

impl ScrollbarSection {
    pub const DEFAULT_DEBOUNCE_MS: u64 = 40;
    pub const DEFAULT_HEIGHT: &'static str = "100px";
}

impl Default for ScrollbarSection {
    fn default() -> Self {
        Self {
            debounce_ms: Self::DEFAULT_DEBOUNCE_MS,
            height: Self::DEFAULT_HEIGHT.to_string(),
        }
    }
}
