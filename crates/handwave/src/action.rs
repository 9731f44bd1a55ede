//! The built-in table of viewer actions and their parameters.
//!
//! Gesture configurations map gesture names to action names. The actions a viewer knows how to
//! perform form a closed set, [`ActionKind`], and every one of them comes with a fixed parameter
//! set. Action names outside that set are still allowed in configurations, they just carry no
//! parameters.

use std::fmt;

use serde::{ser::SerializeMap, Serialize, Serializer};

/// Axis a rotation is performed about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn as_str(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    EaseInOut,
}

impl Easing {
    pub fn as_str(self) -> &'static str {
        match self {
            Easing::EaseInOut => "easeInOut",
        }
    }
}

/// What an action does to the scene, with typed parameters.
///
/// Durations are in milliseconds, angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionEffect {
    /// Multiplies the camera zoom by `factor`.
    Zoom { factor: f64, duration: u32 },
    /// Rotates the model by `angle` about `axis`.
    Rotate { angle: f64, axis: Axis, duration: u32 },
    /// Returns the camera to its initial position.
    Reset { duration: u32, easing: Easing },
    /// Pauses or resumes the model's animation.
    ToggleAnimation,
    /// Highlights the named hotspot for `duration`.
    Highlight {
        hotspot: &'static str,
        duration: u32,
    },
    /// Multiplies the simulation time scale.
    TimeScale { multiplier: f64 },
    /// Zooms onto the named hotspot.
    Focus { hotspot: &'static str, zoom: f64 },
    /// Toggles orbit lines at the given opacity.
    ShowOrbits { opacity: f64 },
}

impl ActionEffect {
    /// Renders the effect as a flat parameter record.
    pub fn config(&self) -> ActionConfig {
        use ParamValue::*;

        let params: Vec<(&'static str, ParamValue)> = match *self {
            ActionEffect::Zoom { factor, duration } => {
                vec![("factor", Number(factor)), ("duration", duration.into())]
            }
            ActionEffect::Rotate {
                angle,
                axis,
                duration,
            } => vec![
                ("angle", Number(angle)),
                ("axis", Text(axis.as_str())),
                ("duration", duration.into()),
            ],
            ActionEffect::Reset { duration, easing } => vec![
                ("duration", duration.into()),
                ("easing", Text(easing.as_str())),
            ],
            ActionEffect::ToggleAnimation => vec![("toggle", Bool(true))],
            ActionEffect::Highlight { hotspot, duration } => {
                vec![("hotspot", Text(hotspot)), ("duration", duration.into())]
            }
            ActionEffect::TimeScale { multiplier } => vec![("multiplier", Number(multiplier))],
            ActionEffect::Focus { hotspot, zoom } => {
                vec![("hotspot", Text(hotspot)), ("zoom", Number(zoom))]
            }
            ActionEffect::ShowOrbits { opacity } => {
                vec![("toggle", Bool(true)), ("opacity", Number(opacity))]
            }
        };
        params.into_iter().collect()
    }
}

/// The actions a viewer knows how to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    ZoomIn,
    ZoomOut,
    RotateLeft,
    RotateRight,
    RotateUp,
    RotateDown,
    ResetView,
    PauseAnimation,
    HighlightAorta,
    HighlightVentricles,
    SpeedUpTime,
    SlowDownTime,
    FocusEarth,
    ShowOrbits,
}

impl ActionKind {
    pub const ALL: [Self; 14] = [
        Self::ZoomIn,
        Self::ZoomOut,
        Self::RotateLeft,
        Self::RotateRight,
        Self::RotateUp,
        Self::RotateDown,
        Self::ResetView,
        Self::PauseAnimation,
        Self::HighlightAorta,
        Self::HighlightVentricles,
        Self::SpeedUpTime,
        Self::SlowDownTime,
        Self::FocusEarth,
        Self::ShowOrbits,
    ];

    /// Returns the action's name as used in gesture configurations.
    pub fn name(self) -> &'static str {
        match self {
            Self::ZoomIn => "zoomIn",
            Self::ZoomOut => "zoomOut",
            Self::RotateLeft => "rotateLeft",
            Self::RotateRight => "rotateRight",
            Self::RotateUp => "rotateUp",
            Self::RotateDown => "rotateDown",
            Self::ResetView => "resetView",
            Self::PauseAnimation => "pauseAnimation",
            Self::HighlightAorta => "highlightAorta",
            Self::HighlightVentricles => "highlightVentricles",
            Self::SpeedUpTime => "speedUpTime",
            Self::SlowDownTime => "slowDownTime",
            Self::FocusEarth => "focusEarth",
            Self::ShowOrbits => "showOrbits",
        }
    }

    /// Looks up an action by its configuration name. Matching is case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn effect(self) -> ActionEffect {
        const ROTATE_ANGLE: f64 = 15.0;
        const ROTATE_DURATION: u32 = 500;
        const ZOOM_DURATION: u32 = 300;
        const HIGHLIGHT_DURATION: u32 = 2000;

        match self {
            Self::ZoomIn => ActionEffect::Zoom {
                factor: 1.2,
                duration: ZOOM_DURATION,
            },
            Self::ZoomOut => ActionEffect::Zoom {
                factor: 0.8,
                duration: ZOOM_DURATION,
            },
            Self::RotateLeft => ActionEffect::Rotate {
                angle: -ROTATE_ANGLE,
                axis: Axis::Y,
                duration: ROTATE_DURATION,
            },
            Self::RotateRight => ActionEffect::Rotate {
                angle: ROTATE_ANGLE,
                axis: Axis::Y,
                duration: ROTATE_DURATION,
            },
            Self::RotateUp => ActionEffect::Rotate {
                angle: -ROTATE_ANGLE,
                axis: Axis::X,
                duration: ROTATE_DURATION,
            },
            Self::RotateDown => ActionEffect::Rotate {
                angle: ROTATE_ANGLE,
                axis: Axis::X,
                duration: ROTATE_DURATION,
            },
            Self::ResetView => ActionEffect::Reset {
                duration: 1000,
                easing: Easing::EaseInOut,
            },
            Self::PauseAnimation => ActionEffect::ToggleAnimation,
            Self::HighlightAorta => ActionEffect::Highlight {
                hotspot: "aorta",
                duration: HIGHLIGHT_DURATION,
            },
            Self::HighlightVentricles => ActionEffect::Highlight {
                hotspot: "leftVentricle",
                duration: HIGHLIGHT_DURATION,
            },
            Self::SpeedUpTime => ActionEffect::TimeScale { multiplier: 2.0 },
            Self::SlowDownTime => ActionEffect::TimeScale { multiplier: 0.5 },
            Self::FocusEarth => ActionEffect::Focus {
                hotspot: "earth",
                zoom: 2.0,
            },
            Self::ShowOrbits => ActionEffect::ShowOrbits { opacity: 0.5 },
        }
    }

    pub fn config(self) -> ActionConfig {
        self.effect().config()
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single action parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Text(&'static str),
    Bool(bool),
}

impl ParamValue {
    pub fn as_number(&self) -> Option<f64> {
        match *self {
            ParamValue::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&'static str> {
        match *self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            ParamValue::Bool(b) => Some(b),
            _ => None,
        }
    }
}

impl From<u32> for ParamValue {
    fn from(n: u32) -> Self {
        ParamValue::Number(n.into())
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Number(n) => write!(f, "{n}"),
            ParamValue::Text(s) => write!(f, "{s:?}"),
            ParamValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Parameters of an action, in a fixed order. Serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionConfig {
    params: Vec<(&'static str, ParamValue)>,
}

impl ActionConfig {
    /// Returns the parameters of the action named `action`.
    ///
    /// Unknown action names yield an empty parameter set rather than an error, so that
    /// configurations may name actions this crate does not know about yet.
    pub fn for_action(action: &str) -> Self {
        ActionKind::from_name(action)
            .map(ActionKind::config)
            .unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<ParamValue> {
        self.params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, value)| *value)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key)?.as_number()
    }

    pub fn text(&self, key: &str) -> Option<&'static str> {
        self.get(key)?.as_text()
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        self.get(key)?.as_bool()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, ParamValue)> + '_ {
        self.params.iter().copied()
    }
}

impl FromIterator<(&'static str, ParamValue)> for ActionConfig {
    fn from_iter<I: IntoIterator<Item = (&'static str, ParamValue)>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().collect(),
        }
    }
}

impl Serialize for ActionConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.params.len()))?;
        for (key, value) in &self.params {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl fmt::Display for ActionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        f.write_str("}")
    }
}
