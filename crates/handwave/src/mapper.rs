//! Gesture-to-action mapping.

use std::time::{SystemTime, UNIX_EPOCH};

use itertools::Itertools;
use serde::Serialize;

use crate::{
    action::{ActionConfig, ActionKind},
    classify::GestureMatch,
    config::{AnimationConfig, GestureConfiguration, HotspotConfig},
    event::GestureEvent,
};

/// An action to perform in response to a gesture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionDescriptor {
    pub gesture: String,
    pub action: String,
    /// The built-in action named by `action`, if there is one.
    #[serde(skip)]
    pub kind: Option<ActionKind>,
    pub confidence: f32,
    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub config: ActionConfig,
}

/// Translates gesture names into [`ActionDescriptor`]s according to a [`GestureConfiguration`].
///
/// The mapper is immutable. Every lookup is a pure function of the configuration, except for the
/// timestamp recorded in descriptors.
#[derive(Debug, Clone)]
pub struct GestureMapper {
    config: GestureConfiguration,
}

impl GestureMapper {
    pub fn new(config: GestureConfiguration) -> Self {
        log::debug!(
            "gesture mapping for {}: {}",
            config.model_name().unwrap_or("unnamed model"),
            config
                .bindings()
                .map(|(gesture, action)| format!("{gesture} -> {action}"))
                .format(", ")
        );
        for (gesture, action) in config.bindings() {
            if ActionKind::from_name(action).is_none() {
                log::debug!("`{gesture}` is bound to `{action}`, which has no built-in parameters");
            }
        }
        Self { config }
    }

    /// Parses and validates a configuration, and creates a mapper for it.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        GestureConfiguration::from_json(json).map(Self::new)
    }

    pub fn configuration(&self) -> &GestureConfiguration {
        &self.config
    }

    /// Returns the action bound to `gesture`, or `None` if the gesture is not configured.
    pub fn map_gesture(&self, gesture: &str) -> Option<&str> {
        self.config.action_for(gesture)
    }

    /// Returns the configured gesture names, in configuration order.
    pub fn available_gestures(&self) -> Vec<&str> {
        self.config.bindings().map(|(gesture, _)| gesture).collect()
    }

    /// Maps a gesture recognized with full confidence.
    pub fn process_gesture(&self, gesture: &str) -> Option<ActionDescriptor> {
        self.process_gesture_with_confidence(gesture, 1.0)
    }

    /// Maps a gesture to the action to perform, including the action's parameters.
    ///
    /// Returns `None` if no action is bound to `gesture`.
    pub fn process_gesture_with_confidence(
        &self,
        gesture: &str,
        confidence: f32,
    ) -> Option<ActionDescriptor> {
        let action = self.map_gesture(gesture)?;
        let descriptor = ActionDescriptor {
            gesture: gesture.to_string(),
            action: action.to_string(),
            kind: ActionKind::from_name(action),
            confidence,
            timestamp: now_millis(),
            config: self.action_config(action),
        };
        log::debug!(
            "{gesture} -> {action} {} (confidence {confidence:.2})",
            descriptor.config
        );
        Some(descriptor)
    }

    /// Maps the gesture a detector event starts, if the event starts one.
    pub fn process_event(&self, event: &GestureEvent) -> Option<ActionDescriptor> {
        self.process_gesture(event.gesture_name()?)
    }

    /// Maps a classifier result, keeping its confidence.
    pub fn process_match(&self, m: &GestureMatch) -> Option<ActionDescriptor> {
        self.process_gesture_with_confidence(m.gesture.as_str(), m.confidence)
    }

    /// Returns the fixed parameters of the action named `action`. Unknown actions have none.
    pub fn action_config(&self, action: &str) -> ActionConfig {
        ActionConfig::for_action(action)
    }

    pub fn animation(&self, name: &str) -> Option<&AnimationConfig> {
        self.config.animation(name)
    }

    pub fn hotspot(&self, name: &str) -> Option<&HotspotConfig> {
        self.config.hotspot(name)
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64)
}
