//! Per-model gesture configurations.
//!
//! A gesture configuration is a JSON document that decides what each gesture does while a given 3D
//! model is on screen:
//!
//! ```json
//! {
//!   "modelName": "Human Heart",
//!   "gestureMap": { "pinch": "zoomIn", "openPalm": "resetView" },
//!   "animations": { "heartbeat": { "duration": 800, "loop": true } },
//!   "hotspots": [{ "name": "aorta", "position": [0.1, 0.4, 0.0] }]
//! }
//! ```
//!
//! Only `gestureMap` is required. Configurations are validated when they are created, so a
//! [`GestureConfiguration`] value is always well-formed.

use std::{collections::HashSet, fs::File, io, io::BufReader, path::Path};

use anyhow::{bail, ensure, Context};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Suffix appended to a model's base name to form its configuration file name.
pub const CONFIG_FILE_SUFFIX: &str = "_gestureConfig.json";

const FALLBACK_MODEL_NAME: &str = "Demo Model";

const FALLBACK_GESTURE_MAP: &[(&str, &str)] = &[
    ("pinch", "zoomIn"),
    ("pinchOut", "zoomOut"),
    ("openPalm", "resetView"),
    ("swipeLeft", "rotateLeft"),
    ("swipeRight", "rotateRight"),
    ("swipeUp", "rotateUp"),
    ("swipeDown", "rotateDown"),
];

/// Returns the name of the configuration file belonging to a model file.
///
/// A trailing `.glb` extension is removed: `Heart.glb` is configured by `Heart_gestureConfig.json`.
pub fn config_file_name(model_file: &str) -> String {
    let base = model_file.strip_suffix(".glb").unwrap_or(model_file);
    format!("{base}{CONFIG_FILE_SUFFIX}")
}

/// Free-form parameters of a named animation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AnimationConfig {
    properties: Map<String, Value>,
}

impl AnimationConfig {
    pub fn new(properties: Map<String, Value>) -> Self {
        Self { properties }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }
}

/// A named point of interest on a model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotspotConfig {
    name: String,
    #[serde(flatten)]
    properties: Map<String, Value>,
}

impl HotspotConfig {
    /// Creates a hotspot. `properties` must not contain a `name` key.
    pub fn new(name: impl Into<String>, properties: Map<String, Value>) -> anyhow::Result<Self> {
        let name = name.into();
        ensure!(!name.is_empty(), "hotspot name must not be empty");
        ensure!(
            !properties.contains_key("name"),
            "hotspot `{name}` has a second `name` property"
        );
        Ok(Self { name, properties })
    }

    fn from_value(index: usize, value: Value) -> anyhow::Result<Self> {
        let Value::Object(mut properties) = value else {
            bail!("hotspot #{index} is not an object");
        };
        let name = match properties.remove("name") {
            Some(Value::String(name)) if !name.is_empty() => name,
            Some(Value::String(_)) => bail!("hotspot #{index} has an empty `name`"),
            Some(_) => bail!("hotspot #{index} has a non-string `name`"),
            None => bail!("hotspot #{index} has no `name`"),
        };
        Ok(Self { name, properties })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Every property except `name`.
    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }
}

/// The configuration document as it appears on disk, before validation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfiguration {
    #[serde(default)]
    model_name: Option<String>,
    #[serde(default)]
    gesture_map: Option<Map<String, Value>>,
    #[serde(default)]
    animations: Map<String, Value>,
    #[serde(default)]
    hotspots: Vec<Value>,
}

/// Validated gesture-to-action bindings of one model, plus its animations and hotspots.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureConfiguration {
    model_name: Option<String>,
    /// Gesture name and action name, in document order.
    gesture_map: Vec<(String, String)>,
    animations: Vec<(String, AnimationConfig)>,
    hotspots: Vec<HotspotConfig>,
}

impl GestureConfiguration {
    /// Creates a configuration from gesture-action pairs.
    ///
    /// Fails if there are no bindings, a gesture or action name is empty, or a gesture is bound
    /// more than once.
    pub fn new<I, G, A>(bindings: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (G, A)>,
        G: Into<String>,
        A: Into<String>,
    {
        let gesture_map: Vec<(String, String)> = bindings
            .into_iter()
            .map(|(g, a)| (g.into(), a.into()))
            .collect();
        let mut seen = HashSet::new();
        for (gesture, _) in &gesture_map {
            ensure!(
                seen.insert(gesture.as_str()),
                "gesture `{gesture}` is bound more than once"
            );
        }
        let this = Self {
            model_name: None,
            gesture_map,
            animations: Vec::new(),
            hotspots: Vec::new(),
        };
        this.validate_gesture_map()?;
        Ok(this)
    }

    /// The default configuration used when a model's configuration cannot be loaded.
    ///
    /// Binds pinching to zooming, the open palm to resetting the view, and swipes to rotations.
    pub fn fallback(model_name: Option<&str>) -> Self {
        Self {
            model_name: Some(model_name.unwrap_or(FALLBACK_MODEL_NAME).to_string()),
            gesture_map: FALLBACK_GESTURE_MAP
                .iter()
                .map(|&(g, a)| (g.to_string(), a.to_string()))
                .collect(),
            animations: Vec::new(),
            hotspots: Vec::new(),
        }
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let value: Value =
            serde_json::from_str(json).context("gesture configuration is not valid JSON")?;
        Self::from_value(value)
    }

    pub fn from_reader<R: io::Read>(reader: R) -> anyhow::Result<Self> {
        let value: Value =
            serde_json::from_reader(reader).context("gesture configuration is not valid JSON")?;
        Self::from_value(value)
    }

    /// Loads and validates a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open gesture configuration '{}'", path.display()))?;
        let config = Self::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to load gesture configuration '{}'", path.display()))?;
        log::debug!(
            "loaded gesture configuration '{}' ({} gestures)",
            path.display(),
            config.gesture_map.len()
        );
        Ok(config)
    }

    /// Validates an already parsed configuration document.
    pub fn from_value(value: Value) -> anyhow::Result<Self> {
        let raw: RawConfiguration =
            serde_json::from_value(value).context("malformed gesture configuration")?;

        let Some(map) = raw.gesture_map else {
            bail!("gesture configuration has no `gestureMap`");
        };
        let mut gesture_map = Vec::with_capacity(map.len());
        for (gesture, action) in map {
            match action {
                Value::String(action) => gesture_map.push((gesture, action)),
                other => bail!("action for gesture `{gesture}` is not a string: {other}"),
            }
        }

        let mut animations = Vec::with_capacity(raw.animations.len());
        for (name, animation) in raw.animations {
            match animation {
                Value::Object(properties) => {
                    animations.push((name, AnimationConfig::new(properties)))
                }
                other => bail!("animation `{name}` is not an object: {other}"),
            }
        }

        let hotspots = raw
            .hotspots
            .into_iter()
            .enumerate()
            .map(|(i, value)| HotspotConfig::from_value(i, value))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let this = Self {
            model_name: raw.model_name,
            gesture_map,
            animations,
            hotspots,
        };
        this.validate_gesture_map()?;
        Ok(this)
    }

    fn validate_gesture_map(&self) -> anyhow::Result<()> {
        ensure!(!self.gesture_map.is_empty(), "`gestureMap` is empty");
        for (gesture, action) in &self.gesture_map {
            ensure!(!gesture.is_empty(), "`gestureMap` contains an empty gesture name");
            ensure!(!action.is_empty(), "action for gesture `{gesture}` is empty");
        }
        Ok(())
    }

    pub fn with_model_name(self, model_name: impl Into<String>) -> Self {
        Self {
            model_name: Some(model_name.into()),
            ..self
        }
    }

    /// Adds or replaces a named animation.
    pub fn with_animation(
        mut self,
        name: impl Into<String>,
        animation: AnimationConfig,
    ) -> anyhow::Result<Self> {
        let name = name.into();
        ensure!(!name.is_empty(), "animation name must not be empty");
        match self.animations.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = animation,
            None => self.animations.push((name, animation)),
        }
        Ok(self)
    }

    pub fn with_hotspot(mut self, hotspot: HotspotConfig) -> Self {
        self.hotspots.push(hotspot);
        self
    }

    pub fn model_name(&self) -> Option<&str> {
        self.model_name.as_deref()
    }

    /// Returns the action bound to `gesture`.
    pub fn action_for(&self, gesture: &str) -> Option<&str> {
        self.gesture_map
            .iter()
            .find(|(g, _)| g == gesture)
            .map(|(_, action)| action.as_str())
    }

    /// Returns all gesture-action bindings in document order.
    pub fn bindings(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.gesture_map
            .iter()
            .map(|(g, a)| (g.as_str(), a.as_str()))
    }

    pub fn animation(&self, name: &str) -> Option<&AnimationConfig> {
        self.animations
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, animation)| animation)
    }

    pub fn animation_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.animations.iter().map(|(name, _)| name.as_str())
    }

    /// Returns the first hotspot named `name`.
    pub fn hotspot(&self, name: &str) -> Option<&HotspotConfig> {
        self.hotspots.iter().find(|h| h.name == name)
    }

    pub fn hotspots(&self) -> &[HotspotConfig] {
        &self.hotspots
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const HEART: &str = r#"{
        "modelName": "Human Heart",
        "gestureMap": {
            "pinch": "zoomIn",
            "openPalm": "resetView",
            "peace": "highlightAorta",
            "fist": "pauseAnimation"
        },
        "animations": {
            "heartbeat": { "duration": 800, "loop": true }
        },
        "hotspots": [
            { "name": "aorta", "position": [0.1, 0.4, 0.0] },
            { "name": "leftVentricle", "position": [-0.2, -0.1, 0.1] },
            { "name": "aorta", "position": [9.0, 9.0, 9.0] }
        ]
    }"#;

    #[test]
    fn parse() {
        let config = GestureConfiguration::from_json(HEART).unwrap();
        assert_eq!(config.model_name(), Some("Human Heart"));
        let gestures: Vec<_> = config.bindings().map(|(g, _)| g).collect();
        assert_eq!(gestures, ["pinch", "openPalm", "peace", "fist"]);
        assert_eq!(config.action_for("peace"), Some("highlightAorta"));
        assert_eq!(config.action_for("thumbsUp"), None);

        let heartbeat = config.animation("heartbeat").unwrap();
        assert_eq!(heartbeat.get("duration"), Some(&json!(800)));
        assert!(config.animation("spin").is_none());

        let aorta = config.hotspot("aorta").unwrap();
        assert_eq!(aorta.get("position"), Some(&json!([0.1, 0.4, 0.0])));
        assert!(aorta.get("name").is_none());
        assert!(config.hotspot("earth").is_none());
    }

    #[test]
    fn optional_sections() {
        let config = GestureConfiguration::from_json(r#"{"gestureMap": {"pinch": "zoomIn"}}"#)
            .unwrap();
        assert_eq!(config.model_name(), None);
        assert_eq!(config.animation_names().count(), 0);
        assert!(config.hotspots().is_empty());
    }

    #[test]
    fn rejects_malformed() {
        let cases = [
            ("{}", "no `gestureMap`"),
            (r#"{"gestureMap": {}}"#, "empty"),
            (r#"{"gestureMap": {"pinch": ""}}"#, "`pinch` is empty"),
            (r#"{"gestureMap": {"": "zoomIn"}}"#, "empty gesture name"),
            (r#"{"gestureMap": {"pinch": null}}"#, "not a string"),
            (r#"{"gestureMap": {"pinch": 3}}"#, "not a string"),
            (
                r#"{"gestureMap": {"pinch": "zoomIn"}, "animations": {"spin": 4}}"#,
                "animation `spin`",
            ),
            (
                r#"{"gestureMap": {"pinch": "zoomIn"}, "hotspots": [{"position": [0, 0, 0]}]}"#,
                "no `name`",
            ),
            (
                r#"{"gestureMap": {"pinch": "zoomIn"}, "hotspots": [{"name": ""}]}"#,
                "empty `name`",
            ),
            (
                r#"{"gestureMap": {"pinch": "zoomIn"}, "hotspots": ["aorta"]}"#,
                "not an object",
            ),
        ];
        for (json, message) in cases {
            let err = GestureConfiguration::from_json(json).unwrap_err();
            assert!(
                format!("{err:#}").contains(message),
                "{json}: expected `{message}`, got `{err:#}`"
            );
        }

        assert!(GestureConfiguration::from_json(r#"{"gestureMap": ["pinch"]}"#).is_err());
        assert!(GestureConfiguration::from_json("not json").is_err());
    }

    #[test]
    fn programmatic() {
        let config = GestureConfiguration::new([("pinch", "zoomIn"), ("fist", "spin")])
            .unwrap()
            .with_model_name("Solar System")
            .with_animation("orbit", AnimationConfig::new(Map::new()))
            .unwrap()
            .with_hotspot(HotspotConfig::new("earth", Map::new()).unwrap());
        assert_eq!(config.model_name(), Some("Solar System"));
        assert_eq!(config.action_for("fist"), Some("spin"));
        assert!(config.animation("orbit").is_some());
        assert_eq!(config.hotspot("earth").unwrap().name(), "earth");

        assert!(GestureConfiguration::new(Vec::<(String, String)>::new()).is_err());
        assert!(GestureConfiguration::new([("pinch", "zoomIn"), ("pinch", "zoomOut")]).is_err());
        assert!(GestureConfiguration::new([("pinch", "")]).is_err());
        assert!(HotspotConfig::new("", Map::new()).is_err());
    }

    #[test]
    fn fallback() {
        let config = GestureConfiguration::fallback(None);
        assert_eq!(config.model_name(), Some("Demo Model"));
        assert_eq!(config.action_for("pinchOut"), Some("zoomOut"));
        assert_eq!(config.action_for("swipeDown"), Some("rotateDown"));
        assert_eq!(config.bindings().count(), 7);
        assert_eq!(
            GestureConfiguration::fallback(Some("Heart")).model_name(),
            Some("Heart")
        );
    }

    #[test]
    fn file_names() {
        assert_eq!(config_file_name("Heart.glb"), "Heart_gestureConfig.json");
        assert_eq!(config_file_name("SolarSystem"), "SolarSystem_gestureConfig.json");
    }

    #[test]
    fn load_missing_file() {
        let err = GestureConfiguration::load("/nonexistent/Heart_gestureConfig.json").unwrap_err();
        assert!(err.to_string().contains("Heart_gestureConfig.json"), "{err}");
    }

    #[test]
    fn hotspot_serializes_flat() {
        let config = GestureConfiguration::from_json(HEART).unwrap();
        assert_eq!(
            serde_json::to_value(config.hotspot("leftVentricle").unwrap()).unwrap(),
            json!({"name": "leftVentricle", "position": [-0.2, -0.1, 0.1]})
        );
    }
}
