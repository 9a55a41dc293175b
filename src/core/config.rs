//! Configuration documents stored in a recording.
//!
//! Both `initial.toml` and `metadata.toml` are kept as generic
//! [`ConfigDocument`]s. The initial document is additionally validated once,
//! at load time, into a typed [`InitialConfig`].

use serde::Serialize;
use std::collections::BTreeMap;
use toml::{Table, Value};

use crate::util::{Error, Result, Transform};

/// Top-level keys every initial document must carry.
pub const REQUIRED_INITIAL_KEYS: [&str; 4] = ["fiducials", "lander", "rover", "cameras"];

/// Parsed structured document (nested key/value tables).
#[derive(Clone, Debug, Default)]
pub struct ConfigDocument {
    name: String,
    table: Table,
}

impl ConfigDocument {
    /// Parse a TOML document; `name` is the archive member it came from.
    pub fn parse(name: impl Into<String>, text: &str) -> Result<Self> {
        let name = name.into();
        let table = text.parse::<Table>().map_err(|e| Error::document(&name, e.message()))?;
        Ok(Self { name, table })
    }

    /// Member name the document was read from.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw top-level table.
    #[inline]
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Look up a value by dotted path, e.g. `"session.seed"`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut value = self.table.get(parts.next()?)?;
        for part in parts {
            value = value.as_table()?.get(part)?;
        }
        Some(value)
    }

    /// Check if a dotted path exists.
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// String value at a dotted path.
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path)?.as_str()
    }

    /// Numeric value at a dotted path; integers are widened.
    pub fn get_f64(&self, path: &str) -> Option<f64> {
        self.get(path).and_then(as_number)
    }

    /// Boolean value at a dotted path.
    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path)?.as_bool()
    }

    /// Top-level keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Per-camera settings from the initial document.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CameraConfig {
    /// Whether semantic segmentation images were captured.
    pub use_semantic: bool,
    /// Configured light intensity, used until the camera records its own state.
    pub light_intensity: f64,
    /// Every other key of the camera table, verbatim.
    pub extra: Table,
}

impl CameraConfig {
    fn from_table(camera: &str, table: &Table) -> std::result::Result<Self, String> {
        let use_semantic = match table.get("use_semantic") {
            Some(Value::Boolean(b)) => *b,
            Some(_) => return Err(format!("`cameras.{camera}.use_semantic` must be a boolean")),
            None => return Err(format!("missing required key `cameras.{camera}.use_semantic`")),
        };
        let light_intensity = match table.get("light_intensity") {
            Some(v) => as_number(v)
                .ok_or_else(|| format!("`cameras.{camera}.light_intensity` must be a number"))?,
            None => return Err(format!("missing required key `cameras.{camera}.light_intensity`")),
        };

        let extra = table
            .iter()
            .filter(|(k, _)| k.as_str() != "use_semantic" && k.as_str() != "light_intensity")
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Ok(Self { use_semantic, light_intensity, extra })
    }

    /// Extra key lookup (e.g. `"width"`).
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// Typed view of `initial.toml`.
#[derive(Clone, Debug, PartialEq)]
pub struct InitialConfig {
    /// Whether fiducial markers were present on the lander.
    pub fiducials: bool,
    /// Lander pose at mission start.
    pub lander: Transform,
    /// Rover pose at mission start.
    pub rover: Transform,
    /// Camera configuration keyed by camera name (sorted by name).
    pub cameras: BTreeMap<String, CameraConfig>,
}

impl InitialConfig {
    /// Validate an initial document.
    ///
    /// Every key in [`REQUIRED_INITIAL_KEYS`] must be present with the right shape.
    pub fn from_document(doc: &ConfigDocument) -> Result<Self> {
        let err = |reason: String| Error::document(doc.name(), reason);

        if let Some(key) = REQUIRED_INITIAL_KEYS.iter().find(|k| !doc.table.contains_key(**k)) {
            return Err(err(format!("missing required key `{key}`")));
        }

        let fiducials = doc
            .get_bool("fiducials")
            .ok_or_else(|| err("`fiducials` must be a boolean".into()))?;
        let lander = pose(doc, "lander")?;
        let rover = pose(doc, "rover")?;

        let cameras = doc
            .get("cameras")
            .and_then(Value::as_table)
            .ok_or_else(|| err("`cameras` must be a table".into()))?
            .iter()
            .map(|(name, value)| {
                let table = value
                    .as_table()
                    .ok_or_else(|| err(format!("`cameras.{name}` must be a table")))?;
                let config = CameraConfig::from_table(name, table).map_err(err)?;
                Ok((name.clone(), config))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;

        Ok(Self { fiducials, lander, rover, cameras })
    }

    /// Configuration for one camera.
    pub fn camera(&self, name: &str) -> Result<&CameraConfig> {
        self.cameras.get(name).ok_or_else(|| Error::UnknownCamera(name.to_string()))
    }

    /// Configured camera names in order.
    pub fn camera_names(&self) -> impl Iterator<Item = &str> {
        self.cameras.keys().map(String::as_str)
    }
}

fn pose(doc: &ConfigDocument, key: &str) -> Result<Transform> {
    let shape_err = || Error::document(doc.name(), format!("`{key}` must be an array of 6 numbers"));
    let values = doc.get(key).and_then(Value::as_array).ok_or_else(shape_err)?;
    if values.len() != 6 {
        return Err(shape_err());
    }
    let mut out = [0.0; 6];
    for (slot, value) in out.iter_mut().zip(values) {
        *slot = as_number(value).ok_or_else(shape_err)?;
    }
    Ok(Transform::from_array(out))
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Float(f) => Some(*f),
        Value::Integer(i) => Some(*i as f64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::ErrorKind;

    const INITIAL: &str = r#"
fiducials = true
lander = [0.0, 0.0, 0.5, 0.0, 0.0, 1.57]
rover = [1, 2, 0, 0, 0, 0]

[cameras.FrontLeft]
use_semantic = true
light_intensity = 1.0
width = 1280

[cameras.BackLeft]
use_semantic = false
light_intensity = 0
"#;

    #[test]
    fn test_initial_config() -> Result<()> {
        let doc = ConfigDocument::parse("initial.toml", INITIAL)?;
        let cfg = InitialConfig::from_document(&doc)?;

        assert!(cfg.fiducials);
        assert_eq!(cfg.lander.location.z, 0.5);
        assert_eq!(cfg.rover.to_array(), [1.0, 2.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(cfg.camera_names().collect::<Vec<_>>(), vec!["BackLeft", "FrontLeft"]);

        let front = cfg.camera("FrontLeft")?;
        assert!(front.use_semantic);
        assert_eq!(front.get("width").and_then(Value::as_integer), Some(1280));
        assert_eq!(cfg.camera("BackLeft")?.light_intensity, 0.0);
        assert_eq!(cfg.camera("Nope").unwrap_err().kind(), ErrorKind::Config);
        Ok(())
    }

    #[test]
    fn test_missing_required_key() {
        for key in REQUIRED_INITIAL_KEYS {
            let mut doc = ConfigDocument::parse("initial.toml", INITIAL).unwrap();
            doc.table.remove(key);
            let err = InitialConfig::from_document(&doc).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Format, "key {key}");
            assert!(err.to_string().contains(key), "{err}");
        }
    }

    #[test]
    fn test_camera_missing_light_intensity() {
        let mut doc = ConfigDocument::parse("initial.toml", INITIAL).unwrap();
        doc.table
            .get_mut("cameras")
            .and_then(Value::as_table_mut)
            .and_then(|cameras| cameras.get_mut("BackLeft"))
            .and_then(Value::as_table_mut)
            .unwrap()
            .remove("light_intensity");
        let err = InitialConfig::from_document(&doc).unwrap_err();
        assert!(err.to_string().contains("cameras.BackLeft.light_intensity"), "{err}");
    }

    #[test]
    fn test_bad_pose_shape() {
        let doc = ConfigDocument::parse(
            "initial.toml",
            "fiducials = false\nlander = [1, 2]\nrover = [0,0,0,0,0,0]\ncameras = {}\n",
        )
        .unwrap();
        let err = InitialConfig::from_document(&doc).unwrap_err();
        assert!(err.to_string().contains("lander"));
    }

    #[test]
    fn test_dotted_lookup() -> Result<()> {
        let doc = ConfigDocument::parse("metadata.toml", "[session]\nseed = 42\nname = \"run\"\n")?;
        assert_eq!(doc.get_f64("session.seed"), Some(42.0));
        assert_eq!(doc.get_str("session.name"), Some("run"));
        assert!(!doc.contains("session.missing"));
        assert!(doc.get("session.seed.deeper").is_none());
        Ok(())
    }

    #[test]
    fn test_unparsable_document() {
        let err = ConfigDocument::parse("metadata.toml", "this is = = not toml").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }
}
