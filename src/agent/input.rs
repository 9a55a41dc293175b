//! Per-frame camera snapshot.

use std::collections::BTreeMap;

use crate::core::{CameraImage, ImageKind};

/// Images available at one frame, keyed by camera name.
///
/// Every configured camera has a grayscale slot. Cameras with semantic capture
/// also have a semantic slot. A slot holds `None` when the camera recorded no
/// image at that frame.
#[derive(Clone, Debug, Default)]
pub struct InputData {
    pub grayscale: BTreeMap<String, Option<CameraImage>>,
    pub semantic: BTreeMap<String, Option<CameraImage>>,
}

impl InputData {
    /// Slots of one image kind.
    pub fn slots(&self, kind: ImageKind) -> &BTreeMap<String, Option<CameraImage>> {
        match kind {
            ImageKind::Grayscale => &self.grayscale,
            ImageKind::Semantic => &self.semantic,
        }
    }

    pub(crate) fn insert(&mut self, kind: ImageKind, camera: &str, image: Option<CameraImage>) {
        let slots = match kind {
            ImageKind::Grayscale => &mut self.grayscale,
            ImageKind::Semantic => &mut self.semantic,
        };
        slots.insert(camera.to_string(), image);
    }

    /// Image of one camera, if present.
    pub fn image(&self, kind: ImageKind, camera: &str) -> Option<&CameraImage> {
        self.slots(kind).get(camera)?.as_ref()
    }

    /// Check if a slot exists for the camera (whether or not it holds an image).
    pub fn has_slot(&self, kind: ImageKind, camera: &str) -> bool {
        self.slots(kind).contains_key(camera)
    }

    /// Number of slots holding an image.
    pub fn num_images(&self) -> usize {
        self.grayscale.values().chain(self.semantic.values()).filter(|s| s.is_some()).count()
    }
}
