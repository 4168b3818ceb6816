//! Illustration lookup: explicit per-jump/per-param art and the ordered
//! association table consulted when no explicit art is set.

use serde::{Deserialize, Serialize};

use crate::quest::JumpId;

/// One record of the external image-association table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAssociation {
    pub filename: String,
    /// Jump ids this illustration accompanies.
    #[serde(default)]
    pub jump_ids: Vec<JumpId>,
    /// Critical-parameter indices this illustration accompanies.
    #[serde(default)]
    pub crit_params: Vec<usize>,
}

/// Turn an authored image name into its on-disk filename.
#[must_use]
pub(crate) fn art_filename(name: &str) -> String {
    format!("{}.jpg", name.to_lowercase())
}

/// Explicit image name with blank values treated as absent.
pub(crate) fn explicit_art(img: Option<&str>) -> Option<String> {
    img.filter(|name| !name.is_empty()).map(art_filename)
}

/// First association covering the given jump id.
pub(crate) fn jump_image(images: &[ImageAssociation], jump_id: JumpId) -> Option<String> {
    images
        .iter()
        .find(|assoc| assoc.jump_ids.contains(&jump_id))
        .map(|assoc| assoc.filename.clone())
}

/// First association covering the given critical-parameter index.
pub(crate) fn crit_image(images: &[ImageAssociation], param_index: usize) -> Option<String> {
    images
        .iter()
        .find(|assoc| assoc.crit_params.contains(&param_index))
        .map(|assoc| assoc.filename.clone())
}
