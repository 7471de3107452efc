use serde::{Deserialize, Serialize};

/// Published description of a built template.
///
/// Consumers fetch `<id>.json` from the templates bucket to learn which
/// image to run and where its code cells live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub id: String,
    pub image: String,
    pub root_dir: String,
    pub code_cells_dir: String,
}

impl Manifest {
    /// Object key the manifest is stored under.
    pub fn object_key(&self) -> String {
        format!("{}.json", self.id)
    }

    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}
