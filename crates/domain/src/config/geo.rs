use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct GeoConfig {
    /// CSV of `network/prefix,location` rows. Without it no answer is annotated.
    #[serde(default)]
    pub table_path: Option<String>,
}
