use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

pub const DEFAULT_ENDPOINT_CONFIG_PATH: &str = "assets/endpoints.json";

pub const DEFAULT_ONTOLOGY_BASE: &str = "https://api.monarchinitiative.org/api";
pub const DEFAULT_SEARCH_INDEX_URL: &str =
    "https://dr-sgc.kccg.garvan.org.au/_elasticsearch/_search";
pub const DEFAULT_GENOME_DB_URL: &str = "http://127.0.0.1:8000/";

/// Collaborator endpoints. The ontology service and gene search index are
/// public and fixed by default; the genome database is per-deployment and is
/// usually set from the IP handed to the binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub ontology_base: String,
    pub search_index_url: String,
    pub genome_db_url: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            ontology_base: DEFAULT_ONTOLOGY_BASE.to_string(),
            search_index_url: DEFAULT_SEARCH_INDEX_URL.to_string(),
            genome_db_url: DEFAULT_GENOME_DB_URL.to_string(),
        }
    }
}

impl EndpointConfig {
    pub fn from_json_file(path: &str) -> Result<Self, String> {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("Could not read endpoint config '{path}': {e}"))?;
        serde_json::from_str(&text)
            .map_err(|e| format!("Could not parse endpoint config '{path}': {e}"))
    }

    /// Loads the bundled endpoint config when present, defaults otherwise.
    pub fn load() -> Self {
        if Path::new(DEFAULT_ENDPOINT_CONFIG_PATH).exists() {
            match Self::from_json_file(DEFAULT_ENDPOINT_CONFIG_PATH) {
                Ok(config) => return config,
                Err(e) => eprintln!("{e}"),
            }
        }
        Self::default()
    }

    /// Points the genome database at a deployment host, keeping the default
    /// port.
    pub fn with_genome_db_ip(mut self, ip: &str) -> Self {
        self.genome_db_url = format!("http://{ip}:8000/");
        self
    }
}
