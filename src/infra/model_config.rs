// ============================================================
// Layer 6 — Model Architecture Files
// ============================================================
// Validation and loading of the architecture JSON referenced by
// `dl4j.model.config`. Validation is syntactic only: the file must
// parse as one of the two architecture shapes. Whether the layer
// widths make sense is checked later, when the network is built.

use std::{fs, path::Path};

use crate::domain::architecture::{Architecture, LayerConf, MultiLayerConf};
use crate::domain::error::{Result, TrainError};

/// True when `path` holds a parseable single- or multi-layer architecture.
/// Never fails: unreadable or malformed files are simply invalid.
pub fn validate_existing_json_config_file(path: &Path) -> bool {
    if path.as_os_str().is_empty() {
        return false;
    }
    match load_architecture(path) {
        Ok(Architecture::Multi(conf)) => !conf.confs.is_empty(),
        Ok(Architecture::Single(_))   => true,
        Err(e) => {
            tracing::debug!("Architecture validation failed: {}", e);
            false
        }
    }
}

/// Parse whichever architecture shape the file contains.
pub fn load_architecture(path: &Path) -> Result<Architecture> {
    parse_json(path)
}

/// Load a multi-layer architecture (`{"confs": [...]}`). An empty
/// `confs` list is rejected with `EmptyArchitecture`.
pub fn load_multi_layer(path: &Path) -> Result<MultiLayerConf> {
    let conf: MultiLayerConf = parse_json(path)?;
    if conf.confs.is_empty() {
        return Err(TrainError::EmptyArchitecture);
    }
    Ok(conf)
}

/// Load a single-layer architecture.
pub fn load_single_layer(path: &Path) -> Result<LayerConf> {
    parse_json(path)
}

fn parse_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path).map_err(|e| TrainError::Architecture {
        path:    path.to_path_buf(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&json).map_err(|e| TrainError::Architecture {
        path:    path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn json_file(body: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_valid_multi_layer() {
        let file = json_file(
            r#"{"confs":[{"layerType":"dense","nIn":4,"nOut":5,"batchSize":32},
                         {"layerType":"output","nIn":5,"nOut":3}]}"#,
        );
        assert!(validate_existing_json_config_file(file.path()));
        let conf = load_multi_layer(file.path()).unwrap();
        assert_eq!(conf.first().unwrap().batch_size, 32);
        assert_eq!(conf.last().unwrap().n_out, 3);
    }

    #[test]
    fn test_valid_single_layer() {
        let file = json_file(r#"{"layerType":"autoEncoder","nIn":4,"nOut":2}"#);
        assert!(validate_existing_json_config_file(file.path()));
        assert_eq!(load_single_layer(file.path()).unwrap().n_out, 2);
    }

    #[test]
    fn test_syntactically_invalid_json() {
        let file = json_file(r#"{"confs": [ {"layerType": "dense", "#);
        assert!(!validate_existing_json_config_file(file.path()));
    }

    #[test]
    fn test_json_in_wrong_schema() {
        let file = json_file(r#"{"hello": "world"}"#);
        assert!(!validate_existing_json_config_file(file.path()));
    }

    #[test]
    fn test_empty_and_missing_paths() {
        assert!(!validate_existing_json_config_file(Path::new("")));
        assert!(!validate_existing_json_config_file(Path::new("/definitely/not/here.json")));
    }

    #[test]
    fn test_empty_layer_list_rejected() {
        let file = json_file(r#"{"confs":[]}"#);
        assert!(!validate_existing_json_config_file(file.path()));
        assert!(matches!(
            load_multi_layer(file.path()).unwrap_err(),
            TrainError::EmptyArchitecture
        ));
    }
}
