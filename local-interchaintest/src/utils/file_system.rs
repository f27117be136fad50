use std::{
    fs::{self, DirEntry},
    io::{self, Write},
    path::{Path, PathBuf},
};

use log::info;

use super::{constants::WASM_EXTENSION, types::ChainsVec};

pub fn read_json_file(file_path: &Path) -> Result<ChainsVec, io::Error> {
    // Read the file to a string
    let data = fs::read_to_string(file_path)?;

    // Parse the string into the struct
    let chain: ChainsVec = serde_json::from_str(&data)?;

    Ok(chain)
}

pub fn read_artifacts(path: &Path) -> Result<Vec<DirEntry>, io::Error> {
    let mut dir_entries = fs::read_dir(path)?.collect::<Result<Vec<_>, _>>()?;
    // store order should not depend on the filesystem
    dir_entries.sort_by_key(|entry| entry.file_name());

    Ok(dir_entries)
}

/// `.wasm` files directly under `path`, sorted by file name.
pub fn wasm_artifacts(path: &Path) -> Result<Vec<PathBuf>, io::Error> {
    Ok(read_artifacts(path)?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(WASM_EXTENSION))
        .collect())
}

/// Contract name of a wasm artifact, i.e. its file stem.
pub fn contract_name(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}

pub fn write_file(path: &Path, data: &[u8]) -> Result<(), io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(path)?;
    file.write_all(data)?;

    info!("file written: {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wasm_artifacts_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["cw_ica_owner.wasm", "callback_counter.wasm", "checksums.txt"] {
            fs::write(dir.path().join(name), b"\0asm").unwrap();
        }
        fs::create_dir(dir.path().join("nested.wasm.d")).unwrap();

        let names: Vec<String> = wasm_artifacts(dir.path())
            .unwrap()
            .iter()
            .filter_map(|p| contract_name(p))
            .collect();

        assert_eq!(names, vec!["callback_counter", "cw_ica_owner"]);
    }

    #[test]
    fn test_missing_artifacts_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(wasm_artifacts(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_write_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("out.json");

        write_file(&path, br#"{"ok":true}"#).unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), r#"{"ok":true}"#);
    }
}
