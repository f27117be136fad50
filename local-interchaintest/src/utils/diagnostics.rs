use std::{
    collections::HashMap,
    fs,
    io::{self, Cursor},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use bollard::{
    models::ContainerSummary,
    query_parameters::{
        DownloadFromContainerOptionsBuilder, InspectContainerOptions,
        ListContainersOptionsBuilder, LogsOptionsBuilder,
    },
    Docker,
};
use futures_util::StreamExt;
use log::{info, warn};

use super::{config::SuiteConfig, constants::DIAGNOSTIC_FILES, file_system::write_file};

pub const CONTAINER_LOG_FILE: &str = "container.log";
pub const INSPECT_FILE: &str = "docker-inspect.json";

/// Copies logs, inspect output and selected files out of every labelled
/// container into `<root>/<test_name>/<container_name>/`.
pub struct DiagnosticsCollector {
    docker: Docker,
    label: String,
    root: PathBuf,
    files: Vec<String>,
}

impl DiagnosticsCollector {
    pub fn new(config: &SuiteConfig) -> Result<Self> {
        let docker = Docker::connect_with_local_defaults()?;
        Ok(Self {
            docker,
            label: config.container_label.clone(),
            root: config.diagnostics_dir.clone(),
            files: DIAGNOSTIC_FILES.iter().map(|f| f.to_string()).collect(),
        })
    }

    /// Returns the directory the diagnostics of `test_name` were written to.
    pub async fn collect(&self, test_name: &str) -> Result<PathBuf> {
        let test_dir = self.root.join(sanitize_name(test_name));
        let containers = self.containers().await?;
        info!(
            "collecting diagnostics of {} containers into {}",
            containers.len(),
            test_dir.display()
        );

        for container in containers {
            let Some(id) = container.id.clone() else {
                continue;
            };
            let name = container_name(&container);
            let container_dir = test_dir.join(sanitize_name(&name));
            fs::create_dir_all(&container_dir)
                .with_context(|| format!("creating {}", container_dir.display()))?;

            // one broken container must not hide the others
            if let Err(e) = self.collect_container(&id, &container_dir).await {
                warn!("failed to collect diagnostics of {name}: {e:#}");
            }
        }

        Ok(test_dir)
    }

    async fn containers(&self) -> Result<Vec<ContainerSummary>> {
        let filters = HashMap::from([("label".to_string(), vec![self.label.clone()])]);
        let options = ListContainersOptionsBuilder::default()
            .all(true)
            .filters(&filters)
            .build();

        Ok(self.docker.list_containers(Some(options)).await?)
    }

    async fn collect_container(&self, id: &str, dir: &Path) -> Result<()> {
        for file in &self.files {
            if let Err(e) = self.copy_file(id, file, dir).await {
                warn!("skipping {file}: {e:#}");
            }
        }

        self.write_logs(id, dir).await?;
        self.write_inspect(id, dir).await
    }

    async fn copy_file(&self, id: &str, file: &str, dir: &Path) -> Result<()> {
        let options = DownloadFromContainerOptionsBuilder::default()
            .path(file)
            .build();
        let mut stream = Box::pin(self.docker.download_from_container(id, Some(options)));

        let mut archive = Vec::new();
        while let Some(chunk) = stream.next().await {
            archive.extend_from_slice(&chunk?);
        }

        extract_archive(&archive, dir).with_context(|| format!("extracting {file}"))
    }

    async fn write_logs(&self, id: &str, dir: &Path) -> Result<()> {
        let options = LogsOptionsBuilder::default()
            .stdout(true)
            .stderr(true)
            .timestamps(true)
            .build();
        let mut stream = Box::pin(self.docker.logs(id, Some(options)));

        let mut logs = String::new();
        while let Some(output) = stream.next().await {
            logs.push_str(&output?.to_string());
        }

        write_file(&dir.join(CONTAINER_LOG_FILE), logs.as_bytes())?;
        Ok(())
    }

    async fn write_inspect(&self, id: &str, dir: &Path) -> Result<()> {
        let inspect = self
            .docker
            .inspect_container(id, None::<InspectContainerOptions>)
            .await?;
        let json = serde_json::to_vec_pretty(&inspect)?;

        write_file(&dir.join(INSPECT_FILE), &json)?;
        Ok(())
    }
}

/// Blocking entry point for the suite runner.
pub fn collect_diagnostics(config: &SuiteConfig, test_name: &str) -> Result<PathBuf> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let collector = DiagnosticsCollector::new(config)?;
        collector.collect(test_name).await
    })
}

fn container_name(container: &ContainerSummary) -> String {
    container
        .names
        .as_ref()
        .and_then(|names| names.first())
        .cloned()
        .or_else(|| container.id.clone())
        .unwrap_or_default()
}

/// Turns a container or test name into a single path component.
pub fn sanitize_name(name: &str) -> String {
    let sanitized: String = name
        .trim_start_matches('/')
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | ' ' => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        return "unnamed".to_string();
    }
    sanitized
}

/// Unpacks the tar archive returned by the container archive endpoint into `dest`.
pub fn extract_archive(archive: &[u8], dest: &Path) -> io::Result<()> {
    if archive.is_empty() {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "empty archive"));
    }
    fs::create_dir_all(dest)?;
    tar::Archive::new(Cursor::new(archive)).unpack(dest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn archive_with(name: &str, contents: &[u8]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, contents).unwrap();
        builder.into_inner().unwrap()
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("/localwasm-1-val-0-ica"), "localwasm-1-val-0-ica");
        assert_eq!(sanitize_name("suite/test:case one"), "suite_test_case_one");
        assert_eq!(sanitize_name("/"), "unnamed");
        assert_eq!(sanitize_name(".."), "unnamed");
    }

    #[test]
    fn test_extract_archive() {
        let dir = tempfile::tempdir().unwrap();
        let archive = archive_with("genesis.json", br#"{"chain_id":"localwasm-1"}"#);

        extract_archive(&archive, &dir.path().join("container")).unwrap();

        let extracted =
            fs::read_to_string(dir.path().join("container").join("genesis.json")).unwrap();
        assert_eq!(extracted, r#"{"chain_id":"localwasm-1"}"#);
    }

    #[test]
    fn test_extract_empty_archive_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = extract_archive(&[], dir.path()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_container_name_falls_back_to_id() {
        let named = ContainerSummary {
            id: Some("abc123".to_string()),
            names: Some(vec!["/localwasm-2-val-0".to_string()]),
            ..Default::default()
        };
        assert_eq!(container_name(&named), "/localwasm-2-val-0");

        let unnamed = ContainerSummary {
            id: Some("abc123".to_string()),
            ..Default::default()
        };
        assert_eq!(container_name(&unnamed), "abc123");
    }
}
