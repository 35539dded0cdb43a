//! YAML import/apply and export of pipeline definitions

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use codestream_client::CodeStreamClient;
use codestream_core::domain::pipeline::Pipeline;
use codestream_core::dto::pipeline::{ImportMode, ImportResult, PipelineDocument};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Anything that can push a pipeline document to the service
#[async_trait]
pub trait PipelineImporter {
    async fn import(
        &self,
        document: &PipelineDocument,
        mode: ImportMode,
    ) -> codestream_client::Result<Vec<ImportResult>>;
}

#[async_trait]
impl PipelineImporter for CodeStreamClient {
    async fn import(
        &self,
        document: &PipelineDocument,
        mode: ImportMode,
    ) -> codestream_client::Result<Vec<ImportResult>> {
        self.import_pipeline(document, mode).await
    }
}

/// Anything that can fetch a pipeline's YAML definition
#[async_trait]
pub trait PipelineExporter {
    async fn export(&self, name: &str, project: &str) -> codestream_client::Result<String>;
}

#[async_trait]
impl PipelineExporter for CodeStreamClient {
    async fn export(&self, name: &str, project: &str) -> codestream_client::Result<String> {
        self.export_pipeline(name, project).await
    }
}

/// `.yaml` or `.yml`, any case
pub fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}

/// Files to import from a path
///
/// A directory yields its YAML files (not recursive) sorted by name; a file
/// yields itself.
pub fn collect_import_files(path: &Path) -> Result<Vec<PathBuf>> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Unable to read import path: {}", path.display()))?;

    if !metadata.is_dir() {
        debug!("importPath is a file");
        return Ok(vec![path.to_path_buf()]);
    }

    debug!("importPath is a directory");
    let mut files = Vec::new();
    for entry in std::fs::read_dir(path)
        .with_context(|| format!("Unable to list directory: {}", path.display()))?
    {
        let entry = entry?;
        let file = entry.path();
        if entry.file_type()?.is_file() && is_yaml_file(&file) {
            files.push(file);
        } else {
            debug!("skipping {}", file.display());
        }
    }
    files.sort();
    Ok(files)
}

/// Import every file under `path`, stopping at the first failure
///
/// Files imported before a failure stay imported; they are named in the
/// returned error.
pub async fn import_path<I>(importer: &I, path: &Path, mode: ImportMode) -> Result<Vec<PathBuf>>
where
    I: PipelineImporter + Sync,
{
    let files = collect_import_files(path)?;
    if files.is_empty() {
        warn!("No .yaml or .yml files found in {}", path.display());
    }

    let mut imported = Vec::with_capacity(files.len());
    for file in files {
        if let Err(e) = import_file(importer, &file, mode).await {
            let e = e.context(format!("Failed to import Pipeline from {}", file.display()));
            if imported.is_empty() {
                return Err(e);
            }
            let done: Vec<String> = imported
                .iter()
                .map(|f: &PathBuf| f.display().to_string())
                .collect();
            return Err(e.context(format!(
                "{} file(s) imported before the failure: {}",
                done.len(),
                done.join(", ")
            )));
        }
        imported.push(file);
    }

    Ok(imported)
}

async fn import_file<I>(importer: &I, file: &Path, mode: ImportMode) -> Result<()>
where
    I: PipelineImporter + Sync,
{
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let document = PipelineDocument::from_yaml(&contents)?;
    debug!(name = %document.name, project = %document.project, %mode, "importing pipeline");

    let results = importer.import(&document, mode).await?;
    if let Some(failed) = results.iter().find(|r| !r.is_success()) {
        bail!(
            "{}: {}",
            failed.name,
            failed.status_message.as_deref().unwrap_or(&failed.status)
        );
    }

    info!("Imported {} ({})", document.name, mode);
    Ok(())
}

/// Write each pipeline's YAML definition to `<dir>/<name>.yaml`
pub async fn export_pipelines<E>(
    exporter: &E,
    pipelines: &[Pipeline],
    dir: &Path,
) -> Result<Vec<PathBuf>>
where
    E: PipelineExporter + Sync,
{
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Unable to create export directory: {}", dir.display()))?;

    let mut written = Vec::with_capacity(pipelines.len());
    for pipeline in pipelines {
        let yaml = exporter
            .export(&pipeline.name, &pipeline.project)
            .await
            .with_context(|| format!("Unable to export pipeline {}", pipeline.name))?;

        let file = dir.join(export_file_name(&pipeline.name)?);
        std::fs::write(&file, yaml)
            .with_context(|| format!("Failed to write {}", file.display()))?;
        info!("Exported {} to {}", pipeline.name, file.display());
        written.push(file);
    }
    Ok(written)
}

fn export_file_name(name: &str) -> Result<String> {
    let cleaned: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        return Err(anyhow!("Pipeline name '{}' is not usable as a file name", name));
    }
    Ok(format!("{}.yaml", cleaned))
}

#[cfg(test)]
mod tests {
    use super::*;
    use codestream_client::ClientError;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Records imports; fails documents whose name is listed
    #[derive(Default)]
    struct FakeImporter {
        seen: Mutex<Vec<(String, ImportMode)>>,
        reject: Vec<&'static str>,
    }

    #[async_trait]
    impl PipelineImporter for FakeImporter {
        async fn import(
            &self,
            document: &PipelineDocument,
            mode: ImportMode,
        ) -> codestream_client::Result<Vec<ImportResult>> {
            self.seen
                .lock()
                .unwrap()
                .push((document.name.clone(), mode));
            if self.reject.contains(&document.name.as_str()) {
                return Err(ClientError::service(409, "Pipeline already exists"));
            }
            Ok(vec![ImportResult {
                name: document.name.clone(),
                status: "CREATED".to_string(),
                ..Default::default()
            }])
        }
    }

    fn pipeline_yaml(name: &str) -> String {
        format!("kind: PIPELINE\nname: {}\nproject: prod\n", name)
    }

    fn fixture_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.yaml"), pipeline_yaml("b")).unwrap();
        std::fs::write(dir.path().join("a.yml"), pipeline_yaml("a")).unwrap();
        std::fs::write(dir.path().join("C.YAML"), pipeline_yaml("c")).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a pipeline").unwrap();
        std::fs::write(dir.path().join("yaml.bak"), pipeline_yaml("bak")).unwrap();
        std::fs::create_dir(dir.path().join("nested.yaml")).unwrap();
        dir
    }

    #[test]
    fn test_is_yaml_file() {
        assert!(is_yaml_file(Path::new("x.yaml")));
        assert!(is_yaml_file(Path::new("x.YML")));
        assert!(!is_yaml_file(Path::new("x.yaml.bak")));
        assert!(!is_yaml_file(Path::new("yaml")));
    }

    #[test]
    fn test_collect_only_yaml_files() {
        let dir = fixture_dir();
        let files = collect_import_files(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["C.YAML", "a.yml", "b.yaml"]);
    }

    #[test]
    fn test_collect_single_file() {
        let dir = fixture_dir();
        let file = dir.path().join("notes.txt");
        // an explicit file is imported whatever its extension
        assert_eq!(collect_import_files(&file).unwrap(), vec![file]);
    }

    #[test]
    fn test_collect_missing_path() {
        assert!(collect_import_files(Path::new("/definitely/not/here")).is_err());
    }

    #[tokio::test]
    async fn test_import_directory_processes_every_yaml_file() {
        let dir = fixture_dir();
        let importer = FakeImporter::default();

        let imported = import_path(&importer, dir.path(), ImportMode::Create)
            .await
            .unwrap();
        assert_eq!(imported.len(), 3);

        let seen = importer.seen.lock().unwrap();
        let names: Vec<&str> = seen.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
        assert!(seen.iter().all(|(_, mode)| *mode == ImportMode::Create));
    }

    #[tokio::test]
    async fn test_directory_without_yaml_is_a_noop() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("readme.md"), "# pipelines").unwrap();
        let importer = FakeImporter::default();

        let imported = import_path(&importer, dir.path(), ImportMode::Apply)
            .await
            .unwrap();
        assert!(imported.is_empty());
        assert!(importer.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_first_failure_stops_the_batch() {
        let dir = fixture_dir();
        let importer = FakeImporter {
            reject: vec!["a"],
            ..Default::default()
        };

        let err = import_path(&importer, dir.path(), ImportMode::Apply)
            .await
            .unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("1 file(s) imported before the failure"));
        assert!(message.contains("C.YAML"));
        assert!(message.contains("Pipeline already exists"));

        // b.yaml is never attempted
        assert_eq!(importer.seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_document_fails_before_request() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("bad.yaml");
        std::fs::write(&file, "kind: VARIABLE\nname: x\nproject: y\n").unwrap();
        let importer = FakeImporter::default();

        assert!(import_path(&importer, &file, ImportMode::Create).await.is_err());
        assert!(importer.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_import_result_is_error() {
        struct Rejecting;

        #[async_trait]
        impl PipelineImporter for Rejecting {
            async fn import(
                &self,
                document: &PipelineDocument,
                _mode: ImportMode,
            ) -> codestream_client::Result<Vec<ImportResult>> {
                Ok(vec![ImportResult {
                    name: document.name.clone(),
                    status: "CREATION_FAILED".to_string(),
                    status_message: Some("Project 'prod' not found".to_string()),
                    url: None,
                }])
            }
        }

        let dir = TempDir::new().unwrap();
        let file = dir.path().join("p.yaml");
        std::fs::write(&file, pipeline_yaml("p")).unwrap();

        let err = import_path(&Rejecting, &file, ImportMode::Create)
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("Project 'prod' not found"));
    }

    /// Serves `name: <name>` documents; fails for listed names
    #[derive(Default)]
    struct FakeExporter {
        requested: Mutex<Vec<(String, String)>>,
        missing: Vec<&'static str>,
    }

    #[async_trait]
    impl PipelineExporter for FakeExporter {
        async fn export(&self, name: &str, project: &str) -> codestream_client::Result<String> {
            self.requested
                .lock()
                .unwrap()
                .push((name.to_string(), project.to_string()));
            if self.missing.contains(&name) {
                return Err(ClientError::service(404, "Pipeline not found"));
            }
            Ok(format!("---\nkind: PIPELINE\nname: {}\nproject: {}\n", name, project))
        }
    }

    fn pipeline(name: &str) -> Pipeline {
        Pipeline {
            id: format!("{}-id", name),
            name: name.to_string(),
            project: "prod".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_export_writes_one_file_per_pipeline() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("exports");
        let exporter = FakeExporter::default();

        let written = export_pipelines(&exporter, &[pipeline("deploy"), pipeline("build")], &out)
            .await
            .unwrap();
        assert_eq!(written, vec![out.join("deploy.yaml"), out.join("build.yaml")]);

        let contents = std::fs::read_to_string(out.join("deploy.yaml")).unwrap();
        assert!(contents.contains("name: deploy"));
        assert_eq!(
            exporter.requested.lock().unwrap()[1],
            ("build".to_string(), "prod".to_string())
        );
    }

    #[tokio::test]
    async fn test_export_failure_names_the_pipeline() {
        let dir = TempDir::new().unwrap();
        let exporter = FakeExporter {
            missing: vec!["ghost"],
            ..Default::default()
        };

        let err = export_pipelines(&exporter, &[pipeline("ghost")], dir.path())
            .await
            .unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("Unable to export pipeline ghost"));
        assert!(message.contains("Pipeline not found"));
        assert!(!dir.path().join("ghost.yaml").exists());
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name("SSH Exports").unwrap(), "SSH Exports.yaml");
        assert_eq!(export_file_name("a/b").unwrap(), "a_b.yaml");
        assert!(export_file_name("..").is_err());
    }
}
