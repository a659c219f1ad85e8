//! Recording test doubles for the installer's collaborators.

#![allow(dead_code)]

use async_trait::async_trait;
use setup_step_core::installer::Installation;
use setup_step_core::{
    ArchiveKind, Collaborators, CommandExecutor, Error, ExtractOptions, Install, Release,
    ReleaseRegistry, Result, Runner, ToolCache, VersionSpec,
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Runner that serves a fixed input and records reports.
#[derive(Default)]
pub struct MockRunner {
    pub input: String,
    pub inputs_read: Mutex<Vec<String>>,
    pub failures: Mutex<Vec<String>>,
    pub paths: Mutex<Vec<PathBuf>>,
}

impl MockRunner {
    pub fn with_input(input: &str) -> Self {
        Self {
            input: input.to_string(),
            ..Self::default()
        }
    }

    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.paths.lock().unwrap().clone()
    }
}

impl Runner for MockRunner {
    fn get_input(&self, name: &str) -> String {
        self.inputs_read.lock().unwrap().push(name.to_string());
        self.input.clone()
    }

    fn set_failed(&self, message: &str) {
        self.failures.lock().unwrap().push(message.to_string());
    }

    fn add_path(&self, dir: &Path) -> Result<()> {
        self.paths.lock().unwrap().push(dir.to_path_buf());
        Ok(())
    }
}

/// Registry that answers with a fixed tag or a fixed failure.
#[derive(Default)]
pub struct MockRegistry {
    pub tag: Option<String>,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl MockRegistry {
    pub fn with_tag(tag: &str) -> Self {
        Self {
            tag: Some(tag.to_string()),
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ReleaseRegistry for MockRegistry {
    async fn latest_release(&self, owner: &str, repo: &str) -> Result<Release> {
        self.calls
            .lock()
            .unwrap()
            .push((owner.to_string(), repo.to_string()));
        self.tag
            .clone()
            .map(|tag_name| Release { tag_name })
            .ok_or_else(|| Error::registry("Not Found"))
    }
}

/// A call observed by [`MockCache`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheCall {
    CreateDir(PathBuf),
    Download(String),
    Extract {
        archive: PathBuf,
        dest: PathBuf,
        kind: ArchiveKind,
        options: ExtractOptions,
    },
    CacheDir {
        source: PathBuf,
        tool: String,
        version: String,
    },
}

/// Tool cache that returns canned paths and records every mutating call.
pub struct MockCache {
    pub cached: Option<PathBuf>,
    pub download_path: PathBuf,
    pub extract_path: PathBuf,
    pub cache_path: PathBuf,
    pub fail_download: Option<String>,
    pub calls: Mutex<Vec<CacheCall>>,
    pub lookups: Mutex<Vec<(String, String)>>,
}

impl Default for MockCache {
    fn default() -> Self {
        Self {
            cached: None,
            download_path: PathBuf::from("step.tar.gz"),
            extract_path: PathBuf::from("step"),
            cache_path: PathBuf::from("step"),
            fail_download: None,
            calls: Mutex::new(Vec::new()),
            lookups: Mutex::new(Vec::new()),
        }
    }
}

impl MockCache {
    pub fn calls(&self) -> Vec<CacheCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: CacheCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ToolCache for MockCache {
    async fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.record(CacheCall::CreateDir(path.to_path_buf()));
        Ok(())
    }

    async fn download_tool(&self, url: &str) -> Result<PathBuf> {
        self.record(CacheCall::Download(url.to_string()));
        match &self.fail_download {
            Some(message) => Err(Error::download(message.clone())),
            None => Ok(self.download_path.clone()),
        }
    }

    async fn extract(
        &self,
        archive: &Path,
        dest: &Path,
        kind: ArchiveKind,
        options: ExtractOptions,
    ) -> Result<PathBuf> {
        self.record(CacheCall::Extract {
            archive: archive.to_path_buf(),
            dest: dest.to_path_buf(),
            kind,
            options,
        });
        Ok(self.extract_path.clone())
    }

    async fn cache_dir(&self, source: &Path, tool: &str, version: &str) -> Result<PathBuf> {
        self.record(CacheCall::CacheDir {
            source: source.to_path_buf(),
            tool: tool.to_string(),
            version: version.to_string(),
        });
        Ok(self.cache_path.clone())
    }

    fn find(&self, tool: &str, version: &str) -> Option<PathBuf> {
        self.lookups
            .lock()
            .unwrap()
            .push((tool.to_string(), version.to_string()));
        self.cached.clone()
    }

    fn find_all_versions(&self, _tool: &str) -> Vec<String> {
        Vec::new()
    }
}

/// Executor that records invocations and optionally fails them.
#[derive(Default)]
pub struct MockExecutor {
    pub exit_code: i32,
    pub calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl MockExecutor {
    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandExecutor for MockExecutor {
    async fn exec(&self, program: &str, args: &[&str]) -> Result<i32> {
        self.calls.lock().unwrap().push((
            program.to_string(),
            args.iter().map(|arg| (*arg).to_string()).collect(),
        ));
        if self.exit_code == 0 {
            Ok(0)
        } else {
            Err(Error::exec(format!(
                "The process '{program}' failed with exit code {}",
                self.exit_code
            )))
        }
    }
}

/// All doubles for one installer, kept so tests can inspect them afterwards.
pub struct Harness {
    pub runner: Arc<MockRunner>,
    pub registry: Arc<MockRegistry>,
    pub cache: Arc<MockCache>,
    pub executor: Arc<MockExecutor>,
}

impl Harness {
    pub fn new(registry: MockRegistry, cache: MockCache, executor: MockExecutor) -> Self {
        Self {
            runner: Arc::new(MockRunner::default()),
            registry: Arc::new(registry),
            cache: Arc::new(cache),
            executor: Arc::new(executor),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            runner: self.runner.clone(),
            registry: self.registry.clone(),
            cache: self.cache.clone(),
            executor: self.executor.clone(),
        }
    }
}

/// Canned outcome for [`MockInstall`].
pub enum InstallOutcome {
    Installed,
    Failed(String),
    Unstructured(&'static str),
}

/// Installer stand-in for coordinator tests.
pub struct MockInstall {
    pub outcome: InstallOutcome,
    pub calls: Mutex<Vec<VersionSpec>>,
}

impl MockInstall {
    pub fn new(outcome: InstallOutcome) -> Self {
        Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<VersionSpec> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Install for MockInstall {
    async fn install(&self, spec: &VersionSpec) -> Result<Installation> {
        self.calls.lock().unwrap().push(spec.clone());
        match &self.outcome {
            InstallOutcome::Installed => Ok(Installation {
                version: spec.to_string(),
                path: PathBuf::from("step"),
                bin_dir: PathBuf::from("step/bin"),
                cache_hit: false,
            }),
            InstallOutcome::Failed(message) => Err(Error::download(message.clone())),
            InstallOutcome::Unstructured(value) => Err(Error::unstructured(value)),
        }
    }
}
