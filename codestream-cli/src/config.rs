//! Configuration module
//!
//! Resolves the active target from `CS_*` environment variables or from the
//! YAML config file (`$HOME/.cs-cli.yaml` unless `--config` says otherwise).
//! The result is an explicit [`Context`] handed to every command.

use anyhow::{Context as _, Result, anyhow, bail};
use codestream_client::{Credentials, Session};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default config file name, relative to the home directory
pub const CONFIG_FILE_NAME: &str = ".cs-cli.yaml";

/// Prefix of the environment variables describing a target
pub const ENV_PREFIX: &str = "CS_";

/// A named server/credential profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Target {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apitoken: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accesstoken: Option<String>,
}

impl Target {
    /// Build a target from `CS_*` variables; `None` unless `CS_SERVER` is set
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let var = |name: &str| {
            lookup(&format!("{}{}", ENV_PREFIX, name.to_uppercase())).filter(|v| !v.is_empty())
        };

        let server = var("server")?;
        Some(Self {
            server: Some(server),
            username: var("username"),
            password: var("password"),
            domain: var("domain"),
            apitoken: var("apitoken"),
            accesstoken: var("accesstoken"),
        })
    }

    /// Base URL of the target's server
    ///
    /// Surrounding whitespace and trailing slashes are dropped; a bare host
    /// is addressed over HTTPS.
    pub fn base_url(&self) -> Result<String> {
        let server = self
            .server
            .as_deref()
            .map(|s| s.trim().trim_end_matches('/'))
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow!("Target has no server configured"))?;

        if server.starts_with("https://") || server.starts_with("http://") {
            Ok(server.to_string())
        } else {
            Ok(format!("https://{}", server))
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
            domain: self.domain.clone(),
            api_token: self.apitoken.clone(),
            access_token: self.accesstoken.clone(),
        }
    }

    /// Overwrite set fields with the ones from `other`
    pub fn merge(&mut self, other: Target) {
        let Target {
            server,
            username,
            password,
            domain,
            apitoken,
            accesstoken,
        } = other;
        if server.is_some() {
            self.server = server;
        }
        if username.is_some() {
            self.username = username;
        }
        if password.is_some() {
            self.password = password;
        }
        if domain.is_some() {
            self.domain = domain;
        }
        if apitoken.is_some() {
            self.apitoken = apitoken;
        }
        if accesstoken.is_some() {
            self.accesstoken = accesstoken;
        }
    }
}

/// On-disk layout of the config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_target_name: Option<String>,
    pub target: BTreeMap<String, Target>,
}

/// The config file together with where it lives
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    pub file: ConfigFile,
}

impl ConfigStore {
    /// `$HOME/.cs-cli.yaml`
    pub fn default_path() -> Result<PathBuf> {
        let dirs = BaseDirs::new().ok_or_else(|| anyhow!("Unable to locate home directory"))?;
        Ok(dirs.home_dir().join(CONFIG_FILE_NAME))
    }

    /// Open the config file
    ///
    /// An explicit path must exist. The default file is created empty on
    /// first use.
    pub fn open(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => {
                if !path.exists() {
                    bail!(
                        "Config file specified with --config does not exist: {}",
                        path.display()
                    );
                }
                Self::load(path)
            }
            None => {
                let path = Self::default_path()?;
                if !path.exists() {
                    info!("Creating empty config file at {}", path.display());
                    let store = Self {
                        path,
                        file: ConfigFile::default(),
                    };
                    store.save()?;
                    return Ok(store);
                }
                Self::load(&path)
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let file = if contents.trim().is_empty() {
            ConfigFile::default()
        } else {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        };

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn save(&self) -> Result<()> {
        let contents = serde_yaml::to_string(&self.file).context("Failed to serialize config")?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write config file: {}", self.path.display()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name and settings of the selected target
    pub fn current_target(&self) -> Result<(String, Target)> {
        let name = self
            .file
            .current_target_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No target selected in {}, set one with `cs-cli config use-target`",
                    self.path.display()
                )
            })?;

        let target = self
            .file
            .target
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow!("Target configuration not found: {}", name))?;

        Ok((name.to_string(), target))
    }

    pub fn use_target(&mut self, name: &str) -> Result<()> {
        if !self.file.target.contains_key(name) {
            bail!("Target configuration not found: {}", name);
        }
        self.file.current_target_name = Some(name.to_string());
        Ok(())
    }

    /// Create or update a target; returns true when it was newly created
    pub fn set_target(&mut self, name: &str, settings: Target) -> bool {
        match self.file.target.get_mut(name) {
            Some(existing) => {
                existing.merge(settings);
                false
            }
            None => {
                self.file.target.insert(name.to_string(), settings);
                true
            }
        }
    }

    pub fn delete_target(&mut self, name: &str) -> Result<()> {
        if self.file.target.remove(name).is_none() {
            bail!("Target configuration not found: {}", name);
        }
        if self.file.current_target_name.as_deref() == Some(name) {
            self.file.current_target_name = None;
        }
        Ok(())
    }

    /// Record newly issued tokens on a target
    pub fn update_tokens(&mut self, name: &str, session: &Session) -> Result<()> {
        let target = self
            .file
            .target
            .get_mut(name)
            .ok_or_else(|| anyhow!("Target configuration not found: {}", name))?;
        target.accesstoken = Some(session.access_token.clone());
        if session.api_token.is_some() {
            target.apitoken = session.api_token.clone();
        }
        Ok(())
    }
}

/// Where the active target came from
#[derive(Debug, Clone)]
pub enum TargetSource {
    Environment,
    File { store: ConfigStore, name: String },
}

/// Everything a command needs to reach the active target
#[derive(Debug, Clone)]
pub struct Context {
    pub target: Target,
    pub source: TargetSource,
    /// Skip TLS certificate verification
    pub ignore_cert: bool,
}

impl Context {
    /// Resolve the active target
    ///
    /// `CS_SERVER` in the environment wins over the config file.
    pub fn load(config: Option<&Path>, ignore_cert: bool) -> Result<Self> {
        if let Some(target) = Target::from_env() {
            info!("Using ENV variables");
            return Ok(Self {
                target,
                source: TargetSource::Environment,
                ignore_cert,
            });
        }

        let store = ConfigStore::open(config)?;
        Self::from_store(store, ignore_cert)
    }

    fn from_store(store: ConfigStore, ignore_cert: bool) -> Result<Self> {
        let (name, target) = store.current_target()?;
        info!("Using config: {} Target: {}", store.path().display(), name);

        Ok(Self {
            target,
            source: TargetSource::File { store, name },
            ignore_cert,
        })
    }

    /// Persist tokens issued during this run
    ///
    /// Environment targets are never written anywhere.
    pub fn persist_session(&mut self, session: &Session) -> Result<()> {
        if !session.refreshed {
            return Ok(());
        }

        self.target.accesstoken = Some(session.access_token.clone());
        if session.api_token.is_some() {
            self.target.apitoken = session.api_token.clone();
        }

        match &mut self.source {
            TargetSource::Environment => {
                debug!("target from environment, not persisting tokens");
                Ok(())
            }
            TargetSource::File { store, name } => {
                store.update_tokens(name, session)?;
                store.save()?;
                debug!("saved refreshed tokens to {}", store.path().display());
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
currentTargetName: lab
target:
  lab:
    server: vra.example.com/
    username: admin
    password: secret
    domain: System Domain
  cloud:
    server: https://api.mgmt.cloud.vmware.com
    apitoken: refresh
"#;

    fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_env_target_requires_server() {
        let vars: HashMap<&str, &str> = HashMap::from([("CS_USERNAME", "admin")]);
        assert!(Target::from_lookup(|k| vars.get(k).map(|v| v.to_string())).is_none());

        let vars: HashMap<&str, &str> = HashMap::from([
            ("CS_SERVER", "vra.example.com"),
            ("CS_ACCESSTOKEN", "token"),
            ("CS_DOMAIN", ""),
        ]);
        let target = Target::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(target.server.as_deref(), Some("vra.example.com"));
        assert_eq!(target.accesstoken.as_deref(), Some("token"));
        assert!(target.domain.is_none());
    }

    #[test]
    fn test_base_url() {
        let mut target = Target {
            server: Some(" vra.example.com/ ".to_string()),
            ..Default::default()
        };
        assert_eq!(target.base_url().unwrap(), "https://vra.example.com");

        target.server = Some("http://127.0.0.1:8080/".to_string());
        assert_eq!(target.base_url().unwrap(), "http://127.0.0.1:8080");

        target.server = None;
        assert!(target.base_url().is_err());
    }

    #[test]
    fn test_load_current_target() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, SAMPLE);

        let store = ConfigStore::open(Some(&path)).unwrap();
        let (name, target) = store.current_target().unwrap();
        assert_eq!(name, "lab");
        assert_eq!(target.domain.as_deref(), Some("System Domain"));
        assert_eq!(store.file.target.len(), 2);
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let dir = TempDir::new().unwrap();
        let err = ConfigStore::open(Some(&dir.path().join("nope.yaml"))).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_unknown_current_target_is_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "currentTargetName: gone\ntarget: {}\n");

        let store = ConfigStore::load(&path).unwrap();
        let err = Context::from_store(store, false).unwrap_err();
        assert!(err.to_string().contains("Target configuration not found"));
    }

    #[test]
    fn test_empty_file_has_no_target() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "");

        let store = ConfigStore::load(&path).unwrap();
        assert_eq!(store.file, ConfigFile::default());
        assert!(store.current_target().is_err());
    }

    #[test]
    fn test_refreshed_tokens_round_trip_through_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, SAMPLE);

        let store = ConfigStore::load(&path).unwrap();
        let mut ctx = Context::from_store(store, false).unwrap();
        ctx.persist_session(&Session {
            api_token: Some("issued".to_string()),
            access_token: "access".to_string(),
            refreshed: true,
        })
        .unwrap();

        let reloaded = ConfigStore::load(&path).unwrap();
        let (_, target) = reloaded.current_target().unwrap();
        assert_eq!(target.apitoken.as_deref(), Some("issued"));
        assert_eq!(target.accesstoken.as_deref(), Some("access"));
        assert_eq!(target.password.as_deref(), Some("secret"));
        assert!(reloaded.file.target["cloud"].accesstoken.is_none());
    }

    #[test]
    fn test_unrefreshed_session_is_not_written() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, SAMPLE);

        let store = ConfigStore::load(&path).unwrap();
        let mut ctx = Context::from_store(store, false).unwrap();
        ctx.persist_session(&Session {
            api_token: None,
            access_token: "same".to_string(),
            refreshed: false,
        })
        .unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), SAMPLE);
    }

    #[test]
    fn test_target_management() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, SAMPLE);
        let mut store = ConfigStore::load(&path).unwrap();

        assert!(store.use_target("missing").is_err());
        store.use_target("cloud").unwrap();

        let created = store.set_target(
            "lab",
            Target {
                username: Some("operator".to_string()),
                ..Default::default()
            },
        );
        assert!(!created);
        assert_eq!(store.file.target["lab"].username.as_deref(), Some("operator"));
        assert_eq!(store.file.target["lab"].password.as_deref(), Some("secret"));

        store.delete_target("cloud").unwrap();
        assert!(store.file.current_target_name.is_none());
        assert!(store.delete_target("cloud").is_err());

        store.save().unwrap();
        let reloaded = ConfigStore::load(&path).unwrap();
        assert_eq!(reloaded.file, store.file);
    }
}
