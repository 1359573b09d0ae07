//! # caskkit
//!
//! Homebrew cask provider.
//!
//! This crate implements the [`declarative::PackageProvider`] contract for
//! macOS casks:
//! - `query` reads the caskroom on disk and reports the installed version
//! - `install` runs `brew install <tap>/<name>` with a GUI password prompt
//!   available to `sudo`
//! - `uninstall` runs `brew uninstall --force <name>`
//!
//! ## Example
//!
//! ```no_run
//! use caskkit::{BrewCask, ProviderSettings};
//!
//! let casks = BrewCask::new(ProviderSettings::from_env());
//!
//! match casks.query("firefox").expect("query failed") {
//!     Some(status) => println!("firefox {}", status.version),
//!     None => casks.install("firefox", &[]).expect("install failed"),
//! }
//! ```
//!
//! ## Caskroom
//!
//! Installed state is never cached. Each query picks the caskroom again
//! (the legacy `/opt/homebrew-cask/Caskroom` wins when it exists) and reads
//! the version directories under it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod askpass;
pub mod backend;
pub mod caskroom;
pub mod error;
pub mod settings;
pub mod types;
pub mod user;

pub use error::{Error, Result};
pub use settings::ProviderSettings;
pub use types::CaskName;

use askpass::AskpassScript;
use backend::{Backend, CommandOutput, Invocation};
use declarative::{PackageProvider, PackageStatus};
use std::path::{Path, PathBuf};

/// Resource type reported for casks
pub const RESOURCE_TYPE: &str = "brew_cask";

/// Cask provider backed by the `brew` CLI.
pub struct BrewCask {
    settings: ProviderSettings,
    backend: Box<dyn Backend>,
}

impl BrewCask {
    /// Create a provider that runs real `brew` processes.
    pub fn new(settings: ProviderSettings) -> Self {
        Self::with_backend(settings, Box::new(backend::default_backend()))
    }

    /// Create a provider with a custom backend (useful for testing).
    pub fn with_backend(settings: ProviderSettings, backend: Box<dyn Backend>) -> Self {
        Self { settings, backend }
    }

    /// Settings this provider was created with.
    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    /// The caskroom that queries read right now.
    pub fn caskroom(&self) -> PathBuf {
        caskroom::resolve(&self.settings.legacy_caskroom, &self.settings.homebrew_root)
    }

    // =========================================================================
    // Host Operations
    // =========================================================================

    /// Report the installed version of a cask, or `None` if it is absent.
    pub fn query(&self, name: &str) -> Result<Option<PackageStatus>> {
        let name = CaskName::new(name)?;
        let version = caskroom::current_version(&self.caskroom(), &name)?;

        Ok(version.map(|version| PackageStatus {
            name: name.to_string(),
            version,
        }))
    }

    /// Install a cask, appending `options` to the `brew install` command.
    ///
    /// An ask-pass script is created for the duration of the command and
    /// removed afterwards, whether the install succeeded or not.
    pub fn install(&self, name: &str, options: &[String]) -> Result<()> {
        let name = CaskName::new(name)?;
        log::info!("Installing cask {name}");

        let script = AskpassScript::create(&self.settings.askpass_dir, &name)?;
        let result = self
            .install_invocation(&name, options, script.path())
            .and_then(|invocation| self.run_checked(&invocation));
        script.remove();

        result.map(|_| ())
    }

    /// Uninstall a cask. Always forced; never prompts.
    pub fn uninstall(&self, name: &str) -> Result<()> {
        let name = CaskName::new(name)?;
        log::info!("Uninstalling cask {name}");

        let invocation = self.uninstall_invocation(&name)?;
        self.run_checked(&invocation)?;
        Ok(())
    }

    // =========================================================================
    // Command Construction
    // =========================================================================

    fn install_invocation(
        &self,
        name: &CaskName,
        options: &[String],
        askpass: &Path,
    ) -> Result<Invocation> {
        let mut env = self.settings.command_environment();
        env.insert(
            "SUDO_ASKPASS".to_string(),
            askpass.to_string_lossy().into_owned(),
        );

        let extra = options.iter().filter(|o| !o.is_empty()).cloned();

        Ok(Invocation::new(&self.settings.brew_command)
            .arg("install")
            .arg(format!("{}/{}", self.settings.tap, name))
            .args(extra)
            .env(env)
            .run_as(user::run_as(&self.settings.user)?))
    }

    fn uninstall_invocation(&self, name: &CaskName) -> Result<Invocation> {
        Ok(Invocation::new(&self.settings.brew_command)
            .args(["uninstall", "--force", name.as_str()])
            .env(self.settings.command_environment())
            .run_as(user::run_as(&self.settings.user)?))
    }

    /// Run a command, turning a non-zero exit into an error.
    fn run_checked(&self, invocation: &Invocation) -> Result<CommandOutput> {
        let output = self.backend.run(invocation)?;

        if !output.success {
            return Err(Error::CommandFailed {
                command: invocation.to_string(),
                code: output.code,
                output: output.output,
            });
        }

        log::debug!("{}", output.output.trim_end());
        Ok(output)
    }
}

impl PackageProvider for BrewCask {
    fn query(&self, name: &str) -> anyhow::Result<Option<PackageStatus>> {
        Ok(Self::query(self, name)?)
    }

    fn install(&self, name: &str, options: &[String]) -> anyhow::Result<()> {
        Ok(Self::install(self, name, options)?)
    }

    fn uninstall(&self, name: &str) -> anyhow::Result<()> {
        Ok(Self::uninstall(self, name)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// Records every invocation, and whether SUDO_ASKPASS pointed at an
    /// existing file while the command "ran".
    #[derive(Clone, Default)]
    struct RecordingBackend {
        calls: Arc<Mutex<Vec<Invocation>>>,
        askpass_seen: Arc<Mutex<Vec<bool>>>,
        fail_with: Option<i32>,
        cannot_spawn: bool,
    }

    impl RecordingBackend {
        fn failing(code: i32) -> Self {
            Self {
                fail_with: Some(code),
                ..Default::default()
            }
        }

        fn unspawnable() -> Self {
            Self {
                cannot_spawn: true,
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<Invocation> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Backend for RecordingBackend {
        fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
            if let Some(path) = invocation.env.get("SUDO_ASKPASS") {
                self.askpass_seen
                    .lock()
                    .unwrap()
                    .push(Path::new(path).is_file());
            }
            self.calls.lock().unwrap().push(invocation.clone());

            if self.cannot_spawn {
                return Err(Error::Spawn {
                    program: invocation.program.clone(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                });
            }

            Ok(match self.fail_with {
                Some(code) => CommandOutput::failed(code, "Error: Download failed\n"),
                None => CommandOutput::ok("==> Installing Cask\n"),
            })
        }
    }

    struct Fixture {
        _tmp: TempDir,
        settings: ProviderSettings,
    }

    impl Fixture {
        fn new() -> Self {
            let tmp = TempDir::new().unwrap();
            let askpass_dir = tmp.path().join("tmp");
            fs::create_dir_all(&askpass_dir).unwrap();

            let settings = ProviderSettings {
                homebrew_root: tmp.path().join("homebrew"),
                legacy_caskroom: tmp.path().join("homebrew-cask").join("Caskroom"),
                tap: "homebrew/cask".to_string(),
                brew_command: "brew".to_string(),
                // Never triggers a uid switch, whether or not tests run as root.
                user: "root".to_string(),
                askpass_dir,
            };
            Self {
                _tmp: tmp,
                settings,
            }
        }

        fn provider(&self, backend: &RecordingBackend) -> BrewCask {
            BrewCask::with_backend(self.settings.clone(), Box::new(backend.clone()))
        }

        fn install_version(&self, caskroom: &Path, name: &str, version: &str) {
            fs::create_dir_all(caskroom.join(name).join(version)).unwrap();
        }

        fn leftover_scripts(&self) -> usize {
            fs::read_dir(&self.settings.askpass_dir).unwrap().count()
        }
    }

    #[test]
    fn test_query_absent() {
        let fx = Fixture::new();
        let provider = fx.provider(&RecordingBackend::default());
        assert_eq!(provider.query("firefox").unwrap(), None);
    }

    #[test]
    fn test_query_reads_current_caskroom() {
        let fx = Fixture::new();
        let caskroom = fx.settings.homebrew_root.join("Caskroom");
        fx.install_version(&caskroom, "firefox", "118.0");
        fx.install_version(&caskroom, "firefox", "119.0.1");

        let provider = fx.provider(&RecordingBackend::default());
        assert_eq!(
            provider.query("firefox").unwrap(),
            Some(PackageStatus {
                name: "firefox".to_string(),
                version: "119.0.1".to_string(),
            })
        );
    }

    #[test]
    fn test_query_prefers_legacy_caskroom() {
        let fx = Fixture::new();
        fx.install_version(&fx.settings.legacy_caskroom, "firefox", "40.0");
        fx.install_version(&fx.settings.homebrew_root.join("Caskroom"), "firefox", "119.0");

        let provider = fx.provider(&RecordingBackend::default());
        assert_eq!(provider.caskroom(), fx.settings.legacy_caskroom);
        assert_eq!(provider.query("firefox").unwrap().unwrap().version, "40.0");
    }

    #[test]
    fn test_query_does_not_run_commands() {
        let fx = Fixture::new();
        let backend = RecordingBackend::default();
        fx.provider(&backend).query("firefox").unwrap();
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_query_rejects_invalid_name() {
        let fx = Fixture::new();
        let provider = fx.provider(&RecordingBackend::default());
        assert!(matches!(
            provider.query("../Caskroom"),
            Err(Error::InvalidName { .. })
        ));
    }

    #[test]
    fn test_install_command_line() {
        let fx = Fixture::new();
        let backend = RecordingBackend::default();
        fx.provider(&backend)
            .install("firefox", &["--appdir=/Applications".to_string()])
            .unwrap();

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "brew");
        assert_eq!(
            calls[0].args,
            vec!["install", "homebrew/cask/firefox", "--appdir=/Applications"]
        );
    }

    #[test]
    fn test_install_without_options_has_no_trailing_args() {
        let fx = Fixture::new();
        let backend = RecordingBackend::default();
        let provider = fx.provider(&backend);

        provider.install("firefox", &[]).unwrap();
        provider
            .install("firefox", &[String::new(), String::new()])
            .unwrap();

        for call in backend.calls() {
            assert_eq!(call.args, vec!["install", "homebrew/cask/firefox"]);
        }
    }

    #[test]
    fn test_install_environment() {
        let fx = Fixture::new();
        let backend = RecordingBackend::default();
        fx.provider(&backend).install("docker", &[]).unwrap();

        let env = &backend.calls()[0].env;
        assert_eq!(env["HOME"], "/Users/root");
        assert_eq!(
            env["PATH"],
            format!(
                "{}/bin:/usr/bin:/usr/sbin:/bin:/sbin",
                fx.settings.homebrew_root.display()
            )
        );
        assert_eq!(env["HOMEBREW_NO_EMOJI"], "Yes");
        assert!(Path::new(&env["SUDO_ASKPASS"]).starts_with(&fx.settings.askpass_dir));
        assert_eq!(env.len(), 4);
    }

    #[test]
    fn test_install_removes_askpass_on_success() {
        let fx = Fixture::new();
        let backend = RecordingBackend::default();
        fx.provider(&backend).install("docker", &[]).unwrap();

        assert_eq!(*backend.askpass_seen.lock().unwrap(), vec![true]);
        assert_eq!(fx.leftover_scripts(), 0);
    }

    #[test]
    fn test_install_removes_askpass_on_failure() {
        let fx = Fixture::new();
        let backend = RecordingBackend::failing(1);
        let err = fx.provider(&backend).install("docker", &[]).unwrap_err();

        match err {
            Error::CommandFailed { code, output, .. } => {
                assert_eq!(code, Some(1));
                assert!(output.contains("Download failed"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(*backend.askpass_seen.lock().unwrap(), vec![true]);
        assert_eq!(fx.leftover_scripts(), 0);
    }

    #[test]
    fn test_install_removes_askpass_when_spawn_fails() {
        let fx = Fixture::new();
        let backend = RecordingBackend::unspawnable();
        let err = fx.provider(&backend).install("docker", &[]).unwrap_err();

        assert!(matches!(err, Error::Spawn { ref program, .. } if program == "brew"));
        assert_eq!(*backend.askpass_seen.lock().unwrap(), vec![true]);
        assert_eq!(fx.leftover_scripts(), 0);
    }

    #[test]
    fn test_install_removes_askpass_when_user_is_unknown() {
        // Identity lookup only happens when running as root.
        if !user::is_root() {
            return;
        }
        let mut fx = Fixture::new();
        fx.settings.user = "brewcask-no-such-user".to_string();
        let backend = RecordingBackend::default();

        let err = fx.provider(&backend).install("docker", &[]).unwrap_err();

        assert!(matches!(err, Error::UnknownUser(_)));
        assert!(backend.calls().is_empty());
        assert_eq!(fx.leftover_scripts(), 0);
    }

    #[test]
    fn test_install_invalid_name_runs_nothing() {
        let fx = Fixture::new();
        let backend = RecordingBackend::default();
        assert!(fx.provider(&backend).install("a b", &[]).is_err());
        assert!(backend.calls().is_empty());
        assert_eq!(fx.leftover_scripts(), 0);
    }

    #[test]
    fn test_uninstall_is_forced() {
        let fx = Fixture::new();
        let backend = RecordingBackend::default();
        fx.provider(&backend).uninstall("firefox").unwrap();

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].args, vec!["uninstall", "--force", "firefox"]);
        assert!(!calls[0].env.contains_key("SUDO_ASKPASS"));
    }

    #[test]
    fn test_uninstall_failure_is_surfaced() {
        let fx = Fixture::new();
        let backend = RecordingBackend::failing(1);
        assert!(matches!(
            fx.provider(&backend).uninstall("firefox"),
            Err(Error::CommandFailed { .. })
        ));
        assert_eq!(backend.calls().len(), 1);
    }

    #[test]
    fn test_provider_trait_round_trip() {
        let fx = Fixture::new();
        let backend = RecordingBackend::default();
        let provider: Box<dyn PackageProvider> = Box::new(fx.provider(&backend));

        assert!(provider.query("firefox").unwrap().is_none());
        provider.install("firefox", &[]).unwrap();
        provider.uninstall("firefox").unwrap();
        assert_eq!(backend.calls().len(), 2);
    }
}
