//! One-off `SUDO_ASKPASS` helper.
//!
//! Cask installers often call `sudo`, and `brew` runs them without a
//! terminal to type into. The generated script finds the terminal
//! application the process was launched from, asks for the password in a
//! dialog through that application, and prints the answer on stdout for
//! `sudo -A` to read.
//!
//! The script lives as long as its [`AskpassScript`] guard; dropping the
//! guard deletes the file.

use crate::error::{Error, Result};
use crate::types::CaskName;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempPath;

/// Prefix of the generated file name
const FILE_PREFIX: &str = "askpass";

/// Script body; `{name}` is replaced with the cask token.
const TEMPLATE: &str = r#"#!/bin/bash

APP_NAME=Terminal
term_pid=$PPID
while [ $term_pid -ne 1 ]; do
	ps="$(ps -o command= -p $term_pid)"
	if [[ "$ps" =~ Terminal ]]; then
		APP_NAME=Terminal
	fi
	if [[ "$ps" =~ iTerm ]]; then
		APP_NAME=iTerm.app
	fi
	term_pid=$(ps -o ppid= -p $term_pid)
done

osascript \
	-e "Tell application \"${APP_NAME}\" to display dialog \"Password for installing {name}:\" default answer \"\" with hidden answer" \
	-e 'text returned of result' 2>/dev/null
"#;

/// Render the script for `name`.
pub fn render(name: &CaskName) -> String {
    TEMPLATE.replace("{name}", name.as_str())
}

/// An executable ask-pass script on disk, removed when dropped.
#[derive(Debug)]
pub struct AskpassScript {
    path: TempPath,
}

impl AskpassScript {
    /// Write an executable ask-pass script for `name` into `dir`.
    pub fn create(dir: &Path, name: &CaskName) -> Result<Self> {
        let askpass_err = |source| Error::Askpass {
            dir: dir.to_path_buf(),
            source,
        };

        let mut file = tempfile::Builder::new()
            .prefix(FILE_PREFIX)
            .tempfile_in(dir)
            .map_err(askpass_err)?;

        file.write_all(render(name).as_bytes())
            .map_err(askpass_err)?;
        make_executable(file.path()).map_err(askpass_err)?;

        // Close the handle so the script can be exec'd.
        let path = file.into_temp_path();
        log::debug!("Created ask-pass script at {}", path.display());

        Ok(Self { path })
    }

    /// Location of the script.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the script now, logging rather than failing if that does not work.
    pub fn remove(self) {
        let shown: PathBuf = self.path.to_path_buf();
        match self.path.close() {
            Ok(()) => log::debug!("Removed ask-pass script {}", shown.display()),
            Err(e) => log::warn!(
                "Could not remove ask-pass script {}: {e}",
                shown.display()
            ),
        }
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cask(name: &str) -> CaskName {
        CaskName::new(name).unwrap()
    }

    #[test]
    fn test_render_mentions_cask_and_terminals() {
        let script = render(&cask("docker"));

        assert!(script.starts_with("#!/bin/bash\n"));
        assert!(script.contains("Password for installing docker:"));
        assert!(script.contains("APP_NAME=iTerm.app"));
        assert!(script.contains("with hidden answer"));
        assert!(script.contains("'text returned of result' 2>/dev/null"));
        assert!(!script.contains("{name}"));
    }

    #[test]
    fn test_create_writes_script_in_dir() {
        let tmp = TempDir::new().unwrap();
        let script = AskpassScript::create(tmp.path(), &cask("docker")).unwrap();

        assert!(script.path().starts_with(tmp.path()));
        let file_name = script.path().file_name().unwrap().to_string_lossy();
        assert!(file_name.starts_with("askpass"));
        let content = std::fs::read_to_string(script.path()).unwrap();
        assert_eq!(content, render(&cask("docker")));
    }

    #[cfg(unix)]
    #[test]
    fn test_script_is_executable() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let script = AskpassScript::create(tmp.path(), &cask("docker")).unwrap();
        let mode = std::fs::metadata(script.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn test_remove_deletes_file() {
        let tmp = TempDir::new().unwrap();
        let script = AskpassScript::create(tmp.path(), &cask("docker")).unwrap();
        let path = script.path().to_path_buf();

        script.remove();
        assert!(!path.exists());
    }

    #[test]
    fn test_drop_deletes_file() {
        let tmp = TempDir::new().unwrap();
        let path = {
            let script = AskpassScript::create(tmp.path(), &cask("docker")).unwrap();
            script.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_create_in_missing_dir_fails() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing");
        assert!(matches!(
            AskpassScript::create(&missing, &cask("docker")),
            Err(Error::Askpass { .. })
        ));
    }
}
