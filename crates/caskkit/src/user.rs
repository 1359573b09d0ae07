//! Operating-user resolution.
//!
//! Casks are installed on behalf of a desktop user, not whoever happens to
//! run the provider. The user is picked in this order:
//! 1. An explicit override (settings or `BREWCASK_USER`)
//! 2. The user the current process runs as
//! 3. `root`

use crate::error::{Error, Result};

/// Environment variable that overrides the operating user
pub const ENV_USER: &str = "BREWCASK_USER";

/// Fallback when no user can be determined
pub const FALLBACK_USER: &str = "root";

/// A system account external commands can run as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    /// Login name
    pub name: String,
    /// Numeric user id
    pub uid: u32,
    /// Primary group id
    pub gid: u32,
}

/// Resolve the operating user from an override and the OS-reported user.
pub fn pick_user(override_user: Option<&str>, os_user: Option<String>) -> String {
    override_user
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string)
        .or(os_user.filter(|u| !u.is_empty()))
        .unwrap_or_else(|| FALLBACK_USER.to_string())
}

/// Resolve the operating user, consulting `BREWCASK_USER` when no override is given.
pub fn default_user(override_user: Option<&str>) -> String {
    let from_env = std::env::var(ENV_USER).ok();
    let override_user = override_user.or(from_env.as_deref());
    pick_user(override_user, invoking_user())
}

/// Name of the user the current process runs as.
#[cfg(unix)]
pub fn invoking_user() -> Option<String> {
    // SAFETY: getuid has no preconditions and cannot fail.
    let uid = unsafe { libc::getuid() };
    passwd::by_uid(uid).map(|entry| entry.name)
}

#[cfg(not(unix))]
pub fn invoking_user() -> Option<String> {
    std::env::var("USERNAME").ok()
}

/// Whether the current process has root privileges.
#[cfg(unix)]
pub fn is_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
pub fn is_root() -> bool {
    false
}

/// Look up a user account by name.
#[cfg(unix)]
pub fn lookup(name: &str) -> Result<UserIdentity> {
    passwd::by_name(name).ok_or_else(|| Error::UnknownUser(name.to_string()))
}

#[cfg(not(unix))]
pub fn lookup(name: &str) -> Result<UserIdentity> {
    Err(Error::UnknownUser(name.to_string()))
}

/// Identity to switch to before running external commands.
///
/// Only a root process switches; anyone else runs commands as themselves.
pub fn run_as(user: &str) -> Result<Option<UserIdentity>> {
    if !is_root() || user == FALLBACK_USER {
        return Ok(None);
    }
    lookup(user).map(Some)
}

#[cfg(unix)]
mod passwd {
    use super::UserIdentity;
    use std::ffi::{CStr, CString};
    use std::mem::MaybeUninit;

    pub fn by_name(name: &str) -> Option<UserIdentity> {
        let c_name = CString::new(name).ok()?;
        read_entry(|pwd, buf, len, result| {
            // SAFETY: all pointers come from read_entry and outlive the call.
            unsafe { libc::getpwnam_r(c_name.as_ptr(), pwd, buf, len, result) }
        })
    }

    pub fn by_uid(uid: libc::uid_t) -> Option<UserIdentity> {
        read_entry(|pwd, buf, len, result| {
            // SAFETY: all pointers come from read_entry and outlive the call.
            unsafe { libc::getpwuid_r(uid, pwd, buf, len, result) }
        })
    }

    fn read_entry<F>(getter: F) -> Option<UserIdentity>
    where
        F: FnOnce(
            *mut libc::passwd,
            *mut libc::c_char,
            libc::size_t,
            *mut *mut libc::passwd,
        ) -> libc::c_int,
    {
        let mut buf: Vec<libc::c_char> = vec![0; 4096];
        let mut pwd = MaybeUninit::<libc::passwd>::uninit();
        let mut result: *mut libc::passwd = std::ptr::null_mut();

        let rc = getter(pwd.as_mut_ptr(), buf.as_mut_ptr(), buf.len(), &mut result);
        if rc != 0 || result.is_null() {
            return None;
        }

        // SAFETY: a non-null result means pwd was filled in and pw_name
        // points into buf, which is still alive here.
        let (name, uid, gid) = unsafe {
            let pwd = pwd.assume_init();
            let name = CStr::from_ptr(pwd.pw_name).to_string_lossy().into_owned();
            (name, pwd.pw_uid, pwd.pw_gid)
        };

        Some(UserIdentity { name, uid, gid })
    }
}
