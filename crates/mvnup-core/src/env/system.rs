//! System-backed environment store.
//!
//! On Windows, variables are written to the registry keys the OS reads
//! persistent environment variables from: `HKLM\SYSTEM\CurrentControlSet\
//! Control\Session Manager\Environment` at machine scope and
//! `HKCU\Environment` at user scope. Machine scope needs elevation.
//!
//! On Unix there is no OS-level variable table, so the store persists an
//! `export` snippet that login shells source: `/etc/profile.d/mvnup.sh`
//! at machine scope (root required) and `~/.mvnup/env` at user scope.
//! `PATH` is rendered as `export PATH="$PATH:<entries>"` so the snippet
//! extends the search path instead of replacing it; `get("PATH", ..)`
//! returns only the entries this store manages.

use super::{EnvScope, EnvStore};
use crate::Result;

/// `EnvStore` backed by the operating system.
#[derive(Debug, Default)]
pub struct SystemEnv;

impl SystemEnv {
    pub fn new() -> Self {
        Self
    }
}

impl EnvStore for SystemEnv {
    fn get(&self, name: &str, scope: EnvScope) -> Result<Option<String>> {
        imp::get(name, scope)
    }

    fn set(&self, name: &str, value: &str, scope: EnvScope) -> Result<()> {
        imp::set(name, value, scope)
    }
}

#[cfg(windows)]
mod imp {
    use std::ffi::OsStr;
    use std::os::windows::ffi::OsStrExt;

    use windows_sys::Win32::Foundation::{ERROR_FILE_NOT_FOUND, ERROR_SUCCESS};
    use windows_sys::Win32::System::Registry::{
        RegCloseKey, RegOpenKeyExW, RegQueryValueExW, RegSetValueExW, HKEY,
        HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, KEY_QUERY_VALUE, KEY_SET_VALUE, REG_EXPAND_SZ,
        REG_SZ,
    };

    use super::{EnvScope, Result};
    use crate::MvnupError;

    const MACHINE_SUBKEY: &str = r"SYSTEM\CurrentControlSet\Control\Session Manager\Environment";
    const USER_SUBKEY: &str = "Environment";

    fn wide(s: &str) -> Vec<u16> {
        OsStr::new(s).encode_wide().chain(std::iter::once(0)).collect()
    }

    struct Key(HKEY);

    impl Key {
        fn open(scope: EnvScope, access: u32) -> Result<Self> {
            let (root, subkey) = match scope {
                EnvScope::Machine => (HKEY_LOCAL_MACHINE, MACHINE_SUBKEY),
                EnvScope::User => (HKEY_CURRENT_USER, USER_SUBKEY),
            };

            let subkey = wide(subkey);
            let mut handle: HKEY = std::ptr::null_mut();
            let status =
                unsafe { RegOpenKeyExW(root, subkey.as_ptr(), 0, access, &mut handle) };
            if status != ERROR_SUCCESS {
                return Err(MvnupError::Env(format!(
                    "failed to open {} environment key (status {})",
                    scope, status
                )));
            }

            Ok(Key(handle))
        }
    }

    impl Drop for Key {
        fn drop(&mut self) {
            unsafe { RegCloseKey(self.0) };
        }
    }

    pub(super) fn get(name: &str, scope: EnvScope) -> Result<Option<String>> {
        let key = Key::open(scope, KEY_QUERY_VALUE)?;
        let name = wide(name);

        let mut size: u32 = 0;
        let mut kind: u32 = 0;
        let status = unsafe {
            RegQueryValueExW(
                key.0,
                name.as_ptr(),
                std::ptr::null(),
                &mut kind,
                std::ptr::null_mut(),
                &mut size,
            )
        };
        if status == ERROR_FILE_NOT_FOUND {
            return Ok(None);
        }
        if status != ERROR_SUCCESS {
            return Err(MvnupError::Env(format!(
                "failed to query environment value (status {})",
                status
            )));
        }

        let mut buf = vec![0u8; size as usize];
        let status = unsafe {
            RegQueryValueExW(
                key.0,
                name.as_ptr(),
                std::ptr::null(),
                &mut kind,
                buf.as_mut_ptr(),
                &mut size,
            )
        };
        if status != ERROR_SUCCESS {
            return Err(MvnupError::Env(format!(
                "failed to read environment value (status {})",
                status
            )));
        }

        let units: Vec<u16> = buf
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        let end = units.iter().position(|&u| u == 0).unwrap_or(units.len());

        Ok(Some(String::from_utf16_lossy(&units[..end])))
    }

    pub(super) fn set(name: &str, value: &str, scope: EnvScope) -> Result<()> {
        let key = Key::open(scope, KEY_SET_VALUE)?;
        let name = wide(name);
        let data = wide(value);

        // The machine Path value conventionally holds unexpanded
        // references like %SystemRoot%; keep those expandable.
        let kind = if value.contains('%') { REG_EXPAND_SZ } else { REG_SZ };

        let status = unsafe {
            RegSetValueExW(
                key.0,
                name.as_ptr(),
                0,
                kind,
                data.as_ptr() as *const u8,
                (data.len() * 2) as u32,
            )
        };
        if status != ERROR_SUCCESS {
            return Err(MvnupError::Env(format!(
                "failed to write {} environment value (status {})",
                scope, status
            )));
        }

        Ok(())
    }
}

#[cfg(unix)]
mod imp {
    use std::path::PathBuf;

    use super::{EnvScope, Result};
    use crate::MvnupError;

    const SNIPPET_HEADER: &str = "# Managed by mvnup. Rerun mvnup to update.";

    fn snippet_path(scope: EnvScope) -> Result<PathBuf> {
        match scope {
            EnvScope::Machine => Ok(PathBuf::from("/etc/profile.d/mvnup.sh")),
            EnvScope::User => std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".mvnup").join("env"))
                .ok_or_else(|| MvnupError::Env("HOME is not set".to_string())),
        }
    }

    pub(super) fn get(name: &str, scope: EnvScope) -> Result<Option<String>> {
        let path = snippet_path(scope)?;
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(MvnupError::Env(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        Ok(content
            .lines()
            .filter_map(parse_line)
            .find(|(n, _)| n == name)
            .map(|(_, v)| v))
    }

    pub(super) fn set(name: &str, value: &str, scope: EnvScope) -> Result<()> {
        let path = snippet_path(scope)?;

        let mut entries: Vec<(String, String)> = match std::fs::read_to_string(&path) {
            Ok(content) => content.lines().filter_map(parse_line).collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(MvnupError::Env(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        match entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => entries.push((name.to_string(), value.to_string())),
        }

        let mut rendered = String::from(SNIPPET_HEADER);
        rendered.push('\n');
        for (n, v) in &entries {
            rendered.push_str(&render_line(n, v));
            rendered.push('\n');
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                MvnupError::Env(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }
        std::fs::write(&path, rendered).map_err(|e| {
            MvnupError::Env(format!("failed to write {}: {}", path.display(), e))
        })?;

        Ok(())
    }

    /// Render one variable as a sourceable shell line. `PATH` extends the
    /// inherited value rather than replacing it.
    fn render_line(name: &str, value: &str) -> String {
        if name == "PATH" {
            format!("export PATH=\"$PATH:{}\"", value)
        } else {
            format!("export {}=\"{}\"", name, value)
        }
    }

    fn parse_line(line: &str) -> Option<(String, String)> {
        let rest = line.trim().strip_prefix("export ")?;
        let (name, raw) = rest.split_once('=')?;
        let name = name.trim();
        let raw = raw.trim().trim_matches('"');
        let value = if name == "PATH" {
            raw.strip_prefix("$PATH:").unwrap_or(raw)
        } else {
            raw
        };
        Some((name.to_string(), value.to_string()))
    }

}
