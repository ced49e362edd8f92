//! In-memory environment store for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{EnvScope, EnvStore};
use crate::Result;

/// `EnvStore` backed by a map instead of the operating system.
#[derive(Debug, Default)]
pub struct MemoryEnv {
    vars: Mutex<HashMap<(EnvScope, String), String>>,
}

impl MemoryEnv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EnvStore for MemoryEnv {
    fn get(&self, name: &str, scope: EnvScope) -> Result<Option<String>> {
        let vars = self.vars.lock().unwrap_or_else(|e| e.into_inner());
        Ok(vars.get(&(scope, name.to_string())).cloned())
    }

    fn set(&self, name: &str, value: &str, scope: EnvScope) -> Result<()> {
        let mut vars = self.vars.lock().unwrap_or_else(|e| e.into_inner());
        vars.insert((scope, name.to_string()), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        let env = MemoryEnv::new();
        env.set("MAVEN_HOME", "/opt/maven/Maven3.9.9", EnvScope::Machine)
            .unwrap();

        assert_eq!(
            env.get("MAVEN_HOME", EnvScope::Machine).unwrap(),
            Some("/opt/maven/Maven3.9.9".to_string())
        );
    }

    #[test]
    fn test_scopes_are_independent() {
        let env = MemoryEnv::new();
        env.set("MAVEN_HOME", "/machine", EnvScope::Machine).unwrap();

        assert_eq!(env.get("MAVEN_HOME", EnvScope::User).unwrap(), None);
    }

    #[test]
    fn test_set_replaces_previous_value() {
        let env = MemoryEnv::new();
        env.set("MAVEN_HOME", "/old", EnvScope::Machine).unwrap();
        env.set("MAVEN_HOME", "/new", EnvScope::Machine).unwrap();

        assert_eq!(
            env.get("MAVEN_HOME", EnvScope::Machine).unwrap(),
            Some("/new".to_string())
        );
    }
}
