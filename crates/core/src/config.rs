use std::collections::BTreeMap;

/// Connection parameters the dialect resolves from a URL plus the host's
/// option bag. `extra` carries dialect-namespaced overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub project: String,
    pub instance: String,
    pub database: String,
    /// Custom endpoint (`host:port`), used for emulators and private routes.
    pub endpoint: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database_role: Option<String>,
    pub ignore_transaction_warnings: bool,
    pub extra: BTreeMap<String, String>,
}

impl ConnectionConfig {
    pub fn new(
        project: impl Into<String>,
        instance: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            instance: instance.into(),
            database: database.into(),
            endpoint: None,
            user: None,
            password: None,
            database_role: None,
            ignore_transaction_warnings: false,
            extra: BTreeMap::new(),
        }
    }

    /// Resource path in the form the backend addresses databases by.
    pub fn database_path(&self) -> String {
        format!(
            "projects/{}/instances/{}/databases/{}",
            self.project, self.instance, self.database
        )
    }
}
