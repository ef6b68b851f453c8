use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::DomainError;

static MODULE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9.]*$").expect("module id pattern is valid"));

static MODULE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9.\s]*$").expect("module name pattern is valid")
});

static GROUP_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9.]*$").expect("group id pattern is valid"));

/// Centralized domain validation.
///
/// Validators return the normalised value so callers can store it directly.
pub struct DomainValidator;

impl DomainValidator {
    /// Module ids are lowercased before matching.
    pub fn module_id(input: &str) -> Result<String, DomainError> {
        let id = input.trim().to_lowercase();
        if MODULE_ID.is_match(&id) {
            Ok(id)
        } else {
            Err(DomainError::InvalidModuleId(input.to_string()))
        }
    }

    /// Module names get their first letter capitalised.
    pub fn module_name(input: &str) -> Result<String, DomainError> {
        let name = input.trim();
        if !MODULE_NAME.is_match(name) {
            return Err(DomainError::InvalidModuleName(input.to_string()));
        }
        let mut chars = name.chars();
        Ok(match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        })
    }

    pub fn group_id(input: &str) -> Result<String, DomainError> {
        let group = input.trim();
        if GROUP_ID.is_match(group) {
            Ok(group.to_string())
        } else {
            Err(DomainError::InvalidGroupId(input.to_string()))
        }
    }

    /// A server id names a directory directly under the servers root.
    pub fn server_id(input: &str) -> Result<String, DomainError> {
        let id = input.trim();
        let reason = if id.is_empty() {
            Some("must not be empty")
        } else if id == "." || id == ".." {
            Some("must not be a relative path component")
        } else if id.contains(['/', '\\']) {
            Some("must not contain path separators")
        } else if id.chars().any(char::is_whitespace) {
            Some("must not contain whitespace")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(DomainError::InvalidServerId {
                id: input.to_string(),
                reason: reason.into(),
            }),
            None => Ok(id.to_string()),
        }
    }
}
