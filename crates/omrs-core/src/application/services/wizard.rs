//! Interactive dialogues built on the [`Prompter`] port.
//!
//! Every `*_or_prompt` helper returns the supplied value when there is one
//! and asks otherwise, so commands behave the same whether an option was
//! passed on the command line or answered at the prompt.

use tracing::debug;

use crate::application::{
    ApplicationError,
    ports::{Prompter, ServerStore},
};
use crate::domain::{DatabaseConfig, DbDriver, DomainError, DomainValidator, Version};
use crate::error::SdkResult;

/// Attempts before a question that keeps getting invalid answers gives up.
const MAX_ATTEMPTS: usize = 10;

const DEFAULT_SERVER_ID: &str = "server";
const PLATFORM_CHOICE: &str = "Platform";
const DISTRIBUTION_CHOICE: &str = "Distribution";

/// What a server should run: a distribution manifest or a bare platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallTarget {
    /// Manifest path or `artifactId:version` coordinates.
    Distribution(String),
    /// Platform version.
    Platform(String),
}

/// Question/answer helpers shared by the services.
pub struct Wizard<'a> {
    prompter: &'a dyn Prompter,
}

impl<'a> Wizard<'a> {
    pub fn new(prompter: &'a dyn Prompter) -> Self {
        Self { prompter }
    }

    pub fn show(&self, message: &str) {
        self.prompter.show(message);
    }

    /// The value if present and non-blank, else the answer to `prompt`.
    pub fn value_or_prompt(
        &self,
        value: Option<&str>,
        prompt: &str,
        default: Option<&str>,
    ) -> SdkResult<String> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(value) => Ok(value.to_string()),
            None => self.prompter.ask(prompt, default),
        }
    }

    /// Like [`Self::value_or_prompt`], re-asking until `validate` accepts
    /// the answer. An invalid supplied value is reported and then asked for.
    pub fn validated<T>(
        &self,
        value: Option<&str>,
        prompt: &str,
        default: Option<&str>,
        validate: impl Fn(&str) -> Result<T, DomainError>,
    ) -> SdkResult<T> {
        let mut candidate = self.value_or_prompt(value, prompt, default)?;
        for _ in 0..MAX_ATTEMPTS {
            match validate(&candidate) {
                Ok(valid) => return Ok(valid),
                Err(e) => {
                    debug!(answer = %candidate, error = %e, "Rejected answer");
                    self.prompter.show(&e.to_string());
                    candidate = self.prompter.ask(prompt, default)?;
                }
            }
        }
        validate(&candidate).map_err(|e| ApplicationError::ValidationFailed(e.to_string()).into())
    }

    /// Numbered choice between `options`.
    ///
    /// With `custom` set an extra entry lets the user type a value of their
    /// own, asked with that text as the prompt. An answer may be the option
    /// number or the option text itself.
    pub fn choose(
        &self,
        prompt: &str,
        options: &[String],
        custom: Option<&str>,
    ) -> SdkResult<String> {
        if options.is_empty() {
            return match custom {
                Some(custom_prompt) => self.prompter.ask(custom_prompt, None),
                None => Err(ApplicationError::ValidationFailed(format!(
                    "no options available for '{prompt}'"
                ))
                .into()),
            };
        }

        self.prompter.show(prompt);
        for (i, option) in options.iter().enumerate() {
            self.prompter.show(&format!("{}) {}", i + 1, option));
        }
        let custom_index = options.len() + 1;
        if custom.is_some() {
            self.prompter.show(&format!("{custom_index}) Other..."));
        }

        for _ in 0..MAX_ATTEMPTS {
            let answer = self.prompter.ask("Which one?", Some("1"))?;
            let answer = answer.trim();

            if let Some(found) = options.iter().find(|o| o.as_str() == answer) {
                return Ok(found.clone());
            }
            match answer.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(options[n - 1].clone()),
                Ok(n) if n == custom_index => {
                    if let Some(custom_prompt) = custom {
                        return self.prompter.ask(custom_prompt, None);
                    }
                }
                _ => {}
            }
            self.prompter
                .show(&format!("'{answer}' is not a valid choice, try again"));
        }

        Err(ApplicationError::ValidationFailed(format!("no valid choice for '{prompt}'")).into())
    }

    /// Yes/no question; a blank answer means yes.
    pub fn yes_no(&self, prompt: &str) -> SdkResult<bool> {
        let answer = self.prompter.ask(&format!("{prompt} [Y/n]"), Some("y"))?;
        Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
    }

    /// Id for a new server. The default is the first of `server`,
    /// `server1`, `server2`, ... that is not taken.
    pub fn server_id_or_prompt(
        &self,
        value: Option<&str>,
        store: &dyn ServerStore,
    ) -> SdkResult<String> {
        let default = next_free_server_id(store);
        self.validated(
            value,
            "Specify server id",
            Some(&default),
            DomainValidator::server_id,
        )
    }

    /// Id of an existing server; defaults to the most recently used one.
    pub fn existing_server_or_prompt(
        &self,
        value: Option<&str>,
        store: &dyn ServerStore,
    ) -> SdkResult<String> {
        let server_id = match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(id) => id.to_string(),
            None => {
                let servers = store.list()?;
                if !servers.is_empty() {
                    self.prompter
                        .show(&format!("Recent servers: {}", servers.join(", ")));
                }
                self.prompter
                    .ask("Specify server id", servers.first().map(String::as_str))?
            }
        };

        if !store.exists(&server_id) {
            return Err(ApplicationError::ServerNotFound { id: server_id }.into());
        }
        Ok(server_id)
    }

    /// Distribution or platform version, from the supplied options or asked.
    ///
    /// Platform versions are offered from `platform_versions` with a custom
    /// entry; a custom version must parse as a dotted numeric version.
    pub fn install_target_or_prompt(
        &self,
        distribution: Option<&str>,
        platform_version: Option<&str>,
        platform_versions: &[String],
    ) -> SdkResult<InstallTarget> {
        if let Some(reference) = distribution.map(str::trim).filter(|v| !v.is_empty()) {
            return Ok(InstallTarget::Distribution(reference.to_string()));
        }
        if let Some(version) = platform_version.map(str::trim).filter(|v| !v.is_empty()) {
            Version::parse(version)?;
            return Ok(InstallTarget::Platform(version.to_string()));
        }

        let kinds = vec![PLATFORM_CHOICE.to_string(), DISTRIBUTION_CHOICE.to_string()];
        if self.choose("What would you like to install?", &kinds, None)? == DISTRIBUTION_CHOICE {
            let reference = self.prompter.ask(
                "Specify distribution (manifest path or artifactId:version)",
                None,
            )?;
            return Ok(InstallTarget::Distribution(reference.trim().to_string()));
        }

        let version = self.choose(
            "Which platform version would you like to install?",
            platform_versions,
            Some("Specify platform version"),
        )?;
        let version = self.validated(Some(&version), "Specify platform version", None, |v| {
            Version::parse(v).map(|_| v.to_string())
        })?;
        Ok(InstallTarget::Platform(version))
    }

    /// Database settings: H2 on request, MySQL otherwise.
    pub fn database_or_prompt(&self, value: Option<DatabaseConfig>) -> SdkResult<DatabaseConfig> {
        if let Some(database) = value {
            return Ok(database);
        }

        if self.yes_no(
            "Would you like to use the h2 database (note that some modules do not support it)?",
        )? {
            return Ok(DatabaseConfig::h2());
        }

        let default_uri = format!("{}/@DBNAME@", DbDriver::MySql.default_uri());
        let uri = self.prompter.ask("Specify database uri", Some(&default_uri))?;
        let user = self.prompter.ask("Specify database username", Some("root"))?;
        let password = self.prompter.ask("Specify database password", Some(""))?;

        Ok(DatabaseConfig::mysql(&uri, user, password))
    }
}

fn next_free_server_id(store: &dyn ServerStore) -> String {
    if !store.exists(DEFAULT_SERVER_ID) {
        return DEFAULT_SERVER_ID.to_string();
    }
    (1..)
        .map(|i| format!("{DEFAULT_SERVER_ID}{i}"))
        .find(|id| !store.exists(id))
        .unwrap_or_else(|| DEFAULT_SERVER_ID.to_string())
}
