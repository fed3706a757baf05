//! Role-based login.
//!
//! Each [`Role`] has a username and password held as secrets named
//! `<ROLE>_USER` and `<ROLE>_PASS` (e.g. `ADMIN_USER`). Login tries the
//! roles in [`Role::ALL`] order and the first match wins. A role whose
//! secrets are missing is skipped.
//!
//! # Example
//!
//! ```
//! use lotus_ahp::auth::{Role, Section};
//!
//! assert!(Role::Admin.can_access(Section::Registration));
//! assert!(!Role::Utente.can_access(Section::Administration));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::traits::SecretProvider;

/// A workshop application area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// Participant registration and questionnaires.
    Registration,
    /// Results and analysis.
    Administration,
    /// Catalog and question management.
    Admin,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registration => f.write_str("registration"),
            Self::Administration => f.write_str("administration"),
            Self::Admin => f.write_str("admin"),
        }
    }
}

/// Login role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Workshop participant.
    Utente,
    /// Municipal administration.
    Amministrazione,
    /// Full access.
    Admin,
}

impl Role {
    /// Roles in login priority order.
    pub const ALL: [Self; 3] = [Self::Utente, Self::Amministrazione, Self::Admin];

    /// Lowercase role name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Utente => "utente",
            Self::Amministrazione => "amministrazione",
            Self::Admin => "admin",
        }
    }

    /// Secret key holding this role's username.
    #[must_use]
    pub fn user_key(self) -> String {
        format!("{}_USER", self.as_str().to_ascii_uppercase())
    }

    /// Secret key holding this role's password.
    #[must_use]
    pub fn password_key(self) -> String {
        format!("{}_PASS", self.as_str().to_ascii_uppercase())
    }

    /// Sections this role may open.
    #[must_use]
    pub const fn sections(self) -> &'static [Section] {
        match self {
            Self::Utente => &[Section::Registration],
            Self::Amministrazione => &[Section::Administration],
            Self::Admin => &[Section::Registration, Section::Administration, Section::Admin],
        }
    }

    /// Whether this role may open `section`.
    #[must_use]
    pub fn can_access(self, section: Section) -> bool {
        self.sections().contains(&section)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utente" => Ok(Self::Utente),
            "amministrazione" => Ok(Self::Amministrazione),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Authenticated role.
    pub role: Role,
    /// Neighborhood the session works in.
    pub neighborhood: String,
    /// Round table, when known.
    pub round_table: Option<String>,
}

impl Session {
    /// Create a session for `role`.
    #[must_use]
    pub fn new(role: Role, neighborhood: impl Into<String>) -> Self {
        Self {
            role,
            neighborhood: neighborhood.into(),
            round_table: None,
        }
    }

    /// Set the round table.
    #[must_use]
    pub fn with_round_table(mut self, round_table: impl Into<String>) -> Self {
        self.round_table = Some(round_table.into());
        self
    }

    /// Whether the session may open `section`.
    #[must_use]
    pub fn can_access(&self, section: Section) -> bool {
        self.role.can_access(section)
    }

    /// Fail unless the session may open `section`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::AccessDenied`] otherwise.
    pub fn require(&self, section: Section) -> Result<(), AuthError> {
        if self.can_access(section) {
            Ok(())
        } else {
            Err(AuthError::AccessDenied {
                role: self.role.to_string(),
                section: section.to_string(),
            })
        }
    }
}

/// Checks credentials against secret-sourced role accounts.
#[derive(Debug, Clone)]
pub struct Authenticator<P: SecretProvider> {
    secrets: P,
}

impl<P: SecretProvider> Authenticator<P> {
    /// Create an authenticator over `secrets`.
    pub const fn new(secrets: P) -> Self {
        Self { secrets }
    }

    /// Return the role whose credentials match.
    ///
    /// Username and password are both compared in constant time for every
    /// configured role.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NoCredentials`] if no role is configured and
    /// [`AuthError::InvalidCredentials`] if nothing matches.
    #[allow(clippy::needless_bitwise_bool)]
    pub fn login(&self, username: &str, password: &str) -> Result<Role, AuthError> {
        let mut configured = 0_usize;

        for role in Role::ALL {
            let (Some(user), Some(pass)) = (
                self.secrets.get_secret(&role.user_key()),
                self.secrets.get_secret(&role.password_key()),
            ) else {
                tracing::warn!(role = %role, "Credentials not configured, skipping role");
                continue;
            };
            configured += 1;

            // Non-short-circuit `&` keeps both comparisons running.
            if user.matches(username) & pass.matches(password) {
                tracing::info!(role = %role, "Login succeeded");
                return Ok(role);
            }
        }

        if configured == 0 {
            return Err(AuthError::NoCredentials);
        }

        tracing::warn!("Login failed");
        Err(AuthError::InvalidCredentials)
    }

    /// Log in and open a session in `neighborhood`.
    ///
    /// # Errors
    ///
    /// See [`Authenticator::login`].
    pub fn open_session(
        &self,
        username: &str,
        password: &str,
        neighborhood: impl Into<String>,
    ) -> Result<Session, AuthError> {
        let role = self.login(username, password)?;
        Ok(Session::new(role, neighborhood))
    }
}
