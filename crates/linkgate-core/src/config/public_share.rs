//! Public link share manager configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Lowest accepted password hashing cost.
pub const MIN_PASSWORD_HASH_COST: u32 = 4;
/// Highest accepted password hashing cost.
pub const MAX_PASSWORD_HASH_COST: u32 = 20;

/// How far an inline cleanup, triggered by a read that observed an
/// expired share, reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InlineSweep {
    /// Run the same bulk sweep the janitor runs.
    #[default]
    Bulk,
    /// Orphan only the share that was observed.
    Single,
}

/// Settings for the public link share manager and its janitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicShareConfig {
    /// Store driver name: `"sql"` or `"memory"`.
    #[serde(default = "default_driver")]
    pub driver: String,
    /// Work factor for share password hashing.
    #[serde(default = "default_password_hash_cost")]
    pub password_hash_cost: u32,
    /// Whether expired shares are reclaimed (janitor and inline sweeps).
    #[serde(default)]
    pub enable_expired_shares_cleanup: bool,
    /// Seconds between two janitor sweeps.
    #[serde(default = "default_janitor_run_interval")]
    pub janitor_run_interval: u64,
    /// Reach of inline sweeps.
    #[serde(default)]
    pub inline_sweep: InlineSweep,
    /// Validity window of issued capability signatures, in seconds.
    #[serde(default = "default_signature_ttl")]
    pub signature_ttl_seconds: u64,
    /// Rows fetched per round trip when listing.
    #[serde(default = "default_list_batch_size")]
    pub list_batch_size: u32,
    /// Project space admin escalation settings.
    #[serde(default)]
    pub project_spaces: ProjectSpaceConfig,
}

/// Naming conventions used to recognize project spaces and their admin groups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSpaceConfig {
    /// Storage id prefix of project space instances.
    #[serde(default = "default_instance_prefix")]
    pub instance_prefix: String,
    /// Prefix of project groups.
    #[serde(default = "default_group_prefix")]
    pub group_prefix: String,
    /// Suffix appended to a project group to name its admin group.
    #[serde(default = "default_admin_group_suffix")]
    pub admin_group_suffix: String,
}

impl PublicShareConfig {
    /// Reject settings the manager cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if !(MIN_PASSWORD_HASH_COST..=MAX_PASSWORD_HASH_COST).contains(&self.password_hash_cost) {
            return Err(AppError::configuration(format!(
                "password_hash_cost must be between {MIN_PASSWORD_HASH_COST} and {MAX_PASSWORD_HASH_COST}, got {}",
                self.password_hash_cost
            )));
        }
        if self.janitor_run_interval == 0 {
            return Err(AppError::configuration(
                "janitor_run_interval must be greater than zero",
            ));
        }
        if self.signature_ttl_seconds == 0 {
            return Err(AppError::configuration(
                "signature_ttl_seconds must be greater than zero",
            ));
        }
        if self.list_batch_size == 0 {
            return Err(AppError::configuration(
                "list_batch_size must be greater than zero",
            ));
        }
        Ok(())
    }
}

impl Default for PublicShareConfig {
    fn default() -> Self {
        Self {
            driver: default_driver(),
            password_hash_cost: default_password_hash_cost(),
            enable_expired_shares_cleanup: false,
            janitor_run_interval: default_janitor_run_interval(),
            inline_sweep: InlineSweep::default(),
            signature_ttl_seconds: default_signature_ttl(),
            list_batch_size: default_list_batch_size(),
            project_spaces: ProjectSpaceConfig::default(),
        }
    }
}

impl Default for ProjectSpaceConfig {
    fn default() -> Self {
        Self {
            instance_prefix: default_instance_prefix(),
            group_prefix: default_group_prefix(),
            admin_group_suffix: default_admin_group_suffix(),
        }
    }
}

fn default_driver() -> String {
    "sql".to_string()
}

fn default_password_hash_cost() -> u32 {
    11
}

fn default_janitor_run_interval() -> u64 {
    3600
}

fn default_signature_ttl() -> u64 {
    3600
}

fn default_list_batch_size() -> u32 {
    256
}

fn default_instance_prefix() -> String {
    "newproject".to_string()
}

fn default_group_prefix() -> String {
    "cernbox-project-".to_string()
}

fn default_admin_group_suffix() -> String {
    "-admins".to_string()
}
