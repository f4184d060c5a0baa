//! Read/write permission rules for the configuration editor.
//!
//! Rules are applied in order and can only narrow (true → false):
//!
//! ```text
//! 1. start with everything allowed
//! 2. preventWriteToDisk == true  or  allowConfigEdit == false  → no disk writes
//! 3. preventLocalSave == true                                   → no local saves
//! 4. disableConfiguration == true                               → nothing
//! 5. disableConfigurationForNonAdmin == true and not admin      → nothing
//! 6. guest session                                              → nothing
//! ```
//!
//! The result is never cached: the auth state can change between two reads
//! without the configuration being reloaded.

use serde::Serialize;

use crate::domain::config::AppConfig;

/// What the current viewer may do with the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionSet {
    pub allow_write_to_disk: bool,
    pub allow_save_locally: bool,
    pub allow_view_config: bool,
}

impl PermissionSet {
    /// Everything allowed.
    pub const ALL: PermissionSet = PermissionSet {
        allow_write_to_disk: true,
        allow_save_locally: true,
        allow_view_config: true,
    };

    /// Everything denied.
    pub const NONE: PermissionSet = PermissionSet {
        allow_write_to_disk: false,
        allow_save_locally: false,
        allow_view_config: false,
    };
}

/// Snapshot of the auth collaborator's answers at evaluation time.
///
/// The two flags are independent: a guest session overrides an admin flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthRole {
    pub is_admin: bool,
    pub is_guest: bool,
}

impl AuthRole {
    pub fn admin() -> Self {
        Self { is_admin: true, is_guest: false }
    }

    pub fn user() -> Self {
        Self { is_admin: false, is_guest: false }
    }

    pub fn guest() -> Self {
        Self { is_admin: false, is_guest: true }
    }
}

/// Computes the permission set for `app_config` as seen by `role`.
pub fn compute_permissions(app_config: &AppConfig, role: AuthRole) -> PermissionSet {
    let mut perms = PermissionSet::ALL;

    if app_config.is_true("preventWriteToDisk") || app_config.is_false("allowConfigEdit") {
        perms.allow_write_to_disk = false;
    }
    if app_config.is_true("preventLocalSave") {
        perms.allow_save_locally = false;
    }
    if app_config.is_true("disableConfiguration") {
        perms = PermissionSet::NONE;
    }
    if app_config.is_true("disableConfigurationForNonAdmin") && !role.is_admin {
        perms = PermissionSet::NONE;
    }
    if role.is_guest {
        perms = PermissionSet::NONE;
    }

    perms
}
