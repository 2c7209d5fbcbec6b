//! Domain types for admin principals and the permission matrix.
//!
//! The matrix is a fixed-shape struct (resource x action -> bool) so every
//! gate check is exhaustive at compile time. `read` is stored for shape
//! fidelity but never enforced: public GET routes skip the gate entirely.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "super-admin")]
    SuperAdmin,
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "editor")]
    Editor,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "super-admin",
            Self::Admin => "admin",
            Self::Editor => "editor",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "super-admin" => Some(Self::SuperAdmin),
            "admin" => Some(Self::Admin),
            "editor" => Some(Self::Editor),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content collections covered by the per-resource permission grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Blogs,
    Products,
    Careers,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Blogs => "blogs",
            Self::Products => "products",
            Self::Careers => "careers",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcePermissions {
    pub create: bool,
    pub read: bool,
    pub update: bool,
    pub delete: bool,
}

impl Default for ResourcePermissions {
    fn default() -> Self {
        Self {
            create: false,
            read: true,
            update: false,
            delete: false,
        }
    }
}

impl ResourcePermissions {
    #[must_use]
    pub const fn all() -> Self {
        Self {
            create: true,
            read: true,
            update: true,
            delete: true,
        }
    }

    #[must_use]
    pub const fn allows(&self, action: Action) -> bool {
        match action {
            Action::Create => self.create,
            Action::Read => self.read,
            Action::Update => self.update,
            Action::Delete => self.delete,
        }
    }
}

/// Per-principal capability grid, persisted as a JSON column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionSet {
    pub blogs: ResourcePermissions,
    pub products: ResourcePermissions,
    pub careers: ResourcePermissions,
    pub analytics: bool,
    pub settings: bool,
}

impl PermissionSet {
    /// The matrix persisted for every super-admin, regardless of caller input.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            blogs: ResourcePermissions::all(),
            products: ResourcePermissions::all(),
            careers: ResourcePermissions::all(),
            analytics: true,
            settings: true,
        }
    }

    #[must_use]
    pub const fn resource(&self, resource: Resource) -> &ResourcePermissions {
        match resource {
            Resource::Blogs => &self.blogs,
            Resource::Products => &self.products,
            Resource::Careers => &self.careers,
        }
    }
}

/// An authenticated admin identity, secret-free.
///
/// The password hash never leaves the repository layer; this is the
/// projection attached to requests and returned by every read path.
#[derive(Debug, Clone, Serialize)]
pub struct Admin {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub permissions: PermissionSet,
    pub is_active: bool,
    pub last_login: Option<String>,
    #[serde(skip_serializing)]
    pub login_attempts: i32,
    #[serde(skip_serializing)]
    pub lock_until: Option<String>,
    pub created_at: String,
}

impl Admin {
    /// Permission Gate: super-admin passes unconditionally, everyone else
    /// consults the stored matrix.
    #[must_use]
    pub fn allows(&self, resource: Resource, action: Action) -> bool {
        if self.role == Role::SuperAdmin {
            return true;
        }
        self.permissions.resource(resource).allows(action)
    }

    /// True while `lock_until` is set and still in the future. Unparseable
    /// timestamps count as unlocked rather than bricking the account.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.lock_until
            .as_deref()
            .and_then(|ts| chrono::DateTime::parse_from_rfc3339(ts).ok())
            .is_some_and(|until| until > chrono::Utc::now())
    }

    /// Standalone capabilities outside the resource grid.
    #[must_use]
    pub fn allows_analytics(&self) -> bool {
        self.role == Role::SuperAdmin || self.permissions.analytics
    }

    #[must_use]
    pub fn allows_settings(&self) -> bool {
        self.role == Role::SuperAdmin || self.permissions.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin_with(role: Role, permissions: PermissionSet) -> Admin {
        Admin {
            id: "a-1".to_string(),
            email: "editor@example.com".to_string(),
            name: "Editor".to_string(),
            role,
            permissions,
            is_active: true,
            last_login: None,
            login_attempts: 0,
            lock_until: None,
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_default_matrix_is_read_only() {
        let perms = PermissionSet::default();
        for resource in [Resource::Blogs, Resource::Products, Resource::Careers] {
            assert!(perms.resource(resource).allows(Action::Read));
            assert!(!perms.resource(resource).allows(Action::Create));
            assert!(!perms.resource(resource).allows(Action::Update));
            assert!(!perms.resource(resource).allows(Action::Delete));
        }
        assert!(!perms.analytics);
        assert!(!perms.settings);
    }

    #[test]
    fn test_super_admin_overrides_stored_matrix() {
        // Deliberately all-false matrix; the role must still win.
        let mut perms = PermissionSet::default();
        perms.blogs = ResourcePermissions {
            create: false,
            read: false,
            update: false,
            delete: false,
        };
        let admin = admin_with(Role::SuperAdmin, perms);

        for resource in [Resource::Blogs, Resource::Products, Resource::Careers] {
            for action in [Action::Create, Action::Read, Action::Update, Action::Delete] {
                assert!(admin.allows(resource, action), "{resource}/{action}");
            }
        }
        assert!(admin.allows_analytics());
        assert!(admin.allows_settings());
    }

    #[test]
    fn test_editor_allowed_iff_matrix_true() {
        let mut perms = PermissionSet::default();
        perms.blogs.create = true;
        perms.blogs.update = true;
        let admin = admin_with(Role::Editor, perms);

        assert!(admin.allows(Resource::Blogs, Action::Create));
        assert!(admin.allows(Resource::Blogs, Action::Update));
        assert!(!admin.allows(Resource::Blogs, Action::Delete));
        assert!(!admin.allows(Resource::Products, Action::Create));
        assert!(!admin.allows_analytics());
    }

    #[test]
    fn test_permission_set_json_round_trip() {
        let perms = PermissionSet::all();
        let json = serde_json::to_string(&perms).unwrap();
        assert!(json.contains("\"blogs\""));
        assert!(json.contains("\"settings\":true"));

        let back: PermissionSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, perms);
    }

    #[test]
    fn test_partial_permission_json_fills_defaults() {
        let back: PermissionSet =
            serde_json::from_str(r#"{"blogs":{"create":true},"analytics":true}"#).unwrap();
        assert!(back.blogs.create);
        assert!(back.blogs.read);
        assert!(!back.blogs.delete);
        assert!(back.analytics);
        assert!(!back.settings);
    }

    #[test]
    fn test_role_round_trip() {
        for role in [Role::SuperAdmin, Role::Admin, Role::Editor] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("root"), None);
    }

    #[test]
    fn test_serialized_admin_has_no_counters() {
        let admin = admin_with(Role::Editor, PermissionSet::default());
        let json = serde_json::to_value(&admin).unwrap();
        assert!(json.get("login_attempts").is_none());
        assert!(json.get("lock_until").is_none());
        assert_eq!(json["role"], "editor");
    }
}
