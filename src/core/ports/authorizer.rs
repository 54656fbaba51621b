use crate::core::models::membership::Role;
use crate::error::Error;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    CreatePost,
    ModeratePosts,
    EditOrganization,
    ManagePhotos,
    ManageMembers,
    ManageAdmins,
    DeleteOrganization,
}

impl Permission {
    pub const ALL: [Permission; 7] = [
        Permission::CreatePost,
        Permission::ModeratePosts,
        Permission::EditOrganization,
        Permission::ManagePhotos,
        Permission::ManageMembers,
        Permission::ManageAdmins,
        Permission::DeleteOrganization,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::CreatePost => "create_post",
            Permission::ModeratePosts => "moderate_posts",
            Permission::EditOrganization => "edit_organization",
            Permission::ManagePhotos => "manage_photos",
            Permission::ManageMembers => "manage_members",
            Permission::ManageAdmins => "manage_admins",
            Permission::DeleteOrganization => "delete_organization",
        }
    }
}

/// Answers whether a membership role grants a permission. Omega admins and
/// non-members are handled by the caller.
pub trait Authorizer {
    fn allows(&self, role: Role, permission: Permission) -> Result<bool, Error>;
}
