use casbin::{CoreApi, DefaultModel, Enforcer, MemoryAdapter, MgmtApi};

use crate::core::models::membership::Role;
use crate::core::ports::authorizer::{Authorizer, Permission};
use crate::error::Error;

const MODEL: &str = "
[request_definition]
r = sub, act

[policy_definition]
p = sub, act

[policy_effect]
e = some(where (p.eft == allow))

[matchers]
m = r.sub == p.sub && r.act == p.act
";

const POLICY: &[(Role, &[Permission])] = &[
    (Role::Member, &[Permission::CreatePost]),
    (
        Role::Admin,
        &[
            Permission::CreatePost,
            Permission::ModeratePosts,
            Permission::EditOrganization,
            Permission::ManagePhotos,
            Permission::ManageMembers,
        ],
    ),
    (
        Role::SuperAdmin,
        &[
            Permission::CreatePost,
            Permission::ModeratePosts,
            Permission::EditOrganization,
            Permission::ManagePhotos,
            Permission::ManageMembers,
            Permission::ManageAdmins,
            Permission::DeleteOrganization,
        ],
    ),
];

/// Role to permission table evaluated by a casbin enforcer held in memory.
pub struct CasbinAuthorizer {
    enforcer: Enforcer,
}

impl CasbinAuthorizer {
    pub async fn new() -> Result<Self, Error> {
        let model = DefaultModel::from_str(MODEL).await?;
        let mut enforcer = Enforcer::new(model, MemoryAdapter::default()).await?;
        let rules: Vec<Vec<String>> = POLICY
            .iter()
            .flat_map(|(role, permissions)| permissions.iter().map(move |p| vec![role.as_str().to_owned(), p.as_str().to_owned()]))
            .collect();
        enforcer.add_policies(rules).await?;
        log::debug!("casbin policy loaded with {} rules", enforcer.get_policy().len());
        Ok(Self { enforcer })
    }
}

impl Authorizer for CasbinAuthorizer {
    fn allows(&self, role: Role, permission: Permission) -> Result<bool, Error> {
        let allowed = self.enforcer.enforce((role.as_str(), permission.as_str()))?;
        Ok(allowed)
    }
}
