//! Who may see what. Every page and list consults [`can_view`] and
//! [`visible_members`] instead of comparing role names itself.
use log::trace;
use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    Member,
    Treasurer,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Resource {
    Dashboard,
    Transactions,
    Loans,
    Contributions,
    Expenses,
    Settings,
    Members,
    Disbursements,
}

impl Resource {
    pub const ALL: [Resource; 8] = [
        Resource::Dashboard,
        Resource::Transactions,
        Resource::Loans,
        Resource::Contributions,
        Resource::Expenses,
        Resource::Settings,
        Resource::Members,
        Resource::Disbursements,
    ];
}

pub fn can_view(role: Role, resource: Resource) -> bool {
    let allowed = match resource {
        Resource::Members | Resource::Disbursements => {
            matches!(role, Role::Admin | Role::Treasurer)
        }
        _ => true,
    };
    trace!("{} may view {:?}: {}", role, resource, allowed);
    allowed
}

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub banking_group: Option<String>,
}

impl User {
    pub fn new(id: &str, name: &str, email: &str, role: Role, banking_group: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role,
            banking_group: Some(banking_group.to_string()),
        }
    }
}

/// Members `viewer` is allowed to list: admins see every group, treasurers
/// only their own, plain members nobody.
pub fn visible_members<'a>(viewer: &User, members: &'a [User]) -> Vec<&'a User> {
    if !can_view(viewer.role, Resource::Members) {
        return Vec::new();
    }
    match viewer.role {
        Role::Admin => members.iter().collect(),
        _ => members
            .iter()
            .filter(|member| {
                viewer.banking_group.is_some() && member.banking_group == viewer.banking_group
            })
            .collect(),
    }
}

/// The signed-in user of the sample data set.
pub fn current_user() -> User {
    User::new(
        "u1",
        "Eddy Cusuma",
        "eddy@pesachama.com",
        Role::Treasurer,
        "Chama Alpha",
    )
}

pub fn sample_members() -> Vec<User> {
    vec![
        current_user(),
        User::new("u2", "Jane Doe", "jane@pesachama.com", Role::Member, "Chama Alpha"),
        User::new("u3", "Mike Ross", "mike@pesachama.com", Role::Member, "Chama Alpha"),
        User::new("u4", "Harvey Specter", "harvey@pesachama.com", Role::Admin, "Chama Beta"),
        User::new("u5", "Rachel Zane", "rachel@pesachama.com", Role::Member, "Chama Beta"),
        User::new("u6", "Louis Litt", "louis@pesachama.com", Role::Member, "Chama Alpha"),
    ]
}
