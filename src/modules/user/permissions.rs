use super::repository::Role;

/// Which roles each role is allowed to hand out. Consulted before every
/// role mutation, independent of the CRUD layer.
pub fn assignable_roles(role: &Role) -> &'static [Role] {
    match role {
        Role::Admin => &[Role::Admin, Role::Company, Role::Branch, Role::User],
        Role::Company => &[Role::Branch, Role::User],
        Role::Branch => &[Role::User],
        Role::User => &[],
    }
}

pub fn can_assign(current: &Role, new_role: &Role) -> bool {
    assignable_roles(current).contains(new_role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_assigns_any_role() {
        for role in [Role::Admin, Role::Company, Role::Branch, Role::User] {
            assert!(can_assign(&Role::Admin, &role));
        }
    }

    #[test]
    fn company_assigns_branch_but_not_admin() {
        assert!(can_assign(&Role::Company, &Role::Branch));
        assert!(can_assign(&Role::Company, &Role::User));
        assert!(!can_assign(&Role::Company, &Role::Admin));
        assert!(!can_assign(&Role::Company, &Role::Company));
    }

    #[test]
    fn branch_assigns_only_plain_users() {
        assert!(can_assign(&Role::Branch, &Role::User));
        assert!(!can_assign(&Role::Branch, &Role::Branch));
        assert!(!can_assign(&Role::Branch, &Role::Admin));
    }

    #[test]
    fn plain_user_assigns_nothing() {
        for role in [Role::Admin, Role::Company, Role::Branch, Role::User] {
            assert!(!can_assign(&Role::User, &role));
        }
    }
}
