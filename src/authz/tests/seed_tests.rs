//! Seed file loading

use std::io::Write;
use userdir_authz::{AuthzError, InMemoryUserStore, SeedData, StaticRoleDirectory};
use userdir_core::{GroupId, NewUser, RoleCode, RoleDirectory, UserStore};

#[test]
fn test_load_seed_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let json = serde_json::to_string_pretty(&SeedData::builtin()).unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let seed = SeedData::from_path(file.path()).unwrap();
    assert_eq!(seed, SeedData::builtin());
}

#[test]
fn test_seed_file_drives_collaborators() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "roles": [
                {{"name": "Auditor", "code": "AUDITOR", "permissions": ["VIEW", "EXPORT"]}}
            ],
            "groups": ["OPS"],
            "users": [
                {{"id": 40, "name": "Kim", "roles": ["AUDITOR"], "groups": ["OPS"]}}
            ]
        }}"#
    )
    .unwrap();

    let seed = SeedData::from_path(file.path()).unwrap();
    let roles = StaticRoleDirectory::new(seed.roles).unwrap();
    let users = InMemoryUserStore::with_users(seed.users).unwrap();

    assert!(roles.contains(&RoleCode::new("AUDITOR")));
    assert!(!roles.contains(&RoleCode::ADMIN));

    let created = users.create(NewUser::new("Lee", [RoleCode::new("AUDITOR")], [GroupId::new("OPS")]))
        .unwrap();
    assert_eq!(created.id, 41);
}

#[test]
fn test_invalid_seed_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(br#"{"roles": [{"name": " ", "code": "X"}]}"#).unwrap();

    let result = SeedData::from_path(file.path());
    assert!(matches!(result, Err(AuthzError::Core(_))));
}
