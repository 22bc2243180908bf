use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use utoipa::ToSchema;
use userdir_core::{GroupId, NewUser, RoleCode, User, UserId, UserPatch};
use validator::Validate;

/// User creation request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    /// Display name
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    /// Role codes; each must name a defined role
    #[validate(length(min = 1))]
    #[schema(value_type = Vec<String>, example = json!(["VIEWER"]))]
    pub roles: Vec<RoleCode>,

    /// Group ids; each must be a configured group
    #[validate(length(min = 1))]
    #[schema(value_type = Vec<String>, example = json!(["GROUP_1"]))]
    pub groups: Vec<GroupId>,
}

impl From<CreateUserRequest> for NewUser {
    fn from(req: CreateUserRequest) -> Self {
        NewUser::new(req.name, req.roles, req.groups)
    }
}

/// Partial user update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(length(min = 1))]
    #[schema(value_type = Option<Vec<String>>)]
    pub roles: Option<Vec<RoleCode>>,

    #[validate(length(min = 1))]
    #[schema(value_type = Option<Vec<String>>)]
    pub groups: Option<Vec<GroupId>>,
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(req: UpdateUserRequest) -> Self {
        UserPatch {
            name: req.name,
            roles: req.roles.map(|roles| roles.into_iter().collect()),
            groups: req.groups.map(|groups| groups.into_iter().collect()),
        }
    }
}

/// User record as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: UserId,

    pub name: String,

    #[schema(value_type = Vec<String>)]
    pub roles: BTreeSet<RoleCode>,

    #[schema(value_type = Vec<String>)]
    pub groups: BTreeSet<GroupId>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            roles: user.roles,
            groups: user.groups,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Error body shared by every failure response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub status: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_validation() {
        let req: CreateUserRequest = serde_json::from_str(
            r#"{"name": "Ann", "roles": ["VIEWER"], "groups": ["GROUP_1"]}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());

        let empty_name = CreateUserRequest {
            name: String::new(),
            ..req.clone()
        };
        assert!(empty_name.validate().is_err());

        let long_name = CreateUserRequest {
            name: "x".repeat(101),
            ..req.clone()
        };
        assert!(long_name.validate().is_err());

        let no_roles = CreateUserRequest {
            roles: vec![],
            ..req
        };
        assert!(no_roles.validate().is_err());
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result = serde_json::from_str::<CreateUserRequest>(
            r#"{"name": "Ann", "roles": ["VIEWER"], "groups": ["GROUP_1"], "id": 3}"#,
        );
        assert!(result.is_err());

        let result = serde_json::from_str::<UpdateUserRequest>(r#"{"id": 3}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_update_request_to_patch() {
        let req: UpdateUserRequest =
            serde_json::from_str(r#"{"roles": ["ADMIN", "ADMIN", "PERSONAL"]}"#).unwrap();
        assert!(req.validate().is_ok());

        let patch = UserPatch::from(req);
        assert_eq!(patch.name, None);
        assert_eq!(
            patch.roles,
            Some(BTreeSet::from([RoleCode::ADMIN, RoleCode::PERSONAL]))
        );
        assert_eq!(patch.groups, None);
    }

    #[test]
    fn test_update_request_rejects_empty_lists() {
        let req = UpdateUserRequest {
            groups: Some(vec![]),
            ..Default::default()
        };
        assert!(req.validate().is_err());
        assert!(UpdateUserRequest::default().validate().is_ok());
    }
}
