//! External representation of the request resource.

use crate::models::{AuthCodeRequest, ResourceLinks};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Wire shape of an auth code request, as returned to API callers.
#[derive(Debug, Clone, Serialize)]
pub struct RequestRepresentation {
    pub company_number: String,
    pub company_name: String,
    pub user_id: String,
    pub user_email: String,
    pub officer_id: String,
    pub officer_ura_id: String,
    pub officer_name: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub etag: String,
    pub kind: String,
    pub links: ResourceLinks,
}

impl From<&AuthCodeRequest> for RequestRepresentation {
    fn from(resource: &AuthCodeRequest) -> Self {
        let (officer_id, officer_ura_id, officer_name) = match &resource.officer {
            Some(officer) => (
                officer.id.clone(),
                officer.ura_id.clone(),
                officer.display_name(),
            ),
            None => (String::new(), String::new(), String::new()),
        };

        Self {
            company_number: resource.company_number.clone(),
            company_name: resource.company_name.clone(),
            user_id: resource.created_by.id.clone(),
            user_email: resource.created_by.email.clone(),
            officer_id,
            officer_ura_id,
            officer_name,
            status: resource.status.as_str().to_string(),
            created_at: resource.created_at,
            submitted_at: resource.submitted_at,
            etag: resource.etag.clone(),
            kind: resource.kind.clone(),
            links: resource.links.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewRequest, OfficerDetails, UserDetails};

    #[test]
    fn test_representation_serializes_with_self_link() {
        let input = NewRequest {
            company_number: "87654321".to_string(),
            company_name: "Test Company Ltd".to_string(),
            officer_id: None,
        };
        let user = UserDetails {
            id: "user-1".to_string(),
            email: "someone@example.com".to_string(),
            forename: "Ada".to_string(),
            surname: "Lovelace".to_string(),
        };
        let officer = OfficerDetails {
            id: "off-1".to_string(),
            ura_id: "ura-9".to_string(),
            forename: "Grace".to_string(),
            surname: "Hopper".to_string(),
        };

        let resource = AuthCodeRequest::new(&input, user, Some(officer));
        let representation = RequestRepresentation::from(&resource);
        let json = serde_json::to_value(&representation).unwrap();

        assert_eq!(json["company_number"], "87654321");
        assert_eq!(json["officer_name"], "Grace Hopper");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["submitted_at"], serde_json::Value::Null);
        assert_eq!(
            json["links"]["self"],
            format!("/emergency-auth-code-service/auth-code-requests/{}", resource.id)
        );
    }

    #[test]
    fn test_representation_without_officer_uses_empty_fields() {
        let input = NewRequest {
            company_number: "87654321".to_string(),
            company_name: String::new(),
            officer_id: None,
        };
        let user = UserDetails {
            id: "user-1".to_string(),
            email: "someone@example.com".to_string(),
            forename: String::new(),
            surname: String::new(),
        };

        let resource = AuthCodeRequest::new(&input, user, None);
        let representation = RequestRepresentation::from(&resource);

        assert!(representation.officer_id.is_empty());
        assert!(representation.officer_name.is_empty());
    }
}
