use actix_web::{
    FromRequest, HttpRequest,
    dev::Payload,
    error::{ErrorForbidden, ErrorUnauthorized},
};
use futures::future::{Ready, ready};
use std::str::FromStr;
use strum_macros::EnumString;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Role {
    Employee,
    Supervisor,
    Admin,
}

/// Caller identity, resolved by the gateway in front of this service and
/// forwarded through trusted headers. Every engine call receives one of
/// these explicitly; nothing reads ambient auth state.
pub struct Session {
    pub actor_id: u64,
    pub role: Role,

    /// Present only if this actor is linked to an employee record
    pub employee_id: Option<u64>,
}

fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|h| h.to_str().ok())
}

impl FromRequest for Session {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let actor_id = match header(req, "X-Actor-Id").map(str::parse::<u64>) {
            Some(Ok(id)) => id,
            Some(Err(_)) => return ready(Err(ErrorUnauthorized("Invalid X-Actor-Id"))),
            None => return ready(Err(ErrorUnauthorized("Missing X-Actor-Id"))),
        };

        let role = match header(req, "X-Actor-Role").map(Role::from_str) {
            Some(Ok(role)) => role,
            Some(Err(_)) => return ready(Err(ErrorUnauthorized("Invalid role"))),
            None => return ready(Err(ErrorUnauthorized("Missing X-Actor-Role"))),
        };

        let employee_id = match header(req, "X-Employee-Id").map(str::parse::<u64>) {
            Some(Ok(id)) => Some(id),
            Some(Err(_)) => return ready(Err(ErrorUnauthorized("Invalid X-Employee-Id"))),
            None => None,
        };

        ready(Ok(Session {
            actor_id,
            role,
            employee_id,
        }))
    }
}

impl Session {
    pub fn require_supervisor(&self) -> actix_web::Result<()> {
        if matches!(self.role, Role::Supervisor | Role::Admin) {
            Ok(())
        } else {
            Err(ErrorForbidden("Supervisor/Admin only"))
        }
    }

    /// Returns true if the caller acts as a plain employee
    pub fn is_employee(&self) -> bool {
        self.role == Role::Employee
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_from_header_values() {
        assert_eq!(Role::from_str("supervisor").unwrap(), Role::Supervisor);
        assert_eq!(Role::from_str("Employee").unwrap(), Role::Employee);
        assert!(Role::from_str("intern").is_err());
    }

    #[test]
    fn only_supervisors_pass_the_role_gate() {
        let supervisor = Session {
            actor_id: 1,
            role: Role::Supervisor,
            employee_id: None,
        };
        assert!(supervisor.require_supervisor().is_ok());

        let employee = Session {
            actor_id: 2,
            role: Role::Employee,
            employee_id: Some(2),
        };
        assert!(employee.require_supervisor().is_err());
    }
}
