//! Choice parsing for the login flow.
//!
//! Both prompts accept a 1-based list number or a literal value.

use agentdesk_domain::{Client, UserSummary};

/// Pick a client by list number or (case-insensitive) code.
pub fn resolve_client<'a>(input: &str, clients: &'a [Client]) -> Option<&'a Client> {
    let input = input.trim();
    if let Ok(n) = input.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| clients.get(i));
    }
    clients
        .iter()
        .find(|c| c.code.eq_ignore_ascii_case(input))
}

/// Pick an existing user by list number, or take the input as a new username.
pub fn resolve_username(input: &str, users: &[UserSummary]) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(n) = input.parse::<usize>()
        && let Some(user) = n.checked_sub(1).and_then(|i| users.get(i))
    {
        return Some(user.username.clone());
    }
    Some(input.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clients() -> Vec<Client> {
        vec![
            Client {
                id: 1,
                code: "ACME".to_string(),
                name: "Acme".to_string(),
                status: "Activo".to_string(),
            },
            Client {
                id: 2,
                code: "GLOBEX".to_string(),
                name: "Globex".to_string(),
                status: "Activo".to_string(),
            },
        ]
    }

    #[test]
    fn test_resolve_client_by_number_and_code() {
        let clients = clients();
        assert_eq!(resolve_client("2", &clients).unwrap().code, "GLOBEX");
        assert_eq!(resolve_client(" acme ", &clients).unwrap().code, "ACME");
        assert!(resolve_client("0", &clients).is_none());
        assert!(resolve_client("3", &clients).is_none());
        assert!(resolve_client("INITECH", &clients).is_none());
    }

    #[test]
    fn test_resolve_username() {
        let users = vec![UserSummary {
            id: 4,
            username: "ana".to_string(),
        }];
        assert_eq!(resolve_username("1", &users).as_deref(), Some("ana"));
        assert_eq!(resolve_username(" luis ", &users).as_deref(), Some("luis"));
        // Out-of-range numbers are taken literally
        assert_eq!(resolve_username("7", &users).as_deref(), Some("7"));
        assert_eq!(resolve_username("  ", &users), None);
    }
}
