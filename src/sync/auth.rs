use uuid::Uuid;

/// Opaque bearer token issued by the identity provider.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Who is playing, and whether they may sync.
#[derive(Debug, Clone, Default)]
pub struct AuthSession {
    user_id: Option<Uuid>,
    username: Option<String>,
    credential: Option<Credential>,
}

impl AuthSession {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(user_id: Uuid, username: &str, credential: Credential) -> Self {
        Self {
            user_id: Some(user_id),
            username: Some(username.to_string()),
            credential: Some(credential),
        }
    }

    pub fn sign_out(&mut self) {
        self.credential = None;
        self.username = None;
        self.user_id = None;
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.user_id
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.credential.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_debug_hides_token() {
        let credential = Credential::new("secret-token");
        assert_eq!(credential.token(), "secret-token");
        assert!(!format!("{:?}", credential).contains("secret"));
    }

    #[test]
    fn test_sign_out_drops_credential() {
        let mut auth = AuthSession::signed_in(Uuid::new_v4(), "ada", Credential::new("t"));
        assert!(auth.is_signed_in());
        auth.sign_out();
        assert!(!auth.is_signed_in());
        assert_eq!(auth.user_id(), None);
        assert!(!AuthSession::anonymous().is_signed_in());
    }
}
