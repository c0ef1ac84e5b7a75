/// Caller identity passed to every worker operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub tenant: String,
    pub user: String,
    pub auth_token: Option<String>,
}

impl RequestContext {
    pub fn new(tenant: &str, user: &str) -> Self {
        Self {
            tenant: tenant.to_string(),
            user: user.to_string(),
            auth_token: None,
        }
    }

    pub fn with_auth_token(mut self, token: &str) -> Self {
        self.auth_token = Some(token.to_string());
        self
    }
}
