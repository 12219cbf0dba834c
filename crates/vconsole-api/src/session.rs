// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use vconsole_app::Role;

pub(crate) const TOKEN_COOKIE: &str = "Authorization";
pub(crate) const ROLE_COOKIE: &str = "Role";

/// Credentials the backend expects as cookies on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub role: Option<Role>,
}

impl Session {
    pub fn new(token: &str, role: Option<Role>) -> Result<Self> {
        let token = token.trim();
        if token.is_empty() {
            bail!("session token must not be empty -- set [session] token or VCONSOLE_TOKEN");
        }
        if token
            .chars()
            .any(|c| c.is_whitespace() || c == ';' || c == ',')
        {
            bail!("session token contains characters not allowed in a cookie");
        }
        Ok(Self {
            token: token.to_owned(),
            role,
        })
    }

    pub(crate) fn cookies(&self) -> Vec<String> {
        let mut cookies = vec![format!("{TOKEN_COOKIE}={}", self.token)];
        if let Some(role) = self.role {
            cookies.push(format!("{ROLE_COOKIE}={}", role.code()));
        }
        cookies
    }

    /// Reads a session back out of a `Cookie` header value.
    pub fn from_cookie_header(header: &str) -> Option<Self> {
        let mut token = None;
        let mut role = None;
        for pair in header.split(';') {
            let Some((name, value)) = pair.trim().split_once('=') else {
                continue;
            };
            match name {
                TOKEN_COOKIE if !value.is_empty() => token = Some(value.to_owned()),
                ROLE_COOKIE => {
                    role = value.parse::<i64>().ok().and_then(Role::from_code);
                }
                _ => {}
            }
        }
        token.map(|token| Self { token, role })
    }
}

#[cfg(test)]
mod tests {
    use super::Session;
    use vconsole_app::Role;

    #[test]
    fn rejects_blank_and_unsafe_tokens() {
        assert!(Session::new("  ", None).is_err());
        assert!(Session::new("a;b", None).is_err());
        assert!(Session::new("a b", None).is_err());
        assert!(Session::new(" abc ", None).is_ok());
    }

    #[test]
    fn cookies_carry_token_and_role_code() -> anyhow::Result<()> {
        let session = Session::new("abc", Some(Role::SuperAdmin))?;
        assert_eq!(session.cookies(), vec!["Authorization=abc", "Role=3"]);
        Ok(())
    }

    #[test]
    fn parses_cookie_header() {
        let session = Session::from_cookie_header("Role=2; Authorization=xyz; theme=dark");
        assert_eq!(
            session,
            Some(Session {
                token: "xyz".to_owned(),
                role: Some(Role::Admin),
            })
        );
        assert_eq!(Session::from_cookie_header("Role=2"), None);
    }
}
