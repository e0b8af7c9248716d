use axum::http::Method;

use super::{AuthError, Credential, Role};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `{name}`: exactly one non-empty segment
    Wildcard,
}

/// Path template such as `/api/employees/{id}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn new(raw: &str) -> Self {
        let segments = raw
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                if s.starts_with('{') && s.ends_with('}') {
                    Segment::Wildcard
                } else {
                    Segment::Literal(s.to_string())
                }
            })
            .collect();
        Self {
            raw: raw.to_string(),
            segments,
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        let Some(rest) = path.strip_prefix('/') else {
            return false;
        };
        let parts: Vec<&str> = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split('/').collect()
        };
        parts.len() == self.segments.len()
            && self
                .segments
                .iter()
                .zip(&parts)
                .all(|(segment, part)| match segment {
                    Segment::Literal(lit) => lit == part,
                    Segment::Wildcard => !part.is_empty(),
                })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

#[derive(Debug, Clone)]
pub struct AccessRule {
    pub method: Method,
    pub pattern: PathPattern,
    pub role: Role,
}

impl AccessRule {
    pub fn new(method: Method, pattern: &str, role: Role) -> Self {
        Self {
            method,
            pattern: PathPattern::new(pattern),
            role,
        }
    }

    /// `HEAD` is served by the `GET` handlers, so it falls under `GET` rules
    fn matches(&self, method: &Method, path: &str) -> bool {
        let method = if method == Method::HEAD { &Method::GET } else { method };
        self.method == *method && self.pattern.matches(path)
    }
}

/// Ordered rule table; the first rule matching (method, path) decides
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    rules: Vec<AccessRule>,
}

impl AccessPolicy {
    pub fn new(rules: Vec<AccessRule>) -> Self {
        Self { rules }
    }

    pub fn employee_directory() -> Self {
        Self::new(vec![
            AccessRule::new(Method::GET, "/api/employees", Role::Employee),
            AccessRule::new(Method::GET, "/api/employees/{id}", Role::Employee),
            AccessRule::new(Method::POST, "/api/employees", Role::Manager),
            AccessRule::new(Method::PUT, "/api/employees", Role::Manager),
            AccessRule::new(Method::PATCH, "/api/employees/{id}", Role::Manager),
            AccessRule::new(Method::DELETE, "/api/employees/{id}", Role::Admin),
        ])
    }

    pub fn rules(&self) -> &[AccessRule] {
        &self.rules
    }

    /// Role demanded by the first matching rule, `None` when no rule matches
    pub fn required_role(&self, method: &Method, path: &str) -> Option<Role> {
        self.rules
            .iter()
            .find(|rule| rule.matches(method, path))
            .map(|rule| rule.role)
    }

    /// Requests no rule covers are denied outright
    pub fn authorize(
        &self,
        credential: &Credential,
        method: &Method,
        path: &str,
    ) -> Result<(), AuthError> {
        match self.required_role(method, path) {
            Some(role) if credential.has_role(role) => Ok(()),
            Some(role) => Err(AuthError::Forbidden(role)),
            None => Err(AuthError::Unmapped {
                method: method.to_string(),
                path: path.to_string(),
            }),
        }
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::employee_directory()
    }
}
