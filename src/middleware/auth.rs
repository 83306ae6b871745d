// src/middleware/auth.rs

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

// Cabeçalho com o papel do usuário logado (vem do login no painel)
pub const ROLE_HEADER: &str = "x-user-role";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    SuperAdmin,
    #[default]
    Admin,
}

impl Role {
    pub fn from_header(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("superadmin") {
            Role::SuperAdmin
        } else {
            Role::Admin
        }
    }
}

/// Credencial e papel de quem chamou. Não é uma barreira de segurança:
/// apenas repassamos o `Authorization` para a API oficial, que decide.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    authorization: Option<String>,
    pub role: Role,
}

impl AuthContext {
    pub fn new(authorization: Option<String>, role: Role) -> Self {
        Self { authorization, role }
    }

    pub fn bearer(token: &str, role: Role) -> Self {
        Self::new(Some(format!("Bearer {token}")), role)
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Valor cru do cabeçalho `Authorization`, se houver.
    pub fn authorization(&self) -> Option<&str> {
        self.authorization.as_deref()
    }

    /// Chave da "sessão" do painel: uma por credencial.
    pub fn session_key(&self) -> String {
        self.authorization
            .clone()
            .unwrap_or_else(|| "anonimo".to_string())
    }
}

// Ausência de credencial não é rejeitada aqui; a API oficial responde 401.
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let authorization = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.trim().is_empty())
            .map(str::to_string);

        let role = parts
            .headers
            .get(ROLE_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(Role::from_header)
            .unwrap_or_default();

        Ok(AuthContext { authorization, role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(req: Request<()>) -> AuthContext {
        let (mut parts, _) = req.into_parts();
        AuthContext::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn reads_authorization_and_role() {
        let req = Request::builder()
            .header("Authorization", "Bearer abc")
            .header(ROLE_HEADER, "SuperAdmin")
            .body(())
            .unwrap();
        let ctx = extract(req).await;
        assert_eq!(ctx.authorization(), Some("Bearer abc"));
        assert_eq!(ctx.role, Role::SuperAdmin);
        assert_eq!(ctx.session_key(), "Bearer abc");
    }

    #[tokio::test]
    async fn missing_headers_default_to_anonymous_admin() {
        let ctx = extract(Request::builder().body(()).unwrap()).await;
        assert_eq!(ctx.authorization(), None);
        assert_eq!(ctx.role, Role::Admin);
        assert_eq!(ctx.session_key(), "anonimo");
    }

    #[test]
    fn unknown_roles_are_not_privileged() {
        assert_eq!(Role::from_header("admin"), Role::Admin);
        assert_eq!(Role::from_header("cliente"), Role::Admin);
        assert_eq!(Role::from_header(" superadmin "), Role::SuperAdmin);
    }
}
