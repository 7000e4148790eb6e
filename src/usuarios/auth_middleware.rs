// src/usuarios/auth_middleware.rs

use actix_web::{dev::Payload, error::ErrorUnauthorized, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};

use super::usuario_structs::validar_token;
use crate::AppState;

/// Usuário autenticado extraído do token JWT da requisição.
/// Rotas protegidas recebem esta struct como parâmetro; o id aqui
/// é a única fonte do `usuario_id` usado nas queries.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub user_name: String,
    pub user_email: String,
}

/// Extrai o token do cabeçalho "Authorization: Bearer <token>".
fn extrair_token(req: &HttpRequest) -> Result<String, &'static str> {
    let header = req
        .headers()
        .get("Authorization")
        .ok_or("Token de autenticação ausente.")?;

    let header_str = header
        .to_str()
        .map_err(|_| "Token de autenticação inválido.")?;

    match header_str.strip_prefix("Bearer ") {
        Some(token) if !token.is_empty() => Ok(token.to_string()),
        _ => Err("Formato de token inválido. Esperado 'Bearer <token>'."),
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // Acessa o AppState para obter a chave secreta JWT
        let jwt_secret = match req.app_data::<web::Data<AppState>>() {
            Some(state) => state.jwt_secret.clone(),
            None => {
                log::error!("AppState indisponível no extrator de autenticação");
                return ready(Err(ErrorUnauthorized("Erro de configuração do servidor.")));
            }
        };

        let token = match extrair_token(req) {
            Ok(t) => t,
            Err(mensagem) => return ready(Err(ErrorUnauthorized(mensagem))),
        };

        match validar_token(&token, &jwt_secret) {
            Ok(claims) => ready(Ok(AuthenticatedUser {
                user_id: claims.sub,
                user_name: claims.name,
                user_email: claims.email,
            })),
            Err(e) => {
                log::warn!("Token recusado: {:?}", e);
                let mensagem = match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => "Token expirado.",
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        "Assinatura do token inválida."
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => "Token malformado.",
                    _ => "Token de autenticação inválido.",
                };
                ready(Err(ErrorUnauthorized(mensagem)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn extrai_token_do_cabecalho_bearer() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(extrair_token(&req).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn recusa_cabecalho_ausente_ou_malformado() {
        let sem_header = TestRequest::default().to_http_request();
        assert!(extrair_token(&sem_header).is_err());

        let sem_bearer = TestRequest::default()
            .insert_header(("Authorization", "abc.def.ghi"))
            .to_http_request();
        assert!(extrair_token(&sem_bearer).is_err());

        let bearer_vazio = TestRequest::default()
            .insert_header(("Authorization", "Bearer "))
            .to_http_request();
        assert!(extrair_token(&bearer_vazio).is_err());
    }
}
