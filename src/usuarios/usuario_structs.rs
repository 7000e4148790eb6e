// src/usuarios/usuario_structs.rs

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Validade do token de login em horas.
pub const VALIDADE_TOKEN_HORAS: i64 = 24;

/// Validade do token de redefinição de senha em horas.
pub const VALIDADE_RESET_HORAS: i64 = 1;

/// Tamanho mínimo aceito para senhas.
pub const TAMANHO_MINIMO_SENHA: usize = 6;

/// Estrutura que representa um usuário no banco de dados.
/// A senha é armazenada apenas como hash; os campos de reset ficam
/// preenchidos somente entre o pedido e a conclusão da redefinição.
#[derive(Serialize, FromRow)]
pub struct Usuario {
    pub id: i32,
    pub nome: String,
    pub email: String,
    pub senha_hash: String,
    pub reset_token: Option<String>,
    pub reset_token_expira: Option<DateTime<Utc>>,
}

/// Estrutura para receber dados de um novo usuário na requisição de cadastro.
#[derive(Deserialize)]
pub struct NovoUsuario {
    pub nome: String,
    pub email: String,
    pub senha: String, // Senha em texto claro (será hashed antes de salvar)
}

/// Estrutura para receber dados de login do usuário.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub senha: String,
}

/// Estrutura para atualizar os dados do próprio perfil.
#[derive(Deserialize)]
pub struct AtualizarPerfil {
    pub nome: String,
    pub email: String,
}

/// Estrutura para pedir a redefinição de senha.
#[derive(Deserialize)]
pub struct EsqueciSenhaRequest {
    pub email: String,
}

/// Estrutura para concluir a redefinição de senha.
#[derive(Deserialize)]
pub struct RedefinirSenhaRequest {
    pub token: String,
    pub nova_senha: String,
}

/// Estrutura para o payload do JWT (Claims).
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,     // Subject (ID do usuário)
    pub name: String, // Nome do usuário
    pub email: String,
    pub exp: i64, // Expiration Time (timestamp Unix)
}

/// Estrutura para a resposta de sucesso do login.
#[derive(Serialize)]
pub struct AuthResponse {
    pub status: String,
    pub message: String,
    pub user_id: i32,
    pub user_name: String,
    pub user_email: String,
    pub token: String,
}

/// Estrutura para a resposta do perfil (nunca expõe o hash da senha).
#[derive(Serialize)]
pub struct PerfilResponse {
    pub id: i32,
    pub nome: String,
    pub email: String,
}

impl NovoUsuario {
    /// Valida os campos do cadastro. Retorna a mensagem do primeiro problema encontrado.
    pub fn validar(&self) -> Result<(), String> {
        if self.nome.trim().is_empty() {
            return Err("O nome é obrigatório.".to_string());
        }
        validar_email(&self.email)?;
        validar_senha(&self.senha)
    }
}

impl AtualizarPerfil {
    pub fn validar(&self) -> Result<(), String> {
        if self.nome.trim().is_empty() {
            return Err("O nome é obrigatório.".to_string());
        }
        validar_email(&self.email)
    }
}

/// Validação simples de e-mail: precisa ter algo antes e depois do '@'.
pub fn validar_email(email: &str) -> Result<(), String> {
    let email = email.trim();
    match email.split_once('@') {
        Some((antes, depois)) if !antes.is_empty() && depois.contains('.') => Ok(()),
        _ => Err("E-mail inválido.".to_string()),
    }
}

pub fn validar_senha(senha: &str) -> Result<(), String> {
    if senha.len() < TAMANHO_MINIMO_SENHA {
        return Err(format!(
            "A senha deve ter pelo menos {} caracteres.",
            TAMANHO_MINIMO_SENHA
        ));
    }
    Ok(())
}

/// Gera um token JWT (HS256) para o usuário autenticado.
pub fn gerar_token(usuario: &Usuario, jwt_secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let expiracao = Utc::now() + Duration::hours(VALIDADE_TOKEN_HORAS);
    let claims = Claims {
        sub: usuario.id,
        name: usuario.nome.clone(),
        email: usuario.email.clone(),
        exp: expiracao.timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_ref()),
    )
}

/// Decodifica e valida um token JWT, devolvendo as claims quando válido.
pub fn validar_token(token: &str, jwt_secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let validation = Validation::new(Algorithm::HS256);
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_ref()),
        &validation,
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usuario_teste() -> Usuario {
        Usuario {
            id: 7,
            nome: "Maria".to_string(),
            email: "maria@exemplo.com".to_string(),
            senha_hash: "$2b$12$hash".to_string(),
            reset_token: None,
            reset_token_expira: None,
        }
    }

    #[test]
    fn token_gerado_e_validado_com_mesmo_segredo() {
        let usuario = usuario_teste();
        let token = gerar_token(&usuario, "segredo_de_teste").unwrap();
        let claims = validar_token(&token, "segredo_de_teste").unwrap();

        assert_eq!(claims.sub, 7);
        assert_eq!(claims.name, "Maria");
        assert_eq!(claims.email, "maria@exemplo.com");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn token_rejeitado_com_segredo_errado() {
        let usuario = usuario_teste();
        let token = gerar_token(&usuario, "segredo_de_teste").unwrap();
        assert!(validar_token(&token, "outro_segredo").is_err());
    }

    #[test]
    fn token_expirado_e_rejeitado() {
        // Codifica claims com expiração bem no passado (além do leeway padrão de 60s)
        let claims = Claims {
            sub: 1,
            name: "Teste".to_string(),
            email: "teste@exemplo.com".to_string(),
            exp: (Utc::now() - Duration::hours(2)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("segredo".as_ref()),
        )
        .unwrap();

        let erro = validar_token(&token, "segredo").unwrap_err();
        assert!(matches!(
            erro.kind(),
            jsonwebtoken::errors::ErrorKind::ExpiredSignature
        ));
    }

    #[test]
    fn validacao_de_email() {
        assert!(validar_email("ana@exemplo.com").is_ok());
        assert!(validar_email("").is_err());
        assert!(validar_email("sem-arroba").is_err());
        assert!(validar_email("@exemplo.com").is_err());
        assert!(validar_email("ana@semponto").is_err());
    }

    #[test]
    fn validacao_de_cadastro() {
        let valido = NovoUsuario {
            nome: "Ana".to_string(),
            email: "ana@exemplo.com".to_string(),
            senha: "123456".to_string(),
        };
        assert!(valido.validar().is_ok());

        let sem_nome = NovoUsuario {
            nome: "  ".to_string(),
            email: "ana@exemplo.com".to_string(),
            senha: "123456".to_string(),
        };
        assert!(sem_nome.validar().is_err());

        let senha_curta = NovoUsuario {
            nome: "Ana".to_string(),
            email: "ana@exemplo.com".to_string(),
            senha: "12345".to_string(),
        };
        assert!(senha_curta.validar().is_err());
    }
}
