// src/usuarios/usuario_router.rs

use actix_web::{get, post, put, web, HttpResponse};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use sqlx::{query, query_as, Row};
use uuid::Uuid;

use super::auth_middleware::AuthenticatedUser;
use super::usuario_structs::{
    gerar_token, validar_senha, AtualizarPerfil, AuthResponse, EsqueciSenhaRequest, LoginRequest,
    NovoUsuario, PerfilResponse, RedefinirSenhaRequest, Usuario, VALIDADE_RESET_HORAS,
};
use crate::shared::shared_structs::GenericResponse;
use crate::AppState;

const COLUNAS_USUARIO: &str = "id, nome, email, senha_hash, reset_token, reset_token_expira";

/// Busca um usuário pelo e-mail.
async fn buscar_por_email(
    pool: &sqlx::Pool<sqlx::Postgres>,
    email: &str,
) -> Result<Option<Usuario>, sqlx::Error> {
    query_as::<_, Usuario>(&format!(
        "SELECT {} FROM usuarios WHERE email = $1",
        COLUNAS_USUARIO
    ))
    .bind(email)
    .fetch_optional(pool)
    .await
}

/// Rota para cadastrar um novo usuário.
#[post("/usuarios/cadastro")]
pub async fn cadastrar_usuario(
    data: web::Data<AppState>,
    novo_usuario: web::Json<NovoUsuario>,
) -> HttpResponse {
    // 1. Valida os campos recebidos
    if let Err(mensagem) = novo_usuario.validar() {
        return HttpResponse::BadRequest().json(GenericResponse::erro(mensagem));
    }

    // 2. Verifica se o e-mail já está em uso
    match buscar_por_email(&data.db_pool, &novo_usuario.email).await {
        Ok(Some(_)) => {
            return HttpResponse::Conflict().json(GenericResponse::erro("E-mail já cadastrado."));
        }
        Err(e) => {
            log::error!("Erro ao verificar e-mail existente: {:?}", e);
            return HttpResponse::InternalServerError()
                .json(GenericResponse::erro("Erro interno ao verificar e-mail."));
        }
        _ => {} // E-mail não encontrado, pode prosseguir
    }

    // 3. Hash da senha
    let senha_hash = match hash(&novo_usuario.senha, DEFAULT_COST) {
        Ok(h) => h,
        Err(e) => {
            log::error!("Erro ao fazer hash da senha: {:?}", e);
            return HttpResponse::InternalServerError()
                .json(GenericResponse::erro("Erro interno ao processar senha."));
        }
    };

    // 4. Insere o novo usuário no banco de dados
    let result = query("INSERT INTO usuarios (nome, email, senha_hash) VALUES ($1, $2, $3) RETURNING id")
        .bind(novo_usuario.nome.trim())
        .bind(novo_usuario.email.trim())
        .bind(&senha_hash)
        .fetch_one(&data.db_pool)
        .await;

    match result {
        Ok(row) => match row.try_get::<i32, &str>("id") {
            Ok(id) => HttpResponse::Created().json(GenericResponse::sucesso(
                format!("Usuário cadastrado com sucesso! ID: {}", id),
                serde_json::json!({ "id": id }),
            )),
            Err(e) => {
                log::error!("Erro ao obter id do novo usuário: {:?}", e);
                HttpResponse::InternalServerError().json(GenericResponse::erro(
                    "Erro ao processar resposta do cadastro do usuário.",
                ))
            }
        },
        Err(e) => {
            // A verificação acima não é atômica: o UNIQUE do banco cobre a corrida
            if e.to_string().contains("duplicate key") {
                return HttpResponse::Conflict().json(GenericResponse::erro("E-mail já cadastrado."));
            }
            log::error!("Erro ao inserir usuário: {:?}", e);
            HttpResponse::InternalServerError().json(GenericResponse::erro("Erro ao inserir usuário."))
        }
    }
}

/// Rota para login de usuário. Em caso de sucesso devolve um JWT assinado.
#[post("/usuarios/login")]
pub async fn login_usuario(
    data: web::Data<AppState>,
    login_request: web::Json<LoginRequest>,
) -> HttpResponse {
    // 1. Busca o usuário pelo e-mail
    let usuario = match buscar_por_email(&data.db_pool, &login_request.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            return HttpResponse::Unauthorized().json(GenericResponse::erro("Credenciais inválidas."));
        }
        Err(e) => {
            log::error!("Erro ao buscar usuário para login: {:?}", e);
            return HttpResponse::InternalServerError()
                .json(GenericResponse::erro("Erro interno ao processar login."));
        }
    };

    // 2. Verifica a senha
    match verify(&login_request.senha, &usuario.senha_hash) {
        Ok(true) => {}
        Ok(false) => {
            return HttpResponse::Unauthorized().json(GenericResponse::erro("Credenciais inválidas."));
        }
        Err(e) => {
            log::error!("Erro ao verificar senha: {:?}", e);
            return HttpResponse::InternalServerError()
                .json(GenericResponse::erro("Erro interno ao verificar senha."));
        }
    }

    // 3. Gera o token JWT assinado com a chave da aplicação
    let token = match gerar_token(&usuario, &data.jwt_secret) {
        Ok(t) => t,
        Err(e) => {
            log::error!("Erro ao gerar token JWT: {:?}", e);
            return HttpResponse::InternalServerError()
                .json(GenericResponse::erro("Erro interno ao gerar token."));
        }
    };

    HttpResponse::Ok().json(AuthResponse {
        status: "success".to_string(),
        message: "Login bem-sucedido!".to_string(),
        user_id: usuario.id,
        user_name: usuario.nome,
        user_email: usuario.email,
        token,
    })
}

/// Rota para consultar o próprio perfil (requer token).
/// Busca os dados no banco em vez de confiar apenas nas claims do token.
#[get("/usuarios/perfil")]
pub async fn buscar_perfil(data: web::Data<AppState>, usuario: AuthenticatedUser) -> HttpResponse {
    let result = query_as::<_, Usuario>(&format!(
        "SELECT {} FROM usuarios WHERE id = $1",
        COLUNAS_USUARIO
    ))
    .bind(usuario.user_id)
    .fetch_optional(&data.db_pool)
    .await;

    match result {
        Ok(Some(u)) => HttpResponse::Ok().json(GenericResponse::sucesso(
            "Perfil encontrado.",
            PerfilResponse {
                id: u.id,
                nome: u.nome,
                email: u.email,
            },
        )),
        Ok(None) => HttpResponse::NotFound().json(GenericResponse::erro("Usuário não encontrado.")),
        Err(e) => {
            log::error!("Erro ao buscar perfil do usuário {}: {:?}", usuario.user_id, e);
            HttpResponse::InternalServerError().json(GenericResponse::erro("Erro ao buscar perfil."))
        }
    }
}

/// Rota para atualizar nome e e-mail do próprio perfil (requer token).
#[put("/usuarios/perfil")]
pub async fn atualizar_perfil(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    payload: web::Json<AtualizarPerfil>,
) -> HttpResponse {
    if let Err(mensagem) = payload.validar() {
        return HttpResponse::BadRequest().json(GenericResponse::erro(mensagem));
    }

    // O novo e-mail não pode pertencer a outro usuário
    let em_uso = query("SELECT id FROM usuarios WHERE email = $1 AND id <> $2")
        .bind(payload.email.trim())
        .bind(usuario.user_id)
        .fetch_optional(&data.db_pool)
        .await;

    match em_uso {
        Ok(Some(_)) => {
            return HttpResponse::Conflict()
                .json(GenericResponse::erro("E-mail já cadastrado por outro usuário."));
        }
        Err(e) => {
            log::error!("Erro ao verificar e-mail em uso: {:?}", e);
            return HttpResponse::InternalServerError()
                .json(GenericResponse::erro("Erro interno ao verificar e-mail."));
        }
        _ => {}
    }

    let result = query("UPDATE usuarios SET nome = $1, email = $2 WHERE id = $3")
        .bind(payload.nome.trim())
        .bind(payload.email.trim())
        .bind(usuario.user_id)
        .execute(&data.db_pool)
        .await;

    match result {
        Ok(r) if r.rows_affected() > 0 => HttpResponse::Ok().json(GenericResponse::sucesso(
            "Perfil atualizado com sucesso!",
            PerfilResponse {
                id: usuario.user_id,
                nome: payload.nome.trim().to_string(),
                email: payload.email.trim().to_string(),
            },
        )),
        Ok(_) => HttpResponse::NotFound().json(GenericResponse::erro("Usuário não encontrado.")),
        Err(e) => {
            log::error!("Erro ao atualizar perfil do usuário {}: {:?}", usuario.user_id, e);
            HttpResponse::InternalServerError()
                .json(GenericResponse::erro("Erro ao atualizar perfil."))
        }
    }
}

/// Rota para solicitar a redefinição de senha.
/// Gera um token com validade curta e o "envia" registrando no log do servidor.
#[post("/usuarios/esqueci-senha")]
pub async fn esqueci_senha(
    data: web::Data<AppState>,
    payload: web::Json<EsqueciSenhaRequest>,
) -> HttpResponse {
    let usuario = match buscar_por_email(&data.db_pool, &payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            return HttpResponse::NotFound().json(GenericResponse::erro("E-mail não cadastrado."));
        }
        Err(e) => {
            log::error!("Erro ao buscar usuário para redefinição: {:?}", e);
            return HttpResponse::InternalServerError()
                .json(GenericResponse::erro("Erro interno ao processar pedido."));
        }
    };

    let token = Uuid::new_v4().to_string();
    let expira = Utc::now() + Duration::hours(VALIDADE_RESET_HORAS);

    let result = query("UPDATE usuarios SET reset_token = $1, reset_token_expira = $2 WHERE id = $3")
        .bind(&token)
        .bind(expira)
        .bind(usuario.id)
        .execute(&data.db_pool)
        .await;

    if let Err(e) = result {
        log::error!("Erro ao gravar token de redefinição: {:?}", e);
        return HttpResponse::InternalServerError()
            .json(GenericResponse::erro("Erro interno ao processar pedido."));
    }

    // Sem serviço de e-mail configurado, o token é entregue pelo log
    log::info!("Token de redefinição para {}: {}", usuario.email, token);

    HttpResponse::Ok().json(GenericResponse::sucesso_sem_corpo(
        "Pedido registrado. Verifique seu e-mail para redefinir a senha.",
    ))
}

/// Rota para concluir a redefinição de senha com o token recebido.
#[post("/usuarios/redefinir-senha")]
pub async fn redefinir_senha(
    data: web::Data<AppState>,
    payload: web::Json<RedefinirSenhaRequest>,
) -> HttpResponse {
    if let Err(mensagem) = validar_senha(&payload.nova_senha) {
        return HttpResponse::BadRequest().json(GenericResponse::erro(mensagem));
    }

    // 1. Localiza o usuário dono do token
    let usuario = match query_as::<_, Usuario>(&format!(
        "SELECT {} FROM usuarios WHERE reset_token = $1",
        COLUNAS_USUARIO
    ))
    .bind(&payload.token)
    .fetch_optional(&data.db_pool)
    .await
    {
        Ok(Some(u)) => u,
        Ok(None) => {
            return HttpResponse::BadRequest()
                .json(GenericResponse::erro("Token de redefinição inválido."));
        }
        Err(e) => {
            log::error!("Erro ao buscar token de redefinição: {:?}", e);
            return HttpResponse::InternalServerError()
                .json(GenericResponse::erro("Erro interno ao redefinir senha."));
        }
    };

    // 2. Confere a validade do token
    match usuario.reset_token_expira {
        Some(expira) if expira > Utc::now() => {}
        _ => {
            return HttpResponse::BadRequest()
                .json(GenericResponse::erro("Token de redefinição expirado."));
        }
    }

    // 3. Gera o novo hash e limpa o token
    let senha_hash = match hash(&payload.nova_senha, DEFAULT_COST) {
        Ok(h) => h,
        Err(e) => {
            log::error!("Erro ao fazer hash da nova senha: {:?}", e);
            return HttpResponse::InternalServerError()
                .json(GenericResponse::erro("Erro interno ao processar senha."));
        }
    };

    let result = query(
        "UPDATE usuarios SET senha_hash = $1, reset_token = NULL, reset_token_expira = NULL WHERE id = $2",
    )
    .bind(&senha_hash)
    .bind(usuario.id)
    .execute(&data.db_pool)
    .await;

    match result {
        Ok(_) => HttpResponse::Ok().json(GenericResponse::sucesso_sem_corpo(
            "Senha redefinida com sucesso!",
        )),
        Err(e) => {
            log::error!("Erro ao gravar nova senha: {:?}", e);
            HttpResponse::InternalServerError()
                .json(GenericResponse::erro("Erro interno ao redefinir senha."))
        }
    }
}

#[cfg(test)]
mod tests {
    use bcrypt::{hash, verify, DEFAULT_COST};

    #[test]
    fn hash_de_senha_verifica_apenas_a_senha_correta() {
        let hash = hash("minha_senha", DEFAULT_COST).unwrap();
        assert!(verify("minha_senha", &hash).unwrap());
        assert!(!verify("outra_senha", &hash).unwrap());
    }
}
