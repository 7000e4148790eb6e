// src/gastos/gasto_router.rs

use actix_web::{delete, get, post, put, web, HttpResponse};
use sqlx::{query, query_as, Row};

use super::gasto_structs::{Gasto, NovoGasto};
use crate::shared::shared_structs::GenericResponse;
use crate::usuarios::auth_middleware::AuthenticatedUser;
use crate::AppState;

/// Rota para listar os gastos do usuário autenticado, do mais recente para o mais antigo.
#[get("/gastos")]
pub async fn listar_gastos(data: web::Data<AppState>, usuario: AuthenticatedUser) -> HttpResponse {
    let result = query_as::<_, Gasto>(
        "SELECT id, usuario_id, descricao, valor, categoria, tipo_despesa, data
         FROM gastos WHERE usuario_id = $1 ORDER BY data DESC, id DESC",
    )
    .bind(usuario.user_id)
    .fetch_all(&data.db_pool)
    .await;

    match result {
        Ok(gastos) => HttpResponse::Ok().json(GenericResponse::sucesso(
            "Gastos listados com sucesso!",
            gastos,
        )),
        Err(e) => {
            log::error!("Erro ao listar gastos do usuário {}: {:?}", usuario.user_id, e);
            HttpResponse::InternalServerError().json(GenericResponse::erro("Erro ao listar gastos."))
        }
    }
}

/// Rota para cadastrar um novo gasto para o usuário autenticado.
/// Devolve o registro criado no corpo da resposta.
#[post("/gastos")]
pub async fn cadastrar_gasto(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    item: web::Json<NovoGasto>,
) -> HttpResponse {
    if let Err(mensagem) = item.validar() {
        return HttpResponse::BadRequest().json(GenericResponse::erro(mensagem));
    }

    let result = query(
        "INSERT INTO gastos (usuario_id, descricao, valor, categoria, tipo_despesa, data)
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
    )
    .bind(usuario.user_id)
    .bind(item.descricao.trim())
    .bind(&item.valor)
    .bind(&item.categoria)
    .bind(&item.tipo_despesa)
    .bind(item.data)
    .fetch_one(&data.db_pool)
    .await;

    match result {
        Ok(row) => match row.try_get::<i32, &str>("id") {
            Ok(id) => {
                let item = item.into_inner();
                HttpResponse::Created().json(GenericResponse::sucesso(
                    "Gasto cadastrado com sucesso!",
                    Gasto {
                        id,
                        usuario_id: usuario.user_id,
                        descricao: item.descricao.trim().to_string(),
                        valor: item.valor,
                        categoria: item.categoria,
                        tipo_despesa: item.tipo_despesa,
                        data: item.data,
                    },
                ))
            }
            Err(e) => {
                log::error!("Erro ao obter id do novo gasto: {:?}", e);
                HttpResponse::InternalServerError()
                    .json(GenericResponse::erro("Erro ao processar resposta do cadastro."))
            }
        },
        Err(e) => {
            log::error!("Erro ao inserir gasto: {:?}", e);
            HttpResponse::InternalServerError().json(GenericResponse::erro("Erro ao inserir gasto."))
        }
    }
}

/// Rota para atualizar um gasto do usuário autenticado.
/// Substitui todos os campos mutáveis do registro.
#[put("/gastos/{id}")]
pub async fn atualizar_gasto(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
    item: web::Json<NovoGasto>,
) -> HttpResponse {
    let id = path.into_inner();

    if let Err(mensagem) = item.validar() {
        return HttpResponse::BadRequest().json(GenericResponse::erro(mensagem));
    }

    let result = query(
        "UPDATE gastos SET descricao = $1, valor = $2, categoria = $3, tipo_despesa = $4, data = $5
         WHERE id = $6 AND usuario_id = $7",
    )
    .bind(item.descricao.trim())
    .bind(&item.valor)
    .bind(&item.categoria)
    .bind(&item.tipo_despesa)
    .bind(item.data)
    .bind(id)
    .bind(usuario.user_id)
    .execute(&data.db_pool)
    .await;

    match result {
        Ok(r) if r.rows_affected() > 0 => {
            let item = item.into_inner();
            HttpResponse::Ok().json(GenericResponse::sucesso(
                format!("Gasto com ID {} atualizado com sucesso!", id),
                Gasto {
                    id,
                    usuario_id: usuario.user_id,
                    descricao: item.descricao.trim().to_string(),
                    valor: item.valor,
                    categoria: item.categoria,
                    tipo_despesa: item.tipo_despesa,
                    data: item.data,
                },
            ))
        }
        Ok(_) => HttpResponse::NotFound().json(GenericResponse::erro(format!(
            "Gasto com ID {} não encontrado.",
            id
        ))),
        Err(e) => {
            log::error!("Erro ao atualizar gasto {}: {:?}", id, e);
            HttpResponse::InternalServerError().json(GenericResponse::erro("Erro ao atualizar gasto."))
        }
    }
}

/// Rota para remover um gasto do usuário autenticado.
#[delete("/gastos/{id}")]
pub async fn deletar_gasto(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
) -> HttpResponse {
    let id = path.into_inner();

    let result = query("DELETE FROM gastos WHERE id = $1 AND usuario_id = $2")
        .bind(id)
        .bind(usuario.user_id)
        .execute(&data.db_pool)
        .await;

    match result {
        Ok(r) if r.rows_affected() > 0 => HttpResponse::Ok().json(GenericResponse::sucesso_sem_corpo(
            format!("Gasto com ID {} removido com sucesso!", id),
        )),
        Ok(_) => HttpResponse::NotFound().json(GenericResponse::erro(format!(
            "Gasto com ID {} não encontrado.",
            id
        ))),
        Err(e) => {
            log::error!("Erro ao remover gasto {}: {:?}", id, e);
            HttpResponse::InternalServerError().json(GenericResponse::erro("Erro ao remover gasto."))
        }
    }
}
