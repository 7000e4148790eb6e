// src/vendas/venda_router.rs

use actix_web::{delete, get, post, put, web, HttpResponse};
use sqlx::{query, query_as, Row};

use super::venda_structs::{NovaVenda, Venda};
use crate::shared::shared_structs::GenericResponse;
use crate::usuarios::auth_middleware::AuthenticatedUser;
use crate::AppState;

const COLUNAS_VENDA: &str = "id, usuario_id, descricao, valor, categoria, tipo_venda, data, \
     tipo_curso, nome_cliente, email_cliente, telefone, valor_bruto, desconto, imposto, \
     comissao, valor_final";

/// Rota para listar as vendas do usuário autenticado, da mais recente para a mais antiga.
#[get("/vendas")]
pub async fn listar_vendas(data: web::Data<AppState>, usuario: AuthenticatedUser) -> HttpResponse {
    let result = query_as::<_, Venda>(&format!(
        "SELECT {} FROM vendas WHERE usuario_id = $1 ORDER BY data DESC, id DESC",
        COLUNAS_VENDA
    ))
    .bind(usuario.user_id)
    .fetch_all(&data.db_pool)
    .await;

    match result {
        Ok(vendas) => HttpResponse::Ok().json(GenericResponse::sucesso(
            "Vendas listadas com sucesso!",
            vendas,
        )),
        Err(e) => {
            log::error!("Erro ao listar vendas do usuário {}: {:?}", usuario.user_id, e);
            HttpResponse::InternalServerError().json(GenericResponse::erro("Erro ao listar vendas."))
        }
    }
}

/// Rota para cadastrar uma nova venda para o usuário autenticado.
/// Devolve o registro criado no corpo da resposta.
#[post("/vendas")]
pub async fn cadastrar_venda(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    item: web::Json<NovaVenda>,
) -> HttpResponse {
    if let Err(mensagem) = item.validar() {
        return HttpResponse::BadRequest().json(GenericResponse::erro(mensagem));
    }

    let result = query(
        "INSERT INTO vendas (usuario_id, descricao, valor, categoria, tipo_venda, data,
             tipo_curso, nome_cliente, email_cliente, telefone, valor_bruto, desconto,
             imposto, comissao, valor_final)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
         RETURNING id",
    )
    .bind(usuario.user_id)
    .bind(item.descricao.trim())
    .bind(&item.valor)
    .bind(&item.categoria)
    .bind(&item.tipo_venda)
    .bind(item.data)
    .bind(&item.tipo_curso)
    .bind(&item.nome_cliente)
    .bind(&item.email_cliente)
    .bind(&item.telefone)
    .bind(&item.valor_bruto)
    .bind(&item.desconto)
    .bind(&item.imposto)
    .bind(&item.comissao)
    .bind(&item.valor_final)
    .fetch_one(&data.db_pool)
    .await;

    match result {
        Ok(row) => match row.try_get::<i32, &str>("id") {
            Ok(id) => HttpResponse::Created().json(GenericResponse::sucesso(
                "Venda cadastrada com sucesso!",
                item.into_inner().em_venda(id, usuario.user_id),
            )),
            Err(e) => {
                log::error!("Erro ao obter id da nova venda: {:?}", e);
                HttpResponse::InternalServerError()
                    .json(GenericResponse::erro("Erro ao processar resposta do cadastro."))
            }
        },
        Err(e) => {
            log::error!("Erro ao inserir venda: {:?}", e);
            HttpResponse::InternalServerError().json(GenericResponse::erro("Erro ao inserir venda."))
        }
    }
}

/// Rota para atualizar uma venda do usuário autenticado.
/// Substitui todos os campos mutáveis do registro.
#[put("/vendas/{id}")]
pub async fn atualizar_venda(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
    item: web::Json<NovaVenda>,
) -> HttpResponse {
    let id = path.into_inner();

    if let Err(mensagem) = item.validar() {
        return HttpResponse::BadRequest().json(GenericResponse::erro(mensagem));
    }

    let result = query(
        "UPDATE vendas SET descricao = $1, valor = $2, categoria = $3, tipo_venda = $4, data = $5,
             tipo_curso = $6, nome_cliente = $7, email_cliente = $8, telefone = $9,
             valor_bruto = $10, desconto = $11, imposto = $12, comissao = $13, valor_final = $14
         WHERE id = $15 AND usuario_id = $16",
    )
    .bind(item.descricao.trim())
    .bind(&item.valor)
    .bind(&item.categoria)
    .bind(&item.tipo_venda)
    .bind(item.data)
    .bind(&item.tipo_curso)
    .bind(&item.nome_cliente)
    .bind(&item.email_cliente)
    .bind(&item.telefone)
    .bind(&item.valor_bruto)
    .bind(&item.desconto)
    .bind(&item.imposto)
    .bind(&item.comissao)
    .bind(&item.valor_final)
    .bind(id)
    .bind(usuario.user_id)
    .execute(&data.db_pool)
    .await;

    match result {
        Ok(r) if r.rows_affected() > 0 => HttpResponse::Ok().json(GenericResponse::sucesso(
            format!("Venda com ID {} atualizada com sucesso!", id),
            item.into_inner().em_venda(id, usuario.user_id),
        )),
        Ok(_) => HttpResponse::NotFound().json(GenericResponse::erro(format!(
            "Venda com ID {} não encontrada.",
            id
        ))),
        Err(e) => {
            log::error!("Erro ao atualizar venda {}: {:?}", id, e);
            HttpResponse::InternalServerError().json(GenericResponse::erro("Erro ao atualizar venda."))
        }
    }
}

/// Rota para remover uma venda do usuário autenticado.
#[delete("/vendas/{id}")]
pub async fn deletar_venda(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
) -> HttpResponse {
    let id = path.into_inner();

    let result = query("DELETE FROM vendas WHERE id = $1 AND usuario_id = $2")
        .bind(id)
        .bind(usuario.user_id)
        .execute(&data.db_pool)
        .await;

    match result {
        Ok(r) if r.rows_affected() > 0 => HttpResponse::Ok().json(GenericResponse::sucesso_sem_corpo(
            format!("Venda com ID {} removida com sucesso!", id),
        )),
        Ok(_) => HttpResponse::NotFound().json(GenericResponse::erro(format!(
            "Venda com ID {} não encontrada.",
            id
        ))),
        Err(e) => {
            log::error!("Erro ao remover venda {}: {:?}", id, e);
            HttpResponse::InternalServerError().json(GenericResponse::erro("Erro ao remover venda."))
        }
    }
}
