// src/dashboard/dashboard_router.rs

use actix_web::{get, web, HttpResponse};
use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::NaiveDate;
use sqlx::{query_as, FromRow, Pool, Postgres};

use super::dashboard_structs::{Granularidade, ResumoFinanceiro, ResumoQuery};
use super::metricas::{agrupar_por_periodo, aplicar_acumulado, payback, tir, Lancamento};
use crate::shared::shared_structs::GenericResponse;
use crate::usuarios::auth_middleware::AuthenticatedUser;
use crate::AppState;

/// Linha mínima usada pelo resumo: só a data e o valor do lançamento.
#[derive(FromRow)]
struct LancamentoRow {
    data: NaiveDate,
    valor: BigDecimal,
}

/// Carrega data e valor dos lançamentos de uma tabela (`gastos` ou `vendas`)
/// do usuário, aplicando o sinal indicado aos valores.
async fn carregar_lancamentos(
    pool: &Pool<Postgres>,
    tabela: &str,
    usuario_id: i32,
    sinal: f64,
) -> Result<Vec<Lancamento>, sqlx::Error> {
    let linhas = query_as::<_, LancamentoRow>(&format!(
        "SELECT data, valor FROM {} WHERE usuario_id = $1",
        tabela
    ))
    .bind(usuario_id)
    .fetch_all(pool)
    .await?;

    Ok(linhas
        .into_iter()
        .map(|linha| Lancamento {
            data: linha.data,
            valor: sinal * linha.valor.to_f64().unwrap_or(0.0),
        })
        .collect())
}

/// Rota do resumo financeiro do usuário autenticado.
///
/// Agrupa gastos e vendas pela granularidade pedida (dia, mês ou ano; padrão
/// mês), calcula o fluxo líquido e o acumulado de cada período partindo do
/// investimento inicial informado, e deriva lucro líquido, payback e TIR.
#[get("/dashboard/resumo")]
pub async fn resumo_financeiro(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    query: web::Query<ResumoQuery>,
) -> HttpResponse {
    let granularidade = query.granularidade.unwrap_or(Granularidade::Mes);
    let investimento_inicial = query.investimento_inicial.unwrap_or(0.0);

    if investimento_inicial < 0.0 || !investimento_inicial.is_finite() {
        return HttpResponse::BadRequest().json(GenericResponse::erro(
            "O investimento inicial deve ser um número maior ou igual a zero.",
        ));
    }

    // Carrega os lançamentos do usuário: gastos entram negativos, vendas positivas
    let gastos = carregar_lancamentos(&data.db_pool, "gastos", usuario.user_id, -1.0).await;
    let vendas = carregar_lancamentos(&data.db_pool, "vendas", usuario.user_id, 1.0).await;

    let (gastos, vendas) = match (gastos, vendas) {
        (Ok(g), Ok(v)) => (g, v),
        (Err(e), _) | (_, Err(e)) => {
            log::error!(
                "Erro ao carregar lançamentos do usuário {}: {:?}",
                usuario.user_id,
                e
            );
            return HttpResponse::InternalServerError()
                .json(GenericResponse::erro("Erro ao montar o resumo financeiro."));
        }
    };

    let total_gastos: f64 = gastos.iter().map(|l| -l.valor).sum();
    let total_vendas: f64 = vendas.iter().map(|l| l.valor).sum();

    // Agrega tudo numa linha do tempo só
    let mut lancamentos = gastos;
    lancamentos.extend(vendas);

    let mut periodos = agrupar_por_periodo(&lancamentos, granularidade);
    aplicar_acumulado(&mut periodos, investimento_inicial);

    let fluxos: Vec<f64> = periodos.iter().map(|p| p.fluxo_liquido).collect();

    // Série para a TIR: o investimento inicial como saída no período zero
    let mut fluxos_tir = Vec::with_capacity(fluxos.len() + 1);
    fluxos_tir.push(-investimento_inicial);
    fluxos_tir.extend(&fluxos);

    HttpResponse::Ok().json(GenericResponse::sucesso(
        "Resumo financeiro calculado com sucesso!",
        ResumoFinanceiro {
            granularidade,
            investimento_inicial,
            total_gastos,
            total_vendas,
            lucro_liquido: total_vendas - total_gastos,
            payback: payback(investimento_inicial, &fluxos),
            tir: tir(&fluxos_tir),
            periodos,
        },
    ))
}
