// src/dashboard/dashboard_structs.rs

use serde::{Deserialize, Serialize};

/// Granularidade de agrupamento dos lançamentos no resumo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularidade {
    Dia,
    Mes,
    Ano,
}

/// Parâmetros de query da rota de resumo.
#[derive(Deserialize)]
pub struct ResumoQuery {
    pub granularidade: Option<Granularidade>,
    pub investimento_inicial: Option<f64>,
}

/// Fluxo de caixa de um período (dia, mês ou ano, conforme a granularidade).
/// `total_gastos` e `total_vendas` são magnitudes positivas; `fluxo_liquido`
/// é a diferença e `acumulado` o total corrente desde o investimento inicial.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FluxoPeriodo {
    pub periodo: String,
    pub total_gastos: f64,
    pub total_vendas: f64,
    pub fluxo_liquido: f64,
    pub acumulado: f64,
}

/// Corpo da resposta da rota `/dashboard/resumo`.
/// `payback` e `tir` ficam nulos quando a métrica não é computável.
#[derive(Serialize)]
pub struct ResumoFinanceiro {
    pub granularidade: Granularidade,
    pub investimento_inicial: f64,
    pub total_gastos: f64,
    pub total_vendas: f64,
    pub lucro_liquido: f64,
    pub payback: Option<f64>,
    pub tir: Option<f64>,
    pub periodos: Vec<FluxoPeriodo>,
}
