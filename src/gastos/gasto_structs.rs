// src/gastos/gasto_structs.rs

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Categorias aceitas para um gasto.
pub const CATEGORIAS_GASTO: &[&str] = &[
    "moradia",
    "alimentacao",
    "transporte",
    "saude",
    "educacao",
    "lazer",
    "contas",
    "impostos",
    "outros",
];

/// Tipos de despesa aceitos.
pub const TIPOS_DESPESA: &[&str] = &[
    "fixa",
    "variavel",
    "essencial",
    "nao_essencial",
    "investimento",
];

/// Estrutura que representa um gasto no banco de dados.
/// O valor é sempre a magnitude positiva; o sinal negativo é aplicado
/// apenas na agregação do dashboard.
#[derive(Serialize, FromRow)]
pub struct Gasto {
    pub id: i32,
    pub usuario_id: i32,
    pub descricao: String,
    pub valor: BigDecimal,
    pub categoria: String,
    pub tipo_despesa: String,
    pub data: NaiveDate,
}

/// Estrutura para receber os dados de um gasto nas requisições POST/PUT.
#[derive(Deserialize)]
pub struct NovoGasto {
    pub descricao: String,
    pub valor: BigDecimal,
    pub categoria: String,
    pub tipo_despesa: String,
    pub data: NaiveDate,
}

impl NovoGasto {
    /// Valida os campos obrigatórios e os vocabulários fixos.
    pub fn validar(&self) -> Result<(), String> {
        if self.descricao.trim().is_empty() {
            return Err("A descrição é obrigatória.".to_string());
        }
        if self.valor <= BigDecimal::from(0) {
            return Err("O valor deve ser maior que zero.".to_string());
        }
        if !CATEGORIAS_GASTO.contains(&self.categoria.as_str()) {
            return Err(format!("Categoria inválida: {}.", self.categoria));
        }
        if !TIPOS_DESPESA.contains(&self.tipo_despesa.as_str()) {
            return Err(format!("Tipo de despesa inválido: {}.", self.tipo_despesa));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gasto_base() -> NovoGasto {
        NovoGasto {
            descricao: "Aluguel".to_string(),
            valor: BigDecimal::from(1500),
            categoria: "moradia".to_string(),
            tipo_despesa: "fixa".to_string(),
            data: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
        }
    }

    #[test]
    fn gasto_valido_passa_na_validacao() {
        assert!(gasto_base().validar().is_ok());
    }

    #[test]
    fn gasto_sem_descricao_e_rejeitado() {
        let mut gasto = gasto_base();
        gasto.descricao = "   ".to_string();
        assert!(gasto.validar().is_err());
    }

    #[test]
    fn gasto_com_valor_nao_positivo_e_rejeitado() {
        let mut gasto = gasto_base();
        gasto.valor = BigDecimal::from(0);
        assert!(gasto.validar().is_err());

        gasto.valor = BigDecimal::from(-10);
        assert!(gasto.validar().is_err());
    }

    #[test]
    fn gasto_com_vocabulario_desconhecido_e_rejeitado() {
        let mut gasto = gasto_base();
        gasto.categoria = "criptomoedas".to_string();
        assert!(gasto.validar().is_err());

        let mut gasto = gasto_base();
        gasto.tipo_despesa = "eventual".to_string();
        assert!(gasto.validar().is_err());
    }
}
