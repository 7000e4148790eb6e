// src/vendas/venda_structs.rs

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Tipos de venda aceitos.
pub const TIPOS_VENDA: &[&str] = &["produto", "servico", "curso", "assinatura", "outros"];

/// Estrutura que representa uma venda no banco de dados.
/// Os campos opcionais são preenchidos em vendas de cursos/serviços
/// (dados do cliente e a decomposição do valor).
#[derive(Serialize, FromRow)]
pub struct Venda {
    pub id: i32,
    pub usuario_id: i32,
    pub descricao: String,
    pub valor: BigDecimal,
    pub categoria: String,
    pub tipo_venda: String,
    pub data: NaiveDate,
    pub tipo_curso: Option<String>,
    pub nome_cliente: Option<String>,
    pub email_cliente: Option<String>,
    pub telefone: Option<String>,
    pub valor_bruto: Option<BigDecimal>,
    pub desconto: Option<BigDecimal>,
    pub imposto: Option<BigDecimal>,
    pub comissao: Option<BigDecimal>,
    pub valor_final: Option<BigDecimal>,
}

/// Estrutura para receber os dados de uma venda nas requisições POST/PUT.
#[derive(Deserialize)]
pub struct NovaVenda {
    pub descricao: String,
    pub valor: BigDecimal,
    pub categoria: String,
    pub tipo_venda: String,
    pub data: NaiveDate,
    pub tipo_curso: Option<String>,
    pub nome_cliente: Option<String>,
    pub email_cliente: Option<String>,
    pub telefone: Option<String>,
    pub valor_bruto: Option<BigDecimal>,
    pub desconto: Option<BigDecimal>,
    pub imposto: Option<BigDecimal>,
    pub comissao: Option<BigDecimal>,
    pub valor_final: Option<BigDecimal>,
}

impl NovaVenda {
    /// Valida os campos obrigatórios e o vocabulário de tipos.
    pub fn validar(&self) -> Result<(), String> {
        if self.descricao.trim().is_empty() {
            return Err("A descrição é obrigatória.".to_string());
        }
        if self.valor <= BigDecimal::from(0) {
            return Err("O valor deve ser maior que zero.".to_string());
        }
        if self.categoria.trim().is_empty() {
            return Err("A categoria é obrigatória.".to_string());
        }
        if !TIPOS_VENDA.contains(&self.tipo_venda.as_str()) {
            return Err(format!("Tipo de venda inválido: {}.", self.tipo_venda));
        }
        Ok(())
    }

    /// Monta a representação persistida a partir do payload validado.
    pub fn em_venda(self, id: i32, usuario_id: i32) -> Venda {
        Venda {
            id,
            usuario_id,
            descricao: self.descricao.trim().to_string(),
            valor: self.valor,
            categoria: self.categoria,
            tipo_venda: self.tipo_venda,
            data: self.data,
            tipo_curso: self.tipo_curso,
            nome_cliente: self.nome_cliente,
            email_cliente: self.email_cliente,
            telefone: self.telefone,
            valor_bruto: self.valor_bruto,
            desconto: self.desconto,
            imposto: self.imposto,
            comissao: self.comissao,
            valor_final: self.valor_final,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn venda_base() -> NovaVenda {
        NovaVenda {
            descricao: "Curso de violão".to_string(),
            valor: BigDecimal::from(500),
            categoria: "cursos".to_string(),
            tipo_venda: "curso".to_string(),
            data: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            tipo_curso: Some("online".to_string()),
            nome_cliente: Some("João".to_string()),
            email_cliente: None,
            telefone: None,
            valor_bruto: None,
            desconto: None,
            imposto: None,
            comissao: None,
            valor_final: None,
        }
    }

    #[test]
    fn venda_valida_passa_na_validacao() {
        assert!(venda_base().validar().is_ok());
    }

    #[test]
    fn venda_com_tipo_desconhecido_e_rejeitada() {
        let mut venda = venda_base();
        venda.tipo_venda = "permuta".to_string();
        assert!(venda.validar().is_err());
    }

    #[test]
    fn venda_com_valor_nao_positivo_e_rejeitada() {
        let mut venda = venda_base();
        venda.valor = BigDecimal::from(-1);
        assert!(venda.validar().is_err());
    }

    #[test]
    fn em_venda_preserva_os_campos_opcionais() {
        let venda = venda_base().em_venda(3, 9);
        assert_eq!(venda.id, 3);
        assert_eq!(venda.usuario_id, 9);
        assert_eq!(venda.tipo_curso.as_deref(), Some("online"));
        assert_eq!(venda.nome_cliente.as_deref(), Some("João"));
        assert!(venda.valor_bruto.is_none());
    }
}
