// src/dashboard/metricas.rs
//
// Funções puras de agregação e métricas financeiras. Tudo aqui opera sobre
// fluxos em f64 já com sinal (gastos negativos, vendas positivas) e não
// conhece banco de dados nem HTTP.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::dashboard_structs::{FluxoPeriodo, Granularidade};

/// Um lançamento datado com valor sinalizado.
#[derive(Debug, Clone, Copy)]
pub struct Lancamento {
    pub data: NaiveDate,
    pub valor: f64,
}

/// Chave textual do período de um lançamento: "2025-01-10", "2025-01" ou "2025".
pub fn chave_periodo(data: NaiveDate, granularidade: Granularidade) -> String {
    let formato = match granularidade {
        Granularidade::Dia => "%Y-%m-%d",
        Granularidade::Mes => "%Y-%m",
        Granularidade::Ano => "%Y",
    };
    data.format(formato).to_string()
}

/// Agrupa os lançamentos por período e soma gastos e vendas separadamente.
/// Os períodos saem em ordem crescente de chave; `acumulado` ainda fica
/// zerado (é preenchido por `aplicar_acumulado`).
pub fn agrupar_por_periodo(
    lancamentos: &[Lancamento],
    granularidade: Granularidade,
) -> Vec<FluxoPeriodo> {
    // BTreeMap mantém as chaves de período já ordenadas
    let mut grupos: BTreeMap<String, (f64, f64)> = BTreeMap::new();

    for lancamento in lancamentos {
        let chave = chave_periodo(lancamento.data, granularidade);
        let entrada = grupos.entry(chave).or_insert((0.0, 0.0));
        if lancamento.valor < 0.0 {
            entrada.0 += -lancamento.valor; // gasto, guardado como magnitude
        } else {
            entrada.1 += lancamento.valor; // venda
        }
    }

    grupos
        .into_iter()
        .map(|(periodo, (total_gastos, total_vendas))| FluxoPeriodo {
            periodo,
            total_gastos,
            total_vendas,
            fluxo_liquido: total_vendas - total_gastos,
            acumulado: 0.0,
        })
        .collect()
}

/// Preenche o fluxo acumulado de cada período, partindo de `-investimento_inicial`.
pub fn aplicar_acumulado(periodos: &mut [FluxoPeriodo], investimento_inicial: f64) {
    let mut corrente = -investimento_inicial;
    for periodo in periodos.iter_mut() {
        corrente += periodo.fluxo_liquido;
        periodo.acumulado = corrente;
    }
}

/// Período de payback: quantos períodos até o fluxo acumulado recuperar o
/// investimento inicial, com interpolação linear dentro do período em que a
/// recuperação acontece. Retorna `None` ("nunca") quando o acumulado não
/// chega a zero ou quando não há investimento a recuperar.
pub fn payback(investimento_inicial: f64, fluxos: &[f64]) -> Option<f64> {
    if investimento_inicial <= 0.0 {
        return None;
    }

    let mut acumulado = -investimento_inicial;
    for (i, fluxo) in fluxos.iter().enumerate() {
        let anterior = acumulado;
        acumulado += fluxo;
        if acumulado >= 0.0 {
            // anterior < 0 e acumulado >= 0, logo fluxo > 0 e dá para interpolar
            return Some(i as f64 + (-anterior) / fluxo);
        }
    }
    None
}

/// Valor presente líquido dos fluxos à taxa dada (fluxo i descontado por (1+taxa)^i).
pub fn vpl(taxa: f64, fluxos: &[f64]) -> f64 {
    fluxos
        .iter()
        .enumerate()
        .map(|(i, fluxo)| fluxo / (1.0 + taxa).powi(i as i32))
        .sum()
}

/// Taxa interna de retorno por período dos fluxos (o primeiro elemento é o
/// investimento, negativo). Resolve `vpl(taxa) = 0` por bissecção. Entradas
/// degeneradas (todos os fluxos com o mesmo sinal, ou sem raiz no intervalo
/// de busca) resultam em `None` em vez de erro.
pub fn tir(fluxos: &[f64]) -> Option<f64> {
    if fluxos.iter().all(|f| *f >= 0.0) || fluxos.iter().all(|f| *f <= 0.0) {
        return None;
    }

    // Intervalo de busca: de quase -100% a 1000% por período
    let mut baixo = -0.9999;
    let mut alto = 10.0;

    let vpl_baixo = vpl(baixo, fluxos);
    let vpl_alto = vpl(alto, fluxos);
    if vpl_baixo * vpl_alto > 0.0 {
        return None; // sem mudança de sinal, a bissecção não encontra raiz
    }

    for _ in 0..200 {
        let meio = (baixo + alto) / 2.0;
        let vpl_meio = vpl(meio, fluxos);
        if vpl_meio.abs() < 1e-9 {
            return Some(meio);
        }
        if vpl_baixo * vpl_meio < 0.0 {
            alto = meio;
        } else {
            baixo = meio;
        }
    }

    Some((baixo + alto) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dia(ano: i32, mes: u32, dia: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(ano, mes, dia).unwrap()
    }

    fn aproximado(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn chave_de_periodo_por_granularidade() {
        let data = dia(2025, 1, 10);
        assert_eq!(chave_periodo(data, Granularidade::Dia), "2025-01-10");
        assert_eq!(chave_periodo(data, Granularidade::Mes), "2025-01");
        assert_eq!(chave_periodo(data, Granularidade::Ano), "2025");
    }

    #[test]
    fn agrupamento_mensal_separa_gastos_e_vendas() {
        // Exemplo de referência: um gasto de 100 e uma venda de 500 em janeiro
        let lancamentos = [
            Lancamento { data: dia(2025, 1, 10), valor: -100.0 },
            Lancamento { data: dia(2025, 1, 15), valor: 500.0 },
        ];

        let periodos = agrupar_por_periodo(&lancamentos, Granularidade::Mes);

        assert_eq!(periodos.len(), 1);
        assert_eq!(periodos[0].periodo, "2025-01");
        assert!(aproximado(periodos[0].total_gastos, 100.0));
        assert!(aproximado(periodos[0].total_vendas, 500.0));
        assert!(aproximado(periodos[0].fluxo_liquido, 400.0));
    }

    #[test]
    fn periodos_saem_em_ordem_crescente() {
        let lancamentos = [
            Lancamento { data: dia(2025, 3, 1), valor: 10.0 },
            Lancamento { data: dia(2024, 12, 31), valor: 20.0 },
            Lancamento { data: dia(2025, 1, 5), valor: -5.0 },
        ];

        let periodos = agrupar_por_periodo(&lancamentos, Granularidade::Mes);
        let chaves: Vec<&str> = periodos.iter().map(|p| p.periodo.as_str()).collect();
        assert_eq!(chaves, vec!["2024-12", "2025-01", "2025-03"]);
    }

    #[test]
    fn soma_dos_periodos_preserva_o_total() {
        let lancamentos = [
            Lancamento { data: dia(2025, 1, 10), valor: -100.0 },
            Lancamento { data: dia(2025, 1, 15), valor: 500.0 },
            Lancamento { data: dia(2025, 2, 3), valor: -250.0 },
            Lancamento { data: dia(2025, 2, 20), valor: 80.0 },
            Lancamento { data: dia(2026, 7, 1), valor: -42.5 },
        ];

        let total_bruto: f64 = lancamentos.iter().map(|l| l.valor).sum();

        for granularidade in [Granularidade::Dia, Granularidade::Mes, Granularidade::Ano] {
            let periodos = agrupar_por_periodo(&lancamentos, granularidade);
            let total_agrupado: f64 = periodos.iter().map(|p| p.fluxo_liquido).sum();
            assert!(aproximado(total_agrupado, total_bruto));
        }
    }

    #[test]
    fn acumulado_segue_a_recorrencia() {
        let lancamentos = [
            Lancamento { data: dia(2025, 1, 1), valor: 100.0 },
            Lancamento { data: dia(2025, 2, 1), valor: -30.0 },
            Lancamento { data: dia(2025, 3, 1), valor: 70.0 },
        ];

        let mut periodos = agrupar_por_periodo(&lancamentos, Granularidade::Mes);
        aplicar_acumulado(&mut periodos, 50.0);

        assert!(aproximado(periodos[0].acumulado, -50.0 + 100.0));
        for i in 1..periodos.len() {
            assert!(aproximado(
                periodos[i].acumulado,
                periodos[i - 1].acumulado + periodos[i].fluxo_liquido
            ));
        }
    }

    #[test]
    fn payback_interpola_dentro_do_periodo_de_recuperacao() {
        // 100 investidos, recuperação no terceiro período: 2 + 20/40 = 2,5
        assert!(aproximado(payback(100.0, &[40.0, 40.0, 40.0]).unwrap(), 2.5));
        // Recuperação já no primeiro período: 100/400 = 0,25
        assert!(aproximado(payback(100.0, &[400.0]).unwrap(), 0.25));
    }

    #[test]
    fn payback_nunca_quando_nao_recupera() {
        assert!(payback(100.0, &[10.0, 10.0]).is_none());
        assert!(payback(100.0, &[]).is_none());
    }

    #[test]
    fn payback_nunca_sem_investimento_a_recuperar() {
        assert!(payback(0.0, &[100.0]).is_none());
        assert!(payback(-50.0, &[100.0]).is_none());
    }

    #[test]
    fn tir_de_um_periodo_unico() {
        // -100 hoje, 110 no período seguinte: taxa de 10%
        let taxa = tir(&[-100.0, 110.0]).unwrap();
        assert!((taxa - 0.10).abs() < 1e-4);
    }

    #[test]
    fn tir_de_dois_periodos() {
        // 60/(1+r) + 60/(1+r)^2 = 100  =>  r ~ 13,07%
        let taxa = tir(&[-100.0, 60.0, 60.0]).unwrap();
        assert!((taxa - 0.1307).abs() < 1e-3);
    }

    #[test]
    fn tir_indefinida_para_fluxos_degenerados() {
        assert!(tir(&[100.0, 50.0]).is_none()); // só entradas
        assert!(tir(&[-100.0, -50.0]).is_none()); // só saídas
        assert!(tir(&[]).is_none());
        assert!(tir(&[0.0, 0.0]).is_none());
    }

    #[test]
    fn vpl_a_taxa_zero_e_a_soma_simples() {
        assert!(aproximado(vpl(0.0, &[-100.0, 60.0, 60.0]), 20.0));
    }
}
