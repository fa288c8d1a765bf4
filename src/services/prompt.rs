//! Prompt template for the LLM market commentary.

use crate::types::{AnalysisRequest, MiniIndexData, StockSnapshot};

/// Minimum absolute variation (percent) for a stock to be called out.
const SIGNIFICANT_VARIATION_PCT: f64 = 0.1;

fn stock_line(stock: &StockSnapshot) -> String {
    format!(
        "  → {} ({}): {} | Peso: {}% | Volume: {}",
        stock.ticker, stock.sector, stock.variation, stock.index_weight, stock.volume
    )
}

fn join_or(lines: Vec<String>, fallback: &str) -> String {
    if lines.is_empty() {
        fallback.to_string()
    } else {
        lines.join("\n")
    }
}

/// Build the commentary prompt from the submitted index figures and the
/// current mini-index context. A missing mini-index read degrades to
/// placeholder wording rather than omitting the section.
pub fn build_market_analysis_prompt(
    request: &AnalysisRequest,
    mini_index: Option<&MiniIndexData>,
) -> String {
    let gainers = join_or(
        request
            .top_stocks
            .iter()
            .filter(|s| s.variation_pct > SIGNIFICANT_VARIATION_PCT)
            .map(stock_line)
            .collect(),
        "Nenhuma ação com variação positiva significativa",
    );

    let losers = join_or(
        request
            .top_stocks
            .iter()
            .filter(|s| s.variation_pct < -SIGNIFICANT_VARIATION_PCT)
            .map(stock_line)
            .collect(),
        "Nenhuma ação com variação negativa significativa",
    );

    let (win_trend, win_volume) = match mini_index {
        Some(data) => (data.trend.to_string(), data.volume.clone()),
        None => (
            "sem tendência clara".to_string(),
            "volume não disponível".to_string(),
        ),
    };

    format!(
        r#"Você é um analista técnico de mercado. Analise o mercado usando esta estrutura:

**Comportamento do IBOV**
- Variação: {variation} | Valor Atual: R$ {current_value}
- Volatilidade: {volatility} (classifique como: baixa se <0.5%, moderada se 0.5-1.5%, alta se >1.5%)
- Relação com WIN$: Tendência {win_trend} | Volume: {win_volume}

**Ações e Setores** (Peso IBOV em destaque)
- Principais impulsoras (variação positiva significativa, >0.1%):
{gainers}
- Principais penalizadoras (variação negativa, <-0.1%):
{losers}

**Contexto Técnico**
- Força do setor {leading_sector} vs fraqueza do setor {lagging_sector}.
- Observações sobre volume: Mencione divergências de volume (ex.: volume acima ou abaixo da média) para ações relevantes.

Use termos técnicos como: rompimento de suporte/resistência, fluxo institucional, divergência de volume.

Exemplo de estilo desejado:
'O IBOV opera em baixa de -0,10%, com volatilidade baixa (0,10%). Nenhuma ação apresenta variação positiva significativa. As principais penalizadoras incluem PETR4 (Energia): -0,4% | Peso: 8,2% | Volume: 5,0M (+29% vs média) e VALE3 (Mineração): -0,2% | Peso: 7,1% | Volume: 1,3M (-20% vs média). O setor Consumo mostra resiliência relativa, enquanto Energia apresenta fraqueza. Observa-se divergência de volume em PETR4, com volume acima da média, indicando maior fluxo institucional.'

Contexto adicional:
- O miniíndice WIN$ replica o IBOV. Ações com maior peso têm mais impacto:
  - PETR4 (8,2%), VALE3 (7,1%), ITUB4 (6,8%)
- Use níveis técnicos de 15 minutos para as observações.
- Mencione volume se disponível ({win_volume}).
- Certifique-se de que a variação do IBOV ({variation}) seja refletida corretamente (positiva ou negativa).
- Evite recomendar ações com variação próxima de 0% como impulsoras.
- Não inclua recomendações de compra ou venda, apenas descreva o comportamento do mercado."#,
        variation = request.variation,
        current_value = request.current_value,
        volatility = request.volatility,
        win_trend = win_trend,
        win_volume = win_volume,
        gainers = gainers,
        losers = losers,
        leading_sector = request.leading_sector,
        lagging_sector = request.lagging_sector,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Trend;

    fn snapshot(ticker: &str, sector: &str, variation_pct: f64) -> StockSnapshot {
        StockSnapshot {
            ticker: ticker.to_string(),
            name: ticker.to_string(),
            sector: sector.to_string(),
            price: "R$ 10,00".to_string(),
            variation: format!("{:+.1}%", variation_pct),
            variation_pct,
            volume: "5,0M (+29% vs média)".to_string(),
            index_weight: 8.2,
            support: "R$ 9,50".to_string(),
            resistance: "R$ 10,50".to_string(),
            rsi: 50.0,
        }
    }

    fn request(stocks: Vec<StockSnapshot>) -> AnalysisRequest {
        AnalysisRequest {
            variation: "-0.10%".to_string(),
            current_value: "134.567,89".to_string(),
            volatility: "0.10%".to_string(),
            top_stocks: stocks,
            leading_sector: "Consumo".to_string(),
            lagging_sector: "Energia".to_string(),
        }
    }

    fn mini_index() -> MiniIndexData {
        MiniIndexData {
            trend: Trend::Baixa,
            vwap: "R$ 31,42".to_string(),
            volume: "1,3M".to_string(),
        }
    }

    #[test]
    fn test_prompt_includes_figures() {
        let prompt = build_market_analysis_prompt(&request(vec![]), Some(&mini_index()));
        assert!(prompt.contains("Variação: -0.10%"));
        assert!(prompt.contains("Valor Atual: R$ 134.567,89"));
        assert!(prompt.contains("Volatilidade: 0.10%"));
        assert!(prompt.contains("Tendência baixa | Volume: 1,3M"));
        assert!(prompt.contains("Força do setor Consumo vs fraqueza do setor Energia"));
    }

    #[test]
    fn test_prompt_splits_gainers_and_losers() {
        let stocks = vec![
            snapshot("PETR4", "Energia", 0.8),
            snapshot("VALE3", "Mineração", -0.4),
            snapshot("ITUB4", "Financeiro", 0.05),
        ];
        let prompt = build_market_analysis_prompt(&request(stocks), Some(&mini_index()));

        let gainers_block = prompt
            .split("Principais impulsoras")
            .nth(1)
            .unwrap()
            .split("Principais penalizadoras")
            .next()
            .unwrap();
        assert!(gainers_block.contains("PETR4 (Energia): +0.8%"));
        // Near-zero variation must not appear as a gainer.
        assert!(!gainers_block.contains("ITUB4"));

        assert!(prompt.contains("VALE3 (Mineração): -0.4%"));
    }

    #[test]
    fn test_prompt_fallback_when_no_movers() {
        let prompt = build_market_analysis_prompt(&request(vec![]), Some(&mini_index()));
        assert!(prompt.contains("Nenhuma ação com variação positiva significativa"));
        assert!(prompt.contains("Nenhuma ação com variação negativa significativa"));
    }

    #[test]
    fn test_prompt_without_mini_index_context() {
        let prompt = build_market_analysis_prompt(&request(vec![]), None);
        assert!(prompt.contains("Tendência sem tendência clara"));
        assert!(prompt.contains("Volume: volume não disponível"));
    }

    #[test]
    fn test_prompt_forbids_recommendations() {
        let prompt = build_market_analysis_prompt(&request(vec![]), Some(&mini_index()));
        assert!(prompt.contains("Não inclua recomendações de compra ou venda"));
    }
}
