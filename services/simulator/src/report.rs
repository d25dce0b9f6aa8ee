//! Plain-text rendering of simulator results

use crate::session::{CurveView, QuoteView, SwapOutcome};
use amm::{Decimal, LiquidityStats, Pool};
use std::fmt::Write;

const RULE: &str = "----------------------------------------";

pub fn render_pool(pool: &Pool) -> String {
    format!(
        "Pool {}/{}\n  {:<18}{} {}\n  {:<18}{} {}\n  {:<18}{}%\n",
        pool.token_x().symbol(),
        pool.token_y().symbol(),
        "Reserve X",
        pool.reserve_x().round_dp(6).normalize(),
        pool.token_x().symbol(),
        "Reserve Y",
        pool.reserve_y().round_dp(6).normalize(),
        pool.token_y().symbol(),
        "Fee",
        (pool.fee() * Decimal::ONE_HUNDRED).round_dp(2),
    )
}

pub fn render_quote(view: &QuoteView) -> String {
    let quote = &view.quote;
    let mut out = String::new();
    let _ = writeln!(out, "Swap {} -> {}", view.pay_symbol, view.receive_symbol);
    let _ = writeln!(
        out,
        "  {:<18}{} {}",
        "Pay",
        quote.input_amount.normalize(),
        view.pay_symbol
    );
    let _ = writeln!(
        out,
        "  {:<18}{} {}",
        "Receive (est.)",
        quote.output_amount.round_dp(4),
        view.receive_symbol
    );
    let _ = writeln!(
        out,
        "  {:<18}{} {}/{}",
        "Execution price",
        quote.execution_price.round_dp(6),
        view.receive_symbol,
        view.pay_symbol
    );
    let _ = writeln!(
        out,
        "  {:<18}{}%{}",
        "Price impact",
        quote.price_impact.round_dp(2),
        if view.high_impact { "  [HIGH]" } else { "" }
    );
    let _ = writeln!(
        out,
        "  {:<18}{} {}",
        "Fee paid",
        quote.fee_paid.round_dp(6),
        view.pay_symbol
    );
    out
}

pub fn render_swap(outcome: &SwapOutcome, pool: &Pool) -> String {
    let mut out = render_quote(&outcome.executed);
    let _ = writeln!(
        out,
        "  {:<18}{} {} / {} {}",
        "New reserves",
        outcome.reserve_x.round_dp(6).normalize(),
        pool.token_x().symbol(),
        outcome.reserve_y.round_dp(6).normalize(),
        pool.token_y().symbol()
    );
    out
}

pub fn render_stats(stats: &LiquidityStats, pool: &Pool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Liquidity stats");
    let _ = writeln!(out, "  {:<18}${}", "Total value", stats.tvl.round_dp(0));
    let _ = writeln!(
        out,
        "  {:<18}{} {}",
        format!("Price {}", pool.token_x().symbol()),
        stats.price_x.round_dp(2),
        pool.token_y().symbol()
    );
    let _ = writeln!(
        out,
        "  {:<18}{} {}",
        format!("Price {}", pool.token_y().symbol()),
        stats.price_y.round_dp(8).normalize(),
        pool.token_x().symbol()
    );
    let _ = writeln!(
        out,
        "  {:<18}{}%",
        "Impermanent loss",
        stats.impermanent_loss.round_dp(4)
    );
    out
}

pub fn render_curve(curve: &CurveView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "x * y = {}", curve.k.normalize());
    let _ = writeln!(out, "{:>20}  {:>20}", "x", "y");
    let _ = writeln!(out, "{}", RULE);
    for point in &curve.points {
        let marker = if *point == curve.current { "  <" } else { "" };
        let _ = writeln!(
            out,
            "{:>20}  {:>20}{}",
            point.x.round_dp(4),
            point.y.round_dp(4),
            marker
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use amm::SwapDirection;
    use config::SimulatorConfig;

    fn session() -> Session {
        Session::from_config(&SimulatorConfig::default()).unwrap()
    }

    #[test]
    fn test_render_pool() {
        let text = render_pool(session().pool());
        assert!(text.starts_with("Pool ETH/USDC"));
        assert!(text.contains("1000 ETH"));
        assert!(text.contains("2500000 USDC"));
        assert!(text.contains("0.30%"));
    }

    #[test]
    fn test_render_quote_marks_high_impact() {
        let session = session();
        let small = render_quote(&session.quote("10", SwapDirection::XToY).unwrap());
        let large = render_quote(&session.quote("500", SwapDirection::XToY).unwrap());

        assert!(small.contains("Receive (est.)    24678.9509 USDC"));
        assert!(!small.contains("[HIGH]"));
        assert!(large.contains("[HIGH]"));
    }

    #[test]
    fn test_render_stats() {
        let session = session();
        let stats = session.stats().unwrap();
        let text = render_stats(&stats, session.pool());

        assert!(text.contains("Total value       $5000000"));
        assert!(text.contains("Price ETH         2500"));
        assert!(text.contains("Impermanent loss  0"));
    }

    #[test]
    fn test_render_curve_marks_current_point() {
        let curve = session().curve(Some(3)).unwrap();
        let text = render_curve(&curve);

        assert!(text.starts_with("x * y = 2500000000"));
        assert_eq!(text.matches("  <").count(), 1);
    }
}
