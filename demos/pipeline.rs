//! End-to-end PCA run on a synthetic monthly macro/market panel.
//!
//! Generates 15 years of correlated indicator series, standardizes them,
//! fits the decomposition, and prints the numeric tables a reporting layer
//! would consume. Run with `RUST_LOG=info` to see the engine's logging.

use ndarray::Array2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use macro_pca::{
    communality_table, fit, interpret_components, kaiser_count, variance_table,
    variance_threshold_count, StandardizedPanel, DEFAULT_TOP_N, DEFAULT_VARIANCE_THRESHOLD,
};

const N_MONTHS: usize = 180;

/// Monthly indicator panel with a common business-cycle driver, a market
/// driver partially tied to the cycle, and idiosyncratic noise.
fn synthetic_panel(seed: u64) -> (Array2<f64>, Vec<String>) {
    let variables: Vec<String> = [
        "gdp_growth",
        "inflation",
        "policy_rate",
        "fx_rate",
        "unemployment",
        "trade_balance",
        "fx_reserves",
        "industrial_production",
        "equity_index",
        "equity_volume",
        "market_cap",
        "dividend_yield",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 1.0).unwrap();
    let mut raw = Array2::zeros((N_MONTHS, variables.len()));

    for month in 0..N_MONTHS {
        let t = month as f64 / N_MONTHS as f64;
        let cycle = (t * 15.0 * std::f64::consts::TAU).sin();
        let business = t + 0.3 * cycle + 0.2 * noise.sample(&mut rng);
        let market = 0.6 * business + 0.4 * noise.sample(&mut rng);

        // (business weight, market weight) per variable; negative weights
        // are the countercyclical series.
        let weights: [(f64, f64); 12] = [
            (0.9, 0.0),   // gdp_growth
            (0.5, 0.2),   // inflation
            (-0.6, 0.1),  // policy_rate
            (0.3, -0.2),  // fx_rate
            (-0.8, 0.0),  // unemployment
            (0.4, 0.1),   // trade_balance
            (0.7, 0.2),   // fx_reserves
            (0.8, 0.1),   // industrial_production
            (0.2, 0.9),   // equity_index
            (0.0, 0.7),   // equity_volume
            (0.1, 0.9),   // market_cap
            (-0.1, -0.6), // dividend_yield
        ];
        for (j, (b, m)) in weights.iter().enumerate() {
            raw[[month, j]] = b * business + m * market + 0.3 * noise.sample(&mut rng);
        }
    }
    (raw, variables)
}

fn main() -> macro_pca::Result<()> {
    env_logger::init();

    let (raw, variables) = synthetic_panel(42);
    let panel = StandardizedPanel::from_raw(raw.view(), variables)?;
    println!(
        "panel: {} observations x {} variables",
        panel.n_observations(),
        panel.n_variables()
    );

    let dec = fit(&panel, None)?;

    println!("\ncomponent  eigenvalue  variance%  cumulative%");
    for row in variance_table(&dec) {
        println!(
            "PC{:<8} {:>10.4} {:>10.2} {:>12.2}",
            row.component + 1,
            row.eigenvalue,
            row.variance_pct,
            row.cumulative_pct
        );
    }

    let kaiser = kaiser_count(dec.eigenvalues());
    let by_threshold = variance_threshold_count(dec.eigenvalues(), DEFAULT_VARIANCE_THRESHOLD)?;
    println!("\nKaiser rule retains {} components (lambda > 1)", kaiser);
    println!(
        "{}% variance threshold retains {} components",
        DEFAULT_VARIANCE_THRESHOLD * 100.0,
        by_threshold
    );

    println!("\nvariable  communality (retained = {})", by_threshold);
    for row in communality_table(&dec, Some(by_threshold))? {
        println!("{:<24} {:>8.4}", row.variable, row.communality);
    }

    println!("\ndominant variables per retained component:");
    for interp in interpret_components(&dec, DEFAULT_TOP_N, by_threshold)? {
        println!(
            "PC{} ({:.1}% of variance):",
            interp.component + 1,
            interp.variance_pct
        );
        for (name, loading) in &interp.dominant {
            println!("  {} {:<24} {:+.3}", if *loading >= 0.0 { "+" } else { "-" }, name, loading);
        }
    }

    let scores = dec.transform(panel.matrix())?;
    println!(
        "\nscores: {} observations x {} components",
        scores.nrows(),
        scores.ncols()
    );

    Ok(())
}
