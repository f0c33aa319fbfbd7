use core_types::{Asset, CorrelationCell};
use statistics::pearson_correlation;

/// Selects which assets a matrix is built over, and in what order.
///
/// The builder itself is deliberately ignorant of ranking criteria; the
/// dashboard injects "top N by market cap as the listing endpoint returned
/// them", while tests can inject any deterministic ordering.
pub trait RankingPolicy: Send + Sync {
    /// Returns at most `limit` assets, in the order the matrix rows and
    /// columns should appear.
    fn rank<'a>(&self, assets: &'a [Asset], limit: usize) -> Vec<&'a Asset>;
}

/// The default policy: trust the provider's ordering and take the first
/// `limit` assets. Market-listing endpoints already sort by market cap
/// descending, so this yields "top N by market cap".
#[derive(Debug, Default, Clone, Copy)]
pub struct ListingOrder;

impl RankingPolicy for ListingOrder {
    fn rank<'a>(&self, assets: &'a [Asset], limit: usize) -> Vec<&'a Asset> {
        assets.iter().take(limit).collect()
    }
}

/// Builds the pairwise Pearson correlation matrix over a ranked set of assets.
pub struct CorrelationMatrixBuilder {
    policy: Box<dyn RankingPolicy>,
    limit: usize,
}

impl CorrelationMatrixBuilder {
    /// Creates a builder over the top `limit` assets under the given policy.
    pub fn new(policy: Box<dyn RankingPolicy>, limit: usize) -> Self {
        Self { policy, limit }
    }

    /// A builder with the dashboard defaults: first five in listing order.
    pub fn top_five() -> Self {
        Self::new(Box::new(ListingOrder), 5)
    }

    /// Computes the correlation matrix for the ranked subset of `assets`.
    ///
    /// Every ordered pair `(i, j)` including the diagonal is visited with `i`
    /// iterating before `j`, both in ranked order, so the output order is
    /// deterministic. Pairs where either asset has no sampled prices are
    /// omitted entirely; the resulting matrix may therefore have holes, which
    /// consumers must treat as "no data" rather than zero correlation.
    ///
    /// The diagonal is 1.0 for any asset with a non-constant series and 0.0
    /// for a zero-variance one, per the statistics layer's degenerate-input
    /// policy.
    pub fn build(&self, assets: &[Asset]) -> Vec<CorrelationCell> {
        let ranked = self.policy.rank(assets, self.limit);
        let mut cells = Vec::with_capacity(ranked.len() * ranked.len());

        for (i, row) in ranked.iter().enumerate() {
            for (j, col) in ranked.iter().enumerate() {
                if row.recent_prices.is_empty() || col.recent_prices.is_empty() {
                    tracing::debug!(
                        row = %row.id,
                        col = %col.id,
                        "skipping correlation pair without sampled prices"
                    );
                    continue;
                }

                cells.push(CorrelationCell {
                    row: i,
                    col: j,
                    row_symbol: row.symbol.to_uppercase(),
                    col_symbol: col.symbol.to_uppercase(),
                    coefficient: pearson_correlation(&row.recent_prices, &col.recent_prices),
                });
            }
        }

        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(id: &str, prices: Vec<f64>) -> Asset {
        Asset {
            id: id.to_string(),
            symbol: id.to_string(),
            name: id.to_string(),
            recent_prices: prices,
        }
    }

    #[test]
    fn matrix_is_square_symmetric_with_unit_diagonal() {
        let assets = vec![
            asset("btc", vec![100.0, 110.0, 105.0, 120.0]),
            asset("eth", vec![10.0, 12.0, 11.0, 13.0]),
            asset("sol", vec![5.0, 4.0, 6.0, 3.0]),
        ];
        let cells = CorrelationMatrixBuilder::top_five().build(&assets);

        assert_eq!(cells.len(), 9);

        let at = |i: usize, j: usize| -> f64 {
            cells
                .iter()
                .find(|c| c.row == i && c.col == j)
                .expect("cell present")
                .coefficient
        };

        for i in 0..3 {
            assert!((at(i, i) - 1.0).abs() < 1e-12);
            for j in 0..3 {
                assert!((at(i, j) - at(j, i)).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn matrix_iterates_rows_before_columns_deterministically() {
        let assets = vec![
            asset("a", vec![1.0, 2.0, 3.0]),
            asset("b", vec![3.0, 2.0, 1.0]),
        ];
        let cells = CorrelationMatrixBuilder::top_five().build(&assets);

        let order: Vec<(usize, usize)> = cells.iter().map(|c| (c.row, c.col)).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn pairs_with_missing_prices_are_omitted_not_zeroed() {
        let assets = vec![
            asset("a", vec![1.0, 2.0, 3.0]),
            asset("b", Vec::new()),
            asset("c", vec![3.0, 1.0, 2.0]),
        ];
        let cells = CorrelationMatrixBuilder::top_five().build(&assets);

        // Only the four pairs among "a" and "c" survive.
        assert_eq!(cells.len(), 4);
        assert!(cells.iter().all(|c| c.row != 1 && c.col != 1));
    }

    #[test]
    fn limit_caps_the_matrix_to_the_top_n() {
        let assets: Vec<Asset> = (0..8)
            .map(|i| asset(&format!("coin{i}"), vec![1.0, 2.0, i as f64]))
            .collect();
        let cells = CorrelationMatrixBuilder::new(Box::new(ListingOrder), 5).build(&assets);

        assert_eq!(cells.len(), 25);
        assert!(cells.iter().all(|c| c.row < 5 && c.col < 5));
    }

    #[test]
    fn ranking_policy_is_injected() {
        struct Reversed;
        impl RankingPolicy for Reversed {
            fn rank<'a>(&self, assets: &'a [Asset], limit: usize) -> Vec<&'a Asset> {
                assets.iter().rev().take(limit).collect()
            }
        }

        let assets = vec![
            asset("first", vec![1.0, 2.0]),
            asset("last", vec![2.0, 1.0]),
        ];
        let cells = CorrelationMatrixBuilder::new(Box::new(Reversed), 5).build(&assets);

        assert_eq!(cells[0].row_symbol, "LAST");
    }
}
