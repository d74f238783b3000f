use farewatch_store::app_config::ScoringConfig;

const MAX_SCORE: f64 = 10.0;

/// Rates a priced itinerary against the party budget.
#[derive(Debug, Clone)]
pub struct DealScorer {
    config: ScoringConfig,
}

impl DealScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Desirability in `0..=10`: price headroom on a 0-10 scale plus the destination bonus.
    pub fn score(&self, price: f64, budget: u32, destination: &str) -> u8 {
        let price_score = if budget == 0 {
            0.0
        } else {
            let budget = budget as f64;
            ((budget - price) / budget * MAX_SCORE).clamp(0.0, MAX_SCORE)
        };

        let total = (price_score + self.destination_bonus(destination)).round();
        total.clamp(0.0, MAX_SCORE) as u8
    }

    /// Savings strictly above `great_deal_ratio` of the budget.
    pub fn is_great_deal(&self, price: f64, budget: u32) -> bool {
        self.savings(price, budget) > budget as f64 * self.config.great_deal_ratio
    }

    pub fn savings(&self, price: f64, budget: u32) -> f64 {
        budget as f64 - price
    }

    /// Case-insensitive, since config sources may fold key case.
    pub fn destination_bonus(&self, destination: &str) -> f64 {
        if let Some(bonus) = self.config.destination_bonus.get(destination) {
            return *bonus;
        }
        self.config
            .destination_bonus
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(destination))
            .map(|(_, bonus)| *bonus)
            .unwrap_or(0.0)
    }
}

impl Default for DealScorer {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_score_bounds_without_bonus() {
        let scorer = DealScorer::default();
        assert_eq!(scorer.score(1000.0, 1000, ""), 0);
        assert_eq!(scorer.score(0.0, 1000, ""), 10);
        assert_eq!(scorer.score(1500.0, 1000, ""), 0);
    }

    #[test]
    fn test_family_budget_scores() {
        let scorer = DealScorer::default();
        // (2100 - 1020) / 2100 * 10 = 5.14, + 2
        assert_eq!(scorer.score(1020.0, 2100, "Cyprus"), 7);
        assert_eq!(scorer.score(2100.0, 2100, "Cyprus"), 2);
        assert_eq!(scorer.score(0.0, 2100, "Cyprus"), 10);
        assert_eq!(scorer.score(1020.0, 2100, "Morocco"), 5);
    }

    #[test]
    fn test_great_deal_is_strictly_above_ratio() {
        let scorer = DealScorer::default();
        assert!(scorer.is_great_deal(1020.0, 2100));
        assert!(!scorer.is_great_deal(1890.0, 2100));
        assert!(!scorer.is_great_deal(2100.0, 2100));
        assert_eq!(scorer.savings(1020.0, 2100), 1080.0);
    }

    #[test]
    fn test_bonus_table_is_injectable() {
        let scorer = DealScorer::new(ScoringConfig {
            great_deal_ratio: 0.5,
            destination_bonus: HashMap::from([("malta".to_string(), 3.0)]),
        });

        assert_eq!(scorer.destination_bonus("Malta"), 3.0);
        assert_eq!(scorer.destination_bonus("Cyprus"), 0.0);
        assert_eq!(scorer.score(1000.0, 1000, "Malta"), 3);
        // 900 saved is not above half of 2100
        assert!(!scorer.is_great_deal(1200.0, 2100));
    }
}
