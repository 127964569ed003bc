use serde::{Deserialize, Serialize};

pub const WEEKS_PER_MONTH: f64 = 4.33;
pub const BIWEEKLY_CYCLES_PER_MONTH: f64 = 2.0;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    #[serde(alias = "weekly", alias = "SEMANAL", alias = "semanal")]
    Weekly,
    #[serde(alias = "biweekly", alias = "QUINCENAL", alias = "quincenal")]
    Biweekly,
    #[serde(alias = "monthly", alias = "MENSUAL", alias = "mensual")]
    Monthly,
}

impl Frequency {
    pub fn monthly_factor(self) -> f64 {
        match self {
            Frequency::Weekly => WEEKS_PER_MONTH,
            Frequency::Biweekly => BIWEEKLY_CYCLES_PER_MONTH,
            Frequency::Monthly => 1.0,
        }
    }
}

pub fn normalize_to_monthly(amount: f64, frequency: Frequency) -> f64 {
    amount * frequency.monthly_factor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, proptest};

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn monthly_is_identity() {
        assert_approx(normalize_to_monthly(1_250.0, Frequency::Monthly), 1_250.0);
    }

    #[test]
    fn biweekly_doubles() {
        assert_approx(normalize_to_monthly(600.0, Frequency::Biweekly), 1_200.0);
    }

    #[test]
    fn weekly_uses_average_weeks_per_month() {
        assert_approx(normalize_to_monthly(100.0, Frequency::Weekly), 433.0);
    }

    #[test]
    fn negative_amounts_scale_linearly() {
        assert_approx(normalize_to_monthly(-50.0, Frequency::Biweekly), -100.0);
    }

    #[test]
    fn zero_is_zero_for_every_frequency() {
        for frequency in [Frequency::Weekly, Frequency::Biweekly, Frequency::Monthly] {
            assert_approx(normalize_to_monthly(0.0, frequency), 0.0);
        }
    }

    #[test]
    fn deserializes_wire_tokens_and_spanish_aliases() {
        let parsed: Vec<Frequency> =
            serde_json::from_str(r#"["WEEKLY", "quincenal", "MENSUAL", "biweekly"]"#)
                .expect("tokens should parse");
        assert_eq!(
            parsed,
            vec![
                Frequency::Weekly,
                Frequency::Biweekly,
                Frequency::Monthly,
                Frequency::Biweekly
            ]
        );
        assert!(serde_json::from_str::<Frequency>(r#""DAILY""#).is_err());
    }

    proptest! {
        #[test]
        fn prop_normalization_matches_factors(cents in 0u64..100_000_000) {
            let amount = cents as f64 / 100.0;
            prop_assert!((normalize_to_monthly(amount, Frequency::Monthly) - amount).abs() <= EPS);
            prop_assert!((normalize_to_monthly(amount, Frequency::Biweekly) - 2.0 * amount).abs() <= 1e-6);
            prop_assert!((normalize_to_monthly(amount, Frequency::Weekly) - 4.33 * amount).abs() <= 1e-6);
        }
    }
}
