use crate::core::error::ConverterError;
use crate::core::snapshot::RateSnapshot;
use tracing::debug;

/// Holds the last accepted rate snapshot.
///
/// Starts empty and is replaced wholesale on every accepted update.
#[derive(Debug, Default)]
pub struct RateState {
    current: RateSnapshot,
}

impl RateState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> &RateSnapshot {
        &self.current
    }

    /// Replaces the snapshot, or leaves it untouched when the candidate has no rate table.
    pub fn set(&mut self, candidate: RateSnapshot) -> Result<(), ConverterError> {
        if candidate.conversion_rates.is_none() {
            debug!(base = %candidate.base_code, "Rejected snapshot without conversion_rates");
            return Err(ConverterError::Validation);
        }
        debug!(
            base = %candidate.base_code,
            rates = candidate.rates().map_or(0, |r| r.len()),
            "Rate state replaced"
        );
        self.current = candidate;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::snapshot::RateTable;

    fn snapshot(base: &str, rates: &[(&str, &str)]) -> RateSnapshot {
        RateSnapshot {
            result: "success".to_string(),
            base_code: base.to_string(),
            conversion_rates: Some(rates.iter().copied().collect()),
            ..Default::default()
        }
    }

    #[test]
    fn test_starts_empty() {
        let state = RateState::new();
        assert_eq!(state.get(), &RateSnapshot::default());
        assert!(state.get().rates().is_none());
    }

    #[test]
    fn test_set_then_get_returns_payload() {
        let mut state = RateState::new();
        let usd = snapshot("USD", &[("USD", "1"), ("BRL", "5.00")]);
        state.set(usd.clone()).unwrap();
        assert_eq!(state.get(), &usd);

        let eur = snapshot("EUR", &[("EUR", "1"), ("USD", "1.10")]);
        state.set(eur.clone()).unwrap();
        assert_eq!(state.get(), &eur);
    }

    #[test]
    fn test_rejects_snapshot_without_rates() {
        let mut state = RateState::new();
        let usd = snapshot("USD", &[("USD", "1")]);
        state.set(usd.clone()).unwrap();

        let candidate = RateSnapshot {
            result: "success".to_string(),
            base_code: "EUR".to_string(),
            ..Default::default()
        };
        assert_eq!(state.set(candidate), Err(ConverterError::Validation));
        assert_eq!(state.get(), &usd);
    }

    #[test]
    fn test_accepts_empty_rate_table() {
        let mut state = RateState::new();
        let candidate = RateSnapshot {
            conversion_rates: Some(RateTable::new()),
            ..Default::default()
        };
        assert!(state.set(candidate).is_ok());
    }
}
