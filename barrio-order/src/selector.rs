use barrio_shared::models::records::{Fragility, Priority, Provider};
use std::collections::HashMap;
use std::sync::Arc;

/// The derived order attributes a policy is allowed to look at
#[derive(Debug, Clone, Copy)]
pub struct SelectionInput {
    pub weight_grams: u32,
    pub priority: Priority,
    pub fragility: Fragility,
}

/// A named, swappable rule set choosing a carrier for an order.
///
/// Rules are evaluated top to bottom inside each policy; the first match
/// wins and every rule set is total, so selection itself never fails.
pub trait SelectionPolicy: Send + Sync {
    fn name(&self) -> &'static str;

    fn select(&self, input: &SelectionInput) -> Provider;
}

/// Express fragile orders ride EcoBike, light packages go by moto,
/// everything else by the traditional courier.
pub struct StandardPolicy;

impl SelectionPolicy for StandardPolicy {
    fn name(&self) -> &'static str {
        "standard"
    }

    fn select(&self, input: &SelectionInput) -> Provider {
        if input.priority == Priority::Express && input.fragility.is_fragile() {
            return Provider::EcoBike;
        }
        if input.weight_grams <= 1200 {
            return Provider::MotoYa;
        }
        Provider::PaqueteriaZ
    }
}

/// Lowest-emission carrier that can still take the weight
pub struct EcoFriendlyPolicy;

impl SelectionPolicy for EcoFriendlyPolicy {
    fn name(&self) -> &'static str {
        "eco"
    }

    fn select(&self, input: &SelectionInput) -> Provider {
        if input.weight_grams <= 2000 {
            return Provider::EcoBike;
        }
        if input.weight_grams <= 4000 {
            return Provider::MotoYa;
        }
        Provider::PaqueteriaZ
    }
}

/// Cheapest carrier for the load; EcoBike only where its premium is justified
pub struct CostOptimizedPolicy;

impl SelectionPolicy for CostOptimizedPolicy {
    fn name(&self) -> &'static str {
        "cost"
    }

    fn select(&self, input: &SelectionInput) -> Provider {
        if input.weight_grams > 3000 {
            return Provider::PaqueteriaZ;
        }
        if input.priority == Priority::Express && input.fragility == Fragility::High {
            return Provider::EcoBike;
        }
        Provider::MotoYa
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("unknown selection policy: {0}")]
    UnknownPolicy(String),
}

/// Policy registry keyed by name; read-mostly, shared across order flows
pub struct ProviderSelector {
    policies: HashMap<&'static str, Arc<dyn SelectionPolicy>>,
}

impl ProviderSelector {
    /// Registry preloaded with the built-in policies
    pub fn with_builtin() -> Self {
        let mut selector = Self {
            policies: HashMap::new(),
        };
        selector.register(Arc::new(StandardPolicy));
        selector.register(Arc::new(EcoFriendlyPolicy));
        selector.register(Arc::new(CostOptimizedPolicy));
        selector
    }

    /// Administrative operation, not part of the per-order hot path
    pub fn register(&mut self, policy: Arc<dyn SelectionPolicy>) {
        self.policies.insert(policy.name(), policy);
    }

    pub fn policy_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.policies.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Resolve a policy by name and apply it, emitting the decision event.
    pub fn select(
        &self,
        policy_name: &str,
        input: &SelectionInput,
    ) -> Result<Provider, SelectionError> {
        let key = policy_name.trim().to_ascii_lowercase();
        let policy = self
            .policies
            .get(key.as_str())
            .ok_or_else(|| SelectionError::UnknownPolicy(policy_name.to_string()))?;

        let provider = policy.select(input);
        tracing::info!(
            policy = policy.name(),
            provider = provider.id(),
            weight_grams = input.weight_grams,
            priority = ?input.priority,
            fragility = ?input.fragility,
            "provider selected"
        );
        Ok(provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(weight_grams: u32, priority: Priority, fragility: Fragility) -> SelectionInput {
        SelectionInput {
            weight_grams,
            priority,
            fragility,
        }
    }

    #[test]
    fn standard_light_normal_goes_by_moto() {
        let selector = ProviderSelector::with_builtin();
        let provider = selector
            .select("standard", &input(800, Priority::Normal, Fragility::None))
            .unwrap();
        assert_eq!(provider, Provider::MotoYa);
    }

    #[test]
    fn standard_express_fragile_rides_ecobike() {
        let selector = ProviderSelector::with_builtin();
        let provider = selector
            .select("standard", &input(2400, Priority::Express, Fragility::High))
            .unwrap();
        assert_eq!(provider, Provider::EcoBike);
    }

    #[test]
    fn standard_heavy_goes_by_courier() {
        let selector = ProviderSelector::with_builtin();
        let provider = selector
            .select("standard", &input(9200, Priority::Normal, Fragility::None))
            .unwrap();
        assert_eq!(provider, Provider::PaqueteriaZ);
    }

    #[test]
    fn standard_express_fragile_rule_wins_over_weight() {
        // Rule order is normative: the express+fragile rule is checked first
        let selector = ProviderSelector::with_builtin();
        let provider = selector
            .select("standard", &input(500, Priority::Express, Fragility::Weak))
            .unwrap();
        assert_eq!(provider, Provider::EcoBike);
    }

    #[test]
    fn eco_thresholds() {
        let selector = ProviderSelector::with_builtin();
        let cases = [
            (2000, Provider::EcoBike),
            (2001, Provider::MotoYa),
            (4000, Provider::MotoYa),
            (4001, Provider::PaqueteriaZ),
        ];
        for (weight, expected) in cases {
            let provider = selector
                .select("eco", &input(weight, Priority::Normal, Fragility::None))
                .unwrap();
            assert_eq!(provider, expected, "weight {weight}");
        }
    }

    #[test]
    fn cost_heavy_rule_is_checked_first() {
        let selector = ProviderSelector::with_builtin();
        // Over 3000 g the weight rule wins even for express+high
        let provider = selector
            .select("cost", &input(3500, Priority::Express, Fragility::High))
            .unwrap();
        assert_eq!(provider, Provider::PaqueteriaZ);

        let provider = selector
            .select("cost", &input(900, Priority::Express, Fragility::High))
            .unwrap();
        assert_eq!(provider, Provider::EcoBike);

        let provider = selector
            .select("cost", &input(900, Priority::Express, Fragility::Weak))
            .unwrap();
        assert_eq!(provider, Provider::MotoYa);
    }

    #[test]
    fn selection_is_deterministic() {
        let selector = ProviderSelector::with_builtin();
        let fixed = input(1500, Priority::Express, Fragility::Weak);
        let first = selector.select("standard", &fixed).unwrap();
        for _ in 0..10 {
            assert_eq!(selector.select("standard", &fixed).unwrap(), first);
        }
    }

    #[test]
    fn unknown_policy_fails_closed() {
        let selector = ProviderSelector::with_builtin();
        let err = selector
            .select("turbo", &input(100, Priority::Normal, Fragility::None))
            .unwrap_err();
        assert!(matches!(err, SelectionError::UnknownPolicy(name) if name == "turbo"));
    }

    #[test]
    fn policy_names_are_case_insensitive() {
        let selector = ProviderSelector::with_builtin();
        let provider = selector
            .select(" Standard ", &input(800, Priority::Normal, Fragility::None))
            .unwrap();
        assert_eq!(provider, Provider::MotoYa);
    }
}
