//! Resource ledger - colony-wide typed resource and money accounting

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Type of resource handled by the colony
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    Iron,
    Water,
    Silicon,
    Oxygen,
    Concrete,
    Steel,
    Food,
}

impl ResourceType {
    pub fn display_name(&self) -> &'static str {
        match self {
            ResourceType::Iron => "Iron",
            ResourceType::Water => "Water",
            ResourceType::Silicon => "Silicon",
            ResourceType::Oxygen => "Oxygen",
            ResourceType::Concrete => "Concrete",
            ResourceType::Steel => "Steel",
            ResourceType::Food => "Food",
        }
    }
}

/// Colony-wide ledger of typed resource quantities plus money
///
/// Quantities never go negative: withdrawals are partial and spending
/// fails as a no-op when funds are insufficient.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceLedger {
    resources: AHashMap<ResourceType, u32>,
    money: u32,
}

impl ResourceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_money(money: u32) -> Self {
        Self {
            resources: AHashMap::new(),
            money,
        }
    }

    /// Current amount of a resource
    pub fn amount_of(&self, resource: ResourceType) -> u32 {
        self.resources.get(&resource).copied().unwrap_or(0)
    }

    /// Add resources (always succeeds)
    pub fn add(&mut self, resource: ResourceType, amount: u32) {
        *self.resources.entry(resource).or_insert(0) += amount;
    }

    /// Withdraw up to `amount`, returns amount actually taken
    pub fn take(&mut self, resource: ResourceType, amount: u32) -> u32 {
        if let Some(entry) = self.resources.get_mut(&resource) {
            let taken = amount.min(*entry);
            *entry -= taken;
            taken
        } else {
            0
        }
    }

    /// Check whether the colony holds at least `amount` of every requirement
    pub fn has_all(&self, requirements: &[(ResourceType, u32)]) -> bool {
        requirements
            .iter()
            .all(|(res, amount)| self.amount_of(*res) >= *amount)
    }

    pub fn money(&self) -> u32 {
        self.money
    }

    pub fn has_money(&self, amount: u32) -> bool {
        self.money >= amount
    }

    pub fn add_money(&mut self, amount: u32) {
        self.money += amount;
    }

    /// Deduct money, returns false (leaving the ledger unchanged) when
    /// funds are insufficient
    pub fn spend_money(&mut self, amount: u32) -> bool {
        if self.money < amount {
            return false;
        }
        self.money -= amount;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_add_take() {
        let mut ledger = ResourceLedger::new();
        ledger.add(ResourceType::Iron, 30);
        assert_eq!(ledger.amount_of(ResourceType::Iron), 30);

        assert_eq!(ledger.take(ResourceType::Iron, 20), 20);
        assert_eq!(ledger.amount_of(ResourceType::Iron), 10);

        // Withdrawal is capped at the stored amount
        assert_eq!(ledger.take(ResourceType::Iron, 50), 10);
        assert_eq!(ledger.amount_of(ResourceType::Iron), 0);

        // Taking from an untracked type is a no-op
        assert_eq!(ledger.take(ResourceType::Water, 5), 0);
    }

    #[test]
    fn test_ledger_has_all() {
        let mut ledger = ResourceLedger::new();
        ledger.add(ResourceType::Iron, 50);
        ledger.add(ResourceType::Water, 5);

        assert!(ledger.has_all(&[(ResourceType::Iron, 20), (ResourceType::Water, 5)]));
        assert!(!ledger.has_all(&[(ResourceType::Iron, 20), (ResourceType::Silicon, 1)]));
    }

    #[test]
    fn test_money_spend_no_partial_application() {
        let mut ledger = ResourceLedger::with_money(100);
        assert!(ledger.has_money(100));

        assert!(!ledger.spend_money(150));
        // Failed spend leaves the balance untouched
        assert_eq!(ledger.money(), 100);

        assert!(ledger.spend_money(60));
        assert_eq!(ledger.money(), 40);
    }
}
