use std::collections::{BTreeMap, HashMap};

use super::action::Action;
use super::pii::PiiType;
use crate::errors::{PiiVeilError, Result};

/// Default action per PII category.
///
/// Types absent from the table resolve to [`Action::Keep`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyTable {
    rules: HashMap<PiiType, Action>,
}

impl Default for PolicyTable {
    fn default() -> Self {
        let rules = PiiType::ALL
            .into_iter()
            .map(|pii_type| {
                let action = match pii_type {
                    PiiType::Aadhaar | PiiType::Address => Action::Redact,
                    PiiType::Person => Action::Keep,
                    _ => Action::Mask,
                };
                (pii_type, action)
            })
            .collect();

        Self { rules }
    }
}

impl PolicyTable {
    /// A table with no rules; every lookup yields `Keep`.
    pub fn empty() -> Self {
        Self { rules: HashMap::new() }
    }

    /// Default table with configured overrides applied on top.
    ///
    /// Override keys are wire names (`"AADHAAR"`, `"dl"`, ...).
    ///
    /// # Errors
    /// Returns `PiiVeilError::Config` for an unknown type name.
    pub fn with_overrides(overrides: &BTreeMap<String, Action>) -> Result<Self> {
        let mut table = Self::default();
        for (name, action) in overrides {
            let pii_type: PiiType = name
                .parse()
                .map_err(|e: String| PiiVeilError::Config(format!("policy.rules: {e}")))?;
            table.set(pii_type, *action);
        }
        Ok(table)
    }

    /// Set the action for one type.
    pub fn set(&mut self, pii_type: PiiType, action: Action) {
        self.rules.insert(pii_type, action);
    }

    /// Remove the rule for one type so it falls back to `Keep`.
    pub fn remove(&mut self, pii_type: PiiType) {
        self.rules.remove(&pii_type);
    }

    /// Action for `pii_type`, `Keep` when unknown.
    pub fn lookup(&self, pii_type: PiiType) -> Action {
        self.rules.get(&pii_type).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules() {
        let table = PolicyTable::default();
        assert_eq!(table.lookup(PiiType::Aadhaar), Action::Redact);
        assert_eq!(table.lookup(PiiType::Address), Action::Redact);
        assert_eq!(table.lookup(PiiType::Person), Action::Keep);
        assert_eq!(table.lookup(PiiType::Pan), Action::Mask);
        assert_eq!(table.lookup(PiiType::IpAddress), Action::Mask);
    }

    #[test]
    fn missing_rule_keeps() {
        let mut table = PolicyTable::default();
        table.remove(PiiType::Email);
        assert_eq!(table.lookup(PiiType::Email), Action::Keep);
        assert_eq!(PolicyTable::empty().lookup(PiiType::Aadhaar), Action::Keep);
    }

    #[test]
    fn overrides_apply_by_wire_name() {
        let mut overrides = BTreeMap::new();
        overrides.insert("person".to_string(), Action::Redact);
        overrides.insert("DL".to_string(), Action::Keep);
        let table = PolicyTable::with_overrides(&overrides).unwrap();
        assert_eq!(table.lookup(PiiType::Person), Action::Redact);
        assert_eq!(table.lookup(PiiType::DrivingLicence), Action::Keep);
        assert_eq!(table.lookup(PiiType::Aadhaar), Action::Redact);
    }

    #[test]
    fn unknown_override_is_config_error() {
        let mut overrides = BTreeMap::new();
        overrides.insert("SSN".to_string(), Action::Mask);
        let err = PolicyTable::with_overrides(&overrides).unwrap_err();
        assert!(matches!(err, PiiVeilError::Config(_)));
    }
}
