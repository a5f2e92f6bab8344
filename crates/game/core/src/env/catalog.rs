use std::collections::BTreeMap;

use crate::error::{ErrorSeverity, GameError};
use crate::state::{UnitTypeId, UpgradeId};
use crate::upgrade::{Applicability, Upgrade};

use super::UnitType;

/// Errors raised while building or linking a [`Catalog`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CatalogError {
    #[error("{0} not found")]
    UpgradeNotFound(UpgradeId),

    #[error("{0} not found")]
    UnitTypeNotFound(UnitTypeId),

    #[error("duplicate catalog entry {0}")]
    Duplicate(String),

    /// Percentages at or below -100 cannot be reversed.
    #[error("{upgrade} uses an irreversible percentage ({percent}%)")]
    InvalidPercent { upgrade: UpgradeId, percent: i32 },
}

impl GameError for CatalogError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            CatalogError::UpgradeNotFound(_) => "CATALOG_UPGRADE_NOT_FOUND",
            CatalogError::UnitTypeNotFound(_) => "CATALOG_UNIT_TYPE_NOT_FOUND",
            CatalogError::Duplicate(_) => "CATALOG_DUPLICATE",
            CatalogError::InvalidPercent { .. } => "CATALOG_INVALID_PERCENT",
        }
    }
}

/// Immutable unit type and upgrade definitions shared by every peer.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    unit_types: BTreeMap<UnitTypeId, UnitType>,
    upgrades: BTreeMap<UpgradeId, Upgrade>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_unit_type(&mut self, unit_type: UnitType) -> Result<(), CatalogError> {
        if self.unit_types.contains_key(&unit_type.id) {
            return Err(CatalogError::Duplicate(unit_type.id.to_string()));
        }
        self.unit_types.insert(unit_type.id, unit_type);
        Ok(())
    }

    pub fn add_upgrade(&mut self, upgrade: Upgrade) -> Result<(), CatalogError> {
        if self.upgrades.contains_key(&upgrade.id) {
            return Err(CatalogError::Duplicate(upgrade.id.to_string()));
        }
        self.upgrades.insert(upgrade.id, upgrade);
        Ok(())
    }

    pub fn unit_type(&self, id: UnitTypeId) -> Result<&UnitType, CatalogError> {
        self.unit_types
            .get(&id)
            .ok_or(CatalogError::UnitTypeNotFound(id))
    }

    pub fn upgrade(&self, id: UpgradeId) -> Result<&Upgrade, CatalogError> {
        self.upgrades.get(&id).ok_or(CatalogError::UpgradeNotFound(id))
    }

    pub fn unit_types(&self) -> impl Iterator<Item = &UnitType> {
        self.unit_types.values()
    }

    pub fn upgrades(&self) -> impl Iterator<Item = &Upgrade> {
        self.upgrades.values()
    }

    /// Checks every cross reference once, before the session starts.
    ///
    /// Runtime lookups can then treat a miss as a caller error.
    pub fn link(&self) -> Result<(), CatalogError> {
        for upgrade in self.upgrades.values() {
            for modifier in &upgrade.modifiers {
                for removed in &modifier.removes {
                    self.upgrade(*removed)?;
                }
                if let Applicability::UnitTypes(types) = &modifier.applies_to {
                    for unit_type in types {
                        self.unit_type(*unit_type)?;
                    }
                }
                if let Some(target) = modifier.convert_to {
                    self.unit_type(target)?;
                }
                if let Some(bad) = modifier.attributes.iter().find(|m| m.percent <= -100) {
                    return Err(CatalogError::InvalidPercent {
                        upgrade: upgrade.id,
                        percent: bad.percent,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::AttributeKind;
    use crate::upgrade::{AttributeModifier, UpgradeModifier};

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog
            .add_unit_type(UnitType::builder(UnitTypeId(1), "footman").build())
            .unwrap();
        catalog
    }

    #[test]
    fn link_reports_missing_removed_upgrade() {
        let mut catalog = catalog();
        catalog
            .add_upgrade(
                Upgrade::new(UpgradeId(1), "steel")
                    .modifier(UpgradeModifier::default().removes(UpgradeId(9))),
            )
            .unwrap();
        assert_eq!(catalog.link(), Err(CatalogError::UpgradeNotFound(UpgradeId(9))));
    }

    #[test]
    fn link_reports_missing_unit_types() {
        let mut catalog = catalog();
        catalog
            .add_upgrade(Upgrade::new(UpgradeId(1), "promote").modifier(
                UpgradeModifier::new(Applicability::only([UnitTypeId(1)]))
                    .convert_to(UnitTypeId(2)),
            ))
            .unwrap();
        assert_eq!(
            catalog.link(),
            Err(CatalogError::UnitTypeNotFound(UnitTypeId(2)))
        );
    }

    #[test]
    fn link_rejects_irreversible_percentages() {
        let mut catalog = catalog();
        catalog
            .add_upgrade(Upgrade::new(UpgradeId(1), "curse").modifier(
                UpgradeModifier::default()
                    .attribute(AttributeModifier::percent(AttributeKind::Armor, -100)),
            ))
            .unwrap();
        assert!(matches!(
            catalog.link(),
            Err(CatalogError::InvalidPercent { percent: -100, .. })
        ));
    }

    #[test]
    fn duplicates_are_rejected() {
        let mut catalog = catalog();
        let err = catalog
            .add_unit_type(UnitType::builder(UnitTypeId(1), "again").build())
            .unwrap_err();
        assert_eq!(err.error_code(), "CATALOG_DUPLICATE");
    }
}
