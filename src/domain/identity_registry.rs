//! Table identity mappings: QR token → table and PIN → table.
//!
//! [`IdentityRegistry`] keeps both maps in one value so that every
//! mutation (including bulk provisioning) replaces them together. Each map
//! is injective: no two tokens and no two PINs point at the same table.
//! The PIN map follows the token map, so every provisioned table has
//! exactly one token and one PIN.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use rand::Rng;
use serde::Serialize;
use utoipa::ToSchema;

use super::credentials::{generate_pin, generate_token};
use crate::error::MenuError;

/// Largest table count accepted by [`IdentityRegistry::provision`].
pub const MAX_TABLES: u32 = 100;

/// The credentials of one provisioned table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TableIdentity {
    /// Opaque token embedded in the table's QR code.
    pub token: String,
    /// Human-enterable fallback credential.
    pub pin: String,
    /// Canonical table number.
    pub table_number: u32,
}

/// Token and PIN mappings for every provisioned table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityRegistry {
    tokens: BTreeMap<String, u32>,
    pins: BTreeMap<String, u32>,
}

impl IdentityRegistry {
    /// Creates a registry with no tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a registry from persisted maps without validation.
    ///
    /// Call [`Self::reconcile`] afterwards to restore the PIN invariant.
    #[must_use]
    pub fn from_maps(tokens: BTreeMap<String, u32>, pins: BTreeMap<String, u32>) -> Self {
        Self { tokens, pins }
    }

    /// Token → table number map.
    #[must_use]
    pub fn tokens(&self) -> &BTreeMap<String, u32> {
        &self.tokens
    }

    /// PIN → table number map.
    #[must_use]
    pub fn pins(&self) -> &BTreeMap<String, u32> {
        &self.pins
    }

    /// Returns the number of provisioned tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` if no table is provisioned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Aligns the PIN map with the token map.
    ///
    /// Drops PINs that point at unknown tables or duplicate another PIN's
    /// table, then issues PINs to tables that have none. Returns `true` if
    /// anything changed.
    pub fn reconcile<R: Rng>(&mut self, rng: &mut R) -> bool {
        let tables: BTreeSet<u32> = self.tokens.values().copied().collect();
        let mut seen = BTreeSet::new();
        let before = self.pins.len();
        self.pins
            .retain(|_, table| tables.contains(table) && seen.insert(*table));
        let mut changed = self.pins.len() != before;

        for table in tables.difference(&seen) {
            let taken: BTreeSet<String> = self.pins.keys().cloned().collect();
            let pin = generate_pin(rng, *table, &taken);
            self.pins.insert(pin, *table);
            changed = true;
        }
        changed
    }

    /// Resolves a scanned QR token to its table number.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::TokenNotFound`] if the token is not mapped.
    pub fn resolve_token(&self, token: &str) -> Result<u32, MenuError> {
        self.tokens
            .get(token)
            .copied()
            .ok_or_else(|| MenuError::TokenNotFound(token.to_string()))
    }

    /// Resolves a typed PIN to its table number.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::PinNotFound`] if the PIN is not mapped.
    pub fn resolve_pin(&self, pin: &str) -> Result<u32, MenuError> {
        self.pins
            .get(pin)
            .copied()
            .ok_or_else(|| MenuError::PinNotFound(pin.to_string()))
    }

    /// Returns the token owned by `table_number`.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::TableNotFound`] if no token maps to the table.
    pub fn token_for_table(&self, table_number: u32) -> Result<&str, MenuError> {
        self.tokens
            .iter()
            .find(|(_, t)| **t == table_number)
            .map(|(token, _)| token.as_str())
            .ok_or(MenuError::TableNotFound(table_number))
    }

    /// Returns the PIN owned by `table_number`, if any.
    #[must_use]
    pub fn pin_for_table(&self, table_number: u32) -> Option<&str> {
        self.pins
            .iter()
            .find(|(_, t)| **t == table_number)
            .map(|(pin, _)| pin.as_str())
    }

    /// Returns the identity of a mapped token.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::TokenNotFound`] if the token is not mapped.
    pub fn identity(&self, token: &str) -> Result<TableIdentity, MenuError> {
        let table_number = self.resolve_token(token)?;
        Ok(TableIdentity {
            token: token.to_string(),
            pin: self.pin_for_table(table_number).unwrap_or_default().to_string(),
            table_number,
        })
    }

    /// Returns every table identity ordered by table number.
    #[must_use]
    pub fn list(&self) -> Vec<TableIdentity> {
        let pins_by_table: BTreeMap<u32, &str> = self
            .pins
            .iter()
            .map(|(pin, table)| (*table, pin.as_str()))
            .collect();
        let mut tables: Vec<TableIdentity> = self
            .tokens
            .iter()
            .map(|(token, table)| TableIdentity {
                token: token.clone(),
                pin: pins_by_table.get(table).copied().unwrap_or_default().to_string(),
                table_number: *table,
            })
            .collect();
        tables.sort_by_key(|t| t.table_number);
        tables
    }

    /// Replaces every mapping with fresh credentials for tables
    /// `1..=total_tables`.
    ///
    /// Tokens and PINs are unique within the pass. On error the registry
    /// is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::InvalidArgument`] if `total_tables` is outside
    /// `1..=100`.
    pub fn provision<R: Rng>(
        &mut self,
        total_tables: u32,
        rng: &mut R,
    ) -> Result<Vec<TableIdentity>, MenuError> {
        if total_tables < 1 {
            return Err(MenuError::InvalidArgument(
                "total tables must be at least 1".to_string(),
            ));
        }
        if total_tables > MAX_TABLES {
            return Err(MenuError::InvalidArgument(format!(
                "total tables cannot exceed {MAX_TABLES}"
            )));
        }

        let mut tokens = BTreeMap::new();
        let mut pins = BTreeMap::new();
        let mut issued_tokens = BTreeSet::new();
        let mut issued_pins = BTreeSet::new();
        for table in 1..=total_tables {
            let token = generate_token(table, &issued_tokens);
            let pin = generate_pin(rng, table, &issued_pins);
            issued_tokens.insert(token.clone());
            issued_pins.insert(pin.clone());
            tokens.insert(token, table);
            pins.insert(pin, table);
        }

        self.tokens = tokens;
        self.pins = pins;
        Ok(self.list())
    }

    /// Maps a new token to `table_number` and issues the table a PIN.
    ///
    /// # Errors
    ///
    /// - [`MenuError::InvalidArgument`] if `table_number` is zero.
    /// - [`MenuError::Conflict`] if the token is already mapped or the
    ///   table already has a token.
    pub fn insert<R: Rng>(
        &mut self,
        token: &str,
        table_number: u32,
        rng: &mut R,
    ) -> Result<TableIdentity, MenuError> {
        ensure_table_number(table_number)?;
        if let Some(existing) = self.tokens.get(token) {
            return Err(MenuError::Conflict(format!(
                "token '{token}' already exists for table {existing}"
            )));
        }
        if let Ok(owner) = self.token_for_table(table_number) {
            return Err(MenuError::Conflict(format!(
                "table number {table_number} already exists with token '{owner}'"
            )));
        }

        // Drop any stale PIN for the table before issuing a fresh one.
        self.pins.retain(|_, t| *t != table_number);
        let taken: BTreeSet<String> = self.pins.keys().cloned().collect();
        let pin = generate_pin(rng, table_number, &taken);
        self.tokens.insert(token.to_string(), table_number);
        self.pins.insert(pin.clone(), table_number);

        Ok(TableIdentity {
            token: token.to_string(),
            pin,
            table_number,
        })
    }

    /// Moves `token` (and its PIN) to `new_table_number`.
    ///
    /// Returns the previous table number and the updated identity.
    ///
    /// # Errors
    ///
    /// - [`MenuError::InvalidArgument`] if `new_table_number` is zero.
    /// - [`MenuError::TokenNotFound`] if the token is not mapped.
    /// - [`MenuError::Conflict`] if another token owns `new_table_number`.
    pub fn update_table_number(
        &mut self,
        token: &str,
        new_table_number: u32,
    ) -> Result<(u32, TableIdentity), MenuError> {
        ensure_table_number(new_table_number)?;
        let old_table_number = self.resolve_token(token)?;
        if let Some((owner, _)) = self
            .tokens
            .iter()
            .find(|(t, n)| **n == new_table_number && t.as_str() != token)
        {
            return Err(MenuError::Conflict(format!(
                "table number {new_table_number} already exists with token '{owner}'"
            )));
        }

        self.tokens.insert(token.to_string(), new_table_number);
        for table in self.pins.values_mut() {
            if *table == old_table_number {
                *table = new_table_number;
            }
        }
        Ok((old_table_number, self.identity(token)?))
    }

    /// Removes `token` and its table's PIN, returning the table number.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::TokenNotFound`] if the token is not mapped.
    pub fn remove(&mut self, token: &str) -> Result<u32, MenuError> {
        let table_number = self
            .tokens
            .remove(token)
            .ok_or_else(|| MenuError::TokenNotFound(token.to_string()))?;
        self.pins.retain(|_, t| *t != table_number);
        Ok(table_number)
    }

    /// Replaces every mapping with `mapping` and issues fresh PINs.
    ///
    /// On error the registry is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::InvalidArgument`] if a table number repeats
    /// across tokens or is zero.
    pub fn replace_all<R: Rng>(
        &mut self,
        mapping: BTreeMap<String, u32>,
        rng: &mut R,
    ) -> Result<(), MenuError> {
        let mut seen = HashSet::with_capacity(mapping.len());
        for table in mapping.values() {
            ensure_table_number(*table)?;
            if !seen.insert(*table) {
                return Err(MenuError::InvalidArgument(
                    "duplicate table numbers found; each table number must be unique".to_string(),
                ));
            }
        }

        let mut pins = BTreeMap::new();
        let mut issued = BTreeSet::new();
        let mut tables: Vec<u32> = mapping.values().copied().collect();
        tables.sort_unstable();
        for table in tables {
            let pin = generate_pin(rng, table, &issued);
            issued.insert(pin.clone());
            pins.insert(pin, table);
        }

        self.tokens = mapping;
        self.pins = pins;
        Ok(())
    }
}

/// Rejects the reserved table number zero.
fn ensure_table_number(table_number: u32) -> Result<(), MenuError> {
    if table_number == 0 {
        return Err(MenuError::InvalidArgument(
            "table number must be positive".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(2024)
    }

    fn provisioned(n: u32) -> IdentityRegistry {
        let mut registry = IdentityRegistry::new();
        let Ok(_) = registry.provision(n, &mut rng()) else {
            panic!("provisioning {n} tables should succeed");
        };
        registry
    }

    #[test]
    fn provision_is_injective_onto_table_range() {
        for n in [1, 2, 17, 100] {
            let registry = provisioned(n);
            let token_tables: BTreeSet<u32> = registry.tokens().values().copied().collect();
            let pin_tables: BTreeSet<u32> = registry.pins().values().copied().collect();
            let expected: BTreeSet<u32> = (1..=n).collect();
            assert_eq!(registry.tokens().len(), n as usize);
            assert_eq!(registry.pins().len(), n as usize);
            assert_eq!(token_tables, expected);
            assert_eq!(pin_tables, expected);
        }
    }

    #[test]
    fn provision_lists_in_table_order() {
        let registry = provisioned(12);
        let numbers: Vec<u32> = registry.list().iter().map(|t| t.table_number).collect();
        assert_eq!(numbers, (1..=12).collect::<Vec<_>>());
        assert!(registry.list().iter().all(|t| t.pin.len() == 4));
    }

    #[test]
    fn provision_out_of_range_leaves_mappings() {
        let mut registry = provisioned(3);
        let before = registry.clone();
        for n in [0, 101] {
            let result = registry.provision(n, &mut rng());
            assert!(matches!(result, Err(MenuError::InvalidArgument(_))));
            assert_eq!(registry, before);
        }
    }

    #[test]
    fn provision_replaces_previous_tables() {
        let mut registry = provisioned(5);
        let old_tokens: BTreeSet<String> = registry.tokens().keys().cloned().collect();
        let Ok(tables) = registry.provision(2, &mut rng()) else {
            panic!("re-provisioning should succeed");
        };
        assert_eq!(tables.len(), 2);
        assert_eq!(registry.len(), 2);
        assert!(registry.tokens().keys().all(|t| !old_tokens.contains(t)));
    }

    #[test]
    fn insert_round_trips_through_resolution() {
        let mut registry = IdentityRegistry::new();
        let Ok(identity) = registry.insert("tok-a", 9, &mut rng()) else {
            panic!("insert should succeed");
        };
        assert!(matches!(registry.resolve_token("tok-a"), Ok(9)));
        assert!(matches!(registry.resolve_pin(&identity.pin), Ok(9)));
    }

    #[test]
    fn insert_duplicate_token_conflicts_without_mutation() {
        let mut registry = IdentityRegistry::new();
        let _ = registry.insert("tok-a", 1, &mut rng());
        let before = registry.clone();
        let result = registry.insert("tok-a", 2, &mut rng());
        assert!(matches!(result, Err(MenuError::Conflict(_))));
        assert_eq!(registry, before);
    }

    #[test]
    fn insert_duplicate_table_conflicts() {
        let mut registry = IdentityRegistry::new();
        let _ = registry.insert("tok-a", 1, &mut rng());
        let result = registry.insert("tok-b", 1, &mut rng());
        assert!(matches!(result, Err(MenuError::Conflict(_))));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn insert_rejects_table_zero() {
        let mut registry = IdentityRegistry::new();
        let result = registry.insert("tok-a", 0, &mut rng());
        assert!(matches!(result, Err(MenuError::InvalidArgument(_))));
    }

    #[test]
    fn update_moves_token_and_pin() {
        let mut registry = IdentityRegistry::new();
        let Ok(identity) = registry.insert("tok-a", 1, &mut rng()) else {
            panic!("insert should succeed");
        };
        let Ok((old, updated)) = registry.update_table_number("tok-a", 4) else {
            panic!("update should succeed");
        };
        assert_eq!(old, 1);
        assert_eq!(updated.table_number, 4);
        assert_eq!(updated.pin, identity.pin);
        assert!(matches!(registry.resolve_pin(&identity.pin), Ok(4)));
    }

    #[test]
    fn update_to_own_number_is_allowed() {
        let mut registry = IdentityRegistry::new();
        let _ = registry.insert("tok-a", 1, &mut rng());
        assert!(registry.update_table_number("tok-a", 1).is_ok());
    }

    #[test]
    fn update_unknown_token_not_found() {
        let mut registry = IdentityRegistry::new();
        let result = registry.update_table_number("missing", 2);
        assert!(matches!(result, Err(MenuError::TokenNotFound(_))));
    }

    #[test]
    fn update_onto_other_table_conflicts() {
        let mut registry = IdentityRegistry::new();
        let _ = registry.insert("tok-a", 1, &mut rng());
        let _ = registry.insert("tok-b", 2, &mut rng());
        let result = registry.update_table_number("tok-a", 2);
        assert!(matches!(result, Err(MenuError::Conflict(_))));
        assert!(matches!(registry.resolve_token("tok-a"), Ok(1)));
    }

    #[test]
    fn remove_drops_token_and_pin() {
        let mut registry = IdentityRegistry::new();
        let Ok(identity) = registry.insert("tok-a", 3, &mut rng()) else {
            panic!("insert should succeed");
        };
        assert!(matches!(registry.remove("tok-a"), Ok(3)));
        assert!(registry.resolve_token("tok-a").is_err());
        assert!(registry.resolve_pin(&identity.pin).is_err());
        assert!(matches!(
            registry.remove("tok-a"),
            Err(MenuError::TokenNotFound(_))
        ));
    }

    #[test]
    fn replace_all_rejects_duplicate_tables() {
        let mut registry = provisioned(2);
        let before = registry.clone();
        let mapping = BTreeMap::from([("a".to_string(), 1), ("b".to_string(), 1)]);
        let result = registry.replace_all(mapping, &mut rng());
        assert!(matches!(result, Err(MenuError::InvalidArgument(_))));
        assert_eq!(registry, before);
    }

    #[test]
    fn replace_all_issues_pins_for_every_table() {
        let mut registry = provisioned(5);
        let mapping = BTreeMap::from([("a".to_string(), 10), ("b".to_string(), 20)]);
        let Ok(()) = registry.replace_all(mapping, &mut rng()) else {
            panic!("replace should succeed");
        };
        assert_eq!(registry.len(), 2);
        let pin_tables: BTreeSet<u32> = registry.pins().values().copied().collect();
        assert_eq!(pin_tables, BTreeSet::from([10, 20]));
    }

    #[test]
    fn reconcile_fills_missing_and_drops_orphans() {
        let tokens = BTreeMap::from([("a".to_string(), 1), ("b".to_string(), 2)]);
        let pins = BTreeMap::from([("1111".to_string(), 1), ("9999".to_string(), 7)]);
        let mut registry = IdentityRegistry::from_maps(tokens, pins);
        assert!(registry.reconcile(&mut rng()));
        assert!(matches!(registry.resolve_pin("1111"), Ok(1)));
        assert!(registry.resolve_pin("9999").is_err());
        assert!(registry.pin_for_table(2).is_some());
        assert!(!registry.reconcile(&mut rng()));
    }

    #[test]
    fn token_for_table_finds_owner() {
        let mut registry = IdentityRegistry::new();
        let _ = registry.insert("tok-a", 6, &mut rng());
        assert!(matches!(registry.token_for_table(6), Ok("tok-a")));
        assert!(matches!(
            registry.token_for_table(7),
            Err(MenuError::TableNotFound(7))
        ));
    }
}
