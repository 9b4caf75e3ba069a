//! Identity service: serialized access to the token and PIN maps.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tokio::sync::Mutex;

use crate::domain::{IdentityRegistry, TableIdentity};
use crate::error::MenuError;
use crate::persistence::JsonFileStore;

/// On-disk shape of both identity maps.
type TableMap = BTreeMap<String, u32>;

/// Single writer for the table identity collections.
///
/// Every mutation runs under one lock: clone the registry, apply the
/// change, persist both maps, then publish the clone. A failed validation
/// or write leaves memory and disk as they were.
#[derive(Debug)]
pub struct IdentityService {
    registry: Mutex<IdentityRegistry>,
    token_store: JsonFileStore<TableMap>,
    pin_store: JsonFileStore<TableMap>,
}

impl IdentityService {
    /// Loads (or initializes) both maps and reconciles the PIN map.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::PersistenceError`] if a file cannot be read,
    /// parsed, or written.
    pub async fn open(
        token_path: impl Into<PathBuf>,
        pin_path: impl Into<PathBuf>,
    ) -> Result<Self, MenuError> {
        let token_store = JsonFileStore::new(token_path);
        let pin_store = JsonFileStore::new(pin_path);
        let tokens = token_store.load_or_init().await?;
        let pins = pin_store.load_or_init().await?;

        let mut registry = IdentityRegistry::from_maps(tokens, pins);
        let reconciled = registry.reconcile(&mut rand::rng());
        let service = Self {
            registry: Mutex::new(IdentityRegistry::new()),
            token_store,
            pin_store,
        };
        if reconciled {
            service.persist(&registry).await?;
            tracing::info!(tables = registry.len(), "table pins reconciled");
        }
        *service.registry.lock().await = registry;
        Ok(service)
    }

    /// Resolves a QR token to a table number.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::TokenNotFound`] if the token is unknown.
    pub async fn resolve_token(&self, token: &str) -> Result<u32, MenuError> {
        self.registry.lock().await.resolve_token(token)
    }

    /// Resolves a PIN to a table number.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::PinNotFound`] if the PIN is unknown.
    pub async fn resolve_pin(&self, pin: &str) -> Result<u32, MenuError> {
        self.registry.lock().await.resolve_pin(pin)
    }

    /// Returns every table identity ordered by table number.
    pub async fn list(&self) -> Vec<TableIdentity> {
        self.registry.lock().await.list()
    }

    /// Returns the token owned by `table_number`.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::TableNotFound`] if the table is not provisioned.
    pub async fn token_for_table(&self, table_number: u32) -> Result<String, MenuError> {
        self.registry
            .lock()
            .await
            .token_for_table(table_number)
            .map(str::to_string)
    }

    /// Replaces all mappings with fresh credentials for `total_tables`
    /// tables.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::InvalidArgument`] if `total_tables` is outside
    /// `1..=100`, or [`MenuError::PersistenceError`] on write failure.
    pub async fn provision(&self, total_tables: u32) -> Result<Vec<TableIdentity>, MenuError> {
        let tables = self
            .mutate(|registry| registry.provision(total_tables, &mut rand::rng()))
            .await?;
        tracing::info!(total_tables, "tables provisioned");
        Ok(tables)
    }

    /// Maps a new token to `table_number`.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::Conflict`] if the token or table is taken,
    /// [`MenuError::InvalidArgument`] for table zero, or
    /// [`MenuError::PersistenceError`] on write failure.
    pub async fn insert(&self, token: &str, table_number: u32) -> Result<TableIdentity, MenuError> {
        let identity = self
            .mutate(|registry| registry.insert(token, table_number, &mut rand::rng()))
            .await?;
        tracing::info!(table_number, "table mapping created");
        Ok(identity)
    }

    /// Moves `token` to `new_table_number`, returning the previous number
    /// and the updated identity.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::TokenNotFound`], [`MenuError::Conflict`],
    /// [`MenuError::InvalidArgument`], or [`MenuError::PersistenceError`].
    pub async fn update_table_number(
        &self,
        token: &str,
        new_table_number: u32,
    ) -> Result<(u32, TableIdentity), MenuError> {
        let (old, identity) = self
            .mutate(|registry| registry.update_table_number(token, new_table_number))
            .await?;
        tracing::info!(old, new = new_table_number, "table mapping updated");
        Ok((old, identity))
    }

    /// Deletes `token`, returning the table number it was mapped to.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::TokenNotFound`] if the token is unknown, or
    /// [`MenuError::PersistenceError`] on write failure.
    pub async fn delete(&self, token: &str) -> Result<u32, MenuError> {
        let table_number = self.mutate(|registry| registry.remove(token)).await?;
        tracing::info!(table_number, "table mapping deleted");
        Ok(table_number)
    }

    /// Replaces all mappings with `mapping`, issuing fresh PINs.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::InvalidArgument`] if table numbers repeat, or
    /// [`MenuError::PersistenceError`] on write failure.
    pub async fn bulk_replace(&self, mapping: BTreeMap<String, u32>) -> Result<(), MenuError> {
        let total = mapping.len();
        self.mutate(|registry| registry.replace_all(mapping, &mut rand::rng()))
            .await?;
        tracing::info!(total, "table mappings replaced");
        Ok(())
    }

    /// Applies `change` to a copy of the registry, persists the copy, then
    /// publishes it.
    async fn mutate<R>(
        &self,
        change: impl FnOnce(&mut IdentityRegistry) -> Result<R, MenuError>,
    ) -> Result<R, MenuError> {
        let mut current = self.registry.lock().await;
        let mut next = current.clone();
        let out = change(&mut next)?;
        self.persist(&next).await?;
        *current = next;
        Ok(out)
    }

    /// Writes both maps, staging each before renaming either.
    async fn persist(&self, registry: &IdentityRegistry) -> Result<(), MenuError> {
        let tokens = self.token_store.stage(registry.tokens()).await?;
        let pins = match self.pin_store.stage(registry.pins()).await {
            Ok(pins) => pins,
            Err(e) => {
                tokens.discard().await;
                return Err(e);
            }
        };
        tokens.commit().await?;
        pins.commit().await
    }
}
