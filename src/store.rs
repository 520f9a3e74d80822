//! Interfaces for the storage collaborators plus in-memory implementations.
//!
//! The reporting functions never reach into a store themselves. Callers read a
//! snapshot with [SaleStore::all] and pass it in.

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    interchange::ImportSummary,
    sale::{NewSale, SaleId, SaleRecord},
};

/// Handles the creation and retrieval of sales.
pub trait SaleStore {
    /// Store a new sale, assigning it an ID.
    fn insert(&mut self, sale: NewSale) -> Result<SaleRecord, Error>;

    /// Replace the entered fields of a stored sale, keeping its ID.
    fn update(&mut self, id: SaleId, sale: NewSale) -> Result<SaleRecord, Error>;

    /// Remove a single sale.
    fn delete(&mut self, id: SaleId) -> Result<(), Error>;

    /// Remove every sale.
    fn delete_all(&mut self) -> Result<(), Error>;

    /// Every stored sale, newest first.
    fn all(&self) -> Result<Vec<SaleRecord>, Error>;
}

/// Report header text entered on the profile screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutletSettings {
    pub outlet_name: String,
    /// The name of the sales executive.
    pub sec_name: String,
}

/// Handles persisting the outlet settings.
pub trait SettingsStore {
    fn outlet_settings(&self) -> Result<OutletSettings, Error>;

    fn save_outlet_settings(&mut self, settings: OutletSettings) -> Result<(), Error>;
}

/// Replace every sale in `store` with the sales from a backup import.
///
/// Returns the number of sales inserted.
///
/// # Errors
/// Returns any error from the store. Sales inserted before the error stay in
/// the store.
pub fn restore(store: &mut impl SaleStore, import: ImportSummary) -> Result<usize, Error> {
    store.delete_all()?;

    let mut inserted = 0;
    for record in import.records {
        store.insert(record.to_new_sale())?;
        inserted += 1;
    }

    tracing::info!("Restored {inserted} sales from backup");

    Ok(inserted)
}

/// Keeps sales in a vector, for tests and short-lived tools.
#[derive(Debug, Default)]
pub struct MemorySaleStore {
    sales: Vec<SaleRecord>,
    next_id: SaleId,
}

impl MemorySaleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaleStore for MemorySaleStore {
    fn insert(&mut self, sale: NewSale) -> Result<SaleRecord, Error> {
        let record = SaleRecord::with_id(self.next_id + 1, sale)?;
        self.next_id += 1;
        self.sales.push(record.clone());

        Ok(record)
    }

    fn update(&mut self, id: SaleId, sale: NewSale) -> Result<SaleRecord, Error> {
        let existing = self
            .sales
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or(Error::NotFound)?;

        let updated = existing.update(sale)?;
        *existing = updated.clone();

        Ok(updated)
    }

    fn delete(&mut self, id: SaleId) -> Result<(), Error> {
        let position = self
            .sales
            .iter()
            .position(|record| record.id() == id)
            .ok_or(Error::NotFound)?;

        self.sales.remove(position);

        Ok(())
    }

    fn delete_all(&mut self) -> Result<(), Error> {
        self.sales.clear();

        Ok(())
    }

    fn all(&self) -> Result<Vec<SaleRecord>, Error> {
        let mut sales = self.sales.clone();
        sales.sort_by_key(|record| std::cmp::Reverse(record.timestamp()));

        Ok(sales)
    }
}

/// Keeps the outlet settings in memory.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: OutletSettings,
}

impl SettingsStore for MemorySettingsStore {
    fn outlet_settings(&self) -> Result<OutletSettings, Error> {
        Ok(self.settings.clone())
    }

    fn save_outlet_settings(&mut self, settings: OutletSettings) -> Result<(), Error> {
        self.settings = settings;

        Ok(())
    }
}
