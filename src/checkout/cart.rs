//! Pending purchase cart.
//!
//! Only what checkout needs: totals, the item map submitted with an
//! order, and the distinct-item count shown on confirmation. Catalog
//! browsing and quantity editing UI live outside this crate.

use std::collections::BTreeMap;

/// One product line in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    /// Product name; also the key in the submitted item map.
    pub name: String,
    /// Unit price in currency units.
    pub unit_price: f64,
    /// Quantity, at least 1.
    pub quantity: u32,
}

impl CartItem {
    /// Line total for this item.
    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

/// The pending cart for a purchase authorization.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an item, merging quantities when the name already exists.
    pub fn add(&mut self, name: impl Into<String>, unit_price: f64, quantity: u32) {
        let name = name.into();
        if let Some(existing) = self.items.iter_mut().find(|item| item.name == name) {
            existing.quantity += quantity;
            return;
        }
        self.items.push(CartItem {
            name,
            unit_price,
            quantity,
        });
    }

    /// True when nothing is in the cart.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct products.
    pub fn distinct_items(&self) -> usize {
        self.items.len()
    }

    /// Sum of all line totals.
    pub fn total_amount(&self) -> f64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Item name → quantity, as submitted with an order.
    pub fn item_quantities(&self) -> BTreeMap<String, u32> {
        self.items
            .iter()
            .map(|item| (item.name.clone(), item.quantity))
            .collect()
    }

    /// Order description line.
    pub fn description(&self) -> String {
        format!("Store purchase of {} items", self.distinct_items())
    }

    /// The items, in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }
}
