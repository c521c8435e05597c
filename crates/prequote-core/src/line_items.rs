//! # Line-Item Store
//!
//! The components and developments of one quotation, plus the MOQ linkage
//! rule that keeps them paired.
//!
//! ## MOQ Linkage
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Component ⇄ MOQ Development                          │
//! │                                                                         │
//! │  set_has_moq(c, true)          OFF ──────────────► ON                   │
//! │    └── push Development {                                               │
//! │          description: "MOQ - " + c.description,                         │
//! │          supplier: c.supplier, cost: 0, moq_quantity: 0,                │
//! │          include_in_subtotal: false, show_in_pdf: true,                 │
//! │          is_from_moq: true, source_component_id: c.id }                 │
//! │    └── c.moq_development_id = dev.id                                    │
//! │                                                                         │
//! │  set_has_moq(c, false)         ON ───────────────► OFF                  │
//! │    └── drop every development whose source is c                         │
//! │                                                                         │
//! │  rename_component(c, "New")    dev.description = "MOQ - New"            │
//! │  remove_component(c)           dev removed too                          │
//! │  remove_development(dev)       c.has_moq = false (inverse cascade)      │
//! │                                                                         │
//! │  Pairs are resolved by id. Two components may share a description      │
//! │  without their developments being confused.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//! `LineItems` is a plain value. Callers own one snapshot at a time and
//! persist it as a whole; there is no interior mutability here.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, LinkageIssue};
use crate::types::{moq_description, Component, Development};
use crate::MOQ_PREFIX;

/// Ordered components and developments of one quotation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItems {
    #[serde(default)]
    pub components: Vec<Component>,

    #[serde(default)]
    pub developments: Vec<Development>,
}

impl LineItems {
    /// Creates an empty store.
    pub fn new() -> Self {
        LineItems::default()
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn development(&self, id: &str) -> Option<&Development> {
        self.developments.iter().find(|d| d.id == id)
    }

    fn component_index(&self, id: &str) -> CoreResult<usize> {
        self.components
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| CoreError::ComponentNotFound(id.to_string()))
    }

    fn development_index(&self, id: &str) -> CoreResult<usize> {
        self.developments
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| CoreError::DevelopmentNotFound(id.to_string()))
    }

    /// Returns the MOQ development paired with a component.
    ///
    /// ## Example
    /// ```rust
    /// use prequote_core::{Component, LineItems};
    /// use rust_decimal::Decimal;
    ///
    /// let mut items = LineItems::new();
    /// let id = items.add_component(Component::new("Zipper", "YKK", Decimal::ONE, Decimal::ONE));
    /// items.set_has_moq(&id, true).unwrap();
    ///
    /// let dev = items.moq_pair(&id).unwrap();
    /// assert_eq!(dev.description, "MOQ - Zipper");
    /// ```
    pub fn moq_pair(&self, component_id: &str) -> Option<&Development> {
        let component = self.component(component_id)?;
        let dev_id = component.moq_development_id.as_deref()?;
        self.development(dev_id)
            .filter(|d| d.is_from_moq && d.source_component_id.as_deref() == Some(component_id))
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// Appends a component, creating its MOQ development when flagged.
    ///
    /// Any incoming pairing reference is discarded; the pair is always
    /// created fresh.
    ///
    /// ## Returns
    /// The component id.
    pub fn add_component(&mut self, mut component: Component) -> String {
        let wants_moq = component.has_moq;
        component.has_moq = false;
        component.moq_development_id = None;
        let id = component.id.clone();
        self.components.push(component);

        if wants_moq {
            self.enable_moq(self.components.len() - 1);
        }
        id
    }

    /// Replaces a component's editable fields, applying the linkage rule
    /// for any change to its description, supplier or MOQ flag.
    pub fn update_component(&mut self, updated: Component) -> CoreResult<()> {
        let idx = self.component_index(&updated.id)?;
        let wants_moq = updated.has_moq;
        {
            let current = &mut self.components[idx];
            current.description = updated.description;
            current.supplier = updated.supplier;
            current.unit_price = updated.unit_price;
            current.consumption = updated.consumption;
            current.moq_quantity = updated.moq_quantity;
            current.moq_cost = updated.moq_cost;
        }
        self.sync_pair(idx);
        self.set_has_moq(&updated.id, wants_moq)
    }

    /// Renames a component; its MOQ development follows.
    pub fn rename_component(&mut self, id: &str, description: impl Into<String>) -> CoreResult<()> {
        let idx = self.component_index(id)?;
        self.components[idx].description = description.into();
        self.sync_pair(idx);
        Ok(())
    }

    /// Turns the MOQ clause of a component on or off.
    ///
    /// ## Behavior
    /// - `true` on a component that already has its pair: no-op
    /// - `true` otherwise: creates the MOQ development
    /// - `false`: removes every MOQ development sourced from this component
    pub fn set_has_moq(&mut self, id: &str, on: bool) -> CoreResult<()> {
        let idx = self.component_index(id)?;

        if on {
            if self.moq_pair(id).is_some() {
                self.components[idx].has_moq = true;
            } else {
                self.enable_moq(idx);
            }
            return Ok(());
        }

        let component = &mut self.components[idx];
        component.has_moq = false;
        let linked = component.moq_development_id.take();
        self.developments.retain(|d| {
            !(d.is_from_moq
                && (d.source_component_id.as_deref() == Some(id)
                    || linked.as_deref() == Some(d.id.as_str())))
        });
        Ok(())
    }

    /// Removes a component together with its MOQ development.
    pub fn remove_component(&mut self, id: &str) -> CoreResult<Component> {
        self.set_has_moq(id, false)?;
        let idx = self.component_index(id)?;
        Ok(self.components.remove(idx))
    }

    fn enable_moq(&mut self, idx: usize) {
        let dev = Development::moq_for(&self.components[idx]);
        let component = &mut self.components[idx];
        component.has_moq = true;
        component.moq_development_id = Some(dev.id.clone());
        self.developments.push(dev);
    }

    /// Re-derives the paired development's description and supplier.
    fn sync_pair(&mut self, idx: usize) {
        let component = &self.components[idx];
        let Some(dev_id) = component.moq_development_id.clone() else {
            return;
        };
        let description = moq_description(&component.description);
        let supplier = component.supplier.clone();
        let component_id = component.id.clone();

        if let Some(dev) = self.developments.iter_mut().find(|d| {
            d.id == dev_id
                && d.is_from_moq
                && d.source_component_id.as_deref() == Some(component_id.as_str())
        }) {
            dev.description = description;
            dev.supplier = Some(supplier);
        }
    }

    // =========================================================================
    // Developments
    // =========================================================================

    /// Appends a manual development.
    ///
    /// MOQ developments only come from [`LineItems::set_has_moq`], so the
    /// MOQ markers of the incoming value are cleared.
    ///
    /// ## Returns
    /// The development id.
    pub fn add_development(&mut self, mut development: Development) -> String {
        development.is_from_moq = false;
        development.source_component_id = None;
        let id = development.id.clone();
        self.developments.push(development);
        id
    }

    /// Replaces a development's editable fields.
    ///
    /// ## Errors
    /// * `MoqFieldReadOnly` - description or supplier of an MOQ development
    ///   differs from the derived value
    pub fn update_development(&mut self, updated: Development) -> CoreResult<()> {
        let idx = self.development_index(&updated.id)?;
        let current = &mut self.developments[idx];

        if current.is_from_moq {
            if updated.description != current.description {
                return Err(CoreError::MoqFieldReadOnly {
                    id: updated.id,
                    field: "description".to_string(),
                });
            }
            if updated.supplier.is_some() && updated.supplier != current.supplier {
                return Err(CoreError::MoqFieldReadOnly {
                    id: updated.id,
                    field: "supplier".to_string(),
                });
            }
        } else {
            current.description = updated.description;
            current.supplier = updated.supplier;
        }

        current.cost = updated.cost;
        current.moq_quantity = updated.moq_quantity;
        current.include_in_subtotal = updated.include_in_subtotal;
        current.show_in_pdf = updated.show_in_pdf;
        Ok(())
    }

    /// Removes a development. Removing an MOQ development clears the MOQ
    /// flag of its source component.
    pub fn remove_development(&mut self, id: &str) -> CoreResult<Development> {
        let idx = self.development_index(id)?;
        let removed = self.developments.remove(idx);

        if removed.is_from_moq {
            for component in self.components.iter_mut().filter(|c| {
                removed.source_component_id.as_deref() == Some(c.id.as_str())
                    || c.moq_development_id.as_deref() == Some(id)
            }) {
                component.has_moq = false;
                component.moq_development_id = None;
            }
        }
        Ok(removed)
    }

    // =========================================================================
    // Consistency
    // =========================================================================

    /// Lists every pairing defect, components first, in list order.
    ///
    /// An empty result means every flagged component has exactly one MOQ
    /// development and every MOQ development has a flagged source.
    pub fn check_linkage(&self) -> Vec<LinkageIssue> {
        let mut issues = Vec::new();
        let mut claims: HashMap<&str, usize> = HashMap::new();
        for dev in self.developments.iter().filter(|d| d.is_from_moq) {
            if let Some(source) = dev.source_component_id.as_deref() {
                *claims.entry(source).or_default() += 1;
            }
        }

        for component in &self.components {
            let claimed = claims.get(component.id.as_str()).copied().unwrap_or(0);

            if !component.has_moq {
                if component.moq_development_id.is_some() || claimed > 0 {
                    issues.push(LinkageIssue::UnflaggedPair {
                        component_id: component.id.clone(),
                    });
                }
                continue;
            }

            match component.moq_development_id.as_deref() {
                None => issues.push(LinkageIssue::MissingMoqDevelopment {
                    component_id: component.id.clone(),
                }),
                Some(dev_id) => {
                    if self.moq_pair(&component.id).is_none() {
                        issues.push(LinkageIssue::DanglingReference {
                            component_id: component.id.clone(),
                            development_id: dev_id.to_string(),
                        });
                    }
                }
            }

            if claimed > 1 {
                issues.push(LinkageIssue::DuplicatePair {
                    component_id: component.id.clone(),
                });
            }
        }

        for dev in self.developments.iter().filter(|d| d.is_from_moq) {
            let source = dev
                .source_component_id
                .as_deref()
                .and_then(|id| self.component(id));
            match source {
                None => issues.push(LinkageIssue::OrphanMoqDevelopment {
                    development_id: dev.id.clone(),
                }),
                Some(c) if c.has_moq && c.moq_development_id.as_deref() == Some(dev.id.as_str()) => {
                    if dev.description != moq_description(&c.description) {
                        issues.push(LinkageIssue::StaleDescription {
                            development_id: dev.id.clone(),
                        });
                    }
                }
                // Unflagged or pointing elsewhere: reported on the component.
                Some(_) => {}
            }
        }

        issues
    }

    /// Repairs the pairing deterministically and returns the defects found.
    ///
    /// ## Repair Order
    /// 1. MOQ developments without a source id are matched to the flagged
    ///    component referencing them, else by the `"MOQ - "` description
    ///    convention (records written before ids existed). A component
    ///    that some MOQ development already names as its source is never
    ///    matched again, so this step adds no duplicate claims
    /// 2. Each flagged component keeps the first MOQ development claiming it
    /// 3. Remaining MOQ developments are removed
    /// 4. Flagged components left without a pair get a fresh one
    /// 5. Descriptions and suppliers are re-derived
    pub fn reconcile(&mut self) -> Vec<LinkageIssue> {
        let issues = self.check_linkage();
        if issues.is_empty() {
            return issues;
        }

        // Step 1: link sourceless MOQ developments.
        for dev_idx in 0..self.developments.len() {
            let dev = &self.developments[dev_idx];
            if !dev.is_from_moq || dev.source_component_id.is_some() {
                continue;
            }
            let stripped = dev.description.strip_prefix(MOQ_PREFIX);
            let already_claimed = |c: &Component| {
                self.developments
                    .iter()
                    .any(|d| d.is_from_moq && d.source_component_id.as_deref() == Some(c.id.as_str()))
            };
            let by_reference = self.components.iter().find(|c| {
                c.has_moq
                    && c.moq_development_id.as_deref() == Some(dev.id.as_str())
                    && !already_claimed(c)
            });
            let source = by_reference
                .or_else(|| {
                    self.components
                        .iter()
                        .find(|c| c.has_moq && stripped == Some(c.description.as_str()) && !already_claimed(c))
                })
                .map(|c| c.id.clone());
            self.developments[dev_idx].source_component_id = source;
        }

        // Steps 2-3: first valid claim wins, everything else goes.
        let mut paired: HashMap<String, String> = HashMap::new();
        let flagged: Vec<String> = self
            .components
            .iter()
            .filter(|c| c.has_moq)
            .map(|c| c.id.clone())
            .collect();
        self.developments.retain(|d| {
            if !d.is_from_moq {
                return true;
            }
            match d.source_component_id.as_deref() {
                Some(source) if flagged.iter().any(|f| f == source) && !paired.contains_key(source) => {
                    paired.insert(source.to_string(), d.id.clone());
                    true
                }
                _ => false,
            }
        });
        for dev in self.developments.iter_mut().filter(|d| !d.is_from_moq) {
            dev.source_component_id = None;
        }

        // Steps 4-5.
        for idx in 0..self.components.len() {
            let component = &mut self.components[idx];
            if !component.has_moq {
                component.moq_development_id = None;
                continue;
            }
            match paired.get(&component.id) {
                Some(dev_id) => {
                    component.moq_development_id = Some(dev_id.clone());
                    self.sync_pair(idx);
                }
                None => self.enable_moq(idx),
            }
        }

        issues
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn component(description: &str) -> Component {
        Component::new(description, "Supplier A", Decimal::new(25, 1), Decimal::from(4))
    }

    fn store_with_manual_dev() -> (LineItems, String) {
        let mut items = LineItems::new();
        let id = items.add_component(component("Zipper"));
        items.add_development(Development::new("Pattern making", Decimal::from(80)));
        (items, id)
    }

    #[test]
    fn test_toggle_on_creates_moq_development() {
        let (mut items, id) = store_with_manual_dev();
        items.set_has_moq(&id, true).unwrap();

        let generated: Vec<_> = items.developments.iter().filter(|d| d.is_from_moq).collect();
        assert_eq!(generated.len(), 1);
        let dev = generated[0];
        assert_eq!(dev.description, "MOQ - Zipper");
        assert_eq!(dev.supplier.as_deref(), Some("Supplier A"));
        assert_eq!(dev.cost, Decimal::ZERO);
        assert_eq!(dev.moq_quantity, 0);
        assert!(!dev.include_in_subtotal);
        assert!(dev.show_in_pdf);
        assert_eq!(dev.source_component_id.as_deref(), Some(id.as_str()));
        assert!(items.check_linkage().is_empty());
    }

    #[test]
    fn test_toggle_on_is_idempotent() {
        let (mut items, id) = store_with_manual_dev();
        items.set_has_moq(&id, true).unwrap();
        items.set_has_moq(&id, true).unwrap();
        assert_eq!(items.developments.iter().filter(|d| d.is_from_moq).count(), 1);
    }

    #[test]
    fn test_toggle_on_then_off_restores_developments() {
        let (mut items, id) = store_with_manual_dev();
        let before = items.clone();

        items.set_has_moq(&id, true).unwrap();
        items.set_has_moq(&id, false).unwrap();

        assert_eq!(items, before);
    }

    #[test]
    fn test_rename_cascades_and_pair_survives() {
        let (mut items, id) = store_with_manual_dev();
        items.set_has_moq(&id, true).unwrap();

        items.rename_component(&id, "Metal zipper").unwrap();

        let dev = items.moq_pair(&id).unwrap();
        assert_eq!(dev.description, "MOQ - Metal zipper");
        assert!(items.check_linkage().is_empty());
    }

    #[test]
    fn test_update_component_applies_rename_and_flag() {
        let (mut items, id) = store_with_manual_dev();
        let mut edited = items.component(&id).unwrap().clone();
        edited.description = "Button".to_string();
        edited.supplier = "Supplier B".to_string();
        edited.has_moq = true;

        items.update_component(edited).unwrap();

        let dev = items.moq_pair(&id).unwrap();
        assert_eq!(dev.description, "MOQ - Button");
        assert_eq!(dev.supplier.as_deref(), Some("Supplier B"));
    }

    #[test]
    fn test_remove_component_cascades() {
        let (mut items, id) = store_with_manual_dev();
        items.set_has_moq(&id, true).unwrap();

        items.remove_component(&id).unwrap();

        assert!(items.components.is_empty());
        assert_eq!(items.developments.len(), 1);
        assert!(!items.developments[0].is_from_moq);
    }

    #[test]
    fn test_remove_moq_development_clears_flag() {
        let (mut items, id) = store_with_manual_dev();
        items.set_has_moq(&id, true).unwrap();
        let dev_id = items.moq_pair(&id).unwrap().id.clone();

        items.remove_development(&dev_id).unwrap();

        let c = items.component(&id).unwrap();
        assert!(!c.has_moq);
        assert!(c.moq_development_id.is_none());
        assert!(items.check_linkage().is_empty());
    }

    #[test]
    fn test_same_description_components_stay_independent() {
        let mut items = LineItems::new();
        let a = items.add_component(component("Label"));
        let b = items.add_component(component("Label"));
        items.set_has_moq(&a, true).unwrap();
        items.set_has_moq(&b, true).unwrap();

        let dev_a = items.moq_pair(&a).unwrap().id.clone();
        items.remove_development(&dev_a).unwrap();

        assert!(!items.component(&a).unwrap().has_moq);
        assert!(items.component(&b).unwrap().has_moq);
        assert!(items.moq_pair(&b).is_some());
    }

    #[test]
    fn test_moq_description_and_supplier_are_read_only() {
        let (mut items, id) = store_with_manual_dev();
        items.set_has_moq(&id, true).unwrap();
        let mut dev = items.moq_pair(&id).unwrap().clone();

        dev.cost = Decimal::from(100);
        dev.moq_quantity = 500;
        dev.include_in_subtotal = true;
        items.update_development(dev.clone()).unwrap();
        assert_eq!(items.moq_pair(&id).unwrap().moq_quantity, 500);

        dev.description = "Something else".to_string();
        assert!(matches!(
            items.update_development(dev),
            Err(CoreError::MoqFieldReadOnly { .. })
        ));
    }

    #[test]
    fn test_add_development_never_creates_moq_entries() {
        let mut items = LineItems::new();
        let mut dev = Development::new("MOQ - Ghost", Decimal::ONE);
        dev.is_from_moq = true;
        dev.source_component_id = Some("nope".to_string());

        items.add_development(dev);

        assert!(!items.developments[0].is_from_moq);
        assert!(items.check_linkage().is_empty());
    }

    #[test]
    fn test_add_flagged_component_gets_pair() {
        let mut items = LineItems::new();
        let mut c = component("Hook");
        c.has_moq = true;
        c.moq_development_id = Some("stale".to_string());

        let id = items.add_component(c);

        assert_eq!(items.moq_pair(&id).unwrap().description, "MOQ - Hook");
    }

    #[test]
    fn test_unknown_ids_are_errors() {
        let mut items = LineItems::new();
        assert!(matches!(
            items.set_has_moq("missing", true),
            Err(CoreError::ComponentNotFound(_))
        ));
        assert!(matches!(
            items.remove_development("missing"),
            Err(CoreError::DevelopmentNotFound(_))
        ));
    }

    // -------------------------------------------------------------------------
    // Detection and repair
    // -------------------------------------------------------------------------

    #[test]
    fn test_detects_missing_and_orphan() {
        let mut items = LineItems::new();
        let mut flagged = component("Zipper");
        flagged.has_moq = true;
        let flagged_id = flagged.id.clone();
        items.components.push(flagged);

        let mut orphan = Development::new("MOQ - Button", Decimal::ZERO);
        orphan.is_from_moq = true;
        let orphan_id = orphan.id.clone();
        items.developments.push(orphan);

        assert_eq!(
            items.check_linkage(),
            vec![
                LinkageIssue::MissingMoqDevelopment {
                    component_id: flagged_id
                },
                LinkageIssue::OrphanMoqDevelopment {
                    development_id: orphan_id
                },
            ]
        );
    }

    #[test]
    fn test_detects_stale_description_and_unflagged_pair() {
        let (mut items, id) = store_with_manual_dev();
        items.set_has_moq(&id, true).unwrap();
        let dev_id = items.moq_pair(&id).unwrap().id.clone();

        items.components[0].description = "Renamed without cascade".to_string();
        assert_eq!(
            items.check_linkage(),
            vec![LinkageIssue::StaleDescription {
                development_id: dev_id
            }]
        );

        items.components[0].has_moq = false;
        assert_eq!(
            items.check_linkage(),
            vec![LinkageIssue::UnflaggedPair { component_id: id }]
        );
    }

    #[test]
    fn test_detects_dangling_and_duplicate() {
        let (mut items, id) = store_with_manual_dev();
        items.set_has_moq(&id, true).unwrap();
        let mut twin = items.moq_pair(&id).unwrap().clone();
        twin.id = "twin".to_string();
        items.developments.push(twin);

        assert_eq!(
            items.check_linkage(),
            vec![
                LinkageIssue::DuplicatePair {
                    component_id: id.clone()
                },
            ]
        );

        items.components[0].moq_development_id = Some("gone".to_string());
        assert!(items.check_linkage().contains(&LinkageIssue::DanglingReference {
            component_id: id,
            development_id: "gone".to_string(),
        }));
    }

    #[test]
    fn test_reconcile_links_legacy_records_by_description() {
        let mut items = LineItems::new();
        let mut flagged = component("Zipper");
        flagged.has_moq = true;
        let id = flagged.id.clone();
        items.components.push(flagged);

        let mut legacy = Development::new("MOQ - Zipper", Decimal::from(100));
        legacy.is_from_moq = true;
        legacy.moq_quantity = 500;
        items.developments.push(legacy);

        let fixed = items.reconcile();

        assert!(!fixed.is_empty());
        assert!(items.check_linkage().is_empty());
        let dev = items.moq_pair(&id).unwrap();
        assert_eq!(dev.cost, Decimal::from(100));
        assert_eq!(dev.moq_quantity, 500);
        assert_eq!(items.developments.len(), 1);
    }

    #[test]
    fn test_reconcile_drops_orphans_and_creates_missing() {
        let mut items = LineItems::new();
        let mut flagged = component("Zipper");
        flagged.has_moq = true;
        let id = flagged.id.clone();
        items.components.push(flagged);
        let mut orphan = Development::new("MOQ - Button", Decimal::ZERO);
        orphan.is_from_moq = true;
        items.developments.push(orphan);
        items.developments.push(Development::new("Tooling", Decimal::from(40)));

        items.reconcile();

        assert!(items.check_linkage().is_empty());
        assert_eq!(items.developments.len(), 2);
        assert_eq!(items.developments[0].description, "Tooling");
        assert_eq!(items.moq_pair(&id).unwrap().description, "MOQ - Zipper");
    }

    #[test]
    fn test_reconcile_keeps_first_duplicate() {
        let (mut items, id) = store_with_manual_dev();
        items.set_has_moq(&id, true).unwrap();
        let first = items.moq_pair(&id).unwrap().id.clone();
        let mut twin = items.moq_pair(&id).unwrap().clone();
        twin.id = "twin".to_string();
        items.developments.push(twin);

        items.reconcile();

        assert_eq!(items.moq_pair(&id).unwrap().id, first);
        assert!(items.development("twin").is_none());
    }

    #[test]
    fn test_reconcile_never_reassigns_a_claimed_component() {
        let (mut items, id) = store_with_manual_dev();
        items.set_has_moq(&id, true).unwrap();
        let first = items.moq_pair(&id).unwrap().id.clone();

        // sourceless MOQ development listed before the real pair, with the
        // component pointing at it
        let mut stray = Development::new("MOQ - Zipper", Decimal::ZERO);
        stray.id = "stray".to_string();
        stray.is_from_moq = true;
        items.developments.insert(0, stray);
        items.components[0].moq_development_id = Some("stray".to_string());

        assert!(!items.reconcile().is_empty());

        assert!(items.check_linkage().is_empty());
        assert!(items.development("stray").is_none());
        assert_eq!(items.moq_pair(&id).unwrap().id, first);
        assert_eq!(items.components[0].moq_development_id.as_deref(), Some(first.as_str()));
    }

    #[test]
    fn test_reconcile_on_consistent_store_is_noop() {
        let (mut items, id) = store_with_manual_dev();
        items.set_has_moq(&id, true).unwrap();
        let before = items.clone();

        assert!(items.reconcile().is_empty());
        assert_eq!(items, before);
    }
}
