use serde::{Deserialize, Serialize};

use crate::rooms::RoomKind;

// Beds or suites picked by a guest, in the order they were picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSelection {
    kind: RoomKind,
    limit: usize,
    units: Vec<String>,
}

impl UnitSelection {
    /// Dorm beds are capped by the guest count; suites by the layout.
    pub fn new(kind: RoomKind, guests: u32) -> Self {
        Self {
            kind,
            limit: Self::limit_for(kind, guests),
            units: Vec::new(),
        }
    }

    fn limit_for(kind: RoomKind, guests: u32) -> usize {
        let max = kind.layout().max_selection;
        match kind {
            RoomKind::Dorm => (guests as usize).min(max),
            RoomKind::Suite => max,
        }
    }

    pub fn kind(&self) -> RoomKind {
        self.kind
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn units(&self) -> &[String] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn contains(&self, unit_id: &str) -> bool {
        self.units.iter().any(|unit| unit == unit_id)
    }

    /// Add or remove `unit_id`. Unavailable units and additions past the
    /// limit are ignored. Returns whether the selection changed.
    pub fn toggle(&mut self, unit_id: &str, available: &[String]) -> bool {
        if let Some(index) = self.units.iter().position(|unit| unit == unit_id) {
            self.units.remove(index);
            return true;
        }
        if !available.iter().any(|unit| unit == unit_id) || self.units.len() >= self.limit {
            return false;
        }
        self.units.push(unit_id.to_string());
        true
    }

    /// New guest count; drops the most recent picks beyond the new limit.
    pub fn set_guests(&mut self, guests: u32) {
        self.limit = Self::limit_for(self.kind, guests);
        self.units.truncate(self.limit);
    }

    /// Keep only units still in `available`.
    pub fn retain_available(&mut self, available: &[String]) {
        self.units.retain(|unit| available.contains(unit));
    }

    pub fn clear(&mut self) {
        self.units.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rooms::{DORM_LAYOUT, SUITE_LAYOUT};

    #[test]
    fn test_toggle_respects_guest_limit() {
        let available = DORM_LAYOUT.unit_ids();
        let mut selection = UnitSelection::new(RoomKind::Dorm, 2);

        assert!(selection.toggle("C1-T", &available));
        assert!(selection.toggle("C1-B", &available));
        assert!(!selection.toggle("C2-T", &available));
        assert_eq!(selection.units(), &["C1-T", "C1-B"]);

        // removing frees a slot
        assert!(selection.toggle("C1-T", &available));
        assert!(selection.toggle("C2-T", &available));
        assert_eq!(selection.units(), &["C1-B", "C2-T"]);
    }

    #[test]
    fn test_unavailable_units_are_ignored() {
        let available = vec!["S1".to_string(), "S3".to_string()];
        let mut selection = UnitSelection::new(RoomKind::Suite, 1);
        assert_eq!(selection.limit(), 3);
        assert!(!selection.toggle("S2", &available));
        assert!(selection.toggle("S3", &available));
        assert!(selection.toggle("S1", &available));
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn test_lowering_guests_truncates() {
        let available = DORM_LAYOUT.unit_ids();
        let mut selection = UnitSelection::new(RoomKind::Dorm, 3);
        for bed in ["C1-T", "C2-T", "C3-T"] {
            selection.toggle(bed, &available);
        }
        selection.set_guests(1);
        assert_eq!(selection.units(), &["C1-T"]);
    }

    #[test]
    fn test_retain_available_and_clear() {
        let mut selection = UnitSelection::new(RoomKind::Suite, 1);
        let all = SUITE_LAYOUT.unit_ids();
        selection.toggle("S1", &all);
        selection.toggle("S2", &all);

        selection.retain_available(&["S2".to_string()]);
        assert_eq!(selection.units(), &["S2"]);
        assert!(selection.contains("S2"));

        selection.clear();
        assert!(selection.is_empty());
    }
}
