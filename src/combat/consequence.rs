//! Consequence aggregation
//!
//! One resolution pass produces many per-target consequences. They are
//! merged into a single net consequence per target before being applied.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Net change produced for one target during a resolution pass.
///
/// A missing channel means no effect produced it, which is different
/// from a channel that summed to zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Consequence {
    pub target_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflect: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absorb_hp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absorb_sp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absorb_cp: Option<f64>,
}

fn add(current: Option<f64>, other: Option<f64>) -> Option<f64> {
    match (current, other) {
        (Some(a), Some(b)) => Some(a + b),
        (a, b) => a.or(b),
    }
}

impl Consequence {
    /// Empty consequence for a target
    pub fn new(target_id: &str) -> Self {
        Self {
            target_id: target_id.to_string(),
            ..Self::default()
        }
    }

    pub fn with_damage(mut self, damage: f64) -> Self {
        self.damage = Some(damage);
        self
    }

    pub fn with_heal(mut self, heal: f64) -> Self {
        self.heal = Some(heal);
        self
    }

    pub fn with_reflect(mut self, reflect: f64) -> Self {
        self.reflect = Some(reflect);
        self
    }

    /// Set the absorbed amounts for health, stamina and chakra
    pub fn with_absorb(mut self, hp: f64, sp: f64, cp: f64) -> Self {
        self.absorb_hp = Some(hp);
        self.absorb_sp = Some(sp);
        self.absorb_cp = Some(cp);
        self
    }

    /// Add another consequence's channels into this one
    pub fn merge(&mut self, other: &Consequence) {
        self.damage = add(self.damage, other.damage);
        self.heal = add(self.heal, other.heal);
        self.reflect = add(self.reflect, other.reflect);
        self.absorb_hp = add(self.absorb_hp, other.absorb_hp);
        self.absorb_sp = add(self.absorb_sp, other.absorb_sp);
        self.absorb_cp = add(self.absorb_cp, other.absorb_cp);
    }
}

/// Collapse consequences into one per target, in first-seen target order
pub fn collapse_consequences<I>(consequences: I) -> Vec<Consequence>
where
    I: IntoIterator<Item = Consequence>,
{
    let mut collapsed: Vec<Consequence> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for consequence in consequences {
        match index.get(&consequence.target_id) {
            Some(&i) => collapsed[i].merge(&consequence),
            None => {
                index.insert(consequence.target_id.clone(), collapsed.len());
                collapsed.push(consequence);
            }
        }
    }

    collapsed
}
