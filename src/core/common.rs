use std::collections::BTreeMap;
use std::ops::Add;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl ObjectMeta {
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            labels: BTreeMap::from([("name".to_string(), name.clone())]),
            name,
        }
    }
}

/// Two-dimensional resource quantity. Both dimensions are unsigned so a vector can never go
/// negative.
#[derive(Default, Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceVector {
    pub cpu: u32, // in millicores
    pub ram: u64, // in bytes
}

impl ResourceVector {
    pub const ZERO: ResourceVector = ResourceVector { cpu: 0, ram: 0 };

    pub fn new(cpu: u32, ram: u64) -> Self {
        Self { cpu, ram }
    }

    /// Component-wise sum, an empty input yields the zero vector.
    pub fn sum<'a>(vectors: impl IntoIterator<Item = &'a ResourceVector>) -> ResourceVector {
        vectors
            .into_iter()
            .fold(ResourceVector::ZERO, |acc, v| acc + *v)
    }

    /// Capacity left above `used`. Every dimension is clamped at zero on its own, so a deficit
    /// shows up as zero free capacity rather than an error.
    pub fn capacity_above(&self, used: &ResourceVector) -> ResourceVector {
        ResourceVector {
            cpu: self.cpu.saturating_sub(used.cpu),
            ram: self.ram.saturating_sub(used.ram),
        }
    }

    /// Strict dominance: `self` is greater than `other` on every dimension. Equality on any
    /// dimension does not dominate.
    pub fn dominates(&self, other: &ResourceVector) -> bool {
        self.cpu > other.cpu && self.ram > other.ram
    }

    pub fn is_zero(&self) -> bool {
        self.cpu == 0 && self.ram == 0
    }

    pub fn has_zero_dimension(&self) -> bool {
        self.cpu == 0 || self.ram == 0
    }
}

impl Add for ResourceVector {
    type Output = ResourceVector;

    fn add(self, rhs: ResourceVector) -> ResourceVector {
        ResourceVector {
            cpu: self.cpu.saturating_add(rhs.cpu),
            ram: self.ram.saturating_add(rhs.ram),
        }
    }
}
