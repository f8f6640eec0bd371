//! This module provides the Origin struct, representing a supply point
use std::fmt::{Display, Formatter};

use derive_builder::Builder;

/// Structure representing a supply point of the transportation network
#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(setter(into))]
pub struct Origin {
    /// Used to identify the origin
    pub id: String,
    /// Human readable origin name
    #[builder(setter(into, strip_option), default = "None")]
    pub name: Option<String>,
    /// Units available to ship out of this origin
    #[builder(default = "0.0")]
    pub supply: f64,
}

impl Origin {
    pub fn new(id: String, name: Option<String>, supply: f64) -> Origin {
        Origin { id, name, supply }
    }
}

impl Display for Origin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_origin() {
        let origin = OriginBuilder::default()
            .id("plant_1")
            .supply(100.0)
            .build()
            .unwrap();
        assert_eq!(origin.id, "plant_1");
        assert_eq!(origin.name, None);
        assert!((origin.supply - 100.0).abs() < 1e-25);
        assert_eq!(format!("{}", origin), "plant_1");
    }
}
