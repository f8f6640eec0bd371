//! This module provides the Destination struct, representing a demand point
use std::fmt::{Display, Formatter};

use derive_builder::Builder;

/// Structure representing a demand point of the transportation network
#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(setter(into))]
pub struct Destination {
    /// Used to identify the destination
    pub id: String,
    /// Human readable destination name
    #[builder(setter(into, strip_option), default = "None")]
    pub name: Option<String>,
    /// Units this destination requires
    #[builder(default = "0.0")]
    pub demand: f64,
}

impl Destination {
    pub fn new(id: String, name: Option<String>, demand: f64) -> Destination {
        Destination { id, name, demand }
    }
}

impl Display for Destination {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_destination() {
        let destination = DestinationBuilder::default()
            .id("client_1")
            .name("Downtown client")
            .demand(50.0)
            .build()
            .unwrap();
        assert_eq!(destination.id, "client_1");
        assert_eq!(destination.name.as_deref(), Some("Downtown client"));
        assert!((destination.demand - 50.0).abs() < 1e-25);
    }
}
