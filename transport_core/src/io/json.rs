//! Module providing JSON IO for transportation models
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::io::IoError;
use crate::transport::destination::Destination;
use crate::transport::model::TransportModel;
use crate::transport::origin::Origin;

// region JSON Model
/// Represents a JSON serialized transportation model, used for reading and
/// writing problem definitions
#[derive(Serialize, Deserialize)]
struct JsonTransportModel {
    origins: Vec<JsonOrigin>,
    destinations: Vec<JsonDestination>,
    /// Unit costs, keyed by origin id then destination id
    costs: IndexMap<String, IndexMap<String, f64>>,
}

#[derive(Serialize, Deserialize)]
struct JsonOrigin {
    id: String,
    name: Option<String>,
    supply: f64,
}

#[derive(Serialize, Deserialize)]
struct JsonDestination {
    id: String,
    name: Option<String>,
    demand: f64,
}

impl JsonTransportModel {
    /// Convert the parsed document into a validated TransportModel
    fn into_model(self) -> Result<TransportModel, IoError> {
        let mut model = TransportModel::new_empty();
        for origin in self.origins {
            model.add_origin(Origin::new(origin.id, origin.name, origin.supply));
        }
        for destination in self.destinations {
            model.add_destination(Destination::new(
                destination.id,
                destination.name,
                destination.demand,
            ));
        }
        model.costs = self.costs;
        model.validate()?;
        Ok(model)
    }

    /// Build the JSON document for a model
    fn from_model(model: &TransportModel) -> JsonTransportModel {
        JsonTransportModel {
            origins: model
                .origins
                .values()
                .map(|origin| JsonOrigin {
                    id: origin.id.clone(),
                    name: origin.name.clone(),
                    supply: origin.supply,
                })
                .collect(),
            destinations: model
                .destinations
                .values()
                .map(|destination| JsonDestination {
                    id: destination.id.clone(),
                    name: destination.name.clone(),
                    demand: destination.demand,
                })
                .collect(),
            costs: model.costs.clone(),
        }
    }
}
// endregion JSON Model

/// Read a transportation model from a JSON problem file
pub fn read_json_model<P: AsRef<Path>>(path: P) -> Result<TransportModel, IoError> {
    let json_data =
        fs::read_to_string(path).map_err(|err| IoError::FileNotFound(err.to_string()))?;
    model_from_json_str(&json_data)
}

/// Parse a transportation model from a JSON string
pub fn model_from_json_str(json_data: &str) -> Result<TransportModel, IoError> {
    let json_model: JsonTransportModel = serde_json::from_str(json_data)
        .map_err(|err| IoError::DeserializeError(err.to_string()))?;
    json_model.into_model()
}

/// Write a transportation model to a JSON problem file
pub fn write_json_model<P: AsRef<Path>>(path: P, model: &TransportModel) -> Result<(), IoError> {
    let json_data = model_to_json_string(model)?;
    fs::write(path, json_data).map_err(|err| IoError::WriteError(err.to_string()))
}

/// Serialize a transportation model into a JSON string
pub fn model_to_json_string(model: &TransportModel) -> Result<String, IoError> {
    serde_json::to_string_pretty(&JsonTransportModel::from_model(model))
        .map_err(|err| IoError::SerializeError(err.to_string()))
}
