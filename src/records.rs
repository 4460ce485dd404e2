// src/records.rs
//! Typed records produced from sheet rows.
//!
//! Field names follow the sheet headers (Spanish) because the frontend and
//! the spreadsheet editors both use them. JSON output is camelCase.

use serde::{Deserialize, Serialize};

/// One row of cells as delivered by the sheet, before typing.
pub type RawRow = Vec<String>;

/// Which sheet / record shape a pipeline run targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Demographics,
    News,
    Events,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [Self::Demographics, Self::News, Self::Events];

    /// Stable label used for metrics and log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Demographics => "demographics",
            Self::News => "news",
            Self::Events => "events",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A departamento with its demographic figures and audience estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    pub departamento: String,
    pub lat: f64,
    pub lng: f64,
    pub poblacion: i64,
    pub escuelas: i64,
    pub hospitales: i64,
    pub presupuesto: f64,
    pub audiencia_fb_a: f64,
    pub audiencia_fb_b: f64,
    pub audiencia_gmp: f64,
    pub whatsapp: f64,
    pub analisis: String,
    pub recomendaciones: String,
    pub conclusiones: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsRecord {
    pub departamento: String,
    pub titulo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enlace: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub departamento: String,
    pub evento: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enlace: Option<String>,
}

/// Records that can be looked up by their departamento join key.
pub trait Departamento {
    fn departamento(&self) -> &str;
}

impl Departamento for LocationRecord {
    fn departamento(&self) -> &str {
        &self.departamento
    }
}

impl Departamento for NewsRecord {
    fn departamento(&self) -> &str {
        &self.departamento
    }
}

impl Departamento for EventRecord {
    fn departamento(&self) -> &str {
        &self.departamento
    }
}

/// Exact-match filter on the departamento key, keeping order.
/// `None` returns everything.
pub fn for_departamento<R: Departamento + Clone>(records: &[R], name: Option<&str>) -> Vec<R> {
    match name {
        Some(name) => records
            .iter()
            .filter(|r| r.departamento() == name)
            .cloned()
            .collect(),
        None => records.to_vec(),
    }
}
