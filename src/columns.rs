// src/columns.rs
//! Positional column contracts for each sheet.
//!
//! The sheets are edited by hand, so the layout lives here as data rather
//! than as literals inside the normalizers. A layout change in the
//! spreadsheet only needs a config edit (see `DashboardConfig`).

use serde::{Deserialize, Serialize};

/// Column indices of the demographics sheet (`Demografia`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemographicsColumns {
    /// Rows with fewer cells are dropped before any coercion.
    pub min_columns: usize,
    pub departamento: usize,
    pub lat: usize,
    pub lng: usize,
    pub poblacion: usize,
    pub escuelas: usize,
    pub hospitales: usize,
    pub presupuesto: usize,
    pub audiencia_fb_a: usize,
    pub audiencia_fb_b: usize,
    pub audiencia_gmp: usize,
    pub whatsapp: usize,
    pub analisis: usize,
    pub recomendaciones: usize,
    pub conclusiones: usize,
}

impl Default for DemographicsColumns {
    fn default() -> Self {
        Self {
            min_columns: 8,
            escuelas: 0,
            hospitales: 1,
            presupuesto: 2,
            departamento: 3,
            poblacion: 6,
            lat: 7,
            lng: 8,
            recomendaciones: 12,
            conclusiones: 13,
            audiencia_fb_a: 14,
            audiencia_fb_b: 15,
            audiencia_gmp: 16,
            whatsapp: 17,
            analisis: 21,
        }
    }
}

/// Column indices shared by the two "headline + link" sheets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadlineColumns {
    pub min_columns: usize,
    pub departamento: usize,
    /// `titulo` for news, `evento` for events.
    pub headline: usize,
    pub enlace: usize,
}

impl Default for HeadlineColumns {
    fn default() -> Self {
        Self {
            min_columns: 2,
            departamento: 0,
            headline: 1,
            enlace: 2,
        }
    }
}

pub type NewsColumns = HeadlineColumns;
pub type EventsColumns = HeadlineColumns;

/// Which zero values count as "missing" rather than as measurements.
///
/// Coordinate (0, 0) lies far outside the covered region, so the source uses
/// it for "no coordinate". Population zero means "not filled in".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentinelPolicy {
    pub zero_coordinate_is_missing: bool,
    pub zero_population_is_missing: bool,
}

impl Default for SentinelPolicy {
    fn default() -> Self {
        Self {
            zero_coordinate_is_missing: true,
            zero_population_is_missing: true,
        }
    }
}

/// All positional contracts in one place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    pub demographics: DemographicsColumns,
    pub news: NewsColumns,
    pub events: EventsColumns,
    pub sentinels: SentinelPolicy,
}
