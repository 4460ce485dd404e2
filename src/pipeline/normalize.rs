// src/pipeline/normalize.rs
//! Positional row → typed record.
//!
//! A row shorter than the layout's `min_columns` yields `None`. Cells past the
//! end of a long-enough row read as empty, so they trim to `""` and coerce to 0.

use crate::coerce::{coerce_integer, coerce_number};
use crate::columns::{DemographicsColumns, HeadlineColumns};
use crate::records::{EventRecord, LocationRecord, NewsRecord};

fn cell(row: &[String], idx: usize) -> Option<&str> {
    row.get(idx).map(String::as_str)
}

fn text(row: &[String], idx: usize) -> String {
    cell(row, idx).unwrap_or_default().trim().to_string()
}

fn number(row: &[String], idx: usize) -> f64 {
    coerce_number(cell(row, idx), 0.0)
}

fn count(row: &[String], idx: usize) -> i64 {
    coerce_integer(cell(row, idx), 0)
}

/// Blank links become `None`.
fn link(row: &[String], idx: usize) -> Option<String> {
    Some(text(row, idx)).filter(|s| !s.is_empty())
}

pub fn normalize_location(row: &[String], cols: &DemographicsColumns) -> Option<LocationRecord> {
    if row.len() < cols.min_columns {
        return None;
    }
    Some(LocationRecord {
        departamento: text(row, cols.departamento),
        lat: number(row, cols.lat),
        lng: number(row, cols.lng),
        poblacion: count(row, cols.poblacion),
        escuelas: count(row, cols.escuelas),
        hospitales: count(row, cols.hospitales),
        presupuesto: number(row, cols.presupuesto),
        audiencia_fb_a: number(row, cols.audiencia_fb_a),
        audiencia_fb_b: number(row, cols.audiencia_fb_b),
        audiencia_gmp: number(row, cols.audiencia_gmp),
        whatsapp: number(row, cols.whatsapp),
        analisis: text(row, cols.analisis),
        recomendaciones: text(row, cols.recomendaciones),
        conclusiones: text(row, cols.conclusiones),
    })
}

pub fn normalize_news(row: &[String], cols: &HeadlineColumns) -> Option<NewsRecord> {
    if row.len() < cols.min_columns {
        return None;
    }
    Some(NewsRecord {
        departamento: text(row, cols.departamento),
        titulo: text(row, cols.headline),
        enlace: link(row, cols.enlace),
    })
}

pub fn normalize_event(row: &[String], cols: &HeadlineColumns) -> Option<EventRecord> {
    if row.len() < cols.min_columns {
        return None;
    }
    Some(EventRecord {
        departamento: text(row, cols.departamento),
        evento: text(row, cols.headline),
        enlace: link(row, cols.enlace),
    })
}
