// src/pipeline/validate.rs
//! Admissibility predicates. Records are kept or dropped as they are; nothing
//! here repairs or fills in a field.

use crate::columns::SentinelPolicy;
use crate::records::{EventRecord, LocationRecord, NewsRecord};

pub fn location_admissible(r: &LocationRecord, policy: &SentinelPolicy) -> bool {
    if r.departamento.is_empty() {
        return false;
    }
    if !r.lat.is_finite() || !r.lng.is_finite() {
        return false;
    }
    if policy.zero_coordinate_is_missing && (r.lat == 0.0 || r.lng == 0.0) {
        return false;
    }
    if policy.zero_population_is_missing {
        r.poblacion > 0
    } else {
        r.poblacion >= 0
    }
}

pub fn news_admissible(r: &NewsRecord) -> bool {
    !r.departamento.is_empty() && !r.titulo.is_empty()
}

pub fn event_admissible(r: &EventRecord) -> bool {
    !r.departamento.is_empty() && !r.evento.is_empty()
}
