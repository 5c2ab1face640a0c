//! Response envelopes.
//!
//! Collections are wrapped as `{ "data": [...] }`, paginated collections as
//! `{ "data": [...], "pagination": {...} }`. Single entities are returned bare.

use myco_core::pagination::{PageMeta, PageRequest};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub data: Vec<T>,
    pub pagination: PageMeta,
}

impl<T: Serialize> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: i64, request: &PageRequest) -> Self {
        Self {
            data,
            pagination: PageMeta::new(total, request),
        }
    }
}
