//! egui rendering of the query layer's views.

pub mod panels;
pub mod plot;
pub mod table;
