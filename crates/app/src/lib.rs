//! Catalog controller, storage seam and composition root for the Stockroom admin panel.

pub mod catalog;
pub mod confirm;
pub mod context;
pub mod notifications;
pub mod storage;
