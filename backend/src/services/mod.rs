//! Module for core business logic services.
//!
//! This module encapsulates services that sit between the HTTP handlers and
//! the outside world: building the provider clients from configuration,
//! sending notifications, aggregating billing events and preparing landing
//! page content.

pub mod integrations;
pub mod notifier;
pub mod data_aggregator;
pub mod landing;
