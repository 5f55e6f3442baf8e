//! # IO Module
//!
//! Provides the interface layer between callers and the domain logic.
//!
//! This module serves as the adapter layer that translates HTTP requests into
//! domain operations and formats domain responses for consumption. It handles
//! the communication protocol (REST API), serialization/deserialization, and
//! maintains the boundary between the transport layer and business logic.
//!
//! ## Key Responsibilities
//!
//! - **API Endpoints**: Exposing REST API endpoints for frontend consumption
//! - **Request/Response Handling**: Processing HTTP requests and formatting responses
//! - **Data Serialization**: Converting between JSON and domain objects
//! - **Error Translation**: Converting domain errors to appropriate HTTP status codes
//! - **CORS Management**: Handling cross-origin requests for web frontend
//!
//! ## Current Implementation
//!
//! - **Web Framework**: Axum for high-performance async HTTP handling
//! - **Serialization**: Serde for JSON serialization/deserialization
//! - **State Management**: Axum extractors for dependency injection
//! - **Error Handling**: Structured error responses with appropriate HTTP codes

pub mod rest;

pub use rest::*;
