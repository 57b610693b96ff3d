//! Model gateway crate for quizrag.
//!
//! This crate owns every conversation with the generative model:
//! - **Schema registry**: response shapes as data, used both on the wire and
//!   to validate what comes back
//! - **Clients**: a provider-agnostic [`LlmClient`] trait with a Gemini
//!   implementation and a scripted mock
//! - **Gateway**: [`ModelGateway`], which turns a prompt into checked text,
//!   JSON or typed values
//!
//! # Example
//! ```no_run
//! use quizrag_llm::{GatewayConfig, ModelGateway, SchemaId};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GatewayConfig::new(std::env::var("GEMINI_API_KEY").ok());
//! let gateway = ModelGateway::from_config(&config);
//! let topics = gateway
//!     .generate_json("List the course topics as a JSON array", SchemaId::TopicList)
//!     .await?;
//! println!("{}", topics);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod gateway;
pub mod providers;
pub mod schema;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use gateway::ModelGateway;
pub use providers::{GeminiClient, MockClient, MockReply};
pub use schema::{ResponseSchema, SchemaId};
pub use types::{GatewayConfig, ProviderType};
