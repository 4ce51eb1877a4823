//! Domain models: schemas, resolved values, and the built-in service configs.

pub mod resolved;
pub mod schema;
pub mod schema_document;
pub mod services;
pub mod value;

pub use resolved::ResolvedConfig;
pub use schema::{cached_schema, ConfigSchema, ConfigType, FieldDescriptor, FieldType, SchemaBuilder};
pub use schema_document::{FieldDocument, SchemaDocument};
pub use services::{DatabaseConfig, PoolConfig, RedisConfig};
pub use value::Value;
