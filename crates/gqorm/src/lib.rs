//! # gqorm
//!
//! A typed query builder and client for Hasura-style auto-generated CRUD
//! GraphQL schemas.
//!
//! ## Features
//!
//! - **Typed builders**: Get / InsertOne / Insert / Update / Delete chains
//!   over generated per-model field accessors
//! - **Compile-time scoping**: field handles are phantom-typed, so fields of
//!   different models cannot be mixed in one query
//! - **Deterministic rendering**: one document text and one variables map
//!   per finalized query, byte-identical on every render
//! - **Safe defaults**: UPDATE and DELETE without a filter match nothing
//! - **Thin transport**: one `reqwest` POST per execution, with redirect,
//!   failure-status, decode and GraphQL-level errors kept distinct
//!
//! ## Query builders
//!
//! ```ignore
//! use gqorm::{Client, Where};
//!
//! let client = Client::new("https://example.hasura.app/v1/graphql")?;
//!
//! // SELECT
//! let users = gqorm::get::<User>()
//!     .limit(10)
//!     .filter(Where::eq(User::state(Value::enum_token("active"))))
//!     .select(User::id_field(), [User::name_field()])
//!     .exec(&client)
//!     .await?;
//!
//! // INSERT
//! let inserted = gqorm::insert_one(User::name("alice"), [User::age(30)])
//!     .on_conflict(User::primary_key(), [User::age_field()])
//!     .select(User::id_field(), [])
//!     .exec(&client)
//!     .await?;
//!
//! // UPDATE
//! let updated = gqorm::update::<User>()
//!     .filter(Where::eq(User::id(user_id)))
//!     .set([User::name("bob")])
//!     .select(User::id_field(), [User::name_field()])
//!     .exec(&client)
//!     .await?;
//!
//! // DELETE
//! let deleted = gqorm::delete::<User>()
//!     .filter(Where::eq(User::id(user_id)))
//!     .select(User::id_field(), [])
//!     .exec(&client)
//!     .await?;
//! ```

pub mod args;
pub mod client;
pub mod error;
pub mod expr;
pub mod field;
pub mod model;
pub mod qb;
pub mod query;
pub mod response;
pub mod value;

pub use args::OnConflict;
pub use client::{Client, ClientBuilder};
pub use error::{GqError, GqResult};
pub use expr::Where;
pub use field::{Constraint, Field, FieldName, OrderBy, OrderByExpr};
pub use model::Model;
pub use query::Operation;
pub use response::GraphqlError;
pub use value::{QueryVar, Value};

// Re-export qb constructors for easy access
pub use qb::{
    delete, get, insert, insert_one, update, DeleteQb, DeleteQuery, GetQb, GetQuery, InsertOneQb,
    InsertOneQuery, InsertQb, InsertQuery, UpdateQb, UpdateQuery,
};

#[cfg(feature = "derive")]
pub use gqorm_derive::Model;

/// Commonly used items, in one import.
pub mod prelude {
    pub use crate::client::Client;
    pub use crate::error::{GqError, GqResult};
    pub use crate::expr::Where;
    pub use crate::field::{Constraint, Field, FieldName, OrderBy};
    pub use crate::model::Model;
    pub use crate::qb::{delete, get, insert, insert_one, update};
    pub use crate::query::Operation;
    pub use crate::value::{QueryVar, Value};
}
