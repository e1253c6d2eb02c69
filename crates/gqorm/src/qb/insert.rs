//! Insert mutation builders: single-row and batch.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::args::{Arguments, OnConflict};
use crate::client::Client;
use crate::error::{GqError, GqResult};
use crate::field::{Constraint, Field, FieldName, render_selection};
use crate::model::Model;
use crate::qb::{collect_vars, document, returning_block};
use crate::query::{Operation, var_map};
use crate::response::{decode_optional, decode_returning};
use crate::value::QueryVar;

/// Builder for `mutation insert_<model>_one`.
pub struct InsertOneQb<M> {
    args: Arguments<M>,
}

impl<M: Model> InsertOneQb<M> {
    pub(crate) fn new(first: Field<M>, rest: impl IntoIterator<Item = Field<M>>) -> Self {
        let mut args = Arguments::new();
        args.object = std::iter::once(first).chain(rest).collect();
        Self { args }
    }

    /// Resolve a unique-constraint conflict by updating the given columns;
    /// an empty column list suppresses the insert instead.
    pub fn on_conflict(
        mut self,
        constraint: Constraint<M>,
        update_columns: impl IntoIterator<Item = FieldName<M>>,
    ) -> Self {
        self.args.on_conflict = Some(OnConflict::new(constraint, update_columns));
        self
    }

    /// Choose the returned fields and finalize into an executable mutation.
    pub fn select(
        self,
        first: FieldName<M>,
        rest: impl IntoIterator<Item = FieldName<M>>,
    ) -> InsertOneQuery<M> {
        let vars = collect_vars(&self.args);
        InsertOneQuery {
            args: self.args,
            fields: std::iter::once(first).chain(rest).collect(),
            vars,
        }
    }
}

impl<M> Clone for InsertOneQb<M> {
    fn clone(&self) -> Self {
        Self {
            args: self.args.clone(),
        }
    }
}

/// An executable `mutation insert_<model>_one`.
pub struct InsertOneQuery<M> {
    args: Arguments<M>,
    fields: Vec<FieldName<M>>,
    vars: Vec<QueryVar>,
}

impl<M: Model> InsertOneQuery<M> {
    /// Execute and decode the inserted row. `None` means the insert was
    /// suppressed (e.g. an on-conflict no-op); that is not an error.
    pub async fn exec(&self, client: &Client) -> GqResult<Option<M>>
    where
        M: DeserializeOwned,
    {
        let body = client.execute(self).await?;
        decode_optional(&body, &format!("insert_{}_one", M::model_name()))
    }
}

impl<M: Model> Operation for InsertOneQuery<M> {
    fn query(&self) -> String {
        let root = format!("insert_{}_one", M::model_name());
        document(
            "mutation",
            &root,
            &self.vars,
            &root,
            &self.args.render(),
            &render_selection(self.fields.iter()),
        )
    }

    fn variables(&self) -> serde_json::Map<String, serde_json::Value> {
        var_map(&self.vars)
    }

    fn validate(&self) -> GqResult<()> {
        if let Some(reason) = self.args.invalid_reason() {
            return Err(GqError::build(reason));
        }
        Ok(())
    }
}

impl<M> Clone for InsertOneQuery<M> {
    fn clone(&self) -> Self {
        Self {
            args: self.args.clone(),
            fields: self.fields.clone(),
            vars: self.vars.clone(),
        }
    }
}

/// Builder for the batch `mutation insert_<model>`.
pub struct InsertQb<M> {
    args: Arguments<M>,
    build_error: Option<String>,
}

impl<M: Model + Serialize> InsertQb<M> {
    pub(crate) fn new<'a>(first: &'a M, rest: impl IntoIterator<Item = &'a M>) -> Self where M: 'a {
        let mut args: Arguments<M> = Arguments::new();
        let mut build_error = None;

        for row in std::iter::once(first).chain(rest) {
            match serde_json::to_value(row) {
                Ok(value) => args.objects.push(value),
                Err(e) => {
                    build_error.get_or_insert(format!("insert row failed to serialize: {e}"));
                }
            }
        }

        Self { args, build_error }
    }

    /// Resolve unique-constraint conflicts for every row in the batch.
    pub fn on_conflict(
        mut self,
        constraint: Constraint<M>,
        update_columns: impl IntoIterator<Item = FieldName<M>>,
    ) -> Self {
        self.args.on_conflict = Some(OnConflict::new(constraint, update_columns));
        self
    }

    /// Choose the returned fields and finalize into an executable mutation.
    pub fn select(
        self,
        first: FieldName<M>,
        rest: impl IntoIterator<Item = FieldName<M>>,
    ) -> InsertQuery<M> {
        InsertQuery {
            args: self.args,
            fields: std::iter::once(first).chain(rest).collect(),
            build_error: self.build_error,
        }
    }
}

impl<M> Clone for InsertQb<M> {
    fn clone(&self) -> Self {
        Self {
            args: self.args.clone(),
            build_error: self.build_error.clone(),
        }
    }
}

/// An executable batch `mutation insert_<model>`.
pub struct InsertQuery<M> {
    args: Arguments<M>,
    fields: Vec<FieldName<M>>,
    build_error: Option<String>,
}

impl<M: Model> InsertQuery<M> {
    /// Execute and decode the inserted rows from `returning`.
    pub async fn exec(&self, client: &Client) -> GqResult<Vec<M>>
    where
        M: DeserializeOwned,
    {
        let body = client.execute(self).await?;
        decode_returning(&body, &format!("insert_{}", M::model_name()))
    }
}

impl<M: Model> Operation for InsertQuery<M> {
    fn query(&self) -> String {
        let root = format!("insert_{}", M::model_name());
        document(
            "mutation",
            &root,
            &[],
            &root,
            &self.args.render(),
            &returning_block(&render_selection(self.fields.iter())),
        )
    }

    fn variables(&self) -> serde_json::Map<String, serde_json::Value> {
        serde_json::Map::new()
    }

    fn validate(&self) -> GqResult<()> {
        if let Some(ref reason) = self.build_error {
            return Err(GqError::build(reason));
        }
        Ok(())
    }
}

impl<M> Clone for InsertQuery<M> {
    fn clone(&self) -> Self {
        Self {
            args: self.args.clone(),
            fields: self.fields.clone(),
            build_error: self.build_error.clone(),
        }
    }
}
