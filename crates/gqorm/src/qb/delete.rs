//! Delete mutation builder.

use serde::de::DeserializeOwned;

use crate::args::Arguments;
use crate::client::Client;
use crate::error::{GqError, GqResult};
use crate::expr::Where;
use crate::field::{FieldName, render_selection};
use crate::model::Model;
use crate::qb::update::deny_all_needed;
use crate::qb::{collect_vars, document, returning_block};
use crate::query::{Operation, var_map};
use crate::response::decode_returning;
use crate::value::QueryVar;

/// Builder for `mutation delete_<model>`.
pub struct DeleteQb<M> {
    args: Arguments<M>,
    allow_delete_all: bool,
}

impl<M: Model> DeleteQb<M> {
    pub(crate) fn new() -> Self {
        Self {
            args: Arguments::new(),
            allow_delete_all: false,
        }
    }

    /// Filter the rows to delete. Reapplying replaces the previous filter.
    pub fn filter(mut self, where_: Where<M>) -> Self {
        self.args.where_ = Some(where_);
        self
    }

    /// Allow a delete without a filter to match every row.
    ///
    /// Without this, a filterless delete renders `where: {_not: {}}` and
    /// matches nothing.
    pub fn allow_delete_all(mut self, allow: bool) -> Self {
        self.allow_delete_all = allow;
        self
    }

    /// Choose the returned fields and finalize into an executable mutation.
    pub fn select(
        mut self,
        first: FieldName<M>,
        rest: impl IntoIterator<Item = FieldName<M>>,
    ) -> DeleteQuery<M> {
        if deny_all_needed(&self.args.where_) {
            self.args.where_ = Some(if self.allow_delete_all {
                Where::default()
            } else {
                Where::not(Where::default())
            });
        }
        let vars = collect_vars(&self.args);
        DeleteQuery {
            args: self.args,
            fields: std::iter::once(first).chain(rest).collect(),
            vars,
        }
    }
}

impl<M> Clone for DeleteQb<M> {
    fn clone(&self) -> Self {
        Self {
            args: self.args.clone(),
            allow_delete_all: self.allow_delete_all,
        }
    }
}

/// An executable `mutation delete_<model>`.
pub struct DeleteQuery<M> {
    args: Arguments<M>,
    fields: Vec<FieldName<M>>,
    vars: Vec<QueryVar>,
}

impl<M: Model> DeleteQuery<M> {
    /// Execute and decode the deleted rows from `returning`. Zero matches
    /// is an empty list.
    pub async fn exec(&self, client: &Client) -> GqResult<Vec<M>>
    where
        M: DeserializeOwned,
    {
        let body = client.execute(self).await?;
        decode_returning(&body, &format!("delete_{}", M::model_name()))
    }
}

impl<M: Model> Operation for DeleteQuery<M> {
    fn query(&self) -> String {
        let root = format!("delete_{}", M::model_name());
        document(
            "mutation",
            &root,
            &self.vars,
            &root,
            &self.args.render(),
            &returning_block(&render_selection(self.fields.iter())),
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

impl<M> Clone for DeleteQuery<M> {
    fn clone(&self) -> Self {
        Self {
            args: self.args.clone(),
            fields: self.fields.clone(),
            vars: self.vars.clone(),
        }
    }
}
