//! Update mutation builder.

use serde::de::DeserializeOwned;

use crate::args::Arguments;
use crate::client::Client;
use crate::error::{GqError, GqResult};
use crate::expr::Where;
use crate::field::{Field, FieldName, render_selection};
use crate::model::Model;
use crate::qb::{collect_vars, document, returning_block};
use crate::query::{Operation, var_map};
use crate::response::decode_returning;
use crate::value::QueryVar;

/// Builder for `mutation update_<model>`.
pub struct UpdateQb<M> {
    args: Arguments<M>,
}

impl<M: Model> UpdateQb<M> {
    pub(crate) fn new() -> Self {
        Self {
            args: Arguments::new(),
        }
    }

    /// Filter the rows to update. Reapplying replaces the previous filter.
    pub fn filter(mut self, where_: Where<M>) -> Self {
        self.args.where_ = Some(where_);
        self
    }

    /// The `_set` payload. Variable-valued fields register as typed query
    /// variables, which is how enum- and JSON-typed columns whose literal
    /// syntax differs from plain scalars are updated.
    pub fn set(mut self, fields: impl IntoIterator<Item = Field<M>>) -> Self {
        self.args.set = fields.into_iter().collect();
        self
    }

    /// Choose the returned fields and finalize into an executable mutation.
    pub fn select(
        mut self,
        first: FieldName<M>,
        rest: impl IntoIterator<Item = FieldName<M>>,
    ) -> UpdateQuery<M> {
        // A missing filter matches nothing, never the whole table.
        if deny_all_needed(&self.args.where_) {
            self.args.where_ = Some(Where::not(Where::default()));
        }
        let vars = collect_vars(&self.args);
        UpdateQuery {
            args: self.args,
            fields: std::iter::once(first).chain(rest).collect(),
            vars,
        }
    }
}

impl<M> Clone for UpdateQb<M> {
    fn clone(&self) -> Self {
        Self {
            args: self.args.clone(),
        }
    }
}

/// Whether the configured filter is absent and must fall back to deny-all.
pub(crate) fn deny_all_needed<M>(where_: &Option<Where<M>>) -> bool {
    match where_ {
        None => true,
        Some(w) => w.render().is_empty(),
    }
}

/// An executable `mutation update_<model>`.
pub struct UpdateQuery<M> {
    args: Arguments<M>,
    fields: Vec<FieldName<M>>,
    vars: Vec<QueryVar>,
}

impl<M: Model> UpdateQuery<M> {
    /// Execute and decode the updated rows from `returning`.
    pub async fn exec(&self, client: &Client) -> GqResult<Vec<M>>
    where
        M: DeserializeOwned,
    {
        let body = client.execute(self).await?;
        decode_returning(&body, &format!("update_{}", M::model_name()))
    }
}

impl<M: Model> Operation for UpdateQuery<M> {
    fn query(&self) -> String {
        let root = format!("update_{}", M::model_name());
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
        if self.args.set.is_empty() {
            return Err(GqError::build("update requires at least one _set field"));
        }
        if let Some(reason) = self.args.invalid_reason() {
            return Err(GqError::build(reason));
        }
        Ok(())
    }
}

impl<M> Clone for UpdateQuery<M> {
    fn clone(&self) -> Self {
        Self {
            args: self.args.clone(),
            fields: self.fields.clone(),
            vars: self.vars.clone(),
        }
    }
}
