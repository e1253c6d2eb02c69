//! Get (select) query builder.

use serde::de::DeserializeOwned;

use crate::args::Arguments;
use crate::client::Client;
use crate::error::{GqError, GqResult};
use crate::expr::Where;
use crate::field::{FieldName, OrderByExpr, render_selection};
use crate::model::Model;
use crate::qb::{collect_vars, document};
use crate::query::{Operation, var_map};
use crate::response::decode_list;
use crate::value::QueryVar;

/// Builder for `query get_<model>`.
pub struct GetQb<M> {
    args: Arguments<M>,
}

impl<M: Model> GetQb<M> {
    pub(crate) fn new() -> Self {
        Self {
            args: Arguments::new(),
        }
    }

    /// Cap the number of returned rows.
    pub fn limit(mut self, n: u32) -> Self {
        self.args.limit = Some(n);
        self
    }

    /// Skip the first `n` rows.
    pub fn offset(mut self, n: u32) -> Self {
        self.args.offset = Some(n);
        self
    }

    /// Return only rows distinct on `field`.
    pub fn distinct_on(mut self, field: FieldName<M>) -> Self {
        self.args.distinct_on = Some(field);
        self
    }

    /// Order results; expressions apply in the given order.
    pub fn order_by(mut self, exprs: impl IntoIterator<Item = OrderByExpr<M>>) -> Self {
        self.args.order_by = exprs.into_iter().collect();
        self
    }

    /// Filter rows. Reapplying replaces the previous filter.
    pub fn filter(mut self, where_: Where<M>) -> Self {
        self.args.where_ = Some(where_);
        self
    }

    /// Choose the output fields and finalize into an executable query.
    pub fn select(
        self,
        first: FieldName<M>,
        rest: impl IntoIterator<Item = FieldName<M>>,
    ) -> GetQuery<M> {
        let vars = collect_vars(&self.args);
        GetQuery {
            args: self.args,
            fields: std::iter::once(first).chain(rest).collect(),
            vars,
        }
    }
}

impl<M> Clone for GetQb<M> {
    fn clone(&self) -> Self {
        Self {
            args: self.args.clone(),
        }
    }
}

/// An executable `query get_<model>`.
pub struct GetQuery<M> {
    args: Arguments<M>,
    fields: Vec<FieldName<M>>,
    vars: Vec<QueryVar>,
}

impl<M: Model> GetQuery<M> {
    /// Execute and decode the matching rows. Zero matches is an empty list.
    pub async fn exec(&self, client: &Client) -> GqResult<Vec<M>>
    where
        M: DeserializeOwned,
    {
        let body = client.execute(self).await?;
        decode_list(&body, M::model_name())
    }
}

impl<M: Model> Operation for GetQuery<M> {
    fn query(&self) -> String {
        let model = M::model_name();
        document(
            "query",
            &format!("get_{model}"),
            &self.vars,
            model,
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

impl<M> Clone for GetQuery<M> {
    fn clone(&self) -> Self {
        Self {
            args: self.args.clone(),
            fields: self.fields.clone(),
            vars: self.vars.clone(),
        }
    }
}
