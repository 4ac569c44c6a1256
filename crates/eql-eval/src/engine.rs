//! EQL evaluation engine
//!
//! The engine walks one statement at a time in post-order and runs a single
//! rule per node kind. Leaf and composite rules only store values in the
//! context's attribute table; the two statement rules are the only ones with
//! side effects (installing a connection, executing a search).

use crate::connection::{evaluate_connect, host_port};
use crate::query::evaluate_query;
use crate::walk::post_order;
use crate::{
    filter, query, Attribute, ConnectivePolicy, EvalError, EvalResult, EvaluationContext,
    QueryRequest,
};
use eql_ast::{ConnectStmt, NodeId, NodeKind, ParseTree, QueryStmt};
use eql_cluster::{ClusterConnection, HostPort, SearchResponse};
use serde::Serialize;

/// Engine configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineOptions {
    pub connective_policy: ConnectivePolicy,
}

/// A statement with every rule below it evaluated, ready to run
#[derive(Debug, Clone, PartialEq)]
pub enum StatementPlan {
    Connect {
        cluster_name: Option<String>,
        hosts: Vec<HostPort>,
    },
    Query(QueryRequest),
}

/// Result of running one statement
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "statement", rename_all = "snake_case")]
pub enum StatementOutcome {
    Connected {
        cluster_name: Option<String>,
        endpoints: Vec<HostPort>,
    },
    Queried {
        request: QueryRequest,
        response: SearchResponse,
    },
}

/// EQL evaluation engine
#[derive(Debug, Clone, Default)]
pub struct EqlEngine {
    options: EngineOptions,
}

impl EqlEngine {
    /// Create an engine with default options
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EngineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Evaluate every statement of a script in order
    ///
    /// Stops at the first failing statement; outcomes of the statements
    /// before it are discarded with the error.
    pub fn evaluate_script(
        &self,
        tree: &ParseTree,
        ctx: &mut EvaluationContext,
    ) -> EvalResult<Vec<StatementOutcome>> {
        ctx.reset_attributes();
        tree.statements()
            .iter()
            .map(|stmt| self.evaluate_statement(tree, *stmt, ctx))
            .collect()
    }

    /// Evaluate one statement of `tree`
    pub fn evaluate_statement(
        &self,
        tree: &ParseTree,
        stmt: NodeId,
        ctx: &mut EvaluationContext,
    ) -> EvalResult<StatementOutcome> {
        let plan = self.plan_statement(tree, stmt, ctx)?;
        self.execute_plan(plan, ctx)
    }

    /// Run every rule of a statement except its side effect
    pub fn plan_statement(
        &self,
        tree: &ParseTree,
        stmt: NodeId,
        ctx: &mut EvaluationContext,
    ) -> EvalResult<StatementPlan> {
        for id in post_order(tree, stmt) {
            if id != stmt {
                self.evaluate_node(tree, id, ctx)?;
            }
        }

        let node = tree
            .get(stmt)
            .ok_or_else(|| EvalError::missing_attribute(stmt, "statement"))?;
        log::debug!("{} {}", node.kind.name(), stmt);
        match &node.kind {
            NodeKind::ConnectStmt(connect) => connect_plan(connect, ctx),
            NodeKind::QueryStmt(query) => query_plan(query, ctx).map(StatementPlan::Query),
            _ => Err(EvalError::missing_attribute(stmt, "statement")),
        }
    }

    /// Carry out a planned statement
    pub fn execute_plan(
        &self,
        plan: StatementPlan,
        ctx: &mut EvaluationContext,
    ) -> EvalResult<StatementOutcome> {
        match plan {
            StatementPlan::Connect {
                cluster_name,
                hosts,
            } => {
                let connection = self.evaluate_connect(ctx, cluster_name.as_deref(), &hosts);
                Ok(StatementOutcome::Connected {
                    cluster_name: connection.cluster_name().map(str::to_string),
                    endpoints: connection.endpoints().to_vec(),
                })
            }
            StatementPlan::Query(request) => {
                let response = self.evaluate_query(ctx, &request)?;
                Ok(StatementOutcome::Queried { request, response })
            }
        }
    }

    /// Replace the active connection with one to `hosts`
    pub fn evaluate_connect<'a>(
        &self,
        ctx: &'a mut EvaluationContext,
        cluster_name: Option<&str>,
        hosts: &[HostPort],
    ) -> &'a ClusterConnection {
        evaluate_connect(ctx, cluster_name, hosts)
    }

    /// Execute a query on the active connection
    pub fn evaluate_query(
        &self,
        ctx: &EvaluationContext,
        request: &QueryRequest,
    ) -> EvalResult<SearchResponse> {
        evaluate_query(ctx, request)
    }

    /// Run the rule for one non-statement node and store its value
    fn evaluate_node(
        &self,
        tree: &ParseTree,
        id: NodeId,
        ctx: &mut EvaluationContext,
    ) -> EvalResult<()> {
        let node = tree
            .get(id)
            .ok_or_else(|| EvalError::missing_attribute(id, "node"))?;
        let attrs = ctx.attributes();
        let value = match &node.kind {
            NodeKind::HostPort(hp) => Attribute::Endpoint(host_port(hp)?),
            NodeKind::FieldList(fields) => Attribute::Fields(query::field_list(fields)),
            NodeKind::FilterStmt(stmt) => Attribute::Filter(attrs.filter(stmt.predicate)?.clone()),
            NodeKind::FilterPred(pred) => Attribute::Filter(filter::predicate(pred, attrs)?),
            NodeKind::FilterRest(rest) => {
                Attribute::Filter(filter::rest(id, rest, attrs, self.options.connective_policy)?)
            }
            NodeKind::ReturnStmt(ret) => Attribute::Page(query::page(ret)?),
            NodeKind::SortStmt(sort) => Attribute::Sort(query::sort(sort, attrs)?),
            NodeKind::SortOrder(order) => Attribute::Direction(query::sort_order(order)),
            // Statements nest only at the top level
            NodeKind::ConnectStmt(_) | NodeKind::QueryStmt(_) => return Ok(()),
        };
        log::debug!("{} {} -> {:?}", node.kind.name(), id, value);
        ctx.attributes_mut().set_value(id, value);
        Ok(())
    }
}

fn connect_plan(connect: &ConnectStmt, ctx: &EvaluationContext) -> EvalResult<StatementPlan> {
    let attrs = ctx.attributes();
    let hosts = connect
        .hosts
        .iter()
        .map(|id| attrs.endpoint(*id).cloned())
        .collect::<EvalResult<Vec<_>>>()?;
    Ok(StatementPlan::Connect {
        cluster_name: connect.cluster_name.as_ref().map(|name| name.text.clone()),
        hosts,
    })
}

fn query_plan(query: &QueryStmt, ctx: &EvaluationContext) -> EvalResult<QueryRequest> {
    let attrs = ctx.attributes();
    Ok(QueryRequest {
        target: query.key.text.clone(),
        filter: query.filter.map(|id| attrs.filter(id).cloned()).transpose()?,
        fields: query
            .fields
            .map(|id| attrs.fields(id).map(<[String]>::to_vec))
            .transpose()?
            .unwrap_or_default(),
        sort: query
            .sort
            .map(|id| attrs.sort(id).cloned())
            .transpose()?
            .unwrap_or_default(),
        page: query.page.map(|id| attrs.page(id)).transpose()?.unwrap_or_default(),
    })
}
