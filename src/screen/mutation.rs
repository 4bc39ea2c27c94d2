//! Writes against the backend.
//!
//! A [`Mutation`] is a labelled list of steps built from already validated
//! input. Steps run in order and the first failure stops the rest. The
//! response bodies are never used to patch list state; the owning screen
//! refreshes instead.

use serde_json::Value;

use crate::error::Result;
use crate::gateway::Gateway;
use crate::query::RequestDescriptor;
use crate::resource::Resource;

#[derive(Debug, Clone, PartialEq)]
pub enum MutationStep {
    /// `POST` to the target table.
    Create { target: RequestDescriptor, body: Value },
    /// `PATCH` the rows matched by the target filter.
    Update { target: RequestDescriptor, body: Value },
    /// `DELETE` the rows matched by the target filter.
    Delete { target: RequestDescriptor },
}

impl MutationStep {
    pub fn target(&self) -> &RequestDescriptor {
        match self {
            MutationStep::Create { target, .. }
            | MutationStep::Update { target, .. }
            | MutationStep::Delete { target } => target,
        }
    }

    async fn execute(&self, gateway: &dyn Gateway) -> Result<()> {
        let path = self.target().path();
        let response = match self {
            MutationStep::Create { body, .. } => gateway.create(&path, body.clone()).await?,
            MutationStep::Update { body, .. } => gateway.update(&path, body.clone()).await?,
            MutationStep::Delete { .. } => gateway.delete(&path).await?,
        };
        response.require_success()?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    label: String,
    steps: Vec<MutationStep>,
}

impl Mutation {
    pub fn new(label: impl Into<String>) -> Self {
        Mutation {
            label: label.into(),
            steps: Vec::new(),
        }
    }

    pub fn step(mut self, step: MutationStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Confirmation text shown once the mutation succeeds.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn steps(&self) -> &[MutationStep] {
        &self.steps
    }

    /// Run every step in order, stopping at the first failure.
    pub async fn execute(&self, gateway: &dyn Gateway) -> Result<()> {
        for (index, step) in self.steps.iter().enumerate() {
            if let Err(err) = step.execute(gateway).await {
                tracing::warn!(
                    mutation = %self.label,
                    step = index + 1,
                    of = self.steps.len(),
                    error = %err,
                    "mutation step failed"
                );
                return Err(err);
            }
        }
        Ok(())
    }
}

/// Delete one row of `R` by primary key.
pub fn delete_by_id<R: Resource>(id: i64, label: impl Into<String>) -> Mutation {
    Mutation::new(label).step(MutationStep::Delete {
        target: RequestDescriptor::by_id(R::TABLE, R::ID_COLUMN, id),
    })
}
