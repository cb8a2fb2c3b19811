// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for the engine crate.

use crate::builder::{BuildContext, TemplateRenderer};
use crate::resolver::ResolvedInputs;
use ws_core::{StorageSpec, Workspace, WorkspaceAccessStrategy};

/// Owns everything a [`BuildContext`] borrows.
pub(crate) struct BuildFixture {
    pub workspace: Workspace,
    pub inputs: ResolvedInputs,
    pub strategy: Option<WorkspaceAccessStrategy>,
    pub renderer: TemplateRenderer,
}

impl BuildFixture {
    pub fn new(workspace: Workspace) -> Self {
        let inputs = ResolvedInputs::resolve(&workspace, None).unwrap();
        Self {
            workspace,
            inputs,
            strategy: None,
            renderer: TemplateRenderer::new(),
        }
    }

    pub fn with_strategy(mut self, strategy: WorkspaceAccessStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Request a default home volume and re-resolve inputs.
    pub fn with_storage(mut self) -> Self {
        self.workspace.spec.storage = Some(StorageSpec::default());
        self.inputs = ResolvedInputs::resolve(&self.workspace, None).unwrap();
        self
    }

    pub fn ctx(&self) -> BuildContext<'_> {
        BuildContext {
            workspace: &self.workspace,
            inputs: &self.inputs,
            access_strategy: self.strategy.as_ref(),
            renderer: &self.renderer,
        }
    }
}
