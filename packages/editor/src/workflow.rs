//! # Compile Workflow
//!
//! Drives the two-phase compile flow over one explicitly owned
//! [`WorkflowState`].
//!
//! ```text
//!            compile_direct ──────────────┐
//!   Editing ─┤                            ├─► compile service
//!      ▲     └ request_advanced_placement │
//!      │              ▼                   │
//!      └──── PlacementAdjustment ─────────┘
//!  return_to_editing      confirm_placement (always merges placement)
//! ```
//!
//! Every remote round trip is split into a `begin_*` step that validates the
//! state and builds the request, and a `finish_*` step that applies the
//! response. The async helpers compose the two around a service call; hosts
//! that perform the call themselves (the browser bindings) drive the phases
//! directly so no borrow of the state is held across the network wait.

use crate::config::EditorConfig;
use crate::document::{DocumentKind, DocumentStore, EditingSurface};
use crate::errors::{ServiceError, WorkflowError};
use crate::import::{ImportOutcome, ImportedFile};
use crate::placement::{
    merge_placement, seed_rectangles, CoordinateTransform, PlacementBoundary, Rect,
};
use crate::services::{
    BoundaryRequest, BoundaryResponse, BoundaryService, CompileOptions, CompileRequest,
    CompileResponse, CompileService, Quality,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewState {
    #[default]
    Editing,
    PlacementAdjustment,
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewState::Editing => f.write_str("editing"),
            ViewState::PlacementAdjustment => f.write_str("placement adjustment"),
        }
    }
}

/// Dismissible failure message, one entry per line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub lines: Vec<String>,
}

impl Notice {
    /// `None` for an empty message: there is nothing to show
    pub fn from_message(message: &str) -> Option<Self> {
        if message.is_empty() {
            return None;
        }
        Some(Self {
            lines: message.split('\n').map(str::to_string).collect(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CompileOutcome {
    Succeeded { data: Option<Value> },
    Failed(Option<Notice>),
}

/// All mutable page state
#[derive(Debug, Clone)]
pub struct WorkflowState {
    documents: DocumentStore,
    options: CompileOptions,
    view: ViewState,
    boundary: PlacementBoundary,
    busy: bool,
    notice: Option<Notice>,
}

impl WorkflowState {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            documents: DocumentStore::from_config(config),
            options: CompileOptions::default(),
            view: ViewState::Editing,
            boundary: PlacementBoundary::new(),
            busy: false,
            notice: None,
        }
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    pub fn documents_mut(&mut self) -> &mut DocumentStore {
        &mut self.documents
    }

    pub fn options(&self) -> CompileOptions {
        self.options
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn boundary(&self) -> &PlacementBoundary {
        &self.boundary
    }

    /// True while a compile request is in flight
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    fn require_view(&self, expected: ViewState) -> Result<(), WorkflowError> {
        if self.view == expected {
            Ok(())
        } else {
            Err(WorkflowError::WrongView {
                expected,
                actual: self.view,
            })
        }
    }

    fn require_idle(&self) -> Result<(), WorkflowError> {
        if self.busy {
            Err(WorkflowError::SubmissionInFlight)
        } else {
            Ok(())
        }
    }
}

/// Workflow controller: configuration plus the coordinate transform
#[derive(Debug, Clone)]
pub struct Workflow<T> {
    config: EditorConfig,
    transform: T,
}

impl<T: CoordinateTransform> Workflow<T> {
    pub fn new(config: EditorConfig, transform: T) -> Self {
        Self { config, transform }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn new_state(&self) -> WorkflowState {
        WorkflowState::new(&self.config)
    }

    // --- documents -------------------------------------------------------

    pub fn switch_active_to(
        &self,
        state: &mut WorkflowState,
        target: DocumentKind,
        surface: &mut dyn EditingSurface,
    ) {
        state.documents.switch_active_to(target, surface);
    }

    pub fn import_files(
        &self,
        state: &mut WorkflowState,
        files: impl IntoIterator<Item = ImportedFile>,
        surface: &mut dyn EditingSurface,
    ) -> Vec<ImportOutcome> {
        state.documents.import_files(files, &self.config, surface)
    }

    // --- options ---------------------------------------------------------

    pub fn toggle_generate_python(&self, state: &mut WorkflowState) {
        state.options.generate_python = !state.options.generate_python;
    }

    pub fn set_quality(&self, state: &mut WorkflowState, quality: Quality) {
        state.options.quality = quality;
    }

    pub fn set_hide_code(
        &self,
        state: &mut WorkflowState,
        value: bool,
        surface: &mut dyn EditingSurface,
    ) {
        state.options.hide_code = value;
        state.documents.set_hide_code(value, surface);
    }

    pub fn toggle_hide_code(&self, state: &mut WorkflowState, surface: &mut dyn EditingSurface) {
        let value = !state.options.hide_code;
        self.set_hide_code(state, value, surface);
    }

    // --- compile ---------------------------------------------------------

    /// Build the direct-compile request and mark the page busy.
    ///
    /// Placement is merged only when a boundary is already held, which is
    /// the case after returning from the placement view.
    pub fn begin_compile(
        &self,
        state: &mut WorkflowState,
        surface: &dyn EditingSurface,
    ) -> Result<CompileRequest, WorkflowError> {
        state.require_view(ViewState::Editing)?;
        let merge = !state.boundary.is_empty();
        self.begin_submission(state, surface, merge)
    }

    /// Build the compile request for the placement view, always folding the
    /// current boundary into the style configuration
    pub fn begin_confirm_placement(
        &self,
        state: &mut WorkflowState,
        surface: &dyn EditingSurface,
    ) -> Result<CompileRequest, WorkflowError> {
        state.require_view(ViewState::PlacementAdjustment)?;
        self.begin_submission(state, surface, true)
    }

    fn begin_submission(
        &self,
        state: &mut WorkflowState,
        surface: &dyn EditingSurface,
        merge: bool,
    ) -> Result<CompileRequest, WorkflowError> {
        state.require_idle()?;

        let program = state.documents.read_program_source(surface);
        let mut style = state.documents.read_style_config(surface);

        if merge {
            style = merge_placement(
                &state.boundary,
                &style,
                self.config.canvas(),
                &self.transform,
            )?;
        }

        if style.is_empty() {
            style = DocumentKind::StyleConfig.empty_text().to_string();
        }

        state.busy = true;
        tracing::info!(
            "Submitting {} for compilation (quality={}, placement={})",
            self.config.animation_name,
            state.options.quality,
            merge
        );

        Ok(CompileRequest {
            program,
            style,
            name: self.config.animation_name.clone(),
            generate_python: state.options.generate_python,
            quality: state.options.quality,
        })
    }

    /// Apply the compile service's answer and clear the busy flag
    pub fn finish_compile(
        &self,
        state: &mut WorkflowState,
        response: Result<CompileResponse, ServiceError>,
    ) -> Result<CompileOutcome, WorkflowError> {
        state.busy = false;

        let response = response?;
        if response.success {
            tracing::info!("Compilation succeeded");
            state.notice = None;
            Ok(CompileOutcome::Succeeded {
                data: response.data,
            })
        } else {
            tracing::info!("Compilation failed: {}", response.message);
            let notice = Notice::from_message(&response.message);
            state.notice = notice.clone();
            Ok(CompileOutcome::Failed(notice))
        }
    }

    /// Release the busy flag for a compile request that never got an answer
    pub fn abort_compile(&self, state: &mut WorkflowState, error: &ServiceError) {
        if state.busy {
            tracing::warn!("Compile request abandoned: {}", error);
            state.busy = false;
        }
    }

    pub async fn compile_direct(
        &self,
        state: &mut WorkflowState,
        surface: &dyn EditingSurface,
        service: &dyn CompileService,
    ) -> Result<CompileOutcome, WorkflowError> {
        let request = self.begin_compile(state, surface)?;
        let response = service.compile(&request).await;
        self.finish_compile(state, response)
    }

    /// Compile with the adjusted placement; the page stays on the placement
    /// view whatever the outcome
    pub async fn confirm_placement(
        &self,
        state: &mut WorkflowState,
        surface: &dyn EditingSurface,
        service: &dyn CompileService,
    ) -> Result<CompileOutcome, WorkflowError> {
        let request = self.begin_confirm_placement(state, surface)?;
        let response = service.compile(&request).await;
        self.finish_compile(state, response)
    }

    // --- placement -------------------------------------------------------

    pub fn begin_advanced_placement(
        &self,
        state: &mut WorkflowState,
        surface: &dyn EditingSurface,
    ) -> Result<BoundaryRequest, WorkflowError> {
        state.require_view(ViewState::Editing)?;
        state.require_idle()?;

        Ok(BoundaryRequest {
            program: state.documents.read_program_source(surface),
            style: state.documents.read_style_config(surface),
        })
    }

    /// Store the suggested boundary and move to the placement view
    pub fn finish_advanced_placement(
        &self,
        state: &mut WorkflowState,
        response: Result<BoundaryResponse, ServiceError>,
    ) -> Result<(), WorkflowError> {
        let response = response?;

        tracing::info!(
            "Received {} placement rectangles, entering placement view",
            response.data.len()
        );
        state.boundary = response.data;
        state.view = ViewState::PlacementAdjustment;
        Ok(())
    }

    pub async fn request_advanced_placement(
        &self,
        state: &mut WorkflowState,
        surface: &dyn EditingSurface,
        service: &dyn BoundaryService,
    ) -> Result<(), WorkflowError> {
        let request = self.begin_advanced_placement(state, surface)?;
        let response = service.compute_boundaries(&request).await;
        self.finish_advanced_placement(state, response)
    }

    /// Rectangles the placement surface is seeded with
    pub fn placement_seed(&self, state: &WorkflowState) -> PlacementBoundary {
        seed_rectangles(&state.boundary, self.config.canvas())
    }

    /// Replace the whole boundary with the placement surface's rectangles
    pub fn set_placement(
        &self,
        state: &mut WorkflowState,
        boundary: PlacementBoundary,
    ) -> Result<(), WorkflowError> {
        state.require_view(ViewState::PlacementAdjustment)?;
        state.boundary = boundary;
        Ok(())
    }

    pub fn move_placement(
        &self,
        state: &mut WorkflowState,
        id: impl Into<String>,
        rect: Rect,
    ) -> Result<(), WorkflowError> {
        state.require_view(ViewState::PlacementAdjustment)?;
        state.boundary.insert(id.into(), rect);
        Ok(())
    }

    /// Leave the placement view, keeping the boundary for later compiles
    pub fn return_to_editing(&self, state: &mut WorkflowState) {
        if state.view != ViewState::Editing {
            tracing::info!("Returning to editing view");
            state.view = ViewState::Editing;
        }
    }
}
