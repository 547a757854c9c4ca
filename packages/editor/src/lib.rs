//! # ManimDSL Editor
//!
//! Page core for the ManimDSL online editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ editing surface (owned by the UI layer)     │
//! └─────────────────────────────────────────────┘
//!                     ↕ flush / load
//! ┌─────────────────────────────────────────────┐
//! │ DocumentStore: program source + style config│
//! │  - switch / read with flush-before-load     │
//! │  - file import, export, hideCode mutation   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ Workflow: Editing ⇄ PlacementAdjustment     │
//! │  - placement merged into style `positions`  │
//! │  - compile / boundary services (traits)     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **One surface, two documents**: the store is the only writer of the
//!    surface during a switch, and always flushes before it loads
//! 2. **One state value**: documents, options, view and busy flag live in a
//!    single [`WorkflowState`] handed to every action
//! 3. **Split round trips**: `begin_*` builds a request, `finish_*` applies
//!    the response; nothing is held across the network wait
//!
//! ## Usage
//!
//! ```rust,ignore
//! use manimdsl_editor::{BufferSurface, EditorConfig, Workflow};
//!
//! let config = EditorConfig::default();
//! let workflow = Workflow::new(config.clone(), config.frame_transform());
//! let mut state = workflow.new_state();
//! let mut surface = BufferSurface::new();
//!
//! workflow.toggle_hide_code(&mut state, &mut surface);
//! let outcome = workflow.compile_direct(&mut state, &surface, &service).await?;
//! ```

mod config;
mod document;
mod errors;
mod export;
mod import;
mod placement;
mod services;
mod stylesheet;
mod workflow;

pub use config::{EditorConfig, DEFAULT_CONFIG_NAME};
pub use document::{BufferSurface, DocumentKind, DocumentStore, EditingSurface, LogicalDocument};
pub use errors::{ConfigError, ServiceError, WorkflowError};
pub use export::ExportedFile;
pub use import::{classify, ImportOutcome, ImportedFile};
pub use placement::{
    merge_placement, seed_rectangles, Canvas, CenteredFrameTransform, CoordinateTransform,
    PlacementBoundary, Rect, DEFAULT_RECTANGLE_ID,
};
pub use services::{
    BoundaryRequest, BoundaryResponse, BoundaryService, CompileOptions, CompileRequest,
    CompileResponse, CompileService, Quality,
};
pub use stylesheet::{set_style_field, HIDE_CODE_KEY};
pub use workflow::{CompileOutcome, Notice, ViewState, Workflow, WorkflowState};

// Implementors of the service traits need the same macro
pub use async_trait::async_trait;
