//! Integration tests for the compile workflow

use manimdsl_editor::{
    async_trait, BoundaryRequest, BoundaryResponse, BoundaryService, BufferSurface, Canvas,
    CenteredFrameTransform, CompileOutcome, CompileRequest, CompileResponse, CompileService,
    CoordinateTransform, DocumentKind, EditingSurface, EditorConfig, ImportedFile, Notice,
    PlacementBoundary, Quality, Rect, ServiceError, ViewState, Workflow, WorkflowError,
    WorkflowState,
};
use serde_json::{Map, Value};
use std::cell::RefCell;

/// Compile service that records requests and answers with a canned response
struct RecordingCompiler {
    response: Result<CompileResponse, ServiceError>,
    requests: RefCell<Vec<CompileRequest>>,
}

impl RecordingCompiler {
    fn answering(response: Result<CompileResponse, ServiceError>) -> Self {
        Self {
            response,
            requests: RefCell::new(Vec::new()),
        }
    }

    fn last_request(&self) -> CompileRequest {
        self.requests.borrow().last().cloned().expect("no compile request recorded")
    }
}

#[async_trait(?Send)]
impl CompileService for RecordingCompiler {
    async fn compile(&self, request: &CompileRequest) -> Result<CompileResponse, ServiceError> {
        self.requests.borrow_mut().push(request.clone());
        self.response.clone()
    }
}

struct FixedBoundaries {
    boundary: PlacementBoundary,
    requests: RefCell<Vec<BoundaryRequest>>,
}

#[async_trait(?Send)]
impl BoundaryService for FixedBoundaries {
    async fn compute_boundaries(
        &self,
        request: &BoundaryRequest,
    ) -> Result<BoundaryResponse, ServiceError> {
        self.requests.borrow_mut().push(request.clone());
        Ok(BoundaryResponse {
            data: self.boundary.clone(),
        })
    }
}

fn setup() -> (Workflow<CenteredFrameTransform>, WorkflowState, BufferSurface) {
    let config = EditorConfig::default();
    let workflow = Workflow::new(config.clone(), config.frame_transform());
    let state = workflow.new_state();
    (workflow, state, BufferSurface::new())
}

fn obj1_boundary() -> PlacementBoundary {
    PlacementBoundary::from([("obj1".to_string(), Rect::new(0.0, 0.0, 10.0, 10.0))])
}

fn parse_style(style: &str) -> Map<String, Value> {
    serde_json::from_str(style).unwrap()
}

#[test]
fn test_import_then_edit_then_import_style() {
    let (workflow, mut state, mut surface) = setup();

    workflow.import_files(
        &mut state,
        vec![ImportedFile::new("prog.manimdsl", "let x = 1")],
        &mut surface,
    );
    assert_eq!(state.documents().active(), DocumentKind::ProgramSource);
    assert_eq!(surface.text(), "let x = 1");

    surface.write("let x = 2");
    workflow.import_files(&mut state, vec![ImportedFile::new("style.json", "{}")], &mut surface);

    let documents = state.documents();
    assert_eq!(documents.document(DocumentKind::ProgramSource).text(), "let x = 1");
    assert_eq!(documents.document(DocumentKind::StyleConfig).text(), "{}");
    assert_eq!(documents.active(), DocumentKind::StyleConfig);
}

#[tokio::test]
async fn test_direct_compile_submits_both_documents() {
    let (workflow, mut state, mut surface) = setup();
    let compiler = RecordingCompiler::answering(Ok(CompileResponse::success(None)));

    workflow.import_files(
        &mut state,
        vec![
            ImportedFile::new("anim.json", r#"{"codeTracking":"stepOver"}"#),
            ImportedFile::new("anim.manimdsl", "let y = [1, 2]"),
        ],
        &mut surface,
    );
    surface.write("let y = [1, 2, 3]");
    workflow.set_quality(&mut state, Quality::Medium);

    let outcome = workflow
        .compile_direct(&mut state, &surface, &compiler)
        .await
        .unwrap();

    assert_eq!(outcome, CompileOutcome::Succeeded { data: None });
    let request = compiler.last_request();
    assert_eq!(request.program, "let y = [1, 2, 3]");
    assert_eq!(request.style, r#"{"codeTracking":"stepOver"}"#);
    assert_eq!(request.quality, Quality::Medium);
    assert!(!request.generate_python);
    assert!(!state.is_busy());
}

#[tokio::test]
async fn test_advanced_placement_then_confirm() {
    let (workflow, mut state, mut surface) = setup();
    let boundaries = FixedBoundaries {
        boundary: obj1_boundary(),
        requests: RefCell::new(Vec::new()),
    };
    let compiler = RecordingCompiler::answering(Ok(CompileResponse::success(None)));

    surface.write("let obj1 = Circle()");
    workflow
        .request_advanced_placement(&mut state, &surface, &boundaries)
        .await
        .unwrap();

    assert_eq!(state.view(), ViewState::PlacementAdjustment);
    assert_eq!(*state.boundary(), obj1_boundary());
    assert_eq!(
        boundaries.requests.borrow()[0],
        BoundaryRequest {
            program: "let obj1 = Circle()".to_string(),
            style: "{}".to_string(),
        }
    );

    workflow
        .confirm_placement(&mut state, &surface, &compiler)
        .await
        .unwrap();

    let style = parse_style(&compiler.last_request().style);
    let expected = workflow
        .config()
        .frame_transform()
        .to_target_coordinates(&obj1_boundary(), workflow.config().canvas());
    assert_eq!(style["positions"], expected);
    assert_eq!(state.view(), ViewState::PlacementAdjustment);

    // Merged positions are submitted, never written back
    assert!(!state.documents().document(DocumentKind::StyleConfig).is_populated());
}

#[tokio::test]
async fn test_compile_failure_shows_notice() {
    let (workflow, mut state, surface) = setup();
    let compiler =
        RecordingCompiler::answering(Ok(CompileResponse::failure("line 3: parse error")));

    let outcome = workflow
        .compile_direct(&mut state, &surface, &compiler)
        .await
        .unwrap();

    let expected = Notice {
        lines: vec!["line 3: parse error".to_string()],
    };
    assert_eq!(outcome, CompileOutcome::Failed(Some(expected.clone())));
    assert_eq!(state.notice(), Some(&expected));
    assert!(!state.is_busy());
}

#[tokio::test]
async fn test_failure_keeps_documents_intact() {
    let (workflow, mut state, mut surface) = setup();
    let compiler = RecordingCompiler::answering(Ok(CompileResponse::failure("bad")));

    surface.write("let x = 1");
    workflow.toggle_hide_code(&mut state, &mut surface);
    workflow
        .compile_direct(&mut state, &surface, &compiler)
        .await
        .unwrap();

    let documents = state.documents();
    assert_eq!(documents.document(DocumentKind::ProgramSource).text(), "let x = 1");
    assert_eq!(
        parse_style(documents.document(DocumentKind::StyleConfig).text())["hideCode"],
        true
    );
}

#[tokio::test]
async fn test_transport_failure_releases_busy() {
    let (workflow, mut state, surface) = setup();
    let compiler =
        RecordingCompiler::answering(Err(ServiceError::Transport("offline".to_string())));

    let result = workflow.compile_direct(&mut state, &surface, &compiler).await;

    assert!(matches!(result, Err(WorkflowError::Service(ServiceError::Transport(_)))));
    assert!(!state.is_busy());
    assert!(workflow.begin_compile(&mut state, &surface).is_ok());
}

#[tokio::test]
async fn test_direct_compile_after_returning_merges_placement() {
    let (workflow, mut state, surface) = setup();
    let boundaries = FixedBoundaries {
        boundary: PlacementBoundary::new(),
        requests: RefCell::new(Vec::new()),
    };
    let compiler = RecordingCompiler::answering(Ok(CompileResponse::success(None)));

    // No boundary held yet: style goes out untouched
    workflow
        .compile_direct(&mut state, &surface, &compiler)
        .await
        .unwrap();
    assert_eq!(compiler.last_request().style, "{}");

    workflow
        .request_advanced_placement(&mut state, &surface, &boundaries)
        .await
        .unwrap();
    assert_eq!(workflow.placement_seed(&state).len(), 1);
    workflow
        .move_placement(&mut state, "title", Rect::new(0.0, 0.0, 350.0, 200.0))
        .unwrap();
    workflow.return_to_editing(&mut state);

    workflow
        .compile_direct(&mut state, &surface, &compiler)
        .await
        .unwrap();

    let style = parse_style(&compiler.last_request().style);
    let positions = style["positions"].as_object().unwrap();
    assert_eq!(positions.keys().collect::<Vec<_>>(), vec!["title"]);
}

#[tokio::test]
async fn test_custom_transform_is_used() {
    struct Identity;

    impl CoordinateTransform for Identity {
        fn to_target_coordinates(&self, boundary: &PlacementBoundary, _canvas: Canvas) -> Value {
            serde_json::to_value(boundary).unwrap()
        }
    }

    let workflow = Workflow::new(EditorConfig::default(), Identity);
    let mut state = workflow.new_state();
    let surface = BufferSurface::new();
    let compiler = RecordingCompiler::answering(Ok(CompileResponse::success(None)));

    workflow
        .finish_advanced_placement(&mut state, Ok(BoundaryResponse { data: obj1_boundary() }))
        .unwrap();
    workflow
        .confirm_placement(&mut state, &surface, &compiler)
        .await
        .unwrap();

    let style = parse_style(&compiler.last_request().style);
    assert_eq!(style["positions"]["obj1"]["width"], 10.0);
}

#[test]
fn test_export_uses_tracked_file_names() {
    let (workflow, mut state, mut surface) = setup();

    workflow.import_files(
        &mut state,
        vec![ImportedFile::new("scene.manimdsl", "let a = 1")],
        &mut surface,
    );
    workflow.switch_active_to(&mut state, DocumentKind::StyleConfig, &mut surface);
    surface.write(r#"{"hideCode":true}"#);

    let files = state.documents_mut().export_project(&surface);

    assert_eq!(files[0].file_name, "test.json");
    assert_eq!(files[0].text, r#"{"hideCode":true}"#);
    assert_eq!(files[1].file_name, "scene.manimdsl");
    assert_eq!(files[1].text, "let a = 1");
}
