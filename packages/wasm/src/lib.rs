use manimdsl_editor::{
    BoundaryResponse, CenteredFrameTransform, CompileOutcome, CompileResponse, DocumentKind,
    EditingSurface, EditorConfig, ImportOutcome, ImportedFile, PlacementBoundary, Quality,
    ServiceError, ViewState, Workflow, WorkflowState,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
extern "C" {
    /// Any JS object exposing Monaco's `getValue()` / `setValue(text)`
    pub type JsEditingSurface;

    #[wasm_bindgen(method, js_name = getValue)]
    fn get_value(this: &JsEditingSurface) -> String;

    #[wasm_bindgen(method, js_name = setValue)]
    fn set_value(this: &JsEditingSurface, value: &str);
}

struct SurfaceHandle(JsEditingSurface);

impl EditingSurface for SurfaceHandle {
    fn read(&self) -> String {
        self.0.get_value()
    }

    fn write(&mut self, text: &str) {
        self.0.set_value(text);
    }
}

fn to_js_error<E: std::fmt::Display>(e: E) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_document_kind(kind: &str) -> Result<DocumentKind, String> {
    match kind {
        "program" => Ok(DocumentKind::ProgramSource),
        "style" => Ok(DocumentKind::StyleConfig),
        other => Err(format!("Unknown document: {}. Use: program or style", other)),
    }
}

fn document_kind_name(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::ProgramSource => "program",
        DocumentKind::StyleConfig => "style",
    }
}

fn decode_response<T: DeserializeOwned>(json: &str) -> Result<T, ServiceError> {
    serde_json::from_str(json).map_err(|e| ServiceError::InvalidResponse(e.to_string()))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// The editor page: both documents, the workflow state and the bound surface.
///
/// Remote calls are made by JS between a `begin*` and the matching `finish*`.
#[wasm_bindgen]
pub struct EditorPage {
    workflow: Workflow<CenteredFrameTransform>,
    state: WorkflowState,
    surface: SurfaceHandle,
}

#[wasm_bindgen]
impl EditorPage {
    #[wasm_bindgen(constructor)]
    pub fn new(surface: JsEditingSurface, config_json: Option<String>) -> Result<EditorPage, JsValue> {
        let config = match config_json {
            Some(json) => EditorConfig::from_json(&json).map_err(to_js_error)?,
            None => EditorConfig::default(),
        };
        let workflow = Workflow::new(config.clone(), config.frame_transform());
        let state = workflow.new_state();

        Ok(EditorPage {
            workflow,
            state,
            surface: SurfaceHandle(surface),
        })
    }

    /// Import one picked file; returns false if its type is not recognized
    #[wasm_bindgen(js_name = importFile)]
    pub fn import_file(&mut self, name: String, text: String) -> bool {
        let outcomes = self.workflow.import_files(
            &mut self.state,
            [ImportedFile::new(name, text)],
            &mut self.surface,
        );
        matches!(outcomes.first(), Some(ImportOutcome::Loaded { .. }))
    }

    #[wasm_bindgen(js_name = switchDocument)]
    pub fn switch_document(&mut self, kind: &str) -> Result<(), JsValue> {
        let kind = parse_document_kind(kind).map_err(to_js_error)?;
        self.workflow
            .switch_active_to(&mut self.state, kind, &mut self.surface);
        Ok(())
    }

    #[wasm_bindgen(js_name = activeDocument)]
    pub fn active_document(&self) -> String {
        document_kind_name(self.state.documents().active()).to_string()
    }

    #[wasm_bindgen(js_name = fileName)]
    pub fn file_name(&self, kind: &str) -> Result<String, JsValue> {
        let kind = parse_document_kind(kind).map_err(to_js_error)?;
        Ok(self.state.documents().document(kind).file_name.clone())
    }

    #[wasm_bindgen(js_name = toggleGeneratePython)]
    pub fn toggle_generate_python(&mut self) {
        self.workflow.toggle_generate_python(&mut self.state);
    }

    #[wasm_bindgen(js_name = toggleHideCode)]
    pub fn toggle_hide_code(&mut self) {
        self.workflow
            .toggle_hide_code(&mut self.state, &mut self.surface);
    }

    #[wasm_bindgen(js_name = setQuality)]
    pub fn set_quality(&mut self, quality: &str) -> Result<(), JsValue> {
        let quality = quality.parse::<Quality>().map_err(to_js_error)?;
        self.workflow.set_quality(&mut self.state, quality);
        Ok(())
    }

    /// Current options as `{generatePython, hideCode, quality}` JSON
    pub fn options(&self) -> Result<String, JsValue> {
        to_json(&self.state.options())
    }

    #[wasm_bindgen(js_name = isBusy)]
    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    pub fn view(&self) -> String {
        match self.state.view() {
            ViewState::Editing => "editing".to_string(),
            ViewState::PlacementAdjustment => "placement".to_string(),
        }
    }

    #[wasm_bindgen(js_name = noticeLines)]
    pub fn notice_lines(&self) -> Vec<String> {
        self.state
            .notice()
            .map(|notice| notice.lines.clone())
            .unwrap_or_default()
    }

    #[wasm_bindgen(js_name = dismissNotice)]
    pub fn dismiss_notice(&mut self) {
        self.state.dismiss_notice();
    }

    /// Start a direct compile; returns the request JSON to send
    #[wasm_bindgen(js_name = beginCompile)]
    pub fn begin_compile(&mut self) -> Result<String, JsValue> {
        let request = self
            .workflow
            .begin_compile(&mut self.state, &self.surface)
            .map_err(to_js_error)?;
        to_json(&request)
    }

    /// Start the placement-view compile; returns the request JSON to send
    #[wasm_bindgen(js_name = beginConfirmPlacement)]
    pub fn begin_confirm_placement(&mut self) -> Result<String, JsValue> {
        let request = self
            .workflow
            .begin_confirm_placement(&mut self.state, &self.surface)
            .map_err(to_js_error)?;
        to_json(&request)
    }

    /// Apply the compile service's JSON answer; returns true on success
    #[wasm_bindgen(js_name = finishCompile)]
    pub fn finish_compile(&mut self, response_json: &str) -> Result<bool, JsValue> {
        let response = decode_response::<CompileResponse>(response_json);
        let outcome = self
            .workflow
            .finish_compile(&mut self.state, response)
            .map_err(to_js_error)?;
        Ok(matches!(outcome, CompileOutcome::Succeeded { .. }))
    }

    /// Release the busy flag after the request never got an answer
    #[wasm_bindgen(js_name = abortCompile)]
    pub fn abort_compile(&mut self, reason: &str) {
        self.workflow.abort_compile(
            &mut self.state,
            &ServiceError::Transport(reason.to_string()),
        );
    }

    #[wasm_bindgen(js_name = beginAdvancedPlacement)]
    pub fn begin_advanced_placement(&mut self) -> Result<String, JsValue> {
        let request = self
            .workflow
            .begin_advanced_placement(&mut self.state, &self.surface)
            .map_err(to_js_error)?;
        to_json(&request)
    }

    #[wasm_bindgen(js_name = finishAdvancedPlacement)]
    pub fn finish_advanced_placement(&mut self, response_json: &str) -> Result<(), JsValue> {
        let response = decode_response::<BoundaryResponse>(response_json);
        self.workflow
            .finish_advanced_placement(&mut self.state, response)
            .map_err(to_js_error)
    }

    /// Rectangles to seed the placement canvas with, as JSON
    #[wasm_bindgen(js_name = placementSeed)]
    pub fn placement_seed(&self) -> Result<String, JsValue> {
        to_json(&self.workflow.placement_seed(&self.state))
    }

    #[wasm_bindgen(js_name = setPlacement)]
    pub fn set_placement(&mut self, boundary_json: &str) -> Result<(), JsValue> {
        let boundary: PlacementBoundary = serde_json::from_str(boundary_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid placement: {}", e)))?;
        self.workflow
            .set_placement(&mut self.state, boundary)
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = returnToEditing)]
    pub fn return_to_editing(&mut self) {
        self.workflow.return_to_editing(&mut self.state);
    }

    /// `{fileName, text}` JSON for one document
    #[wasm_bindgen(js_name = exportDocument)]
    pub fn export_document(&mut self, kind: &str) -> Result<String, JsValue> {
        let kind = parse_document_kind(kind).map_err(to_js_error)?;
        let file = self
            .state
            .documents_mut()
            .export_document(kind, &self.surface);
        to_json(&file)
    }

    /// `[{fileName, text}, ...]` JSON for the whole project
    #[wasm_bindgen(js_name = exportProject)]
    pub fn export_project(&mut self) -> Result<String, JsValue> {
        let files = self.state.documents_mut().export_project(&self.surface);
        to_json(&files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_kind_names_round_trip() {
        for kind in [DocumentKind::ProgramSource, DocumentKind::StyleConfig] {
            assert_eq!(parse_document_kind(document_kind_name(kind)), Ok(kind));
        }
        assert!(parse_document_kind("stylesheet").is_err());
    }

    #[test]
    fn test_decode_compile_response() {
        let response: CompileResponse =
            decode_response(r#"{"success": false, "message": "line 3: parse error"}"#).unwrap();
        assert!(!response.success);
        assert_eq!(response.message, "line 3: parse error");
    }

    #[test]
    fn test_decode_garbage_is_invalid_response() {
        let result = decode_response::<BoundaryResponse>("<html>502</html>");
        assert!(matches!(result, Err(ServiceError::InvalidResponse(_))));
    }
}
