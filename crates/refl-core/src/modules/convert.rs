use crate::domain::{ConvertError, ConvertResult, LayerStack};
use crate::modules::genx::{GenxTable, build_layer_stack};
use crate::modules::lsfit::{LsfitDocument, transform_template};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Everything one conversion run needs: the two input files and the
/// literal header/tail blocks the caller wants around the transformed
/// body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub genx_path: PathBuf,
    pub template_path: PathBuf,
    pub document_header: String,
    pub document_tail: String,
}

impl ConversionRequest {
    pub fn new(
        genx_path: impl Into<PathBuf>,
        template_path: impl Into<PathBuf>,
        document_header: impl Into<String>,
        document_tail: impl Into<String>,
    ) -> Self {
        Self {
            genx_path: genx_path.into(),
            template_path: template_path.into(),
            document_header: document_header.into(),
            document_tail: document_tail.into(),
        }
    }
}

/// CSV → layer stack → template rewrite → framed document. Returns the
/// full rendered output; nothing is written to disk here, so a failing
/// run leaves no partial file for the caller to clean up.
pub fn run_conversion(request: &ConversionRequest) -> ConvertResult<String> {
    let stack = load_layer_stack(&request.genx_path)?;
    let template = fs::read_to_string(&request.template_path)
        .map_err(|source| ConvertError::io(&request.template_path, source))?;
    let body = transform_template(&template, &stack)?;
    info!(
        genx = %request.genx_path.display(),
        template = %request.template_path.display(),
        layers = stack.len(),
        "conversion complete"
    );
    Ok(LsfitDocument::new(
        request.document_header.clone(),
        body,
        request.document_tail.clone(),
    )
    .render())
}

/// Reads a GenX export and builds the position-ordered stack from it.
pub fn load_layer_stack(genx_path: &Path) -> ConvertResult<LayerStack> {
    let table = GenxTable::from_path(genx_path)?;
    build_layer_stack(&table)
}
