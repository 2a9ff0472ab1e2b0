//! Driver (spec component 10, SPEC_FULL section 4.10).
//!
//! Orchestrates the whole pipeline and owns every file handle. Resource
//! scoping follows spec section 5: the input handle and the two output
//! sinks are acquired here and released on every exit path via ordinary
//! Rust drop semantics — there is no separate cleanup path to keep in
//! sync with the success path.

use std::path::{Path, PathBuf};

use crate::builder::realize;
use crate::dump_ir::dump_ir;
use crate::emit::emit;
use crate::error::{GenResult, GeneratorError};
use crate::grammar::parse_grammar;
use crate::template_splicer::render_main_cpp;

pub struct RunConfig {
    pub grammar_path: PathBuf,
    pub output_path: PathBuf,
    pub visitor_path: PathBuf,
    pub emit_template: bool,
    pub dump_ir: bool,
}

impl RunConfig {
    pub fn new(grammar_path: PathBuf) -> Self {
        Self {
            grammar_path,
            output_path: PathBuf::from("chisel.hpp"),
            visitor_path: PathBuf::from("visitor.hpp"),
            emit_template: false,
            dump_ir: false,
        }
    }
}

pub fn run(config: &RunConfig) -> GenResult<()> {
    log::debug!("reading grammar source from {}", config.grammar_path.display());
    let source = std::fs::read(&config.grammar_path)?;

    let data = parse_grammar(&source)?;
    log::debug!(
        "tokenized grammar: {} tokens, {} constructs, {} prefix block(s), {} suffix block(s)",
        data.tokens.len(),
        data.simple_constructs.len(),
        data.prefixes.len(),
        data.suffixes.len(),
    );

    let constructs = realize(&data)?;
    log::debug!("realized {} construct(s) into combinator trees", constructs.len());

    if config.dump_ir {
        dump_ir(&constructs).map_err(|e| {
            GeneratorError::Io { message: "failed writing --dump-ir output".into(), source: e }
        })?;
    }

    let output = emit(&data, &constructs);
    log::debug!(
        "emitted {} byte(s) of parser source, {} byte(s) of visitor source",
        output.parser_source.len(),
        output.visitor_source.len(),
    );

    std::fs::write(&config.output_path, &output.parser_source)?;
    std::fs::write(&config.visitor_path, &output.visitor_source)?;
    log::debug!(
        "wrote {} and {}",
        config.output_path.display(),
        config.visitor_path.display()
    );

    if config.emit_template {
        write_template(&config.output_path, &config.visitor_path)?;
    }

    Ok(())
}

fn write_template(output_path: &Path, visitor_path: &Path) -> GenResult<()> {
    let rendered = render_main_cpp(
        &output_path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default(),
        &visitor_path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default(),
    );
    std::fs::write("main.cpp", rendered)?;
    log::debug!("wrote template main.cpp");
    Ok(())
}
