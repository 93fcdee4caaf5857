//! Rendering a top-level class into a compilation unit.
//!
//! Rendering runs in two passes over the same traversal ([`Formatter`]):
//!
//! 1. a [`Collector`] records every class used in type position and every
//!    plain identifier, grouped by short name;
//! 2. [`resolve`] decides which classes can be named by their short name and
//!    which imports that takes;
//! 3. a [`Printer`] walks the tree again and writes the text.
//!
//! A third sink, [`ErrorScanner`], walks the tree only to find placeholder
//! types, so callers can refuse to render a unit that still has some.

mod collect;
mod declare;
mod formatter;
mod printer;
mod resolve;
mod scan;

use std::io::Write;
use std::path::PathBuf;

use jmodel_core::{Error, Indent, LineSeparator, Result, SourceFile};

use crate::model::{ClassId, CodeModel};

pub use collect::{Collector, Usage, UsageTable};
pub use formatter::{CLOSE_TYPE_ARGS, Declarable, Formatter, Generable, Statement, TokenSink};
pub use printer::Printer;
pub use resolve::{Resolution, resolve};
pub use scan::ErrorScanner;

/// Output settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub indent: Indent,
    pub line_separator: LineSeparator,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }

    pub fn line_separator(mut self, line_separator: LineSeparator) -> Self {
        self.line_separator = line_separator;
        self
    }
}

/// Renders top-level classes of a [`CodeModel`].
///
/// A renderer holds only options; each call builds its own usage table,
/// resolution and output buffer, so one renderer can serve many threads.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render `class` as a compilation unit.
    ///
    /// Fails with `IllegalState` when `class` is not a top-level class
    /// defined in `model`.
    pub fn render(&self, model: &CodeModel, class: ClassId) -> Result<String> {
        check_renderable(model, class)?;

        let usages = self.collect(model, class);
        let resolution = resolve(model, class, &usages);
        tracing::debug!(
            "resolved {}: {} names, {} imports",
            model.full_name(class),
            usages.len(),
            resolution.imports().len()
        );

        let printer = Printer::new(
            &resolution,
            &self.options.indent,
            self.options.line_separator,
        );
        let mut f = Formatter::new(model, printer);

        let package = model.package_data(model.package_of(class));
        if !package.is_unnamed() {
            f.p("package ").p(package.name()).p(";").nl().nl();
        }
        for import in resolution.imports() {
            f.p("import ").p(import).p(";").nl();
        }
        if !resolution.imports().is_empty() {
            f.nl();
        }
        f.declare_class(class);

        Ok(f.into_sink().finish())
    }

    /// Render `class` into `out` and flush it.
    pub fn render_to<W: Write>(&self, model: &CodeModel, class: ClassId, out: &mut W) -> Result<()> {
        let text = self.render(model, class)?;
        out.write_all(text.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    /// Render `class` as a [`SourceFile`] at `<package dirs>/<Name>.java`.
    pub fn render_file(&self, model: &CodeModel, class: ClassId) -> Result<SourceFile> {
        let content = self.render(model, class)?;
        let package = model.package_data(model.package_of(class));
        let mut path: PathBuf = package.name().split('.').filter(|s| !s.is_empty()).collect();
        path.push(format!("{}.java", model.class(class).name()));
        Ok(SourceFile::new(path, content))
    }

    /// Collect the usage table of `class` without printing anything.
    pub fn collect(&self, model: &CodeModel, class: ClassId) -> UsageTable {
        let mut f = Formatter::new(model, Collector::new());
        f.declare_class(class);
        f.into_sink().finish()
    }

    /// Names of the placeholder types `class` references.
    pub fn error_types(&self, model: &CodeModel, class: ClassId) -> Vec<String> {
        let mut f = Formatter::new(model, ErrorScanner::new());
        f.declare_class(class);
        f.into_sink().finish()
    }

    /// Whether `class` references any placeholder type.
    pub fn contains_error_types(&self, model: &CodeModel, class: ClassId) -> bool {
        !self.error_types(model, class).is_empty()
    }

    /// Fail with `ErrorTypeFound` naming the first placeholder `class`
    /// references.
    pub fn check_error_types(&self, model: &CodeModel, class: ClassId) -> Result<()> {
        match self.error_types(model, class).into_iter().next() {
            Some(name) => Err(Error::ErrorTypeFound { name }),
            None => Ok(()),
        }
    }
}

fn check_renderable(model: &CodeModel, class: ClassId) -> Result<()> {
    let data = model.class(class);
    if !data.is_defined() {
        return Err(Error::illegal_state(format!(
            "{} is not defined in this model and cannot be rendered",
            model.full_name(class)
        )));
    }
    if data.outer().is_some() {
        return Err(Error::illegal_state(format!(
            "{} is a nested class; render its top-level class instead",
            model.full_name(class)
        )));
    }
    Ok(())
}
