use std::path::{Path, PathBuf};

use clap::Args;
use eyre::{Context, Result};
use jmodel_adapter::{AdaptedModel, DeclarationSet, ErrorTypePolicy, ModelAdapter, RenderConfig};
use jmodel_codegen::{RenderOptions, Renderer};
use jmodel_core::{Indent, LineSeparator, SourceFile};

use super::UnwrapOrExit;

#[derive(Args)]
pub struct RenderCommand {
    /// Declaration file to render
    pub file: PathBuf,

    /// Output directory; sources go under their package directories
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Preview generated code without writing to disk
    #[arg(long)]
    pub dry_run: bool,

    /// Indent width in spaces, or "tab" (overrides [render] indent)
    #[arg(long, value_parser = parse_indent)]
    pub indent: Option<Indent>,

    /// End lines with CRLF (overrides [render] line_separator)
    #[arg(long)]
    pub crlf: bool,

    /// Keep unresolved types as placeholders instead of failing
    #[arg(long)]
    pub allow_errors: bool,
}

impl RenderCommand {
    /// Run the render command
    pub fn run(&self) -> Result<()> {
        let set = DeclarationSet::from_file(&self.file).unwrap_or_exit();
        let adapted = ModelAdapter::new(self.policy(&set.render))
            .build(&set)
            .unwrap_or_exit();
        let renderer = Renderer::new(self.options(&set.render));

        let files = render_all(&adapted, &renderer)?;
        if self.dry_run {
            Self::print_preview(&files);
        } else {
            let written = write_all(&files, &self.output)?;
            println!(
                "Rendered {} file{} into {}",
                written.len(),
                if written.len() == 1 { "" } else { "s" },
                self.output.display()
            );
            for path in &written {
                println!("  + {}", path.display());
            }
        }
        Ok(())
    }

    fn policy(&self, config: &RenderConfig) -> ErrorTypePolicy {
        if self.allow_errors {
            ErrorTypePolicy::Placeholder
        } else {
            config.error_types
        }
    }

    fn options(&self, config: &RenderConfig) -> RenderOptions {
        let mut options = config.options();
        if let Some(indent) = self.indent {
            options = options.indent(indent);
        }
        if self.crlf {
            options = options.line_separator(LineSeparator::CrLf);
        }
        options
    }

    fn print_preview(files: &[SourceFile]) {
        for file in files {
            println!("── {} ──", file.path().display());
            println!("{}", file.content());
        }

        println!("── Summary ──");
        println!("{} files would be generated", files.len());
    }
}

/// Render every top-level class of `adapted`, in declaration order.
fn render_all(adapted: &AdaptedModel, renderer: &Renderer) -> Result<Vec<SourceFile>> {
    adapted
        .classes
        .iter()
        .map(|&class| {
            renderer.render_file(&adapted.model, class).wrap_err_with(|| {
                format!("Failed to render {}", adapted.model.full_name(class))
            })
        })
        .collect()
}

fn write_all(files: &[SourceFile], output: &Path) -> Result<Vec<PathBuf>> {
    files
        .iter()
        .map(|file| {
            tracing::debug!("writing {}", file.path().display());
            file.write(output)
                .wrap_err_with(|| format!("Failed to write {}", file.path().display()))
        })
        .collect()
}

fn parse_indent(value: &str) -> std::result::Result<Indent, String> {
    if value == "tab" {
        return Ok(Indent::Tab);
    }
    match value.parse::<u8>() {
        Ok(0) => Err("indent width must be at least 1".to_string()),
        Ok(width) => Ok(Indent::Spaces(width)),
        Err(_) => Err(format!("expected a width or \"tab\", found '{value}'")),
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    const DECLARATIONS: &str = r#"
[[package]]
name = "com.example"

[[package.type]]
name = "Point"
kind = "class"
modifiers = ["public"]

[[package.type.field]]
name = "x"
type = { kind = "primitive", name = "int" }

[[package]]

[[package.type]]
name = "Main"
kind = "class"
"#;

    fn command(output: &Path) -> RenderCommand {
        RenderCommand {
            file: PathBuf::from("declarations.toml"),
            output: output.to_path_buf(),
            dry_run: false,
            indent: None,
            crlf: false,
            allow_errors: false,
        }
    }

    #[test]
    fn test_parse_indent() {
        assert_eq!(parse_indent("tab"), Ok(Indent::Tab));
        assert_eq!(parse_indent("2"), Ok(Indent::Spaces(2)));
        assert!(parse_indent("0").is_err());
        assert!(parse_indent("wide").is_err());
    }

    #[test]
    fn test_flags_override_render_table() {
        let config = RenderConfig::default();
        let mut cmd = command(Path::new("."));
        assert_eq!(cmd.policy(&config), ErrorTypePolicy::Fail);

        cmd.indent = Some(Indent::Tab);
        cmd.crlf = true;
        cmd.allow_errors = true;
        let options = cmd.options(&config);
        assert_eq!(options.indent, Indent::Tab);
        assert_eq!(options.line_separator, LineSeparator::CrLf);
        assert_eq!(cmd.policy(&config), ErrorTypePolicy::Placeholder);
    }

    #[test]
    fn test_writes_sources_under_package_directories() {
        let dir = tempfile::tempdir().unwrap();
        let set = DeclarationSet::from_str(DECLARATIONS).unwrap();
        let adapted = ModelAdapter::default().build(&set).unwrap();
        let cmd = command(dir.path());

        let files = render_all(&adapted, &Renderer::new(cmd.options(&set.render))).unwrap();
        let written = write_all(&files, dir.path()).unwrap();

        assert_eq!(written.len(), 2);
        let point = dir.path().join("com/example/Point.java");
        assert_eq!(
            std::fs::read_to_string(point).unwrap(),
            "package com.example;\n\npublic class Point {\n    int x;\n}\n"
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("Main.java")).unwrap(),
            "class Main {\n}\n"
        );
    }
}
