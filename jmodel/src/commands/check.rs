use std::path::PathBuf;

use clap::Args;
use eyre::{Context, Result};
use jmodel_adapter::{DeclarationSet, ErrorTypePolicy, ModelAdapter};
use jmodel_codegen::Renderer;

use super::UnwrapOrExit;

#[derive(Args)]
pub struct CheckCommand {
    /// Declaration file to validate
    pub file: PathBuf,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<()> {
        let set = DeclarationSet::from_file(&self.file).unwrap_or_exit();

        // Keep unresolved types so all of them can be reported at once
        let adapted = ModelAdapter::new(ErrorTypePolicy::Placeholder)
            .build(&set)
            .unwrap_or_exit();
        let renderer = Renderer::new(set.render.options());

        let mut unresolved = Vec::new();
        for &class in &adapted.classes {
            let name = adapted.model.full_name(class);
            renderer
                .render(&adapted.model, class)
                .wrap_err_with(|| format!("Failed to render {name}"))?;
            for error_type in renderer.error_types(&adapted.model, class) {
                unresolved.push((name.clone(), error_type));
            }
        }

        if !unresolved.is_empty() {
            for (class, error_type) in &unresolved {
                eprintln!("error: unresolved type '{error_type}'");
                eprintln!("  --> {class}");
            }
            std::process::exit(1);
        }

        println!("✓ {} is valid\n", self.file.display());

        let count = adapted.classes.len();
        println!(
            "  {} top-level type{} ({} declared in total):",
            count,
            if count == 1 { "" } else { "s" },
            set.type_count()
        );
        for &class in &adapted.classes {
            let data = adapted.model.class(class);
            println!(
                "    {} {}",
                data.kind().keyword(),
                adapted.model.full_name(class)
            );
        }

        Ok(())
    }
}
