use crate::snapshot::{Snapshot, StaticFactories};
use crate::writer::CodeWriter;
use prefab_core::CoreError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

pub fn render_template(template: &str, context: &HashMap<&str, String>) -> Result<String, CoreError> {
    let mut result = template.to_string();

    for (key, value) in context {
        let placeholder = format!("{{{{{}}}}}", key);
        result = result.replace(&placeholder, value);
    }

    if let Some(start) = result.find("{{") {
        let snippet: String = result[start..].chars().take(24).collect();
        return Err(CoreError::template(format!(
            "unreplaced placeholder near '{}'",
            snippet
        )));
    }

    Ok(result)
}

pub static PREREGISTER_TEMPLATE: &str = r#"//! Generated factory preregistrations. Do not edit by hand.

use prefab_core::{CoreError, RegistryBuilder};

/// Replay the deferred-name registrations captured at build time.
///
/// Live factories cannot be carried across the build boundary; each
/// capability notes how many were registered ahead of these names.
pub fn preregister(builder: &mut RegistryBuilder) -> Result<(), CoreError> {
{{registrations}}    Ok(())
}
"#;

static CAPABILITY_HEADER_TEMPLATE: &str =
    "    // {{capability}}: {{factory_count}} live factory entries ahead of the names below\n";

static REGISTRATION_TEMPLATE: &str = r#"    if let Some(key) = builder.key_named("{{capability}}") {
        builder.register_name(key, "{{name}}")?;
    }
"#;

/// Renders a captured snapshot into a static-registration source file
pub struct RegistrationGenerator {
    out_dir: PathBuf,
}

impl RegistrationGenerator {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// Generate `preregister.rs` from the capture.
    ///
    /// A disabled capture generates nothing and returns `None` (the gate
    /// already explained why).
    pub fn generate(&self, captured: &StaticFactories) -> Result<Option<PathBuf>, CoreError> {
        let Some(snapshot) = captured.snapshot() else {
            debug!("capture disabled; no source generated");
            return Ok(None);
        };

        let content = self.render(snapshot)?;
        let path = self.out_dir.join("preregister.rs");
        CodeWriter::new().write_if_changed(&path, &content)?;
        Ok(Some(path))
    }

    /// Render the registration body for a snapshot
    pub fn render(&self, snapshot: &Snapshot) -> Result<String, CoreError> {
        let mut registrations = String::new();

        for entry in snapshot.entries() {
            let mut context = HashMap::new();
            context.insert("capability", escape(&entry.capability));
            context.insert("factory_count", entry.factory_count.to_string());
            registrations.push_str(&render_template(CAPABILITY_HEADER_TEMPLATE, &context)?);

            for name in &entry.deferred {
                let mut context = HashMap::new();
                context.insert("capability", escape(&entry.capability));
                context.insert("name", escape(name));
                registrations.push_str(&render_template(REGISTRATION_TEMPLATE, &context)?);
            }
        }

        let mut context = HashMap::new();
        context.insert("registrations", registrations);
        render_template(PREREGISTER_TEMPLATE, &context)
    }

    /// Output directory for generated sources
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
