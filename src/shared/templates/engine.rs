use minijinja::{AutoEscape, Environment};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

use super::{HOME_TEMPLATE, NOT_FOUND_TEMPLATE, PAGE_TEMPLATE};

/// Templates the page handlers cannot render without
const REQUIRED_TEMPLATES: [&str; 3] = [HOME_TEMPLATE, PAGE_TEMPLATE, NOT_FOUND_TEMPLATE];

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

/// Holds the compiled site templates for the lifetime of the process
pub struct SiteRenderer {
    env: Environment<'static>,
}

impl SiteRenderer {
    /// Load every `.jinja` file below `dir`, named by its relative path
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let template_path = dir.as_ref();
        if !template_path.is_dir() {
            return Err(TemplateError::NotFound(
                template_path.to_string_lossy().to_string(),
            ));
        }

        let mut env = new_environment();
        load_templates_recursive(&mut env, template_path, template_path);

        let renderer = Self { env };
        if let Some(missing) = REQUIRED_TEMPLATES
            .iter()
            .find(|name| !renderer.has_template(name))
        {
            return Err(TemplateError::NotFound(missing.to_string()));
        }

        Ok(renderer)
    }

    /// Build a renderer from in-memory sources
    #[cfg(test)]
    pub fn from_templates<I>(templates: I) -> Result<Self, TemplateError>
    where
        I: IntoIterator<Item = (&'static str, &'static str)>,
    {
        let mut env = new_environment();
        for (name, source) in templates {
            env.add_template(name, source)
                .map_err(|e| TemplateError::RenderError(e.to_string()))?;
        }
        Ok(Self { env })
    }

    /// Render the named template against a serializable context
    pub fn render<S: Serialize>(
        &self,
        template_name: &str,
        ctx: S,
    ) -> Result<String, TemplateError> {
        let template = self
            .env
            .get_template(template_name)
            .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

        template
            .render(ctx)
            .map_err(|e| TemplateError::RenderError(e.to_string()))
    }

    pub fn has_template(&self, template_name: &str) -> bool {
        self.env.get_template(template_name).is_ok()
    }
}

fn new_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|name| {
        if name.ends_with(".html.jinja") || name.ends_with(".html") {
            AutoEscape::Html
        } else {
            AutoEscape::None
        }
    });
    env
}

/// Recursively load all .jinja templates from a directory
fn load_templates_recursive(env: &mut Environment<'static>, base_path: &Path, current_path: &Path) {
    let Ok(entries) = std::fs::read_dir(current_path) else {
        tracing::warn!("Cannot read template directory {}", current_path.display());
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            load_templates_recursive(env, base_path, &path);
            continue;
        }
        if !path.extension().is_some_and(|ext| ext == "jinja") {
            continue;
        }

        let Ok(relative) = path.strip_prefix(base_path) else {
            continue;
        };
        // Forward slashes so `{% include "partials/x" %}` works on every platform
        let template_name = relative.to_string_lossy().replace('\\', "/");

        match std::fs::read_to_string(&path) {
            Ok(content) => {
                // Templates live for the whole process
                let static_name: &'static str = Box::leak(template_name.clone().into_boxed_str());
                let static_content: &'static str = Box::leak(content.into_boxed_str());
                if let Err(e) = env.add_template(static_name, static_content) {
                    tracing::warn!("Failed to load template {}: {}", template_name, e);
                } else {
                    tracing::debug!("Loaded template: {}", template_name);
                }
            }
            Err(e) => tracing::warn!("Failed to read template {}: {}", template_name, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_html_templates_escape_by_default() {
        let renderer = SiteRenderer::from_templates([(
            "greeting.html.jinja",
            "<p>{{ name }}</p>{{ body|safe }}",
        )])
        .unwrap();

        let html = renderer
            .render(
                "greeting.html.jinja",
                context! { name => "Anna & <Co>", body => "<em>ok</em>" },
            )
            .unwrap();
        assert_eq!(html, "<p>Anna &amp; &lt;Co&gt;</p><em>ok</em>");
    }

    #[test]
    fn test_missing_template() {
        let renderer = SiteRenderer::from_templates([]).unwrap();
        let result = renderer.render("nope.html.jinja", context! {});
        assert!(matches!(result, Err(TemplateError::NotFound(_))));
        assert!(!renderer.has_template("nope.html.jinja"));
    }

    #[test]
    fn test_from_dir_loads_shipped_templates() {
        let renderer = SiteRenderer::from_dir("templates/site").unwrap();
        assert!(renderer.has_template(crate::shared::templates::HOME_TEMPLATE));
        assert!(renderer.has_template(crate::shared::templates::PAGE_TEMPLATE));
        assert!(renderer.has_template(crate::shared::templates::NOT_FOUND_TEMPLATE));
    }

    #[test]
    fn test_from_dir_requires_page_templates() {
        let dir = std::env::temp_dir().join(format!("site-templates-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(crate::shared::templates::HOME_TEMPLATE), "home").unwrap();

        let result = SiteRenderer::from_dir(&dir);
        std::fs::remove_dir_all(&dir).unwrap();

        assert!(matches!(
            result,
            Err(TemplateError::NotFound(name)) if name == crate::shared::templates::PAGE_TEMPLATE
        ));
    }

    #[test]
    fn test_from_dir_missing_directory() {
        assert!(matches!(
            SiteRenderer::from_dir("does/not/exist"),
            Err(TemplateError::NotFound(_))
        ));
    }
}
