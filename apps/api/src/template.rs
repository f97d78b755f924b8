//! Prompt templates rendered with handlebars.
//!
//! Syntax:
//! - `{{facts}}`, `{{evidenceStrengthSliders.documentary}}`: field interpolation
//! - `{{#if financialInfo}}…{{/if}}`: rendered only when the value is present and non-empty
//! - `{{#each hearings}}…{{/each}}`: rendered once per element; `{{this}}` / `{{this.caseTitle}}`
//!   address the current element, `{{#unless @last}}, {{/unless}}` joins them
//!
//! Each source is compiled once into handlebars' element tree and registered in a registry of its
//! own. Strict mode makes a missing interpolated field an error; output is never HTML-escaped.

use handlebars::template::Template as Compiled;
use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext,
    RenderErrorReason, Renderable,
};
use serde_json::Value;
use thiserror::Error;

const PROMPT: &str = "prompt";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template does not compile: {0}")]
    Compile(#[from] handlebars::TemplateError),

    #[error("template does not render: {0}")]
    Render(#[from] handlebars::RenderError),
}

/// `if` with prompt truthiness: blank strings count as absent, zero counts as present.
struct PresentIf;

impl HelperDef for PresentIf {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let param = h
            .param(0)
            .ok_or(RenderErrorReason::ParamNotFoundForIndex("if", 0))?;

        let branch = if is_present(param.value()) {
            h.template()
        } else {
            h.inverse()
        };
        match branch {
            Some(t) => t.render(r, ctx, rc, out),
            None => Ok(()),
        }
    }
}

/// Whether an optional section should be rendered for this value.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Number(_) | Value::Object(_) => true,
    }
}

pub struct Template {
    registry: Handlebars<'static>,
}

impl Template {
    pub fn compile(source: &str) -> Result<Self, TemplateError> {
        let compiled = Compiled::compile(source)?;

        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);
        registry.register_helper("if", Box::new(PresentIf));
        registry.register_template(PROMPT, compiled);

        Ok(Self { registry })
    }

    pub fn render(&self, context: &Value) -> Result<String, TemplateError> {
        Ok(self.registry.render(PROMPT, context)?)
    }
}
