//! Template rendering hand-off
//!
//! Views do not produce markup. They answer with the template they would
//! render and the named values for it, as a JSON document:
//! `{"template": "index.html", "context": {...}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::AppError;

/// A template reference plus the context it is rendered with
#[derive(Debug)]
pub struct Rendered<C> {
    pub template: &'static str,
    /// `None` renders the template with an empty context
    pub context: Option<C>,
}

/// Render `template` with `context`
pub fn render<C: Serialize>(template: &'static str, context: C) -> Rendered<C> {
    Rendered {
        template,
        context: Some(context),
    }
}

impl<C: Serialize> Rendered<C> {
    /// Render `template` with no values at all
    pub fn empty(template: &'static str) -> Self {
        Self {
            template,
            context: None,
        }
    }

    fn context_value(&self) -> Result<Value, serde_json::Error> {
        match &self.context {
            Some(context) => serde_json::to_value(context),
            None => Ok(Value::Object(Map::new())),
        }
    }
}

impl<C: Serialize> IntoResponse for Rendered<C> {
    fn into_response(self) -> Response {
        match self.context_value() {
            Ok(context) => (
                StatusCode::OK,
                Json(json!({ "template": self.template, "context": context })),
            )
                .into_response(),
            Err(e) => AppError::Internal(format!(
                "Cannot serialize context for {}: {}",
                self.template, e
            ))
            .into_response(),
        }
    }
}
